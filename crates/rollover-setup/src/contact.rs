//! Contact patch detection from end-of-cycle kinematics.

use std::ops::Range;

use rollover_results::RefPointRecord;

use crate::correspondence::SortedWheelState;

/// Contiguous range of angle-sorted wheel node indices inside the active
/// contact patch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactWindow {
    range: Range<usize>,
}

impl ContactWindow {
    /// Window covering no nodes.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the window covers no nodes.
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Number of nodes in the window.
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Sorted indices covered by the window.
    pub fn indices(&self) -> Range<usize> {
        self.range.clone()
    }
}

/// Find the wheel nodes whose deformed x-position lies within
/// `max_contact_length / 2` of the reference point's deformed x-position.
///
/// The first and last node of the raw window are dropped: their contact
/// state is ambiguous at the patch edge, so the window is trimmed rather
/// than risk prescribing displacements on a node that had already lifted
/// off. An empty window means no contact transfer is needed.
///
/// The window is the contiguous span between the first and last hit:
/// interior nodes are included without re-testing, on the assumption that
/// the contact arc is convex and every node between two in-patch nodes is
/// itself in the patch.
pub fn detect(
    wheel: &SortedWheelState,
    rp: &RefPointRecord,
    max_contact_length: f64,
) -> ContactWindow {
    let rp_x = rp.deformed().x;
    let half_length = max_contact_length / 2.0;

    let mut first = None;
    let mut last = None;
    for i in 0..wheel.len() {
        let x_def = wheel.x[i].x + wheel.u[i].x;
        if (x_def - rp_x).abs() <= half_length {
            if first.is_none() {
                first = Some(i);
            }
            last = Some(i);
        }
    }

    match (first, last) {
        // Trimming removes both boundary nodes, so fewer than three raw
        // hits leaves nothing.
        (Some(first), Some(last)) if last - first >= 2 => ContactWindow {
            range: (first + 1)..last,
        },
        _ => ContactWindow::empty(),
    }
}
