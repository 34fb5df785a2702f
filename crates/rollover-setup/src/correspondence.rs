//! Node correspondence between a result snapshot and the live mesh.
//!
//! Node labels are reassigned when a model is copied, so a snapshot's
//! labels cannot be used to address nodes of the new cycle's model.
//! Durable identity is geometric: wheel nodes are ranked by their angle
//! about the reference point (rail nodes by their x-coordinate), snapshot
//! and live orderings are paired rank by rank, and the live labels are
//! attached to the sorted snapshot kinematics.

use nalgebra::Vector2;
use thiserror::Error;

use rollover_model::ContactNode;
use rollover_results::{NodeSetRecord, RefPointRecord};

/// Failure to pair snapshot nodes with live-mesh nodes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrespondenceError {
    #[error("{set} node count mismatch: snapshot has {snapshot}, live mesh has {live}")]
    CountMismatch {
        set: &'static str,
        snapshot: usize,
        live: usize,
    },

    #[error("{set} contact set needs at least two nodes, got {count}")]
    TooFewNodes { set: &'static str, count: usize },

    #[error("wheel contact nodes give a non-positive angular pitch ({pitch})")]
    DegeneratePitch { pitch: f64 },
}

/// Angle-sorted wheel kinematics with live labels attached.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedWheelState {
    /// Undeformed positions, sorted by angle about the reference point.
    pub x: Vec<Vector2<f64>>,
    /// End-of-cycle displacements, same order.
    pub u: Vec<Vector2<f64>>,
    /// End-of-cycle velocities, same order.
    pub v: Vec<Vector2<f64>>,
    /// Live-mesh labels, sorted by the same angle criterion. Index `i`
    /// holds the current label of the node at sorted rank `i`.
    pub labels: Vec<i32>,
    /// Node angles about the reference point, ascending.
    pub angles: Vec<f64>,
    /// Angular spacing between adjacent contact nodes.
    pub pitch: f64,
}

impl SortedWheelState {
    /// Number of wheel contact nodes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// x-sorted rail kinematics with live labels attached.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedRailState {
    /// Undeformed positions, sorted by x-coordinate.
    pub x: Vec<Vector2<f64>>,
    /// End-of-cycle displacements, same order.
    pub u: Vec<Vector2<f64>>,
    /// End-of-cycle velocities, same order.
    pub v: Vec<Vector2<f64>>,
    /// Live-mesh labels, sorted by x-coordinate.
    pub labels: Vec<i32>,
}

impl SortedRailState {
    /// Number of rail contact nodes.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Angle of each node about `origin`, measured from the downward vertical
/// with `atan2(dx, -dy)` so the angle grows in the rolling direction.
pub fn node_angles(coords: &[Vector2<f64>], origin: Vector2<f64>) -> Vec<f64> {
    coords
        .iter()
        .map(|c| {
            let d = c - origin;
            d.x.atan2(-d.y)
        })
        .collect()
}

/// Indices that sort `values` ascending (argsort).
pub fn sort_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}

fn reorder<T: Clone>(items: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&i| items[i].clone()).collect()
}

/// Pair the snapshot's wheel nodes with the live mesh's wheel contact
/// nodes by angular rank about the reference point's undeformed position.
pub fn resolve_wheel(
    record: &NodeSetRecord,
    rp: &RefPointRecord,
    live: &[ContactNode],
) -> Result<SortedWheelState, CorrespondenceError> {
    if record.len() != live.len() {
        return Err(CorrespondenceError::CountMismatch {
            set: "wheel",
            snapshot: record.len(),
            live: live.len(),
        });
    }
    if record.len() < 2 {
        return Err(CorrespondenceError::TooFewNodes {
            set: "wheel",
            count: record.len(),
        });
    }

    let snap_angles = node_angles(&record.x, rp.x);
    let snap_order = sort_order(&snap_angles);

    let live_coords: Vec<Vector2<f64>> = live.iter().map(|n| n.coords).collect();
    let live_order = sort_order(&node_angles(&live_coords, rp.x));

    let angles = reorder(&snap_angles, &snap_order);
    let pitch = angles[1] - angles[0];
    // Coincident nodes would give a zero pitch and poison every division
    // by it downstream.
    if pitch <= 0.0 {
        return Err(CorrespondenceError::DegeneratePitch { pitch });
    }

    Ok(SortedWheelState {
        x: reorder(&record.x, &snap_order),
        u: reorder(&record.u, &snap_order),
        v: reorder(&record.v, &snap_order),
        labels: live_order.iter().map(|&i| live[i].label).collect(),
        angles,
        pitch,
    })
}

/// Pair the snapshot's rail nodes with the live mesh's rail contact nodes
/// by x-coordinate rank. No rotation applies to the rail, so the raw
/// x-coordinate is the durable ordering.
pub fn resolve_rail(
    record: &NodeSetRecord,
    live: &[ContactNode],
) -> Result<SortedRailState, CorrespondenceError> {
    if record.len() != live.len() {
        return Err(CorrespondenceError::CountMismatch {
            set: "rail",
            snapshot: record.len(),
            live: live.len(),
        });
    }

    let snap_x: Vec<f64> = record.x.iter().map(|p| p.x).collect();
    let snap_order = sort_order(&snap_x);

    let live_x: Vec<f64> = live.iter().map(|n| n.coords.x).collect();
    let live_order = sort_order(&live_x);

    Ok(SortedRailState {
        x: reorder(&record.x, &snap_order),
        u: reorder(&record.u, &snap_order),
        v: reorder(&record.v, &snap_order),
        labels: live_order.iter().map(|&i| live[i].label).collect(),
    })
}
