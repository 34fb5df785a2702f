//! End-of-cycle nodal result snapshots.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Reference-point kinematics at the end of a cycle.
///
/// The reference point is the rigid control point whose prescribed motion
/// drives the wheel's rolling and vertical loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefPointRecord {
    /// Undeformed position.
    pub x: Vector2<f64>,
    /// Displacement at the end of the cycle.
    pub u: Vector2<f64>,
    /// Accumulated rolling rotation about the out-of-plane axis (radians).
    pub ur: f64,
    /// Velocity at the end of the cycle.
    pub v: Vector2<f64>,
}

impl RefPointRecord {
    /// Deformed position at the end of the cycle.
    pub fn deformed(&self) -> Vector2<f64> {
        self.x + self.u
    }
}

/// Kinematics of one contact node set at the end of a cycle.
///
/// Arrays are indexed by node; ordering is whatever the result extraction
/// produced and must be re-derived downstream, never assumed stable across
/// cycles. `labels` are only valid within the cycle that wrote the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSetRecord {
    /// Node labels in the model copy that produced this record.
    pub labels: Vec<i32>,
    /// Undeformed positions.
    pub x: Vec<Vector2<f64>>,
    /// End-of-cycle displacements.
    pub u: Vec<Vector2<f64>>,
    /// End-of-cycle velocities.
    pub v: Vec<Vector2<f64>>,
}

impl NodeSetRecord {
    /// Number of nodes in the record.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the record holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Check that all per-node arrays have the same length.
    pub fn check_consistent(&self, set_name: &str) -> Result<(), String> {
        let n = self.labels.len();
        if self.x.len() != n || self.u.len() != n || self.v.len() != n {
            return Err(format!(
                "{set_name} record has mismatched array lengths: labels={}, x={}, u={}, v={}",
                n,
                self.x.len(),
                self.u.len(),
                self.v.len()
            ));
        }
        Ok(())
    }
}

/// Complete snapshot of one finished cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSnapshot {
    /// Cycle that produced the snapshot.
    pub cycle: u32,
    /// Reference-point kinematics.
    pub rp: RefPointRecord,
    /// Wheel contact-node kinematics.
    pub wheel: NodeSetRecord,
    /// Rail contact-node kinematics.
    pub rail: NodeSetRecord,
}

impl CycleSnapshot {
    /// Check the array-length invariant of both node-set records.
    pub fn check_consistent(&self) -> Result<(), String> {
        self.wheel.check_consistent("wheel")?;
        self.rail.check_consistent("rail")
    }
}
