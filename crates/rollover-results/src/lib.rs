//! Result store for the rollover workspace.
//!
//! This crate provides:
//! - **Per-cycle snapshot records**: reference-point, wheel-node and
//!   rail-node kinematics extracted at the end of a cycle's analysis job
//! - **JSON persistence** of those records, one file per sub-record,
//!   written atomically (temp file + rename) so a snapshot can never be
//!   read half-written
//!
//! Snapshots are written exactly once by the completed cycle and read
//! exactly once by the next cycle's setup; they are immutable after write.

pub mod snapshot;
pub mod store;

pub use snapshot::{CycleSnapshot, NodeSetRecord, RefPointRecord};
pub use store::{SnapshotError, SnapshotStore};
