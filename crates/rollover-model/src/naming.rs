//! Deterministic names for models, jobs, stages, sets and boundary
//! conditions.
//!
//! Every name referenced from more than one place in the workflow is
//! defined here, so that the setup code, the result extraction and the job
//! submission all agree on what things are called.

/// Base name shared by all models and jobs of one simulation.
pub const MODEL_BASE: &str = "rollover";

/// Wheel part/instance name.
pub const WHEEL_PART: &str = "WHEEL";
/// Rail part/instance name.
pub const RAIL_PART: &str = "RAIL";
/// Contact node set name (same on wheel and rail).
pub const CONTACT_NODES: &str = "CONTACT_NODES";
/// Reference point set name on the wheel.
pub const WHEEL_RP_SET: &str = "RP";
/// Boundary condition controlling the wheel reference point.
pub const WHEEL_CTRL_BC: &str = "WHEEL_CTRL";

/// Zero-padded cycle number used as a suffix in generated names.
pub fn cycle_str(cycle: u32) -> String {
    format!("{cycle:05}")
}

/// Model name for the given cycle, e.g. `rollover_00003`.
pub fn model_name(cycle: u32) -> String {
    format!("{MODEL_BASE}_{}", cycle_str(cycle))
}

/// Job name for the given cycle. Jobs are named after their model.
pub fn job_name(cycle: u32) -> String {
    model_name(cycle)
}

/// Main rolling stage of a cycle.
pub fn rolling_stage(cycle: u32) -> String {
    format!("rolling_{}", cycle_str(cycle))
}

/// Move-back stage returning the wheel to its start orientation.
pub fn return_stage(cycle: u32) -> String {
    format!("return_{}", cycle_str(cycle))
}

/// Load re-application stage (reapply strategy only).
pub fn reapply_stage(cycle: u32) -> String {
    format!("reapply_{}", cycle_str(cycle))
}

/// Lift-out-of-contact stage (full move-back strategy only).
pub fn move_up_stage(cycle: u32) -> String {
    format!("move_up_{}", cycle_str(cycle))
}

/// Lower-into-contact stage (full move-back strategy only).
pub fn move_down_stage(cycle: u32) -> String {
    format!("move_dw_{}", cycle_str(cycle))
}

/// Short rolling ramp-in stage (full move-back strategy only).
pub fn roll_start_stage(cycle: u32) -> String {
    format!("roll_start_{}", cycle_str(cycle))
}

/// Short rolling ramp-out stage (full move-back strategy only).
pub fn roll_end_stage(cycle: u32) -> String {
    format!("roll_end_{}", cycle_str(cycle))
}

/// Per-node wheel transplant BC name, keyed by the live node label.
pub fn wheel_node_bc(return_stage: &str, label: i32) -> String {
    format!("{return_stage}_wheel_{label}")
}

/// Per-node rail lock BC name, keyed by the live node label.
pub fn rail_node_bc(return_stage: &str, label: i32) -> String {
    format!("{return_stage}_rail_{label}")
}

/// Rail contact-set lock BC name.
pub fn rail_lock_bc(return_stage: &str) -> String {
    format!("{return_stage}_lockrail")
}

/// Wheel rigid-body-motion velocity BC name (full move-back strategy).
pub fn wheel_rbm_bc(cycle: u32) -> String {
    format!("wheel_rbm_{}", cycle_str(cycle))
}

/// Snapshot file name for one sub-record of a cycle's results.
pub fn snapshot_file(cycle: u32, record: &str) -> String {
    format!("{}_{record}.json", model_name(cycle))
}
