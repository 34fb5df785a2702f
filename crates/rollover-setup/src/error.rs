//! Error types for cycle-advance setup.

use thiserror::Error;

use rollover_model::ConfigError;
use rollover_results::SnapshotError;

use crate::correspondence::CorrespondenceError;

pub type Result<T> = std::result::Result<T, SetupError>;

/// Fatal errors aborting a cycle-advance.
///
/// None of these is retryable: without the previous job's state the
/// boundary values of the next job would be physically meaningless, so no
/// partial schedule is ever handed to the job submission.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Prior-cycle snapshot unavailable: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Cycle {0} has no previous cycle to restart from")]
    NoPriorCycle(u32),

    #[error("Cannot resolve the last step of the previous job in model {model}")]
    UnresolvedPreviousStep { model: String },

    #[error(transparent)]
    Correspondence(#[from] CorrespondenceError),

    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Invalid restart schedule: {0}")]
    Schedule(String),
}
