//! Cycle-advance setup for rolling contact fatigue simulations.
//!
//! Repeated wheel passes over the same rail section are simulated as
//! restart cycles: each cycle rolls the wheel once, records the contact
//! state and hands it to this crate, which builds the restart schedule
//! returning the wheel to its start orientation with the accumulated
//! deformation state transplanted onto the nodes now in contact.

pub mod contact;
pub mod correspondence;
pub mod error;
pub mod pipeline;
pub mod rollback;
pub mod schedule;
pub mod strategy;

pub use contact::{ContactWindow, detect};
pub use correspondence::{
    CorrespondenceError, SortedRailState, SortedWheelState, resolve_rail, resolve_wheel,
};
pub use error::{Result, SetupError};
pub use pipeline::{CycleContext, initial_schedule, setup_next_cycle};
pub use rollback::{RollBackPlan, plan, shift_index};
pub use schedule::{
    BcKind, BcValue, BoundarySchedule, RegionId, RestartSchedule, Stage, StageValues,
};
pub use strategy::{PriorState, ReturnStrategy, strategy_for, transplanted_displacement};
