//! Domain types shared across the rollover workspace.
//!
//! This crate provides:
//! - **Naming conventions** for models, jobs, analysis stages, node sets
//!   and boundary conditions (one cycle = one model copy, names derived
//!   deterministically from the cycle number)
//! - **Live-model state**: the current contact-node labels/coordinates and
//!   step history of the model a new cycle is built on
//! - **Configuration** for the cycle-advance setup (restart strategy,
//!   rolling timing, increment control)

pub mod config;
pub mod mesh;
pub mod naming;

pub use config::{ConfigError, IncrementParams, ReturnMethod, RollingParams, RolloverConfig};
pub use mesh::{ContactMesh, ContactNode, ModelState};
