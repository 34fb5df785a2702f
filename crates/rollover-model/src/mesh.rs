//! Live-model state: contact node sets and step history.
//!
//! Node labels are assigned by the meshing subsystem and are only valid
//! within the model copy that produced them. Everything downstream treats a
//! label as a transient handle; durable node identity is geometric.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// A single node of a contact node set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactNode {
    /// Node label in the current model copy.
    pub label: i32,
    /// Undeformed in-plane coordinates.
    pub coords: Vector2<f64>,
}

impl ContactNode {
    /// Create a new contact node.
    pub fn new(label: i32, x: f64, y: f64) -> Self {
        Self {
            label,
            coords: Vector2::new(x, y),
        }
    }
}

/// Wheel and rail contact node sets of one model copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactMesh {
    /// Wheel contact nodes (order as delivered by the mesher, arbitrary).
    pub wheel_contact_nodes: Vec<ContactNode>,
    /// Rail contact nodes (order as delivered by the mesher, arbitrary).
    pub rail_contact_nodes: Vec<ContactNode>,
}

impl ContactMesh {
    /// Number of wheel contact nodes.
    pub fn num_wheel_nodes(&self) -> usize {
        self.wheel_contact_nodes.len()
    }

    /// Number of rail contact nodes.
    pub fn num_rail_nodes(&self) -> usize {
        self.rail_contact_nodes.len()
    }
}

/// Handle to the model a new cycle is built on: its name, its live contact
/// mesh and the names of the analysis steps it already contains.
///
/// A new cycle's model is a copy of the previous cycle's model, so
/// [`ModelState::last_step`] of that copy is the step the restart chain
/// must continue from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelState {
    /// Model name, e.g. `rollover_00003`.
    pub name: String,
    /// Current contact node sets.
    pub mesh: ContactMesh,
    /// Analysis step names in definition order.
    pub steps: Vec<String>,
}

impl ModelState {
    /// Create a model state.
    pub fn new(name: impl Into<String>, mesh: ContactMesh, steps: Vec<String>) -> Self {
        Self {
            name: name.into(),
            mesh,
            steps,
        }
    }

    /// Name of the last analysis step, if any.
    pub fn last_step(&self) -> Option<&str> {
        self.steps.last().map(String::as_str)
    }
}
