//! Restart schedules: the ordered stage chain and per-stage boundary
//! values handed to the job submission.
//!
//! A schedule is the complete recipe for continuing an analysis from the
//! previous job's final step: a strict linear chain of stages (each naming
//! its predecessor) plus, for every affected boundary condition, the
//! values it takes in each stage and the stage in which it hands control
//! back to the contact solve.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// Value prescribed for one component of a boundary condition in a stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BcValue {
    /// Component is driven to this value over the stage.
    Prescribed(f64),
    /// Component is released to the natural solution.
    Freed,
}

/// Per-stage component values of a boundary condition.
///
/// For displacement conditions the components are (u1, u2, ur3); for
/// velocity conditions (v1, v2, v3). `None` leaves a component untouched
/// in that stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StageValues {
    pub c1: Option<BcValue>,
    pub c2: Option<BcValue>,
    pub c3: Option<BcValue>,
}

impl StageValues {
    /// Set all three components.
    pub fn all(c1: BcValue, c2: BcValue, c3: BcValue) -> Self {
        Self {
            c1: Some(c1),
            c2: Some(c2),
            c3: Some(c3),
        }
    }

    /// Set the two in-plane components, leaving the third untouched.
    pub fn planar(c1: BcValue, c2: BcValue) -> Self {
        Self {
            c1: Some(c1),
            c2: Some(c2),
            c3: None,
        }
    }
}

/// What a boundary condition drives: displacements or velocities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BcKind {
    Displacement,
    Velocity,
}

/// Region a boundary condition applies to, resolvable by the job
/// submission against the live model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionId {
    /// The wheel control reference point.
    ReferencePoint,
    /// A single wheel contact node, by live label.
    WheelNode(i32),
    /// A single rail contact node, by live label.
    RailNode(i32),
    /// The whole wheel contact node set.
    WheelContactSet,
    /// The whole rail contact node set.
    RailContactSet,
}

/// One analysis stage of the restart chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Stage name, unique within the chain.
    pub name: String,
    /// Predecessor stage. For the first stage of the chain this is the
    /// last step of the previous job.
    pub previous: String,
    /// Stage duration.
    pub time_period: f64,
    /// Hard cap on the number of increments.
    pub max_num_inc: usize,
    /// First increment size.
    pub initial_inc: f64,
    /// Smallest admissible increment (automatic incrementation only).
    pub min_inc: Option<f64>,
    /// Largest admissible increment (automatic incrementation only).
    pub max_inc: Option<f64>,
    /// Fixed-size increments instead of automatic control.
    pub fixed_increments: bool,
    /// Apply boundary updates as a step function at the stage start
    /// instead of ramping over the stage.
    pub step_amplitude: bool,
    /// Number of restart checkpoint intervals written during the stage.
    pub restart_intervals: Option<u32>,
}

impl Stage {
    /// Stage with fixed increments of size `initial_inc` and unit duration.
    pub fn fixed(name: impl Into<String>, previous: impl Into<String>, initial_inc: f64, max_num_inc: usize) -> Self {
        Self {
            name: name.into(),
            previous: previous.into(),
            time_period: 1.0,
            max_num_inc,
            initial_inc,
            min_inc: None,
            max_inc: None,
            fixed_increments: true,
            step_amplitude: false,
            restart_intervals: None,
        }
    }

    /// Stage with automatic incrementation between `min_inc` and `max_inc`.
    pub fn auto(
        name: impl Into<String>,
        previous: impl Into<String>,
        time_period: f64,
        max_num_inc: usize,
        initial_inc: f64,
        min_inc: f64,
        max_inc: f64,
    ) -> Self {
        Self {
            name: name.into(),
            previous: previous.into(),
            time_period,
            max_num_inc,
            initial_inc,
            min_inc: Some(min_inc),
            max_inc: Some(max_inc),
            fixed_increments: false,
            step_amplitude: false,
            restart_intervals: None,
        }
    }

    /// Override the stage duration.
    pub fn with_time_period(mut self, time_period: f64) -> Self {
        self.time_period = time_period;
        self
    }

    /// Apply boundary updates as a step function.
    pub fn with_step_amplitude(mut self) -> Self {
        self.step_amplitude = true;
        self
    }
}

/// Staged value history of one boundary condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundarySchedule {
    /// Boundary condition name.
    pub name: String,
    /// Displacement or velocity condition.
    pub kind: BcKind,
    /// Region the condition acts on.
    pub region: RegionId,
    /// Stage the condition is created in; `None` for conditions that
    /// already exist in the model and are only modified.
    pub created_in: Option<String>,
    /// Component values per stage name.
    pub values: BTreeMap<String, StageValues>,
    /// Stage at whose start the condition is deactivated, handing the
    /// region back to the natural contact solve.
    pub deactivated_in: Option<String>,
}

impl BoundarySchedule {
    /// Set the condition's values in a stage.
    pub fn set_in_stage(&mut self, stage: impl Into<String>, values: StageValues) -> &mut Self {
        self.values.insert(stage.into(), values);
        self
    }

    /// Deactivate the condition at the start of `stage`.
    pub fn deactivate(&mut self, stage: impl Into<String>) -> &mut Self {
        self.deactivated_in = Some(stage.into());
        self
    }
}

/// Ordered stage chain plus boundary-condition value changes for one
/// cycle's restart. Built once, validated, handed to the job submission,
/// then discarded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestartSchedule {
    /// Stages in chain order.
    pub stages: Vec<Stage>,
    /// Boundary conditions touched by the schedule.
    pub boundaries: Vec<BoundarySchedule>,
}

impl RestartSchedule {
    /// Empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage to the chain.
    ///
    /// The stage must link to the current chain tail (or start the chain)
    /// and carry a positive duration and increment sizes.
    pub fn add_stage(&mut self, stage: Stage) -> Result<(), SetupError> {
        if stage.time_period <= 0.0 {
            return Err(SetupError::Schedule(format!(
                "stage {} has non-positive duration {}",
                stage.name, stage.time_period
            )));
        }
        if stage.initial_inc <= 0.0 {
            return Err(SetupError::Schedule(format!(
                "stage {} has non-positive initial increment {}",
                stage.name, stage.initial_inc
            )));
        }
        if let Some(last) = self.stages.last()
            && stage.previous != last.name
        {
            return Err(SetupError::Schedule(format!(
                "stage {} links to {} but the chain ends at {}",
                stage.name, stage.previous, last.name
            )));
        }
        self.stages.push(stage);
        Ok(())
    }

    /// Name of the chain's last stage.
    pub fn last_stage_name(&self) -> Option<&str> {
        self.stages.last().map(|s| s.name.as_str())
    }

    /// Look up a stage by name.
    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }

    /// Look up a boundary condition by name.
    pub fn boundary(&self, name: &str) -> Option<&BoundarySchedule> {
        self.boundaries.iter().find(|b| b.name == name)
    }

    /// Start scheduling values for a condition that already exists in the
    /// model (e.g. the wheel control condition).
    pub fn existing_bc(
        &mut self,
        name: impl Into<String>,
        kind: BcKind,
        region: RegionId,
    ) -> &mut BoundarySchedule {
        self.boundaries.push(BoundarySchedule {
            name: name.into(),
            kind,
            region,
            created_in: None,
            values: BTreeMap::new(),
            deactivated_in: None,
        });
        let last = self.boundaries.len() - 1;
        &mut self.boundaries[last]
    }

    /// Create a new condition in `created_in` and start scheduling it.
    pub fn create_bc(
        &mut self,
        name: impl Into<String>,
        kind: BcKind,
        region: RegionId,
        created_in: impl Into<String>,
    ) -> &mut BoundarySchedule {
        self.boundaries.push(BoundarySchedule {
            name: name.into(),
            kind,
            region,
            created_in: Some(created_in.into()),
            values: BTreeMap::new(),
            deactivated_in: None,
        });
        let last = self.boundaries.len() - 1;
        &mut self.boundaries[last]
    }

    /// Mark the chain's last stage with a restart checkpoint so a future
    /// cycle can resume from it.
    pub fn mark_restart(&mut self, intervals: u32) -> Result<(), SetupError> {
        match self.stages.last_mut() {
            Some(stage) => {
                stage.restart_intervals = Some(intervals);
                Ok(())
            }
            None => Err(SetupError::Schedule(
                "cannot mark restart on an empty schedule".to_string(),
            )),
        }
    }

    /// Check the chain invariants: non-empty, strictly linear, restart
    /// checkpoint on the final stage, and every stage referenced by a
    /// boundary condition exists.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.stages.is_empty() {
            return Err(SetupError::Schedule("schedule has no stages".to_string()));
        }
        for pair in self.stages.windows(2) {
            if pair[1].previous != pair[0].name {
                return Err(SetupError::Schedule(format!(
                    "stage chain is broken between {} and {}",
                    pair[0].name, pair[1].name
                )));
            }
        }
        let last = &self.stages[self.stages.len() - 1];
        if last.restart_intervals.is_none() {
            return Err(SetupError::Schedule(format!(
                "final stage {} carries no restart checkpoint",
                last.name
            )));
        }

        for bc in &self.boundaries {
            let mut referenced: Vec<&String> = bc.values.keys().collect();
            if let Some(created) = &bc.created_in {
                referenced.push(created);
            }
            if let Some(deactivated) = &bc.deactivated_in {
                referenced.push(deactivated);
            }
            for stage in referenced {
                if self.stage(stage).is_none() {
                    return Err(SetupError::Schedule(format!(
                        "boundary condition {} references unknown stage {stage}",
                        bc.name
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BcValue::{Freed, Prescribed};

    fn two_stage_schedule() -> RestartSchedule {
        let mut schedule = RestartSchedule::new();
        schedule
            .add_stage(Stage::fixed("return_00002", "rolling_00001", 1.0, 2).with_step_amplitude())
            .expect("first stage");
        schedule
            .add_stage(Stage::auto(
                "rolling_00002",
                "return_00002",
                1.0,
                1000,
                0.01,
                0.001,
                0.01,
            ))
            .expect("second stage");
        schedule
    }

    #[test]
    fn chain_must_link_to_the_tail() {
        let mut schedule = two_stage_schedule();
        let err = schedule
            .add_stage(Stage::fixed("reapply_00002", "return_00002", 1.0, 2))
            .expect_err("must reject out-of-order link");
        assert!(matches!(err, SetupError::Schedule(_)));
    }

    #[test]
    fn rejects_non_positive_duration() {
        let mut schedule = RestartSchedule::new();
        let stage = Stage::fixed("return_00002", "rolling_00001", 1.0, 2).with_time_period(0.0);
        assert!(matches!(
            schedule.add_stage(stage),
            Err(SetupError::Schedule(_))
        ));
    }

    #[test]
    fn validation_requires_a_restart_checkpoint() {
        let mut schedule = two_stage_schedule();
        assert!(matches!(
            schedule.validate(),
            Err(SetupError::Schedule(msg)) if msg.contains("restart checkpoint")
        ));
        schedule.mark_restart(1).expect("mark restart");
        assert!(schedule.validate().is_ok());
        assert_eq!(
            schedule.stage("rolling_00002").unwrap().restart_intervals,
            Some(1)
        );
    }

    #[test]
    fn boundary_values_must_reference_known_stages() {
        let mut schedule = two_stage_schedule();
        schedule.mark_restart(1).expect("mark restart");
        schedule
            .existing_bc("WHEEL_CTRL", BcKind::Displacement, RegionId::ReferencePoint)
            .set_in_stage("no_such_stage", StageValues::planar(Prescribed(0.0), Freed));
        assert!(matches!(
            schedule.validate(),
            Err(SetupError::Schedule(msg)) if msg.contains("no_such_stage")
        ));
    }

    #[test]
    fn deactivation_is_recorded_per_condition() {
        let mut schedule = two_stage_schedule();
        schedule.mark_restart(1).expect("mark restart");
        schedule
            .create_bc(
                "return_00002_wheel_42",
                BcKind::Displacement,
                RegionId::WheelNode(42),
                "return_00002",
            )
            .set_in_stage(
                "return_00002",
                StageValues::planar(Prescribed(0.001), Prescribed(-0.002)),
            )
            .deactivate("rolling_00002");
        schedule.validate().expect("schedule should be valid");

        let bc = schedule.boundary("return_00002_wheel_42").unwrap();
        assert_eq!(bc.deactivated_in.as_deref(), Some("rolling_00002"));
        assert_eq!(bc.region, RegionId::WheelNode(42));
    }
}
