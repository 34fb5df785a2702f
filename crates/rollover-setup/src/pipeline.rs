//! Cycle setup pipeline: from the previous cycle's snapshot to a
//! validated restart schedule for the next one.

use rollover_model::{ModelState, RolloverConfig, naming};
use rollover_results::SnapshotStore;

use crate::contact;
use crate::correspondence::{resolve_rail, resolve_wheel};
use crate::error::{Result, SetupError};
use crate::rollback;
use crate::schedule::{BcKind, BcValue, RegionId, RestartSchedule, Stage, StageValues};
use crate::strategy::{PriorState, strategy_for};

/// Step the restart chain continues from when the model carries no
/// cycle history yet.
const INITIAL_STEP: &str = "Initial";

/// Everything one cycle's setup needs: the cycle number, the live model
/// it operates on and the simulation configuration.
#[derive(Debug, Clone, Copy)]
pub struct CycleContext<'a> {
    /// Cycle being set up (1-based).
    pub cycle: u32,
    /// Live model the schedule will be applied to.
    pub model: &'a ModelState,
    /// Simulation configuration.
    pub config: &'a RolloverConfig,
}

impl CycleContext<'_> {
    /// Name of the step the new chain continues from.
    fn previous_step(&self) -> &str {
        self.model.last_step().unwrap_or(INITIAL_STEP)
    }
}

/// Build the first cycle's schedule: a single rolling stage with no state
/// transfer, chained onto whatever preparation steps the model carries.
pub fn initial_schedule(ctx: &CycleContext) -> Result<RestartSchedule> {
    ctx.config.validate()?;
    let rolling = &ctx.config.rolling;
    let incr = &ctx.config.increments;
    let rolling_name = naming::rolling_stage(ctx.cycle);

    let dt0 = rolling.time / incr.nom_num_incr_rolling as f64;
    let dt_min = rolling.time / (incr.max_num_incr_rolling as f64 + 1.0);

    let mut schedule = RestartSchedule::new();
    schedule.add_stage(Stage::auto(
        &rolling_name,
        ctx.previous_step(),
        rolling.time,
        incr.max_num_incr_rolling,
        dt0,
        dt_min,
        dt0,
    ))?;

    schedule
        .existing_bc(
            naming::WHEEL_CTRL_BC,
            BcKind::Displacement,
            RegionId::ReferencePoint,
        )
        .set_in_stage(
            &rolling_name,
            StageValues::all(
                BcValue::Prescribed(rolling.length),
                BcValue::Freed,
                BcValue::Prescribed(rolling.angle),
            ),
        );

    schedule.mark_restart(1)?;
    schedule.validate()?;
    Ok(schedule)
}

/// Set up cycle `ctx.cycle` from the snapshot of the previous one.
///
/// Loads the previous cycle's end state, resolves it onto the live mesh,
/// plans the rigid move-back and hands the pieces to the configured
/// return strategy. The returned schedule is validated and carries a
/// restart checkpoint on its final stage.
pub fn setup_next_cycle(ctx: &CycleContext, store: &SnapshotStore) -> Result<RestartSchedule> {
    // Cycles are 1-based; the first one starts via `initial_schedule`.
    if ctx.cycle < 2 {
        return Err(SetupError::NoPriorCycle(ctx.cycle));
    }
    ctx.config.validate()?;

    let last_step = ctx
        .model
        .last_step()
        .ok_or_else(|| SetupError::UnresolvedPreviousStep {
            model: ctx.model.name.clone(),
        })?
        .to_string();

    let previous_cycle = ctx.cycle - 1;
    let snapshot = store.load(previous_cycle)?;

    let wheel = resolve_wheel(
        &snapshot.wheel,
        &snapshot.rp,
        &ctx.model.mesh.wheel_contact_nodes,
    )?;
    let rail = resolve_rail(&snapshot.rail, &ctx.model.mesh.rail_contact_nodes)?;

    let plan = rollback::plan(snapshot.rp.ur, wheel.pitch);
    let window = contact::detect(&wheel, &snapshot.rp, ctx.config.max_contact_length);
    if window.is_empty() {
        eprintln!(
            "cycle {}: no nodes inside the contact patch, skipping state transfer",
            ctx.cycle
        );
    }

    let prior = PriorState {
        rp: snapshot.rp,
        wheel,
        rail,
        last_step,
    };

    let strategy = strategy_for(ctx.config.return_method);
    eprintln!(
        "cycle {}: {} pitches rolled, residual {:.3e} rad, {} contact nodes, strategy {}",
        ctx.cycle,
        plan.num_pitches,
        plan.residual_angle,
        window.len(),
        strategy.name()
    );

    let mut schedule = strategy.build(ctx, &prior, &plan, &window)?;
    schedule.mark_restart(1)?;
    schedule.validate()?;
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollover_model::ContactMesh;

    #[test]
    fn initial_schedule_is_a_single_rolling_stage() {
        let config = RolloverConfig::default();
        let model = ModelState::new("rollover_00001", ContactMesh::default(), Vec::new());
        let ctx = CycleContext {
            cycle: 1,
            model: &model,
            config: &config,
        };

        let schedule = initial_schedule(&ctx).expect("initial schedule");
        assert_eq!(schedule.stages.len(), 1);
        assert_eq!(schedule.stages[0].name, "rolling_00001");
        assert_eq!(schedule.stages[0].previous, "Initial");
        assert_eq!(schedule.stages[0].restart_intervals, Some(1));
    }

    #[test]
    fn initial_schedule_chains_onto_existing_steps() {
        let config = RolloverConfig::default();
        let model = ModelState::new(
            "rollover_00001",
            ContactMesh::default(),
            vec!["Preload".to_string()],
        );
        let ctx = CycleContext {
            cycle: 1,
            model: &model,
            config: &config,
        };

        let schedule = initial_schedule(&ctx).expect("initial schedule");
        assert_eq!(schedule.stages[0].previous, "Preload");
    }

    #[test]
    fn cycles_without_a_predecessor_cannot_restart() {
        let config = RolloverConfig::default();
        let model = ModelState::new("rollover_00001", ContactMesh::default(), Vec::new());
        let store = SnapshotStore::new("unused");
        for cycle in [0, 1] {
            let ctx = CycleContext {
                cycle,
                model: &model,
                config: &config,
            };
            assert!(matches!(
                setup_next_cycle(&ctx, &store),
                Err(SetupError::NoPriorCycle(c)) if c == cycle
            ));
        }
    }

    #[test]
    fn invalid_configuration_is_rejected_up_front() {
        let mut config = RolloverConfig::default();
        config.rolling.time = 0.0;
        let model = ModelState::new("rollover_00001", ContactMesh::default(), Vec::new());
        let ctx = CycleContext {
            cycle: 1,
            model: &model,
            config: &config,
        };
        assert!(matches!(
            initial_schedule(&ctx),
            Err(SetupError::Configuration(_))
        ));
    }
}
