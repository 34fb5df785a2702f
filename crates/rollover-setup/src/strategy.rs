//! Restart strategies: interchangeable recipes for moving the wheel back
//! to its canonical start orientation between rolling passes.
//!
//! All strategies share one contract: transplant the previously-contacting
//! nodes' deformation state (relative to the moving reference point) onto
//! the nodes that now occupy those material positions, hold the rail still
//! while the wheel is repositioned, and hand control back to the contact
//! solve exactly at the start of the main rolling stage.

use nalgebra::Vector2;

use rollover_model::config::ReturnMethod;
use rollover_model::naming;
use rollover_results::RefPointRecord;

use crate::contact::ContactWindow;
use crate::correspondence::{SortedRailState, SortedWheelState};
use crate::error::SetupError;
use crate::pipeline::CycleContext;
use crate::rollback::{RollBackPlan, shift_index};
use crate::schedule::{
    BcKind, BcValue, RegionId, RestartSchedule, Stage, StageValues,
};

use BcValue::{Freed, Prescribed};

/// Resolved end state of the previous cycle, in sorted order with live
/// labels attached.
#[derive(Debug, Clone)]
pub struct PriorState {
    /// Reference-point kinematics at the end of the previous cycle.
    pub rp: RefPointRecord,
    /// Angle-sorted wheel contact-node kinematics.
    pub wheel: SortedWheelState,
    /// x-sorted rail contact-node kinematics.
    pub rail: SortedRailState,
    /// Name of the last step of the previous job, the restart chain's
    /// anchor.
    pub last_step: String,
}

/// A restart strategy builds the full stage chain for one cycle.
pub trait ReturnStrategy {
    /// Strategy name for reporting.
    fn name(&self) -> &'static str;

    /// Build the restart schedule for `ctx.cycle`.
    fn build(
        &self,
        ctx: &CycleContext,
        prior: &PriorState,
        plan: &RollBackPlan,
        window: &ContactWindow,
    ) -> Result<RestartSchedule, SetupError>;
}

/// Strategy implementation selected by configuration.
pub fn strategy_for(method: ReturnMethod) -> Box<dyn ReturnStrategy> {
    match method {
        ReturnMethod::Quick => Box::new(QuickMoveBack),
        ReturnMethod::Reapply => Box::new(MoveBackReapplyLoad),
        ReturnMethod::Full => Box::new(FullMoveBack),
    }
}

/// Displacement to prescribe on the node at sorted rank `new_index` so
/// that it reproduces, relative to the repositioned reference point, the
/// deformation the node at rank `old_index` had relative to the old one.
///
/// The reference point returns to `x = 0` at height `u2_end`; a node's
/// position relative to the old reference point equals its position
/// relative to the new one, and the prescribed displacement is measured
/// from the new node's undeformed position.
pub fn transplanted_displacement(
    wheel: &SortedWheelState,
    old_index: usize,
    new_index: usize,
    rp: &RefPointRecord,
    u2_end: f64,
) -> Vector2<f64> {
    let rp_old_deformed = rp.x + rp.u;
    let rp_new = rp.x + Vector2::new(0.0, u2_end);
    let old_deformed = wheel.x[old_index] + wheel.u[old_index];
    rp_new + (old_deformed - rp_old_deformed) - wheel.x[new_index]
}

/// Main rolling stage with the configured increment control.
fn rolling_stage(ctx: &CycleContext, previous: &str, time_period: f64) -> Stage {
    let incr = &ctx.config.increments;
    let dt0 = time_period / incr.nom_num_incr_rolling as f64;
    let dt_min = time_period / (incr.max_num_incr_rolling as f64 + 1.0);
    Stage::auto(
        naming::rolling_stage(ctx.cycle),
        previous,
        time_period,
        incr.max_num_incr_rolling,
        dt0,
        dt_min,
        dt0,
    )
}

/// Prescribe the transplanted displacements of the contact window on the
/// shifted nodes, active from `active_in` until `released_in`.
fn add_wheel_transplants(
    schedule: &mut RestartSchedule,
    prior: &PriorState,
    plan: &RollBackPlan,
    window: &ContactWindow,
    u2_end: f64,
    active_in: &str,
    released_in: &str,
) {
    let node_count = prior.wheel.len();
    for old_index in window.indices() {
        let new_index = shift_index(old_index, plan.num_pitches, node_count);
        let label = prior.wheel.labels[new_index];
        let u_new = transplanted_displacement(&prior.wheel, old_index, new_index, &prior.rp, u2_end);

        schedule
            .create_bc(
                naming::wheel_node_bc(active_in, label),
                BcKind::Displacement,
                RegionId::WheelNode(label),
                active_in,
            )
            .set_in_stage(
                active_in,
                StageValues::planar(Prescribed(u_new.x), Prescribed(u_new.y)),
            )
            .deactivate(released_in);
    }
}

/// Lock the rail contact node set still from `active_in`, releasing it at
/// `released_in`.
fn add_rail_lock(schedule: &mut RestartSchedule, active_in: &str, released_in: &str) {
    schedule
        .create_bc(
            naming::rail_lock_bc(active_in),
            BcKind::Velocity,
            RegionId::RailContactSet,
            active_in,
        )
        .set_in_stage(
            active_in,
            StageValues::all(Prescribed(0.0), Prescribed(0.0), Prescribed(0.0)),
        )
        .deactivate(released_in);
}

/// Single step-function return stage straight into rolling.
///
/// Cheapest strategy: the prior relative displacements are re-imposed in
/// one fixed increment and the rolling stage starts immediately.
pub struct QuickMoveBack;

impl ReturnStrategy for QuickMoveBack {
    fn name(&self) -> &'static str {
        "quick_moveback"
    }

    fn build(
        &self,
        ctx: &CycleContext,
        prior: &PriorState,
        plan: &RollBackPlan,
        window: &ContactWindow,
    ) -> Result<RestartSchedule, SetupError> {
        let rolling = &ctx.config.rolling;
        let return_name = naming::return_stage(ctx.cycle);
        let rolling_name = naming::rolling_stage(ctx.cycle);

        let u2_end = prior.rp.u.y;
        let return_angle = plan.residual_angle;

        let mut schedule = RestartSchedule::new();
        schedule.add_stage(
            Stage::fixed(&return_name, &prior.last_step, 1.0, 2).with_step_amplitude(),
        )?;
        schedule.add_stage(rolling_stage(ctx, &return_name, rolling.time))?;

        schedule
            .existing_bc(
                naming::WHEEL_CTRL_BC,
                BcKind::Displacement,
                RegionId::ReferencePoint,
            )
            .set_in_stage(
                &return_name,
                StageValues::all(
                    Prescribed(0.0),
                    Prescribed(u2_end),
                    Prescribed(return_angle),
                ),
            )
            .set_in_stage(
                &rolling_name,
                StageValues::all(
                    Prescribed(rolling.length),
                    Freed,
                    Prescribed(rolling.angle + return_angle),
                ),
            );

        add_wheel_transplants(
            &mut schedule,
            prior,
            plan,
            window,
            u2_end,
            &return_name,
            &rolling_name,
        );

        if ctx.config.lock_rail {
            add_rail_lock(&mut schedule, &return_name, &rolling_name);
        }

        Ok(schedule)
    }
}

/// Quick move-back with an explicit load re-application stage.
///
/// The vertical displacement is held over the return, then released in a
/// short reapply stage so contact pressure is re-established by the load
/// before rolling starts. Avoids the torque oscillations a hard
/// displacement jump can excite at the first rolling increments.
pub struct MoveBackReapplyLoad;

/// Duration of the near-instantaneous return/reapply stages.
const REAPPLY_STAGE_TIME: f64 = 1.0e-6;

impl ReturnStrategy for MoveBackReapplyLoad {
    fn name(&self) -> &'static str {
        "moveback_reapply_load"
    }

    fn build(
        &self,
        ctx: &CycleContext,
        prior: &PriorState,
        plan: &RollBackPlan,
        window: &ContactWindow,
    ) -> Result<RestartSchedule, SetupError> {
        let rolling = &ctx.config.rolling;
        let return_name = naming::return_stage(ctx.cycle);
        let reapply_name = naming::reapply_stage(ctx.cycle);
        let rolling_name = naming::rolling_stage(ctx.cycle);

        let u2_end = prior.rp.u.y;
        let return_angle = plan.residual_angle;

        let mut schedule = RestartSchedule::new();
        schedule.add_stage(
            Stage::fixed(&return_name, &prior.last_step, REAPPLY_STAGE_TIME, 2)
                .with_time_period(REAPPLY_STAGE_TIME)
                .with_step_amplitude(),
        )?;
        schedule.add_stage(
            Stage::fixed(&reapply_name, &return_name, REAPPLY_STAGE_TIME, 2)
                .with_time_period(REAPPLY_STAGE_TIME)
                .with_step_amplitude(),
        )?;
        schedule.add_stage(rolling_stage(ctx, &reapply_name, rolling.time))?;

        schedule
            .existing_bc(
                naming::WHEEL_CTRL_BC,
                BcKind::Displacement,
                RegionId::ReferencePoint,
            )
            .set_in_stage(
                &return_name,
                StageValues::all(
                    Prescribed(0.0),
                    Prescribed(u2_end),
                    Prescribed(return_angle),
                ),
            )
            .set_in_stage(
                &reapply_name,
                StageValues::all(Prescribed(0.0), Freed, Prescribed(return_angle)),
            )
            .set_in_stage(
                &rolling_name,
                StageValues::all(
                    Prescribed(rolling.length),
                    Freed,
                    Prescribed(rolling.angle + return_angle),
                ),
            );

        add_wheel_transplants(
            &mut schedule,
            prior,
            plan,
            window,
            u2_end,
            &return_name,
            &rolling_name,
        );

        if ctx.config.lock_rail {
            // Released one stage earlier than in the quick strategy: the
            // rail must be free while the load is reapplied.
            add_rail_lock(&mut schedule, &return_name, &reapply_name);
        }

        Ok(schedule)
    }
}

/// Lift the wheel out of contact, return it, lower it back and ramp into
/// rolling over dedicated short stages.
///
/// Smoother than the quick variants but several stages costlier; used
/// when direct re-contact gives the contact solve convergence trouble.
pub struct FullMoveBack;

/// Vertical clearance lifted during the out-of-contact stages.
const LIFT_HEIGHT: f64 = 1.0;

impl ReturnStrategy for FullMoveBack {
    fn name(&self) -> &'static str {
        "full_moveback"
    }

    fn build(
        &self,
        ctx: &CycleContext,
        prior: &PriorState,
        plan: &RollBackPlan,
        window: &ContactWindow,
    ) -> Result<RestartSchedule, SetupError> {
        let rolling = &ctx.config.rolling;
        let cycle = ctx.cycle;

        let move_up_name = naming::move_up_stage(cycle);
        let return_name = naming::return_stage(cycle);
        let move_down_name = naming::move_down_stage(cycle);
        let roll_start_name = naming::roll_start_stage(cycle);
        let rolling_name = naming::rolling_stage(cycle);
        let roll_end_name = naming::roll_end_stage(cycle);

        let u1_end = prior.rp.u.x;
        let u2_end = prior.rp.u.y;
        let ur_end = prior.rp.ur;
        let return_angle = plan.residual_angle;

        let frac = rolling.end_stp_frac;
        let ramp_time = rolling.time * frac;
        let main_time = rolling.time * (1.0 - 2.0 * frac);

        let mut schedule = RestartSchedule::new();
        schedule.add_stage(Stage::fixed(&move_up_name, &prior.last_step, 0.1, 10))?;
        schedule.add_stage(Stage::fixed(&return_name, &move_up_name, 0.1, 10))?;
        schedule.add_stage(Stage::fixed(&move_down_name, &return_name, 0.1, 10))?;
        schedule.add_stage(Stage::auto(
            &roll_start_name,
            &move_down_name,
            ramp_time,
            30,
            ramp_time / 10.0,
            ramp_time / 20.0,
            ramp_time / 10.0,
        ))?;
        schedule.add_stage(rolling_stage(ctx, &roll_start_name, main_time))?;
        schedule.add_stage(Stage::auto(
            &roll_end_name,
            &rolling_name,
            ramp_time,
            30,
            ramp_time / 10.0,
            ramp_time / 20.0,
            ramp_time / 10.0,
        ))?;

        // Wheel rigid-body lift and lowering via the contact node set.
        schedule
            .create_bc(
                naming::wheel_rbm_bc(cycle),
                BcKind::Velocity,
                RegionId::WheelContactSet,
                &move_up_name,
            )
            .set_in_stage(
                &move_up_name,
                StageValues::planar(Prescribed(0.0), Prescribed(LIFT_HEIGHT)),
            )
            .set_in_stage(&return_name, StageValues::planar(Freed, Freed))
            .set_in_stage(
                &move_down_name,
                StageValues::planar(Prescribed(0.0), Prescribed(-LIFT_HEIGHT)),
            )
            .set_in_stage(&roll_start_name, StageValues::planar(Freed, Freed));

        schedule
            .existing_bc(
                naming::WHEEL_CTRL_BC,
                BcKind::Displacement,
                RegionId::ReferencePoint,
            )
            .set_in_stage(
                &move_up_name,
                StageValues::all(
                    Prescribed(u1_end),
                    Prescribed(u2_end + LIFT_HEIGHT),
                    Prescribed(ur_end),
                ),
            )
            .set_in_stage(
                &return_name,
                StageValues::all(
                    Prescribed(0.0),
                    Prescribed(u2_end + LIFT_HEIGHT),
                    Prescribed(return_angle),
                ),
            )
            .set_in_stage(
                &move_down_name,
                StageValues::all(
                    Prescribed(0.0),
                    Prescribed(u2_end),
                    Prescribed(return_angle),
                ),
            )
            .set_in_stage(
                &roll_start_name,
                StageValues::all(
                    Prescribed(rolling.length * frac),
                    Prescribed(u2_end),
                    Prescribed(rolling.angle * frac + return_angle),
                ),
            )
            .set_in_stage(
                &rolling_name,
                StageValues::all(
                    Prescribed(rolling.length * (1.0 - frac)),
                    Freed,
                    Prescribed(rolling.angle * (1.0 - frac) + return_angle),
                ),
            )
            .set_in_stage(
                &roll_end_name,
                StageValues::all(
                    Prescribed(rolling.length),
                    Freed,
                    Prescribed(rolling.angle + return_angle),
                ),
            );

        // Per-node transplants carry the lift during the return, are freed
        // for the lowering, then ride the old nodal velocity through the
        // ramp-in before the contact solve takes over.
        let node_count = prior.wheel.len();
        for old_index in window.indices() {
            let new_index = shift_index(old_index, plan.num_pitches, node_count);
            let label = prior.wheel.labels[new_index];
            let u_new =
                transplanted_displacement(&prior.wheel, old_index, new_index, &prior.rp, u2_end);
            let u_ramp = u_new + prior.wheel.v[old_index] * ramp_time;

            schedule
                .create_bc(
                    naming::wheel_node_bc(&return_name, label),
                    BcKind::Displacement,
                    RegionId::WheelNode(label),
                    &return_name,
                )
                .set_in_stage(
                    &return_name,
                    StageValues::planar(Prescribed(u_new.x), Prescribed(u_new.y + LIFT_HEIGHT)),
                )
                .set_in_stage(&move_down_name, StageValues::planar(Freed, Freed))
                .set_in_stage(
                    &roll_start_name,
                    StageValues::planar(Prescribed(u_ramp.x), Prescribed(u_ramp.y)),
                )
                .deactivate(&rolling_name);
        }

        // Rail contact nodes are locked individually and ramped back to
        // their end-of-cycle velocities before release.
        for (i, &label) in prior.rail.labels.iter().enumerate() {
            let v = prior.rail.v[i];
            schedule
                .create_bc(
                    naming::rail_node_bc(&return_name, label),
                    BcKind::Velocity,
                    RegionId::RailNode(label),
                    &move_up_name,
                )
                .set_in_stage(
                    &move_up_name,
                    StageValues::all(Prescribed(0.0), Prescribed(0.0), Prescribed(0.0)),
                )
                .set_in_stage(
                    &roll_start_name,
                    StageValues::all(Prescribed(v.x), Prescribed(v.y), Prescribed(0.0)),
                )
                .deactivate(&rolling_name);
        }

        Ok(schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;
    use rollover_results::NodeSetRecord;

    use rollover_model::{ContactMesh, ContactNode, ModelState, RolloverConfig};

    use crate::contact;
    use crate::correspondence::{resolve_rail, resolve_wheel};
    use crate::rollback;

    /// Prior state of a wheel with `count` contact nodes on a `radius`
    /// arc at `pitch_deg` spacing, rolled by `ur_deg`, plus a two-node
    /// rail.
    fn prior_state(count: usize, radius: f64, pitch_deg: f64, ur_deg: f64) -> PriorState {
        let rp = RefPointRecord {
            x: Vector2::new(0.0, radius),
            u: Vector2::new(0.03, -0.0004),
            ur: ur_deg.to_radians(),
            v: Vector2::new(0.05, 0.0),
        };
        let half = (count as f64 - 1.0) / 2.0;
        let coords: Vec<Vector2<f64>> = (0..count)
            .map(|i| {
                let ang = (i as f64 - half) * pitch_deg.to_radians();
                rp.x + radius * Vector2::new(ang.sin(), -ang.cos())
            })
            .collect();
        let wheel_record = NodeSetRecord {
            labels: (1..=count as i32).collect(),
            x: coords.clone(),
            u: vec![Vector2::new(0.03, -0.0003); count],
            v: vec![Vector2::new(0.05, 0.0); count],
        };
        let live_wheel: Vec<ContactNode> = coords
            .iter()
            .enumerate()
            .map(|(i, c)| ContactNode {
                label: 10 + i as i32,
                coords: *c,
            })
            .collect();

        let rail_record = NodeSetRecord {
            labels: vec![201, 202],
            x: vec![Vector2::new(-0.5, 0.0), Vector2::new(0.5, 0.0)],
            u: vec![Vector2::zeros(); 2],
            v: vec![Vector2::new(0.01, 0.0); 2],
        };
        let live_rail = vec![ContactNode::new(301, -0.5, 0.0), ContactNode::new(302, 0.5, 0.0)];

        PriorState {
            wheel: resolve_wheel(&wheel_record, &rp, &live_wheel).expect("wheel resolves"),
            rail: resolve_rail(&rail_record, &live_rail).expect("rail resolves"),
            rp,
            last_step: "rolling_00001".to_string(),
        }
    }

    fn live_model() -> ModelState {
        ModelState::new(
            "rollover_00002",
            ContactMesh::default(),
            vec!["rolling_00001".to_string()],
        )
    }

    fn build_with(method: ReturnMethod) -> RestartSchedule {
        let mut config = RolloverConfig::default();
        config.return_method = method;
        // Wide enough to catch four nodes of the 5 degree arc.
        config.max_contact_length = 0.15;
        let model = live_model();
        let ctx = CycleContext {
            cycle: 2,
            model: &model,
            config: &config,
        };
        let prior = prior_state(8, 0.46, 5.0, 37.0);
        let plan = rollback::plan(prior.rp.ur, prior.wheel.pitch);
        let window = contact::detect(&prior.wheel, &prior.rp, config.max_contact_length);

        let mut schedule = strategy_for(method)
            .build(&ctx, &prior, &plan, &window)
            .expect("strategy should build");
        schedule.mark_restart(1).expect("mark restart");
        schedule.validate().expect("schedule should be valid");
        schedule
    }

    #[test]
    fn quick_chains_return_directly_into_rolling() {
        let schedule = build_with(ReturnMethod::Quick);
        let names: Vec<&str> = schedule.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["return_00002", "rolling_00002"]);
        assert_eq!(schedule.stages[0].previous, "rolling_00001");
        assert_eq!(schedule.stages[1].previous, "return_00002");
        assert!(schedule.stages[0].step_amplitude);
        assert!(schedule.stages[0].fixed_increments);
    }

    #[test]
    fn quick_control_values_roll_from_the_residual() {
        let schedule = build_with(ReturnMethod::Quick);
        let ctrl = schedule.boundary(naming::WHEEL_CTRL_BC).expect("ctrl bc");
        let residual = 2.0_f64.to_radians();

        let at_return = ctrl.values["return_00002"];
        assert_eq!(at_return.c1, Some(Prescribed(0.0)));
        assert_eq!(at_return.c2, Some(Prescribed(-0.0004)));
        match at_return.c3 {
            Some(Prescribed(angle)) => assert!((angle - residual).abs() < 1e-12),
            other => panic!("expected prescribed return angle, got {other:?}"),
        }

        let at_rolling = ctrl.values["rolling_00002"];
        assert_eq!(at_rolling.c2, Some(Freed));
        match at_rolling.c3 {
            Some(Prescribed(angle)) => {
                assert!((angle - (RolloverConfig::default().rolling.angle + residual)).abs() < 1e-12)
            }
            other => panic!("expected prescribed rolling angle, got {other:?}"),
        }
    }

    #[test]
    fn reapply_inserts_a_load_stage_between_return_and_rolling() {
        let schedule = build_with(ReturnMethod::Reapply);
        let names: Vec<&str> = schedule.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["return_00002", "reapply_00002", "rolling_00002"]);

        // Vertical control is freed in the reapply stage so the load
        // re-establishes contact pressure.
        let ctrl = schedule.boundary(naming::WHEEL_CTRL_BC).expect("ctrl bc");
        assert_eq!(ctrl.values["reapply_00002"].c2, Some(Freed));

        // The rail lock releases at reapply, not at rolling.
        let lock = schedule
            .boundary(&naming::rail_lock_bc("return_00002"))
            .expect("rail lock");
        assert_eq!(lock.deactivated_in.as_deref(), Some("reapply_00002"));
    }

    #[test]
    fn full_builds_the_six_stage_chain() {
        let schedule = build_with(ReturnMethod::Full);
        let names: Vec<&str> = schedule.stages.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "move_up_00002",
                "return_00002",
                "move_dw_00002",
                "roll_start_00002",
                "rolling_00002",
                "roll_end_00002"
            ]
        );

        // Ramp stages take end_stp_frac of the pass each.
        let rolling = RolloverConfig::default().rolling;
        let ramp = schedule.stage("roll_start_00002").expect("ramp stage");
        assert!((ramp.time_period - rolling.time * rolling.end_stp_frac).abs() < 1e-12);
        let main = schedule.stage("rolling_00002").expect("main stage");
        assert!(
            (main.time_period - rolling.time * (1.0 - 2.0 * rolling.end_stp_frac)).abs() < 1e-12
        );
    }

    #[test]
    fn full_locks_rail_nodes_individually() {
        let schedule = build_with(ReturnMethod::Full);
        for label in [301, 302] {
            let bc = schedule
                .boundary(&naming::rail_node_bc("return_00002", label))
                .unwrap_or_else(|| panic!("rail node {label} should be locked"));
            assert_eq!(bc.kind, BcKind::Velocity);
            assert_eq!(bc.created_in.as_deref(), Some("move_up_00002"));
            assert_eq!(bc.deactivated_in.as_deref(), Some("rolling_00002"));
        }
    }

    #[test]
    fn transplants_target_shifted_live_labels() {
        let schedule = build_with(ReturnMethod::Quick);
        let transplants: Vec<&crate::schedule::BoundarySchedule> = schedule
            .boundaries
            .iter()
            .filter(|b| matches!(b.region, RegionId::WheelNode(_)))
            .collect();
        assert!(!transplants.is_empty());
        for bc in &transplants {
            assert_eq!(bc.created_in.as_deref(), Some("return_00002"));
            assert_eq!(bc.deactivated_in.as_deref(), Some("rolling_00002"));
            // Live labels start at 10 in the fixture; snapshot labels at 1.
            match bc.region {
                RegionId::WheelNode(label) => assert!(label >= 10),
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn transplant_reproduces_relative_state_at_zero_net_roll() {
        let prior = prior_state(8, 0.46, 5.0, 0.0);
        // With no rolling advance the reference point only keeps its
        // vertical displacement, so the transplanted displacement of a
        // node onto itself reproduces the old relative configuration.
        let u2_end = prior.rp.u.y;
        let rp_new = prior.rp.x + Vector2::new(0.0, u2_end);
        for i in 0..prior.wheel.len() {
            let u_new = transplanted_displacement(&prior.wheel, i, i, &prior.rp, u2_end);
            let new_deformed = prior.wheel.x[i] + u_new;
            let old_relative = (prior.wheel.x[i] + prior.wheel.u[i]) - (prior.rp.x + prior.rp.u);
            let new_relative = new_deformed - rp_new;
            assert!((new_relative - old_relative).norm() < 1e-12);
        }
    }
}
