//! Rigid move-back planning.
//!
//! The wheel mesh is periodic along the rolling direction, so after a
//! rolling pass the wheel can be returned to its canonical orientation by
//! rotating back only the sub-pitch residual while re-assigning node
//! indices by the whole number of pitches rolled through. Which physical
//! material point sits where is then decoupled from which mesh node
//! represents it, and the accumulated rotation stays bounded.

/// Rigid correction bringing the wheel back to its reference orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollBackPlan {
    /// Whole number of mesh node pitches the wheel has rolled through.
    pub num_pitches: i64,
    /// Rotation left after removing whole pitches (radians). Bounded by
    /// half a pitch in magnitude by the rounding below.
    pub residual_angle: f64,
}

/// Split the accumulated rolling rotation into whole pitches and a
/// residual. Operates on already-validated data: `pitch` is the positive
/// angular node spacing computed by the correspondence resolver.
pub fn plan(ur_end: f64, pitch: f64) -> RollBackPlan {
    let num_pitches = (ur_end / pitch).round() as i64;
    RollBackPlan {
        num_pitches,
        residual_angle: ur_end - num_pitches as f64 * pitch,
    }
}

/// Sorted node index after the move-back re-assignment: shifted by the
/// pitch count, wrapping around the periodic contact arc.
pub fn shift_index(index: usize, num_pitches: i64, node_count: usize) -> usize {
    (index as i64 + num_pitches).rem_euclid(node_count as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_rotation_into_pitches_and_residual() {
        // 37 degrees of rolling on a 5 degree pitch.
        let rolled = plan(37.0_f64.to_radians(), 5.0_f64.to_radians());
        assert_eq!(rolled.num_pitches, 7);
        assert!((rolled.residual_angle - 2.0_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn residual_is_bounded_by_half_a_pitch() {
        let pitch = 0.031;
        for i in 0..500 {
            let ur = 0.013 * i as f64;
            let p = plan(ur, pitch);
            assert!(
                p.residual_angle.abs() <= pitch / 2.0 + 1e-12,
                "residual {} exceeds half pitch for ur {}",
                p.residual_angle,
                ur
            );
        }
    }

    #[test]
    fn residual_can_be_negative() {
        let p = plan(0.9, 0.5);
        assert_eq!(p.num_pitches, 2);
        assert!((p.residual_angle + 0.1).abs() < 1e-12);
    }

    #[test]
    fn no_rolling_means_no_correction() {
        let p = plan(0.0, 0.1);
        assert_eq!(p.num_pitches, 0);
        assert_eq!(p.residual_angle, 0.0);
    }

    #[test]
    fn index_shift_wraps_around_the_arc() {
        assert_eq!(shift_index(0, 7, 8), 7);
        assert_eq!(shift_index(3, 7, 8), 2);
        assert_eq!(shift_index(2, -3, 8), 7);
    }
}
