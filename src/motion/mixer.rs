//! Thruster mixer: maps a normalized movement command to per-thruster pulses

use crate::error::{Error, Result};
use crate::types::{MovementCommand, PULSE_MAX, PULSE_MIN, THRUSTER_COUNT, ThrusterOutputs};

/// Default proportional gain for the depth-hold helper (needs tuning)
pub const DEFAULT_DEPTH_KP: f32 = 0.5;

/// Map a value from one range to another.
///
/// Affine and order-preserving: `in_min` maps to `out_min`, `in_max` to
/// `out_max`, for ascending or descending output ranges alike. A collapsed
/// source range is a misconfiguration and fails hard.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> Result<f32> {
    if in_min == in_max {
        return Err(Error::InvalidRange { in_min, in_max });
    }
    Ok((value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min)
}

/// Pure mixer from normalized 4-DOF intent to thruster pulse values.
///
/// The mixing rule is the one the vehicle was tuned against:
///
/// - `surge` is broadcast to all slots as the baseline;
/// - positive `strafe` rewrites slots 2 and 3, both to `slot[3] * strafe`;
///   non-positive `strafe` rewrites slots 0 and 1, both to
///   `slot[1] * -strafe`;
/// - `heave` and `yaw` are accepted but not mixed yet; the full DOF matrix
///   is a future extension, not something to guess at here;
/// - each normalized value goes through the curve
///   `[-1, 1] -> [-PULSE_MIN, PULSE_MAX]`. The reverse bound really is
///   `-PULSE_MIN`: the ESCs were calibrated against this curve, so changing
///   it requires re-tuning the vehicle.
#[derive(Debug, Clone)]
pub struct ThrusterMixer {
    depth_kp: f32,
}

impl ThrusterMixer {
    /// Create a mixer with the given depth-hold gain
    pub fn new(depth_kp: f32) -> Self {
        log::debug!(
            "ThrusterMixer: {} slots, pulse curve [-1,1] -> [{}, {}], depth kp={}",
            THRUSTER_COUNT,
            -PULSE_MIN,
            PULSE_MAX,
            depth_kp
        );
        Self { depth_kp }
    }

    /// Mix a movement command into thruster pulse values.
    ///
    /// A fresh output vector is produced on every call; slot order is fixed
    /// by the vehicle wiring.
    pub fn mix(&self, cmd: &MovementCommand) -> Result<ThrusterOutputs> {
        let throttle = cmd.surge;
        let strafe = cmd.strafe;

        let mut thrusters = [throttle; THRUSTER_COUNT];

        // One horizontal pair is trimmed off the surge baseline; both slots
        // of the pair take the same value. At strafe == 0 the multiply
        // zeroes slots 0 and 1.
        if strafe > 0.0 {
            let trimmed = thrusters[3] * strafe;
            thrusters[2] = trimmed;
            thrusters[3] = trimmed;
        } else {
            let trimmed = thrusters[1] * -strafe;
            thrusters[0] = trimmed;
            thrusters[1] = trimmed;
        }

        let mut pulses = [0i32; THRUSTER_COUNT];
        for (pulse, value) in pulses.iter_mut().zip(thrusters) {
            *pulse = map_range(value, -1.0, 1.0, -(PULSE_MIN as f32), PULSE_MAX as f32)? as i32;
        }

        log::trace!("ThrusterMixer: {:?} -> {:?}", cmd, pulses);
        Ok(ThrusterOutputs(pulses))
    }

    /// Proportional depth-hold correction, normalized to [-1, 1].
    ///
    /// `_dt` is reserved for the integral and derivative terms of a full PID
    /// law; the proportional-only correction does not use it.
    pub fn depth_correction(&self, current_depth: f32, target_depth: f32, _dt: f32) -> f32 {
        let error = target_depth - current_depth;
        (self.depth_kp * error).clamp(-1.0, 1.0)
    }
}

impl Default for ThrusterMixer {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH_KP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_range_endpoints() {
        // Ascending output range
        assert_eq!(map_range(-1.0, -1.0, 1.0, -1000.0, 2000.0).unwrap(), -1000.0);
        assert_eq!(map_range(1.0, -1.0, 1.0, -1000.0, 2000.0).unwrap(), 2000.0);

        // Descending output range is just as valid
        assert_eq!(map_range(-1.0, -1.0, 1.0, 2000.0, -1000.0).unwrap(), 2000.0);
        assert_eq!(map_range(1.0, -1.0, 1.0, 2000.0, -1000.0).unwrap(), -1000.0);
    }

    #[test]
    fn test_map_range_midpoint() {
        // The curve is asymmetric: normalized zero lands at 500, not 1500
        assert_eq!(map_range(0.0, -1.0, 1.0, -1000.0, 2000.0).unwrap(), 500.0);
    }

    #[test]
    fn test_map_range_collapsed_source() {
        let err = map_range(0.0, 1.0, 1.0, 0.0, 100.0).unwrap_err();
        assert!(matches!(err, Error::InvalidRange { .. }));
    }

    #[test]
    fn test_mix_pure_surge_zeroes_front_pair() {
        let mixer = ThrusterMixer::default();

        // strafe == 0 takes the non-positive branch, multiplying slots 0
        // and 1 by -0.0
        let out = mixer
            .mix(&MovementCommand::new(0.5, 0.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(out.0, [500, 500, 1250, 1250]);

        let out = mixer
            .mix(&MovementCommand::new(1.0, 0.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(out.0, [500, 500, 2000, 2000]);
    }

    #[test]
    fn test_mix_zero_command() {
        let mixer = ThrusterMixer::default();
        let out = mixer.mix(&MovementCommand::default()).unwrap();

        // Zero intent still maps through the asymmetric curve
        assert_eq!(out.0, [500, 500, 500, 500]);
    }

    #[test]
    fn test_mix_positive_strafe_scenario() {
        let mixer = ThrusterMixer::default();
        let out = mixer
            .mix(&MovementCommand::new(0.8, 0.2, 0.0, 0.0))
            .unwrap();

        // Slots 2 and 3 both carry slot[3] * strafe = 0.16; slots 0 and 1
        // keep the 0.8 baseline
        assert_eq!(out.0, [1700, 1700, 740, 740]);
    }

    #[test]
    fn test_mix_negative_strafe() {
        let mixer = ThrusterMixer::default();
        let out = mixer
            .mix(&MovementCommand::new(0.5, -0.4, 0.0, 0.0))
            .unwrap();

        // Slots 0 and 1 both carry slot[1] * -strafe = 0.2
        assert_eq!(out.0, [800, 800, 1250, 1250]);
    }

    #[test]
    fn test_mix_ignores_heave_and_yaw() {
        let mixer = ThrusterMixer::default();
        let base = mixer
            .mix(&MovementCommand::new(0.3, 0.1, 0.0, 0.0))
            .unwrap();
        let with_extras = mixer
            .mix(&MovementCommand::new(0.3, 0.1, 0.9, -0.7))
            .unwrap();
        assert_eq!(base, with_extras);
    }

    #[test]
    fn test_depth_correction_proportional_and_clamped() {
        let mixer = ThrusterMixer::new(0.5);

        // Proportional region
        assert_eq!(mixer.depth_correction(4.0, 5.0, 0.05), 0.5);
        assert_eq!(mixer.depth_correction(5.0, 4.0, 0.05), -0.5);

        // Saturated
        assert_eq!(mixer.depth_correction(0.0, 10.0, 0.05), 1.0);
        assert_eq!(mixer.depth_correction(10.0, 0.0, 0.05), -1.0);
    }
}
