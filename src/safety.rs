//! Arm/disarm safety interlock gating all thruster actuation
//!
//! Nothing reaches the motor driver unless the interlock is armed, and any
//! transition to disarmed forces the bank to neutral before the transition
//! is considered complete.

use crate::drivers::{CommunicationLink, MotorDriver};
use crate::error::Result;
use crate::motion::ThrusterMixer;
use crate::types::{MovementCommand, ThrusterOutputs};

/// Safety gate state. Exactly one is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmState {
    /// Mixed thruster commands reach the actuators
    Armed,
    /// All movement commands degrade to stop-all
    Disarmed,
}

/// Owns the armed/disarmed state, the mixer, and the motor driver; records
/// the last target and the last outputs for state queries.
///
/// State is mutated only through [`arm`](SafetyInterlock::arm),
/// [`disarm`](SafetyInterlock::disarm) and
/// [`set_movement`](SafetyInterlock::set_movement); there is no separate
/// fault state.
pub struct SafetyInterlock {
    state: ArmState,
    motors: Box<dyn MotorDriver>,
    mixer: ThrusterMixer,
    target: MovementCommand,
    outputs: ThrusterOutputs,
}

impl SafetyInterlock {
    /// Create the interlock.
    ///
    /// `start_armed` reproduces the reference vehicle's boot-armed behavior
    /// when set; a cold boot should pass false and arm explicitly.
    pub fn new(motors: Box<dyn MotorDriver>, mixer: ThrusterMixer, start_armed: bool) -> Self {
        let state = if start_armed {
            log::warn!("Safety interlock starting ARMED");
            ArmState::Armed
        } else {
            ArmState::Disarmed
        };

        Self {
            state,
            motors,
            mixer,
            target: MovementCommand::default(),
            outputs: ThrusterOutputs::neutral(),
        }
    }

    /// Whether the interlock is armed
    pub fn is_armed(&self) -> bool {
        self.state == ArmState::Armed
    }

    /// Last commanded movement target
    pub fn target(&self) -> MovementCommand {
        self.target
    }

    /// Last thruster outputs recorded for state queries
    pub fn thruster_outputs(&self) -> ThrusterOutputs {
        self.outputs
    }

    /// Arm the vehicle, enabling motor actuation.
    ///
    /// Requires the communication link to be up; fails without touching the
    /// state otherwise.
    pub fn arm(&mut self, link: &dyn CommunicationLink) -> Result<()> {
        if !link.is_connected() {
            log::warn!("Cannot arm: vehicle link down");
            return Err(crate::error::Error::NotConnected);
        }

        self.state = ArmState::Armed;
        log::info!("Vehicle armed");
        Ok(())
    }

    /// Disarm the vehicle. Unconditional: the bank is commanded to neutral
    /// and the recorded outputs reset before the transition completes.
    pub fn disarm(&mut self) {
        if let Err(e) = self.motors.stop_all_motors() {
            // Not confirmed on the wire; physical state unknown until the
            // next good write
            log::warn!("Stop-all not confirmed during disarm: {}", e);
        }
        self.outputs = ThrusterOutputs::neutral();
        self.state = ArmState::Disarmed;
        log::info!("Vehicle disarmed, motors stopped");
    }

    /// Set the movement target.
    ///
    /// The target is recorded regardless of arm state. Armed, it is mixed
    /// and forwarded to the motor driver; disarmed, the bank is commanded
    /// to stop instead. A collapsed mapping range is a misconfiguration and
    /// propagates; a transport failure is logged and left for the next
    /// cycle to retry.
    pub fn set_movement(&mut self, cmd: MovementCommand) -> Result<()> {
        self.target = cmd;
        log::debug!("Movement targets set: {:?}", cmd);

        match self.state {
            ArmState::Armed => {
                let outputs = self.mixer.mix(&cmd)?;
                self.outputs = outputs;

                if let Err(e) = self.motors.set_thruster_speeds(&outputs) {
                    log::warn!("Thruster command not confirmed: {}", e);
                }
            }
            ArmState::Disarmed => {
                if let Err(e) = self.motors.stop_all_motors() {
                    log::warn!("Stop-all not confirmed: {}", e);
                }
                self.outputs = ThrusterOutputs::neutral();
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::mock::{MockLink, MockThrusters};
    use crate::motion::ThrusterMixer;

    fn interlock(mock: &MockThrusters, start_armed: bool) -> SafetyInterlock {
        SafetyInterlock::new(
            Box::new(mock.clone()),
            ThrusterMixer::default(),
            start_armed,
        )
    }

    #[test]
    fn test_arm_requires_connected_link() {
        let motors = MockThrusters::new();
        let mut interlock = interlock(&motors, false);

        let link = MockLink::new(false);
        assert!(interlock.arm(&link).is_err());
        assert!(!interlock.is_armed());

        link.set_connected(true);
        interlock.arm(&link).unwrap();
        assert!(interlock.is_armed());
    }

    #[test]
    fn test_disarm_is_unconditional_and_neutralizes() {
        let motors = MockThrusters::new();
        let mut interlock = interlock(&motors, true);

        interlock
            .set_movement(MovementCommand::new(0.8, 0.2, 0.0, 0.0))
            .unwrap();
        assert_ne!(interlock.thruster_outputs(), ThrusterOutputs::neutral());

        interlock.disarm();
        assert!(!interlock.is_armed());
        assert_eq!(interlock.thruster_outputs(), ThrusterOutputs::neutral());
        assert_eq!(motors.last_outputs(), ThrusterOutputs::neutral());
        assert_eq!(motors.stop_count(), 1);
    }

    #[test]
    fn test_disarm_survives_dead_bus() {
        let motors = MockThrusters::new();
        let mut interlock = interlock(&motors, true);

        motors.set_fail(true);
        interlock.disarm();

        // The transition completes even though the wire write failed
        assert!(!interlock.is_armed());
        assert_eq!(interlock.thruster_outputs(), ThrusterOutputs::neutral());
    }

    #[test]
    fn test_movement_while_armed_actuates() {
        let motors = MockThrusters::new();
        let mut interlock = interlock(&motors, true);

        interlock
            .set_movement(MovementCommand::new(0.8, 0.2, 0.0, 0.0))
            .unwrap();

        let expected = ThrusterOutputs([1700, 1700, 740, 740]);
        assert_eq!(interlock.thruster_outputs(), expected);
        assert_eq!(motors.last_outputs(), expected);
        assert_eq!(motors.set_count(), 1);
        assert_eq!(motors.stop_count(), 0);
    }

    #[test]
    fn test_movement_while_disarmed_stops_instead_of_mixing() {
        let motors = MockThrusters::new();
        let mut interlock = interlock(&motors, false);

        let cmd = MovementCommand::new(0.5, 0.0, 0.0, 0.0);
        interlock.set_movement(cmd).unwrap();

        // Target is still recorded, but the bank was stopped, not mixed
        assert_eq!(interlock.target(), cmd);
        assert_eq!(interlock.thruster_outputs(), ThrusterOutputs::neutral());
        assert_eq!(motors.set_count(), 0);
        assert_eq!(motors.stop_count(), 1);
    }

    #[test]
    fn test_start_armed_matches_reference_boot() {
        let motors = MockThrusters::new();
        assert!(interlock(&motors, true).is_armed());
        assert!(!interlock(&motors, false).is_armed());
    }
}
