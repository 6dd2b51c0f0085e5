//! Thruster bus driver shim
//!
//! The motor controller accepts the complete bank state on every write:
//! four pulse values, comma-joined ASCII, newline-terminated. There is no
//! per-thruster addressing on the wire.

use super::MotorDriver;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::ThrusterOutputs;

/// Serial shim for the thruster bank
pub struct SerialThrusterBus {
    transport: Box<dyn Transport>,
    state: ThrusterOutputs,
}

impl SerialThrusterBus {
    /// Create a bus over the given transport; held state starts at neutral
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            state: ThrusterOutputs::neutral(),
        }
    }

    /// Last bank state confirmed on the wire
    pub fn held_state(&self) -> ThrusterOutputs {
        self.state
    }

    fn write_frame(&mut self, outputs: &ThrusterOutputs) -> Result<()> {
        let frame = outputs
            .0
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");

        self.transport.write_all(frame.as_bytes())?;
        self.transport.write_all(b"\n")?;
        Ok(())
    }
}

impl MotorDriver for SerialThrusterBus {
    fn set_thruster_speeds(&mut self, outputs: &ThrusterOutputs) -> Result<()> {
        self.write_frame(outputs)?;
        self.state = *outputs;
        log::trace!("Thruster bank set to {:?}", outputs.0);
        Ok(())
    }

    fn stop_all_motors(&mut self) -> Result<()> {
        let neutral = ThrusterOutputs::neutral();
        self.write_frame(&neutral)?;
        self.state = neutral;
        log::debug!("Thruster bank stopped (all neutral)");
        Ok(())
    }
}
