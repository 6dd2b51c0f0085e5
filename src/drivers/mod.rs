//! Collaborator contracts consumed by the control core, plus the thin
//! serial shims and mock implementations that satisfy them.
//!
//! The core only ever talks to these traits; everything behind them is
//! replaceable hardware plumbing with no decision logic of its own.

use crate::error::Result;
use crate::types::{GnssFix, ThrusterOutputs};
use std::time::Duration;

mod gnss;
mod link;
pub mod mock;
mod thrusters;

pub use gnss::SerialGnss;
pub use link::SerialLink;
pub use thrusters::SerialThrusterBus;

/// Communication link to the vehicle.
///
/// Status is best-effort; no guarantees beyond what the transport reports.
pub trait CommunicationLink: Send {
    /// Whether the link is currently up
    fn is_connected(&self) -> bool;

    /// Tear the link down. Safe to call when already disconnected.
    fn disconnect(&mut self) -> Result<()>;
}

/// Motor driver controlling the thruster bank.
///
/// A transport failure comes back as an error value; the physical thruster
/// state is then unknown until the next confirmed write. Callers may retry
/// on their next cycle; the driver itself never retries.
pub trait MotorDriver: Send {
    /// Command all thrusters at once, in wiring order
    fn set_thruster_speeds(&mut self, outputs: &ThrusterOutputs) -> Result<()>;

    /// Stop all motors. Resets the driver's held state to all-neutral on
    /// success.
    fn stop_all_motors(&mut self) -> Result<()>;
}

/// GNSS receiver.
///
/// A poll is bounded by `timeout` and single-shot: it yields at most one
/// fix, carrying only the fields the underlying message actually reported.
/// Expiry without a fix is `Ok(None)` - no new data, not an error.
pub trait GnssSensor: Send {
    /// Poll for a fix, waiting at most `timeout`
    fn poll_fix(&mut self, timeout: Duration) -> Result<Option<GnssFix>>;
}
