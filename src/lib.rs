//! varuna-core - Motion-control core for the Varuna ROV
//!
//! This library provides the decision-making core of the vehicle: thruster
//! mixing, the arm/disarm safety interlock, rate-limited telemetry
//! aggregation, and the control loop that ties them together. Hardware
//! access stays behind the collaborator traits in [`drivers`].

pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod motion;
pub mod safety;
pub mod telemetry;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use control::ControlLoop;
pub use error::{Error, Result};
pub use types::{MovementCommand, TelemetrySnapshot, ThrusterOutputs, VehicleState};
