//! Configuration for the varuna-core daemon
//!
//! Loads configuration from a TOML file with the parameters needed for the
//! control core and its serial driver shims.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Top-level daemon configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub hardware: HardwareConfig,
    pub vehicle: VehicleConfig,
    pub control: ControlConfig,
    pub logging: LoggingConfig,
}

/// Hardware configuration (serial ports)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HardwareConfig {
    /// Topside communication link serial port
    pub link_port: String,
    /// Topside communication link baud rate
    pub link_baud: u32,
    /// Thruster bus serial port
    pub motor_port: String,
    /// Thruster bus baud rate
    pub motor_baud: u32,
    /// GNSS receiver serial port
    pub gnss_port: String,
    /// GNSS receiver baud rate
    pub gnss_baud: u32,
}

/// Vehicle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VehicleConfig {
    /// Arm the safety interlock at startup.
    ///
    /// The reference vehicle boots armed. Deployments that want a cold
    /// vehicle until the pilot arms explicitly should set this to false.
    pub start_armed: bool,

    /// Proportional gain for the depth-hold correction helper
    pub depth_hold_kp: f32,
}

/// Control loop timing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ControlConfig {
    /// Control cycle period in milliseconds
    pub loop_period_ms: u64,

    /// Minimum interval between unforced telemetry merges, in milliseconds
    pub telemetry_min_interval_ms: u64,

    /// Upper bound on a single GNSS poll, in milliseconds.
    ///
    /// Must stay below the loop period so a silent receiver cannot stall
    /// the cycle.
    pub gnss_timeout_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), overridden by RUST_LOG
    pub level: String,
}

impl ControlConfig {
    /// Control cycle period as a Duration
    pub fn loop_period(&self) -> Duration {
        Duration::from_millis(self.loop_period_ms)
    }

    /// Telemetry rate-limit interval as a Duration
    pub fn telemetry_min_interval(&self) -> Duration {
        Duration::from_millis(self.telemetry_min_interval_ms)
    }

    /// GNSS poll bound as a Duration
    pub fn gnss_timeout(&self) -> Duration {
        Duration::from_millis(self.gnss_timeout_ms)
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject timing combinations that would stall the control cycle
    pub fn validate(&self) -> Result<()> {
        if self.control.gnss_timeout_ms >= self.control.loop_period_ms {
            return Err(Error::Config(format!(
                "gnss_timeout_ms ({}) must be below loop_period_ms ({})",
                self.control.gnss_timeout_ms, self.control.loop_period_ms
            )));
        }
        Ok(())
    }

    /// Save configuration to TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Default configuration for the reference vehicle.
    ///
    /// Suitable for testing and development. Production deployments should
    /// use a proper TOML configuration file.
    pub fn reference_defaults() -> Self {
        Self {
            hardware: HardwareConfig {
                link_port: "/dev/ttyS0".to_string(),
                link_baud: 115200,
                motor_port: "/dev/ttyS1".to_string(),
                motor_baud: 115200,
                gnss_port: "/dev/ttyS2".to_string(),
                gnss_baud: 9600,
            },
            vehicle: VehicleConfig {
                start_armed: true, // Matches the reference vehicle
                depth_hold_kp: 0.5,
            },
            control: ControlConfig {
                loop_period_ms: 50,
                telemetry_min_interval_ms: 50,
                gnss_timeout_ms: 25,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::reference_defaults()
    }
}
