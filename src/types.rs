//! Core data types for movement commands, thruster outputs, and telemetry.
//!
//! Key types:
//! - [`MovementCommand`]: normalized 4-DOF pilot intent
//! - [`ThrusterOutputs`]: per-thruster pulse commands, ordered by wiring
//! - [`TelemetrySnapshot`]: last-known-value aggregate of vehicle sensors
//! - [`VehicleState`]: composite read-only view exposed to clients

use serde::{Deserialize, Serialize};

/// Number of thrusters on the reference vehicle
pub const THRUSTER_COUNT: usize = 4;

/// Lower bound of the thruster pulse range (full reverse)
pub const PULSE_MIN: i32 = 1000;

/// Upper bound of the thruster pulse range (full forward)
pub const PULSE_MAX: i32 = 2000;

/// Zero-thrust midpoint of the pulse range
pub const PULSE_NEUTRAL: i32 = 1500;

/// Normalized 4-DOF movement command from the pilot.
///
/// Each axis is intended to lie in [-1.0, 1.0] but is not validated here;
/// out-of-range values propagate into the mixer unchanged. A command is an
/// immutable snapshot: the next one replaces it whole, fields are never
/// merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementCommand {
    /// Forward/backward thrust
    pub surge: f32,
    /// Left/right thrust
    pub strafe: f32,
    /// Up/down thrust
    pub heave: f32,
    /// Rotational thrust
    pub yaw: f32,
}

impl MovementCommand {
    /// Create a new movement command
    pub fn new(surge: f32, strafe: f32, heave: f32, yaw: f32) -> Self {
        Self {
            surge,
            strafe,
            heave,
            yaw,
        }
    }
}

/// Per-thruster pulse commands, ordered by wiring position.
///
/// The slot order is a contract between the mixer and the motor bus; do not
/// reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrusterOutputs(pub [i32; THRUSTER_COUNT]);

impl ThrusterOutputs {
    /// All thrusters at the zero-thrust midpoint
    pub const fn neutral() -> Self {
        Self([PULSE_NEUTRAL; THRUSTER_COUNT])
    }
}

impl Default for ThrusterOutputs {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Partial position fix from the GNSS collaborator.
///
/// Carries only the fields actually present in the underlying message;
/// absent fields must not disturb previously merged values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GnssFix {
    /// Latitude in decimal degrees
    pub lat: Option<f64>,
    /// Longitude in decimal degrees
    pub lon: Option<f64>,
    /// Heading in degrees
    pub heading: Option<f32>,
}

impl GnssFix {
    /// True if no field is populated
    pub fn is_empty(&self) -> bool {
        self.lat.is_none() && self.lon.is_none() && self.heading.is_none()
    }
}

/// Inertial measurement fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImuReading {
    /// Accelerometer x/y/z in g
    pub accel: [f32; 3],
    /// Gyro x/y/z in deg/s
    pub gyro: [f32; 3],
}

/// Last-known-value aggregate of all monitored vehicle sensors.
///
/// Fields not reported by any collaborator in a given cycle keep their
/// previous value indefinitely; there is no staleness expiry. Every field
/// starts at zero on process start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub lat: f64,
    pub lon: f64,
    pub alt: f64,
    pub heading: f32,
    pub depth: f32,
    pub temperature: f32,
    pub imu: ImuReading,
    pub battery_voltage: f32,
    pub camera_pan: i32,
    pub camera_tilt: i32,
}

impl TelemetrySnapshot {
    /// Merge a GNSS fix: overwrite-on-presence, absent fields untouched
    pub fn apply_gnss(&mut self, fix: &GnssFix) {
        if let Some(lat) = fix.lat {
            self.lat = lat;
        }
        if let Some(lon) = fix.lon {
            self.lon = lon;
        }
        if let Some(heading) = fix.heading {
            self.heading = heading;
        }
    }
}

/// Composite read-only view of the vehicle, recomputed on every query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleState {
    /// Safety gate state
    pub armed: bool,
    /// Communication link status (best-effort)
    pub connected: bool,
    /// Last commanded movement target
    pub target_movement: MovementCommand,
    /// Last thruster outputs recorded by the interlock
    pub thruster_outputs: ThrusterOutputs,
    /// Telemetry aggregate
    pub telemetry: TelemetrySnapshot,
    /// Microseconds since the Unix epoch, stamped at query time
    pub timestamp_us: u64,
}

/// Current time in microseconds since the Unix epoch
pub fn timestamp_us() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_outputs() {
        let outputs = ThrusterOutputs::neutral();
        assert_eq!(outputs.0, [PULSE_NEUTRAL; THRUSTER_COUNT]);
        assert_eq!(ThrusterOutputs::default(), outputs);
    }

    #[test]
    fn test_gnss_merge_overwrites_present_fields() {
        let mut snapshot = TelemetrySnapshot::default();
        snapshot.apply_gnss(&GnssFix {
            lat: Some(12.5),
            lon: Some(80.2),
            heading: Some(270.0),
        });
        assert_eq!(snapshot.lat, 12.5);
        assert_eq!(snapshot.lon, 80.2);
        assert_eq!(snapshot.heading, 270.0);
    }

    #[test]
    fn test_gnss_merge_keeps_absent_fields() {
        let mut snapshot = TelemetrySnapshot::default();
        snapshot.apply_gnss(&GnssFix {
            lat: Some(12.5),
            lon: Some(80.2),
            heading: Some(90.0),
        });

        // A heading-less fix must not erase the previous heading
        snapshot.apply_gnss(&GnssFix {
            lat: Some(12.6),
            lon: None,
            heading: None,
        });
        assert_eq!(snapshot.lat, 12.6);
        assert_eq!(snapshot.lon, 80.2);
        assert_eq!(snapshot.heading, 90.0);
    }
}
