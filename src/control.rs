//! Top-level control loop
//!
//! Owns the safety interlock, the telemetry aggregator and the vehicle
//! link; drives the fixed-cadence cycle and the guaranteed shutdown path.

use crate::config::Config;
use crate::drivers::{CommunicationLink, GnssSensor, MotorDriver};
use crate::error::Result;
use crate::motion::ThrusterMixer;
use crate::safety::SafetyInterlock;
use crate::telemetry::TelemetryAggregator;
use crate::types::{MovementCommand, VehicleState, timestamp_us};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Interval between status lines in the run loop
const STATUS_LOG_INTERVAL: Duration = Duration::from_secs(10);

/// Orchestrates one vehicle: single logical thread of control, all shared
/// state owned here and mutated only through the entry points below.
///
/// External readers get [`VehicleState`] copies; nothing hands out
/// references into the internals, so a future concurrent reader cannot see
/// torn state.
pub struct ControlLoop {
    link: Box<dyn CommunicationLink>,
    safety: SafetyInterlock,
    telemetry: TelemetryAggregator,
    period: Duration,
    running: Arc<AtomicBool>,
    finished: bool,
}

impl ControlLoop {
    /// Assemble the loop from configuration and collaborator drivers
    pub fn new(
        config: &Config,
        link: Box<dyn CommunicationLink>,
        motors: Box<dyn MotorDriver>,
        gnss: Box<dyn GnssSensor>,
    ) -> Self {
        let mixer = ThrusterMixer::new(config.vehicle.depth_hold_kp);
        let safety = SafetyInterlock::new(motors, mixer, config.vehicle.start_armed);
        let telemetry = TelemetryAggregator::new(
            gnss,
            config.control.telemetry_min_interval(),
            config.control.gnss_timeout(),
        );

        Self {
            link,
            safety,
            telemetry,
            period: config.control.loop_period(),
            running: Arc::new(AtomicBool::new(true)),
            finished: false,
        }
    }

    /// Shared flag that stops the run loop when cleared; hand this to the
    /// signal handler
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Arm the vehicle (requires the link to be up)
    pub fn arm(&mut self) -> Result<()> {
        self.safety.arm(self.link.as_ref())
    }

    /// Disarm the vehicle and stop the motors
    pub fn disarm(&mut self) {
        self.safety.disarm();
    }

    /// Whether the vehicle is armed
    pub fn is_armed(&self) -> bool {
        self.safety.is_armed()
    }

    /// Set the movement target (actuates immediately when armed)
    pub fn set_movement_targets(&mut self, cmd: MovementCommand) -> Result<()> {
        self.safety.set_movement(cmd)
    }

    /// Merge fresh telemetry, subject to the rate limit unless forced
    pub fn update_telemetry(&mut self, force: bool) -> Result<bool> {
        self.telemetry.update(force)
    }

    /// Composite view of the vehicle, recomputed fresh on every call
    pub fn current_state(&self) -> VehicleState {
        VehicleState {
            armed: self.safety.is_armed(),
            connected: self.link.is_connected(),
            target_movement: self.safety.target(),
            thruster_outputs: self.safety.thruster_outputs(),
            telemetry: self.telemetry.snapshot().clone(),
            timestamp_us: timestamp_us(),
        }
    }

    /// Run the fixed-cadence control cycle until the shutdown flag clears,
    /// then run the shutdown path.
    ///
    /// Each cycle sleeps the period, refreshes telemetry, and recomputes
    /// the exposed state - in that order, so the state never precedes the
    /// telemetry it reports.
    pub fn run(&mut self) -> Result<()> {
        log::info!(
            "Control loop running at {:.0} Hz",
            1.0 / self.period.as_secs_f64()
        );

        let mut last_status = Instant::now();

        while self.running.load(Ordering::Relaxed) {
            std::thread::sleep(self.period);

            if let Err(e) = self.telemetry.update(false) {
                log::warn!("Telemetry update failed: {}", e);
            }

            let state = self.current_state();
            if last_status.elapsed() >= STATUS_LOG_INTERVAL {
                log::info!(
                    "armed={} connected={} outputs={:?} pos=({:.6}, {:.6}) hdg={:.1}",
                    state.armed,
                    state.connected,
                    state.thruster_outputs.0,
                    state.telemetry.lat,
                    state.telemetry.lon,
                    state.telemetry.heading,
                );
                last_status = Instant::now();
            } else {
                log::trace!("Cycle state recomputed at {}", state.timestamp_us);
            }
        }

        log::info!("Control loop stopping");
        self.shutdown();
        Ok(())
    }

    /// Guaranteed shutdown path: disarm first (motors to neutral), then
    /// drop the link if it is still up. Idempotent.
    pub fn shutdown(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.running.store(false, Ordering::Relaxed);

        log::info!("Shutting down...");
        self.safety.disarm();

        if self.link.is_connected()
            && let Err(e) = self.link.disconnect()
        {
            log::warn!("Link disconnect failed: {}", e);
        }

        log::info!("Shutdown complete");
    }
}

impl Drop for ControlLoop {
    fn drop(&mut self) {
        // A loop dropped without running to completion still takes the
        // guaranteed shutdown path
        self.shutdown();
    }
}
