//! Rate-limited telemetry aggregation
//!
//! Merges whatever the sensor collaborators report into a last-known-value
//! snapshot. Fields nobody reported keep their previous value; there is no
//! expiry.

use crate::drivers::GnssSensor;
use crate::error::Result;
use crate::types::TelemetrySnapshot;
use std::time::{Duration, Instant};

/// Polls the sensor collaborators and merges their readings into the held
/// snapshot, at most once per `min_interval` unless forced.
pub struct TelemetryAggregator {
    gnss: Box<dyn GnssSensor>,
    snapshot: TelemetrySnapshot,
    last_update: Option<Instant>,
    min_interval: Duration,
    gnss_timeout: Duration,
}

impl TelemetryAggregator {
    /// Create an aggregator with a zeroed snapshot
    pub fn new(gnss: Box<dyn GnssSensor>, min_interval: Duration, gnss_timeout: Duration) -> Self {
        Self {
            gnss,
            snapshot: TelemetrySnapshot::default(),
            last_update: None,
            min_interval,
            gnss_timeout,
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> &TelemetrySnapshot {
        &self.snapshot
    }

    /// Instant of the last successful merge
    pub fn last_update(&self) -> Option<Instant> {
        self.last_update
    }

    /// Merge fresh sensor readings into the snapshot.
    ///
    /// Returns `Ok(false)` when skipped by the rate limit. A sensor that
    /// has nothing new within its poll bound contributes nothing this
    /// cycle; that still counts as a successful update. Transport errors
    /// propagate without stamping the update time, so the next call retries
    /// immediately.
    pub fn update(&mut self, force: bool) -> Result<bool> {
        if !force {
            let too_soon = match self.last_update {
                Some(last) => last.elapsed() < self.min_interval,
                None => false,
            };
            if too_soon {
                return Ok(false);
            }
        }

        self.collect()?;
        self.last_update = Some(Instant::now());
        Ok(true)
    }

    /// Query each sensor collaborator once and merge present fields
    fn collect(&mut self) -> Result<()> {
        match self.gnss.poll_fix(self.gnss_timeout)? {
            Some(fix) => {
                self.snapshot.apply_gnss(&fix);
                log::debug!("Telemetry merged GNSS fix: {:?}", fix);
            }
            None => log::trace!("No GNSS data this cycle"),
        }

        Ok(())
    }
}
