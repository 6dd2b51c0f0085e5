//! Mock collaborators for testing the control core without hardware

use super::{CommunicationLink, GnssSensor, MotorDriver};
use crate::error::{Error, Result};
use crate::types::{GnssFix, ThrusterOutputs};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared call-order recorder, useful for asserting shutdown sequencing
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Create an empty event log
pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

fn record(log: &Option<EventLog>, event: &str) {
    if let Some(log) = log {
        log.lock().unwrap().push(event.to_string());
    }
}

/// Mock communication link with a settable connection flag
#[derive(Clone)]
pub struct MockLink {
    inner: Arc<Mutex<MockLinkState>>,
}

struct MockLinkState {
    connected: bool,
    log: Option<EventLog>,
}

impl MockLink {
    /// Create a link in the given connection state
    pub fn new(connected: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockLinkState {
                connected,
                log: None,
            })),
        }
    }

    /// Attach a shared event log
    pub fn with_log(connected: bool, log: EventLog) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockLinkState {
                connected,
                log: Some(log),
            })),
        }
    }

    /// Flip the connection flag
    pub fn set_connected(&self, connected: bool) {
        self.inner.lock().unwrap().connected = connected;
    }

    /// Read the connection flag
    pub fn connected(&self) -> bool {
        self.inner.lock().unwrap().connected
    }
}

impl CommunicationLink for MockLink {
    fn is_connected(&self) -> bool {
        self.inner.lock().unwrap().connected
    }

    fn disconnect(&mut self) -> Result<()> {
        let mut state = self.inner.lock().unwrap();
        state.connected = false;
        record(&state.log, "disconnect");
        Ok(())
    }
}

/// Mock motor driver recording every command it receives
#[derive(Clone)]
pub struct MockThrusters {
    inner: Arc<Mutex<MockThrusterState>>,
}

struct MockThrusterState {
    last: ThrusterOutputs,
    stop_count: u32,
    set_count: u32,
    fail: bool,
    log: Option<EventLog>,
}

impl MockThrusters {
    /// Create a mock thruster bank at neutral
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockThrusterState {
                last: ThrusterOutputs::neutral(),
                stop_count: 0,
                set_count: 0,
                fail: false,
                log: None,
            })),
        }
    }

    /// Create a mock thruster bank that records into a shared event log
    pub fn with_log(log: EventLog) -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().log = Some(log);
        mock
    }

    /// Last bank state received
    pub fn last_outputs(&self) -> ThrusterOutputs {
        self.inner.lock().unwrap().last
    }

    /// Number of stop-all commands received
    pub fn stop_count(&self) -> u32 {
        self.inner.lock().unwrap().stop_count
    }

    /// Number of set-speed commands received
    pub fn set_count(&self) -> u32 {
        self.inner.lock().unwrap().set_count
    }

    /// Make subsequent commands fail like a dead bus
    pub fn set_fail(&self, fail: bool) {
        self.inner.lock().unwrap().fail = fail;
    }
}

impl Default for MockThrusters {
    fn default() -> Self {
        Self::new()
    }
}

impl MotorDriver for MockThrusters {
    fn set_thruster_speeds(&mut self, outputs: &ThrusterOutputs) -> Result<()> {
        let mut state = self.inner.lock().unwrap();
        if state.fail {
            return Err(Error::Other("mock thruster bus failure".to_string()));
        }
        state.last = *outputs;
        state.set_count += 1;
        record(&state.log, "set_thruster_speeds");
        Ok(())
    }

    fn stop_all_motors(&mut self) -> Result<()> {
        let mut state = self.inner.lock().unwrap();
        if state.fail {
            return Err(Error::Other("mock thruster bus failure".to_string()));
        }
        state.last = ThrusterOutputs::neutral();
        state.stop_count += 1;
        record(&state.log, "stop_all_motors");
        Ok(())
    }
}

/// Mock GNSS receiver replaying a scripted queue of fixes
#[derive(Clone)]
pub struct MockGnss {
    inner: Arc<Mutex<MockGnssState>>,
}

struct MockGnssState {
    fixes: VecDeque<GnssFix>,
    poll_count: u32,
}

impl MockGnss {
    /// Create a receiver with an empty script
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockGnssState {
                fixes: VecDeque::new(),
                poll_count: 0,
            })),
        }
    }

    /// Queue a fix to be returned by the next poll
    pub fn push_fix(&self, fix: GnssFix) {
        self.inner.lock().unwrap().fixes.push_back(fix);
    }

    /// Number of polls performed
    pub fn poll_count(&self) -> u32 {
        self.inner.lock().unwrap().poll_count
    }
}

impl Default for MockGnss {
    fn default() -> Self {
        Self::new()
    }
}

impl GnssSensor for MockGnss {
    fn poll_fix(&mut self, _timeout: Duration) -> Result<Option<GnssFix>> {
        let mut state = self.inner.lock().unwrap();
        state.poll_count += 1;
        Ok(state.fixes.pop_front())
    }
}
