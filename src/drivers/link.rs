//! Topside communication link shim

use super::CommunicationLink;
use crate::error::Result;
use serialport::SerialPort;
use std::time::Duration;

/// Communication link over a serial port.
///
/// Connected means the port is open; there is no liveness probing beyond
/// that, so status is best-effort.
pub struct SerialLink {
    port: Option<Box<dyn SerialPort>>,
    path: String,
}

impl SerialLink {
    /// Open the link
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .timeout(Duration::from_millis(100))
            .open()?;

        log::info!("Vehicle link up on {} at {} baud", path, baud_rate);

        Ok(Self {
            port: Some(port),
            path: path.to_string(),
        })
    }
}

impl CommunicationLink for SerialLink {
    fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    fn disconnect(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            log::info!("Vehicle link on {} closed", self.path);
        }
        Ok(())
    }
}
