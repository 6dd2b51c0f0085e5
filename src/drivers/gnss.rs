//! GNSS receiver shim
//!
//! Deadline-bounded reader over the receiver's NMEA stream. Only RMC and
//! HDT sentences are inspected; everything else is skipped. A fix carries
//! only the fields its sentence actually reported.

use super::GnssSensor;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::GnssFix;
use std::time::{Duration, Instant};

const READ_CHUNK: usize = 256;

/// Resync guard: a stream this long without a newline is not NMEA
const MAX_LINE: usize = 128;

/// Serial shim for the GNSS receiver
pub struct SerialGnss {
    transport: Box<dyn Transport>,
    line_buf: Vec<u8>,
}

impl SerialGnss {
    /// Create a receiver over the given transport
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            line_buf: Vec::new(),
        }
    }

    fn take_line(&mut self) -> Option<String> {
        if let Some(pos) = self.line_buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.line_buf.drain(..=pos).collect();
            return Some(String::from_utf8_lossy(&line).trim().to_string());
        }
        if self.line_buf.len() > MAX_LINE {
            log::debug!("GNSS stream out of sync, dropping {} bytes", self.line_buf.len());
            self.line_buf.clear();
        }
        None
    }
}

impl GnssSensor for SerialGnss {
    fn poll_fix(&mut self, timeout: Duration) -> Result<Option<GnssFix>> {
        let deadline = Instant::now() + timeout;

        loop {
            while let Some(line) = self.take_line() {
                if let Some(fix) = parse_sentence(&line)
                    && !fix.is_empty()
                {
                    log::trace!("GNSS fix: {:?}", fix);
                    return Ok(Some(fix));
                }
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }

            let mut chunk = [0u8; READ_CHUNK];
            let n = self.transport.read(&mut chunk)?;
            if n == 0 {
                // Transport timed out with nothing buffered; yield briefly
                // instead of spinning until the deadline
                std::thread::sleep(Duration::from_millis(1));
            } else {
                self.line_buf.extend_from_slice(&chunk[..n]);
            }
        }
    }
}

fn nmea_checksum(data: &str) -> u8 {
    data.bytes().fold(0, |acc, b| acc ^ b)
}

fn parse_sentence(line: &str) -> Option<GnssFix> {
    let body = line.trim().strip_prefix('$')?;
    let (data, checksum) = body.split_once('*')?;

    let expected = u8::from_str_radix(checksum.trim(), 16).ok()?;
    let actual = nmea_checksum(data);
    if actual != expected {
        log::debug!(
            "GNSS checksum mismatch: expected {:#04x}, got {:#04x}",
            expected,
            actual
        );
        return None;
    }

    let fields: Vec<&str> = data.split(',').collect();
    let kind = *fields.first()?;
    if kind.len() < 5 {
        return None;
    }

    match &kind[kind.len() - 3..] {
        "RMC" => parse_rmc(&fields),
        "HDT" => parse_hdt(&fields),
        _ => None,
    }
}

/// `$xxRMC,time,status,lat,N/S,lon,E/W,speed,course,...` - position and
/// track made good, only trusted while the status flag reads Active
fn parse_rmc(fields: &[&str]) -> Option<GnssFix> {
    if fields.len() < 9 || fields[2] != "A" {
        return None;
    }

    Some(GnssFix {
        lat: parse_coordinate(fields[3], fields[4]),
        lon: parse_coordinate(fields[5], fields[6]),
        heading: fields[8].parse().ok(),
    })
}

/// `$xxHDT,heading,T` - true heading
fn parse_hdt(fields: &[&str]) -> Option<GnssFix> {
    let heading = fields.get(1)?.parse().ok()?;
    Some(GnssFix {
        heading: Some(heading),
        ..Default::default()
    })
}

/// NMEA ddmm.mmmm / dddmm.mmmm to signed decimal degrees
fn parse_coordinate(value: &str, hemisphere: &str) -> Option<f64> {
    let raw: f64 = value.parse().ok()?;
    let degrees = (raw / 100.0).trunc();
    let minutes = raw - degrees * 100.0;
    let coord = degrees + minutes / 60.0;

    match hemisphere {
        "S" | "W" => Some(-coord),
        _ => Some(coord),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    fn sentence(data: &str) -> String {
        format!("${}*{:02X}\r\n", data, nmea_checksum(data))
    }

    #[test]
    fn test_parse_rmc() {
        let line = sentence("GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W");
        let fix = parse_sentence(&line).unwrap();

        assert!((fix.lat.unwrap() - 48.1173).abs() < 1e-4);
        assert!((fix.lon.unwrap() - 11.5166).abs() < 1e-4);
        assert!((fix.heading.unwrap() - 84.4).abs() < 1e-4);
    }

    #[test]
    fn test_parse_rmc_southern_western() {
        let line = sentence("GPRMC,081836,A,3751.650,S,14507.360,W,000.0,360.0,130998,011.3,E");
        let fix = parse_sentence(&line).unwrap();

        assert!(fix.lat.unwrap() < 0.0);
        assert!(fix.lon.unwrap() < 0.0);
    }

    #[test]
    fn test_parse_rmc_void_status_rejected() {
        let line = sentence("GPRMC,123519,V,,,,,,,230394,,");
        assert_eq!(parse_sentence(&line), None);
    }

    #[test]
    fn test_parse_hdt() {
        let line = sentence("GPHDT,274.07,T");
        let fix = parse_sentence(&line).unwrap();

        assert_eq!(fix.lat, None);
        assert_eq!(fix.lon, None);
        assert!((fix.heading.unwrap() - 274.07).abs() < 1e-4);
    }

    #[test]
    fn test_checksum_mismatch_rejected() {
        let line = "$GPHDT,274.07,T*00";
        assert_eq!(parse_sentence(line), None);
    }

    #[test]
    fn test_unknown_sentence_skipped() {
        let line = sentence("GPGSV,3,1,11,03,03,111,00,04,15,270,00,06,01,010,00,13,06,292,00");
        assert_eq!(parse_sentence(&line), None);
    }

    #[test]
    fn test_poll_fix_returns_buffered_sentence() {
        let transport = MockTransport::new();
        let mut gnss = SerialGnss::new(Box::new(transport.clone()));

        transport.inject_read(sentence("GPHDT,91.5,T").as_bytes());

        let fix = gnss
            .poll_fix(Duration::from_millis(50))
            .unwrap()
            .expect("fix should be parsed");
        assert!((fix.heading.unwrap() - 91.5).abs() < 1e-4);
    }

    #[test]
    fn test_poll_fix_times_out_without_data() {
        let transport = MockTransport::new();
        let mut gnss = SerialGnss::new(Box::new(transport));

        let fix = gnss.poll_fix(Duration::from_millis(10)).unwrap();
        assert_eq!(fix, None);
    }

    #[test]
    fn test_poll_fix_skips_junk_then_parses() {
        let transport = MockTransport::new();
        let mut gnss = SerialGnss::new(Box::new(transport.clone()));

        transport.inject_read(b"garbage\r\n");
        transport.inject_read(sentence("GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W").as_bytes());

        let fix = gnss
            .poll_fix(Duration::from_millis(50))
            .unwrap()
            .expect("fix should be parsed");
        assert!(fix.lat.is_some());
    }
}
