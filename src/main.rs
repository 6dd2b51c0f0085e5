//! varuna-core - Motion-control daemon for the Varuna ROV
//!
//! Opens the vehicle link, thruster bus and GNSS receiver, then runs the
//! fixed-cadence control loop until SIGINT/SIGTERM. Shutdown always disarms
//! before the link comes down.

use std::env;
use std::sync::atomic::Ordering;
use std::time::Duration;
use varuna_core::config::Config;
use varuna_core::control::ControlLoop;
use varuna_core::drivers::{SerialGnss, SerialLink, SerialThrusterBus};
use varuna_core::error::{Error, Result};
use varuna_core::transport::SerialTransport;

/// Read timeout for the thruster bus port (write-mostly)
const MOTOR_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Read timeout for a single GNSS port read; the poll deadline above it is
/// configured separately
const GNSS_READ_TIMEOUT: Duration = Duration::from_millis(10);

/// Parse config path from command line arguments.
///
/// Supports:
/// - `varuna-core <path>` (positional)
/// - `varuna-core --config <path>` (flag-based)
/// - `varuna-core -c <path>` (short flag)
///
/// Defaults to `/etc/varuna.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    // Look for --config or -c flag
    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    // Fall back to first positional argument (if it doesn't start with -)
    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    // Default path
    "/etc/varuna.toml".to_string()
}

fn main() -> Result<()> {
    let config_path = parse_config_path();
    let config = Config::load(&config_path)?;

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("varuna-core v{} starting...", env!("CARGO_PKG_VERSION"));
    log::info!("Using config: {}", config_path);

    // Open the hardware shims
    let link = SerialLink::open(&config.hardware.link_port, config.hardware.link_baud)?;

    let motor_transport = SerialTransport::open(
        &config.hardware.motor_port,
        config.hardware.motor_baud,
        MOTOR_READ_TIMEOUT,
    )?;
    let motors = SerialThrusterBus::new(Box::new(motor_transport));

    let gnss_transport = SerialTransport::open(
        &config.hardware.gnss_port,
        config.hardware.gnss_baud,
        GNSS_READ_TIMEOUT,
    )?;
    let gnss = SerialGnss::new(Box::new(gnss_transport));

    let mut control = ControlLoop::new(
        &config,
        Box::new(link),
        Box::new(motors),
        Box::new(gnss),
    );

    // SIGINT/SIGTERM clears the flag; the loop then runs the shutdown path
    let running = control.shutdown_flag();
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        running.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    log::info!("varuna-core running. Press Ctrl-C to stop.");
    control.run()?;

    log::info!("varuna-core stopped");
    Ok(())
}
