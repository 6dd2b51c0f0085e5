//! Motion mixing from pilot intent to thruster commands

mod mixer;

pub use mixer::{DEFAULT_DEPTH_KP, ThrusterMixer, map_range};
