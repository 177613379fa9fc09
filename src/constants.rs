/// Constants used throughout the cave exploration system

use std::f64::consts::PI;

/// Default sensing and communication parameters
pub const DEFAULT_SENSE_RADIUS: f64 = 10.0; // Euclidean range of the local sense sweep
pub const DEFAULT_COMM_RADIUS: f64 = 10.0; // Euclidean range for inter-drone map merging
pub const DEFAULT_COMM_COOLDOWN: u32 = 25; // Minimum timesteps between merges of the same pair

/// Target selection constants
pub const PEER_BEARING_SIGMA: f64 = PI / 8.0; // Stddev of the peer-direction penalty Gaussian

/// Simulation limits
pub const MAX_SIMULATION_TICKS: u32 = 5000;
