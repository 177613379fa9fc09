use thiserror::Error;

use crate::constants::*;

/// Errors raised when swarm parameters fail validation.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("cave dimensions must be non-zero, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("swarm must contain at least one drone")]
    NoDrones,
    #[error("{name} must be positive, got {value}")]
    NonPositiveRadius { name: &'static str, value: f64 },
    #[error("spawn position ({x}, {y}) is outside the cave")]
    SpawnOutOfBounds { x: f64, y: f64 },
    #[error("cave is {actual_width}x{actual_height} but config says {width}x{height}")]
    GridMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },
}

/// Immutable swarm-wide parameters, owned by the driver.
///
/// Drones receive a copy at construction; nothing here changes after
/// validation succeeds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SwarmConfig {
    pub width: usize,
    pub height: usize,
    pub drone_count: usize,
    pub sense_radius: f64,
    pub comm_radius: f64,
    pub comm_cooldown: u32,
}

impl SwarmConfig {
    /// Builds a config with the default radii and cooldown.
    pub fn new(width: usize, height: usize, drone_count: usize) -> Result<Self, ConfigError> {
        Self::with_radii(
            width,
            height,
            drone_count,
            DEFAULT_SENSE_RADIUS,
            DEFAULT_COMM_RADIUS,
            DEFAULT_COMM_COOLDOWN,
        )
    }

    pub fn with_radii(
        width: usize,
        height: usize,
        drone_count: usize,
        sense_radius: f64,
        comm_radius: f64,
        comm_cooldown: u32,
    ) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyGrid { width, height });
        }
        if drone_count == 0 {
            return Err(ConfigError::NoDrones);
        }
        if sense_radius <= 0.0 {
            return Err(ConfigError::NonPositiveRadius {
                name: "sense_radius",
                value: sense_radius,
            });
        }
        if comm_radius <= 0.0 {
            return Err(ConfigError::NonPositiveRadius {
                name: "comm_radius",
                value: comm_radius,
            });
        }
        Ok(SwarmConfig {
            width,
            height,
            drone_count,
            sense_radius,
            comm_radius,
            comm_cooldown,
        })
    }
}
