//! This module defines the error types used by the `gridrover-navigation` crate.
//!
//! A blocked or out-of-bounds move is not an error: see [`crate::Rejected`].

#![warn(missing_docs)]

use gridrover_kinematics::{GridBounds, GridPosition, KinematicsError};
use thiserror::Error;

/// Error type for navigation setup and run control.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Invalid configuration, such as a non-positive cell size or an unknown side hint.
    #[error("Configuration error: {0}")]
    Configuration(&'static str),

    /// The initial pose does not lie inside the arena.
    #[error("Start position {position} is outside the {bounds} arena")]
    StartOutOfBounds {
        /// The rejected initial pose.
        position: GridPosition,
        /// The arena it was checked against.
        bounds: GridBounds,
    },

    /// A command sequence is already in flight.
    #[error("A command sequence is already running")]
    Busy,

    /// Error propagated from the kinematics crate.
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, NavigationError>;
