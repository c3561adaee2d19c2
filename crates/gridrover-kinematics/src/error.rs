#![warn(missing_docs)]

//! Error types for the grid kinematics library.
//!
//! Motion rejections (blocked, out of bounds) are not errors and live in the
//! navigation crate. The variants here describe configuration defects.

use core::fmt;

/// Errors that can occur while configuring grid kinematics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KinematicsError {
    /// Error for invalid grid bounds.
    /// This variant is returned when the arena has zero or negative rows or columns.
    InvalidBounds(&'static str),
    /// Error for an unrecognised primitive command code.
    /// This variant is returned when parsing a serial command string fails.
    UnknownCommand(&'static str),
}

impl core::fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::InvalidBounds(msg) => write!(f, "Invalid grid bounds: {}", msg),
            KinematicsError::UnknownCommand(msg) => write!(f, "Unknown command code: {}", msg),
        }
    }
}

impl core::error::Error for KinematicsError {}
