//! Arena geometry shared with the planner.
//!
//! This module provides the world/grid coordinate transform and the
//! obstacle type supplied by the external planner.

pub mod obstacle;
pub mod transform;

pub use obstacle::Obstacle;
pub use transform::{GridTransform, WorldPoint};
