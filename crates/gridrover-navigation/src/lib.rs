//! Grid navigation for a car-like robot.
//!
//! The pieces compose bottom-up:
//!
//! * [`CollisionChecker`] predicts whether a straight move runs into an obstacle.
//! * [`MotionExecutor`] owns the committed pose and applies one primitive at a time.
//! * [`ObstacleAvoidanceSequencer`] runs the scripted detours.
//! * [`ScanAndAvoid`] drives forward until blocked and hands over to the detours.

pub mod collision;
pub mod control;
pub mod error;
pub mod executor;
pub mod interpreter;
pub mod maneuver;
pub mod map;
pub mod observer;

pub use collision::{CollisionChecker, CollisionPolicy};
pub use control::{RunGuard, RunTicket};
pub use error::{NavigationError, Result};
pub use executor::{MotionExecutor, Rejected, try_step};
pub use interpreter::{AbortReason, Phase, RunReport, RunStatus, ScanAndAvoid};
pub use maneuver::{EpisodeEnd, EpisodeReport, ManeuverKind, ManeuverProgress, ObstacleAvoidanceSequencer, Side};
pub use map::{GridTransform, Obstacle, WorldPoint};
pub use observer::{CommittedStep, FnObserver, MotionObserver, NoopObserver, Trajectory};
