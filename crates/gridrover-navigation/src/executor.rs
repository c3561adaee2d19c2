//! Single-primitive motion execution.
//!
//! [`MotionExecutor::apply`] is the only place a committed [`GridPosition`]
//! ever changes. A candidate is computed from the kinematic table, checked
//! against obstacles and the arena bounds, and is either committed or
//! rejected; a rejected candidate is never assigned.

use core::fmt;

use gridrover_kinematics::{GridBounds, GridPosition, MotionPrimitive};
use tracing::{debug, trace};

use crate::collision::{CollisionChecker, CollisionPolicy};
use crate::error::NavigationError;
use crate::map::Obstacle;
use crate::observer::{CommittedStep, MotionObserver, NoopObserver};

/// Why a primitive was not committed. These are ordinary outcomes that
/// callers inspect, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejected {
    /// The move would run into an obstacle.
    Blocked,
    /// The destination lies outside the arena.
    OutOfBounds,
}

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejected::Blocked => write!(f, "blocked by obstacle"),
            Rejected::OutOfBounds => write!(f, "out of bounds"),
        }
    }
}

/// Evaluates `primitive` from `position` without committing anything.
///
/// Collision is checked first, then bounds, so a move that is both blocked
/// and out of bounds reports `Blocked`.
pub fn try_step(
    position: &GridPosition,
    primitive: MotionPrimitive,
    obstacles: &[Obstacle],
    bounds: &GridBounds,
    checker: &CollisionChecker,
    policy: CollisionPolicy,
) -> Result<GridPosition, Rejected> {
    let candidate = position.stepped(primitive);
    if checker.rejects(policy, position, &candidate, primitive, obstacles) {
        return Err(Rejected::Blocked);
    }
    if !bounds.contains_position(&candidate) {
        return Err(Rejected::OutOfBounds);
    }
    Ok(candidate)
}

/// Owns the robot's committed pose and applies primitives to it.
pub struct MotionExecutor<O = NoopObserver> {
    position: GridPosition,
    bounds: GridBounds,
    checker: CollisionChecker,
    policy: CollisionPolicy,
    observer: O,
    committed: u64,
}

impl MotionExecutor<NoopObserver> {
    /// Creates an executor with no observer attached.
    pub fn headless(start: GridPosition, bounds: GridBounds, checker: CollisionChecker) -> Result<Self, NavigationError> {
        Self::new(start, bounds, checker, NoopObserver)
    }
}

impl<O: MotionObserver> MotionExecutor<O> {
    /// Creates an executor at `start`.
    ///
    /// # Errors
    ///
    /// Returns `Err(NavigationError::StartOutOfBounds)` if `start` is not inside `bounds`.
    pub fn new(start: GridPosition, bounds: GridBounds, checker: CollisionChecker, observer: O) -> Result<Self, NavigationError> {
        if !bounds.contains_position(&start) {
            return Err(NavigationError::StartOutOfBounds { position: start, bounds });
        }
        Ok(Self {
            position: start,
            bounds,
            checker,
            policy: CollisionPolicy::default(),
            observer,
            committed: 0,
        })
    }

    /// Sets the collision policy for turns and diagonals.
    #[must_use]
    pub fn with_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The committed pose.
    pub fn position(&self) -> GridPosition {
        self.position
    }

    /// The arena bounds.
    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// The collision checker.
    pub fn checker(&self) -> &CollisionChecker {
        &self.checker
    }

    /// The collision policy.
    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Number of primitives committed so far.
    pub fn committed_steps(&self) -> u64 {
        self.committed
    }

    /// The attached observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Evaluates `primitive` from the committed pose without committing it.
    pub fn plan(&self, primitive: MotionPrimitive, obstacles: &[Obstacle]) -> Result<GridPosition, Rejected> {
        try_step(&self.position, primitive, obstacles, &self.bounds, &self.checker, self.policy)
    }

    /// Applies `primitive`, committing the new pose on success.
    ///
    /// On rejection the committed pose is left untouched.
    pub fn apply(&mut self, primitive: MotionPrimitive, obstacles: &[Obstacle]) -> Result<GridPosition, Rejected> {
        match self.plan(primitive, obstacles) {
            Ok(next) => {
                let step = CommittedStep {
                    index: self.committed,
                    primitive,
                    from: self.position,
                    to: next,
                };
                self.position = next;
                self.committed += 1;
                debug!(%primitive, from = %step.from, to = %step.to, "Committed step");
                self.observer.on_commit(&step);
                Ok(next)
            }
            Err(reason) => {
                trace!(%primitive, position = %self.position, %reason, "Rejected step");
                self.observer.on_reject(&self.position, primitive, reason);
                Err(reason)
            }
        }
    }
}
