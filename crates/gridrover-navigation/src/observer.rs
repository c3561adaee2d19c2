//! Observers of committed motion.
//!
//! The executor reports every committed step (and every rejection) to a
//! [`MotionObserver`]. Renderers, loggers and test recorders attach here; the
//! motion core never draws anything itself.

use gridrover_kinematics::{GridPosition, MotionPrimitive};

use crate::executor::Rejected;

/// One committed primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommittedStep {
    /// Zero-based sequence number across the executor's lifetime.
    pub index: u64,
    /// The primitive that was applied.
    pub primitive: MotionPrimitive,
    /// Pose before the step.
    pub from: GridPosition,
    /// Pose after the step.
    pub to: GridPosition,
}

/// Receives notifications from a [`crate::MotionExecutor`].
pub trait MotionObserver {
    /// Called once per committed primitive, after the position has changed.
    fn on_commit(&mut self, step: &CommittedStep);

    /// Called when a primitive is rejected. The position is unchanged.
    fn on_reject(&mut self, _position: &GridPosition, _primitive: MotionPrimitive, _reason: Rejected) {}
}

impl<O: MotionObserver + ?Sized> MotionObserver for &mut O {
    fn on_commit(&mut self, step: &CommittedStep) {
        (**self).on_commit(step);
    }

    fn on_reject(&mut self, position: &GridPosition, primitive: MotionPrimitive, reason: Rejected) {
        (**self).on_reject(position, primitive, reason);
    }
}

impl<O: MotionObserver + ?Sized> MotionObserver for Box<O> {
    fn on_commit(&mut self, step: &CommittedStep) {
        (**self).on_commit(step);
    }

    fn on_reject(&mut self, position: &GridPosition, primitive: MotionPrimitive, reason: Rejected) {
        (**self).on_reject(position, primitive, reason);
    }
}

/// Discards all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl MotionObserver for NoopObserver {
    fn on_commit(&mut self, _step: &CommittedStep) {}
}

/// Adapts a closure into an observer of committed steps.
pub struct FnObserver<F>(pub F);

impl<F: FnMut(&CommittedStep)> MotionObserver for FnObserver<F> {
    fn on_commit(&mut self, step: &CommittedStep) {
        (self.0)(step);
    }
}

/// Records every committed step and counts rejections.
#[derive(Debug, Clone, Default)]
pub struct Trajectory {
    steps: Vec<CommittedStep>,
    rejections: usize,
}

impl Trajectory {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All committed steps in order.
    pub fn steps(&self) -> &[CommittedStep] {
        &self.steps
    }

    /// The committed poses in order, one per step.
    pub fn positions(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.steps.iter().map(|s| s.to)
    }

    /// The primitives that were committed, in order.
    pub fn primitives(&self) -> Vec<MotionPrimitive> {
        self.steps.iter().map(|s| s.primitive).collect()
    }

    /// Number of rejected primitives seen.
    pub fn rejections(&self) -> usize {
        self.rejections
    }
}

impl MotionObserver for Trajectory {
    fn on_commit(&mut self, step: &CommittedStep) {
        self.steps.push(*step);
    }

    fn on_reject(&mut self, _position: &GridPosition, _primitive: MotionPrimitive, _reason: Rejected) {
        self.rejections += 1;
    }
}
