//! The scan-and-avoid loop.
//!
//! Drives forward until blocked, runs the first detour, drives forward until
//! blocked again, runs the second detour. This is the only place where the
//! executor, the collision checker and the sequencer are composed, and the
//! entry point for an external start trigger.

use std::sync::Arc;

use gridrover_kinematics::{GridPosition, MotionPrimitive};
use tracing::{debug, info, warn};

use crate::control::{RunGuard, RunTicket};
use crate::error::NavigationError;
use crate::executor::{MotionExecutor, Rejected};
use crate::maneuver::{EpisodeEnd, ManeuverKind, ManeuverProgress, ObstacleAvoidanceSequencer, Side};
use crate::map::Obstacle;
use crate::observer::MotionObserver;

/// Where the loop is in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No run has started yet.
    Idle,
    /// Driving forward towards the first obstacle.
    ScanningToFirstObstacle,
    /// Running the first detour.
    AvoidingFirst,
    /// Driving forward towards the second obstacle.
    ScanningToSecondObstacle,
    /// Running the second detour.
    AvoidingSecond,
    /// The run finished normally.
    Done,
    /// The run stopped early.
    Aborted,
}

/// Why a run stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbortReason {
    /// Cancellation was requested.
    Cancelled,
    /// A scan reached the arena edge without ever being blocked.
    Boundary,
}

/// Terminal status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStatus {
    /// Both detours completed.
    Done,
    /// The run stopped in `phase` for `reason`.
    Aborted {
        /// Why the run stopped.
        reason: AbortReason,
        /// The phase that was active when it stopped.
        phase: Phase,
    },
}

/// Summary of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// How the run ended.
    pub status: RunStatus,
    /// Pose after the last committed step.
    pub final_position: GridPosition,
    /// Cells advanced during each of the two scans.
    pub cells_scanned: [u32; 2],
    /// Primitives committed during the run, scans included.
    pub committed_steps: u64,
    /// Detour primitives that were rejected and skipped.
    pub rejected_substeps: u32,
    /// Forward credit when the run ended. Scanned cells count towards it.
    pub final_credit: i32,
}

enum ScanEnd {
    Blocked,
    Aborted(AbortReason),
}

/// The scan-and-avoid state machine.
pub struct ScanAndAvoid<O> {
    executor: MotionExecutor<O>,
    obstacles: Arc<[Obstacle]>,
    hints: [Side; 2],
    guard: RunGuard,
    phase: Phase,
}

impl<O: MotionObserver> ScanAndAvoid<O> {
    /// Creates the loop around an executor.
    ///
    /// # Arguments
    /// * `executor` - Owns the robot pose for the life of the loop
    /// * `obstacles` - The obstacle set, immutable for every run
    /// * `hints` - Side hints for the first and second obstacle
    pub fn new(executor: MotionExecutor<O>, obstacles: impl Into<Arc<[Obstacle]>>, hints: [Side; 2]) -> Self {
        Self {
            executor,
            obstacles: obstacles.into(),
            hints,
            guard: RunGuard::new(),
            phase: Phase::Idle,
        }
    }

    /// Shares an existing guard, so that several entry points exclude each other.
    #[must_use]
    pub fn with_guard(mut self, guard: RunGuard) -> Self {
        self.guard = guard;
        self
    }

    /// A handle for cancelling the run or checking whether it is busy.
    pub fn guard(&self) -> RunGuard {
        self.guard.clone()
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The committed pose.
    pub fn position(&self) -> GridPosition {
        self.executor.position()
    }

    /// The obstacle set.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// The side hints.
    pub fn hints(&self) -> [Side; 2] {
        self.hints
    }

    /// The underlying executor.
    pub fn executor(&self) -> &MotionExecutor<O> {
        &self.executor
    }

    /// Applies a single primitive outside of a run, e.g. for manual driving.
    ///
    /// # Errors
    ///
    /// Returns `Err(NavigationError::Busy)` while a run holds the guard.
    pub fn step(&mut self, primitive: MotionPrimitive) -> Result<Result<GridPosition, Rejected>, NavigationError> {
        let _ticket = self.guard.try_acquire()?;
        Ok(self.executor.apply(primitive, &self.obstacles))
    }

    /// Runs scan, detour, scan, detour.
    ///
    /// Sub-step rejections inside a detour never fail the run. The run is
    /// aborted if cancellation is requested or a scan reaches the arena edge.
    ///
    /// # Errors
    ///
    /// Returns `Err(NavigationError::Busy)` if another sequence holds the guard.
    pub fn run(&mut self) -> Result<RunReport, NavigationError> {
        let ticket = self.guard.try_acquire()?;
        let steps_before = self.executor.committed_steps();
        let mut progress = ManeuverProgress::default();
        let mut cells_scanned = [0u32; 2];
        let mut rejected_substeps = 0;

        info!(start = %self.executor.position(), hints = ?self.hints, obstacles = self.obstacles.len(), "Scan-and-avoid run started");

        let stages = [
            (Phase::ScanningToFirstObstacle, Phase::AvoidingFirst, ManeuverKind::First),
            (Phase::ScanningToSecondObstacle, Phase::AvoidingSecond, ManeuverKind::Second),
        ];

        let mut status = RunStatus::Done;
        for (i, (scanning, avoiding, kind)) in stages.into_iter().enumerate() {
            self.enter(scanning);
            let (advanced, end) = self.scan(&ticket, &mut progress);
            cells_scanned[i] = advanced;
            if let ScanEnd::Aborted(reason) = end {
                status = RunStatus::Aborted { reason, phase: scanning };
                break;
            }

            self.enter(avoiding);
            let sequencer = ObstacleAvoidanceSequencer::new(kind, self.hints[i]);
            let report = sequencer.execute(&mut self.executor, &self.obstacles, progress, || ticket.is_cancelled());
            progress = report.progress;
            rejected_substeps += report.rejected;
            if report.end == EpisodeEnd::Cancelled {
                status = RunStatus::Aborted {
                    reason: AbortReason::Cancelled,
                    phase: avoiding,
                };
                break;
            }
        }

        self.enter(match status {
            RunStatus::Done => Phase::Done,
            RunStatus::Aborted { .. } => Phase::Aborted,
        });

        let report = RunReport {
            status,
            final_position: self.executor.position(),
            cells_scanned,
            committed_steps: self.executor.committed_steps() - steps_before,
            rejected_substeps,
            final_credit: progress.forward_credit_owed,
        };
        match report.status {
            RunStatus::Done => info!(?report, "Scan-and-avoid run finished"),
            RunStatus::Aborted { .. } => warn!(?report, "Scan-and-avoid run aborted"),
        }
        Ok(report)
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = ?self.phase, to = ?phase, "Phase transition");
        self.phase = phase;
    }

    /// Drives forward until blocked. Returns the number of cells advanced.
    ///
    /// Every advanced cell is owed back to the course, so it is credited to
    /// `progress` as well.
    fn scan(&mut self, ticket: &RunTicket, progress: &mut ManeuverProgress) -> (u32, ScanEnd) {
        let mut advanced = 0;
        loop {
            if ticket.is_cancelled() {
                return (advanced, ScanEnd::Aborted(AbortReason::Cancelled));
            }
            match self.executor.apply(MotionPrimitive::Forward, &self.obstacles) {
                Ok(_) => {
                    advanced += 1;
                    progress.forward_credit_owed += 1;
                }
                Err(Rejected::Blocked) => {
                    info!(advanced, position = %self.executor.position(), "Obstacle detected");
                    return (advanced, ScanEnd::Blocked);
                }
                Err(Rejected::OutOfBounds) => {
                    warn!(advanced, position = %self.executor.position(), "Reached arena edge while scanning");
                    return (advanced, ScanEnd::Aborted(AbortReason::Boundary));
                }
            }
        }
    }
}
