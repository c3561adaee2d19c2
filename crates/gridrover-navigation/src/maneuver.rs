//! Obstacle avoidance choreographies.
//!
//! When the scan loop is blocked it hands control to a fixed, hand-authored
//! script of primitives that routes the robot around the obstacle. The
//! scripts keep a running forward credit: backing up debits it, the first
//! detour banks a fixed amount, and the second detour spends what is left
//! so that the robot ends up level with where it would have been.
//!
//! The credit arithmetic (−3 then +10, −3 then spend the remainder) was
//! measured on the course. It is not derived from the arc constants.
//!
//! Known gap: a primitive that is rejected mid-script is logged and skipped.
//! The script carries on from wherever the robot actually is; nothing is
//! retried or escalated.

use core::fmt;
use core::str::FromStr;

use gridrover_kinematics::MotionPrimitive;
use tracing::{debug, info, warn};

use crate::error::NavigationError;
use crate::executor::MotionExecutor;
use crate::map::Obstacle;
use crate::observer::MotionObserver;

/// Which way to pass an obstacle. Supplied per obstacle by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    /// Pass with the obstacle on the robot's right.
    Left,
    /// Pass with the obstacle on the robot's left.
    Right,
}

impl FromStr for Side {
    type Err = NavigationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "L" | "l" | "left" | "Left" => Ok(Side::Left),
            "R" | "r" | "right" | "Right" => Ok(Side::Right),
            _ => Err(NavigationError::Configuration("side hint must be L or R")),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("L"),
            Side::Right => f.write_str("R"),
        }
    }
}

/// Which of the two scripted detours to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManeuverKind {
    /// Detour around the first obstacle; banks forward credit.
    First,
    /// Detour around the second obstacle; spends the banked credit.
    Second,
}

/// Scratch state threaded through the detours of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManeuverProgress {
    /// Cells of forward travel still owed to the course.
    pub forward_credit_owed: i32,
}

/// One instruction of a choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Apply a primitive once.
    Drive(MotionPrimitive),
    /// Apply `Backward` once and debit one cell, whether or not it committed.
    BackUp,
    /// Debit credit without moving.
    Debit(i32),
    /// Credit without moving.
    Credit(i32),
    /// Apply `Forward` once per owed cell (nothing if the credit is not positive).
    SpendCredit,
}

impl Step {
    /// The same step with left and right swapped.
    pub const fn mirrored(self) -> Step {
        match self {
            Step::Drive(MotionPrimitive::TurnLeft) => Step::Drive(MotionPrimitive::TurnRight),
            Step::Drive(MotionPrimitive::TurnRight) => Step::Drive(MotionPrimitive::TurnLeft),
            Step::Drive(MotionPrimitive::ReverseTurnLeft) => Step::Drive(MotionPrimitive::ReverseTurnRight),
            Step::Drive(MotionPrimitive::ReverseTurnRight) => Step::Drive(MotionPrimitive::ReverseTurnLeft),
            Step::Drive(MotionPrimitive::DiagonalNE) => Step::Drive(MotionPrimitive::DiagonalNW),
            Step::Drive(MotionPrimitive::DiagonalNW) => Step::Drive(MotionPrimitive::DiagonalNE),
            Step::Drive(MotionPrimitive::DiagonalSE) => Step::Drive(MotionPrimitive::DiagonalSW),
            Step::Drive(MotionPrimitive::DiagonalSW) => Step::Drive(MotionPrimitive::DiagonalSE),
            other => other,
        }
    }
}

use MotionPrimitive::{Forward, TurnLeft, TurnRight};

const FIRST_LEFT: &[Step] = &[
    Step::BackUp,
    Step::BackUp,
    Step::BackUp,
    Step::Drive(TurnLeft),
    Step::Drive(TurnRight),
    Step::Drive(TurnRight),
    Step::Drive(TurnLeft),
    Step::Credit(10),
];

const SECOND_LEFT: &[Step] = &[
    Step::BackUp,
    Step::BackUp,
    Step::Debit(1),
    Step::Drive(TurnLeft),
    Step::Drive(TurnRight),
    Step::Drive(TurnRight),
    Step::Drive(Forward),
    Step::Drive(Forward),
    Step::Drive(Forward),
    Step::Drive(Forward),
    Step::Drive(Forward),
    Step::Drive(TurnRight),
    Step::SpendCredit,
    Step::Drive(TurnRight),
    Step::Drive(TurnLeft),
];

/// The script for a detour. Right-hand scripts mirror the left-hand ones.
pub fn choreography(kind: ManeuverKind, side: Side) -> Vec<Step> {
    let left = match kind {
        ManeuverKind::First => FIRST_LEFT,
        ManeuverKind::Second => SECOND_LEFT,
    };
    match side {
        Side::Left => left.to_vec(),
        Side::Right => left.iter().map(|s| s.mirrored()).collect(),
    }
}

/// How a detour finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeEnd {
    /// Every step of the script was attempted.
    Completed,
    /// Cancellation was observed between primitives; the rest was skipped.
    Cancelled,
}

/// Result of one detour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeReport {
    /// The credit after the detour, to be threaded into the next one.
    pub progress: ManeuverProgress,
    /// How the detour finished.
    pub end: EpisodeEnd,
    /// Primitives that committed.
    pub committed: u32,
    /// Primitives that were rejected and skipped.
    pub rejected: u32,
}

/// Runs scripted detours through a [`MotionExecutor`].
#[derive(Debug, Clone, Copy)]
pub struct ObstacleAvoidanceSequencer {
    kind: ManeuverKind,
    side: Side,
}

impl ObstacleAvoidanceSequencer {
    /// Creates a sequencer for one detour.
    pub fn new(kind: ManeuverKind, side: Side) -> Self {
        Self { kind, side }
    }

    /// Which detour this runs.
    pub fn kind(&self) -> ManeuverKind {
        self.kind
    }

    /// Which side it passes on.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Executes the detour.
    ///
    /// `is_cancelled` is polled before every primitive. Already committed
    /// steps are never rolled back.
    pub fn execute<O, C>(
        &self,
        executor: &mut MotionExecutor<O>,
        obstacles: &[Obstacle],
        progress: ManeuverProgress,
        is_cancelled: C,
    ) -> EpisodeReport
    where
        O: MotionObserver,
        C: Fn() -> bool,
    {
        info!(kind = ?self.kind, side = %self.side, credit = progress.forward_credit_owed, "Starting avoidance maneuver");
        let mut episode = Episode {
            executor,
            obstacles,
            is_cancelled,
            report: EpisodeReport {
                progress,
                end: EpisodeEnd::Completed,
                committed: 0,
                rejected: 0,
            },
        };

        for step in choreography(self.kind, self.side) {
            let carry_on = match step {
                Step::Drive(primitive) => episode.drive(primitive),
                Step::BackUp => {
                    let carry_on = episode.drive(MotionPrimitive::Backward);
                    if carry_on {
                        episode.report.progress.forward_credit_owed -= 1;
                    }
                    carry_on
                }
                Step::Debit(n) => {
                    episode.report.progress.forward_credit_owed -= n;
                    true
                }
                Step::Credit(n) => {
                    episode.report.progress.forward_credit_owed += n;
                    true
                }
                Step::SpendCredit => {
                    let owed = episode.report.progress.forward_credit_owed.max(0);
                    debug!(owed, "Spending forward credit");
                    (0..owed).all(|_| episode.drive(MotionPrimitive::Forward))
                }
            };
            if !carry_on {
                episode.report.end = EpisodeEnd::Cancelled;
                info!(credit = episode.report.progress.forward_credit_owed, "Avoidance maneuver cancelled");
                return episode.report;
            }
        }

        info!(
            credit = episode.report.progress.forward_credit_owed,
            committed = episode.report.committed,
            rejected = episode.report.rejected,
            position = %episode.executor.position(),
            "Avoidance maneuver complete"
        );
        episode.report
    }
}

struct Episode<'a, O, C> {
    executor: &'a mut MotionExecutor<O>,
    obstacles: &'a [Obstacle],
    is_cancelled: C,
    report: EpisodeReport,
}

impl<O: MotionObserver, C: Fn() -> bool> Episode<'_, O, C> {
    /// Attempts one primitive. Returns `false` if cancellation stopped it
    /// from being attempted; a rejection still counts as attempted.
    fn drive(&mut self, primitive: MotionPrimitive) -> bool {
        if (self.is_cancelled)() {
            return false;
        }
        match self.executor.apply(primitive, self.obstacles) {
            Ok(_) => self.report.committed += 1,
            Err(reason) => {
                self.report.rejected += 1;
                warn!(%primitive, %reason, position = %self.executor.position(), "Maneuver step rejected, continuing");
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::CollisionChecker;
    use crate::map::GridTransform;
    use crate::observer::Trajectory;
    use gridrover_kinematics::{Cell, GridBounds, GridPosition, Heading};

    fn executor(start: GridPosition) -> MotionExecutor<Trajectory> {
        let bounds = GridBounds::new(20, 20).unwrap();
        let checker = CollisionChecker::new(GridTransform::bottom_left(bounds, 10).unwrap());
        MotionExecutor::new(start, bounds, checker, Trajectory::new()).unwrap()
    }

    fn never() -> bool {
        false
    }

    #[test]
    fn test_side_parse() {
        assert_eq!("L".parse::<Side>().unwrap(), Side::Left);
        assert_eq!("right".parse::<Side>().unwrap(), Side::Right);
        assert!(matches!("X".parse::<Side>(), Err(NavigationError::Configuration(_))));
        assert_eq!(Side::Right.to_string(), "R");
    }

    #[test]
    fn test_right_scripts_mirror_turns() {
        let right = choreography(ManeuverKind::First, Side::Right);
        let drives: Vec<_> = right
            .iter()
            .filter_map(|s| match s {
                Step::Drive(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(drives, vec![TurnRight, TurnLeft, TurnLeft, TurnRight]);
    }

    #[test]
    fn test_mirror_is_involution() {
        for kind in [ManeuverKind::First, ManeuverKind::Second] {
            let twice: Vec<Step> = choreography(kind, Side::Right).iter().map(|s| s.mirrored()).collect();
            assert_eq!(twice, choreography(kind, Side::Left));
        }
    }

    #[test]
    fn test_first_left_restores_heading_and_banks_credit() {
        let start = GridPosition::new(10, 10, Heading::North);
        let mut exec = executor(start);
        let obstacles = [Obstacle::at_cell(0, Cell::new(8, 10), Heading::South, exec.checker().transform())];
        let report = ObstacleAvoidanceSequencer::new(ManeuverKind::First, Side::Left).execute(
            &mut exec,
            &obstacles,
            ManeuverProgress::default(),
            never,
        );
        assert_eq!(report.end, EpisodeEnd::Completed);
        assert_eq!(report.progress.forward_credit_owed, 7);
        assert_eq!(report.committed, 7);
        assert_eq!(report.rejected, 0);
        assert_eq!(exec.position().heading, Heading::North);
        assert_eq!(
            exec.observer().primitives(),
            vec![
                MotionPrimitive::Backward,
                MotionPrimitive::Backward,
                MotionPrimitive::Backward,
                TurnLeft,
                TurnRight,
                TurnRight,
                TurnLeft
            ]
        );
    }

    #[test]
    fn test_first_right_restores_heading() {
        let mut exec = executor(GridPosition::new(10, 10, Heading::North));
        let report = ObstacleAvoidanceSequencer::new(ManeuverKind::First, Side::Right).execute(
            &mut exec,
            &[],
            ManeuverProgress::default(),
            never,
        );
        assert_eq!(report.progress.forward_credit_owed, 7);
        assert_eq!(exec.position().heading, Heading::North);
    }

    #[test]
    fn test_second_left_spends_credit() {
        let mut exec = executor(GridPosition::new(10, 10, Heading::North));
        let report = ObstacleAvoidanceSequencer::new(ManeuverKind::Second, Side::Left).execute(
            &mut exec,
            &[],
            ManeuverProgress { forward_credit_owed: 7 },
            never,
        );
        assert_eq!(report.end, EpisodeEnd::Completed);
        // 7 - 2 (backing up) - 1 leaves 4 cells to spend.
        assert_eq!(report.progress.forward_credit_owed, 4);
        assert_eq!(report.rejected, 0);
        assert_eq!(report.committed, 2 + 3 + 5 + 1 + 4 + 2);
        let forwards = exec
            .observer()
            .primitives()
            .into_iter()
            .filter(|p| *p == MotionPrimitive::Forward)
            .count();
        assert_eq!(forwards, 5 + 4);
        // Back on the starting column, facing back down the course.
        assert_eq!(exec.position(), GridPosition::new(17, 10, Heading::South));
    }

    #[test]
    fn test_second_with_no_credit_skips_spend() {
        let mut exec = executor(GridPosition::new(10, 10, Heading::North));
        let report = ObstacleAvoidanceSequencer::new(ManeuverKind::Second, Side::Right).execute(
            &mut exec,
            &[],
            ManeuverProgress::default(),
            never,
        );
        assert_eq!(report.progress.forward_credit_owed, -3);
        assert_eq!(report.committed + report.rejected, 2 + 3 + 5 + 1 + 2);
    }

    #[test]
    fn test_rejected_steps_are_skipped_not_fatal() {
        // Backed against the bottom edge: every backup is out of bounds.
        let mut exec = executor(GridPosition::new(19, 10, Heading::North));
        let report = ObstacleAvoidanceSequencer::new(ManeuverKind::First, Side::Left).execute(
            &mut exec,
            &[],
            ManeuverProgress::default(),
            never,
        );
        assert_eq!(report.end, EpisodeEnd::Completed);
        assert_eq!(report.rejected, 3);
        assert_eq!(report.committed, 4);
        assert_eq!(report.progress.forward_credit_owed, 7);
    }

    #[test]
    fn test_cancel_stops_between_primitives() {
        use std::cell::Cell as StdCell;
        let start = GridPosition::new(10, 10, Heading::North);
        let mut exec = executor(start);
        let polls = StdCell::new(0);
        let cancel_after_two = || {
            polls.set(polls.get() + 1);
            polls.get() > 2
        };
        let report = ObstacleAvoidanceSequencer::new(ManeuverKind::First, Side::Left).execute(
            &mut exec,
            &[],
            ManeuverProgress::default(),
            cancel_after_two,
        );
        assert_eq!(report.end, EpisodeEnd::Cancelled);
        assert_eq!(report.committed, 2);
        assert_eq!(report.progress.forward_credit_owed, -2);
        // Committed steps are kept.
        assert_eq!(exec.position(), GridPosition::new(12, 10, Heading::North));
    }
}
