//! Turning-arc lookup table.
//!
//! The arc constants below were measured on the physical robot, in
//! centimetres, and are stored here already divided down to 10 cm cells.
//! They are deliberately asymmetric between rows and columns: the chassis
//! sweeps a longer arc fore/aft than sideways. Do not re-derive them.

use crate::{Heading, MotionPrimitive};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The cell and heading change produced by one primitive.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    /// Row change.
    pub d_row: i32,
    /// Column change.
    pub d_col: i32,
    /// Heading after the move.
    pub heading: Heading,
}

impl Delta {
    const fn new(d_row: i32, d_col: i32, heading: Heading) -> Self {
        Delta { d_row, d_col, heading }
    }
}

/// Look up the transition produced by applying `primitive` at `heading`.
///
/// Total over its domain: the match is exhaustive, so a missing entry fails
/// to compile.
///
/// Reverse turns alias their forward counterparts' heading transitions
/// crosswise: `ReverseTurnRight` ends at `TurnLeft`'s heading and
/// `ReverseTurnLeft` at `TurnRight`'s.
pub const fn delta(primitive: MotionPrimitive, heading: Heading) -> Delta {
    use Heading::{East as E, North as N, South as S, West as W};
    use MotionPrimitive::*;

    match (primitive, heading) {
        (Forward, h) => {
            let (d_row, d_col) = h.unit_step();
            Delta::new(d_row, d_col, h)
        }
        (Backward, h) => {
            let (d_row, d_col) = h.unit_step();
            Delta::new(-d_row, -d_col, h)
        }

        (TurnLeft, N) => Delta::new(-2, -3, W),
        (TurnLeft, E) => Delta::new(-3, 2, N),
        (TurnLeft, S) => Delta::new(2, 3, E),
        (TurnLeft, W) => Delta::new(3, -2, S),

        (TurnRight, N) => Delta::new(-2, 3, E),
        (TurnRight, E) => Delta::new(3, 2, S),
        (TurnRight, S) => Delta::new(2, -3, W),
        (TurnRight, W) => Delta::new(-3, -2, N),

        (ReverseTurnLeft, N) => Delta::new(3, -2, E),
        (ReverseTurnLeft, E) => Delta::new(-2, -3, S),
        (ReverseTurnLeft, S) => Delta::new(-3, 2, W),
        (ReverseTurnLeft, W) => Delta::new(2, 3, N),

        (ReverseTurnRight, N) => Delta::new(3, 2, W),
        (ReverseTurnRight, E) => Delta::new(2, -3, N),
        (ReverseTurnRight, S) => Delta::new(-3, -2, E),
        (ReverseTurnRight, W) => Delta::new(-2, 3, S),

        (DiagonalNE, N) => Delta::new(-4, 1, N),
        (DiagonalNE, E) => Delta::new(1, 4, E),
        (DiagonalNE, S) => Delta::new(4, -1, S),
        (DiagonalNE, W) => Delta::new(-1, -4, W),

        (DiagonalNW, N) => Delta::new(-4, -1, N),
        (DiagonalNW, E) => Delta::new(-1, 4, E),
        (DiagonalNW, S) => Delta::new(4, 1, S),
        (DiagonalNW, W) => Delta::new(1, -4, W),

        (DiagonalSE, N) => Delta::new(4, 1, N),
        (DiagonalSE, E) => Delta::new(1, -4, E),
        (DiagonalSE, S) => Delta::new(-4, -1, S),
        (DiagonalSE, W) => Delta::new(-1, 4, W),

        (DiagonalSW, N) => Delta::new(4, -1, N),
        (DiagonalSW, E) => Delta::new(-1, -4, E),
        (DiagonalSW, S) => Delta::new(-4, 1, S),
        (DiagonalSW, W) => Delta::new(1, 4, W),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GridPosition;

    #[test]
    fn test_straight_moves_follow_heading() {
        assert_eq!(delta(MotionPrimitive::Forward, Heading::North), Delta::new(-1, 0, Heading::North));
        assert_eq!(delta(MotionPrimitive::Forward, Heading::East), Delta::new(0, 1, Heading::East));
        assert_eq!(delta(MotionPrimitive::Backward, Heading::South), Delta::new(-1, 0, Heading::South));
        assert_eq!(delta(MotionPrimitive::Backward, Heading::West), Delta::new(0, 1, Heading::West));
    }

    #[test]
    fn test_forward_backward_cancel() {
        for h in Heading::ALL {
            let start = GridPosition::new(10, 10, h);
            assert_eq!(start.stepped(MotionPrimitive::Forward).stepped(MotionPrimitive::Backward), start);
            assert_eq!(start.stepped(MotionPrimitive::Backward).stepped(MotionPrimitive::Forward), start);
        }
    }

    #[test]
    fn test_turns_change_heading_by_quarter() {
        for h in Heading::ALL {
            assert_eq!(delta(MotionPrimitive::TurnRight, h).heading, h.turned_right());
            assert_eq!(delta(MotionPrimitive::TurnLeft, h).heading, h.turned_left());
        }
    }

    #[test]
    fn test_four_turns_close_the_cycle() {
        for h in Heading::ALL {
            for turn in [MotionPrimitive::TurnRight, MotionPrimitive::TurnLeft] {
                let mut p = GridPosition::new(0, 0, h);
                for _ in 0..4 {
                    p = p.stepped(turn);
                }
                assert_eq!(p.heading, h);
            }
        }
    }

    #[test]
    fn test_reverse_turn_heading_aliasing() {
        for h in Heading::ALL {
            assert_eq!(
                delta(MotionPrimitive::ReverseTurnRight, h).heading,
                delta(MotionPrimitive::TurnLeft, h).heading
            );
            assert_eq!(
                delta(MotionPrimitive::ReverseTurnLeft, h).heading,
                delta(MotionPrimitive::TurnRight, h).heading
            );
        }
        assert_eq!(delta(MotionPrimitive::ReverseTurnRight, Heading::East).heading, Heading::North);
    }

    #[test]
    fn test_diagonals_preserve_heading() {
        for h in Heading::ALL {
            for p in [
                MotionPrimitive::DiagonalNE,
                MotionPrimitive::DiagonalNW,
                MotionPrimitive::DiagonalSE,
                MotionPrimitive::DiagonalSW,
            ] {
                assert_eq!(delta(p, h).heading, h);
            }
        }
    }

    #[test]
    fn test_reverse_diagonals_undo_forward_diagonals() {
        // SE retraces NW and SW retraces NE.
        for h in Heading::ALL {
            let start = GridPosition::new(10, 10, h);
            assert_eq!(start.stepped(MotionPrimitive::DiagonalNW).stepped(MotionPrimitive::DiagonalSE), start);
            assert_eq!(start.stepped(MotionPrimitive::DiagonalNE).stepped(MotionPrimitive::DiagonalSW), start);
        }
    }

    #[test]
    fn test_arc_constants_are_asymmetric() {
        // Forward arcs from North: two rows up, three columns across.
        let right = delta(MotionPrimitive::TurnRight, Heading::North);
        assert_eq!((right.d_row, right.d_col), (-2, 3));
        let left = delta(MotionPrimitive::TurnLeft, Heading::North);
        assert_eq!((left.d_row, left.d_col), (-2, -3));
        let slide = delta(MotionPrimitive::DiagonalNE, Heading::North);
        assert_eq!((slide.d_row, slide.d_col), (-4, 1));
    }

    #[test]
    fn test_turn_displacements_are_rotations_of_each_other() {
        // Rotating the North entry clockwise gives the entry for the next heading.
        fn rotate_cw((r, c): (i32, i32)) -> (i32, i32) {
            (c, -r)
        }
        for p in MotionPrimitive::ALL {
            let mut expected = {
                let d = delta(p, Heading::North);
                (d.d_row, d.d_col)
            };
            for h in Heading::ALL {
                let d = delta(p, h);
                assert_eq!((d.d_row, d.d_col), expected, "{:?} at {:?}", p, h);
                expected = rotate_cw(expected);
            }
        }
    }
}
