//! Collision prediction for straight moves.
//!
//! The chassis occupies a 3×3 block of cells around its centre. A straight
//! move sweeps the three cells two ahead of (or behind) the centre, which is
//! the row or column the footprint is about to enter. Obstacles are tested by
//! exact cell equality; there is no partial-overlap logic.

use gridrover_kinematics::{Cell, GridPosition, MotionPrimitive};

use crate::map::{GridTransform, Obstacle};

/// Which primitives are collision-checked before they are committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CollisionPolicy {
    /// Only `Forward` and `Backward` are checked; turns and diagonals are
    /// assumed clear.
    #[default]
    StraightOnly,
    /// Straight moves are checked as above; turns and diagonals are rejected
    /// when the destination footprint covers an obstacle cell.
    AllPrimitives,
}

/// Pure collision predicate over an obstacle slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionChecker {
    transform: GridTransform,
}

impl CollisionChecker {
    /// Creates a checker that locates obstacles with `transform`.
    pub fn new(transform: GridTransform) -> Self {
        Self { transform }
    }

    /// The world/grid transform in use.
    pub fn transform(&self) -> &GridTransform {
        &self.transform
    }

    /// The three cells a straight move from `position` sweeps into, or `None`
    /// for primitives that are not straight.
    pub fn swept_band(position: &GridPosition, primitive: MotionPrimitive) -> Option<[Cell; 3]> {
        let (row_step, col_step) = position.heading.unit_step();
        let (d_row, d_col) = match primitive {
            MotionPrimitive::Forward => (row_step, col_step),
            MotionPrimitive::Backward => (-row_step, -col_step),
            _ => return None,
        };
        let centre = position.cell().offset(2 * d_row, 2 * d_col);
        // Across the direction of travel.
        let (across_row, across_col) = (d_col.abs(), d_row.abs());
        Some([
            centre.offset(-across_row, -across_col),
            centre,
            centre.offset(across_row, across_col),
        ])
    }

    /// Does a straight move from `position` run into any obstacle?
    ///
    /// Always `false` for turns and diagonals.
    pub fn is_blocked(&self, position: &GridPosition, primitive: MotionPrimitive, obstacles: &[Obstacle]) -> bool {
        let Some(band) = Self::swept_band(position, primitive) else {
            return false;
        };
        obstacles
            .iter()
            .map(|o| o.cell(&self.transform))
            .any(|cell| band.contains(&cell))
    }

    /// Does the footprint of `candidate` cover any obstacle cell?
    pub fn footprint_blocked(&self, candidate: &GridPosition, obstacles: &[Obstacle]) -> bool {
        let footprint = candidate.footprint();
        obstacles
            .iter()
            .map(|o| o.cell(&self.transform))
            .any(|cell| footprint.contains(&cell))
    }

    /// Policy-aware check for moving from `position` to `candidate` with `primitive`.
    pub fn rejects(
        &self,
        policy: CollisionPolicy,
        position: &GridPosition,
        candidate: &GridPosition,
        primitive: MotionPrimitive,
        obstacles: &[Obstacle],
    ) -> bool {
        if primitive.is_straight() {
            return self.is_blocked(position, primitive, obstacles);
        }
        match policy {
            CollisionPolicy::StraightOnly => false,
            CollisionPolicy::AllPrimitives => self.footprint_blocked(candidate, obstacles),
        }
    }
}
