use gridrover_kinematics::{Cell, GridPosition, Heading};

use super::{GridTransform, WorldPoint};

/// An obstacle block supplied by the planner. Immutable for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obstacle {
    /// Planner-assigned identifier.
    pub id: u32,
    /// Position of the block in world coordinates (centimetres).
    pub position: WorldPoint,
    /// Heading the marked face of the block points towards.
    pub facing: Heading,
}

impl Obstacle {
    /// Creates a new obstacle.
    pub const fn new(id: u32, position: WorldPoint, facing: Heading) -> Self {
        Self { id, position, facing }
    }

    /// Creates an obstacle occupying `cell` under `transform`.
    pub fn at_cell(id: u32, cell: Cell, facing: Heading, transform: &GridTransform) -> Self {
        Self::new(id, transform.grid_to_world(cell), facing)
    }

    /// The grid cell this obstacle occupies.
    pub fn cell(&self, transform: &GridTransform) -> Cell {
        transform.world_to_grid(self.position)
    }

    /// The pose from which the robot faces the marked side of this obstacle,
    /// `standoff` cells out from it and looking back at it.
    pub fn approach_target(&self, transform: &GridTransform, standoff: i32) -> GridPosition {
        let (d_row, d_col) = self.facing.unit_step();
        let cell = self.cell(transform).offset(d_row * standoff, d_col * standoff);
        GridPosition::new(cell.row, cell.col, self.facing.reversed())
    }
}
