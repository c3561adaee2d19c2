#![warn(missing_docs)]

// NOTES:
// - World coordinates are integer centimetres with y pointing up, grid rows
//   point down. The transform flips y and shifts it by `origin_offset`
//   before dividing by the cell size.

use gridrover_kinematics::{Cell, GridBounds};

use crate::error::NavigationError;

/// Represents a point in world coordinates (centimetres).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    /// The x-coordinate in centimetres.
    pub x: i32,
    /// The y-coordinate in centimetres.
    pub y: i32,
}

impl WorldPoint {
    /// Creates a new `WorldPoint`.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Affine world→grid transform: flip the y axis so the world origin lines
/// up with the grid origin, then divide by the cell size.
///
/// `row = (arena_length - origin_offset - y) div cell_size`, `col = x div cell_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridTransform {
    /// Edge length of one cell in centimetres
    cell_size: i32,
    /// Length of the arena along y in centimetres
    arena_length: i32,
    /// Distance between the far arena edge and the world y origin, in centimetres
    origin_offset: i32,
}

impl GridTransform {
    /// Creates a new transform.
    ///
    /// # Arguments
    /// * `cell_size` - Edge length of one cell in centimetres
    /// * `arena_length` - Length of the arena along y in centimetres
    /// * `origin_offset` - Offset subtracted after flipping y, in centimetres
    ///
    /// # Returns
    /// * `Result<Self, NavigationError>` - The transform or an error if `cell_size` is not positive
    pub fn new(cell_size: i32, arena_length: i32, origin_offset: i32) -> Result<Self, NavigationError> {
        if cell_size <= 0 {
            return Err(NavigationError::Configuration("cell size must be positive"));
        }
        Ok(Self {
            cell_size,
            arena_length,
            origin_offset,
        })
    }

    /// A transform whose world origin is the bottom-left corner of `bounds`:
    /// world `y = 0` lands on the last row.
    pub fn bottom_left(bounds: GridBounds, cell_size: i32) -> Result<Self, NavigationError> {
        let arena_length = bounds
            .rows()
            .checked_mul(cell_size)
            .ok_or(NavigationError::Configuration("arena length overflows i32"))?;
        Self::new(cell_size, arena_length, cell_size)
    }

    /// Edge length of one cell in centimetres.
    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Converts world coordinates to the grid cell that contains them.
    /// The result may lie outside the arena; bounds are the caller's concern.
    /// Coordinates far outside the `i32` range saturate instead of wrapping.
    pub fn world_to_grid(&self, p: WorldPoint) -> Cell {
        Cell::new(
            self.flipped_y()
                .saturating_sub(p.y)
                .div_euclid(self.cell_size),
            p.x.div_euclid(self.cell_size),
        )
    }

    /// Converts a grid cell to the world coordinates of its reference corner.
    /// `world_to_grid(grid_to_world(c)) == c` for every cell.
    pub fn grid_to_world(&self, c: Cell) -> WorldPoint {
        WorldPoint::new(
            c.col.saturating_mul(self.cell_size),
            self.flipped_y().saturating_sub(c.row.saturating_mul(self.cell_size)),
        )
    }

    fn flipped_y(&self) -> i32 {
        self.arena_length.saturating_sub(self.origin_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_cell_size() {
        assert!(matches!(GridTransform::new(0, 200, 10), Err(NavigationError::Configuration(_))));
        assert!(matches!(GridTransform::new(-10, 200, 10), Err(NavigationError::Configuration(_))));
    }

    #[test]
    fn test_world_to_grid_flips_y() {
        let t = GridTransform::new(10, 200, 10).unwrap();
        assert_eq!(t.world_to_grid(WorldPoint::new(0, 0)), Cell::new(19, 0));
        assert_eq!(t.world_to_grid(WorldPoint::new(70, 190)), Cell::new(0, 7));
        // Anywhere inside a cell maps to that cell.
        assert_eq!(t.world_to_grid(WorldPoint::new(79, 1)), Cell::new(18, 7));
    }

    #[test]
    fn test_origin_offset_shifts_rows() {
        // Obstacles measured from a baseline five cells up the arena.
        let t = GridTransform::new(10, 200, 50).unwrap();
        assert_eq!(t.world_to_grid(WorldPoint::new(70, 0)), Cell::new(15, 7));
    }

    #[test]
    fn test_round_trip_through_world() {
        let t = GridTransform::new(10, 200, 50).unwrap();
        for row in -2..22 {
            for col in -2..22 {
                let c = Cell::new(row, col);
                assert_eq!(t.world_to_grid(t.grid_to_world(c)), c);
            }
        }
    }

    #[test]
    fn test_bottom_left() {
        let bounds = GridBounds::new(20, 20).unwrap();
        let t = GridTransform::bottom_left(bounds, 10).unwrap();
        assert_eq!(t.world_to_grid(WorldPoint::new(0, 0)), Cell::new(19, 0));
        assert_eq!(t.world_to_grid(WorldPoint::new(190, 190)), Cell::new(0, 19));
        assert_eq!(t.cell_size(), 10);
    }

    #[test]
    fn test_extreme_coordinates_saturate() {
        let t = GridTransform::new(10, 200, 10).unwrap();
        assert_eq!(t.world_to_grid(WorldPoint::new(i32::MAX, i32::MIN)).col, i32::MAX / 10);
        assert_eq!(t.world_to_grid(WorldPoint::new(0, i32::MIN)).row, i32::MAX / 10);
        assert_eq!(t.grid_to_world(Cell::new(i32::MIN, i32::MAX)), WorldPoint::new(i32::MAX, i32::MAX));
    }

    #[test]
    fn test_bottom_left_rejects_overflowing_arena() {
        let bounds = GridBounds::new(GridBounds::MAX_DIMENSION, 20).unwrap();
        assert!(matches!(GridTransform::bottom_left(bounds, i32::MAX / 2), Err(NavigationError::Configuration(_))));
    }
}
