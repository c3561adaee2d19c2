#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for discrete grid kinematics of a car-like robot."]
#![doc = ""]
#![doc = "This crate provides headings, motion primitives and grid poses, plus the"]
#![doc = "turning-arc table that maps a primitive applied at a heading to an exact"]
#![doc = "cell and heading transition."]

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod command;
pub mod error;
pub mod table;

pub use error::KinematicsError;
pub use table::{Delta, delta};

/// One of the four cardinal chassis orientations.
///
/// Rows grow towards `South` and columns grow towards `East`, so `North`
/// points at row 0.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Heading {
    /// Towards decreasing row index.
    #[default]
    North,
    /// Towards increasing column index.
    East,
    /// Towards increasing row index.
    South,
    /// Towards decreasing column index.
    West,
}

impl Heading {
    /// All headings in right-turn order.
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    /// The heading after a 90° clockwise turn.
    pub const fn turned_right(self) -> Heading {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    /// The heading after a 90° counter-clockwise turn.
    pub const fn turned_left(self) -> Heading {
        match self {
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
            Heading::East => Heading::North,
        }
    }

    /// The heading pointing the other way.
    pub const fn reversed(self) -> Heading {
        self.turned_right().turned_right()
    }

    /// Unit `(Δrow, Δcol)` of one cell of travel along this heading.
    pub const fn unit_step(self) -> (i32, i32) {
        match self {
            Heading::North => (-1, 0),
            Heading::East => (0, 1),
            Heading::South => (1, 0),
            Heading::West => (0, -1),
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Heading::North => "N",
            Heading::East => "E",
            Heading::South => "S",
            Heading::West => "W",
        };
        f.write_str(name)
    }
}

/// A single grid cell index. Components may be negative for candidate cells
/// that lie outside the arena.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    /// Row index.
    pub row: i32,
    /// Column index.
    pub col: i32,
}

impl Cell {
    /// Construct a new cell.
    pub const fn new(row: i32, col: i32) -> Self {
        Cell { row, col }
    }

    /// The cell offset by `(d_row, d_col)`.
    pub const fn offset(self, d_row: i32, d_col: i32) -> Self {
        Cell::new(self.row.saturating_add(d_row), self.col.saturating_add(d_col))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A robot pose on the grid: the centre cell of its 3×3 footprint plus heading.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPosition {
    /// Row of the chassis centre.
    pub row: i32,
    /// Column of the chassis centre.
    pub col: i32,
    /// Chassis orientation.
    pub heading: Heading,
}

impl GridPosition {
    /// Construct a new grid pose.
    ///
    /// # Arguments
    ///
    /// * `row`: Row of the chassis centre.
    /// * `col`: Column of the chassis centre.
    /// * `heading`: Chassis orientation.
    pub const fn new(row: i32, col: i32, heading: Heading) -> Self {
        GridPosition { row, col, heading }
    }

    /// The centre cell of this pose.
    pub const fn cell(&self) -> Cell {
        Cell::new(self.row, self.col)
    }

    /// The pose reached by applying `primitive` from here, ignoring bounds and
    /// obstacles. This is a candidate only; committing it is the executor's job.
    pub const fn stepped(self, primitive: MotionPrimitive) -> GridPosition {
        let d = delta(primitive, self.heading);
        GridPosition::new(self.row.saturating_add(d.d_row), self.col.saturating_add(d.d_col), d.heading)
    }

    /// The 3×3 block of cells occupied by the chassis, row-major.
    pub fn footprint(&self) -> [Cell; 9] {
        let mut cells = [Cell::default(); 9];
        let mut i = 0;
        for d_row in -1..=1 {
            for d_col in -1..=1 {
                cells[i] = self.cell().offset(d_row, d_col);
                i += 1;
            }
        }
        cells
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row: {}, col: {}, {})", self.row, self.col, self.heading)
    }
}

/// Arena size in cells. Valid cells are `[0, rows) × [0, cols)`.
///
/// Serialized as a `(rows, cols)` pair and validated through [`GridBounds::new`]
/// on the way back in.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "(i32, i32)", into = "(i32, i32)"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    rows: i32,
    cols: i32,
}

impl GridBounds {
    /// Largest accepted row or column count.
    pub const MAX_DIMENSION: i32 = 1 << 16;

    /// Construct arena bounds.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::InvalidBounds)` if either dimension is not
    /// positive or exceeds [`GridBounds::MAX_DIMENSION`].
    pub const fn new(rows: i32, cols: i32) -> Result<Self, KinematicsError> {
        if rows <= 0 || cols <= 0 {
            return Err(KinematicsError::InvalidBounds("rows and cols must be positive"));
        }
        if rows > Self::MAX_DIMENSION || cols > Self::MAX_DIMENSION {
            return Err(KinematicsError::InvalidBounds("rows and cols must not exceed MAX_DIMENSION"));
        }
        Ok(GridBounds { rows, cols })
    }

    /// Number of rows.
    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Whether a cell lies inside the arena.
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0 && cell.row < self.rows && cell.col >= 0 && cell.col < self.cols
    }

    /// Whether the centre of a pose lies inside the arena.
    pub const fn contains_position(&self, position: &GridPosition) -> bool {
        self.contains(position.cell())
    }
}

impl TryFrom<(i32, i32)> for GridBounds {
    type Error = KinematicsError;

    fn try_from((rows, cols): (i32, i32)) -> Result<Self, Self::Error> {
        GridBounds::new(rows, cols)
    }
}

impl From<GridBounds> for (i32, i32) {
    fn from(bounds: GridBounds) -> Self {
        (bounds.rows, bounds.cols)
    }
}

impl fmt::Display for GridBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.rows, self.cols)
    }
}

/// A discrete motion primitive. Each application is exactly one grid transition.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionPrimitive {
    /// One cell along the heading.
    Forward,
    /// One cell against the heading.
    Backward,
    /// Forward 90° clockwise arc.
    TurnRight,
    /// Forward 90° counter-clockwise arc.
    TurnLeft,
    /// Reverse arc with the wheels steered right.
    ReverseTurnRight,
    /// Reverse arc with the wheels steered left.
    ReverseTurnLeft,
    /// Small forward slide to the right.
    DiagonalNE,
    /// Small forward slide to the left.
    DiagonalNW,
    /// Small reverse slide to the right.
    DiagonalSE,
    /// Small reverse slide to the left.
    DiagonalSW,
}

impl MotionPrimitive {
    /// Every primitive.
    pub const ALL: [MotionPrimitive; 10] = [
        MotionPrimitive::Forward,
        MotionPrimitive::Backward,
        MotionPrimitive::TurnRight,
        MotionPrimitive::TurnLeft,
        MotionPrimitive::ReverseTurnRight,
        MotionPrimitive::ReverseTurnLeft,
        MotionPrimitive::DiagonalNE,
        MotionPrimitive::DiagonalNW,
        MotionPrimitive::DiagonalSE,
        MotionPrimitive::DiagonalSW,
    ];

    /// `Forward` or `Backward`.
    pub const fn is_straight(self) -> bool {
        matches!(self, MotionPrimitive::Forward | MotionPrimitive::Backward)
    }
}

impl fmt::Display for MotionPrimitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_cycle_right() {
        assert_eq!(Heading::North.turned_right(), Heading::East);
        assert_eq!(Heading::East.turned_right(), Heading::South);
        assert_eq!(Heading::South.turned_right(), Heading::West);
        assert_eq!(Heading::West.turned_right(), Heading::North);
    }

    #[test]
    fn test_heading_left_undoes_right() {
        for h in Heading::ALL {
            assert_eq!(h.turned_right().turned_left(), h);
            assert_eq!(h.reversed().reversed(), h);
            assert_ne!(h.reversed(), h);
        }
    }

    #[test]
    fn test_bounds_constructor() {
        let bounds = GridBounds::new(20, 15).unwrap();
        assert_eq!(bounds.rows(), 20);
        assert_eq!(bounds.cols(), 15);
        assert!(matches!(GridBounds::new(0, 5), Err(KinematicsError::InvalidBounds(_))));
        assert!(matches!(GridBounds::new(5, -1), Err(KinematicsError::InvalidBounds(_))));
        assert!(GridBounds::new(GridBounds::MAX_DIMENSION, 1).is_ok());
        assert!(matches!(GridBounds::new(i32::MAX, 1), Err(KinematicsError::InvalidBounds(_))));
    }

    #[test]
    fn test_bounds_from_pair_is_validated() {
        assert_eq!(GridBounds::try_from((4, 6)), GridBounds::new(4, 6));
        assert!(matches!(GridBounds::try_from((0, 6)), Err(KinematicsError::InvalidBounds(_))));
        assert_eq!(<(i32, i32)>::from(GridBounds::new(4, 6).unwrap()), (4, 6));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_bounds_rejects_invalid_pair() {
        use serde::de::value::{Error, SeqDeserializer};

        let ok = GridBounds::deserialize(SeqDeserializer::<_, Error>::new([20, 15].into_iter()));
        assert_eq!(ok.ok(), GridBounds::new(20, 15).ok());
        let bad = GridBounds::deserialize(SeqDeserializer::<_, Error>::new([0, -3].into_iter()));
        assert!(bad.is_err());
    }

    #[test]
    fn test_bounds_contains_edges() {
        let bounds = GridBounds::new(20, 20).unwrap();
        assert!(bounds.contains(Cell::new(0, 0)));
        assert!(bounds.contains(Cell::new(19, 19)));
        assert!(!bounds.contains(Cell::new(20, 0)));
        assert!(!bounds.contains(Cell::new(0, -1)));
    }

    #[test]
    fn test_footprint_is_centred() {
        let p = GridPosition::new(5, 7, Heading::West);
        let cells = p.footprint();
        assert_eq!(cells[0], Cell::new(4, 6));
        assert_eq!(cells[4], Cell::new(5, 7));
        assert_eq!(cells[8], Cell::new(6, 8));
    }

    #[test]
    fn test_stepped_forward_north() {
        let p = GridPosition::new(10, 10, Heading::North);
        assert_eq!(p.stepped(MotionPrimitive::Forward), GridPosition::new(9, 10, Heading::North));
    }

    #[test]
    fn test_stepping_at_i32_limits_saturates() {
        let p = GridPosition::new(i32::MIN, i32::MAX, Heading::North);
        assert_eq!(p.stepped(MotionPrimitive::Forward), GridPosition::new(i32::MIN, i32::MAX, Heading::North));
        let q = GridPosition::new(i32::MAX, i32::MIN, Heading::East);
        assert_eq!(q.stepped(MotionPrimitive::TurnRight), GridPosition::new(i32::MAX, i32::MIN + 2, Heading::South));
        let corners = GridPosition::new(i32::MAX, i32::MAX, Heading::South).footprint();
        assert_eq!(corners[8], Cell::new(i32::MAX, i32::MAX));
        assert_eq!(Cell::new(i32::MIN, 0).offset(-1, 0), Cell::new(i32::MIN, 0));
    }

    #[test]
    fn test_display() {
        let p = GridPosition::new(3, 4, Heading::South);
        assert_eq!(p.to_string(), "(row: 3, col: 4, S)");
        assert_eq!(MotionPrimitive::DiagonalNE.to_string(), "DiagonalNE");
    }
}
