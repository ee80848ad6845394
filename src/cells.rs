use smallvec::SmallVec;

/// A cell position in a maze, `row` counting down from the top and `col` counting right from the
/// left. Signed so that the neighbour of an edge cell can be named (e.g. row `-1`) and then
/// rejected by the maze bounds checks rather than wrapping around.
#[derive(Hash, Eq, PartialEq, Debug, Copy, Clone, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub row: isize,
    pub col: isize,
}

impl GridCoordinate {
    pub fn new(row: isize, col: isize) -> GridCoordinate {
        GridCoordinate { row, col }
    }

    /// The coordinate one cell away in the given direction. Not bounds checked.
    #[inline]
    pub fn offset(self, direction: GridDirection) -> GridCoordinate {
        let (row_delta, col_delta) = direction.offset();
        GridCoordinate {
            row: self.row + row_delta,
            col: self.col + col_delta,
        }
    }

    /// Like `offset`, but None when the step would leave the range of `isize`.
    #[inline]
    pub fn checked_offset(self, direction: GridDirection) -> Option<GridCoordinate> {
        let (row_delta, col_delta) = direction.offset();
        Some(GridCoordinate {
            row: self.row.checked_add(row_delta)?,
            col: self.col.checked_add(col_delta)?,
        })
    }
}

impl From<(isize, isize)> for GridCoordinate {
    fn from(row_col_pair: (isize, isize)) -> GridCoordinate {
        GridCoordinate::new(row_col_pair.0, row_col_pair.1)
    }
}

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;
pub type DirectionSmallVec = SmallVec<[GridDirection; 4]>;

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum GridDirection {
    East,
    South,
    West,
    North,
}

/// Every direction, in the order candidate moves are enumerated during maze generation.
pub const ALL_DIRECTIONS: [GridDirection; 4] = [GridDirection::East,
                                                GridDirection::South,
                                                GridDirection::West,
                                                GridDirection::North];

impl GridDirection {
    /// `(row delta, column delta)` of one step in this direction.
    #[inline]
    pub fn offset(self) -> (isize, isize) {
        match self {
            GridDirection::East => (0, 1),
            GridDirection::South => (1, 0),
            GridDirection::West => (0, -1),
            GridDirection::North => (-1, 0),
        }
    }

    #[inline]
    pub fn reverse(self) -> GridDirection {
        match self {
            GridDirection::East => GridDirection::West,
            GridDirection::South => GridDirection::North,
            GridDirection::West => GridDirection::East,
            GridDirection::North => GridDirection::South,
        }
    }

    /// East and south doors are stored on the cell itself, west and north doors belong to the
    /// neighbouring cell.
    #[inline]
    pub fn is_canonical(self) -> bool {
        match self {
            GridDirection::East | GridDirection::South => true,
            GridDirection::West | GridDirection::North => false,
        }
    }
}

/// Resolve a door to the (cell, east/south direction) pair that actually stores it.
/// None if the storing cell cannot even be addressed.
#[inline]
pub fn canonical_door(coord: GridCoordinate,
                      direction: GridDirection)
                      -> Option<(GridCoordinate, GridDirection)> {
    if direction.is_canonical() {
        Some((coord, direction))
    } else {
        coord.checked_offset(direction).map(|owner| (owner, direction.reverse()))
    }
}
