use bit_set::BitSet;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::cells::{canonical_door, CoordinateSmallVec, GridCoordinate, GridDirection,
                   ALL_DIRECTIONS};
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};

// Each cell owns exactly two door flags, the rest are found on a neighbour.
const DOORS_PER_CELL: usize = 2;

static CANONICAL_DIRECTIONS: [GridDirection; 2] = [GridDirection::East, GridDirection::South];

/// The door state of a `rows * cols` grid of cells.
///
/// Every cell stores its east and south door, so a door between two cells is a single flag no
/// matter which side of it asks. Doors belonging to cells outside the grid are never stored and
/// always read as closed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    rows: usize,
    cols: usize,
    doors: BitSet,
}

impl Maze {
    /// A maze with every door closed.
    /// Returns None if either dimension is zero or the grid is too large to address.
    pub fn new(rows: RowsCount, cols: ColumnsCount) -> Option<Maze> {
        let (RowsCount(rows), ColumnsCount(cols)) = (rows, cols);
        if rows == 0 || cols == 0 || rows > isize::MAX as usize || cols > isize::MAX as usize {
            return None;
        }
        let doors_count = rows.checked_mul(cols)?.checked_mul(DOORS_PER_CELL)?;

        Some(Maze {
            rows,
            cols,
            doors: BitSet::with_capacity(doors_count),
        })
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        RowsCount(self.rows)
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        ColumnsCount(self.cols)
    }

    /// Number of cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.rows * self.cols
    }

    /// Cells count and the number of interior doors (each door between two cells in the grid).
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let interior_doors = self.rows * (self.cols - 1) + (self.rows - 1) * self.cols;
        (NodesCount(self.size()), EdgesCount(interior_doors))
    }

    #[inline]
    pub fn is_coord_in_bounds(&self, coord: GridCoordinate) -> bool {
        coord.row >= 0 && coord.col >= 0 && (coord.row as usize) < self.rows &&
        (coord.col as usize) < self.cols
    }

    pub fn is_door_open(&self, coord: GridCoordinate, direction: GridDirection) -> bool {
        self.door_index(coord, direction)
            .map_or(false, |index| self.doors.contains(index))
    }

    /// Does the cell have any open door at all? A cell that has never been entered by a
    /// generator has none.
    pub fn any_door_open(&self, coord: GridCoordinate) -> bool {
        ALL_DIRECTIONS.iter().any(|dir| self.is_door_open(coord, *dir))
    }

    /// Open a door. Asking from a cell outside the grid, or for a door whose storing cell lies
    /// outside it, does nothing.
    pub fn open_door(&mut self, coord: GridCoordinate, direction: GridDirection) {
        if let Some(index) = self.door_index(coord, direction) {
            let _ = self.doors.insert(index);
        }
    }

    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: GridDirection)
                                  -> Option<GridCoordinate> {
        if !self.is_coord_in_bounds(coord) {
            return None;
        }
        coord.checked_offset(direction)
            .filter(|neighbour_coord| self.is_coord_in_bounds(*neighbour_coord))
    }

    /// Cells in the grid that can be reached from `coord` through an open door.
    pub fn links(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        ALL_DIRECTIONS.iter()
            .filter(|dir| self.is_door_open(coord, **dir))
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Number of open doors joining two cells of the grid.
    pub fn links_count(&self) -> usize {
        self.iter_links().count()
    }

    /// Row major iteration over every cell coordinate.
    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            cols: self.cols,
            cells_count: self.size(),
        }
    }

    /// The cell coordinates grouped by row, top row first.
    pub fn iter_row(&self) -> impl Iterator<Item = Vec<GridCoordinate>> {
        let cols = self.cols as isize;
        (0..self.rows as isize).map(move |row| {
            (0..cols).map(|col| GridCoordinate::new(row, col)).collect()
        })
    }

    /// Every open door between two cells of the grid, once, as `(cell, neighbour)` where the
    /// neighbour is east or south of the cell.
    pub fn iter_links<'a>(&'a self) -> impl Iterator<Item = (GridCoordinate, GridCoordinate)> + 'a {
        self.iter().flat_map(move |coord| {
            CANONICAL_DIRECTIONS.iter().filter_map(move |dir| {
                if self.is_door_open(coord, *dir) {
                    self.neighbour_at_direction(coord, *dir).map(|neighbour| (coord, neighbour))
                } else {
                    None
                }
            })
        })
    }

    /// The passages of the maze as an undirected graph. Node `n` is the cell with row major
    /// index `n` and carries its coordinate.
    pub fn passage_graph(&self) -> UnGraph<GridCoordinate, ()> {
        let (NodesCount(nodes), EdgesCount(edges)) = self.graph_size();
        let mut graph = UnGraph::with_capacity(nodes, edges);
        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }
        for (a, b) in self.iter_links() {
            if let (Some(a_index), Some(b_index)) = (self.grid_coordinate_to_index(a),
                                                     self.grid_coordinate_to_index(b)) {
                let _ = graph.add_edge(NodeIndex::new(a_index), NodeIndex::new(b_index), ());
            }
        }
        graph
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...maze.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_coord_in_bounds(coord) {
            Some(coord.row as usize * self.cols + coord.col as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_grid_coordinate(&self, index: usize) -> Option<GridCoordinate> {
        if index < self.size() {
            Some(index_to_grid_coordinate(self.cols, index))
        } else {
            None
        }
    }

    fn door_index(&self, coord: GridCoordinate, direction: GridDirection) -> Option<usize> {
        if !self.is_coord_in_bounds(coord) {
            return None;
        }
        let (owner, owned_direction) = canonical_door(coord, direction)?;
        let door_offset = match owned_direction {
            GridDirection::East => 0,
            _ => 1,
        };
        self.grid_coordinate_to_index(owner)
            .map(|cell_index| cell_index * DOORS_PER_CELL + door_offset)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    cols: usize,
    cells_count: usize,
}
impl Iterator for CellIter {
    type Item = GridCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = index_to_grid_coordinate(self.cols, self.current_cell_number);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}
impl ExactSizeIterator for CellIter {}

impl<'a> IntoIterator for &'a Maze {
    type Item = GridCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn index_to_grid_coordinate(cols: usize, one_dimensional_index: usize) -> GridCoordinate {
    let row = one_dimensional_index / cols;
    let col = one_dimensional_index - (row * cols);
    GridCoordinate::new(row as isize, col as isize)
}


#[cfg(test)]
mod tests {

    use super::*;
    use itertools::Itertools;

    fn maze(rows: usize, cols: usize) -> Maze {
        Maze::new(RowsCount(rows), ColumnsCount(cols)).expect("valid maze dimensions")
    }

    fn gc(row: isize, col: isize) -> GridCoordinate {
        GridCoordinate::new(row, col)
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(Maze::new(RowsCount(0), ColumnsCount(5)).is_none());
        assert!(Maze::new(RowsCount(5), ColumnsCount(0)).is_none());
        assert!(Maze::new(RowsCount(usize::MAX), ColumnsCount(usize::MAX)).is_none());
        assert!(Maze::new(RowsCount(1), ColumnsCount(1)).is_some());
    }

    #[test]
    fn dimensions() {
        let m = maze(3, 7);
        assert_eq!(m.rows(), RowsCount(3));
        assert_eq!(m.columns(), ColumnsCount(7));
        assert_eq!(m.size(), 21);
        assert_eq!(m.graph_size(), (NodesCount(21), EdgesCount(3 * 6 + 2 * 7)));
    }

    #[test]
    fn coordinates_in_bounds() {
        let m = maze(2, 3);
        assert!(m.is_coord_in_bounds(gc(0, 0)));
        assert!(m.is_coord_in_bounds(gc(1, 2)));
        assert!(!m.is_coord_in_bounds(gc(2, 0)));
        assert!(!m.is_coord_in_bounds(gc(0, 3)));
        assert!(!m.is_coord_in_bounds(gc(-1, 0)));
        assert!(!m.is_coord_in_bounds(gc(0, -1)));
    }

    #[test]
    fn new_maze_has_all_doors_closed() {
        let m = maze(4, 4);
        for coord in m.iter() {
            assert!(!m.any_door_open(coord));
        }
        assert_eq!(m.links_count(), 0);
    }

    #[test]
    fn doors_are_shared_between_neighbours() {
        let mut m = maze(3, 3);

        m.open_door(gc(1, 1), GridDirection::East);
        assert!(m.is_door_open(gc(1, 1), GridDirection::East));
        assert!(m.is_door_open(gc(1, 2), GridDirection::West));

        m.open_door(gc(1, 1), GridDirection::North);
        assert!(m.is_door_open(gc(1, 1), GridDirection::North));
        assert!(m.is_door_open(gc(0, 1), GridDirection::South));

        m.open_door(gc(2, 0), GridDirection::West);
        assert!(!m.any_door_open(gc(2, 0)));

        assert!(!m.is_door_open(gc(1, 1), GridDirection::South));
        assert!(!m.is_door_open(gc(1, 1), GridDirection::West));
        assert!(m.any_door_open(gc(0, 1)));
        assert!(!m.any_door_open(gc(0, 0)));
        assert_eq!(m.links_count(), 2);
    }

    #[test]
    fn door_symmetry() {
        let mut m = maze(3, 4);
        m.open_door(gc(0, 0), GridDirection::East);
        m.open_door(gc(2, 3), GridDirection::North);
        m.open_door(gc(1, 2), GridDirection::West);

        for coord in m.iter() {
            for dir in &ALL_DIRECTIONS {
                assert_eq!(m.is_door_open(coord, *dir),
                           m.is_door_open(coord.offset(*dir), dir.reverse()));
            }
        }
    }

    #[test]
    fn out_of_bounds_doors_are_closed_and_not_stored() {
        let mut m = maze(2, 2);
        let untouched = m.clone();

        m.open_door(gc(0, 0), GridDirection::North);
        m.open_door(gc(0, 0), GridDirection::West);
        m.open_door(gc(-1, -1), GridDirection::East);
        m.open_door(gc(5, 5), GridDirection::South);
        m.open_door(gc(2, 0), GridDirection::East);
        assert_eq!(m, untouched);

        assert!(!m.is_door_open(gc(-1, 0), GridDirection::South));
        assert!(!m.is_door_open(gc(10, 10), GridDirection::North));
        assert!(!m.any_door_open(gc(-3, 7)));
    }

    #[test]
    fn outward_door_of_an_edge_cell_is_not_a_link() {
        let mut m = maze(2, 2);
        m.open_door(gc(0, 1), GridDirection::East);
        assert!(m.is_door_open(gc(0, 1), GridDirection::East));
        assert!(!m.is_door_open(gc(0, 2), GridDirection::West));
        assert!(m.links(gc(0, 1)).is_empty());
        assert_eq!(m.links_count(), 0);
    }

    #[test]
    fn doors_asked_from_outside_the_grid_stay_closed() {
        let mut m = maze(2, 2);
        let untouched = m.clone();

        m.open_door(gc(0, 2), GridDirection::West);
        m.open_door(gc(2, 1), GridDirection::North);
        assert_eq!(m, untouched);
        assert!(!m.is_door_open(gc(0, 1), GridDirection::East));
        assert!(!m.is_door_open(gc(1, 1), GridDirection::South));

        m.open_door(gc(0, 1), GridDirection::East);
        m.open_door(gc(1, 1), GridDirection::South);
        assert!(!m.is_door_open(gc(0, 2), GridDirection::West));
        assert!(!m.is_door_open(gc(2, 1), GridDirection::North));
        assert!(!m.any_door_open(gc(0, 2)));
        assert!(!m.any_door_open(gc(2, 1)));
    }

    #[test]
    fn coordinates_at_the_isize_limits_are_safe() {
        let mut m = maze(2, 2);
        let untouched = m.clone();
        let extremes = [gc(isize::MIN, 0),
                        gc(0, isize::MIN),
                        gc(isize::MAX, 0),
                        gc(0, isize::MAX),
                        gc(isize::MIN, isize::MIN),
                        gc(isize::MAX, isize::MAX)];

        for coord in &extremes {
            for dir in &ALL_DIRECTIONS {
                assert!(!m.is_door_open(*coord, *dir));
                assert_eq!(m.neighbour_at_direction(*coord, *dir), None);
                m.open_door(*coord, *dir);
            }
            assert!(!m.any_door_open(*coord));
            assert!(m.links(*coord).is_empty());
        }
        assert_eq!(m, untouched);
    }

    #[test]
    fn neighbour_at_dir() {
        let m = maze(2, 2);
        let check_neighbour = |coord, dir: GridDirection, expected| {
            assert_eq!(m.neighbour_at_direction(coord, dir), expected);
        };
        check_neighbour(gc(0, 0), GridDirection::North, None);
        check_neighbour(gc(0, 0), GridDirection::South, Some(gc(1, 0)));
        check_neighbour(gc(0, 0), GridDirection::East, Some(gc(0, 1)));
        check_neighbour(gc(0, 0), GridDirection::West, None);

        check_neighbour(gc(1, 1), GridDirection::North, Some(gc(0, 1)));
        check_neighbour(gc(1, 1), GridDirection::South, None);
        check_neighbour(gc(1, 1), GridDirection::East, None);
        check_neighbour(gc(1, 1), GridDirection::West, Some(gc(1, 0)));

        check_neighbour(gc(-1, 0), GridDirection::South, None);
    }

    #[test]
    fn linked_cells() {
        let mut m = maze(3, 3);
        let centre = gc(1, 1);
        m.open_door(centre, GridDirection::South);
        m.open_door(centre, GridDirection::West);
        m.open_door(gc(0, 0), GridDirection::East);

        let sorted_links = |coord| m.links(coord).iter().cloned().sorted().collect::<Vec<_>>();
        assert_eq!(sorted_links(centre), vec![gc(1, 0), gc(2, 1)]);
        assert_eq!(sorted_links(gc(0, 0)), vec![gc(0, 1)]);
        assert_eq!(sorted_links(gc(0, 1)), vec![gc(0, 0)]);
        assert_eq!(sorted_links(gc(2, 2)), vec![]);

        assert_eq!(m.iter_links().sorted().collect::<Vec<_>>(),
                   vec![(gc(0, 0), gc(0, 1)), (gc(1, 0), gc(1, 1)), (gc(1, 1), gc(2, 1))]);
        assert_eq!(m.links_count(), 3);
    }

    #[test]
    fn cell_iter() {
        let m = maze(2, 3);
        assert_eq!(m.iter().len(), 6);
        assert_eq!(m.iter().collect::<Vec<_>>(),
                   &[gc(0, 0), gc(0, 1), gc(0, 2), gc(1, 0), gc(1, 1), gc(1, 2)]);
        assert_eq!((&m).into_iter().count(), 6);
    }

    #[test]
    fn row_iter() {
        let m = maze(2, 2);
        assert_eq!(m.iter_row().collect::<Vec<Vec<GridCoordinate>>>(),
                   &[&[gc(0, 0), gc(0, 1)], &[gc(1, 0), gc(1, 1)]]);
    }

    #[test]
    fn grid_coordinate_as_index() {
        let m = maze(3, 3);
        let indices = m.iter()
            .map(|coord| m.grid_coordinate_to_index(coord))
            .collect::<Vec<_>>();
        let expected = (0..9).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(indices, expected);

        assert_eq!(m.grid_coordinate_to_index(gc(3, 2)), None);
        assert_eq!(m.grid_coordinate_to_index(gc(2, 3)), None);
        assert_eq!(m.grid_coordinate_to_index(gc(-1, 0)), None);

        assert_eq!(m.index_to_grid_coordinate(5), Some(gc(1, 2)));
        assert_eq!(m.index_to_grid_coordinate(9), None);
    }

    #[test]
    fn passage_graph_mirrors_links() {
        let mut m = maze(2, 2);
        m.open_door(gc(0, 0), GridDirection::South);
        m.open_door(gc(1, 1), GridDirection::West);

        let graph = m.passage_graph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph[NodeIndex::new(3)], gc(1, 1));
        assert!(graph.find_edge(NodeIndex::new(0), NodeIndex::new(2)).is_some());
        assert!(graph.find_edge(NodeIndex::new(3), NodeIndex::new(2)).is_some());
        assert!(graph.find_edge(NodeIndex::new(0), NodeIndex::new(1)).is_none());
    }
}
