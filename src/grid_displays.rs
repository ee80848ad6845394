use std::fmt;

use crate::builder::MazeBuilder;
use crate::cells::{GridCoordinate, GridDirection};
use crate::generators::CandidateSelector;
use crate::maze::Maze;

use fnv::FnvHashSet;

const WALL_L: &str = "╴";
const WALL_R: &str = "╶";
const WALL_U: &str = "╵";
const WALL_D: &str = "╷";
const WALL_LR_3: &str = "───";
const WALL_LR: &str = "─";
const WALL_UD: &str = "│";
const WALL_LD: &str = "┐";
const WALL_RU: &str = "└";
const WALL_LU: &str = "┘";
const WALL_RD: &str = "┌";
const WALL_LRU: &str = "┴";
const WALL_LRD: &str = "┬";
const WALL_LRUD: &str = "┼";
const WALL_RUD: &str = "├";
const WALL_LUD: &str = "┤";

const EMPTY_BODY: &str = "   ";

pub trait GridDisplay {
    /// Render the contents of a maze cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: GridCoordinate) -> String {
        String::from(EMPTY_BODY)
    }
}

/// Shows the in-progress search of a `MazeBuilder`: ` . ` on every trail cell and ` @ ` on the
/// cursor.
#[derive(Debug)]
pub struct TrailDisplay {
    on_trail_coordinates: FnvHashSet<GridCoordinate>,
    cursor: Option<GridCoordinate>,
}

impl TrailDisplay {
    pub fn new(trail: &[GridCoordinate], cursor: Option<GridCoordinate>) -> TrailDisplay {
        TrailDisplay {
            on_trail_coordinates: trail.iter().cloned().collect(),
            cursor,
        }
    }

    /// Snapshot of the builder's trail. A finished builder has no cursor to show.
    pub fn from_builder<S: CandidateSelector>(builder: &MazeBuilder<S>) -> TrailDisplay {
        let cursor = if builder.is_done() {
            None
        } else {
            Some(builder.current())
        };
        TrailDisplay::new(builder.trail(), cursor)
    }
}

impl GridDisplay for TrailDisplay {
    fn render_cell_body(&self, coord: GridCoordinate) -> String {
        if self.cursor == Some(coord) {
            String::from(" @ ")
        } else if self.on_trail_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from(EMPTY_BODY)
        }
    }
}

/// Draw the maze with box drawing characters, one text line per row of wall corners and one per
/// row of cells. The outer boundary is always drawn; an inner wall is drawn where its door is
/// closed.
pub fn render_text(maze: &Maze, grid_display: Option<&dyn GridDisplay>) -> String {
    let walls = Walls { maze };
    let rows = maze.rows().0;
    let cols = maze.columns().0;

    let mut output = String::new();
    for row in 0..=rows {
        output.push_str(&walls.corners_line(row));
        output.push('\n');

        if row < rows {
            // Cells rely on the corner line above for their north wall, so only the west
            // boundary, bodies and east walls are needed here.
            output.push_str(WALL_UD);
            for col in 0..cols {
                let coord = GridCoordinate::new(row as isize, col as isize);
                let body = grid_display.map_or_else(|| String::from(EMPTY_BODY),
                                                    |display| display.render_cell_body(coord));
                output.push_str(&body);
                output.push_str(if walls.vertical(row, col + 1) { WALL_UD } else { " " });
            }
            output.push('\n');
        }
    }
    output
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", render_text(self, None))
    }
}

// Wall segments are addressed on the lattice of cell corners: `x` in 0..=cols, `y` in 0..=rows.
struct Walls<'a> {
    maze: &'a Maze,
}

impl<'a> Walls<'a> {
    /// Is the wall on the line `y`, spanning the cell column `col`, standing?
    fn horizontal(&self, y: usize, col: usize) -> bool {
        y == 0 || y == self.maze.rows().0 ||
        !self.maze.is_door_open(GridCoordinate::new(y as isize - 1, col as isize),
                                GridDirection::South)
    }

    /// Is the wall on the line `x`, spanning the cell row `row`, standing?
    fn vertical(&self, row: usize, x: usize) -> bool {
        x == 0 || x == self.maze.columns().0 ||
        !self.maze.is_door_open(GridCoordinate::new(row as isize, x as isize - 1),
                                GridDirection::East)
    }

    fn corners_line(&self, y: usize) -> String {
        let rows = self.maze.rows().0;
        let cols = self.maze.columns().0;

        let mut line = String::new();
        for x in 0..=cols {
            let left = x > 0 && self.horizontal(y, x - 1);
            let right = x < cols && self.horizontal(y, x);
            let up = y > 0 && self.vertical(y - 1, x);
            let down = y < rows && self.vertical(y, x);
            line.push_str(corner_glyph(left, right, up, down));

            if x < cols {
                line.push_str(if right { WALL_LR_3 } else { EMPTY_BODY });
            }
        }
        line
    }
}

fn corner_glyph(left: bool, right: bool, up: bool, down: bool) -> &'static str {
    match (left, right, up, down) {
        (true, true, true, true) => WALL_LRUD,
        (true, true, true, false) => WALL_LRU,
        (true, true, false, true) => WALL_LRD,
        (true, false, true, true) => WALL_LUD,
        (false, true, true, true) => WALL_RUD,
        (true, true, false, false) => WALL_LR,
        (false, false, true, true) => WALL_UD,
        (false, true, true, false) => WALL_RU,
        (true, false, false, true) => WALL_LD,
        (true, false, true, false) => WALL_LU,
        (false, true, false, true) => WALL_RD,
        (true, false, false, false) => WALL_L,
        (false, true, false, false) => WALL_R,
        (false, false, true, false) => WALL_U,
        (false, false, false, true) => WALL_D,
        (false, false, false, false) => " ",
    }
}
