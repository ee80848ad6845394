//! Recursive backtracker maze generation driven one step at a time.
//!
//! `generators::recursive_backtracker` carves a whole maze in one call. `MazeBuilder` runs the
//! same search but keeps the cursor and the backtrack stack as its own state, so an external loop
//! (an animation frame, a UI tick) can call `advance` once, draw the maze and trail, and come back
//! later without losing progress.

use log::{debug, trace};
use std::fmt;

use crate::cells::{GridCoordinate, GridDirection};
use crate::generators::{random_candidate_direction, CandidateSelector};
use crate::maze::Maze;

/// The unit of work performed by one call to `MazeBuilder::advance`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum BuildStep {
    /// A door was opened from `from` in `direction` and the cursor moved through it.
    Forward {
        from: GridCoordinate,
        direction: GridDirection,
    },
    /// No unvisited neighbours, the cursor retreated to the most recent trail cell.
    Backtrack { to: GridCoordinate },
    /// The search has backed out past its start cell. The maze is complete.
    Done,
}

pub struct MazeBuilder<'a, S: CandidateSelector> {
    maze: &'a mut Maze,
    selector: S,
    current: GridCoordinate,
    backtrack: Vec<GridCoordinate>,
    done: bool,
}

impl<'a, S: CandidateSelector> MazeBuilder<'a, S> {
    /// Build from the top left cell. The maze is expected to start with every door closed.
    pub fn new(maze: &'a mut Maze, selector: S) -> MazeBuilder<'a, S> {
        MazeBuilder {
            maze,
            selector,
            current: GridCoordinate::new(0, 0),
            backtrack: vec![],
            done: false,
        }
    }

    /// Build from any cell of the maze.
    /// Returns None if `start` is outside the maze.
    pub fn starting_at(maze: &'a mut Maze,
                       start: GridCoordinate,
                       selector: S)
                       -> Option<MazeBuilder<'a, S>> {
        if !maze.is_coord_in_bounds(start) {
            return None;
        }
        let mut builder = MazeBuilder::new(maze, selector);
        builder.current = start;
        Some(builder)
    }

    /// Perform exactly one forward or backtrack move, or notice that there is nothing left to do.
    /// Once the build is done this does nothing and keeps returning `BuildStep::Done`.
    pub fn advance(&mut self) -> BuildStep {
        if self.done {
            return BuildStep::Done;
        }

        let from = self.current;
        if let Some(direction) = random_candidate_direction(&*self.maze,
                                                            from,
                                                            &mut self.selector) {
            self.maze.open_door(from, direction);
            self.backtrack.push(from);
            self.current = from.offset(direction);
            trace!("builder carved {:?} from {:?}", direction, from);
            return BuildStep::Forward { from, direction };
        }

        match self.backtrack.pop() {
            Some(previous) => {
                self.current = previous;
                trace!("builder backtracked to {:?}", previous);
                BuildStep::Backtrack { to: previous }
            }
            None => {
                self.done = true;
                debug!("builder finished a {:?} x {:?} maze with {} passages",
                       self.maze.rows(),
                       self.maze.columns(),
                       self.maze.links_count());
                BuildStep::Done
            }
        }
    }

    /// Advance until done. Returns the number of forward and backtrack moves made.
    pub fn run_to_completion(&mut self) -> usize {
        self.by_ref().count()
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Cursor position of the search.
    #[inline]
    pub fn current(&self) -> GridCoordinate {
        self.current
    }

    /// Cells on the backtrack stack, oldest first. Empty before the first move and once done.
    #[inline]
    pub fn trail(&self) -> &[GridCoordinate] {
        &self.backtrack
    }

    #[inline]
    pub fn maze(&self) -> &Maze {
        &*self.maze
    }
}

impl<'a, S: CandidateSelector> Iterator for MazeBuilder<'a, S> {
    type Item = BuildStep;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            BuildStep::Done => None,
            step => Some(step),
        }
    }
}

impl<'a, S: CandidateSelector> fmt::Debug for MazeBuilder<'a, S> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "MazeBuilder :: current: {:?}, trail length: {}, done: {}",
               self.current,
               self.backtrack.len(),
               self.done)
    }
}
