use log::{debug, trace};
use rand::Rng;

use crate::cells::{DirectionSmallVec, GridCoordinate, GridDirection, ALL_DIRECTIONS};
use crate::maze::Maze;

/// Chooses one of `candidates_count` equally valid options by index.
///
/// Every `rand::Rng` is a uniform selector. Tests inject fixed sequences instead.
pub trait CandidateSelector {
    /// Returns an index in `0..candidates_count`. Never called with zero candidates.
    fn select(&mut self, candidates_count: usize) -> usize;
}

/// Uniform choice with any random number generator, e.g. `rand::thread_rng()` or a seeded
/// `XorShiftRng`.
impl<R: Rng> CandidateSelector for R {
    #[inline]
    fn select(&mut self, candidates_count: usize) -> usize {
        self.gen_range(0..candidates_count)
    }
}

/// Directions from `coord` leading to a cell in the maze that has not been visited yet, in
/// `ALL_DIRECTIONS` order. A cell counts as visited once any of its doors is open.
pub fn candidate_directions(maze: &Maze, coord: GridCoordinate) -> DirectionSmallVec {
    ALL_DIRECTIONS.iter()
        .cloned()
        .filter(|dir| {
            maze.neighbour_at_direction(coord, *dir)
                .map_or(false, |neighbour| !maze.any_door_open(neighbour))
        })
        .collect()
}

/// Pick one of the unvisited neighbour directions of `coord`, or None if there are none left.
pub fn random_candidate_direction<S>(maze: &Maze,
                                     coord: GridCoordinate,
                                     selector: &mut S)
                                     -> Option<GridDirection>
    where S: CandidateSelector + ?Sized
{
    let candidates = candidate_directions(maze, coord);
    if candidates.is_empty() {
        None
    } else {
        let index = selector.select(candidates.len()) % candidates.len();
        Some(candidates[index])
    }
}

/// Apply the recursive backtracker maze generation algorithm to a maze, starting from the top left
/// cell. See `recursive_backtracker_from`.
pub fn recursive_backtracker<S>(maze: &mut Maze, selector: &mut S)
    where S: CandidateSelector + ?Sized
{
    let _ = recursive_backtracker_from(maze, GridCoordinate::new(0, 0), selector);
}

/// Apply the recursive backtracker maze generation algorithm to a maze.
///
/// A random walk that only ever steps into unvisited cells, carving a passage on each step. When
/// it reaches a dead end it retraces its steps to the most recent cell that still has an
/// unvisited neighbour and carries on from there. It is finished when it has backed all the way
/// out to the start cell, by which time every cell has been visited exactly once, so the
/// passages form a perfect maze with long winding corridors and few short dead ends.
///
/// The maze is expected to start with every door closed.
/// Returns false, leaving the maze untouched, if `start` is not a cell of the maze.
pub fn recursive_backtracker_from<S>(maze: &mut Maze,
                                     start: GridCoordinate,
                                     selector: &mut S)
                                     -> bool
    where S: CandidateSelector + ?Sized
{
    if !maze.is_coord_in_bounds(start) {
        return false;
    }

    let mut current = start;
    let mut backtrack: Vec<GridCoordinate> = Vec::with_capacity(maze.size());
    let mut forward_steps = 0usize;

    loop {
        while let Some(direction) = random_candidate_direction(maze, current, selector) {
            maze.open_door(current, direction);
            backtrack.push(current);
            current = current.offset(direction);
            forward_steps += 1;
            trace!("carved {:?} into {:?}", direction, current);
        }

        match backtrack.pop() {
            Some(previous) => current = previous,
            None => break,
        }
    }

    debug!("recursive backtracker finished: {} cells, {} passages carved from {:?}",
           maze.size(),
           forward_steps,
           start);
    true
}
