//! **mazes** generates perfect mazes with the recursive backtracker algorithm, either in one call
//! or one step at a time for animated drivers.

pub mod builder;
pub mod cells;
pub mod generators;
pub mod grid_displays;
pub mod maze;
pub mod units;
