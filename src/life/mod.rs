//! Life-like automaton core: rules, grid and pattern files

pub mod grid;
pub mod io;
pub mod rules;

pub use grid::Grid;
pub use io::{create_example_grids, load_grid_from_file, save_grid_to_file, GridSnapshot};
pub use rules::{RuleSet, MAX_NEIGHBORS};
