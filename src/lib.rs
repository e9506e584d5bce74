//! Life-like cellular automaton simulator
//!
//! This library simulates two-dimensional binary cellular automata on a bounded
//! grid under any birth/survival rule, such as Conway's `B3/S23`.

pub mod config;
pub mod error;
pub mod life;
pub mod simulation;
pub mod utils;

pub use config::Settings;
pub use error::LifeError;
pub use life::{Grid, RuleSet};
pub use simulation::{SharedGrid, Simulation};

/// Parse `rulestring` and advance `grid` by `generations` generations under it
pub fn evolve(grid: &mut Grid, rulestring: &str, generations: usize) -> Result<(), LifeError> {
    let rules = RuleSet::parse(rulestring)?;
    grid.advance_generations(&rules, generations);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evolve() {
        let mut grid = Grid::from_cells(vec![vec![false, true, false]; 3]).unwrap();
        evolve(&mut grid, "B3/S23", 2).unwrap();
        assert_eq!(grid.living_cells(), vec![(0, 1), (1, 1), (2, 1)]);

        assert_eq!(
            evolve(&mut grid, "abc", 1),
            Err(LifeError::InvalidRule("abc".to_string()))
        );
    }
}
