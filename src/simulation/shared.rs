//! Grid shared between the tick driver and input handlers

use crate::error::Result;
use crate::life::{Grid, RuleSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle to the one grid of a simulation.
///
/// Every operation takes the same lock for its whole duration, so a full
/// `advance` or read pass never interleaves with a `set` or `clear`.
#[derive(Debug, Clone)]
pub struct SharedGrid {
    inner: Arc<Mutex<Grid>>,
}

impl SharedGrid {
    pub fn new(grid: Grid) -> Self {
        Self {
            inner: Arc::new(Mutex::new(grid)),
        }
    }

    // Grid operations are all-or-nothing, so a panic elsewhere never leaves a half-written grid.
    fn lock(&self) -> MutexGuard<'_, Grid> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn width(&self) -> usize {
        self.lock().width()
    }

    pub fn height(&self) -> usize {
        self.lock().height()
    }

    pub fn get(&self, row: usize, col: usize) -> Result<bool> {
        self.lock().get(row, col)
    }

    pub fn set(&self, row: usize, col: usize, alive: bool) -> Result<()> {
        self.lock().set(row, col, alive)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Stamp a pattern into the grid at (row, col)
    pub fn place(&self, pattern: &Grid, row: usize, col: usize) -> Result<()> {
        self.lock().place(pattern, row, col)
    }

    /// Advance one generation while holding the lock
    pub fn advance(&self, rules: &RuleSet) {
        self.lock().advance(rules);
    }

    /// Run a read pass over the grid with the lock held throughout
    pub fn with_grid<R>(&self, f: impl FnOnce(&Grid) -> R) -> R {
        f(&*self.lock())
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> Grid {
        self.lock().clone()
    }
}
