//! File I/O operations for grids and patterns

use super::{Grid, RuleSet};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Load a grid from a plaintext pattern file
///
/// Format: each line is a row, with `1`, `O` or `*` for alive cells and `0` or `.`
/// for dead cells. Lines starting with `!` are comments.
pub fn load_grid_from_file<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read grid file: {}", path.as_ref().display()))?;

    parse_grid_from_string(&content)
        .with_context(|| format!("Failed to parse grid from file: {}", path.as_ref().display()))
}

/// Parse a grid from a string representation
pub fn parse_grid_from_string(content: &str) -> Result<Grid> {
    let lines: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('!'))
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Grid file is empty or contains no valid rows");
    }

    let mut cells = Vec::with_capacity(lines.len());

    for (row_idx, line) in lines.iter().enumerate() {
        let row = line
            .chars()
            .enumerate()
            .map(|(col_idx, ch)| match ch {
                '1' | 'O' | '*' => Ok(true),
                '0' | '.' => Ok(false),
                _ => anyhow::bail!(
                    "Invalid character '{}' at position ({}, {}). Only '1', 'O', '*', '0' and '.' are allowed",
                    ch,
                    row_idx,
                    col_idx
                ),
            })
            .collect::<Result<Vec<bool>>>()?;
        cells.push(row);
    }

    Ok(Grid::from_cells(cells)?)
}

/// Load a pattern file and center it in a fresh grid of the given size
pub fn load_pattern_into<P: AsRef<Path>>(path: P, width: usize, height: usize) -> Result<Grid> {
    let pattern = load_grid_from_file(&path)?;
    let mut grid = Grid::new(width, height)?;
    grid.place_centered(&pattern).with_context(|| {
        format!(
            "Pattern {} ({}x{}) does not fit in a {}x{} grid",
            path.as_ref().display(),
            pattern.width(),
            pattern.height(),
            width,
            height
        )
    })?;
    log::debug!(
        "Loaded {} live cells from {}",
        grid.living_count(),
        path.as_ref().display()
    );
    Ok(grid)
}

/// Save a grid to a text file
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    let content = grid_to_string(grid);

    // Create parent directories if they don't exist
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write grid to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Convert a grid to string representation
pub fn grid_to_string(grid: &Grid) -> String {
    let mut result = String::with_capacity(grid.height() * (grid.width() + 1));

    for row in grid.rows() {
        result.extend(row.iter().map(|&cell| if cell { '1' } else { '0' }));
        result.push('\n');
    }

    result
}

/// JSON snapshot of a simulation: the grid plus the rule and generation it was taken at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub rule: RuleSet,
    pub generation: u64,
    pub width: usize,
    pub height: usize,
    pub rows: Vec<String>,
}

impl GridSnapshot {
    pub fn new(grid: &Grid, rule: RuleSet, generation: u64) -> Self {
        Self {
            rule,
            generation,
            width: grid.width(),
            height: grid.height(),
            rows: grid_to_string(grid).lines().map(str::to_string).collect(),
        }
    }

    /// Rebuild the grid, checking the stored dimensions against the rows
    pub fn to_grid(&self) -> Result<Grid> {
        let grid = parse_grid_from_string(&self.rows.join("\n"))?;
        if grid.width() != self.width || grid.height() != self.height {
            anyhow::bail!(
                "Snapshot declares {}x{} but its rows describe {}x{}",
                self.width,
                self.height,
                grid.width(),
                grid.height()
            );
        }
        Ok(grid)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize snapshot")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot: {}", path.as_ref().display()))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot: {}", path.as_ref().display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: {}", path.as_ref().display()))
    }
}

/// Create example pattern files
pub fn create_example_grids<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let patterns = [
        ("glider.txt", "010\n001\n111\n"),
        ("blinker.txt", "000\n111\n000\n"),
        ("block.txt", "0000\n0110\n0110\n0000\n"),
        ("beacon.txt", "110000\n110000\n001100\n001100\n"),
        ("r_pentomino.txt", "011\n110\n010\n"),
    ];

    for (name, content) in patterns {
        std::fs::write(dir.join(name), content)
            .with_context(|| format!("Failed to write {}", name))?;
    }

    Ok(())
}
