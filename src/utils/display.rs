//! Display and output formatting utilities

use crate::config::{DisplayConfig, OutputFormat};
use crate::life::io::grid_to_string;
use crate::life::{Grid, GridSnapshot, RuleSet};
use crate::simulation::{Renderer, TickStatus};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Format grids for display
pub struct GridFormatter;

impl GridFormatter {
    /// Format a grid in compact form
    pub fn format_grid_compact(grid: &Grid) -> String {
        Self::format_grid_with_glyphs(grid, '█', '·')
    }

    /// Format a grid with the given glyphs for live and dead cells
    pub fn format_grid_with_glyphs(grid: &Grid, alive: char, dead: char) -> String {
        let mut output = String::with_capacity(grid.height() * (grid.width() + 1));
        for row in grid.rows() {
            output.extend(row.iter().map(|&cell| if cell { alive } else { dead }));
            output.push('\n');
        }
        output
    }

    /// Format a grid with coordinates
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        for x in 0..grid.width() {
            output.push_str(&format!("{:2}", x % 10));
        }
        output.push('\n');

        // Rows with row numbers
        for (y, row) in grid.rows().enumerate() {
            output.push_str(&format!("{:2} ", y));
            for &cell in row {
                output.push_str(if cell { "██" } else { "··" });
            }
            output.push('\n');
        }

        output
    }

    /// One-line summary of a simulation's progress
    pub fn format_status(grid: &Grid, status: &TickStatus) -> String {
        format!(
            "Generation {} | {} | Population {} | {}x{} | {}",
            status.generation,
            status.rules,
            grid.living_count(),
            grid.width(),
            grid.height(),
            status.state
        )
    }

    /// Save a grid after `generation` generations under `rules` in the requested format.
    /// Returns the path written.
    pub fn save_grid<P: AsRef<Path>>(
        grid: &Grid,
        rules: RuleSet,
        generation: u64,
        output_dir: P,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let path = match format {
            OutputFormat::Text => {
                let path = output_dir.join(format!("generation_{:05}.txt", generation));
                std::fs::write(&path, grid_to_string(grid))?;
                path
            }
            OutputFormat::Json => {
                let path = output_dir.join(format!("generation_{:05}.json", generation));
                GridSnapshot::new(grid, rules, generation).save_to_file(&path)?;
                path
            }
            OutputFormat::Visual => {
                let path = output_dir.join(format!("generation_{:05}_visual.txt", generation));
                let content = format!(
                    "Generation {} under {} (Living: {}):\n{}",
                    generation,
                    rules,
                    grid.living_count(),
                    Self::format_grid_with_coords(grid)
                );
                std::fs::write(&path, content)?;
                path
            }
        };

        Ok(path)
    }
}

/// Renders each tick to a terminal as text
pub struct TerminalRenderer<W: Write> {
    out: W,
    config: DisplayConfig,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, config: DisplayConfig) -> Self {
        Self { out, config }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, grid: &Grid, status: &TickStatus) -> Result<()> {
        if self.config.clear_screen {
            // Home the cursor and clear the screen
            write!(self.out, "\x1b[H\x1b[2J")?;
        }
        write!(
            self.out,
            "{}",
            GridFormatter::format_grid_with_glyphs(grid, self.config.alive_char, self.config.dead_char)
        )?;
        writeln!(self.out, "{}", ColorOutput::info(&GridFormatter::format_status(grid, status)))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::SimulationState;
    use tempfile::tempdir;

    fn sample_grid() -> Grid {
        Grid::from_cells(vec![
            vec![true, false, true],
            vec![false, true, false],
            vec![true, false, true],
        ])
        .unwrap()
    }

    fn status() -> TickStatus {
        TickStatus {
            generation: 7,
            state: SimulationState::Running,
            rules: RuleSet::conway(),
        }
    }

    #[test]
    fn test_grid_formatting() {
        let grid = sample_grid();

        let compact = GridFormatter::format_grid_compact(&grid);
        assert_eq!(compact, "█·█\n·█·\n█·█\n");

        let custom = GridFormatter::format_grid_with_glyphs(&grid, '#', ' ');
        assert_eq!(custom, "# #\n # \n# #\n");

        let with_coords = GridFormatter::format_grid_with_coords(&grid);
        assert!(with_coords.contains(" 0 1 2"));
    }

    #[test]
    fn test_format_status() {
        let line = GridFormatter::format_status(&sample_grid(), &status());
        assert_eq!(line, "Generation 7 | B3/S23 | Population 5 | 3x3 | running");
    }

    #[test]
    fn test_terminal_renderer() {
        let config = DisplayConfig {
            alive_char: 'O',
            dead_char: '.',
            clear_screen: false,
        };
        let mut renderer = TerminalRenderer::new(Vec::new(), config);
        renderer.render(&sample_grid(), &status()).unwrap();

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(output.starts_with("O.O\n.O.\nO.O\n"));
        assert!(output.contains("Generation 7"));
    }

    #[test]
    fn test_save_grid_formats() {
        let temp_dir = tempdir().unwrap();
        let grid = sample_grid();

        let text = GridFormatter::save_grid(&grid, RuleSet::conway(), 3, temp_dir.path(), OutputFormat::Text).unwrap();
        assert_eq!(std::fs::read_to_string(text).unwrap(), "101\n010\n101\n");

        let json = GridFormatter::save_grid(&grid, RuleSet::conway(), 3, temp_dir.path(), OutputFormat::Json).unwrap();
        let snapshot = GridSnapshot::load_from_file(json).unwrap();
        assert_eq!(snapshot.generation, 3);
        assert_eq!(snapshot.to_grid().unwrap(), grid);

        let visual = GridFormatter::save_grid(&grid, RuleSet::conway(), 3, temp_dir.path(), OutputFormat::Visual).unwrap();
        assert!(std::fs::read_to_string(visual).unwrap().contains("Living: 5"));
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        // Should either be colored or plain text
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }
}
