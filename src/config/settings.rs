//! Configuration settings for the simulator

use crate::life::RuleSet;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub simulation: SimulationConfig,
    pub grid: GridConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Birth/survival rule in `B3/S23` or `3/23` notation
    pub rulestring: RuleSet,
    /// Ticks per second
    pub tickrate: u32,
    #[serde(default = "default_start_paused")]
    pub start_paused: bool,
    /// Stop after this many generations
    #[serde(default)]
    pub max_generations: Option<u64>,
}

fn default_start_paused() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    /// Pattern file centered in the grid at startup
    #[serde(default)]
    pub initial_pattern: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub alive_char: char,
    pub dead_char: char,
    pub clear_screen: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_directory: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
    Visual,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            alive_char: '█',
            dead_char: '·',
            clear_screen: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            output_directory: PathBuf::from("output"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig {
                rulestring: RuleSet::conway(),
                tickrate: 30,
                start_paused: true,
                max_generations: None,
            },
            grid: GridConfig {
                width: 100,
                height: 100,
                initial_pattern: None,
            },
            display: DisplayConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.simulation.tickrate == 0 {
            anyhow::bail!("Tickrate must be positive");
        }

        if self.grid.width == 0 || self.grid.height == 0 {
            anyhow::bail!(
                "Grid dimensions must be positive, got {}x{}",
                self.grid.width,
                self.grid.height
            );
        }

        if let Some(ref pattern) = self.grid.initial_pattern {
            if !pattern.exists() {
                anyhow::bail!("Initial pattern file does not exist: {}", pattern.display());
            }
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(rules) = cli_overrides.rules {
            self.simulation.rulestring = rules;
        }
        if let Some(tickrate) = cli_overrides.tickrate {
            self.simulation.tickrate = tickrate;
        }
        if let Some(generations) = cli_overrides.max_generations {
            self.simulation.max_generations = Some(generations);
        }
        if let Some(width) = cli_overrides.width {
            self.grid.width = width;
        }
        if let Some(height) = cli_overrides.height {
            self.grid.height = height;
        }
        if let Some(ref pattern) = cli_overrides.pattern {
            self.grid.initial_pattern = Some(pattern.clone());
        }
        if cli_overrides.running {
            self.simulation.start_paused = false;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub rules: Option<RuleSet>,
    pub tickrate: Option<u32>,
    pub max_generations: Option<u64>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub pattern: Option<PathBuf>,
    pub running: bool,
}
