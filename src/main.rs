//! Command line front end for the life-like automaton simulator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lifelike::{
    config::{CliOverrides, OutputFormat, Settings},
    life::{create_example_grids, io::load_pattern_into, load_grid_from_file, Grid, RuleSet},
    simulation::{Command, SharedGrid, Simulation},
    utils::{ColorOutput, GridFormatter, TerminalRenderer},
};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "lifelike")]
#[command(about = "Life-like cellular automaton simulator")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation in the terminal, controlled from stdin
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Rulestring, e.g. B3/S23 or 3/23 (overrides config)
        #[arg(short, long)]
        rule: Option<RuleSet>,

        /// Grid width in cells (overrides config)
        #[arg(long)]
        width: Option<usize>,

        /// Grid height in cells (overrides config)
        #[arg(long)]
        height: Option<usize>,

        /// Initial pattern file (overrides config)
        #[arg(short, long)]
        pattern: Option<PathBuf>,

        /// Ticks per second (overrides config)
        #[arg(short, long)]
        tickrate: Option<u32>,

        /// Stop after this many generations (overrides config)
        #[arg(short, long)]
        generations: Option<u64>,

        /// Start running instead of paused
        #[arg(long)]
        running: bool,
    },

    /// Advance a pattern a number of generations and print or save the result
    Step {
        /// Pattern file to start from
        pattern: PathBuf,

        /// Rulestring, e.g. B3/S23 or 3/23
        #[arg(short, long, default_value = "B3/S23")]
        rule: RuleSet,

        /// Number of generations to advance
        #[arg(short, long, default_value_t = 1)]
        generations: u64,

        /// Embed the pattern in a grid of this width
        #[arg(long)]
        width: Option<usize>,

        /// Embed the pattern in a grid of this height
        #[arg(long)]
        height: Option<usize>,

        /// Print every intermediate generation
        #[arg(long)]
        show_evolution: bool,

        /// Save the final generation to this directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Format for the saved generation
        #[arg(long, value_enum, default_value = "text")]
        format: FormatArg,
    },

    /// Parse a rulestring and describe it
    Rule {
        /// Rulestring, e.g. B36/S23 or 36/23
        rulestring: String,
    },

    /// Create example configuration and pattern files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    Text,
    Json,
    Visual,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Visual => OutputFormat::Visual,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config, rule, width, height, pattern, tickrate, generations, running
        } => {
            let overrides = CliOverrides {
                rules: rule,
                tickrate,
                max_generations: generations,
                width,
                height,
                pattern,
                running,
            };
            run_command(config, overrides)
        }
        Commands::Step {
            pattern, rule, generations, width, height, show_evolution, output, format
        } => {
            step_command(
                pattern, rule, generations, width, height,
                show_evolution, output, format.into()
            )
        }
        Commands::Rule { rulestring } => rule_command(&rulestring),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn load_settings(config_path: &Path) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        log::warn!("Config file {} not found, using defaults", config_path.display());
        Ok(Settings::default())
    }
}

fn initial_grid(settings: &Settings) -> Result<Grid> {
    match settings.grid.initial_pattern {
        Some(ref path) => load_pattern_into(path, settings.grid.width, settings.grid.height),
        None => Ok(Grid::new(settings.grid.width, settings.grid.height)?),
    }
}

fn run_command(config_path: PathBuf, overrides: CliOverrides) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);
    settings.validate().context("Configuration validation failed")?;

    let shared = SharedGrid::new(initial_grid(&settings)?);
    let mut simulation = Simulation::new(
        shared.clone(),
        settings.simulation.rulestring,
        settings.simulation.tickrate,
    );
    if !settings.simulation.start_paused {
        simulation.handle(Command::TogglePause);
    }

    log::info!(
        "Running {} on a {}x{} grid at {} ticks/s",
        settings.simulation.rulestring,
        settings.grid.width,
        settings.grid.height,
        settings.simulation.tickrate
    );

    let (tx, rx) = mpsc::channel();

    // Drawing and clearing go straight to the grid; state changes go to the driver.
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(e) => {
                    log::warn!("{}", e);
                    continue;
                }
            };
            match command {
                Command::Clear => shared.clear(),
                Command::Set { row, col, alive } => {
                    if let Err(e) = shared.set(row, col, alive) {
                        log::warn!("Ignoring draw command: {}", e);
                    }
                }
                other => {
                    if tx.send(other).is_err() {
                        break;
                    }
                }
            }
        }
    });

    let mut renderer = TerminalRenderer::new(std::io::stdout(), settings.display.clone());
    simulation.run(&rx, &mut renderer, settings.simulation.max_generations)?;

    println!("{}", ColorOutput::info(&format!("Stopped at generation {}", simulation.generation())));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn step_command(
    pattern_path: PathBuf,
    rules: RuleSet,
    generations: u64,
    width: Option<usize>,
    height: Option<usize>,
    show_evolution: bool,
    output_dir: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let pattern = load_grid_from_file(&pattern_path)?;
    let mut grid = match (width, height) {
        (None, None) => pattern,
        _ => {
            let mut grid = Grid::new(
                width.unwrap_or(pattern.width()),
                height.unwrap_or(pattern.height()),
            )?;
            grid.place_centered(&pattern)
                .context("Pattern does not fit in the requested grid")?;
            grid
        }
    };

    println!(
        "{}",
        ColorOutput::info(&format!(
            "Advancing {}x{} grid {} generation(s) under {}",
            grid.width(),
            grid.height(),
            generations,
            rules
        ))
    );

    let start_time = Instant::now();
    for generation in 1..=generations {
        grid.advance(&rules);
        if show_evolution {
            println!("Generation {} (Living: {}):", generation, grid.living_count());
            println!("{}", GridFormatter::format_grid_compact(&grid));
        }
    }
    let elapsed = start_time.elapsed();

    if !show_evolution {
        println!("{}", GridFormatter::format_grid_with_coords(&grid));
    }
    println!(
        "{}",
        ColorOutput::success(&format!(
            "Generation {} reached in {:.3}s, {} living cell(s)",
            generations,
            elapsed.as_secs_f64(),
            grid.living_count()
        ))
    );
    if grid.is_empty() {
        println!("{}", ColorOutput::warning("The pattern died out"));
    }

    if let Some(dir) = output_dir {
        let path = GridFormatter::save_grid(&grid, rules, generations, &dir, format)
            .context("Failed to save final generation")?;
        println!("Saved: {}", path.display());
    }

    Ok(())
}

fn rule_command(rulestring: &str) -> Result<()> {
    let rules = match RuleSet::parse(rulestring) {
        Ok(rules) => rules,
        Err(e) => {
            println!("{}", ColorOutput::error(&e.to_string()));
            return Err(e.into());
        }
    };

    println!("Rule: {}", rules);
    if let Some(name) = rules.name() {
        println!("Name: {}", name);
    }
    println!("Birth on:    {:?}", rules.birth_counts());
    println!("Survive on:  {:?}", rules.survival_counts());
    if rules.births_from_nothing() {
        println!("{}", ColorOutput::warning("Dead cells with no neighbors come alive (B0)"));
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let pattern_dir = directory.join("patterns");

    for dir in [&config_dir, &pattern_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    // Create default configuration
    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_grids(&pattern_dir).context("Failed to create example patterns")?;
    println!("Created example patterns in: {}", pattern_dir.display());

    let examples_dir = config_dir.join("examples");

    let mut glider = Settings::default();
    glider.grid.width = 40;
    glider.grid.height = 20;
    glider.grid.initial_pattern = Some(PathBuf::from("patterns/glider.txt"));
    glider.to_file(&examples_dir.join("glider.yaml"))?;

    let mut highlife = Settings::default();
    highlife.simulation.rulestring = RuleSet::highlife();
    highlife.simulation.tickrate = 10;
    highlife.grid.initial_pattern = Some(PathBuf::from("patterns/r_pentomino.txt"));
    highlife.to_file(&examples_dir.join("highlife.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());
    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nControls while running (type and press Enter):");
    println!("  <Enter> or p   toggle pause");
    println!("  .              advance one generation while paused");
    println!("  c              clear the grid");
    println!("  s ROW COL      bring a cell to life");
    println!("  d ROW COL      kill a cell");
    println!("  q              quit");

    Ok(())
}
