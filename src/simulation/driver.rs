//! Timer-driven simulation driver with pause/step/clear controls

use super::SharedGrid;
use crate::life::{Grid, RuleSet};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

/// Whether the driver advances the grid on the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationState {
    Paused,
    Running,
    /// Paused with exactly one advance pending
    SingleStep,
}

impl fmt::Display for SimulationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationState::Paused => write!(f, "paused"),
            SimulationState::Running => write!(f, "running"),
            SimulationState::SingleStep => write!(f, "stepping"),
        }
    }
}

/// Input accepted by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TogglePause,
    Step,
    Clear,
    Set { row: usize, col: usize, alive: bool },
    Quit,
}

/// Parses one line of terminal input: an empty line or `p` toggles pause, `.`
/// steps, `c` clears, `q` quits, and `s ROW COL` / `d ROW COL` draw or erase a cell.
impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let command = match parts.next() {
            None | Some("p") => Command::TogglePause,
            Some(".") => Command::Step,
            Some("c") => Command::Clear,
            Some("q") => Command::Quit,
            Some(verb @ ("s" | "d")) => {
                let mut coord = |name: &str| -> Result<usize> {
                    let raw = parts
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("Missing {} for '{}'", name, verb))?;
                    raw.parse()
                        .map_err(|_| anyhow::anyhow!("Invalid {} '{}'", name, raw))
                };
                let row = coord("row")?;
                let col = coord("column")?;
                Command::Set { row, col, alive: verb == "s" }
            }
            Some(other) => anyhow::bail!("Unknown command '{}'", other),
        };

        if let Some(extra) = parts.next() {
            anyhow::bail!("Unexpected argument '{}'", extra);
        }
        Ok(command)
    }
}

/// What a renderer is told alongside the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickStatus {
    pub generation: u64,
    pub state: SimulationState,
    pub rules: RuleSet,
}

/// Read-only paint pass over the grid, run once per tick with the grid locked
pub trait Renderer {
    fn render(&mut self, grid: &Grid, status: &TickStatus) -> Result<()>;
}

/// Owns the state machine and drives a shared grid at a fixed tick rate
#[derive(Debug)]
pub struct Simulation {
    grid: SharedGrid,
    rules: RuleSet,
    state: SimulationState,
    generation: u64,
    tick_interval: Duration,
}

impl Simulation {
    /// Create a paused simulation ticking `tickrate` times per second
    pub fn new(grid: SharedGrid, rules: RuleSet, tickrate: u32) -> Self {
        Self {
            grid,
            rules,
            state: SimulationState::Paused,
            generation: 0,
            tick_interval: Duration::from_secs(1) / tickrate.max(1),
        }
    }

    pub fn grid(&self) -> &SharedGrid {
        &self.grid
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn status(&self) -> TickStatus {
        TickStatus {
            generation: self.generation,
            state: self.state,
            rules: self.rules,
        }
    }

    /// Apply one command. Returns `false` once the driver should stop.
    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::TogglePause => {
                self.state = match self.state {
                    SimulationState::Running => SimulationState::Paused,
                    SimulationState::Paused | SimulationState::SingleStep => SimulationState::Running,
                };
                log::info!("Simulation {} at generation {}", self.state, self.generation);
            }
            Command::Step => {
                self.state = SimulationState::SingleStep;
            }
            Command::Clear => {
                self.grid.clear();
                log::info!("Grid cleared at generation {}", self.generation);
            }
            Command::Set { row, col, alive } => {
                if let Err(e) = self.grid.set(row, col, alive) {
                    log::warn!("Ignoring draw command: {}", e);
                }
            }
            Command::Quit => return false,
        }
        true
    }

    /// Advance according to the current state. Returns whether a generation was computed.
    pub fn tick(&mut self) -> bool {
        match self.state {
            SimulationState::Paused => return false,
            SimulationState::Running => {}
            SimulationState::SingleStep => self.state = SimulationState::Paused,
        }

        self.grid.advance(&self.rules);
        self.generation += 1;
        log::debug!("Advanced to generation {}", self.generation);
        true
    }

    /// One timer tick: maybe advance, then always render
    pub fn tick_and_render<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> Result<bool> {
        let advanced = self.tick();
        let status = self.status();
        self.grid.with_grid(|grid| renderer.render(grid, &status))?;
        Ok(advanced)
    }

    /// Drive the simulation until `Quit`, until `max_generations` is reached, or
    /// until the command channel closes while nothing else can change.
    pub fn run<R: Renderer + ?Sized>(
        &mut self,
        commands: &Receiver<Command>,
        renderer: &mut R,
        max_generations: Option<u64>,
    ) -> Result<()> {
        let mut input_closed = false;

        loop {
            let started = Instant::now();

            while !input_closed {
                match commands.try_recv() {
                    Ok(command) => {
                        if !self.handle(command) {
                            log::info!("Stopping at generation {}", self.generation);
                            return Ok(());
                        }
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => input_closed = true,
                }
            }

            self.tick_and_render(renderer)?;

            if max_generations.is_some_and(|limit| self.generation >= limit) {
                log::info!("Reached generation limit {}", self.generation);
                return Ok(());
            }
            if input_closed && self.state == SimulationState::Paused {
                log::info!("Input closed while paused, stopping at generation {}", self.generation);
                return Ok(());
            }

            std::thread::sleep(self.tick_interval.saturating_sub(started.elapsed()));
        }
    }
}
