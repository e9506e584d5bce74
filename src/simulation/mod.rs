//! Driving a grid over time from multiple threads

pub mod driver;
pub mod shared;

pub use driver::{Command, Renderer, Simulation, SimulationState, TickStatus};
pub use shared::SharedGrid;
