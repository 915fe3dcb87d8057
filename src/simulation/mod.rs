//! Batched, interruptible orchestration of repeated play.
//!
//! A [`Simulation`] is the long-lived handle: it owns the phase, the
//! [`Interrupt`] token and, after an interruption, the [`SimulationState`]
//! snapshot that [`Simulation::resume`] consumes. Each call builds a [`Run`]
//! context that owns every mutable component for its duration.
mod config;
mod interrupt;
mod observer;
mod orchestrator;
mod result;
mod run;
mod state;
mod workers;

pub use config::*;
pub use interrupt::*;
pub use observer::*;
pub use orchestrator::*;
pub use result::*;
pub use run::*;
pub use state::*;
pub use workers::*;
