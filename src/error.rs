//! Error taxonomy shared by every component.
use thiserror::Error;

/// Everything that can go wrong in the core.
///
/// Configuration problems are always surfaced to the caller before any
/// iteration executes. Analysis problems are recovered by the solvers and
/// only ever reach the caller through the individual sub-step APIs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed tensor, iteration count, or player rule.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Generator name outside the known set.
    #[error("unknown generator: {0}")]
    UnknownGenerator(String),
    /// Resume requested without a prior interrupted run.
    #[error("no interrupted simulation to resume")]
    NoState,
    /// A solver sub-step failed.
    #[error("analysis error: {0}")]
    Analysis(String),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
