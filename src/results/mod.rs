//! Accumulated run statistics.
//!
//! The [`Aggregator`] keeps O(1) running moments per player and spills raw
//! samples to the memory manager so a full [`Distribution`] can be computed
//! on demand. [`Evolution`] samples per-strategy time series and the
//! [`Archive`] ranks a finished run against earlier sessions.
mod aggregator;
mod archive;
mod distribution;
mod evolution;

pub use aggregator::*;
pub use archive::*;
pub use distribution::*;
pub use evolution::*;
