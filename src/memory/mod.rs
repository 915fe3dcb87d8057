//! Bounded storage for raw per-iteration samples.
//!
//! Samples are packed into little-endian [`Chunk`]s, optionally compressed
//! with a small LZ-style [`codec`], and evicted lowest-priority,
//! least-recently-used first once the [`Manager`] exceeds its byte budget
//! or entry ceiling.
pub mod codec;
mod chunk;
mod manager;
mod options;

pub use chunk::*;
pub use manager::*;
pub use options::*;
