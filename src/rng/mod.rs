//! Seeded pseudo-random generation.
//!
//! Every stochastic decision in a simulation routes through a [`Source`],
//! which is reproducible from `(kind, seed)` alone.
//!
//! - [`Mersenne`]: MT19937, 624-word state with standard tempering
//! - [`Linear`]: 32-bit LCG (`1664525`, `1013904223`)
//! - [`Xorshift`]: xorshift32 (13, 17, 5)
//! - [`QualityReport`]: chi-square uniformity + lag-1 independence verdict
mod generator;
mod linear;
mod mersenne;
mod quality;
mod source;
mod xorshift;

pub use generator::*;
pub use linear::*;
pub use mersenne::*;
pub use quality::*;
pub use source::*;
pub use xorshift::*;
