//! Per-iteration strategy selection.
//!
//! A [`PlayerRule`] is immutable configuration; the [`Strategist`] owns the
//! mutable [`Memory`] each rule needs and turns rules plus seeded draws
//! into strategy indices.
mod memory;
mod rule;
mod shape;
mod strategist;

pub use memory::*;
pub use rule::*;
pub use shape::*;
pub use strategist::*;
