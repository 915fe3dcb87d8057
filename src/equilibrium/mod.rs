//! Solution concepts computed directly from a [`crate::PayoffTensor`].
//!
//! Every solver is a pure function of the tensor: repeated calls return
//! equal results. Randomised searches seed themselves from the tensor's
//! contents rather than from any shared stream.
//!
//! - [`find_pure_nash`]: exhaustive unilateral-deviation check
//! - [`find_mixed_nash`]: fictitious play from many starts, support polish
//! - [`find_approximate_nash`]: Monte Carlo profiles, clustering, local search
//! - [`analyze_dominance`]: strict/weak dominance and iterated elimination
//! - [`analyze_ess`]: two-strategy replicator dynamics against every invader
mod analysis;
mod approximate;
mod dominance;
mod ess;
mod fitness;
mod mixed;
mod nash;
mod pure;
mod validate;

pub use analysis::*;
pub use approximate::*;
pub use dominance::*;
pub use ess::*;
pub use fitness::*;
pub use mixed::*;
pub use nash::*;
pub use pure::*;
pub use validate::*;
