//! Streaming convergence detection.
//!
//! Three FIFO windows over per-player payoffs (W/2, W, 2W) feed running
//! summaries and a battery of lightweight statistical tests. The
//! [`Analyzer`] turns those into a [`Report`] with a recommended [`Action`].
mod analyzer;
mod battery;
mod options;
mod report;
mod summary;
mod window;

pub use analyzer::*;
pub use battery::*;
pub use options::*;
pub use report::*;
pub use summary::*;
pub use window::*;
