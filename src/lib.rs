//! Monte Carlo simulation and equilibrium analysis for finite strategic-form games.
//!
//! The crate samples repeated play of a two-player payoff tensor under
//! configurable player rules, decides when the running estimate has
//! stabilised, and independently solves the tensor for Nash equilibria,
//! dominance relations and evolutionarily stable strategies.
//!
//! # Module Structure
//!
//! - `rng`: Seeded generators and a statistical quality validator
//! - `strategy`: Player rules, behavioral archetypes, and the selection engine
//! - `simulation`: Batched, interruptible orchestration of repeated play
//! - `convergence`: Multi-window running statistics and early stopping
//! - `results`: Payoff distributions, strategy evolution, and session history
//! - `memory`: Chunked, compressed, priority-evicted sample storage
//! - `equilibrium`: Pure/mixed/approximate Nash, dominance, and ESS solvers
//! - `stats`: Normal and chi-square tails, t critical values and moments shared by the tests above
pub mod convergence;
pub mod equilibrium;
pub mod error;
pub mod game;
pub mod memory;
pub mod results;
pub mod rng;
pub mod simulation;
pub mod stats;
pub mod strategy;

pub use error::*;
pub use game::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Payoffs, expected values, regrets.
pub type Utility = f64;
/// Mixed strategy weights, population shares, p-values.
pub type Probability = f64;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for tests and benchmarks.
pub trait Arbitrary {
    fn random() -> Self;
}

// ============================================================================
// SIMULATION DEFAULTS
// ============================================================================
/// Iterations processed between progress reports and interrupt checks.
pub const BATCH_SIZE: usize = 10_000;
/// Move history retained per player when learning is enabled.
pub const HISTORY_LIMIT: usize = 1_000;
/// Seed stride between parallel workers.
pub const WORKER_SEED_OFFSET: u32 = 0x9E37_79B9;
/// Separator between strategy names in joint outcome keys.
pub const JOINT_SEPARATOR: &str = " vs ";
/// Draws used for the generator quality report attached to advanced results.
pub const QUALITY_SAMPLES: usize = 10_000;

// ============================================================================
// CONVERGENCE ANALYSIS
// Three windows (W/2, W, 2W) judge stability across timescales.
// ============================================================================
/// Main window capacity W.
pub const CONVERGENCE_WINDOW: usize = 1_000;
/// Upper bound on W after repeated window extensions.
pub const CONVERGENCE_MAX_WINDOW: usize = 16_000;
/// No convergence verdict before this many iterations.
pub const CONVERGENCE_MIN_ITERATIONS: usize = 1_000;
/// Iterations between convergence polls.
pub const CONVERGENCE_CHECK_INTERVAL: usize = 500;
/// Relative tolerance for mean and trend stability.
pub const CONVERGENCE_TOLERANCE: f64 = 0.01;
/// Relative tolerance on the main/long variance ratio.
pub const CONVERGENCE_VARIANCE_TOLERANCE: f64 = 0.2;
/// Confidence level used for intervals.
pub const CONVERGENCE_CONFIDENCE: f64 = 0.95;
/// Significance level of the statistical test battery.
pub const SIGNIFICANCE: Probability = 0.05;
/// Confidence above which a converged run is stopped.
pub const STOP_CONFIDENCE: f64 = 0.8;
/// Confidence above which the window is extended instead of continuing.
pub const EXTEND_CONFIDENCE: f64 = 0.6;
/// Convergence reports retained for the final analysis.
pub const CONVERGENCE_HISTORY: usize = 256;

// ============================================================================
// RESULTS AGGREGATION
// ============================================================================
/// Iterations between strategy evolution samples.
pub const EVOLUTION_INTERVAL: usize = 100;
/// Recent choices used for evolution frequencies.
pub const EVOLUTION_WINDOW: usize = 100;
/// Points kept per strategy series; beyond it the series halves its
/// resolution and the sampling interval doubles.
pub const EVOLUTION_MAX_POINTS: usize = 1_000;
/// Decimal places used when bucketing payoffs for the mode.
pub const MODE_PRECISION: i32 = 2;

// ============================================================================
// MEMORY MANAGEMENT
// ============================================================================
/// Samples per stored chunk.
pub const CHUNK_SIZE: usize = 4_096;
/// Total stored bytes before eviction.
pub const MEMORY_BUDGET: usize = 64 << 20;
/// Stored chunk count before eviction.
pub const MEMORY_MAX_ENTRIES: usize = 1_024;
/// Compressed chunks are kept only below this fraction of their raw size.
pub const COMPRESSION_RATIO: f64 = 0.9;

// ============================================================================
// EQUILIBRIUM SOLVERS
// ============================================================================
/// Random starting points for best-response dynamics.
pub const MIXED_STARTS: usize = 12;
/// Default best-response iteration budget.
pub const MIXED_ITERATIONS: usize = 2_000;
/// Default equilibrium tolerance.
pub const EQUILIBRIUM_TOLERANCE: f64 = 1e-3;
/// Default Monte Carlo profile count for approximate equilibria.
pub const APPROXIMATE_SAMPLES: usize = 2_000;
/// Default regret tolerance for approximate equilibria, relative to payoff range.
pub const APPROXIMATE_TOLERANCE: f64 = 0.01;
/// Mass below which a strategy is treated as outside a profile's support.
pub const SUPPORT_THRESHOLD: f64 = 0.01;
/// Largest strategy count for which supports are enumerated exhaustively.
pub const SUPPORT_LIMIT: usize = 8;
/// Fraction of sampled profiles kept as near-equilibrium candidates.
pub const APPROXIMATE_ELITE: f64 = 0.05;
/// L∞ radius under which two candidate profiles share a cluster.
pub const CLUSTER_RADIUS: f64 = 0.1;
/// Local search steps per cluster representative.
pub const REFINEMENT_STEPS: usize = 400;
/// Safety cap on iterated elimination rounds.
pub const ELIMINATION_ROUNDS: usize = 100;
/// Resident share of the incumbent at the start of an invasion.
pub const ESS_INCUMBENT_SHARE: Probability = 0.99;
/// Final incumbent share that counts as resisting the invader.
pub const ESS_RESIST_SHARE: Probability = 0.9;
/// Average stability needed to call a strategy evolutionarily stable.
pub const ESS_STABILITY: Probability = 0.95;
/// Replicator dynamics step budget.
pub const ESS_GENERATIONS: usize = 10_000;
/// Equality threshold for comparing payoffs.
pub const EPSILON: f64 = 1e-12;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register graceful interrupt handler. Type "Q" + Enter to stop after current batch.
#[cfg(feature = "server")]
pub fn brb(interrupt: simulation::Interrupt) {
    std::thread::spawn(move || {
        loop {
            let ref mut buffer = String::new();
            match std::io::stdin().read_line(buffer) {
                Ok(0) | Err(_) => break,
                Ok(_) if buffer.trim().to_uppercase() == "Q" => {
                    log::warn!("graceful interrupt requested, finishing current batch...");
                    interrupt.interrupt();
                    break;
                }
                Ok(_) => continue,
            }
        }
    });
}
