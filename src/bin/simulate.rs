//! Simulation Binary
//!
//! Runs a Monte Carlo simulation from a JSON config (or a canonical game)
//! and prints the result as JSON. Type "Q" + Enter to stop early.
//!
//! Options: --config, --game, --iterations, --seed, --generator, --batch,
//! --workers, --analyze, --quality

use anyhow::Context;
use clap::Parser;
use gamesim::rng::RngKind;
use gamesim::rng::Source;
use gamesim::simulation::Simulation;
use gamesim::simulation::SimulationConfig;
use gamesim::strategy::PlayerRule;
use gamesim::*;

#[derive(Parser)]
#[command(author, version, about = "Monte Carlo simulation of two-player games", long_about = None)]
struct Args {
    /// JSON simulation config; flags below override its fields
    #[arg(long)]
    config: Option<std::path::PathBuf>,
    /// Canonical game when no config is given: pd, coordination, pennies, hawk-dove, rps
    #[arg(long, default_value = "pd")]
    game: String,
    #[arg(long)]
    iterations: Option<usize>,
    #[arg(long)]
    seed: Option<u32>,
    /// mersenne, lcg or xorshift
    #[arg(long)]
    generator: Option<String>,
    #[arg(long)]
    batch: Option<usize>,
    /// Parallel workers; 0 uses every core
    #[arg(long)]
    workers: Option<usize>,
    /// Also solve the game for equilibria, dominance and ESS
    #[arg(long)]
    analyze: bool,
    /// Print a quality report over this many draws of the generator
    #[arg(long)]
    quality: Option<usize>,
}

impl Args {
    fn build(&self) -> anyhow::Result<SimulationConfig> {
        let mut config = match self.config {
            Some(ref path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str::<SimulationConfig>(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => {
                let tensor = canonical(&self.game)?;
                let rules = (0..PayoffTensor::PLAYERS)
                    .map(|_| PlayerRule::Mixed { probabilities: None })
                    .collect();
                SimulationConfig::new(tensor, rules, 100_000)
            }
        };
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(ref generator) = self.generator {
            config.rng_kind = generator.parse::<RngKind>()?;
        }
        if let Some(batch) = self.batch {
            config.batch_size = batch;
        }
        match self.workers {
            Some(0) => config.workers = num_cpus::get(),
            Some(workers) => config.workers = workers,
            None => {}
        }
        Ok(config)
    }
}

fn canonical(name: &str) -> anyhow::Result<PayoffTensor> {
    match name {
        "pd" | "prisoners-dilemma" => Ok(PayoffTensor::prisoners_dilemma()),
        "coordination" => Ok(PayoffTensor::coordination()),
        "pennies" | "matching-pennies" => Ok(PayoffTensor::matching_pennies()),
        "hawk-dove" => Ok(PayoffTensor::hawk_dove()),
        "rps" | "rock-paper-scissors" => Ok(PayoffTensor::rock_paper_scissors()),
        other => anyhow::bail!("unknown game: {}", other),
    }
}

fn main() -> anyhow::Result<()> {
    log();
    let args = Args::parse();
    let config = args.build()?;
    if let Some(n) = args.quality {
        let report = Source::new(config.rng_kind, config.seed).validate_quality(n);
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    if args.analyze {
        let analysis = equilibrium::analyze(&config.payoff_tensor);
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    }
    let mut simulation = Simulation::new();
    brb(simulation.interrupter());
    let mut progress = |percent: f64, _: Option<&convergence::Report>| {
        log::info!("progress {:>6.2}%", percent);
    };
    let result = simulation.run(config, &mut progress)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
