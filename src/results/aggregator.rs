use super::*;
use crate::CONVERGENCE_CONFIDENCE;
use crate::Utility;
use crate::memory::Manager;
use crate::memory::MemoryOptions;
use crate::memory::MemoryStats;
use crate::memory::Priority;
use crate::stats;
use serde::Deserialize;
use serde::Serialize;

/// Running per-player moments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub mean: Vec<Utility>,
    pub variance: Vec<Utility>,
    pub confidence_interval: Vec<[Utility; 2]>,
}

impl Statistics {
    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }
}

/// Streaming accumulator for everything a result reports about payoffs.
///
/// Running moments are always kept. Raw samples and the evolution trace
/// are only collected when `detailed`, since they exist solely for
/// advanced results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregator {
    count: usize,
    detailed: bool,
    sums: Vec<Utility>,
    squares: Vec<Utility>,
    buffers: Vec<Vec<Utility>>,
    chunks: Vec<Vec<u64>>,
    /// Samples lost with chunks evicted from absorbed workers.
    lost: Vec<usize>,
    memory: Manager,
    evolution: Evolution,
}

impl Aggregator {
    pub fn new(players: usize, strategies: usize, memory: MemoryOptions, detailed: bool) -> Self {
        Self {
            count: 0,
            detailed,
            sums: vec![0.0; players],
            squares: vec![0.0; players],
            buffers: vec![Vec::new(); players],
            chunks: vec![Vec::new(); players],
            lost: vec![0; players],
            memory: Manager::new(memory),
            evolution: Evolution::new(players, strategies),
        }
    }

    pub fn push(&mut self, choices: &[usize], payoffs: &[Utility]) {
        self.count += 1;
        for (player, &u) in payoffs.iter().enumerate().take(self.sums.len()) {
            self.sums[player] += u;
            self.squares[player] += u * u;
            if self.detailed {
                self.sample(player, u);
            }
        }
        if self.detailed {
            self.evolution.record(self.count, choices, payoffs);
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn means(&self) -> Vec<Utility> {
        self.sums
            .iter()
            .map(|s| match self.count {
                0 => 0.0,
                n => s / n as Utility,
            })
            .collect()
    }

    /// Unbiased variance from the running sums.
    pub fn variances(&self) -> Vec<Utility> {
        let n = self.count as Utility;
        self.sums
            .iter()
            .zip(self.squares.iter())
            .map(|(s, q)| match self.count {
                0 | 1 => 0.0,
                _ => ((q - s * s / n) / (n - 1.0)).max(0.0),
            })
            .collect()
    }

    pub fn statistics(&self) -> Statistics {
        let mean = self.means();
        let variance = self.variances();
        let critical = stats::t_critical(self.count.saturating_sub(1), CONVERGENCE_CONFIDENCE);
        let confidence_interval = mean
            .iter()
            .zip(variance.iter())
            .map(|(m, v)| {
                let margin = match self.count {
                    0 => 0.0,
                    n => critical * (v / n as Utility).sqrt(),
                };
                [m - margin, m + margin]
            })
            .collect();
        Statistics {
            mean,
            variance,
            confidence_interval,
        }
    }

    /// Every retained raw sample for `player`, oldest first. Evicted chunks are skipped.
    pub fn samples(&mut self, player: usize) -> Vec<Utility> {
        let mut samples = Vec::new();
        for &id in self.chunks[player].iter() {
            if let Some(chunk) = self.memory.load(id) {
                samples.extend(chunk);
            }
        }
        samples.extend_from_slice(&self.buffers[player]);
        samples
    }

    /// Raw samples for `player` that were pushed but can no longer be read
    /// back because their chunk was evicted.
    pub fn evicted(&self, player: usize) -> usize {
        let chunk_size = self.memory.options().chunk_size;
        let gone = self.chunks[player]
            .iter()
            .filter(|id| !self.memory.contains(**id))
            .count();
        self.lost[player] + gone * chunk_size
    }

    pub fn distributions(&mut self) -> Vec<Distribution> {
        (0..self.sums.len())
            .map(|player| Distribution::from(self.samples(player)))
            .collect()
    }

    pub fn evolution(&self) -> &Evolution {
        &self.evolution
    }
    pub fn memory(&self) -> MemoryStats {
        self.memory.stats()
    }

    /// Fold a worker's accumulator into this one, after everything already here.
    pub fn absorb(&mut self, mut other: Aggregator) {
        let offset = self.count;
        self.count += other.count;
        for player in 0..self.sums.len().min(other.sums.len()) {
            self.sums[player] += other.sums[player];
            self.squares[player] += other.squares[player];
            self.lost[player] += other.evicted(player);
            for u in other.samples(player) {
                self.sample(player, u);
            }
        }
        self.evolution.absorb(other.evolution, offset);
    }

    fn sample(&mut self, player: usize, u: Utility) {
        self.buffers[player].push(u);
        if self.buffers[player].len() >= self.memory.options().chunk_size {
            let id = self.memory.store(&self.buffers[player], Priority::Normal);
            self.chunks[player].push(id);
            self.buffers[player].clear();
        }
    }
}
