//! Expected payoffs, best responses and regret over mixed profiles.
use crate::EPSILON;
use crate::PayoffTensor;
use crate::Probability;
use crate::Utility;
use crate::strategy::normalize;
use rand::Rng;
use rand_distr::Exp1;

/// One mixed strategy per player.
pub type Profile = Vec<Vec<Probability>>;

/// Point mass on `strategy` out of `n`.
pub fn point(n: usize, strategy: usize) -> Vec<Probability> {
    (0..n).map(|i| if i == strategy { 1.0 } else { 0.0 }).collect()
}

/// Value to `player` of each of its pure strategies against the opponent's mix.
pub fn values(tensor: &PayoffTensor, player: usize, opponent: &[Probability]) -> Vec<Utility> {
    (0..tensor.strategies(player))
        .map(|mine| {
            opponent
                .iter()
                .enumerate()
                .map(|(theirs, q)| q * tensor.utility(player, mine, theirs))
                .sum()
        })
        .collect()
}

/// Uniformly random point on each player's simplex: normalised unit
/// exponentials, i.e. a flat Dirichlet.
pub fn sample(tensor: &PayoffTensor, rng: &mut impl Rng) -> Profile {
    (0..PayoffTensor::PLAYERS)
        .map(|player| {
            let n = tensor.strategies(player);
            let weights = (0..n)
                .map(|_| rng.sample::<f64, _>(Exp1))
                .collect::<Vec<_>>();
            normalize(&weights).unwrap_or_else(|| vec![1.0 / n as Probability; n])
        })
        .collect()
}

/// Move a fraction `step` of the mass onto `target`, renormalised.
pub fn toward(p: &[Probability], target: usize, step: Probability) -> Vec<Probability> {
    let moved = p
        .iter()
        .enumerate()
        .map(|(i, x)| (1.0 - step) * x + if i == target { step } else { 0.0 })
        .collect::<Vec<_>>();
    normalize(&moved).unwrap_or(moved)
}

/// Expected payoff to `player` under `profile`.
pub fn expected(tensor: &PayoffTensor, player: usize, profile: &[Vec<Probability>]) -> Utility {
    values(tensor, player, &profile[1 - player])
        .iter()
        .zip(profile[player].iter())
        .map(|(v, p)| v * p)
        .sum()
}

/// Expected payoff vector under `profile`.
pub fn payoffs(tensor: &PayoffTensor, profile: &[Vec<Probability>]) -> Vec<Utility> {
    (0..PayoffTensor::PLAYERS)
        .map(|player| expected(tensor, player, profile))
        .collect()
}

/// Pure best response; ties resolve to the lowest index.
pub fn best_response(tensor: &PayoffTensor, player: usize, opponent: &[Probability]) -> usize {
    values(tensor, player, opponent)
        .into_iter()
        .enumerate()
        .fold((0, Utility::NEG_INFINITY), |best, (i, v)| {
            if v > best.1 + EPSILON { (i, v) } else { best }
        })
        .0
}

/// Largest gain any player can get by deviating unilaterally.
pub fn regret(tensor: &PayoffTensor, profile: &[Vec<Probability>]) -> Utility {
    (0..PayoffTensor::PLAYERS)
        .map(|player| {
            let best = values(tensor, player, &profile[1 - player])
                .into_iter()
                .fold(Utility::NEG_INFINITY, Utility::max);
            (best - expected(tensor, player, profile)).max(0.0)
        })
        .fold(0.0, Utility::max)
}

/// Equilibrium fitness: the smallest share of any player's mass that sits on
/// `epsilon`-best responses. One at an exact equilibrium.
pub fn fitness(tensor: &PayoffTensor, profile: &[Vec<Probability>], epsilon: Utility) -> Probability {
    (0..PayoffTensor::PLAYERS)
        .map(|player| {
            let values = values(tensor, player, &profile[1 - player]);
            let best = values.iter().copied().fold(Utility::NEG_INFINITY, Utility::max);
            values
                .iter()
                .zip(profile[player].iter())
                .filter(|(v, _)| **v >= best - epsilon)
                .map(|(_, p)| p)
                .sum::<Probability>()
        })
        .fold(1.0, Probability::min)
}

/// Largest coordinate difference between two profiles.
pub fn distance(a: &[Vec<Probability>], b: &[Vec<Probability>]) -> Probability {
    a.iter()
        .flatten()
        .zip(b.iter().flatten())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, Probability::max)
}

/// Whether every player puts (almost) all mass on one strategy.
pub fn is_pure(profile: &[Vec<Probability>], tolerance: Probability) -> bool {
    profile
        .iter()
        .all(|p| p.iter().any(|x| *x >= 1.0 - tolerance))
}

/// Seed derived from the tensor's contents, so randomised solvers are
/// reproducible per game across builds and toolchains. FNV-1a over the
/// dimensions and the payload bits, finished with a splitmix64 avalanche.
pub fn seed(tensor: &PayoffTensor) -> u64 {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    let words = [tensor.rows() as u64, tensor.cols() as u64]
        .into_iter()
        .chain(tensor.cells().iter().flatten().flatten().map(|u| u.to_bits()));
    let hash = words
        .flat_map(u64::to_le_bytes)
        .fold(OFFSET, |h, byte| (h ^ byte as u64).wrapping_mul(PRIME));
    let mut z = hash.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}
