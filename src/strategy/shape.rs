//! Mixed-strategy generators and inverse-transform sampling.
use crate::Probability;
use crate::rng::Source;

/// Shape of a generated probability vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Uniform,
    /// Independent uniform weights, normalised.
    Random,
    /// Most mass on one strategy, the remainder spread evenly.
    Concentrated { focus: usize },
    /// Mass pushed to the two extreme indices, heavier at `toward`.
    Polarized { toward: usize },
}

impl Shape {
    const FOCUS: Probability = 0.7;
    const NEAR: Probability = 0.6;
    const FAR: Probability = 0.3;

    pub fn weights(&self, n: usize, rng: &mut Source) -> Vec<Probability> {
        if n <= 1 {
            return vec![1.0; n];
        }
        match *self {
            Self::Uniform => uniform(n),
            Self::Random => normalize(&(0..n).map(|_| rng.next()).collect::<Vec<_>>())
                .unwrap_or_else(|| uniform(n)),
            Self::Concentrated { focus } => (0..n)
                .map(|i| (1.0 - Self::FOCUS) / n as Probability + if i == focus { Self::FOCUS } else { 0.0 })
                .collect(),
            Self::Polarized { toward } => {
                let toward = toward.min(n - 1);
                let away = n - 1 - toward;
                let interior = (1.0 - Self::NEAR - Self::FAR) / (n.saturating_sub(2)).max(1) as Probability;
                let raw = (0..n)
                    .map(|i| match i {
                        i if i == toward => Self::NEAR,
                        i if i == away => Self::FAR,
                        _ => interior,
                    })
                    .collect::<Vec<_>>();
                normalize(&raw).unwrap_or_else(|| uniform(n))
            }
        }
    }
}

pub fn uniform(n: usize) -> Vec<Probability> {
    vec![1.0 / n.max(1) as Probability; n]
}

/// Rescale to unit mass; `None` without positive finite mass.
pub fn normalize(weights: &[Probability]) -> Option<Vec<Probability>> {
    let clean = weights
        .iter()
        .map(|w| if w.is_finite() { w.max(0.0) } else { 0.0 })
        .collect::<Vec<_>>();
    let total = clean.iter().sum::<Probability>();
    match total > 0.0 && total.is_finite() {
        true => Some(clean.into_iter().map(|w| w / total).collect()),
        false => None,
    }
}

/// Running sums of a distribution; the last entry is pinned to one.
pub fn cumulative(p: &[Probability]) -> Vec<Probability> {
    let mut acc = 0.0;
    let mut cdf = p
        .iter()
        .map(|x| {
            acc += x;
            acc
        })
        .collect::<Vec<_>>();
    if let Some(last) = cdf.last_mut() {
        *last = 1.0;
    }
    cdf
}

/// First index whose cumulative mass exceeds `u`.
pub fn invert(cdf: &[Probability], u: Probability) -> usize {
    cdf.iter()
        .position(|&c| u < c)
        .unwrap_or(cdf.len().saturating_sub(1))
}
