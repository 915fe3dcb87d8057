use crate::MODE_PRECISION;
use crate::Utility;
use crate::stats;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Percentiles {
    pub p5: Utility,
    pub p10: Utility,
    pub p25: Utility,
    pub p50: Utility,
    pub p75: Utility,
    pub p90: Utility,
    pub p95: Utility,
    pub p99: Utility,
}

/// Shape of one player's payoff samples.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub samples: usize,
    pub min: Utility,
    pub max: Utility,
    pub mean: Utility,
    pub std_dev: Utility,
    pub percentiles: Percentiles,
    pub skewness: f64,
    /// Excess kurtosis; zero for a normal distribution.
    pub kurtosis: f64,
    /// Most frequent value after rounding.
    pub mode: Utility,
}

impl From<Vec<Utility>> for Distribution {
    fn from(mut xs: Vec<Utility>) -> Self {
        if xs.is_empty() {
            return Self::default();
        }
        xs.sort_by(f64::total_cmp);
        let n = xs.len() as f64;
        let mean = stats::mean(&xs);
        let central = |k: i32| xs.iter().map(|x| (x - mean).powi(k)).sum::<f64>() / n;
        let m2 = central(2);
        let (skewness, kurtosis) = match m2 > f64::EPSILON {
            true => (central(3) / m2.powf(1.5), central(4) / (m2 * m2) - 3.0),
            false => (0.0, 0.0),
        };
        let ref sorted = xs;
        let q = |p: f64| stats::percentile(sorted, p);
        Self {
            samples: sorted.len(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean,
            std_dev: stats::variance(sorted).sqrt(),
            percentiles: Percentiles {
                p5: q(5.0),
                p10: q(10.0),
                p25: q(25.0),
                p50: q(50.0),
                p75: q(75.0),
                p90: q(90.0),
                p95: q(95.0),
                p99: q(99.0),
            },
            skewness,
            kurtosis,
            mode: mode(sorted),
        }
    }
}

/// Ties resolve to the smallest value.
fn mode(xs: &[Utility]) -> Utility {
    let scale = 10f64.powi(MODE_PRECISION);
    let mut counts = BTreeMap::<i64, usize>::new();
    for x in xs {
        *counts.entry((x * scale).round() as i64).or_default() += 1;
    }
    counts
        .into_iter()
        .fold((0, 0usize), |best, (key, count)| match count > best.1 {
            true => (key, count),
            false => best,
        })
        .0 as Utility
        / scale
}
