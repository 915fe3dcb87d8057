use crate::Probability;
use crate::SIGNIFICANCE;
use crate::Utility;
use crate::stats;
use serde::Deserialize;
use serde::Serialize;

/// Outcome of one hypothesis test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    pub statistic: f64,
    pub p_value: Probability,
    pub passed: bool,
}

impl Test {
    fn significance(statistic: f64, p_value: Probability) -> Self {
        Self {
            statistic,
            p_value,
            passed: p_value > SIGNIFICANCE,
        }
    }
    /// Degenerate case with no evidence either way.
    fn vacuous() -> Self {
        Self::significance(0.0, 1.0)
    }
    /// Degenerate case with certain rejection.
    fn rejected(statistic: f64) -> Self {
        Self::significance(statistic, 0.0)
    }
}

/// The four checks run against one player's payoff stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Battery {
    pub welch: Test,
    pub variance: Test,
    pub runs: Test,
    pub autocorrelation: Test,
}

impl Battery {
    /// Serial correlation magnitude tolerated before the stream counts as dependent.
    pub const MAX_AUTOCORRELATION: f64 = 0.2;

    /// Earlier and later halves of `xs` are compared against each other;
    /// the whole series is checked for randomness.
    pub fn run(xs: &[Utility]) -> Self {
        let (early, late) = xs.split_at(xs.len() / 2);
        Self {
            welch: welch(early, late),
            variance: fisher(early, late),
            runs: runs(xs),
            autocorrelation: serial(xs),
        }
    }

    pub fn tests(&self) -> [Test; 4] {
        [self.welch, self.variance, self.runs, self.autocorrelation]
    }
    pub fn passed(&self) -> usize {
        self.tests().iter().filter(|t| t.passed).count()
    }
    pub fn all(&self) -> bool {
        self.passed() == 4
    }
}

/// Welch's unequal-variance test for equal means, normal approximation.
pub fn welch(a: &[Utility], b: &[Utility]) -> Test {
    if a.len() < 2 || b.len() < 2 {
        return Test::vacuous();
    }
    let (ma, mb) = (stats::mean(a), stats::mean(b));
    let se = (stats::variance(a) / a.len() as f64 + stats::variance(b) / b.len() as f64).sqrt();
    match se > f64::EPSILON {
        true => {
            let t = (ma - mb) / se;
            Test::significance(t, stats::two_sided(t))
        }
        false if (ma - mb).abs() <= f64::EPSILON => Test::vacuous(),
        false => Test::rejected(f64::MAX),
    }
}

/// Two-sample variance ratio test via the normal approximation to ln F.
pub fn fisher(a: &[Utility], b: &[Utility]) -> Test {
    if a.len() < 2 || b.len() < 2 {
        return Test::vacuous();
    }
    let (va, vb) = (stats::variance(a), stats::variance(b));
    match (va > f64::EPSILON, vb > f64::EPSILON) {
        (false, false) => Test::vacuous(),
        (true, false) | (false, true) => Test::rejected(f64::MAX),
        (true, true) => {
            let f = va / vb;
            let spread = (2.0 / (a.len() - 1) as f64 + 2.0 / (b.len() - 1) as f64).sqrt();
            let z = f.ln() / spread;
            Test::significance(f, stats::two_sided(z))
        }
    }
}

/// Wald–Wolfowitz runs test on signs about the median.
pub fn runs(xs: &[Utility]) -> Test {
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    let median = stats::percentile(&sorted, 50.0);
    let signs = xs
        .iter()
        .filter(|&&x| x != median)
        .map(|&x| x > median)
        .collect::<Vec<_>>();
    let above = signs.iter().filter(|&&s| s).count() as f64;
    let below = signs.len() as f64 - above;
    let n = above + below;
    if above == 0.0 || below == 0.0 {
        return Test::vacuous();
    }
    let observed = 1 + signs.windows(2).filter(|w| w[0] != w[1]).count();
    let expected = 2.0 * above * below / n + 1.0;
    let variance = 2.0 * above * below * (2.0 * above * below - n) / (n * n * (n - 1.0));
    match variance > 0.0 {
        true => {
            let z = (observed as f64 - expected) / variance.sqrt();
            Test::significance(z, stats::two_sided(z))
        }
        false => Test::vacuous(),
    }
}

/// Lag-1 autocorrelation sanity check.
pub fn serial(xs: &[Utility]) -> Test {
    let r = stats::autocorrelation(xs);
    let p = stats::two_sided(r * (xs.len() as f64).sqrt());
    Test {
        statistic: r,
        p_value: p,
        passed: r.abs() < Battery::MAX_AUTOCORRELATION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngKind;
    use crate::rng::Source;

    fn noise(seed: u32, n: usize) -> Vec<Utility> {
        let ref mut rng = Source::new(RngKind::Mersenne, seed);
        (0..n).map(|_| rng.next()).collect()
    }

    #[test]
    fn constant_stream_passes_everything() {
        let battery = Battery::run(&[2.0; 400]);
        assert!(battery.all());
    }

    #[test]
    fn iid_noise_mostly_passes() {
        let passes = (1..=20)
            .map(|seed| Battery::run(&noise(seed, 1_000)).passed())
            .sum::<usize>();
        assert!(passes >= 70, "{} of 80", passes);
    }

    #[test]
    fn shifted_mean_fails_welch() {
        let xs = (0..1_000)
            .map(|i| if i < 500 { 0.0 } else { 1.0 })
            .zip(noise(3, 1_000))
            .map(|(a, b)| a + b * 0.1)
            .collect::<Vec<_>>();
        let battery = Battery::run(&xs);
        assert!(!battery.welch.passed);
        assert!(!battery.runs.passed);
    }

    #[test]
    fn unequal_spread_fails_variance() {
        let xs = noise(5, 1_000)
            .into_iter()
            .enumerate()
            .map(|(i, x)| if i < 500 { x } else { x * 5.0 })
            .collect::<Vec<_>>();
        assert!(!Battery::run(&xs).variance.passed);
    }

    #[test]
    fn alternating_fails_runs_and_autocorrelation() {
        let xs = (0..500).map(|i| (i % 2) as Utility).collect::<Vec<_>>();
        let battery = Battery::run(&xs);
        assert!(!battery.runs.passed);
        assert!(!battery.autocorrelation.passed);
        assert!(battery.welch.passed);
    }
}
