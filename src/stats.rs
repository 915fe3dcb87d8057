//! Numeric primitives shared by the RNG validator, convergence analyzer and
//! results aggregator.
//!
//! Normal and chi-square tails come from `statrs`. Large-sample t and log-F
//! statistics are read against the standard normal.
use crate::Probability;
use statrs::distribution::ChiSquared;
use statrs::distribution::ContinuousCDF;
use statrs::distribution::Normal;

/// Φ(z), the standard normal CDF.
pub fn normal_cdf(z: f64) -> Probability {
    Normal::standard().cdf(z)
}

/// Two-sided p-value of a standard normal statistic.
pub fn two_sided(z: f64) -> Probability {
    (2.0 * Normal::standard().sf(z.abs())).clamp(0.0, 1.0)
}

/// Φ⁻¹(p), kept finite at the ends of the unit interval.
pub fn normal_quantile(p: Probability) -> f64 {
    Normal::standard().inverse_cdf(p.clamp(1e-300, 1.0 - 1e-16))
}

/// Upper tail P(X > x) for X ~ χ²(k).
pub fn chi_square_tail(x: f64, k: usize) -> Probability {
    if x <= 0.0 {
        return 1.0;
    }
    ChiSquared::new(k as f64).map_or(1.0, |chi| chi.sf(x).clamp(0.0, 1.0))
}

/// Two-sided critical value of the t distribution.
///
/// Small samples use fixed conservative values; beyond thirty degrees of
/// freedom the normal quantile stands in.
pub fn t_critical(df: usize, confidence: f64) -> f64 {
    let z = normal_quantile(0.5 + confidence / 2.0);
    let inflation = match df {
        0..=1 => 12.706 / 1.960,
        2..=4 => 2.776 / 1.960,
        5..=9 => 2.262 / 1.960,
        10..=19 => 2.093 / 1.960,
        20..=30 => 2.042 / 1.960,
        _ => 1.0,
    };
    z * inflation
}

pub fn mean(xs: &[f64]) -> f64 {
    match xs.len() {
        0 => 0.0,
        n => xs.iter().sum::<f64>() / n as f64,
    }
}

/// Unbiased sample variance.
pub fn variance(xs: &[f64]) -> f64 {
    match xs.len() {
        0 | 1 => 0.0,
        n => {
            let m = mean(xs);
            xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (n - 1) as f64
        }
    }
}

/// Lag-1 autocorrelation; zero for constant or tiny series.
pub fn autocorrelation(xs: &[f64]) -> f64 {
    if xs.len() < 3 {
        return 0.0;
    }
    let m = mean(xs);
    let denom = xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    xs.windows(2)
        .map(|w| (w[0] - m) * (w[1] - m))
        .sum::<f64>()
        / denom
}

/// Least-squares slope of `xs` against its index.
pub fn slope(xs: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 {
        return 0.0;
    }
    let tbar = (n - 1) as f64 / 2.0;
    let xbar = mean(xs);
    let (num, den) = xs
        .iter()
        .enumerate()
        .map(|(t, x)| (t as f64 - tbar, x - xbar))
        .fold((0.0, 0.0), |(num, den), (dt, dx)| {
            (num + dt * dx, den + dt * dt)
        });
    num / den
}

/// Linear-interpolated percentile of already sorted data, `q` in [0, 100].
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let rank = (q / 100.0).clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = rank.floor() as usize;
            let hi = rank.ceil() as usize;
            let w = rank - lo as f64;
            sorted[lo] * (1.0 - w) + sorted[hi] * w
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn normal_reference_points() {
        assert!(close(normal_cdf(0.0), 0.5, 1e-7));
        assert!(close(normal_cdf(1.96), 0.975002, 1e-6));
        assert!(close(normal_quantile(0.975), 1.959964, 1e-5));
        assert!(close(normal_quantile(0.5), 0.0, 1e-9));
        assert!(close(two_sided(1.96), 0.05, 1e-3));
    }

    #[test]
    fn chi_square_reference_points() {
        // χ²(9) upper 5% point is 16.919
        assert!(close(chi_square_tail(16.919, 9), 0.05, 5e-3));
        assert!(chi_square_tail(1.0, 9) > 0.99);
        assert_eq!(chi_square_tail(5.0, 0), 1.0);
    }

    #[test]
    fn chi_square_tail_is_exact_for_few_degrees_of_freedom() {
        // upper 5% points of χ²(1) and χ²(2)
        assert!(close(chi_square_tail(3.841459, 1), 0.05, 1e-6));
        assert!(close(chi_square_tail(5.991465, 2), 0.05, 1e-6));
        assert!(close(chi_square_tail(2.0, 2), (-1.0f64).exp(), 1e-9));
    }

    #[test]
    fn normal_tails_hold_far_out() {
        assert!(close(two_sided(6.0), 1.973175e-9, 1e-13));
        assert!(normal_quantile(0.0).is_finite());
        assert!(normal_quantile(1.0).is_finite());
        assert!(close(normal_quantile(normal_cdf(-2.5)), -2.5, 1e-9));
    }

    #[test]
    fn t_is_conservative_for_small_samples() {
        assert!(t_critical(5, 0.95) > t_critical(100, 0.95));
        assert!(close(t_critical(1000, 0.95), 1.96, 1e-3));
    }

    #[test]
    fn moments() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(mean(&xs), 2.5);
        assert!(close(variance(&xs), 5.0 / 3.0, 1e-12));
        assert!(close(slope(&xs), 1.0, 1e-12));
        assert_eq!(autocorrelation(&[2.0; 10]), 0.0);
    }

    #[test]
    fn percentiles_interpolate() {
        let xs = [0.0, 10.0];
        assert_eq!(percentile(&xs, 50.0), 5.0);
        assert_eq!(percentile(&xs, 0.0), 0.0);
        assert_eq!(percentile(&xs, 100.0), 10.0);
    }
}
