//! Statistical quality validation for uniform streams.
use crate::Probability;
use crate::SIGNIFICANCE;
use crate::stats;
use serde::Deserialize;
use serde::Serialize;

/// Four-level verdict over the uniformity and independence tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Chi-square goodness of fit against a uniform histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformityTest {
    pub chi_square: f64,
    pub degrees_of_freedom: usize,
    pub p_value: Probability,
    pub is_uniform: bool,
    pub histogram: Vec<usize>,
}

/// Lag-1 serial correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndependenceTest {
    pub correlation: f64,
    pub p_value: Probability,
    pub is_independent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub sample_size: usize,
    pub uniformity_test: UniformityTest,
    pub independence_test: IndependenceTest,
    pub quality: Quality,
}

impl QualityReport {
    pub const BINS: usize = 10;
    const FAIR_P: Probability = 0.01;
    const FAIR_R: f64 = 0.3;
}

impl From<(&[f64], usize)> for QualityReport {
    fn from((samples, bins): (&[f64], usize)) -> Self {
        let uniformity_test = UniformityTest::from((samples, bins.max(2)));
        let independence_test = IndependenceTest::from(samples);
        let quality = match (uniformity_test.is_uniform, independence_test.is_independent) {
            (true, true) => Quality::Excellent,
            (true, false) | (false, true) => Quality::Good,
            _ if uniformity_test.p_value > Self::FAIR_P
                && independence_test.correlation.abs() < Self::FAIR_R =>
            {
                Quality::Fair
            }
            _ => Quality::Poor,
        };
        Self {
            sample_size: samples.len(),
            uniformity_test,
            independence_test,
            quality,
        }
    }
}

impl From<(&[f64], usize)> for UniformityTest {
    fn from((samples, bins): (&[f64], usize)) -> Self {
        let mut histogram = vec![0usize; bins];
        for x in samples {
            histogram[((x * bins as f64) as usize).min(bins - 1)] += 1;
        }
        let expected = samples.len() as f64 / bins as f64;
        let chi_square = match samples.len() {
            0 => 0.0,
            _ => histogram
                .iter()
                .map(|&o| (o as f64 - expected).powi(2) / expected)
                .sum(),
        };
        let degrees_of_freedom = bins - 1;
        let p_value = stats::chi_square_tail(chi_square, degrees_of_freedom);
        Self {
            chi_square,
            degrees_of_freedom,
            p_value,
            is_uniform: p_value > SIGNIFICANCE,
            histogram,
        }
    }
}

impl From<&[f64]> for IndependenceTest {
    fn from(samples: &[f64]) -> Self {
        let correlation = stats::autocorrelation(samples);
        let z = correlation * (samples.len() as f64).sqrt();
        let p_value = stats::two_sided(z);
        Self {
            correlation,
            p_value,
            is_independent: p_value > SIGNIFICANCE,
        }
    }
}
