use crate::Utility;
use crate::stats;
use serde::Deserialize;
use serde::Serialize;

/// Running statistics for one player over one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub samples: usize,
    pub mean: Utility,
    pub variance: Utility,
    pub standard_error: Utility,
    pub confidence_interval: [Utility; 2],
}

impl From<(&[Utility], f64)> for Summary {
    fn from((xs, confidence): (&[Utility], f64)) -> Self {
        let samples = xs.len();
        let mean = stats::mean(xs);
        let variance = stats::variance(xs);
        let standard_error = match samples {
            0 => 0.0,
            n => (variance / n as Utility).sqrt(),
        };
        let margin = stats::t_critical(samples.saturating_sub(1), confidence) * standard_error;
        Self {
            samples,
            mean,
            variance,
            standard_error,
            confidence_interval: [mean - margin, mean + margin],
        }
    }
}
