use super::*;
use crate::PayoffTensor;
use crate::Probability;
use serde::Deserialize;
use serde::Serialize;

/// Verdict on a claimed equilibrium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Check `equilibrium` against `tensor`.
///
/// Structural problems (player count, vector length, negative or
/// non-finite weights, mass not summing to one) are all reported. Regret is
/// only checked once the profile is well-formed, against `tolerance` times
/// the payoff range.
pub fn validate(tensor: &PayoffTensor, equilibrium: &Equilibrium, tolerance: f64) -> Validation {
    validate_profile(tensor, &equilibrium.strategies, tolerance)
}

pub fn validate_profile(tensor: &PayoffTensor, profile: &[Vec<Probability>], tolerance: f64) -> Validation {
    let mut errors = Vec::new();
    if profile.len() != PayoffTensor::PLAYERS {
        errors.push(format!(
            "profile has {} strategies, expected {}",
            profile.len(),
            PayoffTensor::PLAYERS
        ));
    }
    for (player, p) in profile.iter().enumerate().take(PayoffTensor::PLAYERS) {
        let n = tensor.strategies(player);
        if p.len() != n {
            errors.push(format!("player {} has {} weights, expected {}", player, p.len(), n));
        }
        if p.iter().any(|x| !x.is_finite() || *x < 0.0) {
            errors.push(format!("player {} has negative or non-finite weights", player));
        }
        let total = p.iter().sum::<Probability>();
        if (total - 1.0).abs() > 1e-6 {
            errors.push(format!("player {} probabilities sum to {}", player, total));
        }
    }
    if errors.is_empty() {
        let residual = regret(tensor, profile);
        if residual > tolerance * tensor.scale() {
            errors.push(format!("a player gains {:.6} by deviating", residual));
        }
    }
    Validation {
        valid: errors.is_empty(),
        errors,
    }
}
