use super::*;
use crate::APPROXIMATE_SAMPLES;
use crate::APPROXIMATE_TOLERANCE;
use crate::EQUILIBRIUM_TOLERANCE;
use crate::MIXED_ITERATIONS;
use crate::PayoffTensor;
use serde::Deserialize;
use serde::Serialize;

/// Every solution concept for one game.
///
/// A failed sub-step leaves its field empty and appends to `errors`; the
/// rest of the analysis still completes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub pure: Vec<Equilibrium>,
    pub mixed: Vec<Equilibrium>,
    pub approximate: Vec<Equilibrium>,
    pub dominance: Option<Dominance>,
    pub ess: Vec<EssRecord>,
    pub errors: Vec<String>,
}

impl Analysis {
    /// Pure and mixed equilibria, then approximate ones.
    pub fn equilibria(&self) -> impl Iterator<Item = &Equilibrium> {
        self.pure.iter().chain(self.mixed.iter()).chain(self.approximate.iter())
    }
}

/// Run every solver with default budgets.
pub fn analyze(tensor: &PayoffTensor) -> Analysis {
    let mut analysis = Analysis {
        pure: find_pure_nash(tensor),
        mixed: find_mixed_nash(tensor, MIXED_ITERATIONS, EQUILIBRIUM_TOLERANCE),
        approximate: find_approximate_nash(tensor, APPROXIMATE_SAMPLES, APPROXIMATE_TOLERANCE),
        ..Analysis::default()
    };
    analysis.dominance = recover(analyze_dominance(tensor), &mut analysis.errors);
    analysis.ess = recover(analyze_ess(tensor), &mut analysis.errors).unwrap_or_default();
    log::info!(
        "analysis found {} pure, {} mixed, {} approximate equilibria",
        analysis.pure.len(),
        analysis.mixed.len(),
        analysis.approximate.len()
    );
    analysis
}

fn recover<T>(result: crate::Result<T>, errors: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("analysis step skipped: {}", e);
            errors.push(e.to_string());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prisoners_dilemma() {
        let analysis = analyze(&PayoffTensor::prisoners_dilemma());
        assert_eq!(analysis.pure.len(), 1);
        assert!(analysis.mixed.is_empty());
        assert!(analysis.dominance.as_ref().is_some_and(|d| d.is_strictly_dominant(0, 1)));
        assert!(analysis.ess[1].is_ess);
        assert!(analysis.errors.is_empty());
        assert!(analysis.equilibria().count() >= 1);
    }

    #[test]
    fn degrades_on_asymmetric_games() {
        let game = PayoffTensor::new(vec![
            vec![vec![2.0, 1.0], vec![0.0, 0.0], vec![1.0, 3.0]],
            vec![vec![0.0, 0.0], vec![1.0, 2.0], vec![0.0, 1.0]],
        ])
        .unwrap();
        let analysis = analyze(&game);
        assert!(analysis.ess.is_empty());
        assert_eq!(analysis.errors.len(), 1);
        assert!(analysis.dominance.is_some());
    }

    #[test]
    fn serializes() {
        let analysis = analyze(&PayoffTensor::matching_pennies());
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["mixed"][0]["type"], "mixed");
        assert!(json["pure"].as_array().is_some_and(|a| a.is_empty()));
        assert!(json["dominance"]["strictlyDominated"].is_array());
        assert_eq!(json["ess"].as_array().map(|a| a.len()), Some(2));
    }

    #[test]
    fn idempotent() {
        let game = PayoffTensor::hawk_dove();
        assert_eq!(analyze(&game), analyze(&game));
    }
}
