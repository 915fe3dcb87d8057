use crate::ESS_GENERATIONS;
use crate::ESS_INCUMBENT_SHARE;
use crate::ESS_RESIST_SHARE;
use crate::ESS_STABILITY;
use crate::EPSILON;
use crate::Error;
use crate::PayoffTensor;
use crate::Probability;
use crate::Utility;
use serde::Deserialize;
use serde::Serialize;

/// Outcome of one invader entering an incumbent population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invasion {
    pub invader: usize,
    /// Incumbent share once the dynamics settle.
    pub share: Probability,
    pub resisted: bool,
    pub generations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssRecord {
    pub strategy: usize,
    pub is_ess: bool,
    /// Mean final incumbent share across invaders.
    pub stability: Probability,
    pub invasions: Vec<Invasion>,
}

/// Evolutionary stability of every pure strategy of a symmetric game.
///
/// Fitness is player 0's payoff, shifted so every entry is at least one.
/// Invasions that fail numerically are logged and left out; the strategy is
/// judged on the invaders that completed.
pub fn analyze_ess(tensor: &PayoffTensor) -> crate::Result<Vec<EssRecord>> {
    if !tensor.is_square() {
        return Err(Error::analysis(format!(
            "evolutionary stability needs a symmetric game, got {}x{}",
            tensor.rows(),
            tensor.cols()
        )));
    }
    let n = tensor.rows();
    let records = (0..n)
        .map(|incumbent| {
            let invasions = (0..n)
                .filter(|invader| *invader != incumbent)
                .filter_map(|invader| match invade(tensor, incumbent, invader) {
                    Ok(invasion) => Some(invasion),
                    Err(e) => {
                        log::warn!("strategy {} against invader {}: {}", incumbent, invader, e);
                        None
                    }
                })
                .collect::<Vec<_>>();
            let stability = match invasions.len() {
                0 => 1.0,
                k => invasions.iter().map(|i| i.share).sum::<Probability>() / k as Probability,
            };
            EssRecord {
                strategy: incumbent,
                is_ess: invasions.iter().all(|i| i.resisted) && stability > ESS_STABILITY,
                stability,
                invasions,
            }
        })
        .collect();
    Ok(records)
}

/// Two-strategy replicator dynamics from an [`ESS_INCUMBENT_SHARE`] start.
///
/// `x' = x·f_incumbent / f̄` until the share moves less than [`EPSILON`]
/// or [`ESS_GENERATIONS`] pass.
pub fn invade(tensor: &PayoffTensor, incumbent: usize, invader: usize) -> crate::Result<Invasion> {
    let shift = 1.0 - tensor.bounds().0;
    let fit = |mine: usize, theirs: usize| -> Utility { tensor.payoff(mine, theirs, 0) + shift };
    let mut x = ESS_INCUMBENT_SHARE;
    let mut generations = ESS_GENERATIONS;
    for generation in 1..=ESS_GENERATIONS {
        let f_incumbent = x * fit(incumbent, incumbent) + (1.0 - x) * fit(incumbent, invader);
        let f_invader = x * fit(invader, incumbent) + (1.0 - x) * fit(invader, invader);
        let average = x * f_incumbent + (1.0 - x) * f_invader;
        if !average.is_finite() || average <= 0.0 {
            return Err(Error::analysis(format!(
                "population fitness {} at generation {}",
                average, generation
            )));
        }
        let next = (x * f_incumbent / average).clamp(0.0, 1.0);
        let delta = (next - x).abs();
        x = next;
        if delta < EPSILON {
            generations = generation;
            break;
        }
    }
    Ok(Invasion {
        invader,
        share: x,
        resisted: x >= ESS_RESIST_SHARE,
        generations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defection_is_evolutionarily_stable() {
        let records = analyze_ess(&PayoffTensor::prisoners_dilemma()).unwrap();
        assert!(!records[0].is_ess);
        assert!(records[1].is_ess);
        assert!(records[1].stability > 0.999);
        assert!(records[0].invasions[0].share < 0.01);
    }

    #[test]
    fn hawk_dove_settles_at_mixed_population() {
        let records = analyze_ess(&PayoffTensor::hawk_dove()).unwrap();
        assert!(records.iter().all(|r| !r.is_ess));
        let hawks = &records[0].invasions[0];
        assert_eq!(hawks.invader, 1);
        assert!((hawks.share - 2.0 / 3.0).abs() < 1e-3);
        let doves = &records[1].invasions[0];
        assert!((doves.share - 1.0 / 3.0).abs() < 1e-3);
    }

    #[test]
    fn cyclic_games_have_no_pure_ess() {
        let records = analyze_ess(&PayoffTensor::rock_paper_scissors()).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| !r.is_ess && r.invasions.len() == 2));
    }

    #[test]
    fn rectangular_games_are_rejected() {
        let game = PayoffTensor::new(vec![vec![vec![1.0, 1.0], vec![0.0, 0.0]]]).unwrap();
        assert!(matches!(analyze_ess(&game), Err(Error::Analysis(_))));
    }

    #[test]
    fn idempotent() {
        let game = PayoffTensor::hawk_dove();
        assert_eq!(analyze_ess(&game), analyze_ess(&game));
    }
}
