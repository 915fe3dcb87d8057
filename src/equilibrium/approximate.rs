use super::*;
use crate::APPROXIMATE_ELITE;
use crate::CLUSTER_RADIUS;
use crate::PayoffTensor;
use crate::Probability;
use crate::REFINEMENT_STEPS;
use crate::Utility;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Decorrelates the sampling stream from the mixed solver's starts.
const SALT: u64 = 0xA5A5_5A5A_C3C3_3C3C;

/// Monte Carlo search for `tolerance`-equilibria.
///
/// Samples `samples` profiles uniformly from the product of simplices,
/// keeps the [`APPROXIMATE_ELITE`] share with the lowest regret, groups
/// them greedily into [`CLUSTER_RADIUS`] balls, and refines each cluster
/// representative with damped best-response steps. A refined profile is
/// accepted when its regret is within `tolerance` times the payoff range.
/// `stability` is the share of elite samples whose clusters refined to it.
pub fn find_approximate_nash(tensor: &PayoffTensor, samples: usize, tolerance: f64) -> Vec<Equilibrium> {
    let epsilon = tolerance * tensor.scale();
    let ref mut rng = SmallRng::seed_from_u64(seed(tensor) ^ SALT);
    let mut scored = (0..samples.max(1))
        .map(|_| sample(tensor, rng))
        .map(|profile| (regret(tensor, &profile), profile))
        .collect::<Vec<(Utility, Profile)>>();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0));
    let elite = ((scored.len() as f64 * APPROXIMATE_ELITE).ceil() as usize).clamp(1, scored.len());
    scored.truncate(elite);

    let mut clusters = Vec::<(Profile, usize)>::new();
    for (_, profile) in scored {
        match clusters.iter_mut().find(|(rep, _)| distance(rep, &profile) <= CLUSTER_RADIUS) {
            Some((_, size)) => *size += 1,
            None => clusters.push((profile, 1)),
        }
    }
    log::debug!("{} elite profiles in {} clusters", elite, clusters.len());

    let mut found = Vec::<Equilibrium>::new();
    for (representative, size) in clusters {
        let refined = refine(tensor, representative);
        let residual = regret(tensor, &refined);
        if residual > epsilon {
            continue;
        }
        let share = size as Probability / elite as Probability;
        if let Some(known) = found
            .iter_mut()
            .find(|e| distance(&e.strategies, &refined) <= CLUSTER_RADIUS)
        {
            known.stability += share;
            continue;
        }
        found.push(Equilibrium {
            kind: Kind::Approximate,
            payoffs: payoffs(tensor, &refined),
            is_strict: false,
            stability: share,
            confidence: match epsilon > 0.0 {
                true => (1.0 - residual / epsilon).clamp(0.0, 1.0),
                false => 1.0,
            },
            strategies: refined,
        });
    }
    found
}

/// Damped best-response steps; returns the lowest-regret iterate seen.
fn refine(tensor: &PayoffTensor, start: Profile) -> Profile {
    let mut best = (regret(tensor, &start), start.clone());
    let mut profile = start;
    for step in 0..REFINEMENT_STEPS {
        let eta = 1.0 / (step + 2) as Probability;
        profile = (0..PayoffTensor::PLAYERS)
            .map(|p| toward(&profile[p], best_response(tensor, p, &profile[1 - p]), eta))
            .collect();
        let residual = regret(tensor, &profile);
        if residual < best.0 {
            best = (residual, profile.clone());
        }
    }
    best.1
}
