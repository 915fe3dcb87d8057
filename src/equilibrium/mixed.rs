use super::*;
use crate::EPSILON;
use crate::MIXED_STARTS;
use crate::PayoffTensor;
use crate::Probability;
use crate::SUPPORT_LIMIT;
use crate::SUPPORT_THRESHOLD;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Fully mixed equilibria (at least one player randomises).
///
/// Fictitious play runs from the uniform profile and [`MIXED_STARTS`] random
/// profiles: each player moves toward its pure best response to the
/// opponent's current mix with step `1/(t+2)` until the profile stops
/// moving by more than `tolerance` while satisfying the equilibrium test,
/// or `max_iterations` is spent. Each fixed point is then polished by
/// solving the indifference equations on its support. Small games also
/// have every equal-size support pair enumerated, which recovers unstable
/// equilibria the dynamics flow away from.
///
/// Acceptance requires regret at most `tolerance` times the payoff range.
/// Profiles with every player inside one strategy's [`SUPPORT_THRESHOLD`]
/// are left to [`find_pure_nash`].
/// `stability` is the share of starts whose dynamics reached the
/// equilibrium, `confidence` its [`fitness`].
pub fn find_mixed_nash(tensor: &PayoffTensor, max_iterations: usize, tolerance: f64) -> Vec<Equilibrium> {
    let epsilon = tolerance * tensor.scale();
    let radius = (10.0 * tolerance).max(1e-6);
    let ref mut rng = SmallRng::seed_from_u64(seed(tensor));
    let starts = std::iter::once(uniform(tensor))
        .chain((0..MIXED_STARTS).map(|_| sample(tensor, rng)))
        .collect::<Vec<Profile>>();
    let mut found = Vec::<(Profile, usize)>::new();
    for start in starts.iter() {
        let fixed = fictitious(tensor, start.clone(), max_iterations, tolerance, epsilon);
        let candidate = match polish(tensor, &fixed) {
            Some(polished) if regret(tensor, &polished) <= epsilon => polished,
            _ => fixed,
        };
        if regret(tensor, &candidate) > epsilon || is_pure(&candidate, SUPPORT_THRESHOLD) {
            continue;
        }
        match found.iter_mut().find(|(p, _)| distance(p, &candidate) <= radius) {
            Some((_, hits)) => *hits += 1,
            None => found.push((candidate, 1)),
        }
    }
    for candidate in enumerate(tensor, epsilon) {
        if is_pure(&candidate, SUPPORT_THRESHOLD) {
            continue;
        }
        if found.iter().all(|(p, _)| distance(p, &candidate) > radius) {
            found.push((candidate, 0));
        }
    }
    found
        .into_iter()
        .map(|(strategies, hits)| Equilibrium {
            kind: Kind::Mixed,
            payoffs: payoffs(tensor, &strategies),
            confidence: fitness(tensor, &strategies, epsilon),
            stability: hits as f64 / starts.len() as f64,
            is_strict: false,
            strategies,
        })
        .collect()
}

fn uniform(tensor: &PayoffTensor) -> Profile {
    (0..PayoffTensor::PLAYERS)
        .map(|p| crate::strategy::uniform(tensor.strategies(p)))
        .collect()
}

/// Averaged best-response dynamics.
fn fictitious(tensor: &PayoffTensor, start: Profile, iterations: usize, tolerance: f64, epsilon: f64) -> Profile {
    let mut profile = start;
    for t in 0..iterations {
        let step = 1.0 / (t + 2) as Probability;
        let next = (0..PayoffTensor::PLAYERS)
            .map(|p| toward(&profile[p], best_response(tensor, p, &profile[1 - p]), step))
            .collect::<Profile>();
        let delta = distance(&profile, &next);
        profile = next;
        if delta < tolerance && regret(tensor, &profile) <= epsilon {
            break;
        }
    }
    profile
}

/// Exact equilibrium on the support of `profile`, when both supports have
/// equal size and the indifference system is non-singular.
fn polish(tensor: &PayoffTensor, profile: &[Vec<Probability>]) -> Option<Profile> {
    let supports = profile
        .iter()
        .map(|p| {
            p.iter()
                .enumerate()
                .filter(|(_, x)| **x > SUPPORT_THRESHOLD)
                .map(|(i, _)| i)
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    match supports[0].len() == supports[1].len() && supports[0].len() >= 2 {
        true => solve(tensor, &supports[0], &supports[1]),
        false => None,
    }
}

fn solve(tensor: &PayoffTensor, rows: &[usize], cols: &[usize]) -> Option<Profile> {
    let row = indifference(tensor, 1, cols, rows)?;
    let col = indifference(tensor, 0, rows, cols)?;
    Some(vec![row, col])
}

/// Opponent mix over `theirs` that leaves `player` indifferent across `own`.
///
/// Unknowns are the opponent weights and the common value `v`:
/// `Σ_j u(i, j)·y_j − v = 0` for each `i` in `own`, and `Σ_j y_j = 1`.
fn indifference(tensor: &PayoffTensor, player: usize, own: &[usize], theirs: &[usize]) -> Option<Vec<Probability>> {
    let k = theirs.len();
    let mut system = own
        .iter()
        .map(|&i| {
            let mut row = theirs
                .iter()
                .map(|&j| tensor.utility(player, i, j))
                .collect::<Vec<_>>();
            row.push(-1.0);
            row.push(0.0);
            row
        })
        .collect::<Vec<_>>();
    let mut unit = vec![1.0; k];
    unit.push(0.0);
    unit.push(1.0);
    system.push(unit);
    let solution = gauss(system)?;
    if solution[..k].iter().any(|y| *y < -EPSILON.sqrt()) {
        return None;
    }
    let mut mix = vec![0.0; tensor.strategies(1 - player)];
    for (&j, y) in theirs.iter().zip(solution.iter()) {
        mix[j] = y.max(0.0);
    }
    crate::strategy::normalize(&mix)
}

/// Gaussian elimination with partial pivoting on an augmented square system.
fn gauss(mut m: Vec<Vec<f64>>) -> Option<Vec<f64>> {
    let n = m.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|a, b| m[*a][col].abs().total_cmp(&m[*b][col].abs()))?;
        if m[pivot][col].abs() < 1e-10 {
            return None;
        }
        m.swap(col, pivot);
        for row in 0..n {
            if row != col {
                let factor = m[row][col] / m[col][col];
                for c in col..=n {
                    m[row][c] -= factor * m[col][c];
                }
            }
        }
    }
    let x = (0..n).map(|i| m[i][n] / m[i][i]).collect::<Vec<_>>();
    match x.iter().all(|v| v.is_finite()) {
        true => Some(x),
        false => None,
    }
}

/// Support enumeration over equal-size supports of at least two strategies.
fn enumerate(tensor: &PayoffTensor, epsilon: f64) -> Vec<Profile> {
    if tensor.rows() > SUPPORT_LIMIT || tensor.cols() > SUPPORT_LIMIT {
        return Vec::new();
    }
    let mut found = Vec::new();
    for k in 2..=tensor.rows().min(tensor.cols()) {
        for rows in combinations(tensor.rows(), k) {
            for cols in combinations(tensor.cols(), k) {
                if let Some(profile) = solve(tensor, &rows, &cols) {
                    if regret(tensor, &profile) <= epsilon {
                        found.push(profile);
                    }
                }
            }
        }
    }
    found
}

/// Ascending `k`-subsets of `0..n` in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    match k {
        0 => vec![vec![]],
        k if k > n => vec![],
        k => (k - 1..n)
            .flat_map(|last| {
                combinations(last, k - 1).into_iter().map(move |mut c| {
                    c.push(last);
                    c
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EQUILIBRIUM_TOLERANCE;
    use crate::MIXED_ITERATIONS;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn mixed(tensor: &PayoffTensor) -> Vec<Equilibrium> {
        find_mixed_nash(tensor, MIXED_ITERATIONS, EQUILIBRIUM_TOLERANCE)
    }

    #[test]
    fn matching_pennies_is_half_half() {
        let found = mixed(&PayoffTensor::matching_pennies());
        assert_eq!(found.len(), 1);
        let e = &found[0];
        assert_eq!(e.kind, Kind::Mixed);
        assert!(e.strategies.iter().flatten().all(|x| close(*x, 0.5)));
        assert!(e.payoffs.iter().all(|u| close(*u, 0.0)));
        assert!(close(e.confidence, 1.0));
        assert!(e.stability > 0.5);
    }

    #[test]
    fn rock_paper_scissors_is_uniform() {
        let found = mixed(&PayoffTensor::rock_paper_scissors());
        assert_eq!(found.len(), 1);
        assert!(found[0].strategies.iter().flatten().all(|x| close(*x, 1.0 / 3.0)));
    }

    #[test]
    fn coordination_mixed_point_is_unstable() {
        let found = mixed(&PayoffTensor::coordination());
        assert_eq!(found.len(), 1);
        assert!(close(found[0].strategies[0][0], 3.0 / 8.0));
        assert!(close(found[0].strategies[1][0], 3.0 / 8.0));
        assert!(found[0].stability < 0.5);
    }

    #[test]
    fn hawk_dove_mixes_two_thirds_hawk() {
        let found = mixed(&PayoffTensor::hawk_dove());
        assert_eq!(found.len(), 1);
        assert!(close(found[0].strategies[0][0], 2.0 / 3.0));
        assert!(close(found[0].strategies[1][0], 2.0 / 3.0));
    }

    #[test]
    fn dominance_solvable_games_have_none() {
        assert!(mixed(&PayoffTensor::prisoners_dilemma()).is_empty());
    }

    #[test]
    fn idempotent() {
        let game = PayoffTensor::rock_paper_scissors();
        assert_eq!(mixed(&game), mixed(&game));
    }

    #[test]
    fn subsets() {
        assert_eq!(combinations(3, 2), vec![vec![0, 1], vec![0, 2], vec![1, 2]]);
        assert_eq!(combinations(4, 4).len(), 1);
        assert!(combinations(2, 3).is_empty());
    }

    #[test]
    fn linear_solve() {
        let x = gauss(vec![vec![2.0, 1.0, 5.0], vec![1.0, -1.0, 1.0]]).unwrap();
        assert!(close(x[0], 2.0) && close(x[1], 1.0));
        assert!(gauss(vec![vec![1.0, 1.0, 1.0], vec![2.0, 2.0, 2.0]]).is_none());
    }
}
