use super::*;
use crate::EPSILON;
use crate::PayoffTensor;
use crate::Utility;

/// Every joint pure strategy with no strictly profitable unilateral deviation.
///
/// Results come in row-major order of `(row, col)`.
pub fn find_pure_nash(tensor: &PayoffTensor) -> Vec<Equilibrium> {
    let mut found = Vec::new();
    for row in 0..tensor.rows() {
        for col in 0..tensor.cols() {
            let gains = [gain(tensor, 0, row, col), gain(tensor, 1, col, row)];
            if gains.iter().flatten().any(|g| *g > EPSILON) {
                continue;
            }
            let is_strict = gains.iter().flatten().all(|g| *g < -EPSILON);
            let stability = gains.iter().map(|g| margin(*g)).sum::<f64>() / gains.len() as f64;
            log::debug!("pure equilibrium at ({}, {})", row, col);
            found.push(Equilibrium {
                kind: Kind::Pure,
                strategies: vec![point(tensor.rows(), row), point(tensor.cols(), col)],
                payoffs: tensor.cell(row, col).to_vec(),
                is_strict,
                stability,
                confidence: 1.0,
            });
        }
    }
    found
}

/// Best gain `player` can get by leaving `mine` while the opponent stays on
/// `theirs`. `None` when the player has no alternative.
fn gain(tensor: &PayoffTensor, player: usize, mine: usize, theirs: usize) -> Option<Utility> {
    let here = tensor.utility(player, mine, theirs);
    (0..tensor.strategies(player))
        .filter(|s| *s != mine)
        .map(|s| tensor.utility(player, s, theirs) - here)
        .reduce(Utility::max)
}

/// Maps the deviation loss into `[0, 1)`; lone strategies are fully stable.
fn margin(gain: Option<Utility>) -> f64 {
    match gain {
        None => 1.0,
        Some(g) => {
            let loss = (-g).max(0.0);
            loss / (1.0 + loss)
        }
    }
}
