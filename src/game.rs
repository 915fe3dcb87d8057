//! Two-player payoff tensor.
use crate::Error;
use crate::Utility;
use serde::Deserialize;
use serde::Serialize;

/// `cells[row][col][player]`: payoff to `player` when player 0 plays `row`
/// and player 1 plays `col`.
///
/// Only the two-player layout is supported. Every component indexes the
/// tensor as `[s0][s1][player]`; n-player lookup is out of scope.
/// The tensor is rectangular so that games reduced by dominance
/// elimination remain representable. Simulation additionally requires it
/// to be square, because both players share one list of strategy names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Vec<Utility>>>", into = "Vec<Vec<Vec<Utility>>>")]
pub struct PayoffTensor {
    cells: Vec<Vec<Vec<Utility>>>,
}

impl PayoffTensor {
    /// Number of players every cell carries.
    pub const PLAYERS: usize = 2;

    pub fn new(cells: Vec<Vec<Vec<Utility>>>) -> crate::Result<Self> {
        if cells.is_empty() || cells[0].is_empty() {
            return Err(Error::config("payoff tensor is empty"));
        }
        let width = cells[0].len();
        for (r, row) in cells.iter().enumerate() {
            if row.len() != width {
                return Err(Error::config(format!(
                    "payoff tensor row {} has {} columns, expected {}",
                    r,
                    row.len(),
                    width
                )));
            }
            for (c, cell) in row.iter().enumerate() {
                if cell.len() != Self::PLAYERS {
                    return Err(Error::config(format!(
                        "payoff cell [{}][{}] has {} entries, expected {}",
                        r,
                        c,
                        cell.len(),
                        Self::PLAYERS
                    )));
                }
                if cell.iter().any(|u| !u.is_finite()) {
                    return Err(Error::config(format!(
                        "payoff cell [{}][{}] is not finite",
                        r, c
                    )));
                }
            }
        }
        Ok(Self { cells })
    }

    /// Strategy count for player 0.
    pub fn rows(&self) -> usize {
        self.cells.len()
    }
    /// Strategy count for player 1.
    pub fn cols(&self) -> usize {
        self.cells[0].len()
    }
    /// Strategy count for `player`.
    pub fn strategies(&self, player: usize) -> usize {
        match player {
            0 => self.rows(),
            _ => self.cols(),
        }
    }
    pub fn players(&self) -> usize {
        Self::PLAYERS
    }
    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }
    pub fn cells(&self) -> &Vec<Vec<Vec<Utility>>> {
        &self.cells
    }

    /// Payoff vector at a joint strategy.
    pub fn cell(&self, row: usize, col: usize) -> &[Utility] {
        &self.cells[row][col]
    }
    /// Payoff to one player at a joint strategy.
    pub fn payoff(&self, row: usize, col: usize, player: usize) -> Utility {
        self.cells[row][col][player]
    }
    /// Payoff to `player` when it plays `mine` and the opponent plays `theirs`.
    pub fn utility(&self, player: usize, mine: usize, theirs: usize) -> Utility {
        match player {
            0 => self.payoff(mine, theirs, 0),
            _ => self.payoff(theirs, mine, 1),
        }
    }

    /// Smallest and largest payoff anywhere in the tensor.
    pub fn bounds(&self) -> (Utility, Utility) {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .fold((Utility::INFINITY, Utility::NEG_INFINITY), |(lo, hi), &u| {
                (lo.min(u), hi.max(u))
            })
    }
    /// Payoff range, floored at one so it can scale tolerances.
    pub fn scale(&self) -> Utility {
        let (lo, hi) = self.bounds();
        (hi - lo).max(1.0)
    }

    /// Sub-tensor over the surviving strategies of each player.
    pub fn restrict(&self, rows: &[usize], cols: &[usize]) -> crate::Result<Self> {
        Self::new(
            rows.iter()
                .map(|&r| cols.iter().map(|&c| self.cells[r][c].clone()).collect())
                .collect(),
        )
    }
}

impl TryFrom<Vec<Vec<Vec<Utility>>>> for PayoffTensor {
    type Error = Error;
    fn try_from(cells: Vec<Vec<Vec<Utility>>>) -> Result<Self, Self::Error> {
        Self::new(cells)
    }
}

impl From<PayoffTensor> for Vec<Vec<Vec<Utility>>> {
    fn from(tensor: PayoffTensor) -> Self {
        tensor.cells
    }
}

impl crate::Arbitrary for PayoffTensor {
    fn random() -> Self {
        use rand::Rng;
        let ref mut rng = rand::rng();
        let n = rng.random_range(2..=4);
        Self {
            cells: (0..n)
                .map(|_| {
                    (0..n)
                        .map(|_| (0..Self::PLAYERS).map(|_| rng.random_range(-5..=5) as Utility).collect())
                        .collect()
                })
                .collect(),
        }
    }
}

/// Canonical games used across tests and benchmarks.
impl PayoffTensor {
    pub fn prisoners_dilemma() -> Self {
        Self {
            cells: vec![
                vec![vec![3., 3.], vec![0., 5.]],
                vec![vec![5., 0.], vec![1., 1.]],
            ],
        }
    }
    pub fn coordination() -> Self {
        Self {
            cells: vec![
                vec![vec![5., 5.], vec![0., 0.]],
                vec![vec![0., 0.], vec![3., 3.]],
            ],
        }
    }
    pub fn matching_pennies() -> Self {
        Self {
            cells: vec![
                vec![vec![1., -1.], vec![-1., 1.]],
                vec![vec![-1., 1.], vec![1., -1.]],
            ],
        }
    }
    pub fn hawk_dove() -> Self {
        Self {
            cells: vec![
                vec![vec![-1., -1.], vec![4., 0.]],
                vec![vec![0., 4.], vec![2., 2.]],
            ],
        }
    }
    pub fn rock_paper_scissors() -> Self {
        Self {
            cells: vec![
                vec![vec![0., 0.], vec![-1., 1.], vec![1., -1.]],
                vec![vec![1., -1.], vec![0., 0.], vec![-1., 1.]],
                vec![vec![-1., 1.], vec![1., -1.], vec![0., 0.]],
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        assert!(PayoffTensor::new(vec![]).is_err());
        assert!(PayoffTensor::new(vec![vec![]]).is_err());
    }

    #[test]
    fn rejects_ragged() {
        let cells = vec![
            vec![vec![1., 1.], vec![0., 0.]],
            vec![vec![1., 1.]],
        ];
        assert!(matches!(PayoffTensor::new(cells), Err(Error::Configuration(_))));
    }

    #[test]
    fn rejects_wrong_player_count() {
        let cells = vec![vec![vec![1., 1., 1.]]];
        assert!(PayoffTensor::new(cells).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        let cells = vec![vec![vec![Utility::NAN, 1.]]];
        assert!(PayoffTensor::new(cells).is_err());
    }

    #[test]
    fn utility_is_player_relative() {
        let pd = PayoffTensor::prisoners_dilemma();
        assert_eq!(pd.utility(0, 1, 0), 5.);
        assert_eq!(pd.utility(1, 1, 0), 5.);
        assert_eq!(pd.utility(1, 0, 1), 0.);
    }

    #[test]
    fn restriction() {
        let rps = PayoffTensor::rock_paper_scissors();
        let sub = rps.restrict(&[0, 2], &[1]).unwrap();
        assert_eq!(sub.rows(), 2);
        assert_eq!(sub.cols(), 1);
        assert_eq!(sub.cell(1, 0), &[1., -1.]);
    }

    #[test]
    fn deserializes_with_validation() {
        let ok = serde_json::from_str::<PayoffTensor>("[[[3,3],[0,5]],[[5,0],[1,1]]]").unwrap();
        assert_eq!(ok, PayoffTensor::prisoners_dilemma());
        assert!(serde_json::from_str::<PayoffTensor>("[[[3,3],[0]]]").is_err());
    }
}
