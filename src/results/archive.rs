use crate::EPSILON;
use crate::Utility;
use crate::rng::RngKind;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate summary of one finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub strategies: usize,
    pub iterations: usize,
    pub generator: RngKind,
    pub expected_payoffs: Vec<Utility>,
}

/// Filter applied to archived sessions before ranking.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Criteria {
    pub strategies: Option<usize>,
    pub min_iterations: Option<usize>,
    pub generator: Option<RngKind>,
}

impl Criteria {
    fn admits(&self, session: &Session) -> bool {
        self.strategies.is_none_or(|n| session.strategies == n)
            && self.min_iterations.is_none_or(|n| session.iterations >= n)
            && self.generator.is_none_or(|g| session.generator == g)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    /// Sessions that passed the criteria.
    pub compared: usize,
    /// Per player, the share of compared sessions with a lower expected payoff, in percent.
    pub percentiles: Vec<f64>,
    /// `(session id, similarity)`, most similar first.
    pub similar: Vec<(String, f64)>,
}

/// In-memory history of sessions keyed by id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Archive {
    sessions: BTreeMap<String, Session>,
}

impl Archive {
    /// Insert or replace a session.
    pub fn store(&mut self, session: Session) {
        log::debug!("archived session {}", session.id);
        self.sessions.insert(session.id.clone(), session);
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.get(id)
    }
    pub fn len(&self) -> usize {
        self.sessions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Rank `payoffs` among archived sessions matching `criteria`.
    pub fn compare(&self, payoffs: &[Utility], criteria: &Criteria) -> Comparison {
        let pool = self
            .sessions
            .values()
            .filter(|s| criteria.admits(s))
            .filter(|s| s.expected_payoffs.len() == payoffs.len())
            .collect::<Vec<_>>();
        if pool.is_empty() {
            return Comparison {
                compared: 0,
                percentiles: Vec::new(),
                similar: Vec::new(),
            };
        }
        let percentiles = payoffs
            .iter()
            .enumerate()
            .map(|(p, &x)| {
                let below = pool.iter().filter(|s| s.expected_payoffs[p] < x).count() as f64;
                let tied = pool.iter().filter(|s| s.expected_payoffs[p] == x).count() as f64;
                100.0 * (below + 0.5 * tied) / pool.len() as f64
            })
            .collect();
        let ranges = (0..payoffs.len())
            .map(|p| {
                let (lo, hi) = pool
                    .iter()
                    .map(|s| s.expected_payoffs[p])
                    .chain(std::iter::once(payoffs[p]))
                    .fold((Utility::INFINITY, Utility::NEG_INFINITY), |(lo, hi), u| {
                        (lo.min(u), hi.max(u))
                    });
                match hi - lo > EPSILON {
                    true => hi - lo,
                    false => 1.0,
                }
            })
            .collect::<Vec<_>>();
        let mut similar = pool
            .iter()
            .map(|s| (s.id.clone(), similarity(payoffs, &s.expected_payoffs, &ranges)))
            .collect::<Vec<_>>();
        similar.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Comparison {
            compared: pool.len(),
            percentiles,
            similar,
        }
    }
}

/// `1 / (1 + d)` for the range-normalized Euclidean distance `d`.
pub fn similarity(a: &[Utility], b: &[Utility], ranges: &[Utility]) -> f64 {
    let n = a.len().max(1) as f64;
    let d = a
        .iter()
        .zip(b)
        .zip(ranges)
        .map(|((x, y), r)| ((x - y) / r).powi(2))
        .sum::<f64>()
        / n;
    1.0 / (1.0 + d.sqrt())
}
