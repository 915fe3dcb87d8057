use super::*;
use crate::CONVERGENCE_HISTORY;
use crate::CONVERGENCE_MAX_WINDOW;
use crate::CONVERGENCE_VARIANCE_TOLERANCE;
use crate::EXTEND_CONFIDENCE;
use crate::STOP_CONFIDENCE;
use crate::Utility;
use crate::stats;
use serde::Deserialize;
use serde::Serialize;
use std::collections::VecDeque;

/// Multi-window convergence detector fed one payoff vector per iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analyzer {
    options: ConvergenceOptions,
    window: usize,
    short: Window,
    main: Window,
    long: Window,
    checks: usize,
    converged_at: Option<usize>,
    trajectory: VecDeque<(usize, f64)>,
    last: Option<Report>,
}

impl Analyzer {
    pub fn new(options: ConvergenceOptions) -> Self {
        let window = options.window;
        Self {
            short: Window::new(window / 2),
            main: Window::new(window),
            long: Window::new(window * 2),
            window,
            options,
            checks: 0,
            converged_at: None,
            trajectory: VecDeque::with_capacity(CONVERGENCE_HISTORY),
            last: None,
        }
    }

    pub fn options(&self) -> &ConvergenceOptions {
        &self.options
    }
    /// Current main window capacity.
    pub fn window(&self) -> usize {
        self.window
    }

    pub fn push(&mut self, payoffs: &[Utility]) {
        self.short.push(payoffs);
        self.main.push(payoffs);
        self.long.push(payoffs);
    }

    /// Whether `iteration` falls on the polling schedule.
    pub fn is_due(&self, iteration: usize) -> bool {
        iteration > 0 && iteration % self.options.check_interval == 0
    }

    pub fn check(&mut self, iteration: usize) -> Report {
        let mut report = match iteration >= self.options.min_iterations && self.main.is_full() {
            true => self.evaluate(iteration),
            false => Report::pending(iteration),
        };
        if let Some(max) = self.options.max_iterations {
            if iteration >= max {
                report.action = Action::Stop;
                report.reason = Some(format!("maximum of {} iterations reached", max));
            }
        }
        self.checks += 1;
        if report.converged && self.converged_at.is_none() {
            self.converged_at = Some(iteration);
        }
        if self.trajectory.len() == CONVERGENCE_HISTORY {
            self.trajectory.pop_front();
        }
        self.trajectory.push_back((iteration, report.confidence));
        self.last = Some(report.clone());
        log::debug!(
            "convergence check at {}: confidence {:.3}, {:?}",
            iteration,
            report.confidence,
            report.action
        );
        report
    }

    /// Double every window, bounded by the maximum. False if already there.
    pub fn extend(&mut self) -> bool {
        let window = (self.window * 2).min(CONVERGENCE_MAX_WINDOW.max(self.options.window));
        if window == self.window {
            return false;
        }
        self.window = window;
        self.short.resize(window / 2);
        self.main.resize(window);
        self.long.resize(window * 2);
        log::debug!("convergence window extended to {}", window);
        true
    }

    pub fn analysis(&self) -> ConvergenceAnalysis {
        ConvergenceAnalysis {
            converged: self.converged_at.is_some(),
            convergence_iteration: self.converged_at,
            final_confidence: self.last.as_ref().map_or(0.0, |r| r.confidence),
            checks: self.checks,
            window: self.window,
            trajectory: self.trajectory.iter().copied().collect(),
            last: self.last.clone(),
        }
    }

    fn evaluate(&self, iteration: usize) -> Report {
        let players = self.main.players();
        let mut stable = 0;
        let mut variance_stable = 0;
        let mut trend_stable = 0;
        let mut summaries = Vec::with_capacity(players);
        let mut batteries = Vec::with_capacity(players);
        for p in 0..players {
            let ref short = self.short.column(p);
            let ref main = self.main.column(p);
            let ref long = self.long.column(p);
            let center = stats::mean(main);
            let band = self.options.tolerance * center.abs().max(1.0);
            if (stats::mean(short) - center).abs() <= band {
                stable += 1;
            }
            if Self::similar_spread(stats::variance(main), stats::variance(long)) {
                variance_stable += 1;
            }
            if stats::slope(main).abs() * main.len() as f64 <= band {
                trend_stable += 1;
            }
            summaries.push(Summary::from((main.as_slice(), self.options.confidence)));
            batteries.push(Battery::run(long));
        }
        let players = players.max(1) as f64;
        let passed = batteries.iter().map(Battery::passed).sum::<usize>() as f64;
        let confidence = 0.4 * passed / (4.0 * players)
            + 0.3 * stable as f64 / players
            + 0.2 * variance_stable as f64 / players
            + 0.1 * trend_stable as f64 / players;
        let stable = stable as f64 == players;
        let variance_stable = variance_stable as f64 == players;
        let trend_stable = trend_stable as f64 == players;
        let converged = stable && variance_stable && trend_stable && batteries.iter().all(Battery::all);
        let (action, reason) = if converged && confidence > STOP_CONFIDENCE {
            (
                Action::Stop,
                Some(format!(
                    "converged at iteration {} with confidence {:.3}",
                    iteration, confidence
                )),
            )
        } else if confidence > EXTEND_CONFIDENCE
            && iteration > 2 * self.options.min_iterations
            && self.window < CONVERGENCE_MAX_WINDOW
        {
            (Action::ExtendWindow, None)
        } else {
            (Action::Continue, None)
        };
        Report {
            iteration,
            converged,
            confidence,
            stable,
            variance_stable,
            trend_stable,
            players: summaries,
            tests: batteries,
            action,
            reason,
        }
    }

    fn similar_spread(main: f64, long: f64) -> bool {
        match (main > f64::EPSILON, long > f64::EPSILON) {
            (false, false) => true,
            (_, false) => false,
            _ => (main / long - 1.0).abs() <= CONVERGENCE_VARIANCE_TOLERANCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(window: usize, min_iterations: usize) -> ConvergenceOptions {
        ConvergenceOptions {
            window,
            min_iterations,
            check_interval: 50,
            ..ConvergenceOptions::default()
        }
    }

    #[test]
    fn pending_until_window_full() {
        let mut analyzer = Analyzer::new(options(100, 50));
        for _ in 0..60 {
            analyzer.push(&[1.0, 1.0]);
        }
        let report = analyzer.check(60);
        assert!(!report.converged);
        assert_eq!(report.action, Action::Continue);
        assert!(report.players.is_empty());
    }

    #[test]
    fn constant_payoffs_converge() {
        let mut analyzer = Analyzer::new(options(100, 100));
        for _ in 0..200 {
            analyzer.push(&[3.0, 1.0]);
        }
        let report = analyzer.check(200);
        assert!(report.converged);
        assert_eq!(report.action, Action::Stop);
        assert!((report.confidence - 1.0).abs() < 1e-12);
        assert!(report.reason.is_some());
        assert_eq!(analyzer.analysis().convergence_iteration, Some(200));
    }

    #[test]
    fn drifting_payoffs_do_not_converge() {
        let mut analyzer = Analyzer::new(options(100, 100));
        for i in 0..400 {
            analyzer.push(&[i as Utility * 0.1, 0.0]);
        }
        let report = analyzer.check(400);
        assert!(!report.converged);
        assert!(!report.trend_stable);
        assert_ne!(report.action, Action::Stop);
    }

    #[test]
    fn moderate_confidence_extends_window() {
        let mut analyzer = Analyzer::new(options(100, 100));
        for i in 0..1_000 {
            analyzer.push(&[(i % 2) as Utility]);
        }
        let report = analyzer.check(1_000);
        assert!(!report.converged);
        assert!(report.stable && report.variance_stable && report.trend_stable);
        assert_eq!(report.action, Action::ExtendWindow);
        assert!(analyzer.extend());
        assert_eq!(analyzer.window(), 200);
        assert!(!analyzer.check(1_000).stable);
    }

    #[test]
    fn extension_is_capped() {
        let mut analyzer = Analyzer::new(options(CONVERGENCE_MAX_WINDOW / 2, 10));
        assert!(analyzer.extend());
        assert!(!analyzer.extend());
        assert_eq!(analyzer.window(), CONVERGENCE_MAX_WINDOW);
    }

    #[test]
    fn max_iterations_forces_stop() {
        let mut analyzer = Analyzer::new(ConvergenceOptions {
            max_iterations: Some(10),
            ..options(100, 100)
        });
        analyzer.push(&[0.0, 0.0]);
        let report = analyzer.check(10);
        assert_eq!(report.action, Action::Stop);
        assert!(!report.converged);
    }

    #[test]
    fn survives_serialization() {
        let mut analyzer = Analyzer::new(options(10, 10));
        for i in 0..25 {
            analyzer.push(&[i as Utility, 1.0]);
        }
        analyzer.check(25);
        let json = serde_json::to_string(&analyzer).unwrap();
        let back = serde_json::from_str::<Analyzer>(&json).unwrap();
        assert_eq!(back.window(), 10);
        assert_eq!(back.long.column(0), analyzer.long.column(0));
        assert_eq!(back.short.column(1), analyzer.short.column(1));
        assert_eq!(back.analysis().checks, 1);
    }
}
