use crate::convergence::Report;

/// Receives progress at batch boundaries.
///
/// `percent` is non-decreasing over a run and reaches 100 only when the run
/// completes or stops on convergence. `report` is the latest convergence
/// check, if one happened during the batch.
pub trait Observer {
    fn progress(&mut self, percent: f64, report: Option<&Report>);
}

impl<F> Observer for F
where
    F: FnMut(f64, Option<&Report>),
{
    fn progress(&mut self, percent: f64, report: Option<&Report>) {
        self(percent, report)
    }
}

/// Discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Observer for Silent {
    fn progress(&mut self, _: f64, _: Option<&Report>) {}
}
