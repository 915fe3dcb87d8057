use super::*;
use rayon::prelude::*;

/// Disjoint iteration ranges, one per worker, in worker order.
pub fn partition(iterations: usize, workers: usize) -> Vec<usize> {
    let workers = workers.clamp(1, iterations.max(1));
    let base = iterations / workers;
    let extra = iterations % workers;
    (0..workers).map(|w| base + (w < extra) as usize).collect()
}

/// Run `config` across independent workers, each with a private stream.
///
/// Every round advances each unfinished worker by one batch in parallel,
/// then reports combined progress and polls `interrupt` on the calling
/// thread. Tallies merge in worker order. Interrupted parallel runs return
/// partial results but leave no resumable snapshot.
pub fn parallel<O: Observer>(
    config: &SimulationConfig,
    interrupt: &Interrupt,
    observer: &mut O,
) -> crate::Result<(SimulationResult, bool)> {
    config.validate()?;
    let mut runs = partition(config.iterations, config.workers)
        .into_iter()
        .enumerate()
        .map(|(worker, target)| Run::worker(config, worker, target))
        .collect::<crate::Result<Vec<_>>>()?;
    log::info!(
        "simulating {} iterations across {} workers",
        config.iterations,
        runs.len()
    );
    let total = config.iterations as f64;
    let mut interrupted = false;
    loop {
        if interrupt.is_set() {
            log::warn!("parallel simulation interrupted");
            interrupted = true;
            break;
        }
        runs.par_iter_mut()
            .filter(|run| !run.is_done())
            .for_each(|run| {
                run.batch();
            });
        let done = runs.iter().map(Run::iteration).sum::<usize>();
        if runs.iter().all(Run::is_done) {
            observer.progress(100.0, None);
            break;
        }
        observer.progress(done as f64 / total * 100.0, None);
    }
    let mut runs = runs.into_iter();
    let mut merged = runs
        .next()
        .ok_or_else(|| crate::Error::config("no workers to run"))?;
    for run in runs {
        merged.absorb(run);
    }
    Ok((merged.finish(interrupted), interrupted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PayoffTensor;
    use crate::strategy::PlayerRule;

    fn config(workers: usize) -> SimulationConfig {
        SimulationConfig {
            workers,
            batch_size: 500,
            seed: 42,
            ..SimulationConfig::new(
                PayoffTensor::matching_pennies(),
                vec![PlayerRule::Mixed { probabilities: None }; 2],
                10_001,
            )
        }
    }

    #[test]
    fn partitions_cover_iterations() {
        assert_eq!(partition(10, 3), vec![4, 3, 3]);
        assert_eq!(partition(2, 5), vec![1, 1]);
        assert_eq!(partition(7, 1), vec![7]);
    }

    #[test]
    fn parallel_is_deterministic() {
        let (a, _) = parallel(&config(4), &Interrupt::default(), &mut Silent).unwrap();
        let (b, _) = parallel(&config(4), &Interrupt::default(), &mut Silent).unwrap();
        assert_eq!(a.actual_iterations, 10_001);
        assert_eq!(a.outcomes, b.outcomes);
        assert_eq!(a.statistics.mean, b.statistics.mean);
        assert_eq!(a.outcomes.values().sum::<usize>(), 10_001);
    }

    #[test]
    fn single_worker_matches_sequential() {
        let (parallel, _) = parallel(&config(1), &Interrupt::default(), &mut Silent).unwrap();
        let mut run = Run::new(config(1)).unwrap();
        while !run.is_done() {
            run.batch();
        }
        let sequential = run.finish(false);
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn progress_reaches_completion() {
        let mut seen = Vec::new();
        let mut observer = |percent: f64, _: Option<&crate::convergence::Report>| seen.push(percent);
        parallel(&config(3), &Interrupt::default(), &mut observer).unwrap();
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.last(), Some(&100.0));
    }

    #[test]
    fn interrupt_stops_all_workers() {
        let interrupt = Interrupt::default();
        let flag = interrupt.clone();
        let mut observer = |_: f64, _: Option<&crate::convergence::Report>| flag.interrupt();
        let (result, interrupted) = parallel(&config(2), &interrupt, &mut observer).unwrap();
        assert!(interrupted);
        assert!(result.early_stop);
        assert_eq!(result.actual_iterations, 1_000);
        assert!(!result.statistics.is_empty());
    }
}
