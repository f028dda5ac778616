//! Timing and comparing counting strategies over the same data.
//!
//! [`measure`] runs one counter and records how long the call took.
//! [`compare`] runs several strategies over the same sequence and predicate,
//! which is the quickest way to see what the shared lock costs:
//!
//! ```rust
//! use ripartitori::counters::{Strategy, Workers};
//! use ripartitori::predicates::DivisibleBy;
//! use ripartitori::report::compare;
//!
//! let data: Vec<i64> = (0..100_000).collect();
//! let comparison = compare(
//!     &data,
//!     Workers::new(4).unwrap(),
//!     DivisibleBy::new(20i64).unwrap(),
//!     &Strategy::ALL,
//! )
//! .unwrap();
//!
//! assert!(comparison.agree());
//! assert_eq!(comparison.matches(), Some(5_000));
//! for report in comparison.reports() {
//!     println!("{}", report);
//! }
//! ```

use std::fmt::{self, Display};
use std::time::{Duration, Instant};

use tracing::info;

use crate::counters::{build, CountMatching, Strategy, Workers};
use crate::error::Result;
use crate::predicates::Predicate;

/// The outcome of one timed `count()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountReport {
    /// The strategy that produced the result.
    pub strategy: Strategy,
    /// Number of workers used.
    pub workers: usize,
    /// Number of matching elements.
    pub matches: usize,
    /// Wall-clock time of the `count()` call.
    pub elapsed: Duration,
}

impl Display for CountReport {
    /// Formats the report as `strategy(workers): matches in elapsed`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}): {} in {:.3?}",
            self.strategy, self.workers, self.matches, self.elapsed
        )
    }
}

/// Whole microseconds in `elapsed`, saturating at `u64::MAX`.
pub(crate) fn micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

/// Runs `counter` once and records its result and duration.
pub fn measure(counter: &dyn CountMatching) -> Result<CountReport> {
    let start = Instant::now();
    let matches = counter.count()?;
    let elapsed = start.elapsed();

    let report = CountReport {
        strategy: counter.strategy(),
        workers: counter.workers(),
        matches,
        elapsed,
    };
    info!(
        strategy = %report.strategy,
        workers = report.workers,
        matches,
        elapsed_us = micros(elapsed),
        "count finished"
    );
    Ok(report)
}

/// Reports for several strategies run over the same data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    reports: Vec<CountReport>,
}

impl Comparison {
    /// Wraps already collected reports.
    pub fn new(reports: Vec<CountReport>) -> Self {
        Self { reports }
    }

    /// Returns the reports, in the order the strategies were run.
    pub fn reports(&self) -> &[CountReport] {
        &self.reports
    }

    /// Returns `true` if every strategy found the same number of matches.
    ///
    /// An empty comparison trivially agrees.
    pub fn agree(&self) -> bool {
        self.reports
            .windows(2)
            .all(|pair| pair[0].matches == pair[1].matches)
    }

    /// Returns the common match count, or `None` if the reports are empty or
    /// disagree.
    pub fn matches(&self) -> Option<usize> {
        match self.reports.first() {
            Some(first) if self.agree() => Some(first.matches),
            _ => None,
        }
    }

    /// Returns the fastest report.
    pub fn fastest(&self) -> Option<&CountReport> {
        self.reports.iter().min_by_key(|report| report.elapsed)
    }
}

/// Runs each of `strategies` over `data` and collects their reports.
///
/// Stops at the first failing strategy.
pub fn compare<'a, T, P>(
    data: &'a [T],
    workers: Workers,
    predicate: P,
    strategies: &[Strategy],
) -> Result<Comparison>
where
    T: Sync + 'a,
    P: Predicate<T> + Clone + 'a,
{
    let mut reports = Vec::with_capacity(strategies.len());
    for &strategy in strategies {
        let counter = build(strategy, data, workers, predicate.clone());
        reports.push(measure(counter.as_ref())?);
    }
    Ok(Comparison::new(reports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::locked::LockedCounter;
    use crate::error::CountError;
    use crate::predicates::DivisibleBy;

    fn report(strategy: Strategy, matches: usize, millis: u64) -> CountReport {
        CountReport {
            strategy,
            workers: 2,
            matches,
            elapsed: Duration::from_millis(millis),
        }
    }

    #[test]
    fn test_measure() {
        let data: Vec<i64> = (0..20).collect();
        let counter = LockedCounter::new(&data, 4, DivisibleBy::new(20i64).unwrap()).unwrap();
        let report = measure(&counter).unwrap();
        assert_eq!(report.strategy, Strategy::Locked);
        assert_eq!(report.workers, 4);
        assert_eq!(report.matches, 1);
    }

    #[test]
    fn test_measure_propagates_failure() {
        let data = [1, 2, 3];
        let counter = LockedCounter::new(&data, 2, |_: &i32| -> bool { panic!("nope") }).unwrap();
        assert!(matches!(
            measure(&counter),
            Err(CountError::WorkerPanicked { .. })
        ));
    }

    #[test]
    fn test_compare_all() {
        let data: Vec<i64> = (0..1_000_000).collect();
        let comparison = compare(
            &data,
            Workers::new(7).unwrap(),
            DivisibleBy::new(2_000i64).unwrap(),
            &Strategy::ALL,
        )
        .unwrap();

        let strategies: Vec<Strategy> = comparison.reports().iter().map(|r| r.strategy).collect();
        assert_eq!(strategies, Strategy::ALL.to_vec());
        assert!(comparison.agree());
        assert_eq!(comparison.matches(), Some(500));
        assert!(comparison.fastest().is_some());
    }

    #[test]
    fn test_compare_subset() {
        let data: Vec<u32> = (0..100).collect();
        let comparison = compare(
            &data,
            Workers::new(3).unwrap(),
            |x: &u32| *x >= 90,
            &[Strategy::Partitioned],
        )
        .unwrap();
        assert_eq!(comparison.reports().len(), 1);
        assert_eq!(comparison.matches(), Some(10));
    }

    #[test]
    fn test_disagreement() {
        let comparison = Comparison::new(vec![
            report(Strategy::Sequential, 10, 5),
            report(Strategy::Locked, 9, 3),
        ]);
        assert!(!comparison.agree());
        assert_eq!(comparison.matches(), None);
        assert_eq!(comparison.fastest().map(|r| r.strategy), Some(Strategy::Locked));
    }

    #[test]
    fn test_empty_comparison() {
        let comparison = Comparison::default();
        assert!(comparison.agree());
        assert_eq!(comparison.matches(), None);
        assert!(comparison.fastest().is_none());
    }

    #[test]
    fn test_micros_saturates() {
        assert_eq!(micros(Duration::from_millis(2)), 2_000);
        assert_eq!(micros(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_display() {
        let r = report(Strategy::Partitioned, 500, 2);
        assert_eq!(r.to_string(), "partitioned(2): 500 in 2.000ms");
    }
}
