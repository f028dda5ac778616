//! Core module containing the counter implementations and their shared
//! infrastructure.
//!
//! Every counter answers the same question: how many elements of a borrowed
//! sequence satisfy a [`Predicate`]? They differ only in how the work is
//! split and how the matches are accumulated.
//!
//! # Architecture
//!
//! ```text
//!   Sequential                Locked                      Partitioned
//!   ──────────                ──────                      ───────────
//!   one pass,            W workers, one bucket each   W workers, one bucket each
//!   one local total              │                            │
//!                                ▼                            ▼
//!                     ┌────────────────────┐       ┌────┐┌────┐     ┌────┐
//!                     │ Mutex<usize>       │       │ s0 ││ s1 │ ... │sW-1│  (CachePadded)
//!                     │ lock per match     │       └────┘└────┘     └────┘
//!                     └────────────────────┘            join, then sum
//! ```
//!
//! Both parallel counters go through the same lifecycle on every call to
//! [`CountMatching::count`]:
//!
//! 1. **Idle**: constructed, partition fixed, no threads running
//! 2. **Running**: non-empty buckets dealt onto at most one scoped thread
//!    per logical CPU
//! 3. **Joined**: every worker has finished (or failed) and been joined
//! 4. **Done**: the total is returned
//!
//! A fresh accumulator is allocated per call, so a counter can be asked
//! again and returns the same value.
//!
//! # Worker Failure
//!
//! If a predicate panics inside a worker, the remaining workers still run to
//! completion and are joined before [`CountError::WorkerPanicked`] is
//! returned. If the operating system refuses to start a thread, dispatch
//! stops, the threads already running are joined, and
//! [`CountError::Spawn`] is returned. Partial totals are never reported.

pub mod locked;
pub mod partitioned;
pub mod sequential;

use std::fmt::{self, Debug, Display};
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;

use crossbeam_utils::thread;
use tracing::{debug, trace, warn};

use crate::error::{CountError, Result};
use crate::predicates::Predicate;

use locked::LockedCounter;
use partitioned::PartitionedCounter;
use sequential::SequentialCounter;

/// A validated, non-zero number of workers.
///
/// # Examples
///
/// ```rust
/// use ripartitori::counters::Workers;
///
/// let workers = Workers::new(7).unwrap();
/// assert_eq!(workers.get(), 7);
/// assert!(Workers::new(0).is_err());
/// assert!(Workers::available().get() >= 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Workers(NonZeroUsize);

impl Workers {
    /// A single worker.
    pub const ONE: Workers = Workers(NonZeroUsize::MIN);

    /// Validates a worker count, rejecting zero.
    pub fn new(count: usize) -> Result<Self> {
        NonZeroUsize::new(count)
            .map(Workers)
            .ok_or(CountError::InvalidWorkerCount(count))
    }

    /// One worker per logical CPU.
    pub fn available() -> Self {
        NonZeroUsize::new(num_cpus::get()).map_or(Self::ONE, Workers)
    }

    /// Returns the worker count.
    #[inline]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for Workers {
    /// Defaults to [`Workers::available`].
    fn default() -> Self {
        Self::available()
    }
}

impl TryFrom<usize> for Workers {
    type Error = CountError;

    fn try_from(count: usize) -> Result<Self> {
        Self::new(count)
    }
}

impl From<NonZeroUsize> for Workers {
    fn from(count: NonZeroUsize) -> Self {
        Workers(count)
    }
}

impl Display for Workers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The available counting strategies.
///
/// # Examples
///
/// ```rust
/// use ripartitori::counters::Strategy;
///
/// let s: Strategy = "partitioned".parse().unwrap();
/// assert_eq!(s, Strategy::Partitioned);
/// assert_eq!(s.to_string(), "partitioned");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strategy {
    /// Single pass on the calling thread.
    Sequential,
    /// Worker pool sharing one mutex-protected accumulator.
    Locked,
    /// Worker pool with one private accumulator per worker, summed after the join.
    Partitioned,
}

impl Strategy {
    /// All strategies, in the order they are usually compared.
    pub const ALL: [Strategy; 3] = [
        Strategy::Sequential,
        Strategy::Locked,
        Strategy::Partitioned,
    ];

    /// Returns the lowercase name of the strategy.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::Locked => "locked",
            Strategy::Partitioned => "partitioned",
        }
    }
}

impl Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = CountError;

    fn from_str(s: &str) -> Result<Self> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CountError::UnknownStrategy(s.to_string()))
    }
}

/// The common call contract of every counter.
///
/// # Examples
///
/// ```rust
/// use ripartitori::counters::{CountMatching, Strategy, Workers};
/// use ripartitori::counters::partitioned::PartitionedCounter;
///
/// let data: Vec<u32> = (0..20).collect();
/// let counter = PartitionedCounter::new(&data, 4, |x: &u32| x % 20 == 0).unwrap();
///
/// let counter: &dyn CountMatching = &counter;
/// assert_eq!(counter.strategy(), Strategy::Partitioned);
/// assert_eq!(counter.count().unwrap(), 1);
/// assert_eq!(counter.to_string(), "partitioned(4)");
/// ```
pub trait CountMatching: Debug {
    /// Returns the strategy this counter implements.
    fn strategy(&self) -> Strategy;

    /// Returns the number of workers used by [`count`](Self::count).
    fn workers(&self) -> usize;

    /// Counts the elements that satisfy the predicate.
    fn count(&self) -> Result<usize>;
}

impl Display for dyn CountMatching + '_ {
    /// Formats the counter as `strategy(workers)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.strategy(), self.workers())
    }
}

/// Builds a boxed counter for the given strategy.
///
/// The sequential strategy ignores `workers`.
///
/// # Examples
///
/// ```rust
/// use ripartitori::counters::{build, Strategy, Workers};
/// use ripartitori::predicates::DivisibleBy;
///
/// let data: Vec<i64> = (0..1_000).collect();
/// let every_200 = DivisibleBy::new(200i64).unwrap();
///
/// for strategy in Strategy::ALL {
///     let counter = build(strategy, &data, Workers::new(3).unwrap(), every_200);
///     assert_eq!(counter.count().unwrap(), 5);
/// }
/// ```
pub fn build<'a, T, P>(
    strategy: Strategy,
    data: &'a [T],
    workers: Workers,
    predicate: P,
) -> Box<dyn CountMatching + 'a>
where
    T: Sync + 'a,
    P: Predicate<T> + 'a,
{
    match strategy {
        Strategy::Sequential => Box::new(SequentialCounter::new(data, predicate)),
        Strategy::Locked => Box::new(LockedCounter::with_workers(data, workers, predicate)),
        Strategy::Partitioned => {
            Box::new(PartitionedCounter::with_workers(data, workers, predicate))
        }
    }
}

/// Runs `work` once per task on a bounded set of scoped threads and joins
/// every thread.
///
/// Each task carries the index of the worker (bucket) it belongs to. Tasks
/// are dealt round-robin onto at most [`Workers::available`] threads, so
/// thread `k` runs tasks `k, k + T, k + 2T, ...`. A panicking task does not
/// stop the others on its thread.
///
/// Results come back in task order. If any task panics, every thread is still
/// joined and the first failure (in task order) is returned.
pub(crate) fn run_workers<I, X, R, F>(strategy: Strategy, tasks: I, work: F) -> Result<Vec<R>>
where
    I: IntoIterator<Item = (usize, X)>,
    X: Send,
    R: Send,
    F: Fn(X) -> R + Sync,
{
    dispatch(strategy, tasks, work, None)
}

/// Position in task order, worker index, and what the task returned.
type Outcome<R> = (usize, usize, std::thread::Result<R>);

fn dispatch<I, X, R, F>(
    strategy: Strategy,
    tasks: I,
    work: F,
    stack_size: Option<usize>,
) -> Result<Vec<R>>
where
    I: IntoIterator<Item = (usize, X)>,
    X: Send,
    R: Send,
    F: Fn(X) -> R + Sync,
{
    let tasks: Vec<(usize, X)> = tasks.into_iter().collect();
    let len = tasks.len();
    let threads = len.min(Workers::available().get());
    if threads == 0 {
        return Ok(Vec::new());
    }

    let mut lanes: Vec<Vec<(usize, usize, X)>> = (0..threads).map(|_| Vec::new()).collect();
    for (position, (worker, task)) in tasks.into_iter().enumerate() {
        lanes[position % threads].push((position, worker, task));
    }

    let work = &work;

    let joined = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(threads);
        let mut spawn_error = None;

        for (lane, tasks) in lanes.into_iter().enumerate() {
            let mut builder = scope.builder().name(format!("{strategy}-{lane}"));
            if let Some(size) = stack_size {
                builder = builder.stack_size(size);
            }
            match builder.spawn(move |_| run_lane(tasks, work)) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    warn!(%strategy, lane, error = %err, "failed to spawn worker thread");
                    spawn_error = Some(err);
                    break;
                }
            }
        }

        debug!(%strategy, tasks = len, threads = handles.len(), "workers dispatched");

        let mut outcomes: Vec<Outcome<R>> = Vec::with_capacity(len);
        let mut failure: Option<(usize, CountError)> = None;

        for (lane, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(lane_outcomes) => outcomes.extend(lane_outcomes),
                Err(payload) => {
                    // The first task of lane `k` is at position `k`.
                    let err = CountError::worker_panicked(lane, payload);
                    warn!(%strategy, lane, error = %err, "worker thread failed");
                    if failure.as_ref().is_none_or(|(first, _)| lane < *first) {
                        failure = Some((lane, err));
                    }
                }
            }
        }

        debug!(%strategy, "barrier passed");

        if let Some(err) = spawn_error {
            return Err(CountError::Spawn(err));
        }

        outcomes.sort_unstable_by_key(|&(position, _, _)| position);

        let mut results = Vec::with_capacity(outcomes.len());
        for (position, worker, outcome) in outcomes {
            match outcome {
                Ok(result) => {
                    trace!(%strategy, worker, "worker joined");
                    results.push(result);
                }
                Err(payload) => {
                    let err = CountError::worker_panicked(worker, payload);
                    warn!(%strategy, worker, error = %err, "worker failed");
                    if failure.as_ref().is_none_or(|(first, _)| position < *first) {
                        failure = Some((position, err));
                    }
                }
            }
        }

        match failure {
            Some((_, err)) => Err(err),
            None => Ok(results),
        }
    });

    // Every handle is joined above, so the scope only reports a panic raised
    // by the dispatch code itself.
    match joined {
        Ok(result) => result,
        Err(payload) => panic::resume_unwind(payload),
    }
}

/// Runs one thread's share of the tasks, catching each task's panic.
fn run_lane<X, R, F>(tasks: Vec<(usize, usize, X)>, work: &F) -> Vec<Outcome<R>>
where
    F: Fn(X) -> R,
{
    tasks
        .into_iter()
        .map(|(position, worker, task)| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| work(task)));
            (position, worker, outcome)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::DivisibleBy;

    fn enumerate<T, P: Predicate<T>>(data: &[T], predicate: &P) -> usize {
        data.iter().filter(|x| predicate.test(x)).count()
    }

    #[test]
    fn test_workers_rejects_zero() {
        assert!(matches!(
            Workers::new(0),
            Err(CountError::InvalidWorkerCount(0))
        ));
        assert!(Workers::try_from(0usize).is_err());
    }

    #[test]
    fn test_workers_default_is_available() {
        assert_eq!(Workers::default(), Workers::available());
        assert!(Workers::available().get() >= 1);
        assert_eq!(Workers::ONE.get(), 1);
        assert_eq!(Workers::new(7).unwrap().to_string(), "7");
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("sequential".parse::<Strategy>().unwrap(), Strategy::Sequential);
        assert_eq!(" Locked ".parse::<Strategy>().unwrap(), Strategy::Locked);
        assert!(matches!(
            "atomic".parse::<Strategy>(),
            Err(CountError::UnknownStrategy(s)) if s == "atomic"
        ));
    }

    #[test]
    fn test_strategy_display_roundtrip() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
    }

    #[test]
    fn test_dyn_format() {
        let data = [1u8, 2, 3];
        let counter = build(Strategy::Locked, &data, Workers::new(2).unwrap(), |_: &u8| true);
        assert_eq!(counter.to_string(), "locked(2)");

        let counter = build(Strategy::Sequential, &data, Workers::new(2).unwrap(), |_: &u8| true);
        assert_eq!(counter.to_string(), "sequential(1)");
    }

    #[test]
    fn test_all_strategies_agree() {
        let data: Vec<i64> = (0..600).map(|i| (i * 7919) % 3001 - 1500).collect();
        let predicates = [
            DivisibleBy::new(2_000i64).unwrap(),
            DivisibleBy::new(200i64).unwrap(),
            DivisibleBy::new(20i64).unwrap(),
            DivisibleBy::new(1i64).unwrap(),
        ];

        for predicate in predicates {
            let expected = enumerate(&data, &predicate);
            for workers in [1, 2, 7, data.len()] {
                let workers = Workers::new(workers).unwrap();
                for strategy in Strategy::ALL {
                    let counter = build(strategy, &data, workers, predicate);
                    assert_eq!(
                        counter.count().unwrap(),
                        expected,
                        "{} with divisor {}",
                        counter,
                        predicate.divisor()
                    );
                }
            }
        }
    }

    #[test]
    fn test_single_worker_matches_sequential() {
        let data: Vec<u32> = (0..1_234).map(|i| i ^ 0x55).collect();
        let odd = |x: &u32| x % 2 == 1;
        let baseline = build(Strategy::Sequential, &data, Workers::ONE, odd)
            .count()
            .unwrap();
        for strategy in [Strategy::Locked, Strategy::Partitioned] {
            assert_eq!(build(strategy, &data, Workers::ONE, odd).count().unwrap(), baseline);
        }
    }

    #[test]
    fn test_one_million_by_2000() {
        let data: Vec<i64> = (0..1_000_000).collect();
        let every_2000 = DivisibleBy::new(2_000i64).unwrap();
        for strategy in Strategy::ALL {
            let counter = build(strategy, &data, Workers::new(7).unwrap(), every_2000);
            assert_eq!(counter.count().unwrap(), 500);
        }
    }

    #[test]
    fn test_empty_sequence() {
        let data: Vec<i64> = Vec::new();
        for workers in [1, 3, 16] {
            for strategy in Strategy::ALL {
                let counter = build(strategy, &data, Workers::new(workers).unwrap(), |_: &i64| true);
                assert_eq!(counter.count().unwrap(), 0);
            }
        }
    }

    #[test]
    fn test_run_workers_preserves_task_order() {
        let tasks = (0..8usize).map(|i| (i, i));
        let results = run_workers(Strategy::Partitioned, tasks, |i| i * 10).unwrap();
        assert_eq!(results, vec![0, 10, 20, 30, 40, 50, 60, 70]);
    }

    #[test]
    fn test_run_workers_reports_first_failure() {
        let tasks = (0..6usize).map(|i| (i, i));
        let err = run_workers(Strategy::Locked, tasks, |i| {
            if i == 2 || i == 4 {
                panic!("task {i} failed");
            }
            i
        })
        .unwrap_err();

        match err {
            CountError::WorkerPanicked { worker, message } => {
                assert_eq!(worker, 2);
                assert_eq!(message, "task 2 failed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_workers_joins_all_on_failure() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let finished = AtomicUsize::new(0);
        let tasks = (0..5usize).map(|i| (i, i));
        let result = run_workers(Strategy::Locked, tasks, |i| {
            if i == 0 {
                panic!("first worker fails");
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
            finished.fetch_add(1, Ordering::Relaxed);
        });

        assert!(result.is_err());
        assert_eq!(finished.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_run_workers_reports_worker_index() {
        let tasks = [(3usize, 'a'), (7, 'b'), (9, 'c')];
        let err = run_workers(Strategy::Locked, tasks, |c| {
            if c == 'b' {
                panic!("bad task");
            }
        })
        .unwrap_err();
        assert!(matches!(err, CountError::WorkerPanicked { worker: 7, .. }));
    }

    #[test]
    fn test_run_workers_without_tasks() {
        let tasks: Vec<(usize, u8)> = Vec::new();
        let results = run_workers(Strategy::Partitioned, tasks, |x| x).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_run_workers_many_tasks() {
        let tasks = (0..100_000usize).map(|i| (i, i));
        let results = run_workers(Strategy::Partitioned, tasks, |i| i % 3).unwrap();
        assert_eq!(results.len(), 100_000);
        assert_eq!(results[99_999], 99_999 % 3);
    }

    #[test]
    #[cfg(all(target_os = "linux", target_pointer_width = "64"))]
    fn test_spawn_failure_is_reported() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let ran = AtomicUsize::new(0);
        let tasks = (0..4usize).map(|i| (i, i));
        // No address space can hold a stack this large.
        let err = dispatch(
            Strategy::Partitioned,
            tasks,
            |_| {
                ran.fetch_add(1, Ordering::Relaxed);
            },
            Some(usize::MAX / 4),
        )
        .unwrap_err();

        assert!(matches!(err, CountError::Spawn(_)));
        assert_eq!(ran.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_one_worker_per_element() {
        let data: Vec<u64> = (0..100_000).collect();
        let every_20 = DivisibleBy::new(20u64).unwrap();
        let workers = Workers::new(data.len()).unwrap();
        for strategy in [Strategy::Locked, Strategy::Partitioned] {
            let counter = build(strategy, &data, workers, every_20);
            assert_eq!(counter.workers(), 100_000);
            assert_eq!(counter.count().unwrap(), 5_000);
        }
    }
}
