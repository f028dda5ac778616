//! Worker-pool counter aggregating into one mutex-protected total.
//!
//! This module provides [`LockedCounter`]. Every worker scans its own bucket,
//! but all of them increment the same `Mutex<usize>`, taking the lock once
//! per match:
//!
//! ```text
//!   worker 0 ──match──┐
//!   worker 1 ──match──┼──► lock ─► total += 1 ─► unlock
//!   worker 2 ──match──┘
//! ```
//!
//! The result is exact under any interleaving, but the lock becomes a point
//! of contention whose cost grows with the match rate and with the number of
//! workers. Compare with
//! [`PartitionedCounter`](crate::counters::partitioned::PartitionedCounter),
//! which computes the same total without sharing anything during the scan.

use std::fmt::{self, Debug};

use parking_lot::Mutex;
use tracing::debug;

use crate::counters::{run_workers, CountMatching, Strategy, Workers};
use crate::error::Result;
use crate::partition::Partition;
use crate::predicates::Predicate;

/// Counts matches with `W` workers sharing a single locked accumulator.
///
/// # Examples
///
/// ```rust
/// use ripartitori::counters::locked::LockedCounter;
/// use ripartitori::counters::CountMatching;
/// use ripartitori::predicates::DivisibleBy;
///
/// let data: Vec<i64> = (0..1_000_000).collect();
/// let counter = LockedCounter::new(&data, 7, DivisibleBy::new(2_000i64).unwrap()).unwrap();
/// assert_eq!(counter.count().unwrap(), 500);
/// ```
pub struct LockedCounter<'a, T, P> {
    partition: Partition<'a, T>,
    predicate: P,
}

impl<'a, T, P> LockedCounter<'a, T, P>
where
    T: Sync,
    P: Predicate<T>,
{
    /// Creates a counter over `data` split across `workers` buckets.
    ///
    /// Fails with [`CountError::InvalidWorkerCount`](crate::error::CountError::InvalidWorkerCount)
    /// when `workers` is zero.
    pub fn new(data: &'a [T], workers: usize, predicate: P) -> Result<Self> {
        Ok(Self::with_workers(data, Workers::new(workers)?, predicate))
    }

    /// Creates a counter with an already validated worker count.
    pub fn with_workers(data: &'a [T], workers: Workers, predicate: P) -> Self {
        Self {
            partition: Partition::new(data, workers),
            predicate,
        }
    }

    /// Creates a counter with one worker per logical CPU.
    pub fn with_available_parallelism(data: &'a [T], predicate: P) -> Self {
        Self::with_workers(data, Workers::available(), predicate)
    }

    /// Returns the partition the workers scan.
    pub fn partition(&self) -> &Partition<'a, T> {
        &self.partition
    }
}

impl<T, P> CountMatching for LockedCounter<'_, T, P>
where
    T: Sync,
    P: Predicate<T>,
{
    fn strategy(&self) -> Strategy {
        Strategy::Locked
    }

    fn workers(&self) -> usize {
        self.partition.workers()
    }

    fn count(&self) -> Result<usize> {
        let total = Mutex::new(0usize);

        let tasks = self
            .partition
            .buckets()
            .enumerate()
            .filter(|(_, bucket)| bucket.len() != 0);

        run_workers(Strategy::Locked, tasks, |bucket| {
            for item in bucket {
                if self.predicate.test(item) {
                    *total.lock() += 1;
                }
            }
        })?;

        let total = total.into_inner();
        debug!(workers = self.workers(), total, "locked count done");
        Ok(total)
    }
}

impl<T, P> Debug for LockedCounter<'_, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LockedCounter{{ {:?} }}", self.partition)
    }
}
