//! Worker-pool counter with ownership-partitioned accumulators.
//!
//! This module provides [`PartitionedCounter`], the lock-free counterpart of
//! [`LockedCounter`](crate::counters::locked::LockedCounter).
//!
//! Each worker is lent exclusive (`&mut`) access to its own accumulator slot
//! for the duration of the scan. Nothing is shared while the workers run, so
//! no lock and no atomic is needed. Once every worker has been joined, the
//! caller sums the slots on its own thread:
//!
//! ```text
//!   worker 0 ──► [ slot 0 ] ─┐
//!   worker 1 ──► [ slot 1 ] ─┤   join   ┌─────────────────┐
//!   worker 2 ──► [ slot 2 ] ─┼────────► │ Σ slots → total │
//!        ...        ...      │          └─────────────────┘
//!   worker W-1 ► [slot W-1] ─┘
//! ```
//!
//! Slots are wrapped in [`crossbeam_utils::CachePadded`] so that adjacent
//! slots never share a cache line; otherwise workers writing to neighbouring
//! slots would still invalidate each other's caches (false sharing).

use std::fmt::{self, Debug};

use crossbeam_utils::CachePadded;
use tracing::debug;

use crate::counters::{run_workers, CountMatching, Strategy, Workers};
use crate::error::Result;
use crate::partition::Partition;
use crate::predicates::Predicate;

/// Counts matches with `W` workers, each owning a private accumulator.
///
/// # Examples
///
/// ```rust
/// use ripartitori::counters::partitioned::PartitionedCounter;
/// use ripartitori::counters::CountMatching;
/// use ripartitori::predicates::DivisibleBy;
///
/// let data: Vec<i64> = (0..1_000_000).collect();
/// let counter = PartitionedCounter::new(&data, 7, DivisibleBy::new(2_000i64).unwrap()).unwrap();
/// assert_eq!(counter.count().unwrap(), 500);
///
/// // Each worker's share, in worker order.
/// let partials = counter.partial_counts().unwrap();
/// assert_eq!(partials.len(), 7);
/// assert_eq!(partials.iter().sum::<usize>(), 500);
/// ```
pub struct PartitionedCounter<'a, T, P> {
    partition: Partition<'a, T>,
    predicate: P,
}

impl<'a, T, P> PartitionedCounter<'a, T, P>
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

    /// Runs the workers and returns each one's match count, in worker order.
    ///
    /// Workers with an empty bucket are not run; their slot stays at zero.
    /// The slots are only read after every worker has been joined.
    pub fn partial_counts(&self) -> Result<Vec<usize>> {
        let mut slots: Vec<CachePadded<usize>> = (0..self.partition.workers())
            .map(|_| CachePadded::new(0))
            .collect();

        run_workers(
            Strategy::Partitioned,
            self.partition
                .buckets()
                .zip(slots.iter_mut())
                .enumerate()
                .filter(|(_, (bucket, _))| bucket.len() != 0),
            |(bucket, slot)| {
                for item in bucket {
                    if self.predicate.test(item) {
                        **slot += 1;
                    }
                }
            },
        )?;

        Ok(slots.into_iter().map(CachePadded::into_inner).collect())
    }
}

impl<T, P> CountMatching for PartitionedCounter<'_, T, P>
where
    T: Sync,
    P: Predicate<T>,
{
    fn strategy(&self) -> Strategy {
        Strategy::Partitioned
    }

    fn workers(&self) -> usize {
        self.partition.workers()
    }

    fn count(&self) -> Result<usize> {
        let partials = self.partial_counts()?;
        let total: usize = partials.iter().sum();
        debug!(workers = self.workers(), total, ?partials, "partitioned count done");
        Ok(total)
    }
}

impl<T, P> Debug for PartitionedCounter<'_, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PartitionedCounter{{ {:?} }}", self.partition)
    }
}
