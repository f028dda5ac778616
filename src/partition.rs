//! Round-robin partitioning of a borrowed sequence into worker buckets.
//!
//! Element `i` of the source goes to bucket `i mod W`. Buckets are stride
//! views over the caller's slice, so building a [`Partition`] copies nothing:
//!
//! ```text
//!   data:     [ a0 a1 a2 a3 a4 a5 a6 a7 a8 a9 ]     W = 3
//!
//!   bucket 0:   a0       a3       a6       a9
//!   bucket 1:      a1       a4       a7
//!   bucket 2:         a2       a5       a8
//! ```
//!
//! Buckets are disjoint, keep the original relative order, and their
//! round-robin interleaving gives back the source. When `W > N` the trailing
//! `W - N` buckets are empty.
//!
//! # Examples
//!
//! ```rust
//! use ripartitori::partition::Partition;
//!
//! let data = [10, 11, 12, 13, 14];
//! let partition = Partition::round_robin(&data, 2).unwrap();
//!
//! assert_eq!(partition.bucket(0).copied().collect::<Vec<_>>(), vec![10, 12, 14]);
//! assert_eq!(partition.bucket(1).copied().collect::<Vec<_>>(), vec![11, 13]);
//! ```

use std::fmt::{self, Debug};
use std::iter::{FusedIterator, StepBy};
use std::slice;

use crate::counters::Workers;
use crate::error::Result;

/// A fixed assignment of a sequence's elements to `W` workers.
pub struct Partition<'a, T> {
    data: &'a [T],
    workers: Workers,
}

impl<T> Clone for Partition<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Partition<'_, T> {}

impl<'a, T> Partition<'a, T> {
    /// Partitions `data` across an already validated worker count.
    pub fn new(data: &'a [T], workers: Workers) -> Self {
        Self { data, workers }
    }

    /// Partitions `data` across `workers` buckets.
    ///
    /// Fails with [`CountError::InvalidWorkerCount`](crate::error::CountError::InvalidWorkerCount)
    /// when `workers` is zero.
    pub fn round_robin(data: &'a [T], workers: usize) -> Result<Self> {
        Ok(Self::new(data, Workers::new(workers)?))
    }

    /// Number of buckets.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers.get()
    }

    /// Total number of elements across all buckets.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the partitioned sequence is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of elements assigned to bucket `index`.
    pub fn bucket_len(&self, index: usize) -> usize {
        let n = self.data.len();
        if index >= self.workers() || index >= n {
            0
        } else {
            (n - 1 - index) / self.workers() + 1
        }
    }

    /// Returns an iterator over the elements of bucket `index`.
    ///
    /// Indices past the last bucket yield an empty bucket.
    pub fn bucket(&self, index: usize) -> Bucket<'a, T> {
        let start = if index < self.workers() {
            self.data.get(index..).unwrap_or(&[])
        } else {
            &[]
        };
        Bucket {
            inner: start.iter().step_by(self.workers()),
        }
    }

    /// Returns an iterator over all buckets, in worker order.
    pub fn buckets(&self) -> impl ExactSizeIterator<Item = Bucket<'a, T>> + '_ {
        (0..self.workers()).map(move |index| self.bucket(index))
    }
}

impl<T> Debug for Partition<'_, T> {
    /// Formats the partition as bucket sizes: `Partition{ [0]:4 [1]:3 ... }`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Partition{{")?;
        for i in 0..self.workers() {
            write!(f, " [{i}]:{}", self.bucket_len(i))?;
        }
        write!(f, " }}")
    }
}

/// The elements assigned to one worker, in original order.
#[derive(Debug, Clone)]
pub struct Bucket<'a, T> {
    inner: StepBy<slice::Iter<'a, T>>,
}

impl<'a, T> Iterator for Bucket<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Bucket<'_, T> {}

impl<T> FusedIterator for Bucket<'_, T> {}
