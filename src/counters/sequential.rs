//! Single-threaded baseline counter.
//!
//! [`SequentialCounter`] walks the sequence once, in order, on the calling
//! thread. It is the reference the parallel counters are checked against.

use std::fmt::{self, Debug};

use tracing::trace;

use crate::counters::{CountMatching, Strategy};
use crate::error::Result;
use crate::predicates::Predicate;

/// Counts matches with one in-order pass and no concurrency.
///
/// A panicking predicate unwinds directly into the caller.
///
/// # Examples
///
/// ```rust
/// use ripartitori::counters::sequential::SequentialCounter;
/// use ripartitori::counters::CountMatching;
/// use ripartitori::predicates::DivisibleBy;
///
/// let data: Vec<i64> = (0..20).collect();
/// let counter = SequentialCounter::new(&data, DivisibleBy::new(20i64).unwrap());
/// assert_eq!(counter.count().unwrap(), 1);
/// ```
pub struct SequentialCounter<'a, T, P> {
    data: &'a [T],
    predicate: P,
}

impl<'a, T, P: Predicate<T>> SequentialCounter<'a, T, P> {
    /// Creates a counter over `data`.
    pub fn new(data: &'a [T], predicate: P) -> Self {
        Self { data, predicate }
    }

    /// Returns the source sequence.
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    #[inline]
    fn scan(&self) -> usize {
        let mut total = 0;
        for item in self.data {
            if self.predicate.test(item) {
                total += 1;
            }
        }
        total
    }
}

impl<T, P: Predicate<T>> CountMatching for SequentialCounter<'_, T, P> {
    fn strategy(&self) -> Strategy {
        Strategy::Sequential
    }

    fn workers(&self) -> usize {
        1
    }

    fn count(&self) -> Result<usize> {
        let total = self.scan();
        trace!(len = self.data.len(), total, "sequential scan done");
        Ok(total)
    }
}

impl<T, P> Debug for SequentialCounter<'_, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SequentialCounter{{ len: {} }}", self.data.len())
    }
}
