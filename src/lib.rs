//! # Ripartitori - Parallel Predicate Counters
//!
//! A Rust library that counts the elements of a sequence satisfying a
//! predicate, using three interchangeable strategies that differ only in how
//! work is split and how matches are accumulated.
//!
//! ## The Problem
//!
//! Splitting a scan across worker threads is easy. Combining their results is
//! where the cost hides: the obvious approach lets every worker increment one
//! shared total behind a lock. It is correct, but every match becomes a trip
//! through the same mutex, and the lock is contended more as the match rate
//! and the worker count grow.
//!
//! ## The Solution: Ownership-Partitioned Accumulators
//!
//! Give each worker its own accumulator instead. While the workers run, each
//! one holds the only (`&mut`) reference to its slot, so nothing is shared
//! and nothing needs a lock. Once every worker has been joined, the caller
//! adds the slots up on its own thread.
//!
//! ### Design Principles
//!
//! 1. **Round-Robin Partitioning**: element `i` goes to worker `i mod W`.
//!    Buckets are stride views over the caller's slice, so no element is
//!    copied, lost or duplicated.
//!
//! 2. **Scoped Workers**: workers run on `crossbeam_utils` scoped threads,
//!    at most one per logical CPU, so they borrow the data and the predicate
//!    directly and are always joined before `count()` returns. A worker count
//!    far above the core count is valid and costs no extra threads.
//!
//! 3. **Cache Line Padding**: per-worker slots are wrapped in
//!    [`crossbeam_utils::CachePadded`] so neighbouring workers never write to
//!    the same cache line (no false sharing).
//!
//! 4. **All-or-Nothing**: a panicking predicate is reported as
//!    [`CountError::WorkerPanicked`](error::CountError::WorkerPanicked) after
//!    every worker has been joined. Partial totals are never returned.
//!
//! ## Available Counters
//!
//! | Type | Accumulator | Use Case |
//! |------|-------------|----------|
//! | [`SequentialCounter`](counters::sequential::SequentialCounter) | one local total | Baseline, small inputs |
//! | [`LockedCounter`](counters::locked::LockedCounter) | one `Mutex<usize>` shared by all workers | Showing the cost of contention |
//! | [`PartitionedCounter`](counters::partitioned::PartitionedCounter) | one padded slot per worker, summed after join | Parallel counting without locks |
//!
//! ## Quick Start
//!
//! ```rust
//! use ripartitori::counters::partitioned::PartitionedCounter;
//! use ripartitori::counters::CountMatching;
//! use ripartitori::predicates::DivisibleBy;
//!
//! let data: Vec<i64> = (0..1_000_000).collect();
//!
//! let counter = PartitionedCounter::new(&data, 7, DivisibleBy::new(2_000i64).unwrap()).unwrap();
//! assert_eq!(counter.count().unwrap(), 500);
//!
//! // Zero workers is rejected up front.
//! assert!(PartitionedCounter::new(&data, 0, |x: &i64| *x > 0).is_err());
//! ```
//!
//! ## Logging
//!
//! Worker dispatch, join and failure are logged with [`tracing`]. The library
//! never installs a subscriber; that is up to the application.
//!
//! ## Observers
//!
//! Reports produced by [`report::measure`] and [`report::compare`] can be
//! exported through optional observer modules, each gated behind a feature
//! flag:
//!
//! | Feature | Module | Description |
//! |---------|--------|-------------|
//! | `table` | [`observers::table`] | Pretty-print reports as tables |
//! | `json` | [`observers::json`] | Serialize reports to JSON |
//! | `serde` | [`snapshot`] | Serializable report snapshots |
//! | `full` | All observers | Enables all observer modules |
//!
//! ```rust,ignore
//! use ripartitori::counters::{Strategy, Workers};
//! use ripartitori::observers::table::TableObserver;
//! use ripartitori::predicates::DivisibleBy;
//! use ripartitori::report::compare;
//!
//! let data: Vec<i64> = (0..2_000_000).collect();
//! let comparison = compare(&data, Workers::new(7)?, DivisibleBy::new(20i64)?, &Strategy::ALL)?;
//! println!("{}", TableObserver::new().render(comparison.reports()));
//! ```

pub mod counters;
pub mod error;
pub mod observers;
pub mod partition;
pub mod predicates;
pub mod report;

#[cfg(feature = "serde")]
pub mod snapshot;
