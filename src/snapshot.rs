//! Snapshot types for serializing count reports.
//!
//! This module provides serializable mirrors of [`CountReport`] and
//! [`Comparison`], with the elapsed time flattened to microseconds so the
//! output stays readable in any serde format.
//!
//! # Feature Flag
//!
//! This module requires the `serde` feature:
//!
//! ```toml
//! [dependencies]
//! ripartitori = { version = "0.1", features = ["serde"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use ripartitori::snapshot::ComparisonSnapshot;
//!
//! let snapshot = ComparisonSnapshot::from_comparison(&comparison);
//! let json = serde_json::to_string(&snapshot).unwrap();
//! ```

use serde::{Deserialize, Serialize};

use crate::counters::Strategy;
use crate::report::{micros, Comparison, CountReport};

/// A serializable view of one [`CountReport`].
///
/// ```rust,ignore
/// let snapshot = ReportSnapshot::from(&report);
/// // {"strategy":"locked","workers":7,"matches":500,"elapsed_us":1830}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportSnapshot {
    /// The strategy that produced the result.
    pub strategy: Strategy,
    /// Number of workers used.
    pub workers: usize,
    /// Number of matching elements.
    pub matches: usize,
    /// Wall-clock time of the count, in microseconds.
    pub elapsed_us: u64,
}

impl From<&CountReport> for ReportSnapshot {
    fn from(report: &CountReport) -> Self {
        Self {
            strategy: report.strategy,
            workers: report.workers,
            matches: report.matches,
            elapsed_us: micros(report.elapsed),
        }
    }
}

/// A collection of report snapshots, typically one run of every strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComparisonSnapshot {
    /// Optional timestamp in milliseconds since Unix epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    /// Whether all strategies found the same number of matches.
    pub agree: bool,
    /// The report snapshots, in run order.
    pub reports: Vec<ReportSnapshot>,
}

impl ComparisonSnapshot {
    /// Creates a snapshot from report snapshots.
    pub fn new(reports: Vec<ReportSnapshot>) -> Self {
        let agree = reports.windows(2).all(|pair| pair[0].matches == pair[1].matches);
        Self {
            timestamp_ms: None,
            agree,
            reports,
        }
    }

    /// Creates a snapshot from report snapshots and a timestamp.
    pub fn with_timestamp(reports: Vec<ReportSnapshot>, timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms: Some(timestamp_ms),
            ..Self::new(reports)
        }
    }

    /// Creates a snapshot of a [`Comparison`].
    pub fn from_comparison(comparison: &Comparison) -> Self {
        Self::new(comparison.reports().iter().map(ReportSnapshot::from).collect())
    }

    /// Finds the report of a strategy.
    pub fn get(&self, strategy: Strategy) -> Option<&ReportSnapshot> {
        self.reports.iter().find(|r| r.strategy == strategy)
    }
}
