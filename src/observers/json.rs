//! JSON observer for serializing count reports.
//!
//! This module provides [`JsonObserver`], which serializes a list of
//! [`CountReport`]s to JSON using the snapshot types in
//! [`crate::snapshot`].
//!
//! # Feature Flag
//!
//! This module requires the `json` feature:
//!
//! ```toml
//! [dependencies]
//! ripartitori = { version = "0.1", features = ["json"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use ripartitori::observers::json::JsonObserver;
//!
//! let json = JsonObserver::new().to_json(comparison.reports())?;
//! // [{"strategy":"sequential","workers":1,"matches":500,"elapsed_us":1204},...]
//!
//! let json = JsonObserver::new()
//!     .wrap_in_snapshot(true)
//!     .include_timestamp(true)
//!     .to_json(comparison.reports())?;
//! // {"timestamp_ms":1700000000000,"agree":true,"reports":[...]}
//! ```

use crate::error::Result;
use crate::report::CountReport;
use crate::snapshot::{ComparisonSnapshot, ReportSnapshot};

/// Configuration for the JSON observer.
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Whether to pretty-print the JSON output.
    pub pretty: bool,
    /// Whether to include a timestamp in the output.
    pub include_timestamp: bool,
    /// Whether to wrap reports in a [`ComparisonSnapshot`] object.
    pub wrap_in_snapshot: bool,
}

/// An observer that serializes count reports to JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonObserver {
    config: JsonConfig,
}

impl JsonObserver {
    /// Creates a new JSON observer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new JSON observer with the specified configuration.
    pub fn with_config(config: JsonConfig) -> Self {
        Self { config }
    }

    /// Enables or disables pretty-printing.
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.config.pretty = enabled;
        self
    }

    /// Enables or disables timestamp inclusion.
    ///
    /// Only has effect when `wrap_in_snapshot` is also enabled.
    pub fn include_timestamp(mut self, enabled: bool) -> Self {
        self.config.include_timestamp = enabled;
        self
    }

    /// Enables or disables wrapping the output in a [`ComparisonSnapshot`].
    pub fn wrap_in_snapshot(mut self, enabled: bool) -> Self {
        self.config.wrap_in_snapshot = enabled;
        self
    }

    /// Collects reports into their serializable form.
    pub fn collect<'a>(
        &self,
        reports: impl IntoIterator<Item = &'a CountReport>,
    ) -> Vec<ReportSnapshot> {
        reports.into_iter().map(ReportSnapshot::from).collect()
    }

    /// Serializes reports to a JSON string.
    pub fn to_json<'a>(&self, reports: impl IntoIterator<Item = &'a CountReport>) -> Result<String> {
        let snapshots = self.collect(reports);

        let json = if self.config.wrap_in_snapshot {
            let snapshot = if self.config.include_timestamp {
                ComparisonSnapshot::with_timestamp(snapshots, current_timestamp_ms())
            } else {
                ComparisonSnapshot::new(snapshots)
            };

            if self.config.pretty {
                serde_json::to_string_pretty(&snapshot)?
            } else {
                serde_json::to_string(&snapshot)?
            }
        } else if self.config.pretty {
            serde_json::to_string_pretty(&snapshots)?
        } else {
            serde_json::to_string(&snapshots)?
        };

        Ok(json)
    }
}

fn current_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
