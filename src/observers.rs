//! Observer implementations for presenting count reports.
//!
//! This module provides ways to export the [`CountReport`](crate::report::CountReport)s
//! produced by [`measure`](crate::report::measure) and
//! [`compare`](crate::report::compare):
//!
//! - [`table`] - Pretty-print reports as tables using the `tabled` crate
//! - [`json`] - Serialize reports to JSON format
//!
//! # Feature Flags
//!
//! Each observer is gated behind a feature flag to minimize dependencies:
//!
//! - `table` - Enables the [`table`] module
//! - `json` - Enables the [`json`] module
//! - `full` - Enables all observer modules
//!
//! # Example
//!
//! ```rust,ignore
//! use ripartitori::counters::{Strategy, Workers};
//! use ripartitori::observers::json::JsonObserver;
//! use ripartitori::observers::table::TableObserver;
//! use ripartitori::predicates::DivisibleBy;
//! use ripartitori::report::compare;
//!
//! let data: Vec<i64> = (0..1_000_000).collect();
//! let comparison = compare(&data, Workers::new(7)?, DivisibleBy::new(2_000i64)?, &Strategy::ALL)?;
//!
//! println!("{}", TableObserver::new().render(comparison.reports()));
//! println!("{}", JsonObserver::new().pretty(true).to_json(comparison.reports())?);
//! ```

#[cfg(feature = "table")]
pub mod table;

#[cfg(feature = "json")]
pub mod json;
