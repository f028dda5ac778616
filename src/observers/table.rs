//! Table observer for pretty-printing count reports.
//!
//! This module provides [`TableObserver`], which renders a list of
//! [`CountReport`]s as a formatted table using the `tabled` crate.
//!
//! # Feature Flag
//!
//! This module requires the `table` feature:
//!
//! ```toml
//! [dependencies]
//! ripartitori = { version = "0.1", features = ["table"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use ripartitori::observers::table::{TableObserver, TableStyle};
//!
//! let observer = TableObserver::new()
//!     .with_style(TableStyle::Rounded)
//!     .with_title("0..1000000, divisible by 2000");
//! println!("{}", observer.render(comparison.reports()));
//! // 0..1000000, divisible by 2000
//! // ╭─────────────┬─────────┬─────────┬──────────╮
//! // │ Strategy    │ Workers │ Matches │ Elapsed  │
//! // ├─────────────┼─────────┼─────────┼──────────┤
//! // │ sequential  │ 1       │ 500     │ 1.204ms  │
//! // │ locked      │ 7       │ 500     │ 0.611ms  │
//! // │ partitioned │ 7       │ 500     │ 0.402ms  │
//! // ╰─────────────┴─────────┴─────────┴──────────╯
//! ```

use tabled::{settings::Style, Table, Tabled};

use crate::report::CountReport;

/// Available table styles for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// ASCII table with simple characters: +, -, |
    Ascii,
    /// Modern rounded corners (default)
    #[default]
    Rounded,
    /// Sharp corners with box-drawing characters
    Sharp,
    /// Modern style with clean lines
    Modern,
    /// GitHub-flavored Markdown table
    Markdown,
    /// No borders, just spacing
    Blank,
}

/// Configuration for the table observer.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// The style to use for rendering.
    pub style: TableStyle,
    /// Whether to show the header row.
    pub show_header: bool,
    /// Custom title printed above the table (optional).
    pub title: Option<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            style: TableStyle::default(),
            show_header: true,
            title: None,
        }
    }
}

/// Internal row representation for tabled.
#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Workers")]
    workers: usize,
    #[tabled(rename = "Matches")]
    matches: usize,
    #[tabled(rename = "Elapsed")]
    elapsed: String,
}

impl From<&CountReport> for ReportRow {
    fn from(report: &CountReport) -> Self {
        Self {
            strategy: report.strategy.to_string(),
            workers: report.workers,
            matches: report.matches,
            elapsed: format!("{:.3?}", report.elapsed),
        }
    }
}

/// An observer that renders count reports as a table.
#[derive(Debug, Clone, Default)]
pub struct TableObserver {
    config: TableConfig,
}

impl TableObserver {
    /// Creates a new table observer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new table observer with the specified configuration.
    pub fn with_config(config: TableConfig) -> Self {
        Self { config }
    }

    /// Sets the table style.
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.config.style = style;
        self
    }

    /// Sets whether to show the header row.
    pub fn with_header(mut self, show: bool) -> Self {
        self.config.show_header = show;
        self
    }

    /// Sets an optional title for the table.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    /// Applies the configured style to a table.
    fn apply_style(&self, table: &mut Table) {
        match self.config.style {
            TableStyle::Ascii => {
                table.with(Style::ascii());
            }
            TableStyle::Rounded => {
                table.with(Style::rounded());
            }
            TableStyle::Sharp => {
                table.with(Style::sharp());
            }
            TableStyle::Modern => {
                table.with(Style::modern());
            }
            TableStyle::Markdown => {
                table.with(Style::markdown());
            }
            TableStyle::Blank => {
                table.with(Style::blank());
            }
        }
    }

    /// Renders the reports as a formatted table string.
    pub fn render<'a>(&self, reports: impl IntoIterator<Item = &'a CountReport>) -> String {
        let rows: Vec<ReportRow> = reports.into_iter().map(ReportRow::from).collect();

        let mut table = Table::new(&rows);
        self.apply_style(&mut table);

        if !self.config.show_header {
            table.with(tabled::settings::Remove::row(
                tabled::settings::object::Rows::first(),
            ));
        }

        if let Some(ref title) = self.config.title {
            format!("{}\n{}", title, table)
        } else {
            table.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::Strategy;
    use std::time::Duration;

    fn reports() -> Vec<CountReport> {
        vec![
            CountReport {
                strategy: Strategy::Sequential,
                workers: 1,
                matches: 500,
                elapsed: Duration::from_micros(1_204),
            },
            CountReport {
                strategy: Strategy::Partitioned,
                workers: 7,
                matches: 500,
                elapsed: Duration::from_micros(402),
            },
        ]
    }

    #[test]
    fn test_render_empty() {
        let reports: Vec<CountReport> = Vec::new();
        let output = TableObserver::new().render(&reports);
        assert!(!output.is_empty());
    }

    #[test]
    fn test_render_reports() {
        let reports = reports();
        let output = TableObserver::new().render(&reports);
        assert!(output.contains("Strategy"));
        assert!(output.contains("sequential"));
        assert!(output.contains("partitioned"));
        assert!(output.contains("500"));
        assert!(output.contains("1.204ms"));
    }

    #[test]
    fn test_render_without_header() {
        let reports = reports();
        let output = TableObserver::new().with_header(false).render(&reports);
        assert!(!output.contains("Strategy"));
        assert!(output.contains("sequential"));
    }

    #[test]
    fn test_render_with_title() {
        let reports = reports();
        let output = TableObserver::new()
            .with_title("divisible by 2000")
            .render(&reports);
        assert!(output.starts_with("divisible by 2000\n"));
    }

    #[test]
    fn test_render_markdown() {
        let reports = reports();
        let output = TableObserver::new()
            .with_style(TableStyle::Markdown)
            .render(&reports);
        assert!(output.contains("| Strategy"));
    }

    #[test]
    fn test_with_config() {
        let config = TableConfig {
            style: TableStyle::Ascii,
            show_header: true,
            title: None,
        };
        let reports = reports();
        let output = TableObserver::with_config(config).render(&reports);
        assert!(output.contains('+'));
    }
}
