//! Unified error type for counter construction and execution.
//!
//! Every fallible operation in this crate returns [`Result`], so callers can
//! switch between counting strategies without changing their error handling.
//!
//! # Example
//!
//! ```rust
//! use ripartitori::counters::locked::LockedCounter;
//! use ripartitori::error::CountError;
//!
//! let data = [1, 2, 3];
//! let err = LockedCounter::new(&data, 0, |x: &i32| *x > 1).unwrap_err();
//! assert!(matches!(err, CountError::InvalidWorkerCount(0)));
//! ```

use std::any::Any;

use thiserror::Error;

/// Error type for all counter operations.
#[derive(Debug, Error)]
pub enum CountError {
    /// A parallel counter was asked to run with an unusable number of workers.
    #[error("invalid worker count: {0} (at least one worker is required)")]
    InvalidWorkerCount(usize),

    /// A divisibility predicate was built with a zero divisor.
    #[error("divisor must be non-zero")]
    ZeroDivisor,

    /// A strategy name did not match any known counting strategy.
    #[error("unknown strategy: {0:?} (expected sequential, locked or partitioned)")]
    UnknownStrategy(String),

    /// A worker thread panicked while scanning its bucket.
    ///
    /// Reported only after every other worker has been joined.
    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked {
        /// Index of the first worker (in worker order) that failed.
        worker: usize,
        /// The panic payload, when it was a string.
        message: String,
    },

    /// The operating system refused to start a worker thread.
    ///
    /// Threads already started are joined before this is returned.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// Error serializing a report.
    #[cfg(feature = "json")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CountError {
    /// Builds a [`CountError::WorkerPanicked`] from a panic payload.
    pub(crate) fn worker_panicked(worker: usize, payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        CountError::WorkerPanicked { worker, message }
    }
}

/// Result type for counter operations.
pub type Result<T> = std::result::Result<T, CountError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_panicked_str_payload() {
        let err = CountError::worker_panicked(3, Box::new("boom"));
        assert_eq!(err.to_string(), "worker 3 panicked: boom");
    }

    #[test]
    fn test_worker_panicked_string_payload() {
        let err = CountError::worker_panicked(0, Box::new(String::from("bad item 7")));
        match err {
            CountError::WorkerPanicked { worker, message } => {
                assert_eq!(worker, 0);
                assert_eq!(message, "bad item 7");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_worker_panicked_opaque_payload() {
        let err = CountError::worker_panicked(1, Box::new(42u32));
        assert!(err.to_string().contains("non-string panic payload"));
    }

    #[test]
    fn test_spawn_from_io_error() {
        let io = std::io::Error::from(std::io::ErrorKind::WouldBlock);
        let err: CountError = io.into();
        assert!(matches!(err, CountError::Spawn(_)));
        assert!(err.to_string().starts_with("failed to spawn worker thread"));
    }

    #[test]
    fn test_invalid_worker_count_display() {
        let err = CountError::InvalidWorkerCount(0);
        assert!(err.to_string().contains("invalid worker count: 0"));
    }
}
