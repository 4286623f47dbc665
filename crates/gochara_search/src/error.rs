//! Error types for event searches.

use gochara_core::EngineError;
use gochara_time::TimeError;
use thiserror::Error;

/// Errors from search operations.
///
/// "Nothing found in the window" is never an error: searches return
/// `Ok(None)` or an empty `Vec` for that.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// The engine failed while the search was sampling.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// Requested span exceeds the guardrail; the engine was not called.
    #[error("search range of {span_days:.1} days exceeds the {max_days:.0}-day limit")]
    SearchRangeTooLarge { span_days: f64, max_days: f64 },
    /// Invalid search configuration or arguments.
    #[error("invalid search configuration: {0}")]
    InvalidConfig(&'static str),
    /// Time conversion failed.
    #[error(transparent)]
    Time(#[from] TimeError),
}
