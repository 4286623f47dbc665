//! Pre-flight limit on search spans.
//!
//! Range-bounded searches are checked here before the engine is touched,
//! so an oversized request costs nothing.

use tracing::debug;

use crate::error::SearchError;

/// Largest span a single search may cover (about 100 years).
pub const MAX_SEARCH_DAYS: f64 = 36_525.0;

/// Reject `|end − start|` above [`MAX_SEARCH_DAYS`].
pub fn check_span(start_jd: f64, end_jd: f64) -> Result<(), SearchError> {
    check_span_limit(start_jd, end_jd, MAX_SEARCH_DAYS)
}

/// Reject `|end − start|` above `max_days`, itself capped at [`MAX_SEARCH_DAYS`].
pub fn check_span_limit(start_jd: f64, end_jd: f64, max_days: f64) -> Result<(), SearchError> {
    if !start_jd.is_finite() || !end_jd.is_finite() {
        return Err(SearchError::InvalidConfig("search bounds must be finite"));
    }
    let max_days = max_days.min(MAX_SEARCH_DAYS);
    let span_days = (end_jd - start_jd).abs();
    if span_days > max_days {
        debug!(span_days, max_days, "search span rejected");
        return Err(SearchError::SearchRangeTooLarge {
            span_days,
            max_days,
        });
    }
    Ok(())
}

/// Clamp a default window length to the guardrail.
pub(crate) fn clamp_span(days: f64) -> f64 {
    days.min(MAX_SEARCH_DAYS)
}
