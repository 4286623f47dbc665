//! Eclipse search through the engine.
//!
//! The engine finds the eclipse; this layer applies the guardrail to
//! explicit bounds and turns a peak beyond the bound into absence.

use gochara_core::{EclipseKind, EngineHandle};
use tracing::debug;

use crate::crossing::SearchDirection;
use crate::error::SearchError;
use crate::event_types::EclipseEvent;
use crate::guardrail::check_span;

/// Next (or previous) solar eclipse from `start_jd`, optionally bounded.
pub fn next_solar_eclipse(
    engine: &EngineHandle,
    start_jd: f64,
    end_jd: Option<f64>,
    direction: SearchDirection,
) -> Result<Option<EclipseEvent>, SearchError> {
    next_eclipse(engine, EclipseKind::Solar, start_jd, end_jd, direction)
}

/// Next (or previous) lunar eclipse from `start_jd`, optionally bounded.
pub fn next_lunar_eclipse(
    engine: &EngineHandle,
    start_jd: f64,
    end_jd: Option<f64>,
    direction: SearchDirection,
) -> Result<Option<EclipseEvent>, SearchError> {
    next_eclipse(engine, EclipseKind::Lunar, start_jd, end_jd, direction)
}

/// First eclipse of `kind` from `start_jd` in `direction`.
///
/// With `end_jd`, the span is checked against the guardrail before the
/// engine is called, and a peak past `end_jd` yields `Ok(None)`.
pub fn next_eclipse(
    engine: &EngineHandle,
    kind: EclipseKind,
    start_jd: f64,
    end_jd: Option<f64>,
    direction: SearchDirection,
) -> Result<Option<EclipseEvent>, SearchError> {
    let backward = direction == SearchDirection::Backward;
    if let Some(end) = end_jd {
        check_span(start_jd, end)?;
        let ordered = if backward { end < start_jd } else { end > start_jd };
        if !ordered {
            return Err(SearchError::InvalidConfig(
                "eclipse search end must lie in the search direction",
            ));
        }
    }

    let Some(hit) = engine.eclipse_search(kind, start_jd, backward)? else {
        return Ok(None);
    };
    let within = match end_jd {
        None => true,
        Some(end) if backward => hit.peak_jd >= end,
        Some(end) => hit.peak_jd <= end,
    };
    if !within {
        debug!(?kind, peak_jd = hit.peak_jd, ?end_jd, "eclipse beyond search bound");
        return Ok(None);
    }
    Ok(Some(hit.into()))
}

/// All eclipses of `kind` with peaks in `[start_jd, end_jd]`, in time order.
pub fn search_eclipses(
    engine: &EngineHandle,
    kind: EclipseKind,
    start_jd: f64,
    end_jd: f64,
) -> Result<Vec<EclipseEvent>, SearchError> {
    check_span(start_jd, end_jd)?;
    if end_jd <= start_jd {
        return Err(SearchError::InvalidConfig("end_jd must be after start_jd"));
    }

    let mut found = Vec::new();
    let mut cursor = start_jd;
    while let Some(event) =
        next_eclipse(engine, kind, cursor, Some(end_jd), SearchDirection::Forward)?
    {
        // The engine reports strictly later peaks, so the cursor always advances.
        if event.peak_jd <= cursor {
            break;
        }
        cursor = event.peak_jd;
        found.push(event);
        if cursor >= end_jd {
            break;
        }
    }
    Ok(found)
}
