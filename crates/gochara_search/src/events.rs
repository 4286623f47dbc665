//! Mixed event scans across several bodies.

use gochara_core::{Body, EngineHandle};
use tracing::debug;

use crate::error::SearchError;
use crate::event_types::Event;
use crate::guardrail::check_span;
use crate::ingress::scan_ingresses;
use crate::search_config::{EventConfig, check_center};
use crate::station::find_stations;

/// Ingresses and stations of `bodies` in `[start_jd, end_jd]`, ordered by time.
///
/// The whole range is checked against the guardrail once, before any body
/// is sampled.
pub fn scan_events(
    engine: &EngineHandle,
    start_jd: f64,
    end_jd: f64,
    bodies: &[Body],
    config: &EventConfig,
) -> Result<Vec<Event>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    check_span(start_jd, end_jd)?;
    if end_jd <= start_jd {
        return Err(SearchError::InvalidConfig("end_jd must be after start_jd"));
    }
    for &body in bodies {
        check_center(body, config.center).map_err(SearchError::InvalidConfig)?;
    }

    let mut events = Vec::new();
    for &body in bodies {
        events.extend(
            scan_ingresses(engine, body, start_jd, end_jd, config)?
                .into_iter()
                .map(Event::from),
        );
        events.extend(
            find_stations(engine, body, start_jd, end_jd, config)?
                .into_iter()
                .map(Event::from),
        );
    }
    events.sort_by(|a, b| a.jd.total_cmp(&b.jd));
    debug!(bodies = bodies.len(), events = events.len(), "event scan");
    Ok(events)
}
