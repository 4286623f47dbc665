//! Parans: pairs of bodies on the angles (horizon or meridian) at nearly
//! the same moment during one UT day.

use gochara_core::{Body, EngineHandle, GeoLocation, HorizonEvent};
use gochara_time::Instant;
use tracing::debug;

use crate::error::SearchError;
use crate::event_types::Paran;

/// Bodies considered by [`find_parans`].
pub const PARAN_BODIES: [Body; 10] = [
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
];

const MINUTES_PER_DAY: f64 = 1_440.0;

/// Parans among [`PARAN_BODIES`] on the UT day containing `date`.
pub fn find_parans(
    engine: &EngineHandle,
    date: &Instant,
    location: &GeoLocation,
    orb_minutes: f64,
) -> Result<Vec<Paran>, SearchError> {
    find_parans_for(engine, date, location, orb_minutes, &PARAN_BODIES)
}

/// Parans among `bodies` on the UT day containing `date`.
///
/// Each body contributes its rise, set, upper and lower transit if they
/// fall inside the day; events that do not occur (circumpolar bodies) are
/// skipped. Every pair of events no more than `orb_minutes` apart is
/// reported at the midpoint of the two times.
pub fn find_parans_for(
    engine: &EngineHandle,
    date: &Instant,
    location: &GeoLocation,
    orb_minutes: f64,
    bodies: &[Body],
) -> Result<Vec<Paran>, SearchError> {
    if !orb_minutes.is_finite() || orb_minutes < 0.0 {
        return Err(SearchError::InvalidConfig("orb_minutes must be >= 0"));
    }
    location.validate().map_err(SearchError::InvalidConfig)?;

    let day_start = date.start_of_day().julian_day();
    let day_end = day_start + 1.0;

    let mut events: Vec<(Body, HorizonEvent, f64)> = Vec::new();
    for &body in bodies {
        for event in HorizonEvent::ALL {
            match engine.horizon_event(day_start, body, event, location)? {
                Some(jd) if jd >= day_start && jd < day_end => events.push((body, event, jd)),
                _ => {}
            }
        }
    }

    let orb_days = orb_minutes / MINUTES_PER_DAY;
    let mut parans = Vec::new();
    for (i, &(body1, event1, t1)) in events.iter().enumerate() {
        for &(body2, event2, t2) in &events[i + 1..] {
            let gap = (t1 - t2).abs();
            if gap <= orb_days {
                parans.push(Paran {
                    body1,
                    event1,
                    body2,
                    event2,
                    jd: 0.5 * (t1 + t2),
                    orb_minutes: gap * MINUTES_PER_DAY,
                });
            }
        }
    }
    debug!(events = events.len(), parans = parans.len(), "paran scan");
    Ok(parans)
}
