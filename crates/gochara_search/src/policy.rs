//! Per-body step and window policy.
//!
//! The coarse step must be short next to the time a body takes to cross
//! a target and come back (the Moon moves ~13°/day), while the window must
//! be long enough that the next event is guaranteed to fall inside it.

use gochara_core::{Body, Center};

use crate::guardrail::clamp_span;

const DAYS_PER_YEAR: f64 = 365.25;

/// Coarse scan step in days.
pub fn step_days(body: Body) -> f64 {
    match body {
        Body::Moon => 0.1,
        Body::Sun | Body::Mercury | Body::Venus => 0.5,
        Body::Mars | Body::MeanNode | Body::TrueNode | Body::MeanApogee => 1.0,
        Body::Jupiter | Body::Saturn => 2.0,
        _ => 4.0,
    }
}

/// Window that always contains the next sign ingress, in days.
pub fn ingress_window_days(body: Body) -> f64 {
    let days = match body {
        Body::Moon => 3.0,
        Body::Sun => 32.0,
        Body::Mercury => 0.5 * DAYS_PER_YEAR,
        Body::Venus => 0.75 * DAYS_PER_YEAR,
        Body::Mars => DAYS_PER_YEAR,
        Body::MeanNode | Body::TrueNode | Body::MeanApogee => 2.0 * DAYS_PER_YEAR,
        Body::Jupiter => 1.5 * DAYS_PER_YEAR,
        Body::Saturn => 3.5 * DAYS_PER_YEAR,
        Body::Uranus => 9.0 * DAYS_PER_YEAR,
        Body::Neptune => 16.0 * DAYS_PER_YEAR,
        _ => 40.0 * DAYS_PER_YEAR,
    };
    clamp_span(days)
}

/// Window that always contains the next station, in days.
pub fn station_window_days(_body: Body) -> f64 {
    800.0
}

/// Sidereal period in days used to scale return windows.
fn sidereal_period_days(body: Body) -> f64 {
    match body {
        Body::Moon => 27.32,
        Body::Sun | Body::Mercury | Body::Venus => DAYS_PER_YEAR,
        Body::Mars => 686.98,
        Body::Jupiter => 4_332.59,
        Body::Saturn => 10_759.22,
        Body::Uranus => 30_688.5,
        Body::Neptune => 60_182.0,
        Body::MeanNode | Body::TrueNode => 6_793.5,
        Body::MeanApogee => 3_232.6,
        _ => 90_560.0,
    }
}

/// Default return window in days: one period plus margin for retrograde
/// loops, clamped to the guardrail.
pub fn return_window_days(body: Body) -> f64 {
    let days = match body {
        Body::Moon => 0.1 * DAYS_PER_YEAR,
        Body::Sun => 1.2 * DAYS_PER_YEAR,
        other => 1.2 * sidereal_period_days(other),
    };
    clamp_span(days)
}

/// Bodies that never station as seen from `center`.
///
/// Heliocentric Sun and Moon requests are left to the center check, which
/// rejects them.
pub fn never_stations(body: Body, center: Center) -> bool {
    center != Center::Heliocentric && matches!(body, Body::Sun | Body::Moon)
}
