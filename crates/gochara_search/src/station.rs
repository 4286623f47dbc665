//! Retrograde and direct station search.
//!
//! A station is a zero of the longitude speed, found with the crossing
//! finder on [`speed_at`]. The Sun and Moon never station geocentrically;
//! requests for them return nothing without touching the engine, and
//! heliocentric requests for them are rejected.

use gochara_core::{Body, EngineHandle, SampleFlags};

use crate::crossing::{
    CrossingResult, ScalarKind, SearchDirection, SearchWindow, Termination, find_all_crossings,
    find_crossing,
};
use crate::error::SearchError;
use crate::event_types::{StationEvent, StationType};
use crate::guardrail::check_span;
use crate::policy;
use crate::sampler::{longitude_at, speed_at, with_zodiac};
use crate::search_config::{EventConfig, check_center};

/// Shortest distance from the root at which speeds are re-sampled.
const SPEED_SAMPLE_OFFSET_DAYS: f64 = 1.0e-3;

fn station_from(
    engine: &EngineHandle,
    body: Body,
    flags: SampleFlags,
    crossing: CrossingResult,
) -> Result<StationEvent, SearchError> {
    // A coarse sample can land on the root itself, so one bracket end may
    // be exactly zero. Classify from the other end.
    let (early, late) = crossing.bracket_values;
    let station_type = if early > 0.0 || (early == 0.0 && late < 0.0) {
        StationType::Retrograde
    } else {
        StationType::Direct
    };

    let (lo, hi) = crossing.bracket;
    let offset = (2.0 * crossing.achieved_tolerance_days)
        .max(SPEED_SAMPLE_OFFSET_DAYS)
        .min(hi - lo);
    Ok(StationEvent {
        jd: crossing.jd,
        body,
        station_type,
        speed_before: speed_at(engine, crossing.jd - offset, body, flags)?,
        speed_after: speed_at(engine, crossing.jd + offset, body, flags)?,
        longitude_deg: longitude_at(engine, crossing.jd, body, flags)?,
    })
}

fn find_station_event(
    engine: &EngineHandle,
    body: Body,
    start_jd: f64,
    direction: SearchDirection,
    config: &EventConfig,
) -> Result<Option<StationEvent>, SearchError> {
    if policy::never_stations(body, config.center) {
        return Ok(None);
    }
    config.validate().map_err(SearchError::InvalidConfig)?;
    check_center(body, config.center).map_err(SearchError::InvalidConfig)?;
    let step = config.step_days.unwrap_or_else(|| policy::step_days(body));
    let span = policy::station_window_days(body);
    let window = match direction {
        SearchDirection::Forward => SearchWindow::forward(start_jd, span, step),
        SearchDirection::Backward => SearchWindow::backward(start_jd, span, step),
    };
    window.validate().map_err(SearchError::InvalidConfig)?;

    with_zodiac(engine, config.ayanamsa, config.center, |engine, flags| {
        let crossing = find_crossing(
            &window,
            ScalarKind::Linear,
            Termination::Iterations(config.iterations),
            |t| speed_at(engine, t, body, flags),
        )?;
        crossing
            .map(|c| station_from(engine, body, flags, c))
            .transpose()
    })
}

/// Next station of `body` after `start_jd`.
pub fn next_station(
    engine: &EngineHandle,
    body: Body,
    start_jd: f64,
    config: &EventConfig,
) -> Result<Option<StationEvent>, SearchError> {
    find_station_event(engine, body, start_jd, SearchDirection::Forward, config)
}

/// Previous station of `body` before `start_jd`.
pub fn prev_station(
    engine: &EngineHandle,
    body: Body,
    start_jd: f64,
    config: &EventConfig,
) -> Result<Option<StationEvent>, SearchError> {
    find_station_event(engine, body, start_jd, SearchDirection::Backward, config)
}

/// All stations of `body` in `[start_jd, end_jd]`, in time order.
pub fn find_stations(
    engine: &EngineHandle,
    body: Body,
    start_jd: f64,
    end_jd: f64,
    config: &EventConfig,
) -> Result<Vec<StationEvent>, SearchError> {
    if policy::never_stations(body, config.center) {
        return Ok(Vec::new());
    }
    config.validate().map_err(SearchError::InvalidConfig)?;
    check_center(body, config.center).map_err(SearchError::InvalidConfig)?;
    check_span(start_jd, end_jd)?;
    let window = SearchWindow {
        start_jd,
        end_jd,
        step_days: config.step_days.unwrap_or_else(|| policy::step_days(body)),
        direction: SearchDirection::Forward,
    };
    window.validate().map_err(SearchError::InvalidConfig)?;

    with_zodiac(engine, config.ayanamsa, config.center, |engine, flags| {
        find_all_crossings(
            &window,
            ScalarKind::Linear,
            Termination::Iterations(config.iterations),
            |t| speed_at(engine, t, body, flags),
        )?
        .into_iter()
        .map(|c| station_from(engine, body, flags, c))
        .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gochara_core::Center;
    use gochara_test_utils::{Motion, ScriptedBackend, fixtures};
    use std::sync::Arc;

    fn oscillating_mars() -> (EngineHandle, gochara_test_utils::CallCounter) {
        // Stations at 10 + 20k: retrograde at 10, direct at 30, retrograde at 50
        ScriptedBackend::new()
            .with_motion(Body::Mars, fixtures::oscillating(0.0, 100.0, 10.0, 40.0))
            .into_handle()
    }

    #[test]
    fn next_station_is_retrograde() {
        let (engine, _) = oscillating_mars();
        let s = next_station(&engine, Body::Mars, 0.25, &EventConfig::default())
            .unwrap()
            .unwrap();
        assert!((s.jd - 10.0).abs() < 1e-9, "jd = {}", s.jd);
        assert_eq!(s.station_type, StationType::Retrograde);
        assert!(s.speed_before > 0.0 && s.speed_after < 0.0);
        assert!((s.longitude_deg - 110.0).abs() < 1e-9);
    }

    #[test]
    fn prev_station_is_direct() {
        let (engine, _) = oscillating_mars();
        let s = prev_station(&engine, Body::Mars, 45.25, &EventConfig::default())
            .unwrap()
            .unwrap();
        assert!((s.jd - 30.0).abs() < 1e-9);
        assert_eq!(s.station_type, StationType::Direct);
        assert!(s.speed_before < 0.0 && s.speed_after > 0.0);
    }

    #[test]
    fn coarse_sample_on_the_station_still_gives_signed_speeds() {
        // Speed is exactly zero at t = 10, which a 1-day grid from 0 hits
        let motion: Motion = Arc::new(|t: f64| (100.0 - 0.5 * (t - 10.0).powi(2), -(t - 10.0)));
        let (engine, _) = ScriptedBackend::new().with_motion(Body::Mars, motion).into_handle();
        let config = EventConfig::tropical().with_step_days(1.0);
        let s = next_station(&engine, Body::Mars, 0.0, &config).unwrap().unwrap();
        assert!((s.jd - 10.0).abs() < 1e-9, "jd = {}", s.jd);
        assert_eq!(s.station_type, StationType::Retrograde);
        assert!(s.speed_before > 0.0, "before = {}", s.speed_before);
        assert!(s.speed_after < 0.0, "after = {}", s.speed_after);
    }

    #[test]
    fn backward_scan_onto_the_station_keeps_type() {
        let motion: Motion = Arc::new(|t: f64| (100.0 - 0.5 * (t - 10.0).powi(2), -(t - 10.0)));
        let (engine, _) = ScriptedBackend::new().with_motion(Body::Mars, motion).into_handle();
        let config = EventConfig::tropical().with_step_days(1.0);
        let s = prev_station(&engine, Body::Mars, 20.0, &config).unwrap().unwrap();
        assert!((s.jd - 10.0).abs() < 1e-9, "jd = {}", s.jd);
        assert_eq!(s.station_type, StationType::Retrograde);
        assert!(s.speed_before > 0.0 && s.speed_after < 0.0);
    }

    #[test]
    fn range_collects_all() {
        let (engine, _) = oscillating_mars();
        let stations = find_stations(&engine, Body::Mars, 0.5, 60.5, &EventConfig::default()).unwrap();
        let times: Vec<f64> = stations.iter().map(|s| s.jd).collect();
        assert_eq!(times.len(), 3);
        for (got, want) in times.iter().zip([10.0, 30.0, 50.0]) {
            assert!((got - want).abs() < 1e-9);
        }
        assert_eq!(stations[1].station_type, StationType::Direct);
    }

    #[test]
    fn sun_and_moon_never_touch_engine() {
        let (engine, calls) = ScriptedBackend::new().into_handle();
        for body in [Body::Sun, Body::Moon] {
            assert_eq!(next_station(&engine, body, 0.0, &EventConfig::default()).unwrap(), None);
            assert!(find_stations(&engine, body, 0.0, 1.0e6, &EventConfig::default())
                .unwrap()
                .is_empty());
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn heliocentric_sun_station_is_invalid() {
        let (engine, calls) = ScriptedBackend::new().into_handle();
        let config = EventConfig::tropical().with_center(Center::Heliocentric);
        let err = next_station(&engine, Body::Sun, 0.0, &config).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn heliocentric_planet_never_reverses() {
        let (engine, _) = ScriptedBackend::new()
            .with_motion(Body::Mars, fixtures::oscillating(0.0, 100.0, 10.0, 40.0))
            .with_heliocentric_motion(Body::Mars, fixtures::linear(0.0, 100.0, 0.52))
            .into_handle();
        let config = EventConfig::tropical().with_center(Center::Heliocentric);
        let stations = find_stations(&engine, Body::Mars, 0.5, 60.5, &config).unwrap();
        assert!(stations.is_empty());
    }

    #[test]
    fn engine_failure_is_not_absence() {
        let (engine, _) = ScriptedBackend::new().failing("ephemeris file missing").into_handle();
        let err = next_station(&engine, Body::Mars, 0.0, &EventConfig::default()).unwrap_err();
        match err {
            SearchError::Engine(e) => assert!(e.to_string().contains("ephemeris file missing")),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
