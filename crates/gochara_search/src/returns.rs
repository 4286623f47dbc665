//! Planetary returns: the next time a body comes back to a given longitude.

use gochara_core::{Ayanamsa, Body, EngineHandle};
use gochara_time::calendar_to_jd;

use crate::crossing::{ScalarKind, SearchWindow, Termination, find_crossing};
use crate::error::SearchError;
use crate::event_types::ReturnEvent;
use crate::guardrail::check_span;
use crate::policy;
use crate::sampler::{longitude_at, signed_offset_at, with_zodiac};
use crate::search_config::{ReturnConfig, check_center};

/// Solar return search starts this many days before New Year so that a
/// birthday in late December of the previous year still falls in range.
const SOLAR_RETURN_LEAD_DAYS: f64 = 10.0;

/// Next time after `start_jd` that `body` reaches `target_longitude`.
///
/// The result is within `config.tolerance_seconds` of the true crossing.
/// `Ok(None)` when the window closes first.
pub fn find_return(
    engine: &EngineHandle,
    body: Body,
    target_longitude: f64,
    start_jd: f64,
    config: &ReturnConfig,
) -> Result<Option<ReturnEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    check_center(body, config.center).map_err(SearchError::InvalidConfig)?;
    if !target_longitude.is_finite() || !(0.0..360.0).contains(&target_longitude) {
        return Err(SearchError::InvalidConfig(
            "target longitude must be in [0, 360)",
        ));
    }
    let span = match config.window_days {
        Some(days) => {
            check_span(start_jd, start_jd + days)?;
            days
        }
        None => policy::return_window_days(body),
    };
    let step = config.step_days.unwrap_or_else(|| policy::step_days(body));
    let window = SearchWindow::forward(start_jd, span, step);
    window.validate().map_err(SearchError::InvalidConfig)?;

    with_zodiac(engine, config.ayanamsa, config.center, |engine, flags| {
        let crossing = find_crossing(
            &window,
            ScalarKind::Angular,
            Termination::Tolerance(config.tolerance_days()),
            |t| signed_offset_at(engine, t, body, target_longitude, flags),
        )?;
        let Some(crossing) = crossing else {
            return Ok(None);
        };
        Ok(Some(ReturnEvent {
            jd: crossing.jd,
            body,
            target_longitude,
            longitude_deg: longitude_at(engine, crossing.jd, body, flags)?,
            achieved_tolerance_days: crossing.achieved_tolerance_days,
        }))
    })
}

/// Solar return for `year`: the Sun back at `natal_longitude`.
pub fn find_solar_return(
    engine: &EngineHandle,
    natal_longitude: f64,
    year: i32,
    ayanamsa: Option<Ayanamsa>,
) -> Result<Option<ReturnEvent>, SearchError> {
    let start_jd = calendar_to_jd(year, 1, 1.0) - SOLAR_RETURN_LEAD_DAYS;
    let config = ReturnConfig {
        ayanamsa,
        ..ReturnConfig::default()
    };
    find_return(engine, Body::Sun, natal_longitude, start_jd, &config)
}

/// First lunar return after `start_jd`.
pub fn find_lunar_return(
    engine: &EngineHandle,
    natal_longitude: f64,
    start_jd: f64,
    ayanamsa: Option<Ayanamsa>,
) -> Result<Option<ReturnEvent>, SearchError> {
    let config = ReturnConfig {
        ayanamsa,
        ..ReturnConfig::default()
    };
    find_return(engine, Body::Moon, natal_longitude, start_jd, &config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gochara_core::Center;
    use gochara_test_utils::{ScriptedBackend, fixtures};

    #[test]
    fn linear_moon_return_within_tolerance() {
        let (engine, _) = ScriptedBackend::new()
            .with_motion(Body::Moon, fixtures::linear(0.0, 100.0, 13.2))
            .into_handle();
        let r = find_return(&engine, Body::Moon, 150.0, 0.0, &ReturnConfig::default())
            .unwrap()
            .unwrap();
        let exact = 50.0 / 13.2;
        assert!((r.jd - exact).abs() < 1.0 / 86_400.0, "jd = {}", r.jd);
        assert!(r.achieved_tolerance_days <= 1.0 / 86_400.0);
        assert!((r.longitude_deg - 150.0).abs() < 0.01);
    }

    #[test]
    fn return_across_zero() {
        let (engine, _) = ScriptedBackend::new()
            .with_motion(Body::Sun, fixtures::linear(0.0, 359.0, 1.0))
            .into_handle();
        let r = find_return(&engine, Body::Sun, 1.0, 0.0, &ReturnConfig::default())
            .unwrap()
            .unwrap();
        assert!((r.jd - 2.0).abs() < 1.0 / 86_400.0);
    }

    #[test]
    fn target_out_of_range_rejected() {
        let (engine, calls) = ScriptedBackend::new().into_handle();
        for target in [360.0, -1.0, f64::NAN] {
            let err = find_return(&engine, Body::Sun, target, 0.0, &ReturnConfig::default());
            assert!(matches!(err, Err(SearchError::InvalidConfig(_))));
        }
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn oversized_window_rejected_before_sampling() {
        let (engine, calls) = ScriptedBackend::new().into_handle();
        let config = ReturnConfig::default().with_window_days(200.0 * 365.25);
        let err = find_return(&engine, Body::Saturn, 10.0, 0.0, &config).unwrap_err();
        assert!(matches!(err, SearchError::SearchRangeTooLarge { .. }));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn short_window_misses() {
        let (engine, _) = ScriptedBackend::new()
            .with_motion(Body::Mars, fixtures::linear(0.0, 10.0, 0.5))
            .into_handle();
        let config = ReturnConfig::default().with_window_days(10.0);
        assert_eq!(find_return(&engine, Body::Mars, 40.0, 0.0, &config).unwrap(), None);
    }

    #[test]
    fn heliocentric_return_follows_heliocentric_motion() {
        // Geocentric Mars sits still; heliocentric Mars moves 0.5°/day from 350°
        let (engine, _) = ScriptedBackend::new()
            .with_motion(Body::Mars, fixtures::stationary_point(10.0))
            .with_heliocentric_motion(Body::Mars, fixtures::linear(0.0, 350.0, 0.5))
            .into_handle();
        let config = ReturnConfig::tropical().with_center(Center::Heliocentric);
        let r = find_return(&engine, Body::Mars, 5.0, 0.0, &config)
            .unwrap()
            .unwrap();
        assert!((r.jd - 30.0).abs() < 1.0 / 86_400.0, "jd = {}", r.jd);
        assert!((r.longitude_deg - 5.0).abs() < 1e-3);
    }

    #[test]
    fn heliocentric_sun_return_rejected_before_sampling() {
        let (engine, calls) = ScriptedBackend::new().into_handle();
        let config = ReturnConfig::tropical().with_center(Center::Heliocentric);
        let err = find_return(&engine, Body::Sun, 10.0, 0.0, &config).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfig(_)));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn solar_return_lands_in_year() {
        let jan1 = calendar_to_jd(2025, 1, 1.0);
        // Sun at 280° on Jan 1, one degree a day
        let (engine, _) = ScriptedBackend::new()
            .with_motion(Body::Sun, fixtures::linear(jan1, 280.0, 1.0))
            .into_handle();
        let r = find_solar_return(&engine, 300.0, 2025, None).unwrap().unwrap();
        assert!((r.jd - (jan1 + 20.0)).abs() < 1.0 / 86_400.0);
    }

    #[test]
    fn sidereal_lunar_return_restores_config() {
        let backend = ScriptedBackend::new()
            .with_motion(Body::Moon, fixtures::linear(0.0, 124.0, 12.0));
        let observed = backend.observed_config();
        let (engine, _) = backend.into_handle();
        // Sidereal longitude is 100° at t=0
        let r = find_lunar_return(&engine, 112.0, 0.0, Some(Ayanamsa::Lahiri))
            .unwrap()
            .unwrap();
        assert!((r.jd - 1.0).abs() < 1.0 / 86_400.0);
        assert_eq!(observed.get().ayanamsa, None);
    }
}
