//! Sign ingress search.
//!
//! `find_ingress` targets the boundary ahead of the body's current motion
//! (the next higher multiple of 30° when direct, the next lower one when
//! retrograde) and roots the signed offset to it. `scan_ingresses` walks a
//! range watching the sign index and bisects each boundary it sees crossed.

use gochara_core::{Body, EngineHandle};

use crate::crossing::{ScalarKind, SearchWindow, Termination, find_crossing, refine};
use crate::error::SearchError;
use crate::event_types::{IngressEvent, ZodiacSign};
use crate::guardrail::check_span;
use crate::policy;
use crate::sampler::{
    body_state_at, longitude_at, normalize_to_pm180, signed_offset_at, with_zodiac,
};
use crate::search_config::{EventConfig, check_center};

/// Next sign ingress of `body` after `start_jd`.
///
/// `Ok(None)` when the body reverses before reaching the boundary within
/// the per-body window.
pub fn find_ingress(
    engine: &EngineHandle,
    body: Body,
    start_jd: f64,
    config: &EventConfig,
) -> Result<Option<IngressEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    check_center(body, config.center).map_err(SearchError::InvalidConfig)?;
    let step = config.step_days.unwrap_or_else(|| policy::step_days(body));
    let window = SearchWindow::forward(start_jd, policy::ingress_window_days(body), step);
    window.validate().map_err(SearchError::InvalidConfig)?;

    with_zodiac(engine, config.ayanamsa, config.center, |engine, flags| {
        let (lon, _, speed) = body_state_at(engine, start_jd, body, flags)?;
        let from_sign = ZodiacSign::from_longitude(lon);
        let (target_deg, to_sign) = if speed >= 0.0 {
            (from_sign.next().start_deg(), from_sign.next())
        } else {
            (from_sign.start_deg(), from_sign.previous())
        };

        let crossing = find_crossing(
            &window,
            ScalarKind::Angular,
            Termination::Iterations(config.iterations),
            |t| signed_offset_at(engine, t, body, target_deg, flags),
        )?;
        let Some(crossing) = crossing else {
            return Ok(None);
        };

        Ok(Some(IngressEvent {
            jd: crossing.jd,
            body,
            from_sign,
            to_sign,
            longitude_deg: longitude_at(engine, crossing.jd, body, flags)?,
        }))
    })
}

/// Boundary crossed going from sign `from` to sign `to` in one step.
fn crossed_boundary(from: ZodiacSign, to: ZodiacSign) -> f64 {
    if to == from.previous() {
        from.start_deg()
    } else {
        to.start_deg()
    }
}

/// All sign ingresses of `body` in `[start_jd, end_jd]`, in time order.
pub fn scan_ingresses(
    engine: &EngineHandle,
    body: Body,
    start_jd: f64,
    end_jd: f64,
    config: &EventConfig,
) -> Result<Vec<IngressEvent>, SearchError> {
    config.validate().map_err(SearchError::InvalidConfig)?;
    check_center(body, config.center).map_err(SearchError::InvalidConfig)?;
    check_span(start_jd, end_jd)?;
    if end_jd <= start_jd {
        return Err(SearchError::InvalidConfig("end_jd must be after start_jd"));
    }
    let step = config.step_days.unwrap_or_else(|| policy::step_days(body));

    with_zodiac(engine, config.ayanamsa, config.center, |engine, flags| {
        let mut events = Vec::new();
        let mut t_prev = start_jd;
        let mut lon_prev = longitude_at(engine, t_prev, body, flags)?;

        while t_prev < end_jd {
            let t_curr = (t_prev + step).min(end_jd);
            let lon_curr = longitude_at(engine, t_curr, body, flags)?;
            let from_sign = ZodiacSign::from_longitude(lon_prev);
            let to_sign = ZodiacSign::from_longitude(lon_curr);

            if from_sign != to_sign {
                let boundary = crossed_boundary(from_sign, to_sign);
                let mut offset = |t: f64| signed_offset_at(engine, t, body, boundary, flags);
                let (jd, _) = refine(
                    t_prev,
                    normalize_to_pm180(lon_prev - boundary),
                    t_curr,
                    Termination::Iterations(config.iterations),
                    &mut offset,
                )?;
                events.push(IngressEvent {
                    jd,
                    body,
                    from_sign,
                    to_sign,
                    longitude_deg: longitude_at(engine, jd, body, flags)?,
                });
            }

            t_prev = t_curr;
            lon_prev = lon_curr;
        }
        Ok(events)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gochara_core::{Ayanamsa, Center};
    use gochara_test_utils::{ScriptedBackend, fixtures};

    #[test]
    fn direct_body_enters_next_sign() {
        // 1°/day from 25° reaches 30° at t = 5
        let (engine, _) = ScriptedBackend::new()
            .with_motion(Body::Mars, fixtures::linear(0.0, 25.0, 1.0))
            .into_handle();
        let e = find_ingress(&engine, Body::Mars, 0.0, &EventConfig::default())
            .unwrap()
            .unwrap();
        assert!((e.jd - 5.0).abs() < 1e-9, "jd = {}", e.jd);
        assert_eq!(e.from_sign, ZodiacSign::Aries);
        assert_eq!(e.to_sign, ZodiacSign::Taurus);
    }

    #[test]
    fn retrograde_body_enters_previous_sign() {
        let (engine, _) = ScriptedBackend::new()
            .with_motion(Body::Saturn, fixtures::linear(0.0, 62.0, -0.5))
            .into_handle();
        let e = find_ingress(&engine, Body::Saturn, 0.0, &EventConfig::default())
            .unwrap()
            .unwrap();
        assert!((e.jd - 4.0).abs() < 1e-9);
        assert_eq!(e.from_sign, ZodiacSign::Gemini);
        assert_eq!(e.to_sign, ZodiacSign::Taurus);
    }

    #[test]
    fn pisces_to_aries_wraps() {
        let (engine, _) = ScriptedBackend::new()
            .with_motion(Body::Sun, fixtures::linear(0.0, 358.0, 1.0))
            .into_handle();
        let e = find_ingress(&engine, Body::Sun, 0.0, &EventConfig::default())
            .unwrap()
            .unwrap();
        assert!((e.jd - 2.0).abs() < 1e-9);
        assert_eq!(e.to_sign, ZodiacSign::Aries);
        assert!(e.longitude_deg < 1e-6 || e.longitude_deg > 360.0 - 1e-6);
    }

    #[test]
    fn sidereal_ingress_shifts_by_ayanamsa() {
        // Tropical 50° is sidereal 26° with a 24° ayanamsa: Aries → Taurus at t = 4
        let (engine, _) = ScriptedBackend::new()
            .with_motion(Body::Venus, fixtures::linear(0.0, 50.0, 1.0))
            .with_ayanamsa_deg(24.0)
            .into_handle();
        let e = find_ingress(&engine, Body::Venus, 0.0, &EventConfig::sidereal(Ayanamsa::Lahiri))
            .unwrap()
            .unwrap();
        assert!((e.jd - 4.0).abs() < 1e-9);
        assert_eq!(e.to_sign, ZodiacSign::Taurus);
        assert_eq!(engine.config().ayanamsa, None);
    }

    #[test]
    fn heliocentric_ingress_uses_heliocentric_positions() {
        // Geocentric Jupiter is retrograde in Taurus; heliocentric Jupiter
        // moves direct from 58° and enters Gemini at t = 24
        let (engine, _) = ScriptedBackend::new()
            .with_motion(Body::Jupiter, fixtures::linear(0.0, 45.0, -0.1))
            .with_heliocentric_motion(Body::Jupiter, fixtures::linear(0.0, 58.0, 1.0 / 12.0))
            .into_handle();
        let config = EventConfig::tropical().with_center(Center::Heliocentric);
        let e = find_ingress(&engine, Body::Jupiter, 0.0, &config).unwrap().unwrap();
        assert!((e.jd - 24.0).abs() < 1e-6, "jd = {}", e.jd);
        assert_eq!(e.from_sign, ZodiacSign::Taurus);
        assert_eq!(e.to_sign, ZodiacSign::Gemini);
    }

    #[test]
    fn stuck_body_has_no_ingress() {
        let (engine, _) = ScriptedBackend::new()
            .with_motion(Body::Jupiter, fixtures::stationary_point(15.0))
            .into_handle();
        let e = find_ingress(&engine, Body::Jupiter, 0.0, &EventConfig::default()).unwrap();
        assert_eq!(e, None);
    }

    #[test]
    fn scan_sees_forward_and_backward_crossings() {
        // Oscillates 20° ± 15° with period 40 d: crosses 30° up then down
        let (engine, _) = ScriptedBackend::new()
            .with_motion(Body::Mercury, fixtures::oscillating(0.0, 20.0, 15.0, 40.0))
            .into_handle();
        let events = scan_ingresses(&engine, Body::Mercury, 0.0, 20.0, &EventConfig::default()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].to_sign, ZodiacSign::Taurus);
        assert_eq!(events[1].to_sign, ZodiacSign::Aries);
        for e in &events {
            assert!((e.longitude_deg - 30.0).abs() < 1e-6, "lon = {}", e.longitude_deg);
        }
        assert!(events[0].jd < events[1].jd);
    }

    #[test]
    fn scan_rejects_oversized_range_without_sampling() {
        let (engine, calls) = ScriptedBackend::new()
            .with_motion(Body::Mars, fixtures::linear(0.0, 0.0, 0.5))
            .into_handle();
        let err = scan_ingresses(&engine, Body::Mars, 0.0, 40_000.0, &EventConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::SearchRangeTooLarge { .. }));
        assert_eq!(calls.get(), 0);
    }
}
