//! Scalar functions of engine output.
//!
//! Every call is a fresh engine sample; nothing is cached between calls.

use gochara_core::{Ayanamsa, Body, Center, ConfigOverrides, EngineHandle, SampleFlags};

use crate::error::SearchError;

/// Normalize an angle to (−180, +180].
pub fn normalize_to_pm180(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Normalize an angle to [0, 360).
pub fn normalize_360(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d >= 360.0 { 0.0 } else { d }
}

/// Ecliptic longitude of `body` in degrees [0, 360).
pub fn longitude_at(
    engine: &EngineHandle,
    jd: f64,
    body: Body,
    flags: SampleFlags,
) -> Result<f64, SearchError> {
    let s = engine.sample(jd, body, flags)?;
    Ok(normalize_360(s.longitude_deg))
}

/// `actual − target` wrapped to (−180, +180]. Zero exactly at the target.
pub fn signed_offset_at(
    engine: &EngineHandle,
    jd: f64,
    body: Body,
    target_deg: f64,
    flags: SampleFlags,
) -> Result<f64, SearchError> {
    let lon = longitude_at(engine, jd, body, flags)?;
    Ok(normalize_to_pm180(lon - target_deg))
}

/// Longitude speed in degrees per day.
pub fn speed_at(
    engine: &EngineHandle,
    jd: f64,
    body: Body,
    flags: SampleFlags,
) -> Result<f64, SearchError> {
    Ok(engine.sample(jd, body, flags)?.speed_longitude)
}

/// `(lon_deg, lat_deg, lon_speed)` of `body`, for event metadata.
pub fn body_state_at(
    engine: &EngineHandle,
    jd: f64,
    body: Body,
    flags: SampleFlags,
) -> Result<(f64, f64, f64), SearchError> {
    let s = engine.sample(jd, body, flags)?;
    Ok((normalize_360(s.longitude_deg), s.latitude_deg, s.speed_longitude))
}

/// Run `f` in the zodiac selected by `ayanamsa`, sampling from `center`.
///
/// With `Some`, the ayanamsa is applied for the duration of `f` through a
/// scoped configuration and `f` receives sidereal flags; the engine's
/// previous configuration is restored afterwards. With `None`, `f` runs
/// tropical against the engine as configured.
pub fn with_zodiac<T>(
    engine: &EngineHandle,
    ayanamsa: Option<Ayanamsa>,
    center: Center,
    f: impl FnOnce(&EngineHandle, SampleFlags) -> Result<T, SearchError>,
) -> Result<T, SearchError> {
    match ayanamsa {
        Some(system) => {
            let scope = engine.with_config(ConfigOverrides::new().ayanamsa(system))?;
            f(&scope, SampleFlags::SIDEREAL.with_center(center))
        }
        None => f(engine, SampleFlags::TROPICAL.with_center(center)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gochara_test_utils::{ScriptedBackend, fixtures};
    use proptest::prelude::*;

    #[test]
    fn pm180_basics() {
        assert_eq!(normalize_to_pm180(0.0), 0.0);
        assert_eq!(normalize_to_pm180(180.0), 180.0);
        assert_eq!(normalize_to_pm180(-180.0), 180.0);
        assert_eq!(normalize_to_pm180(190.0), -170.0);
        assert_eq!(normalize_to_pm180(-190.0), 170.0);
        assert_eq!(normalize_to_pm180(720.5), 0.5);
    }

    #[test]
    fn offset_across_zero() {
        let (engine, _) = ScriptedBackend::new()
            .with_motion(Body::Sun, fixtures::linear(0.0, 359.0, 1.0))
            .into_handle();
        let before = signed_offset_at(&engine, 0.0, Body::Sun, 1.0, SampleFlags::TROPICAL).unwrap();
        let after = signed_offset_at(&engine, 3.0, Body::Sun, 1.0, SampleFlags::TROPICAL).unwrap();
        assert!((before + 2.0).abs() < 1e-9);
        assert!((after - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zodiac_scope_restores_tropical() {
        let backend = ScriptedBackend::new()
            .with_motion(Body::Sun, fixtures::linear(0.0, 100.0, 1.0))
            .with_ayanamsa_deg(24.0);
        let observed = backend.observed_config();
        let (engine, _) = backend.into_handle();

        let lon = with_zodiac(&engine, Some(Ayanamsa::Lahiri), Center::Geocentric, |e, flags| {
            assert_eq!(observed.get().ayanamsa, Some(Ayanamsa::Lahiri));
            longitude_at(e, 0.0, Body::Sun, flags)
        })
        .unwrap();
        assert!((lon - 76.0).abs() < 1e-9);
        assert_eq!(observed.get().ayanamsa, None);
        assert_eq!(engine.config().ayanamsa, None);
    }

    #[test]
    fn zodiac_passes_center_through() {
        let (engine, _) = ScriptedBackend::new()
            .with_motion(Body::Mars, fixtures::linear(0.0, 10.0, 0.5))
            .with_heliocentric_motion(Body::Mars, fixtures::linear(0.0, 200.0, 0.5))
            .into_handle();
        let geo = with_zodiac(&engine, None, Center::Geocentric, |e, flags| {
            longitude_at(e, 0.0, Body::Mars, flags)
        })
        .unwrap();
        let helio = with_zodiac(&engine, None, Center::Heliocentric, |e, flags| {
            assert_eq!(flags.center, Center::Heliocentric);
            longitude_at(e, 0.0, Body::Mars, flags)
        })
        .unwrap();
        assert_eq!((geo, helio), (10.0, 200.0));
    }

    #[test]
    fn state_carries_speed() {
        let (engine, calls) = ScriptedBackend::new()
            .with_motion(Body::Mars, fixtures::linear(0.0, 10.0, 0.5))
            .into_handle();
        let (lon, lat, speed) = body_state_at(&engine, 2.0, Body::Mars, SampleFlags::TROPICAL).unwrap();
        assert_eq!((lon, lat, speed), (11.0, 0.0, 0.5));
        assert_eq!(calls.get(), 1);
    }

    proptest! {
        #[test]
        fn pm180_in_range(deg in -1.0e6f64..1.0e6) {
            let n = normalize_to_pm180(deg);
            prop_assert!(n > -180.0 && n <= 180.0);
        }

        #[test]
        fn pm180_preserves_angle(deg in -1.0e4f64..1.0e4) {
            let n = normalize_to_pm180(deg);
            let turns = (deg - n) / 360.0;
            prop_assert!((turns - turns.round()).abs() < 1e-9);
        }

        #[test]
        fn norm360_in_range(deg in -1.0e6f64..1.0e6) {
            let n = normalize_360(deg);
            prop_assert!((0.0..360.0).contains(&n));
        }
    }
}
