//! Rise, set and meridian transit times.
//!
//! Each event is a target hour angle: rise at −H₀, set at +H₀, upper
//! transit at 0, lower transit at π, where
//! `cos H₀ = (sin h₀ − sin φ sin δ) / (cos φ cos δ)`. The time is refined
//! by Newton steps on the hour angle, re-sampling the body each step.

use std::f64::consts::{PI, TAU};

use gochara_core::{Body, HorizonEvent};

use crate::frames::{local_sidereal_time_rad, wrap_pi};

/// Rate of sidereal time relative to UT, in radians per day.
const SIDEREAL_RATE: f64 = TAU * 1.002_737_811_911_354_6;

const MAX_ITERATIONS: usize = 20;
const CONVERGENCE_DAYS: f64 = 1e-8;

/// Events closer than this to the start time count as the start itself.
const MIN_ADVANCE_DAYS: f64 = 1e-6;

/// Standard altitude h₀ in degrees used for rise and set.
///
/// Includes refraction (34′), the solar semidiameter and the Moon's mean
/// horizontal parallax.
pub fn standard_altitude_deg(body: Body) -> f64 {
    match body {
        Body::Sun => -0.8333,
        Body::Moon => 0.125,
        _ => -0.5667,
    }
}

fn target_hour_angle(event: HorizonEvent, latitude: f64, dec: f64, h0: f64) -> Option<f64> {
    match event {
        HorizonEvent::UpperTransit => Some(0.0),
        HorizonEvent::LowerTransit => Some(PI),
        HorizonEvent::Rise | HorizonEvent::Set => {
            let cos_h0 = (h0.sin() - latitude.sin() * dec.sin()) / (latitude.cos() * dec.cos());
            if !(-1.0..=1.0).contains(&cos_h0) {
                return None;
            }
            let h = cos_h0.acos();
            Some(if event == HorizonEvent::Rise { -h } else { h })
        }
    }
}

/// First `event` strictly after `jd_ut`.
///
/// `equatorial` returns `(ra, dec)` in radians, of date, at a UT Julian Day.
/// `Ok(None)` when the body stays above or below the horizon.
pub fn next_event<E>(
    jd_ut: f64,
    event: HorizonEvent,
    latitude_deg: f64,
    longitude_deg: f64,
    h0_deg: f64,
    mut equatorial: impl FnMut(f64) -> Result<(f64, f64), E>,
) -> Result<Option<f64>, E> {
    let latitude = latitude_deg.to_radians();
    let h0 = h0_deg.to_radians();

    let mut start = jd_ut;
    // A second pass covers the case where refinement lands before `jd_ut`.
    for _ in 0..3 {
        let (ra, dec) = equatorial(start)?;
        let Some(target) = target_hour_angle(event, latitude, dec, h0) else {
            return Ok(None);
        };
        let hour_angle = local_sidereal_time_rad(start, longitude_deg) - ra;
        let mut t = start + (target - hour_angle).rem_euclid(TAU) / SIDEREAL_RATE;

        for _ in 0..MAX_ITERATIONS {
            let (ra, dec) = equatorial(t)?;
            let Some(target) = target_hour_angle(event, latitude, dec, h0) else {
                return Ok(None);
            };
            let hour_angle = local_sidereal_time_rad(t, longitude_deg) - ra;
            let step = wrap_pi(target - hour_angle) / SIDEREAL_RATE;
            t += step;
            if step.abs() < CONVERGENCE_DAYS {
                break;
            }
        }

        if t > jd_ut + MIN_ADVANCE_DAYS {
            return Ok(Some(t));
        }
        start = t + 0.5;
    }
    Ok(None)
}
