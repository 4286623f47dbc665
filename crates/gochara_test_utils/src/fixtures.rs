//! Closed-form motions with known crossing times.
//!
//! - [`linear`]: constant speed, ingress/return times solve exactly.
//! - [`oscillating`]: pure sinusoid, stations at quarter periods.
//! - [`looping`]: forward drift plus a retrograde loop, like a planet.
//! - [`stationary_point`]: zero relative motion, never brackets.

use std::f64::consts::TAU;
use std::sync::Arc;

use crate::Motion;

/// `lon = lon0 + rate·(t − jd0)`.
pub fn linear(jd0: f64, lon0: f64, rate: f64) -> Motion {
    Arc::new(move |t: f64| (lon0 + rate * (t - jd0), rate))
}

/// `lon = center + amplitude·sin(2π(t − jd0)/period)`.
///
/// Speed is zero at `jd0 + period/4 + k·period/2`: retrograde stations at
/// even `k`, direct stations at odd `k`.
pub fn oscillating(jd0: f64, center: f64, amplitude: f64, period: f64) -> Motion {
    let omega = TAU / period;
    Arc::new(move |t: f64| {
        let phase = omega * (t - jd0);
        (center + amplitude * phase.sin(), amplitude * omega * phase.cos())
    })
}

/// `lon = lon0 + drift·(t − jd0) + amplitude·sin(2π(t − jd0)/period)`.
///
/// Retrograde when `amplitude·2π/period > drift`.
pub fn looping(jd0: f64, lon0: f64, drift: f64, amplitude: f64, period: f64) -> Motion {
    let omega = TAU / period;
    Arc::new(move |t: f64| {
        let phase = omega * (t - jd0);
        (
            lon0 + drift * (t - jd0) + amplitude * phase.sin(),
            drift + amplitude * omega * phase.cos(),
        )
    })
}

/// Body parked at `lon`.
pub fn stationary_point(lon: f64) -> Motion {
    Arc::new(move |_: f64| (lon, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oscillating_speed_zero_at_quarter_period() {
        let m = oscillating(0.0, 100.0, 5.0, 40.0);
        let (lon, speed) = m(10.0);
        assert!((lon - 105.0).abs() < 1e-12);
        assert!(speed.abs() < 1e-12);
    }

    #[test]
    fn linear_rate() {
        let m = linear(10.0, 350.0, 2.0);
        assert_eq!(m(15.0), (360.0, 2.0));
    }
}
