//! [`EphemerisBackend`] implementation over the analytic theories.

use gochara_core::{
    Ayanamsa, BackendError, Body, Center, EclipseHit, EclipseKind, EphemerisBackend, GeoLocation,
    HorizonEvent, HouseData, HouseSystem, RawSample, SampleFlags, TidalModel,
};
use gochara_time::{J2000_JD, jd_to_centuries};
use tracing::debug;

use crate::ayanamsa::ayanamsa_deg;
use crate::delta_t::ut_to_tt;
use crate::frames::{
    AU_KM, cartesian_to_spherical, ecliptic_to_equatorial, equatorial_to_ecliptic_vec,
    general_precession_longitude_deg, local_sidereal_time_rad, mean_obliquity_deg, normalize_deg,
    observer_equatorial_au, spherical_to_cartesian,
};
use crate::kepler::{earth_heliocentric_j2000, heliocentric_j2000};
use crate::moon::{LunarArguments, moon_position};
use crate::nodes::{mean_node_deg, true_node_deg};
use crate::{eclipse, horizon, houses};

/// Earliest supported year.
pub const MIN_YEAR: f64 = -1000.0;
/// Latest supported year.
pub const MAX_YEAR: f64 = 3000.0;

/// Light travel time for one AU, in days.
const LIGHT_TIME_DAYS_PER_AU: f64 = 0.005_775_518_3;

/// Half-width of the central difference used for speeds, in days.
const SPEED_STEP_DAYS: f64 = 0.01;

/// Mean Earth–Moon distance in AU, reported for the lunar points.
const MEAN_MOON_DISTANCE_AU: f64 = 384_400.0 / AU_KM;

/// Low-precision ephemeris computed from closed-form theories.
///
/// Planets come from mean Keplerian elements with one light-time
/// iteration, the Moon from a truncated ELP series. Positions are
/// geometric (no aberration or nutation) on the mean ecliptic of date.
#[derive(Debug, Clone, Default)]
pub struct AnalyticBackend {
    ayanamsa: Option<Ayanamsa>,
    topocentric: Option<GeoLocation>,
    tidal_model: TidalModel,
}

impl AnalyticBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn centuries_tt(&self, jd_ut: f64) -> f64 {
        jd_to_centuries(ut_to_tt(jd_ut, self.tidal_model))
    }

    /// `(lon, lat, dist)` of `body` at `jd_ut`, tropical, before sidereal shift.
    fn tropical_position(
        &self,
        jd_ut: f64,
        body: Body,
        center: Center,
    ) -> Result<(f64, f64, f64), BackendError> {
        let t = self.centuries_tt(jd_ut);
        if let Some(lon) = lunar_point_longitude(body, t) {
            if center == Center::Heliocentric {
                return Err(BackendError::new(format!(
                    "heliocentric position undefined for {body}"
                )));
            }
            return Ok((lon, 0.0, MEAN_MOON_DISTANCE_AU));
        }

        let v = match center {
            Center::Geocentric => geocentric_vector(body, t)?,
            Center::Heliocentric => heliocentric_vector(body, t)?,
            Center::Topocentric => {
                let loc = self
                    .topocentric
                    .ok_or_else(|| BackendError::new("topocentric requested without observer"))?;
                let geo = geocentric_vector(body, t)?;
                let eps = mean_obliquity_deg(t).to_radians();
                let observer = equatorial_to_ecliptic_vec(
                    &observer_equatorial_au(jd_ut, loc.latitude_deg, loc.longitude_deg, loc.altitude_m),
                    eps,
                );
                [geo[0] - observer[0], geo[1] - observer[1], geo[2] - observer[2]]
            }
        };
        Ok(cartesian_to_spherical(&v))
    }

    fn shifted_position(
        &self,
        jd_ut: f64,
        body: Body,
        flags: SampleFlags,
    ) -> Result<(f64, f64, f64), BackendError> {
        let (lon, lat, dist) = self.tropical_position(jd_ut, body, flags.center)?;
        if !flags.sidereal {
            return Ok((lon, lat, dist));
        }
        let system = self
            .ayanamsa
            .ok_or_else(|| BackendError::new("sidereal position requested in tropical mode"))?;
        let offset = ayanamsa_deg(system, self.centuries_tt(jd_ut));
        Ok((normalize_deg(lon - offset), lat, dist))
    }

    fn equatorial_of_date(&self, jd_ut: f64, body: Body) -> Result<(f64, f64), BackendError> {
        let (lon, lat, _) = self.tropical_position(jd_ut, body, Center::Geocentric)?;
        let eps = mean_obliquity_deg(self.centuries_tt(jd_ut)).to_radians();
        Ok(ecliptic_to_equatorial(lon.to_radians(), lat.to_radians(), eps))
    }
}

fn check_range(jd: f64) -> Result<(), BackendError> {
    let year = 2000.0 + (jd - J2000_JD) / 365.25;
    if !jd.is_finite() || !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(BackendError::new(format!(
            "jd {jd} outside supported range (years {MIN_YEAR} to {MAX_YEAR})"
        )));
    }
    Ok(())
}

/// Longitude of the lunar node or apogee; `None` for real bodies.
fn lunar_point_longitude(body: Body, t: f64) -> Option<f64> {
    match body {
        Body::MeanNode => Some(mean_node_deg(t)),
        Body::TrueNode => Some(true_node_deg(t)),
        Body::MeanApogee => {
            let args = LunarArguments::at(t);
            Some(normalize_deg(args.mean_longitude - args.moon_anomaly + 180.0))
        }
        _ => None,
    }
}

/// Rotate a J2000 ecliptic vector to the mean equinox of date.
fn precess_to_date(v: [f64; 3], t: f64) -> [f64; 3] {
    let (s, c) = general_precession_longitude_deg(t).to_radians().sin_cos();
    [c * v[0] - s * v[1], s * v[0] + c * v[1], v[2]]
}

fn moon_vector(t: f64) -> [f64; 3] {
    let (lon, lat, dist_km) = moon_position(t);
    spherical_to_cartesian(lon, lat, dist_km / AU_KM)
}

fn no_ephemeris(body: Body) -> BackendError {
    BackendError::new(format!("no ephemeris for {body}"))
}

fn geocentric_vector(body: Body, t: f64) -> Result<[f64; 3], BackendError> {
    let earth = earth_heliocentric_j2000(t);
    let v = match body {
        Body::Sun => [-earth[0], -earth[1], -earth[2]],
        Body::Moon => return Ok(moon_vector(t)),
        _ => {
            let relative = |tau: f64| -> Option<[f64; 3]> {
                let p = heliocentric_j2000(body, t - tau)?;
                Some([p[0] - earth[0], p[1] - earth[1], p[2] - earth[2]])
            };
            let first = relative(0.0).ok_or_else(|| no_ephemeris(body))?;
            let distance = (first[0] * first[0] + first[1] * first[1] + first[2] * first[2]).sqrt();
            relative(distance * LIGHT_TIME_DAYS_PER_AU / 36_525.0).ok_or_else(|| no_ephemeris(body))?
        }
    };
    Ok(precess_to_date(v, t))
}

fn heliocentric_vector(body: Body, t: f64) -> Result<[f64; 3], BackendError> {
    match body {
        Body::Sun => Err(BackendError::new("heliocentric position undefined for Sun")),
        Body::Moon => {
            let earth = precess_to_date(earth_heliocentric_j2000(t), t);
            let moon = moon_vector(t);
            Ok([earth[0] + moon[0], earth[1] + moon[1], earth[2] + moon[2]])
        }
        _ => heliocentric_j2000(body, t)
            .map(|v| precess_to_date(v, t))
            .ok_or_else(|| no_ephemeris(body)),
    }
}

impl EphemerisBackend for AnalyticBackend {
    fn sample(&mut self, jd: f64, body: Body, flags: SampleFlags) -> Result<RawSample, BackendError> {
        check_range(jd)?;
        let (lon, lat, dist) = self.shifted_position(jd, body, flags)?;
        let (lon_a, lat_a, dist_a) = self.shifted_position(jd - SPEED_STEP_DAYS, body, flags)?;
        let (lon_b, lat_b, dist_b) = self.shifted_position(jd + SPEED_STEP_DAYS, body, flags)?;
        let span = 2.0 * SPEED_STEP_DAYS;
        let dlon = (lon_b - lon_a + 540.0).rem_euclid(360.0) - 180.0;
        Ok(RawSample {
            longitude_deg: lon,
            latitude_deg: lat,
            distance_au: dist,
            speed_longitude: dlon / span,
            speed_latitude: (lat_b - lat_a) / span,
            speed_distance: (dist_b - dist_a) / span,
        })
    }

    fn houses(
        &mut self,
        jd: f64,
        latitude_deg: f64,
        longitude_deg: f64,
        system: HouseSystem,
    ) -> Result<HouseData, BackendError> {
        check_range(jd)?;
        let t = self.centuries_tt(jd);
        let eps = mean_obliquity_deg(t).to_radians();
        let armc = local_sidereal_time_rad(jd, longitude_deg);
        let data = houses::compute_houses(armc, latitude_deg.to_radians(), eps, system)
            .map_err(|e| BackendError::new(e.to_string()))?;
        Ok(match self.ayanamsa {
            Some(sidereal) => houses::to_sidereal(data, ayanamsa_deg(sidereal, t)),
            None => data,
        })
    }

    fn horizon_event(
        &mut self,
        jd: f64,
        body: Body,
        event: HorizonEvent,
        location: &GeoLocation,
    ) -> Result<Option<f64>, BackendError> {
        check_range(jd)?;
        let this = &*self;
        horizon::next_event(
            jd,
            event,
            location.latitude_deg,
            location.longitude_deg,
            horizon::standard_altitude_deg(body),
            |t| this.equatorial_of_date(t, body),
        )
    }

    fn eclipse_search(
        &mut self,
        kind: EclipseKind,
        jd: f64,
        backward: bool,
    ) -> Result<Option<EclipseHit>, BackendError> {
        check_range(jd)?;
        Ok(eclipse::search(kind, jd, backward, self.tidal_model))
    }

    fn ayanamsa(&mut self, jd: f64) -> Result<f64, BackendError> {
        check_range(jd)?;
        Ok(self
            .ayanamsa
            .map_or(0.0, |system| ayanamsa_deg(system, self.centuries_tt(jd))))
    }

    fn set_sidereal_mode(&mut self, ayanamsa: Option<Ayanamsa>) {
        debug!(?ayanamsa, "sidereal mode");
        self.ayanamsa = ayanamsa;
    }

    fn set_topocentric(&mut self, location: Option<GeoLocation>) {
        debug!(?location, "topocentric observer");
        self.topocentric = location;
    }

    fn set_tidal_model(&mut self, model: TidalModel) {
        debug!(?model, "tidal model");
        self.tidal_model = model;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angle_diff(a: f64, b: f64) -> f64 {
        ((a - b + 540.0).rem_euclid(360.0) - 180.0).abs()
    }

    #[test]
    fn sun_at_j2000() {
        let mut b = AnalyticBackend::new();
        let s = b.sample(J2000_JD, Body::Sun, SampleFlags::TROPICAL).unwrap();
        // Apparent 280.37°; geometric is ~20″ larger.
        assert!(angle_diff(s.longitude_deg, 280.38) < 0.05, "lon = {}", s.longitude_deg);
        assert!((s.speed_longitude - 1.019).abs() < 0.01);
        assert!((s.distance_au - 0.9833).abs() < 0.001);
    }

    #[test]
    fn sidereal_requires_ayanamsa() {
        let mut b = AnalyticBackend::new();
        assert!(b.sample(J2000_JD, Body::Sun, SampleFlags::SIDEREAL).is_err());
        b.set_sidereal_mode(Some(Ayanamsa::Lahiri));
        let trop = b.sample(J2000_JD, Body::Sun, SampleFlags::TROPICAL).unwrap();
        let sid = b.sample(J2000_JD, Body::Sun, SampleFlags::SIDEREAL).unwrap();
        assert!(angle_diff(trop.longitude_deg - sid.longitude_deg, 23.853) < 0.01);
    }

    #[test]
    fn topocentric_requires_observer() {
        let mut b = AnalyticBackend::new();
        let flags = SampleFlags::TROPICAL.with_center(Center::Topocentric);
        assert!(b.sample(J2000_JD, Body::Moon, flags).is_err());
        b.set_topocentric(Some(GeoLocation::new(0.0, 0.0, 0.0)));
        let topo = b.sample(J2000_JD, Body::Moon, flags).unwrap();
        let geo = b.sample(J2000_JD, Body::Moon, SampleFlags::TROPICAL).unwrap();
        // Lunar parallax never exceeds ~1°.
        let shift = angle_diff(topo.longitude_deg, geo.longitude_deg);
        assert!(shift > 0.0 && shift < 1.1, "shift = {shift}");
    }

    #[test]
    fn heliocentric_sun_and_nodes_fail() {
        let mut b = AnalyticBackend::new();
        let helio = SampleFlags::TROPICAL.with_center(Center::Heliocentric);
        assert!(b.sample(J2000_JD, Body::Sun, helio).is_err());
        assert!(b.sample(J2000_JD, Body::MeanNode, helio).is_err());
        assert!(b.sample(J2000_JD, Body::Mars, helio).is_ok());
    }

    #[test]
    fn asteroids_unavailable() {
        let mut b = AnalyticBackend::new();
        let err = b.sample(J2000_JD, Body::Chiron, SampleFlags::TROPICAL).unwrap_err();
        assert!(err.0.contains("Chiron"), "{err}");
    }

    #[test]
    fn out_of_range_dates_fail() {
        let mut b = AnalyticBackend::new();
        assert!(b.sample(J2000_JD + 1_200.0 * 365.25, Body::Sun, SampleFlags::TROPICAL).is_err());
        assert!(b.sample(f64::NAN, Body::Sun, SampleFlags::TROPICAL).is_err());
    }

    #[test]
    fn mean_node_moves_backward() {
        let mut b = AnalyticBackend::new();
        let s = b.sample(J2000_JD, Body::MeanNode, SampleFlags::TROPICAL).unwrap();
        assert!((s.speed_longitude + 0.05295).abs() < 1e-3);
    }

    #[test]
    fn ayanamsa_zero_when_tropical() {
        let mut b = AnalyticBackend::new();
        assert_eq!(b.ayanamsa(J2000_JD).unwrap(), 0.0);
        b.set_sidereal_mode(Some(Ayanamsa::Lahiri));
        assert!((b.ayanamsa(J2000_JD).unwrap() - 23.853).abs() < 1e-3);
    }

    #[test]
    fn sidereal_houses_shift_ascendant() {
        let mut b = AnalyticBackend::new();
        let trop = b.houses(J2000_JD, 28.6, 77.2, HouseSystem::Equal).unwrap();
        b.set_sidereal_mode(Some(Ayanamsa::Lahiri));
        let sid = b.houses(J2000_JD, 28.6, 77.2, HouseSystem::Equal).unwrap();
        assert!(angle_diff(trop.ascendant_deg - sid.ascendant_deg, 23.853) < 0.01);
        assert_eq!(trop.armc_deg, sid.armc_deg);
    }
}
