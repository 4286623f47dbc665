//! Angle helpers, frame rotations, precession and sidereal time.
//!
//! Sources: IAU 2006 general precession (Capitaine, Wallace & Chapront
//! 2003, Table 1); mean obliquity (Meeus ch. 22); GMST polynomial
//! (Capitaine et al. 2003, Table 2) with UT1 taken equal to UT.

use std::f64::consts::{PI, TAU};

use gochara_time::J2000_JD;

/// Astronomical unit in km (IAU 2012 Resolution B2).
pub const AU_KM: f64 = 149_597_870.7;

/// Equatorial radius of the Earth in km (WGS-84).
pub const EARTH_RADIUS_KM: f64 = 6_378.137;

/// WGS-84 flattening.
const EARTH_FLATTENING: f64 = 1.0 / 298.257_223_563;

/// Arcseconds to radians: 1″ = π / (180 × 3600).
const ARCSEC_TO_RAD: f64 = PI / (180.0 * 3600.0);

/// Normalize degrees to [0, 360).
pub fn normalize_deg(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    if r >= 360.0 { 0.0 } else { r }
}

/// Wrap radians to (−π, π].
pub fn wrap_pi(rad: f64) -> f64 {
    let r = rad.rem_euclid(TAU);
    if r > PI { r - TAU } else { r }
}

/// IAU 2006 general precession in ecliptic longitude, degrees.
///
/// `t` is Julian centuries from J2000.0. Dominant term ≈ 1.3969°/century.
pub fn general_precession_longitude_deg(t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    let t5 = t4 * t;
    (5028.796195 * t + 1.1054348 * t2 + 0.00007964 * t3 - 0.000023857 * t4
        - 0.0000000383 * t5)
        / 3600.0
}

/// Mean obliquity of the ecliptic in degrees.
pub fn mean_obliquity_deg(t: f64) -> f64 {
    23.439_291_1 - 0.013_004_2 * t - 1.64e-7 * t * t + 5.04e-7 * t * t * t
}

/// Ecliptic (λ, β) to equatorial (α, δ), all radians. α in [0, 2π).
pub fn ecliptic_to_equatorial(lon: f64, lat: f64, eps: f64) -> (f64, f64) {
    let ra = f64::atan2(
        lon.sin() * eps.cos() - lat.tan() * eps.sin(),
        lon.cos(),
    );
    let dec = (lat.sin() * eps.cos() + lat.cos() * eps.sin() * lon.sin()).asin();
    (ra.rem_euclid(TAU), dec)
}

/// Equatorial (α, δ) to ecliptic (λ, β), all radians. λ in [0, 2π).
pub fn equatorial_to_ecliptic(ra: f64, dec: f64, eps: f64) -> (f64, f64) {
    let lon = f64::atan2(ra.sin() * eps.cos() + dec.tan() * eps.sin(), ra.cos());
    let lat = (dec.sin() * eps.cos() - dec.cos() * eps.sin() * ra.sin()).asin();
    (lon.rem_euclid(TAU), lat)
}

/// Cartesian to `(lon_deg [0, 360), lat_deg, radius)`.
pub fn cartesian_to_spherical(xyz: &[f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = *xyz;
    let r = (x * x + y * y + z * z).sqrt();
    if r == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let lon = normalize_deg(y.atan2(x).to_degrees());
    let lat = (z / r).asin().to_degrees();
    (lon, lat, r)
}

/// `(lon_deg, lat_deg, radius)` to Cartesian.
pub fn spherical_to_cartesian(lon_deg: f64, lat_deg: f64, r: f64) -> [f64; 3] {
    let (lon, lat) = (lon_deg.to_radians(), lat_deg.to_radians());
    [
        r * lat.cos() * lon.cos(),
        r * lat.cos() * lon.sin(),
        r * lat.sin(),
    ]
}

/// Greenwich Mean Sidereal Time in radians [0, 2π) at a UT Julian Day.
pub fn gmst_rad(jd_ut: f64) -> f64 {
    let du = jd_ut - J2000_JD;
    let era = TAU * (0.779_057_273_264_0 + 1.002_737_811_911_354_6 * du);
    let t = du / 36525.0;
    let t2 = t * t;
    let poly_arcsec = 0.014506 + 4612.156534 * t + 1.3915817 * t2
        - 0.00000044 * t2 * t
        - 0.000029956 * t2 * t2
        - 0.0000000368 * t2 * t2 * t;
    (era + poly_arcsec * ARCSEC_TO_RAD).rem_euclid(TAU)
}

/// Local sidereal time in radians [0, 2π).
pub fn local_sidereal_time_rad(jd_ut: f64, longitude_east_deg: f64) -> f64 {
    (gmst_rad(jd_ut) + longitude_east_deg.to_radians()).rem_euclid(TAU)
}

/// Geocentric equatorial-of-date position of an observer, in AU.
pub fn observer_equatorial_au(
    jd_ut: f64,
    latitude_deg: f64,
    longitude_deg: f64,
    altitude_m: f64,
) -> [f64; 3] {
    let phi = latitude_deg.to_radians();
    let b_over_a = 1.0 - EARTH_FLATTENING;
    let u = (b_over_a * phi.tan()).atan();
    let h = altitude_m / 1000.0 / EARTH_RADIUS_KM;
    let rho_sin = b_over_a * u.sin() + h * phi.sin();
    let rho_cos = u.cos() + h * phi.cos();
    let lst = local_sidereal_time_rad(jd_ut, longitude_deg);
    let scale = EARTH_RADIUS_KM / AU_KM;
    [
        scale * rho_cos * lst.cos(),
        scale * rho_cos * lst.sin(),
        scale * rho_sin,
    ]
}

/// Rotate an ecliptic vector into the equatorial frame of obliquity `eps`.
pub fn ecliptic_to_equatorial_vec(v: &[f64; 3], eps: f64) -> [f64; 3] {
    let (s, c) = eps.sin_cos();
    [v[0], c * v[1] - s * v[2], s * v[1] + c * v[2]]
}

/// Inverse of [`ecliptic_to_equatorial_vec`].
pub fn equatorial_to_ecliptic_vec(v: &[f64; 3], eps: f64) -> [f64; 3] {
    let (s, c) = eps.sin_cos();
    [v[0], c * v[1] + s * v[2], -s * v[1] + c * v[2]]
}
