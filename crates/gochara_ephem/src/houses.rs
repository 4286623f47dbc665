//! House cusps and angles.
//!
//! Ascendant and MC from local sidereal time and the obliquity of date
//! (Meeus ch. 13 relations). Porphyry trisects the quadrants in ecliptic
//! longitude; Placidus trisects each cusp's own diurnal or nocturnal
//! semi-arc in time, by fixed-point iteration.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use gochara_core::{HouseData, HouseSystem};

use crate::frames::normalize_deg;

/// Latitude beyond which Placidus cusps are undefined for some points.
pub const PLACIDUS_MAX_LATITUDE_DEG: f64 = 66.0;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum HouseError {
    #[error("Placidus houses are undefined at latitude {0}° (limit ±66°)")]
    PolarPlacidus(f64),
}

/// Ecliptic longitude of the ascendant, radians [0, 2π).
pub fn ascendant_rad(armc: f64, latitude: f64, eps: f64) -> f64 {
    f64::atan2(
        armc.cos(),
        -(armc.sin() * eps.cos() + latitude.tan() * eps.sin()),
    )
    .rem_euclid(TAU)
}

/// Ecliptic longitude of the MC, radians [0, 2π).
pub fn mc_rad(armc: f64, eps: f64) -> f64 {
    f64::atan2(armc.sin(), armc.cos() * eps.cos()).rem_euclid(TAU)
}

/// Compute cusps and angles (tropical) for ARMC, latitude and obliquity in radians.
pub fn compute_houses(
    armc: f64,
    latitude: f64,
    eps: f64,
    system: HouseSystem,
) -> Result<HouseData, HouseError> {
    let asc = ascendant_rad(armc, latitude, eps).to_degrees();
    let mc = mc_rad(armc, eps).to_degrees();
    // Vertex: western intersection of prime vertical and ecliptic.
    let colatitude = if latitude >= 0.0 {
        FRAC_PI_2 - latitude
    } else {
        -FRAC_PI_2 - latitude
    };
    let vertex = ascendant_rad(armc + PI, colatitude, eps).to_degrees();

    let cusps = match system {
        HouseSystem::Equal => equal(asc),
        HouseSystem::WholeSign => equal((asc / 30.0).floor() * 30.0),
        HouseSystem::Porphyry => porphyry(asc, mc),
        HouseSystem::Placidus => {
            if latitude.to_degrees().abs() > PLACIDUS_MAX_LATITUDE_DEG {
                return Err(HouseError::PolarPlacidus(latitude.to_degrees()));
            }
            placidus(asc, mc, armc, latitude, eps)
        }
    };

    Ok(HouseData {
        cusps_deg: cusps,
        ascendant_deg: asc,
        mc_deg: mc,
        armc_deg: normalize_deg(armc.to_degrees()),
        vertex_deg: vertex,
    })
}

/// Shift every longitude in `data` (not the ARMC) by `-offset_deg`.
pub fn to_sidereal(mut data: HouseData, offset_deg: f64) -> HouseData {
    for c in data.cusps_deg.iter_mut() {
        *c = normalize_deg(*c - offset_deg);
    }
    data.ascendant_deg = normalize_deg(data.ascendant_deg - offset_deg);
    data.mc_deg = normalize_deg(data.mc_deg - offset_deg);
    data.vertex_deg = normalize_deg(data.vertex_deg - offset_deg);
    data
}

fn equal(start_deg: f64) -> [f64; 12] {
    let mut cusps = [0.0; 12];
    for (i, cusp) in cusps.iter_mut().enumerate() {
        *cusp = normalize_deg(start_deg + i as f64 * 30.0);
    }
    cusps
}

fn arc_forward(a: f64, b: f64) -> f64 {
    (b - a).rem_euclid(360.0)
}

fn porphyry(asc: f64, mc: f64) -> [f64; 12] {
    let desc = normalize_deg(asc + 180.0);
    let ic = normalize_deg(mc + 180.0);
    let mut cusps = [0.0; 12];
    for (start, end, first) in [(asc, ic, 0), (ic, desc, 3), (desc, mc, 6), (mc, asc, 9)] {
        let arc = arc_forward(start, end);
        cusps[first] = start;
        cusps[first + 1] = normalize_deg(start + arc / 3.0);
        cusps[first + 2] = normalize_deg(start + 2.0 * arc / 3.0);
    }
    cusps
}

/// Ecliptic longitude (deg) of the ecliptic point with right ascension `ra`.
fn ecliptic_longitude_of_ra(ra: f64, eps: f64) -> f64 {
    normalize_deg(f64::atan2(ra.sin(), ra.cos() * eps.cos()).to_degrees())
}

fn diurnal_semi_arc(ra: f64, latitude: f64, eps: f64) -> f64 {
    let dec = (eps.tan() * ra.sin()).atan();
    (-(dec.tan() * latitude.tan())).clamp(-1.0, 1.0).acos()
}

/// Placidus cusp whose RA satisfies `ra = base + sign · fraction · semi_arc(ra)`.
fn placidus_cusp(base: f64, sign: f64, fraction: f64, diurnal: bool, latitude: f64, eps: f64) -> f64 {
    let mut ra = base + sign * fraction * FRAC_PI_2;
    for _ in 0..50 {
        let sa = diurnal_semi_arc(ra, latitude, eps);
        let arc = if diurnal { sa } else { PI - sa };
        let next = base + sign * fraction * arc;
        let converged = (next - ra).abs() < 1e-12;
        ra = next;
        if converged {
            break;
        }
    }
    ecliptic_longitude_of_ra(ra, eps)
}

fn placidus(asc: f64, mc: f64, armc: f64, latitude: f64, eps: f64) -> [f64; 12] {
    let mut cusps = [0.0; 12];
    cusps[0] = asc;
    cusps[3] = normalize_deg(mc + 180.0);
    cusps[6] = normalize_deg(asc + 180.0);
    cusps[9] = mc;

    cusps[10] = placidus_cusp(armc, 1.0, 1.0 / 3.0, true, latitude, eps);
    cusps[11] = placidus_cusp(armc, 1.0, 2.0 / 3.0, true, latitude, eps);
    cusps[1] = placidus_cusp(armc + PI, -1.0, 2.0 / 3.0, false, latitude, eps);
    cusps[2] = placidus_cusp(armc + PI, -1.0, 1.0 / 3.0, false, latitude, eps);

    cusps[4] = normalize_deg(cusps[10] + 180.0);
    cusps[5] = normalize_deg(cusps[11] + 180.0);
    cusps[7] = normalize_deg(cusps[1] + 180.0);
    cusps[8] = normalize_deg(cusps[2] + 180.0);
    cusps
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 0.409_092_8; // 23.4393°

    fn angle_diff(a: f64, b: f64) -> f64 {
        ((a - b + 540.0).rem_euclid(360.0) - 180.0).abs()
    }

    #[test]
    fn equator_armc_zero_gives_cancer_rising() {
        let asc = ascendant_rad(0.0, 0.0, EPS).to_degrees();
        assert!(angle_diff(asc, 90.0) < 1e-9, "asc = {asc}");
        assert!(angle_diff(mc_rad(0.0, EPS).to_degrees(), 0.0) < 1e-9);
    }

    #[test]
    fn ascendant_ahead_of_mc() {
        for k in 0..24 {
            let armc = k as f64 * 15.0_f64.to_radians();
            let asc = ascendant_rad(armc, 0.7, EPS).to_degrees();
            let mc = mc_rad(armc, EPS).to_degrees();
            let arc = arc_forward(mc, asc);
            assert!(arc > 0.0 && arc < 180.0, "armc {k}: mc {mc}, asc {asc}");
        }
    }

    #[test]
    fn whole_sign_starts_at_sign_boundary() {
        let h = compute_houses(1.0, 0.5, EPS, HouseSystem::WholeSign).unwrap();
        assert_eq!(h.cusps_deg[0] % 30.0, 0.0);
        assert!(angle_diff(h.cusps_deg[1], h.cusps_deg[0] + 30.0) < 1e-9);
    }

    #[test]
    fn porphyry_angles_on_quadrant_cusps() {
        let h = compute_houses(2.3, 0.6, EPS, HouseSystem::Porphyry).unwrap();
        assert_eq!(h.cusps_deg[0], h.ascendant_deg);
        assert_eq!(h.cusps_deg[9], h.mc_deg);
    }

    #[test]
    fn placidus_equals_porphyry_angles_and_is_ordered() {
        let h = compute_houses(4.0, 0.9, EPS, HouseSystem::Placidus).unwrap();
        assert_eq!(h.cusps_deg[0], h.ascendant_deg);
        let mut total = 0.0;
        for i in 0..12 {
            let arc = arc_forward(h.cusps_deg[i], h.cusps_deg[(i + 1) % 12]);
            assert!(arc > 0.0 && arc < 90.0, "house {} arc {arc}", i + 1);
            total += arc;
        }
        assert!((total - 360.0).abs() < 1e-6);
    }

    #[test]
    fn placidus_rejected_in_polar_circle() {
        let err = compute_houses(1.0, 70_f64.to_radians(), EPS, HouseSystem::Placidus).unwrap_err();
        assert!(matches!(err, HouseError::PolarPlacidus(_)));
    }

    #[test]
    fn sidereal_shift_keeps_armc() {
        let h = compute_houses(1.0, 0.5, EPS, HouseSystem::Equal).unwrap();
        let s = to_sidereal(h, 24.0);
        assert_eq!(s.armc_deg, h.armc_deg);
        assert!(angle_diff(s.ascendant_deg, h.ascendant_deg - 24.0) < 1e-9);
    }
}
