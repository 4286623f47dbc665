//! ΔT = TT − UT.
//!
//! Piecewise model from Meeus, "Astronomical Algorithms" (2nd ed), ch. 10:
//! Stephenson & Houlden polynomials before 1620, the biennial table from
//! 1620 to 1992, interpolation of the 1990/2000/2010 values, then the
//! Espenak & Meeus polynomials for 2010 onwards. The tabulated values assume a lunar
//! tidal acceleration of −26″/cy²; other models are corrected with the
//! Stephenson & Morrison adjustment.

use gochara_core::TidalModel;

/// Tidal acceleration underlying the tabulated values, arcsec/cy².
const TABLE_TIDAL_ACCELERATION: f64 = -26.0;

const TERMS: usize = 187;

/// Biennial ΔT in seconds, 1620 to 1992.
#[rustfmt::skip]
const DELTA_T: [f64; TERMS] = [
    124.0,115.0,106.0, 98.0, 91.0, 85.0, 79.0, 74.0, 70.0, 65.0,
     62.0, 58.0, 55.0, 53.0, 50.0, 48.0, 46.0, 44.0, 42.0, 40.0,
     37.0, 35.0, 33.0, 31.0, 28.0, 26.0, 24.0, 22.0, 20.0, 18.0,
     16.0, 14.0, 13.0, 12.0, 11.0, 10.0,  9.0,  9.0,  9.0,  9.0,
      9.0,  9.0,  9.0,  9.0, 10.0, 10.0, 10.0, 10.0, 10.0, 11.0,
     11.0, 11.0, 11.0, 11.0, 11.0, 11.0, 12.0, 12.0, 12.0, 12.0,
     12.0, 12.0, 13.0, 13.0, 13.0, 13.0, 14.0, 14.0, 14.0, 15.0,
     15.0, 15.0, 15.0, 16.0, 16.0, 16.0, 16.0, 16.0, 17.0, 17.0,
     17.0, 17.0, 17.0, 17.0, 17.0, 17.0, 16.0, 16.0, 15.0, 14.0,
     13.7, 13.1, 12.7, 12.5, 12.5, 12.5, 12.5, 12.5, 12.5, 12.3,
     12.0, 11.4, 10.6,  9.6,  8.6,  7.5,  6.6,  6.0,  5.7,  5.6,
      5.7,  5.9,  6.2,  6.5,  6.8,  7.1,  7.3,  7.5,  7.7,  7.8,
      7.9,  7.5,  6.4,  5.4,  2.9,  1.6, -1.0, -2.7, -3.6, -4.7,
     -5.4, -5.2, -5.5, -5.6, -5.8, -5.9, -6.2, -6.4, -6.1, -4.7,
     -2.7,  0.0,  2.6,  5.4,  7.7, 10.5, 13.4, 16.0, 18.2, 20.2,
     21.2, 22.4, 23.5, 23.9, 24.3, 24.0, 23.9, 23.9, 23.7, 24.0,
     24.3, 25.3, 26.2, 27.3, 28.2, 29.1, 30.0, 30.7, 31.4, 32.2,
     33.1, 34.0, 35.0, 36.5, 38.3, 40.2, 42.2, 44.5, 46.5, 48.5,
     50.5, 52.2, 53.8, 54.9, 55.8, 56.9, 58.3,
];

const JULIAN_CENTURY_DAYS: f64 = 36_525.0;

// ---------------------------------------------------------------------------
// Piecewise sections
// ---------------------------------------------------------------------------

/// Before 948 CE.
fn ancient(jd: f64) -> f64 {
    let c = (jd - 2_067_314.5) / JULIAN_CENTURY_DAYS;
    1_830.0 - 405.0 * c + 46.5 * c * c
}

/// 948 to 1620 CE.
fn medieval(jd: f64) -> f64 {
    let c = (jd - 2_396_758.5) / JULIAN_CENTURY_DAYS;
    22.5 * c * c
}

/// 1620 to 1992, interpolated in the biennial table.
fn tabulated(jd: f64) -> f64 {
    const TABLE_START_JD: f64 = 2_312_752.5;
    const STEP_DAYS: f64 = 730.5;

    let i = (((jd - TABLE_START_JD) / STEP_DAYS) as usize).min(TERMS - 3);
    let a = DELTA_T[i + 1] - DELTA_T[i];
    let b = DELTA_T[i + 2] - DELTA_T[i + 1];
    let c = a - b;
    let n = (jd - (TABLE_START_JD + STEP_DAYS * (i + 1) as f64)) / STEP_DAYS;
    DELTA_T[i + 1] + n / 2.0 * (a + b + n * c)
}

/// 1992 to 2010, through the 1990/2000/2010 values.
fn recent(jd: f64) -> f64 {
    const DT: [f64; 3] = [56.86, 63.83, 70.0];
    let a = DT[1] - DT[0];
    let b = DT[2] - DT[1];
    let c = b - a;
    let n = (jd - 2_451_544.5) / 3_652.5;
    DT[1] + n / 2.0 * (a + b + n * c)
}

/// After 2010.
fn extrapolated(jd: f64) -> f64 {
    let year = 2000.0 + (jd - 2_451_544.5) / 365.25;
    let u = (year - 1820.0) / 100.0;
    if year < 2050.0 {
        let t = year - 2000.0;
        62.92 + 0.32217 * t + 0.005589 * t * t
    } else if year < 2150.0 {
        -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - year)
    } else {
        -20.0 + 32.0 * u * u
    }
}

/// ΔT in seconds at a UT Julian Day, using the default tidal model.
pub fn delta_t_seconds(jd_ut: f64) -> f64 {
    match jd_ut {
        jd if jd < 2_067_314.5 => ancient(jd),
        jd if jd < 2_312_752.5 => medieval(jd),
        jd if jd < 2_448_622.5 => tabulated(jd),
        jd if jd <= 2_455_197.5 => recent(jd),
        jd => extrapolated(jd),
    }
}

/// ΔT in seconds adjusted for `model`'s lunar tidal acceleration.
pub fn delta_t_with_tidal(jd_ut: f64, model: TidalModel) -> f64 {
    let base = delta_t_seconds(jd_ut);
    let year = 2000.0 + (jd_ut - 2_451_544.5) / 365.25;
    let dn = model.acceleration_arcsec_cy2() - TABLE_TIDAL_ACCELERATION;
    base - 0.000_091 * dn * (year - 1955.0).powi(2)
}

/// Convert a UT Julian Day to TT.
pub fn ut_to_tt(jd_ut: f64, model: TidalModel) -> f64 {
    jd_ut + delta_t_with_tidal(jd_ut, model) / 86_400.0
}

/// Convert a TT Julian Day to UT (three fixed-point iterations).
pub fn tt_to_ut(jd_tt: f64, model: TidalModel) -> f64 {
    let mut ut = jd_tt;
    for _ in 0..3 {
        ut = jd_tt - delta_t_with_tidal(ut, model) / 86_400.0;
    }
    ut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_2000_near_64_seconds() {
        let dt = delta_t_seconds(2_451_544.5);
        assert!((dt - 63.83).abs() < 0.01, "ΔT = {dt}");
    }

    #[test]
    fn year_1900_from_table() {
        // 1900-Jan-01: ΔT ≈ −2.7 s
        let dt = delta_t_seconds(2_415_020.5);
        assert!((dt + 2.7).abs() < 1.5, "ΔT = {dt}");
    }

    #[test]
    fn sections_join_without_large_jumps() {
        for edge in [2_448_622.5, 2_455_197.5] {
            let before = delta_t_seconds(edge - 1e-3);
            let after = delta_t_seconds(edge + 1e-3);
            assert!((before - after).abs() < 4.0, "jump at {edge}: {before} vs {after}");
        }
    }

    #[test]
    fn year_2024_near_69_seconds() {
        let dt = delta_t_seconds(2_460_310.5);
        assert!((dt - 69.2).abs() < 6.0, "ΔT = {dt}");
    }

    #[test]
    fn tidal_correction_vanishes_at_1955() {
        let jd_1955 = 2_435_108.5;
        let a = delta_t_with_tidal(jd_1955, TidalModel::De200);
        let b = delta_t_seconds(jd_1955);
        assert!((a - b).abs() < 1e-3);
    }

    #[test]
    fn tidal_models_differ_far_from_1955() {
        let jd_1600 = 2_305_447.5;
        let a = delta_t_with_tidal(jd_1600, TidalModel::De200);
        let b = delta_t_with_tidal(jd_1600, TidalModel::De431);
        assert!((a - b).abs() > 1.0);
    }

    #[test]
    fn tt_ut_roundtrip() {
        let jd = 2_460_409.25;
        let back = tt_to_ut(ut_to_tt(jd, TidalModel::Automatic), TidalModel::Automatic);
        assert!((back - jd).abs() < 1e-9);
    }
}
