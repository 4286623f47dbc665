//! Eclipse prediction from lunation elements (Meeus ch. 54).
//!
//! Each new moon (integer `k`) or full moon (`k + 0.5`) is tested against
//! the lunar node; when an eclipse is possible, γ (least distance of the
//! shadow axis from the Earth's center, in Earth radii) and u (umbral
//! cone radius) decide its class.

use gochara_core::{EclipseClass, EclipseHit, EclipseKind, TidalModel};
use gochara_time::J2000_JD;

use crate::delta_t::tt_to_ut;

/// Lunations scanned before giving up (about 160 years).
const MAX_LUNATIONS: i64 = 2_000;

const LUNATIONS_PER_YEAR: f64 = 12.3685;

/// Eclipse at lunation `k`, peak in TT. `None` when there is none.
fn eclipse_at_lunation(k: f64, kind: EclipseKind) -> Option<(EclipseClass, f64)> {
    let t = k / 1236.85;
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;

    let f = (160.7108 + 390.670_502_84 * k - 0.001_611_8 * t2 - 0.000_002_27 * t3
        + 0.000_000_011 * t4)
        .to_radians();
    if f.sin().abs() > 0.36 {
        return None;
    }

    let jde = 2_451_550.097_66 + 29.530_588_861 * k + 0.000_154_37 * t2 - 0.000_000_150 * t3
        + 0.000_000_000_73 * t4;
    let m = (2.5534 + 29.105_356_70 * k - 0.000_001_4 * t2 - 0.000_000_11 * t3).to_radians();
    let mp = (201.5643 + 385.816_935_28 * k + 0.010_758_2 * t2 + 0.000_012_38 * t3
        - 0.000_000_058 * t4)
        .to_radians();
    let omega = (124.7746 - 1.563_755_88 * k + 0.002_067_2 * t2 + 0.000_002_15 * t3).to_radians();
    let e = 1.0 - 0.002_516 * t - 0.000_007_4 * t2;

    let f1 = f - 0.02665_f64.to_radians() * omega.sin();
    let a1 = (299.77 + 0.107_408 * k - 0.009_173 * t2).to_radians();

    let (c_mp, c_m) = match kind {
        EclipseKind::Solar => (-0.4075, 0.1721),
        EclipseKind::Lunar => (-0.4065, 0.1727),
    };
    let correction = c_mp * mp.sin() + c_m * e * m.sin() + 0.0161 * (2.0 * mp).sin()
        - 0.0097 * (2.0 * f1).sin()
        + 0.0073 * e * (mp - m).sin()
        - 0.0050 * e * (mp + m).sin()
        - 0.0023 * (mp - 2.0 * f1).sin()
        + 0.0021 * e * (2.0 * m).sin()
        + 0.0012 * (mp + 2.0 * f1).sin()
        + 0.0006 * e * (2.0 * mp + m).sin()
        - 0.0004 * (3.0 * mp).sin()
        - 0.0003 * e * (m + 2.0 * f1).sin()
        + 0.0003 * a1.sin()
        - 0.0002 * e * (m - 2.0 * f1).sin()
        - 0.0002 * e * (2.0 * mp - m).sin()
        - 0.0002 * omega.sin();

    let p = 0.2070 * e * m.sin() + 0.0024 * e * (2.0 * m).sin() - 0.0392 * mp.sin()
        + 0.0116 * (2.0 * mp).sin()
        - 0.0073 * e * (mp + m).sin()
        + 0.0067 * e * (mp - m).sin()
        + 0.0118 * (2.0 * f1).sin();
    let q = 5.2207 - 0.0048 * e * m.cos() + 0.0020 * e * (2.0 * m).cos() - 0.3299 * mp.cos()
        - 0.0060 * e * (mp + m).cos()
        + 0.0041 * e * (mp - m).cos();
    let w = f1.cos().abs();
    let gamma = (p * f1.cos() + q * f1.sin()) * (1.0 - 0.0048 * w);
    let u = 0.0059 + 0.0046 * e * m.cos() - 0.0182 * mp.cos() + 0.0004 * (2.0 * mp).cos()
        - 0.0005 * (m + mp).cos();

    let class = match kind {
        EclipseKind::Solar => classify_solar(gamma, u)?,
        EclipseKind::Lunar => classify_lunar(gamma, u)?,
    };
    Some((class, jde + correction))
}

fn classify_solar(gamma: f64, u: f64) -> Option<EclipseClass> {
    let g = gamma.abs();
    if g > 1.5433 + u {
        return None;
    }
    if g >= 0.9972 {
        return Some(EclipseClass::Partial);
    }
    let class = if u < 0.0 {
        EclipseClass::Total
    } else if u > 0.0047 {
        EclipseClass::Annular
    } else if u < 0.00464 * (1.0 - gamma * gamma).sqrt() {
        EclipseClass::Hybrid
    } else {
        EclipseClass::Annular
    };
    Some(class)
}

fn classify_lunar(gamma: f64, u: f64) -> Option<EclipseClass> {
    let g = gamma.abs();
    let penumbral = (1.5573 + u - g) / 0.5450;
    let umbral = (1.0128 - u - g) / 0.5450;
    if penumbral <= 0.0 {
        None
    } else if umbral >= 1.0 {
        Some(EclipseClass::Total)
    } else if umbral > 0.0 {
        Some(EclipseClass::Partial)
    } else {
        Some(EclipseClass::Penumbral)
    }
}

/// Next eclipse of `kind` after `jd_ut` (or the last one before it).
pub fn search(kind: EclipseKind, jd_ut: f64, backward: bool, tidal: TidalModel) -> Option<EclipseHit> {
    let offset = match kind {
        EclipseKind::Solar => 0.0,
        EclipseKind::Lunar => 0.5,
    };
    let approx = (jd_ut - J2000_JD) / 365.25 * LUNATIONS_PER_YEAR;
    let (first, step) = if backward {
        (approx.ceil() as i64 + 1, -1)
    } else {
        (approx.floor() as i64 - 1, 1)
    };

    (0..MAX_LUNATIONS)
        .map(|n| (first + n * step) as f64 + offset)
        .filter_map(|k| eclipse_at_lunation(k, kind))
        .map(|(class, jde)| EclipseHit {
            kind,
            class,
            peak_jd: tt_to_ut(jde, tidal),
        })
        .find(|hit| {
            if backward {
                hit.peak_jd < jd_ut
            } else {
                hit.peak_jd > jd_ut
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DE431: TidalModel = TidalModel::De431;

    #[test]
    fn great_american_eclipse_2024() {
        // 2024-Apr-08, greatest eclipse 18:17 UT
        let hit = search(EclipseKind::Solar, 2_460_400.5, false, DE431).unwrap();
        assert_eq!(hit.class, EclipseClass::Total);
        assert!((hit.peak_jd - 2_460_409.262).abs() < 0.1, "peak = {}", hit.peak_jd);
    }

    #[test]
    fn total_lunar_eclipse_march_2025() {
        // 2025-Mar-14, greatest eclipse 06:59 UT
        let hit = search(EclipseKind::Lunar, 2_460_700.5, false, DE431).unwrap();
        assert_eq!(hit.class, EclipseClass::Total);
        assert!((hit.peak_jd - 2_460_748.79).abs() < 0.1, "peak = {}", hit.peak_jd);
    }

    #[test]
    fn backward_search_finds_previous() {
        let hit = search(EclipseKind::Solar, 2_460_420.5, true, DE431).unwrap();
        assert!((hit.peak_jd - 2_460_409.262).abs() < 0.1);
    }

    #[test]
    fn forward_result_strictly_after_start() {
        let first = search(EclipseKind::Lunar, 2_460_000.5, false, DE431).unwrap();
        let second = search(EclipseKind::Lunar, first.peak_jd, false, DE431).unwrap();
        assert!(second.peak_jd > first.peak_jd + 10.0);
    }

    #[test]
    fn lunar_magnitude_classes() {
        assert_eq!(classify_lunar(0.0, 0.0), Some(EclipseClass::Total));
        assert_eq!(classify_lunar(0.8, 0.0), Some(EclipseClass::Partial));
        assert_eq!(classify_lunar(1.2, 0.0), Some(EclipseClass::Penumbral));
        assert_eq!(classify_lunar(1.7, 0.0), None);
    }

    #[test]
    fn solar_classes() {
        assert_eq!(classify_solar(0.3, -0.01), Some(EclipseClass::Total));
        assert_eq!(classify_solar(0.3, 0.01), Some(EclipseClass::Annular));
        assert_eq!(classify_solar(1.2, 0.0), Some(EclipseClass::Partial));
        assert_eq!(classify_solar(1.6, 0.0), None);
    }
}
