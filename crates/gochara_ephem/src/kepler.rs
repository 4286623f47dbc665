//! Heliocentric planet positions from mean Keplerian elements.
//!
//! Elements and rates are the JPL "approximate positions of the planets"
//! set (Standish), fitted for 1800–2050 and referred to the mean ecliptic
//! and equinox of J2000. Accuracy is of the order of arcminutes for the
//! inner planets and a few arcminutes for the outer ones.

use gochara_core::Body;

/// Elements at J2000 and their rates per Julian century.
#[derive(Debug, Clone, Copy)]
struct Elements {
    /// Semi-major axis (AU).
    a: [f64; 2],
    /// Eccentricity.
    e: [f64; 2],
    /// Inclination (deg).
    i: [f64; 2],
    /// Mean longitude (deg).
    l: [f64; 2],
    /// Longitude of perihelion (deg).
    peri: [f64; 2],
    /// Longitude of the ascending node (deg).
    node: [f64; 2],
}

#[rustfmt::skip]
const MERCURY: Elements = Elements {
    a: [0.387_099_27, 0.000_000_37], e: [0.205_635_93, 0.000_019_06],
    i: [7.004_979_02, -0.005_947_49], l: [252.250_323_50, 149_472.674_111_75],
    peri: [77.457_796_28, 0.160_476_89], node: [48.330_765_93, -0.125_340_81],
};
#[rustfmt::skip]
const VENUS: Elements = Elements {
    a: [0.723_335_66, 0.000_003_90], e: [0.006_776_72, -0.000_041_07],
    i: [3.394_676_05, -0.000_788_90], l: [181.979_099_50, 58_517.815_387_29],
    peri: [131.602_467_18, 0.002_683_29], node: [76.679_842_55, -0.277_694_18],
};
#[rustfmt::skip]
const EM_BARYCENTER: Elements = Elements {
    a: [1.000_002_61, 0.000_005_62], e: [0.016_711_23, -0.000_043_92],
    i: [-0.000_015_31, -0.012_946_68], l: [100.464_571_66, 35_999.372_449_81],
    peri: [102.937_681_93, 0.323_273_64], node: [0.0, 0.0],
};
#[rustfmt::skip]
const MARS: Elements = Elements {
    a: [1.523_710_34, 0.000_018_47], e: [0.093_394_10, 0.000_078_82],
    i: [1.849_691_42, -0.008_131_31], l: [-4.553_432_05, 19_140.302_684_99],
    peri: [-23.943_629_59, 0.444_410_88], node: [49.559_538_91, -0.292_573_43],
};
#[rustfmt::skip]
const JUPITER: Elements = Elements {
    a: [5.202_887_00, -0.000_116_07], e: [0.048_386_24, -0.000_132_53],
    i: [1.304_396_95, -0.001_837_14], l: [34.396_440_51, 3_034.746_127_75],
    peri: [14.728_479_83, 0.212_526_68], node: [100.473_909_09, 0.204_691_06],
};
#[rustfmt::skip]
const SATURN: Elements = Elements {
    a: [9.536_675_94, -0.001_250_60], e: [0.053_861_79, -0.000_509_91],
    i: [2.485_991_87, 0.001_936_09], l: [49.954_244_23, 1_222.493_622_01],
    peri: [92.598_878_31, -0.418_972_16], node: [113.662_424_48, -0.288_677_94],
};
#[rustfmt::skip]
const URANUS: Elements = Elements {
    a: [19.189_164_64, -0.001_961_76], e: [0.047_257_44, -0.000_043_97],
    i: [0.772_637_83, -0.002_429_39], l: [313.238_104_51, 428.482_027_85],
    peri: [170.954_276_30, 0.408_052_81], node: [74.016_925_03, 0.042_405_89],
};
#[rustfmt::skip]
const NEPTUNE: Elements = Elements {
    a: [30.069_922_76, 0.000_262_91], e: [0.008_590_48, 0.000_051_05],
    i: [1.770_043_47, 0.000_353_72], l: [-55.120_029_69, 218.459_453_25],
    peri: [44.964_762_27, -0.322_414_64], node: [131.784_225_74, -0.005_086_64],
};
#[rustfmt::skip]
const PLUTO: Elements = Elements {
    a: [39.482_116_75, -0.000_315_96], e: [0.248_827_30, 0.000_051_70],
    i: [17.140_012_06, 0.000_048_18], l: [238.929_038_33, 145.207_805_15],
    peri: [224.068_916_29, -0.040_629_42], node: [110.303_936_84, -0.011_834_82],
};

fn elements_for(body: Body) -> Option<&'static Elements> {
    match body {
        Body::Mercury => Some(&MERCURY),
        Body::Venus => Some(&VENUS),
        Body::Mars => Some(&MARS),
        Body::Jupiter => Some(&JUPITER),
        Body::Saturn => Some(&SATURN),
        Body::Uranus => Some(&URANUS),
        Body::Neptune => Some(&NEPTUNE),
        Body::Pluto => Some(&PLUTO),
        _ => None,
    }
}

/// Solve Kepler's equation `E − e·sin E = M` (radians) by Newton iteration.
pub fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let m = mean_anomaly;
    let mut ecc_anom = if e < 0.8 { m } else { std::f64::consts::PI };
    for _ in 0..30 {
        let delta = (ecc_anom - e * ecc_anom.sin() - m) / (1.0 - e * ecc_anom.cos());
        ecc_anom -= delta;
        if delta.abs() < 1e-14 {
            break;
        }
    }
    ecc_anom
}

fn heliocentric_from(el: &Elements, t: f64) -> [f64; 3] {
    let at = |p: [f64; 2]| p[0] + p[1] * t;
    let a = at(el.a);
    let e = at(el.e);
    let i = at(el.i).to_radians();
    let l = at(el.l);
    let peri = at(el.peri);
    let node = at(el.node);

    let omega = (peri - node).to_radians();
    let node = node.to_radians();
    let m = (l - peri).to_radians().rem_euclid(std::f64::consts::TAU);
    let ea = solve_kepler(m, e);

    let xp = a * (ea.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * ea.sin();

    let (so, co) = omega.sin_cos();
    let (sn, cn) = node.sin_cos();
    let (si, ci) = i.sin_cos();

    [
        (co * cn - so * sn * ci) * xp + (-so * cn - co * sn * ci) * yp,
        (co * sn + so * cn * ci) * xp + (-so * sn + co * cn * ci) * yp,
        (so * si) * xp + (co * si) * yp,
    ]
}

/// Heliocentric position (AU, J2000 ecliptic) of a planet at `t` Julian
/// centuries TT from J2000. `None` for bodies without elements.
pub fn heliocentric_j2000(body: Body, t: f64) -> Option<[f64; 3]> {
    elements_for(body).map(|el| heliocentric_from(el, t))
}

/// Heliocentric position of the Earth–Moon barycenter.
pub fn earth_heliocentric_j2000(t: f64) -> [f64; 3] {
    heliocentric_from(&EM_BARYCENTER, t)
}

/// Sidereal orbital period in days, from the mean-longitude rate.
pub fn orbital_period_days(body: Body) -> Option<f64> {
    elements_for(body).map(|el| 36_525.0 * 360.0 / el.l[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(v: [f64; 3]) -> f64 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    #[test]
    fn kepler_circular_identity() {
        assert!((solve_kepler(1.234, 0.0) - 1.234).abs() < 1e-15);
    }

    #[test]
    fn kepler_residual_small() {
        let (m, e) = (0.3, 0.2488);
        let ea = solve_kepler(m, e);
        assert!((ea - e * ea.sin() - m).abs() < 1e-13);
    }

    #[test]
    fn earth_distance_near_one_au() {
        let r = norm(earth_heliocentric_j2000(0.24));
        assert!((0.983..=1.017).contains(&r), "r = {r}");
    }

    #[test]
    fn jupiter_distance_in_range() {
        let r = norm(heliocentric_j2000(Body::Jupiter, 0.1).unwrap());
        assert!((4.95..=5.46).contains(&r), "r = {r}");
    }

    #[test]
    fn no_elements_for_moon() {
        assert!(heliocentric_j2000(Body::Moon, 0.0).is_none());
    }

    #[test]
    fn periods_match_known_values() {
        let mars = orbital_period_days(Body::Mars).unwrap();
        assert!((mars - 687.0).abs() < 1.0, "Mars {mars}");
        let jupiter = orbital_period_days(Body::Jupiter).unwrap() / 365.25;
        assert!((jupiter - 11.86).abs() < 0.05, "Jupiter {jupiter}");
    }
}
