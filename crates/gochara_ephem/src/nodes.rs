//! Lunar ascending node.
//!
//! Mean node polynomial and the five-term true-node correction from Meeus,
//! "Astronomical Algorithms" (2nd ed), ch. 47.

use crate::moon::LunarArguments;

/// Mean longitude of the ascending node, degrees [0, 360).
pub fn mean_node_deg(t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    let t4 = t3 * t;
    (125.044_547_9 - 1_934.136_289_1 * t + 0.002_075_4 * t2 + t3 / 467_441.0
        - t4 / 60_616_000.0)
        .rem_euclid(360.0)
}

/// True (osculating) longitude of the ascending node, degrees [0, 360).
pub fn true_node_deg(t: f64) -> f64 {
    let args = LunarArguments::at(t);
    let d = args.elongation.to_radians();
    let m = args.sun_anomaly.to_radians();
    let mp = args.moon_anomaly.to_radians();
    let f = args.latitude_argument.to_radians();
    let correction = -1.4979 * (2.0 * (d - f)).sin() - 0.1500 * m.sin() - 0.1226 * (2.0 * d).sin()
        + 0.1176 * (2.0 * f).sin()
        - 0.0801 * (2.0 * (mp - f)).sin();
    (mean_node_deg(t) + correction).rem_euclid(360.0)
}
