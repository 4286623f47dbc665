//! Analytic ephemeris backend.
//!
//! A self-contained [`EphemerisBackend`](gochara_core::EphemerisBackend)
//! built from closed-form theories: Keplerian elements for the planets,
//! a truncated lunar series, Meeus eclipse elements and standard house
//! formulas. Precision is of the order of arcminutes, which is enough to
//! drive the event searches end to end without external data files.

pub mod ayanamsa;
pub mod backend;
pub mod delta_t;
pub mod eclipse;
pub mod frames;
pub mod horizon;
pub mod houses;
pub mod kepler;
pub mod moon;
pub mod nodes;

pub use backend::{AnalyticBackend, MAX_YEAR, MIN_YEAR};
pub use houses::HouseError;

use gochara_core::EngineHandle;

/// Engine handle over a fresh [`AnalyticBackend`] with default configuration.
pub fn analytic_engine() -> EngineHandle {
    EngineHandle::new(Box::new(AnalyticBackend::new()))
}
