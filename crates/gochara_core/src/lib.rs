//! Engine Access Coordinator.
//!
//! This crate provides the [`EngineHandle`] that owns the one shared
//! ephemeris backend, serializes every call to it behind a re-entrant lock,
//! and scopes changes to the backend's global configuration
//! (ayanamsa, topocentric observer, tidal model).
//!
//! The backend itself is reached only through the [`EphemerisBackend`] trait.

pub mod backend;
pub mod body;
pub mod config;
pub mod error;
pub mod handle;

pub use backend::{
    BackendError, Center, EclipseClass, EclipseHit, EclipseKind, EphemerisBackend, HorizonEvent,
    HouseData, HouseSystem, RawSample, SampleFlags,
};
pub use body::{Body, SUPPORTED_BODIES};
pub use config::{Ayanamsa, ConfigOverrides, EngineConfig, GeoLocation, TidalModel};
pub use error::EngineError;
pub use handle::{EngineHandle, ScopedConfig};

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time assertion: EngineHandle must be Send + Sync.
    #[allow(dead_code)]
    const _: () = {
        fn assert_send_sync<T: Send + Sync>() {}
        fn check() {
            assert_send_sync::<EngineHandle>();
            assert_send_sync::<EngineError>();
        }
    };
}
