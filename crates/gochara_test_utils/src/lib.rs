//! Test utilities for gochara development.
//!
//! Provides [`ScriptedBackend`], an [`EphemerisBackend`] whose bodies follow
//! closed-form motions, so search results can be checked against exact
//! answers. Every engine call is counted through a shared [`CallCounter`],
//! and the configuration the coordinator last wrote is observable through
//! [`ObservedConfig`].

#![allow(missing_docs)]

pub mod fixtures;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use gochara_core::{
    Ayanamsa, BackendError, Body, Center, EclipseHit, EclipseKind, EngineHandle, EphemerisBackend,
    GeoLocation, HorizonEvent, HouseData, HouseSystem, RawSample, SampleFlags, TidalModel,
};
use parking_lot::Mutex;

/// Motion of one body: `t ↦ (longitude_deg, speed_deg_per_day)`.
///
/// Longitude may run outside [0, 360); the backend normalizes it.
pub type Motion = Arc<dyn Fn(f64) -> (f64, f64) + Send + Sync>;

/// Horizon script: `(jd, body, event) ↦ next event time`.
pub type HorizonScript = Arc<dyn Fn(f64, Body, HorizonEvent) -> Option<f64> + Send + Sync>;

/// Shared count of engine calls (sample, houses, horizon, eclipse).
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::SeqCst);
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// Configuration as last written to the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackendConfig {
    pub ayanamsa: Option<Ayanamsa>,
    pub topocentric: Option<GeoLocation>,
    pub tidal_model: TidalModel,
}

/// Shared view of a [`ScriptedBackend`]'s global configuration.
#[derive(Debug, Clone)]
pub struct ObservedConfig(Arc<Mutex<BackendConfig>>);

impl ObservedConfig {
    pub fn get(&self) -> BackendConfig {
        *self.0.lock()
    }
}

/// Scripted ephemeris backend.
pub struct ScriptedBackend {
    motions: HashMap<Body, Motion>,
    heliocentric: HashMap<Body, Motion>,
    horizon: Option<HorizonScript>,
    eclipses: Vec<EclipseHit>,
    ayanamsa_deg: f64,
    failure: Option<String>,
    calls: CallCounter,
    config: ObservedConfig,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            motions: HashMap::new(),
            heliocentric: HashMap::new(),
            horizon: None,
            eclipses: Vec::new(),
            ayanamsa_deg: 24.0,
            failure: None,
            calls: CallCounter::default(),
            config: ObservedConfig(Arc::new(Mutex::new(BackendConfig {
                ayanamsa: None,
                topocentric: None,
                tidal_model: TidalModel::Automatic,
            }))),
        }
    }

    /// Script the motion of `body`.
    pub fn with_motion(mut self, body: Body, motion: Motion) -> Self {
        self.motions.insert(body, motion);
        self
    }

    /// Script the motion of `body` seen from the Sun. Heliocentric samples
    /// of bodies without one fail.
    pub fn with_heliocentric_motion(mut self, body: Body, motion: Motion) -> Self {
        self.heliocentric.insert(body, motion);
        self
    }

    pub fn with_horizon(mut self, script: HorizonScript) -> Self {
        self.horizon = Some(script);
        self
    }

    /// Eclipses the backend knows about, in any order.
    pub fn with_eclipses(mut self, mut eclipses: Vec<EclipseHit>) -> Self {
        eclipses.sort_by(|a, b| a.peak_jd.total_cmp(&b.peak_jd));
        self.eclipses = eclipses;
        self
    }

    /// Constant ayanamsa subtracted from sidereal samples.
    pub fn with_ayanamsa_deg(mut self, value: f64) -> Self {
        self.ayanamsa_deg = value;
        self
    }

    /// Make every call fail with `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn calls(&self) -> CallCounter {
        self.calls.clone()
    }

    pub fn observed_config(&self) -> ObservedConfig {
        self.config.clone()
    }

    /// Wrap into an [`EngineHandle`], returning the call counter alongside.
    pub fn into_handle(self) -> (EngineHandle, CallCounter) {
        let calls = self.calls();
        (EngineHandle::new(Box::new(self)), calls)
    }

    fn enter(&self) -> Result<(), BackendError> {
        self.calls.bump();
        match &self.failure {
            Some(msg) => Err(BackendError::new(msg.clone())),
            None => Ok(()),
        }
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl EphemerisBackend for ScriptedBackend {
    fn sample(&mut self, jd: f64, body: Body, flags: SampleFlags) -> Result<RawSample, BackendError> {
        self.enter()?;
        let motion = match flags.center {
            Center::Heliocentric => self.heliocentric.get(&body).ok_or_else(|| {
                BackendError::new(format!("no heliocentric motion scripted for {body}"))
            })?,
            _ => self
                .motions
                .get(&body)
                .ok_or_else(|| BackendError::new(format!("no motion scripted for {body}")))?,
        };
        let (lon, speed) = motion(jd);
        let offset = if flags.sidereal && self.config.get().ayanamsa.is_some() {
            self.ayanamsa_deg
        } else {
            0.0
        };
        Ok(RawSample {
            longitude_deg: (lon - offset).rem_euclid(360.0),
            latitude_deg: 0.0,
            distance_au: 1.0,
            speed_longitude: speed,
            speed_latitude: 0.0,
            speed_distance: 0.0,
        })
    }

    fn houses(
        &mut self,
        jd: f64,
        _latitude_deg: f64,
        longitude_deg: f64,
        _system: HouseSystem,
    ) -> Result<HouseData, BackendError> {
        self.enter()?;
        let armc = (jd.fract() * 360.985_647 + longitude_deg).rem_euclid(360.0);
        let asc = (armc + 90.0).rem_euclid(360.0);
        let mut cusps = [0.0; 12];
        for (i, c) in cusps.iter_mut().enumerate() {
            *c = (asc + 30.0 * i as f64).rem_euclid(360.0);
        }
        Ok(HouseData {
            cusps_deg: cusps,
            ascendant_deg: asc,
            mc_deg: armc,
            armc_deg: armc,
            vertex_deg: (asc + 180.0).rem_euclid(360.0),
        })
    }

    fn horizon_event(
        &mut self,
        jd: f64,
        body: Body,
        event: HorizonEvent,
        _location: &GeoLocation,
    ) -> Result<Option<f64>, BackendError> {
        self.enter()?;
        Ok(self.horizon.as_ref().and_then(|script| script(jd, body, event)))
    }

    fn eclipse_search(
        &mut self,
        kind: EclipseKind,
        jd: f64,
        backward: bool,
    ) -> Result<Option<EclipseHit>, BackendError> {
        self.enter()?;
        let mut of_kind = self.eclipses.iter().filter(|e| e.kind == kind);
        let hit = if backward {
            of_kind.filter(|e| e.peak_jd < jd).last()
        } else {
            of_kind.find(|e| e.peak_jd > jd)
        };
        Ok(hit.copied())
    }

    fn ayanamsa(&mut self, _jd: f64) -> Result<f64, BackendError> {
        Ok(if self.config.get().ayanamsa.is_some() {
            self.ayanamsa_deg
        } else {
            0.0
        })
    }

    fn set_sidereal_mode(&mut self, ayanamsa: Option<Ayanamsa>) {
        self.config.0.lock().ayanamsa = ayanamsa;
    }

    fn set_topocentric(&mut self, location: Option<GeoLocation>) {
        self.config.0.lock().topocentric = location;
    }

    fn set_tidal_model(&mut self, model: TidalModel) {
        self.config.0.lock().tidal_model = model;
    }
}
