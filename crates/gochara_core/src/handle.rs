//! Engine Access Coordinator.
//!
//! [`EngineHandle`] owns the single backend instance and its global
//! configuration. Every read and every write goes through one re-entrant
//! lock. [`ScopedConfig`] holds that lock for its whole lifetime and puts
//! back the configuration captured on entry when it is dropped, whether the
//! scope ends normally, through `?`, or by unwinding.

use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::ops::Deref;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use tracing::{debug, trace, warn};

use crate::backend::{
    BackendError, Center, EclipseHit, EclipseKind, EphemerisBackend, HorizonEvent, HouseData,
    HouseSystem, RawSample, SampleFlags,
};
use crate::body::Body;
use crate::config::{ConfigOverrides, EngineConfig, GeoLocation};
use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Engine state
// ---------------------------------------------------------------------------

/// One open configuration scope.
struct ScopeFrame {
    id: u64,
    previous: EngineConfig,
    open: bool,
}

struct EngineState {
    backend: Box<dyn EphemerisBackend>,
    config: EngineConfig,
    /// Open scopes, outermost first.
    scopes: Vec<ScopeFrame>,
    next_scope_id: u64,
}

impl EngineState {
    fn apply(&mut self, config: EngineConfig) {
        self.backend.set_sidereal_mode(config.ayanamsa);
        self.backend.set_topocentric(config.topocentric);
        self.backend.set_tidal_model(config.tidal_model);
        self.config = config;
    }

    fn open_scope(&mut self, next: EngineConfig) -> u64 {
        let id = self.next_scope_id;
        self.next_scope_id += 1;
        self.scopes.push(ScopeFrame {
            id,
            previous: self.config,
            open: true,
        });
        self.apply(next);
        id
    }

    /// Close scope `id` and unwind every closed frame on top of the stack.
    ///
    /// A scope closed while a later one is still open stays on the stack;
    /// the configuration from below it is restored once the later scope
    /// closes too. Returns the restored configuration, if any.
    fn close_scope(&mut self, id: u64) -> Option<EngineConfig> {
        if let Some(frame) = self.scopes.iter_mut().find(|f| f.id == id) {
            frame.open = false;
        }
        let mut restore = None;
        while self.scopes.last().is_some_and(|f| !f.open) {
            restore = self.scopes.pop().map(|f| f.previous);
        }
        if let Some(config) = restore {
            self.apply(config);
        }
        restore
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Shared, serialized access to one ephemeris backend.
///
/// Construct once and pass by reference (or inside an `Arc`) to every
/// consumer. `EngineHandle` is [`Send`] + [`Sync`].
///
/// ```rust,ignore
/// let engine = Arc::new(EngineHandle::new(Box::new(backend)));
/// let handle = std::thread::spawn({
///     let engine = Arc::clone(&engine);
///     move || engine.sample(jd, Body::Mars, SampleFlags::TROPICAL)
/// });
/// ```
pub struct EngineHandle {
    inner: ReentrantMutex<RefCell<EngineState>>,
}

impl Debug for EngineHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let guard = self.inner.lock();
        let config = guard.try_borrow().map(|s| s.config).ok();
        f.debug_struct("EngineHandle")
            .field("config", &config)
            .finish_non_exhaustive()
    }
}

impl EngineHandle {
    /// Wrap `backend` and put it in the default (tropical, geocentric) state.
    pub fn new(backend: Box<dyn EphemerisBackend>) -> Self {
        let mut state = EngineState {
            backend,
            config: EngineConfig::default(),
            scopes: Vec::new(),
            next_scope_id: 0,
        };
        state.apply(EngineConfig::default());
        Self {
            inner: ReentrantMutex::new(RefCell::new(state)),
        }
    }

    /// Wrap `backend` with a process-wide starting configuration.
    pub fn with_initial_config(
        backend: Box<dyn EphemerisBackend>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::InvalidQuery)?;
        let handle = Self::new(backend);
        handle.locked(|state| {
            state.apply(config);
            Ok(())
        })?;
        Ok(handle)
    }

    /// Snapshot of the active configuration.
    pub fn config(&self) -> EngineConfig {
        let guard = self.inner.lock();
        let config = guard.borrow().config;
        config
    }

    /// Apply `overrides` for the lifetime of the returned guard.
    ///
    /// The calling thread holds the engine lock until the guard is dropped,
    /// so no other thread's call interleaves with calls made through it.
    /// Scopes may nest and may be dropped in any order: the configuration
    /// in force before the outermost closed scope comes back once every
    /// scope opened after it has closed as well.
    pub fn with_config(&self, overrides: ConfigOverrides) -> Result<ScopedConfig<'_>, EngineError> {
        let guard = self.inner.lock();
        let (id, previous) = {
            let mut state = guard.borrow_mut();
            let previous = state.config;
            let next = overrides.apply_to(&previous);
            next.validate().map_err(EngineError::InvalidQuery)?;
            let id = state.open_scope(next);
            debug!(scope = id, ?previous, active = ?next, "engine config scope opened");
            (id, previous)
        };
        Ok(ScopedConfig {
            handle: self,
            guard,
            id,
            previous,
        })
    }

    /// Sample `body` at `jd` (UT).
    pub fn sample(&self, jd: f64, body: Body, flags: SampleFlags) -> Result<RawSample, EngineError> {
        check_jd(jd)?;
        check_body(body)?;
        self.locked(|state| {
            check_flags(&state.config, flags)?;
            trace!(jd, body = body.name(), ?flags, "engine sample");
            state
                .backend
                .sample(jd, body, flags)
                .map_err(|e| failure("sample", Some(body), e))
        })
    }

    /// Sample by raw engine code. Unknown and unsupported codes are rejected
    /// without reaching the engine.
    pub fn sample_code(&self, jd: f64, code: i32, flags: SampleFlags) -> Result<RawSample, EngineError> {
        let body = Body::from_code(code).ok_or(EngineError::UnsupportedBody { code })?;
        self.sample(jd, body, flags)
    }

    /// House cusps and angles for an observer at `latitude_deg`/`longitude_deg`.
    pub fn houses_at(
        &self,
        jd: f64,
        latitude_deg: f64,
        longitude_deg: f64,
        system: HouseSystem,
    ) -> Result<HouseData, EngineError> {
        check_jd(jd)?;
        GeoLocation::new(latitude_deg, longitude_deg, 0.0)
            .validate()
            .map_err(EngineError::InvalidQuery)?;
        self.locked(|state| {
            trace!(jd, latitude_deg, longitude_deg, system = %system.code(), "engine houses");
            state
                .backend
                .houses(jd, latitude_deg, longitude_deg, system)
                .map_err(|e| failure("houses", None, e))
        })
    }

    /// Next `event` of `body` after `jd` at `location`; `None` if it does not occur.
    pub fn horizon_event(
        &self,
        jd: f64,
        body: Body,
        event: HorizonEvent,
        location: &GeoLocation,
    ) -> Result<Option<f64>, EngineError> {
        check_jd(jd)?;
        check_body(body)?;
        location.validate().map_err(EngineError::InvalidQuery)?;
        self.locked(|state| {
            trace!(jd, body = body.name(), event = event.name(), "engine horizon event");
            state
                .backend
                .horizon_event(jd, body, event, location)
                .map_err(|e| failure("horizon event", Some(body), e))
        })
    }

    /// Engine-side eclipse search from `jd`.
    pub fn eclipse_search(
        &self,
        kind: EclipseKind,
        jd: f64,
        backward: bool,
    ) -> Result<Option<EclipseHit>, EngineError> {
        check_jd(jd)?;
        self.locked(|state| {
            trace!(jd, ?kind, backward, "engine eclipse search");
            state
                .backend
                .eclipse_search(kind, jd, backward)
                .map_err(|e| failure("eclipse search", None, e))
        })
    }

    /// Value of the active ayanamsa at `jd` in degrees (0 when tropical).
    pub fn ayanamsa_at(&self, jd: f64) -> Result<f64, EngineError> {
        check_jd(jd)?;
        self.locked(|state| {
            if state.config.ayanamsa.is_none() {
                return Ok(0.0);
            }
            state
                .backend
                .ayanamsa(jd)
                .map_err(|e| failure("ayanamsa", None, e))
        })
    }

    fn locked<T>(
        &self,
        f: impl FnOnce(&mut EngineState) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let guard = self.inner.lock();
        let mut state = guard.borrow_mut();
        f(&mut state)
    }
}

// ---------------------------------------------------------------------------
// Scoped configuration
// ---------------------------------------------------------------------------

/// Guard returned by [`EngineHandle::with_config`].
///
/// Derefs to the [`EngineHandle`], so any function taking `&EngineHandle`
/// runs under the scoped configuration when given `&scope`.
pub struct ScopedConfig<'a> {
    handle: &'a EngineHandle,
    guard: ReentrantMutexGuard<'a, RefCell<EngineState>>,
    id: u64,
    previous: EngineConfig,
}

impl ScopedConfig<'_> {
    /// Configuration in force when this scope opened.
    pub fn previous(&self) -> EngineConfig {
        self.previous
    }
}

impl Deref for ScopedConfig<'_> {
    type Target = EngineHandle;

    fn deref(&self) -> &EngineHandle {
        self.handle
    }
}

impl Drop for ScopedConfig<'_> {
    fn drop(&mut self) {
        // Backend borrows end before unwinding reaches here.
        match self.guard.try_borrow_mut() {
            Ok(mut state) => match state.close_scope(self.id) {
                Some(restored) => debug!(scope = self.id, ?restored, "engine config scope closed"),
                None => debug!(scope = self.id, "engine config scope closed; later scope still open"),
            },
            Err(_) => warn!("engine state busy at scope exit; configuration not restored"),
        }
    }
}

// ---------------------------------------------------------------------------
// Query validation
// ---------------------------------------------------------------------------

fn check_jd(jd: f64) -> Result<(), EngineError> {
    if jd.is_finite() {
        Ok(())
    } else {
        Err(EngineError::InvalidQuery("julian day must be finite"))
    }
}

fn check_body(body: Body) -> Result<(), EngineError> {
    if body.is_supported() {
        Ok(())
    } else {
        debug!(body = body.name(), "rejected unsupported body");
        Err(EngineError::UnsupportedBody { code: body.code() })
    }
}

fn check_flags(config: &EngineConfig, flags: SampleFlags) -> Result<(), EngineError> {
    if flags.sidereal && config.ayanamsa.is_none() {
        return Err(EngineError::InvalidQuery(
            "sidereal sample requested while no ayanamsa is active",
        ));
    }
    if flags.center == Center::Topocentric && config.topocentric.is_none() {
        return Err(EngineError::InvalidQuery(
            "topocentric sample requested while no observer is set",
        ));
    }
    Ok(())
}

fn failure(operation: &'static str, body: Option<Body>, err: BackendError) -> EngineError {
    warn!(operation, body = body.map(Body::name), error = %err, "engine call failed");
    EngineError::backend(operation, body, err)
}
