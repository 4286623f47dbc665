//! Boundary with the ephemeris engine.
//!
//! The engine is stateful and not reentrant: its sidereal mode, observer and
//! tidal model are global to the instance. Implementations take `&mut self`
//! everywhere and are only ever driven through [`crate::EngineHandle`].

use thiserror::Error;

use crate::body::Body;
use crate::config::{Ayanamsa, GeoLocation, TidalModel};

/// Failure reported by a backend. Carries the engine's own message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Center of the computed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Center {
    #[default]
    Geocentric,
    Heliocentric,
    /// Relative to the engine's configured topocentric observer.
    Topocentric,
}

/// Flag set accompanying a sample request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SampleFlags {
    /// Subtract the active ayanamsa from longitude.
    pub sidereal: bool,
    pub center: Center,
}

impl SampleFlags {
    pub const TROPICAL: Self = Self {
        sidereal: false,
        center: Center::Geocentric,
    };

    pub const SIDEREAL: Self = Self {
        sidereal: true,
        center: Center::Geocentric,
    };

    pub const fn with_center(self, center: Center) -> Self {
        Self {
            sidereal: self.sidereal,
            center,
        }
    }
}

/// One engine sample: ecliptic position and its rates of change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    /// Ecliptic longitude in degrees [0, 360).
    pub longitude_deg: f64,
    /// Ecliptic latitude in degrees.
    pub latitude_deg: f64,
    /// Distance in AU.
    pub distance_au: f64,
    /// Longitude speed in degrees per day.
    pub speed_longitude: f64,
    /// Latitude speed in degrees per day.
    pub speed_latitude: f64,
    /// Distance speed in AU per day.
    pub speed_distance: f64,
}

/// House division method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HouseSystem {
    Placidus,
    Porphyry,
    Equal,
    WholeSign,
}

impl HouseSystem {
    /// Single-letter engine code.
    pub const fn code(self) -> char {
        match self {
            Self::Placidus => 'P',
            Self::Porphyry => 'O',
            Self::Equal => 'E',
            Self::WholeSign => 'W',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'P' => Some(Self::Placidus),
            'O' => Some(Self::Porphyry),
            'E' => Some(Self::Equal),
            'W' => Some(Self::WholeSign),
            _ => None,
        }
    }
}

/// Raw house data returned by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseData {
    /// Cusps 1..=12 in degrees [0, 360).
    pub cusps_deg: [f64; 12],
    pub ascendant_deg: f64,
    pub mc_deg: f64,
    /// Right ascension of the MC in degrees.
    pub armc_deg: f64,
    pub vertex_deg: f64,
}

/// Horizon or meridian event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizonEvent {
    Rise,
    Set,
    /// Culmination on the upper meridian.
    UpperTransit,
    /// Anti-culmination on the lower meridian.
    LowerTransit,
}

impl HorizonEvent {
    pub const ALL: [HorizonEvent; 4] = [
        Self::Rise,
        Self::Set,
        Self::UpperTransit,
        Self::LowerTransit,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Rise => "rise",
            Self::Set => "set",
            Self::UpperTransit => "culminate",
            Self::LowerTransit => "anti-culminate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EclipseKind {
    Solar,
    Lunar,
}

/// Eclipse classification reported with a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EclipseClass {
    Total,
    Annular,
    Hybrid,
    Partial,
    Penumbral,
}

/// Result of a range-bounded eclipse search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipseHit {
    pub kind: EclipseKind,
    pub class: EclipseClass,
    /// Time of greatest eclipse, JD (UT).
    pub peak_jd: f64,
}

/// Ephemeris engine as seen by the coordinator.
///
/// All Julian Days are UT.
pub trait EphemerisBackend: Send {
    /// Position and speeds of `body` at `jd`.
    fn sample(&mut self, jd: f64, body: Body, flags: SampleFlags) -> Result<RawSample, BackendError>;

    /// House cusps and angles; sidereal when an ayanamsa is active.
    fn houses(
        &mut self,
        jd: f64,
        latitude_deg: f64,
        longitude_deg: f64,
        system: HouseSystem,
    ) -> Result<HouseData, BackendError>;

    /// First occurrence of `event` for `body` after `jd`. `Ok(None)` when the
    /// body does not reach the horizon (circumpolar or never rising).
    fn horizon_event(
        &mut self,
        jd: f64,
        body: Body,
        event: HorizonEvent,
        location: &GeoLocation,
    ) -> Result<Option<f64>, BackendError>;

    /// Next (or previous, with `backward`) eclipse of `kind` from `jd`.
    fn eclipse_search(
        &mut self,
        kind: EclipseKind,
        jd: f64,
        backward: bool,
    ) -> Result<Option<EclipseHit>, BackendError>;

    /// Value in degrees of the active ayanamsa at `jd`; 0 when tropical.
    fn ayanamsa(&mut self, jd: f64) -> Result<f64, BackendError>;

    fn set_sidereal_mode(&mut self, ayanamsa: Option<Ayanamsa>);

    fn set_topocentric(&mut self, location: Option<GeoLocation>);

    fn set_tidal_model(&mut self, model: TidalModel);
}
