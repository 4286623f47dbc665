//! Engine-global configuration values.
//!
//! These mirror the process-global state of the ephemeris engine. Only the
//! [`crate::EngineHandle`] writes them to the backend.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Sidereal reference system (ayanamsa).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ayanamsa {
    /// Chitrapaksha: Spica at 0° Libra.
    Lahiri,
    /// Krishnamurti Paddhati.
    Krishnamurti,
    Raman,
    /// Western sidereal, Aldebaran/Antares axis.
    FaganBradley,
    DeLuce,
    Yukteshwar,
    JnBhasin,
    SuryaSiddhanta,
    /// Aldebaran at 15° Taurus.
    Aldebaran15Tau,
    /// Galactic center at 0° Sagittarius.
    GalacticCenter0Sag,
}

const ALL_AYANAMSAS: [Ayanamsa; 10] = [
    Ayanamsa::Lahiri,
    Ayanamsa::Krishnamurti,
    Ayanamsa::Raman,
    Ayanamsa::FaganBradley,
    Ayanamsa::DeLuce,
    Ayanamsa::Yukteshwar,
    Ayanamsa::JnBhasin,
    Ayanamsa::SuryaSiddhanta,
    Ayanamsa::Aldebaran15Tau,
    Ayanamsa::GalacticCenter0Sag,
];

impl Ayanamsa {
    pub const fn all() -> &'static [Ayanamsa] {
        &ALL_AYANAMSAS
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Lahiri => "lahiri",
            Self::Krishnamurti => "krishnamurti",
            Self::Raman => "raman",
            Self::FaganBradley => "fagan_bradley",
            Self::DeLuce => "de_luce",
            Self::Yukteshwar => "yukteshwar",
            Self::JnBhasin => "jn_bhasin",
            Self::SuryaSiddhanta => "surya_siddhanta",
            Self::Aldebaran15Tau => "aldebaran_15_tau",
            Self::GalacticCenter0Sag => "galactic_center_0_sag",
        }
    }
}

impl Display for Ayanamsa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ayanamsa {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "kp" => return Ok(Self::Krishnamurti),
            "fagan" => return Ok(Self::FaganBradley),
            _ => {}
        }
        ALL_AYANAMSAS
            .iter()
            .copied()
            .find(|a| a.name() == key)
            .ok_or("unknown ayanamsa")
    }
}

/// Tidal-acceleration model of the Moon used by the engine's ΔT.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TidalModel {
    /// Whatever the loaded ephemeris implies (DE431 value).
    #[default]
    Automatic,
    De200,
    De403,
    De406,
    De431,
    /// Explicit value in arcsec/century².
    Custom(f64),
}

impl TidalModel {
    /// Lunar tidal acceleration in arcsec/century².
    pub fn acceleration_arcsec_cy2(self) -> f64 {
        match self {
            Self::Automatic | Self::De431 => -25.80,
            Self::De200 => -23.8946,
            Self::De403 => -25.580,
            Self::De406 => -25.826,
            Self::Custom(v) => v,
        }
    }
}

impl FromStr for TidalModel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "automatic" | "auto" => Ok(Self::Automatic),
            "de200" => Ok(Self::De200),
            "de403" => Ok(Self::De403),
            "de406" => Ok(Self::De406),
            "de431" => Ok(Self::De431),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Self::Custom)
                .ok_or("unknown tidal model"),
        }
    }
}

/// Geographic location for topocentric and horizon computations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    /// Geodetic latitude in degrees, north positive.
    pub latitude_deg: f64,
    /// Longitude in degrees, east positive.
    pub longitude_deg: f64,
    /// Altitude above sea level in meters.
    pub altitude_m: f64,
}

impl GeoLocation {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
        }
    }

    pub fn latitude_rad(&self) -> f64 {
        self.latitude_deg.to_radians()
    }

    pub fn longitude_rad(&self) -> f64 {
        self.longitude_deg.to_radians()
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err("latitude must be within [-90, 90] degrees");
        }
        if !(-180.0..=180.0).contains(&self.longitude_deg) {
            return Err("longitude must be within [-180, 180] degrees");
        }
        if !self.altitude_m.is_finite() {
            return Err("altitude must be finite");
        }
        Ok(())
    }
}

/// Current global configuration of the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Active ayanamsa; `None` means tropical.
    pub ayanamsa: Option<Ayanamsa>,
    /// Topocentric observer; `None` means geocentric.
    pub topocentric: Option<GeoLocation>,
    pub tidal_model: TidalModel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ayanamsa: None,
            topocentric: None,
            tidal_model: TidalModel::Automatic,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(loc) = &self.topocentric {
            loc.validate()?;
        }
        if let TidalModel::Custom(v) = self.tidal_model {
            if !v.is_finite() {
                return Err("custom tidal acceleration must be finite");
            }
        }
        Ok(())
    }
}

/// Overrides applied by [`crate::EngineHandle::with_config`].
///
/// Fields left unset keep whatever value is active when the scope opens.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigOverrides {
    ayanamsa: Option<Option<Ayanamsa>>,
    topocentric: Option<Option<GeoLocation>>,
    tidal_model: Option<TidalModel>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to sidereal mode with `ayanamsa`.
    pub fn ayanamsa(mut self, ayanamsa: Ayanamsa) -> Self {
        self.ayanamsa = Some(Some(ayanamsa));
        self
    }

    /// Switch sidereal mode off.
    pub fn tropical(mut self) -> Self {
        self.ayanamsa = Some(None);
        self
    }

    pub fn topocentric(mut self, location: GeoLocation) -> Self {
        self.topocentric = Some(Some(location));
        self
    }

    /// Drop any topocentric observer.
    pub fn geocentric(mut self) -> Self {
        self.topocentric = Some(None);
        self
    }

    pub fn tidal_model(mut self, model: TidalModel) -> Self {
        self.tidal_model = Some(model);
        self
    }

    /// Resolve these overrides on top of `base`.
    pub fn apply_to(&self, base: &EngineConfig) -> EngineConfig {
        EngineConfig {
            ayanamsa: self.ayanamsa.unwrap_or(base.ayanamsa),
            topocentric: self.topocentric.unwrap_or(base.topocentric),
            tidal_model: self.tidal_model.unwrap_or(base.tidal_model),
        }
    }
}
