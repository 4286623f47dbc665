//! Configuration loading from TOML files.
//!
//! The file is selected via:
//! 1. an explicit path (`--config <path>`)
//! 2. the `GOCHARA_CONFIG` environment variable
//! 3. built-in defaults when neither is given
//!
//! Every section and every field is optional.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use gochara_core::{Ayanamsa, Center, EngineConfig, GeoLocation, TidalModel};
use gochara_search::{
    DEFAULT_ITERATIONS, DEFAULT_PARAN_ORB_MINUTES, DEFAULT_RETURN_TOLERANCE_SECONDS, EventConfig,
    MAX_SEARCH_DAYS, ReturnConfig,
};
use serde::Deserialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "GOCHARA_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Ayanamsa name (`lahiri`, `kp`, ...); absent means tropical.
    #[serde(default)]
    pub ayanamsa: Option<String>,
    #[serde(default = "default_tidal_model")]
    pub tidal_model: String,
    /// Sample positions from the `[observer]` location instead of the
    /// Earth's center.
    #[serde(default)]
    pub topocentric: bool,
}

fn default_tidal_model() -> String {
    "automatic".to_string()
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            ayanamsa: None,
            tidal_model: default_tidal_model(),
            topocentric: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObserverSection {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    #[serde(default)]
    pub altitude_m: f64,
}

impl ObserverSection {
    pub fn location(&self) -> GeoLocation {
        GeoLocation::new(self.latitude_deg, self.longitude_deg, self.altitude_m)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchSection {
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_return_tolerance_seconds")]
    pub return_tolerance_seconds: f64,
    #[serde(default = "default_paran_orb_minutes")]
    pub paran_orb_minutes: f64,
    /// Range limit for bounded searches; may only tighten the built-in one.
    #[serde(default = "default_max_search_days")]
    pub max_search_days: f64,
    /// Ingress, station and return searches from the Sun's center.
    #[serde(default)]
    pub heliocentric: bool,
}

fn default_iterations() -> u32 {
    DEFAULT_ITERATIONS
}

fn default_return_tolerance_seconds() -> f64 {
    DEFAULT_RETURN_TOLERANCE_SECONDS
}

fn default_paran_orb_minutes() -> f64 {
    DEFAULT_PARAN_ORB_MINUTES
}

fn default_max_search_days() -> f64 {
    MAX_SEARCH_DAYS
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            return_tolerance_seconds: default_return_tolerance_seconds(),
            paran_orb_minutes: default_paran_orb_minutes(),
            max_search_days: default_max_search_days(),
            heliocentric: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub observer: Option<ObserverSection>,
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub logging: LoggingSection,
    /// File the settings were read from; `None` for defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Settings file to read: `explicit`, else `$GOCHARA_CONFIG`, else none.
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    resolve_path_with(explicit, env::var_os(CONFIG_ENV))
}

fn resolve_path_with(explicit: Option<&Path>, from_env: Option<OsString>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    from_env
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

impl Settings {
    /// Load using the path resolution order; defaults when no file is named.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match resolve_path(explicit) {
            Some(path) => Self::from_file(&path),
            None => {
                debug!("no settings file given; using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut settings = Self::from_toml_str(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        settings.source = Some(path.to_path_buf());
        debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let settings: Self = toml::from_str(text).context("failed to parse settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.ayanamsa()?;
        self.tidal_model()?;
        if let Some(observer) = &self.observer {
            observer
                .location()
                .validate()
                .map_err(|e| anyhow!("[observer] {e}"))?;
        }
        if self.engine.topocentric && self.observer.is_none() {
            bail!("[engine] topocentric = true needs an [observer] section");
        }

        let search = &self.search;
        if search.iterations == 0 {
            bail!("[search] iterations must be > 0");
        }
        if !search.return_tolerance_seconds.is_finite() || search.return_tolerance_seconds <= 0.0 {
            bail!("[search] return_tolerance_seconds must be positive");
        }
        if !search.paran_orb_minutes.is_finite() || search.paran_orb_minutes < 0.0 {
            bail!("[search] paran_orb_minutes must be >= 0");
        }
        if !(search.max_search_days > 0.0 && search.max_search_days <= MAX_SEARCH_DAYS) {
            bail!("[search] max_search_days must be in (0, {MAX_SEARCH_DAYS}]");
        }

        EnvFilter::try_new(&self.logging.filter)
            .with_context(|| format!("[logging] invalid filter {:?}", self.logging.filter))?;
        Ok(())
    }

    /// Configured ayanamsa; `None` for tropical.
    pub fn ayanamsa(&self) -> anyhow::Result<Option<Ayanamsa>> {
        self.engine
            .ayanamsa
            .as_deref()
            .map(|name| {
                name.parse::<Ayanamsa>()
                    .map_err(|e| anyhow!("[engine] {e}: {name:?}"))
            })
            .transpose()
    }

    pub fn tidal_model(&self) -> anyhow::Result<TidalModel> {
        self.engine
            .tidal_model
            .parse::<TidalModel>()
            .map_err(|e| anyhow!("[engine] {e}: {:?}", self.engine.tidal_model))
    }

    pub fn observer(&self) -> Option<GeoLocation> {
        self.observer.as_ref().map(ObserverSection::location)
    }

    /// Starting configuration for the engine handle.
    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        Ok(EngineConfig {
            ayanamsa: self.ayanamsa()?,
            topocentric: if self.engine.topocentric {
                self.observer()
            } else {
                None
            },
            tidal_model: self.tidal_model()?,
        })
    }

    pub fn event_config(&self) -> anyhow::Result<EventConfig> {
        let base = match self.ayanamsa()? {
            Some(system) => EventConfig::sidereal(system),
            None => EventConfig::tropical(),
        };
        Ok(base
            .with_iterations(self.search.iterations)
            .with_center(self.center()))
    }

    pub fn return_config(&self) -> anyhow::Result<ReturnConfig> {
        let base = match self.ayanamsa()? {
            Some(system) => ReturnConfig::sidereal(system),
            None => ReturnConfig::tropical(),
        };
        Ok(base
            .with_tolerance_seconds(self.search.return_tolerance_seconds)
            .with_center(self.center()))
    }

    fn center(&self) -> Center {
        if self.search.heliocentric {
            Center::Heliocentric
        } else {
            Center::Geocentric
        }
    }
}
