//! Configuration for event searches.

use gochara_core::{Ayanamsa, Body, Center};

/// Bisection halvings for ingress and station refinement.
///
/// 40 halvings of a one-day bracket is below the resolution of a Julian
/// Day stored in an `f64`.
pub const DEFAULT_ITERATIONS: u32 = 40;

/// Default time tolerance for returns.
pub const DEFAULT_RETURN_TOLERANCE_SECONDS: f64 = 1.0;

/// Default paran orb.
pub const DEFAULT_PARAN_ORB_MINUTES: f64 = 5.0;

/// Configuration shared by ingress and station searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventConfig {
    /// Zodiac for longitudes; `None` is tropical.
    pub ayanamsa: Option<Ayanamsa>,
    /// Origin of the sampled positions.
    pub center: Center,
    /// Exact number of bisection halvings.
    pub iterations: u32,
    /// Coarse step override; the per-body policy applies when `None`.
    pub step_days: Option<f64>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self::tropical()
    }
}

impl EventConfig {
    pub fn tropical() -> Self {
        Self {
            ayanamsa: None,
            center: Center::Geocentric,
            iterations: DEFAULT_ITERATIONS,
            step_days: None,
        }
    }

    pub fn sidereal(ayanamsa: Ayanamsa) -> Self {
        Self {
            ayanamsa: Some(ayanamsa),
            ..Self::tropical()
        }
    }

    pub fn with_center(mut self, center: Center) -> Self {
        self.center = center;
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_step_days(mut self, step_days: f64) -> Self {
        self.step_days = Some(step_days);
        self
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.iterations == 0 {
            return Err("iterations must be > 0");
        }
        validate_step(self.step_days)
    }
}

/// Configuration for return searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnConfig {
    pub ayanamsa: Option<Ayanamsa>,
    pub center: Center,
    /// Time precision of the result in seconds of civil time.
    pub tolerance_seconds: f64,
    /// Window override in days; checked against the guardrail. The per-body
    /// default applies when `None`.
    pub window_days: Option<f64>,
    pub step_days: Option<f64>,
}

impl Default for ReturnConfig {
    fn default() -> Self {
        Self::tropical()
    }
}

impl ReturnConfig {
    pub fn tropical() -> Self {
        Self {
            ayanamsa: None,
            center: Center::Geocentric,
            tolerance_seconds: DEFAULT_RETURN_TOLERANCE_SECONDS,
            window_days: None,
            step_days: None,
        }
    }

    pub fn sidereal(ayanamsa: Ayanamsa) -> Self {
        Self {
            ayanamsa: Some(ayanamsa),
            ..Self::tropical()
        }
    }

    pub fn with_center(mut self, center: Center) -> Self {
        self.center = center;
        self
    }

    pub fn with_tolerance_seconds(mut self, seconds: f64) -> Self {
        self.tolerance_seconds = seconds;
        self
    }

    pub fn with_window_days(mut self, days: f64) -> Self {
        self.window_days = Some(days);
        self
    }

    /// Tolerance as a fraction of a day.
    pub fn tolerance_days(&self) -> f64 {
        self.tolerance_seconds / 86_400.0
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.tolerance_seconds.is_finite() || self.tolerance_seconds <= 0.0 {
            return Err("tolerance_seconds must be positive");
        }
        if let Some(days) = self.window_days {
            if !days.is_finite() || days <= 0.0 {
                return Err("window_days must be positive");
            }
        }
        validate_step(self.step_days)
    }
}

/// Reject a center the body has no position from.
///
/// The Sun seen from itself and the Moon and lunar points seen from the
/// Sun are undefined.
pub fn check_center(body: Body, center: Center) -> Result<(), &'static str> {
    let lunar = matches!(
        body,
        Body::Moon | Body::MeanNode | Body::TrueNode | Body::MeanApogee
    );
    if center == Center::Heliocentric && (body == Body::Sun || lunar) {
        return Err("heliocentric position undefined for the Sun, Moon and lunar points");
    }
    Ok(())
}

fn validate_step(step_days: Option<f64>) -> Result<(), &'static str> {
    match step_days {
        Some(step) if !step.is_finite() || step <= 0.0 => Err("step_days must be positive"),
        _ => Ok(()),
    }
}
