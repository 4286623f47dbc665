//! Result types for event searches.

use std::fmt::{Display, Formatter};

use gochara_core::{Body, EclipseClass, EclipseHit, EclipseKind, HorizonEvent};
use gochara_time::{Instant, TimeError};

/// One of the twelve 30° zodiac signs, Aries first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        Self::Aries,
        Self::Taurus,
        Self::Gemini,
        Self::Cancer,
        Self::Leo,
        Self::Virgo,
        Self::Libra,
        Self::Scorpio,
        Self::Sagittarius,
        Self::Capricorn,
        Self::Aquarius,
        Self::Pisces,
    ];

    /// 0-based index (Aries = 0).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Sign at `index` modulo 12.
    pub const fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(12) as usize]
    }

    /// Sign containing `longitude_deg`.
    pub fn from_longitude(longitude_deg: f64) -> Self {
        Self::from_index((longitude_deg.rem_euclid(360.0) / 30.0).floor() as i64)
    }

    pub const fn next(self) -> Self {
        Self::from_index(self as i64 + 1)
    }

    pub const fn previous(self) -> Self {
        Self::from_index(self as i64 - 1)
    }

    /// Longitude where the sign starts.
    pub fn start_deg(self) -> f64 {
        f64::from(self.index()) * 30.0
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }
}

impl Display for ZodiacSign {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A body crossing a sign boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngressEvent {
    /// Event time, JD (UT).
    pub jd: f64,
    pub body: Body,
    pub from_sign: ZodiacSign,
    pub to_sign: ZodiacSign,
    /// Longitude at the refined time, degrees [0, 360).
    pub longitude_deg: f64,
}

/// Direction change at a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StationType {
    /// Speed goes from positive to negative.
    Retrograde,
    /// Speed goes from negative to positive.
    Direct,
}

impl StationType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Retrograde => "retrograde",
            Self::Direct => "direct",
        }
    }
}

/// A body's longitude speed crossing zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationEvent {
    pub jd: f64,
    pub body: Body,
    pub station_type: StationType,
    /// Speed just before the station, deg/day.
    pub speed_before: f64,
    /// Speed just after the station, deg/day.
    pub speed_after: f64,
    pub longitude_deg: f64,
}

/// A body returning to a target longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnEvent {
    pub jd: f64,
    pub body: Body,
    pub target_longitude: f64,
    /// Longitude actually sampled at `jd`.
    pub longitude_deg: f64,
    /// Half-width of the final bisection bracket in days.
    pub achieved_tolerance_days: f64,
}

/// Two horizon/meridian events within the orb of each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paran {
    pub body1: Body,
    pub event1: HorizonEvent,
    pub body2: Body,
    pub event2: HorizonEvent,
    /// Midpoint of the two event times, JD (UT).
    pub jd: f64,
    /// Actual separation in minutes.
    pub orb_minutes: f64,
}

/// An eclipse found by the engine's search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipseEvent {
    pub kind: EclipseKind,
    pub class: EclipseClass,
    /// Greatest eclipse, JD (UT).
    pub peak_jd: f64,
}

impl EclipseEvent {
    pub fn peak(&self) -> Result<Instant, TimeError> {
        Instant::from_julian_day(self.peak_jd)
    }
}

impl From<EclipseHit> for EclipseEvent {
    fn from(hit: EclipseHit) -> Self {
        Self {
            kind: hit.kind,
            class: hit.class,
            peak_jd: hit.peak_jd,
        }
    }
}

/// Kind-specific payload of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    Ingress {
        from_sign: ZodiacSign,
        to_sign: ZodiacSign,
    },
    Station {
        station_type: StationType,
        speed_before: f64,
        speed_after: f64,
    },
    Return {
        target_longitude: f64,
    },
}

/// Uniform event record for mixed scans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub kind: EventKind,
    pub body: Body,
    pub jd: f64,
    pub longitude_deg: f64,
}

impl Event {
    pub fn instant(&self) -> Result<Instant, TimeError> {
        Instant::from_julian_day(self.jd)
    }
}

impl From<IngressEvent> for Event {
    fn from(e: IngressEvent) -> Self {
        Self {
            kind: EventKind::Ingress {
                from_sign: e.from_sign,
                to_sign: e.to_sign,
            },
            body: e.body,
            jd: e.jd,
            longitude_deg: e.longitude_deg,
        }
    }
}

impl From<StationEvent> for Event {
    fn from(e: StationEvent) -> Self {
        Self {
            kind: EventKind::Station {
                station_type: e.station_type,
                speed_before: e.speed_before,
                speed_after: e.speed_after,
            },
            body: e.body,
            jd: e.jd,
            longitude_deg: e.longitude_deg,
        }
    }
}

impl From<ReturnEvent> for Event {
    fn from(e: ReturnEvent) -> Self {
        Self {
            kind: EventKind::Return {
                target_longitude: e.target_longitude,
            },
            body: e.body,
            jd: e.jd,
            longitude_deg: e.longitude_deg,
        }
    }
}
