//! UTC instants and Julian Day conversions.
//!
//! This crate provides:
//! - [`Instant`], an immutable, always UTC-resolved point in time
//! - Julian Day ↔ Gregorian calendar conversions
//! - [`TimeError`] for construction-time rejection of ambiguous input

pub mod error;
pub mod instant;
pub mod julian;

pub use error::TimeError;
pub use instant::Instant;
pub use julian::{
    J2000_JD, SECONDS_PER_DAY, UNIX_EPOCH_JD, calendar_to_jd, jd_to_calendar,
    jd_to_centuries,
};
