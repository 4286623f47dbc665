//! Event root-finding over the shared ephemeris engine.
//!
//! Every finder reduces its event to a scalar function of time (a signed
//! longitude offset or a longitude speed), scans it at a per-body stride
//! until the sign flips, then bisects the bracket. Absence of an event in
//! the window is `Ok(None)` or an empty `Vec`; engine faults surface as
//! [`SearchError::Engine`].
//!
//! # Example
//!
//! ```no_run
//! use gochara_core::Body;
//! use gochara_search::{EventConfig, find_ingress};
//!
//! # fn demo(engine: &gochara_core::EngineHandle) -> Result<(), gochara_search::SearchError> {
//! if let Some(ingress) = find_ingress(engine, Body::Jupiter, 2_460_310.5, &EventConfig::default())? {
//!     println!("{} enters {} at JD {:.5}", ingress.body, ingress.to_sign, ingress.jd);
//! }
//! # Ok(())
//! # }
//! ```

pub mod crossing;
pub mod eclipse;
pub mod error;
pub mod event_types;
pub mod events;
pub mod guardrail;
pub mod ingress;
pub mod paran;
pub mod policy;
pub mod returns;
pub mod sampler;
pub mod search_config;
pub mod station;

pub use crossing::{
    CrossingResult, ScalarKind, SearchDirection, SearchWindow, Termination, find_all_crossings,
    find_crossing,
};
pub use eclipse::{next_eclipse, next_lunar_eclipse, next_solar_eclipse, search_eclipses};
pub use error::SearchError;
pub use event_types::{
    EclipseEvent, Event, EventKind, IngressEvent, Paran, ReturnEvent, StationEvent, StationType,
    ZodiacSign,
};
pub use events::scan_events;
pub use guardrail::{MAX_SEARCH_DAYS, check_span, check_span_limit};
pub use ingress::{find_ingress, scan_ingresses};
pub use paran::{PARAN_BODIES, find_parans, find_parans_for};
pub use returns::{find_lunar_return, find_return, find_solar_return};
pub use search_config::{
    DEFAULT_ITERATIONS, DEFAULT_PARAN_ORB_MINUTES, DEFAULT_RETURN_TOLERANCE_SECONDS, EventConfig,
    ReturnConfig, check_center,
};
pub use station::{find_stations, next_station, prev_station};
