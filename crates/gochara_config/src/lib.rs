//! Settings and logging for gochara applications.
//!
//! Libraries in this workspace only emit `tracing` events; installing a
//! subscriber and reading configuration files happens here, at the edge.

pub mod logging;
pub mod settings;

pub use logging::init_logging;
pub use settings::{
    CONFIG_ENV, EngineSection, LoggingSection, ObserverSection, SearchSection, Settings,
    resolve_path,
};
