//! Tracing subscriber setup.

use anyhow::{Context, anyhow};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;

use crate::settings::LoggingSection;

/// Filter from `RUST_LOG` when set, else from the settings.
fn filter_for(logging: &LoggingSection) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&logging.filter)
            .with_context(|| format!("invalid log filter {:?}", logging.filter)),
    }
}

/// Install the global subscriber. Output goes to stderr so command output
/// on stdout stays clean.
pub fn init_logging(logging: &LoggingSection) -> anyhow::Result<()> {
    let filter = filter_for(logging)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_fails_cleanly() {
        let logging = LoggingSection {
            filter: "warn".to_string(),
            json: false,
        };
        // Whichever call runs first wins; the other must report, not panic.
        let first = init_logging(&logging);
        let second = init_logging(&logging);
        assert!(first.is_err() || second.is_err());
    }
}
