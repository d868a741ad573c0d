//! Tracing subscriber setup
//!
//! `RUST_LOG` wins when set; otherwise the caller's default directive is
//! used. Output is compact text unless `FAULTLINE_LOG_FORMAT=json`.

use faultline_domain::{FaultlineError, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the log output format
pub const LOG_FORMAT_ENV: &str = "FAULTLINE_LOG_FORMAT";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    /// Read the format from [`LOG_FORMAT_ENV`], defaulting to compact
    pub fn from_env() -> Self {
        match std::env::var(LOG_FORMAT_ENV) {
            Ok(value) if value.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Install the global subscriber using the format from the environment
///
/// Returns `Ok(false)` if a global subscriber was already installed.
///
/// # Errors
/// Returns `FaultlineError::Config` if `default_directive` is not a valid
/// filter directive.
pub fn init_tracing(default_directive: &str) -> Result<bool> {
    init_tracing_with_format(default_directive, LogFormat::from_env())
}

/// Install the global subscriber with an explicit output format
///
/// # Errors
/// Same as [`init_tracing`].
pub fn init_tracing_with_format(default_directive: &str, format: LogFormat) -> Result<bool> {
    let filter = build_filter(default_directive)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match format {
        LogFormat::Compact => builder.compact().try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    };

    if installed {
        tracing::debug!(?format, "tracing initialized");
    }
    Ok(installed)
}

fn build_filter(default_directive: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| {
            FaultlineError::Config(format!("Invalid log directive '{default_directive}': {e}"))
        }),
    }
}
