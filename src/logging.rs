//! Tracing subscriber setup.

use std::{env, ffi::OsString};

use tracing_subscriber::EnvFilter;

use crate::config::{Config, ConfigError};

/// Installs the global fmt subscriber, writing to stderr so logs don't interleave with the menu.
///
/// The filter comes from `RUST_LOG` when it is set, otherwise from `--log-level`. Either one
/// failing to parse is an error.
pub fn init_tracing(config: &Config) -> Result<(), ConfigError> {
    let directive = select_directive(env::var_os(EnvFilter::DEFAULT_ENV), &config.log_level);
    let filter = build_filter(&directive)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .try_init()
        .map_err(|e| ConfigError::Subscriber(e.to_string()))
}

/// Parses a filter directive such as `info` or `campusnet::network=debug`.
pub fn build_filter(level: &str) -> Result<EnvFilter, ConfigError> {
    let level = level.trim();

    EnvFilter::try_new(level).map_err(|e| ConfigError::InvalidLogFilter {
        directive: level.to_string(),
        reason: e.to_string(),
    })
}

fn select_directive(rust_log: Option<OsString>, log_level: &str) -> String {
    match rust_log {
        Some(value) => value.to_string_lossy().into_owned(),
        None => log_level.to_string(),
    }
}
