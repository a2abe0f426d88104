//! Command-line configuration.

use clap::Parser;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid log level '{directive}': {reason}")]
    InvalidLogFilter { directive: String, reason: String },
    #[error("could not install the log subscriber: {0}")]
    Subscriber(String),
}

/// Interactive queries over the school network topology.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about)]
pub struct Config {
    /// Tracing filter directive, e.g. `info` or `campusnet=debug`. `RUST_LOG` takes precedence
    /// when set.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Don't print the network before each menu.
    #[arg(long)]
    pub no_display: bool,

    /// Report raw betweenness counts instead of normalized scores.
    #[arg(long)]
    pub raw_betweenness: bool,
}

impl Config {
    /// Whether the network is rendered at the top of every menu.
    pub fn display_network(&self) -> bool {
        !self.no_display
    }

    /// Whether betweenness scores are normalized by the number of node pairs.
    pub fn normalize_betweenness(&self) -> bool {
        !self.raw_betweenness
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            no_display: false,
            raw_betweenness: false,
        }
    }
}
