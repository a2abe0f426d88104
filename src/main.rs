use std::io;

use campusnet::{
    config::{Config, ConfigError},
    logging::init_tracing,
    menu::Menu,
    network::Network,
};
use clap::Parser;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
enum BootError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("console: {0}")]
    Io(#[from] io::Error),
}

fn main() -> Result<(), BootError> {
    let config = Config::parse();
    init_tracing(&config)?;

    info!(
        display = config.display_network(),
        normalize = config.normalize_betweenness(),
        "starting"
    );

    let network = Network::school().with_normalized_betweenness(config.normalize_betweenness());
    let mut menu =
        Menu::new(network, io::stdin().lock(), io::stdout()).with_display(config.display_network());

    if let Err(e) = menu.run() {
        error!(error = %e, "menu loop aborted");
        return Err(e.into());
    }

    Ok(())
}
