//! GifClip command-line entry point
//!
//! ```bash
//! gifclip convert --input clip.mp4 --start 2 --end 6 --width 320 --speed 1.5
//! gifclip probe --input clip.mp4 --json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use gifclip::app::DefaultAppContainer;
use gifclip::cli::{commands, Cli, Commands};
use gifclip::config_initialization::initialize_configuration;
use gifclip::error::AppResult;

/// Main entry point for the GifClip CLI application
fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    if let Err(e) = runtime.block_on(run(cli)) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
    Ok(())
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = initialize_configuration(&cli)?;
    config.logging.init();

    info!("Starting GifClip {}", env!("CARGO_PKG_VERSION"));
    if let Some(source) = &config.source {
        info!("Configuration loaded from {}", source.display());
    }

    let container = DefaultAppContainer::from_config(&config);

    let result = match cli.command {
        Commands::Convert(args) => {
            info!("Executing convert command");
            commands::convert(&container, &config.defaults, args).await
        }
        Commands::Probe(args) => {
            info!("Executing probe command");
            commands::probe(&container, args).await
        }
    };

    // Configuration errors surface before a subscriber exists; main prints those
    if let Err(e) = &result {
        error!("{}", e);
    }
    result
}
