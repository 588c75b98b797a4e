//! Memoir CLI - Rebuild chat exports and extract facts about the user.

use anyhow::Context;
use clap::Parser;
use memoir_cli::commands;
use memoir_cli::{Cli, Command, Config, Formatter};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load_from(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Import(args) => {
            let file = args.file.clone();
            commands::execute_import(args, &formatter)
                .with_context(|| format!("failed to import {}", file.display()))?;
        }
        Command::Extract(args) => {
            let file = args.file.clone();
            commands::execute_extract(args, &config, &formatter)
                .await
                .with_context(|| format!("failed to extract facts from {}", file.display()))?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &config_path, &config, &formatter)?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over the `-v` default.
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}
