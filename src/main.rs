//! image-check - exits 0 when a PNG, JPEG, GIF or SWF file is complete.
//!
//! Exit codes: 0 complete, 1 invalid file, 2 invalid config, 128 no file
//! specified.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use image_check::cli::Cli;
use image_check::Config;

const EXIT_INVALID_FILE: u8 = 1;
const EXIT_INVALID_CONFIG: u8 = 2;
const EXIT_NO_FILE: u8 = 128;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(path) = cli.path.clone() else {
        eprintln!("no file specified");
        return ExitCode::from(EXIT_NO_FILE);
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid config: {:#}", err);
            return ExitCode::from(EXIT_INVALID_CONFIG);
        }
    };

    if let Err(err) = init_logging(&cli, &config) {
        eprintln!("invalid config: {:#}", err);
        return ExitCode::from(EXIT_INVALID_CONFIG);
    }

    match image_check::check_with_options(&path, &config.check_options()) {
        Ok(format) => {
            tracing::debug!(path = %path.display(), format = format.label(), "Check passed");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("invalid file: {}", err);
            ExitCode::from(EXIT_INVALID_FILE)
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => Config::load_from(path),
        None => Ok(Config::default()),
    }
}

fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let directive = cli.log_directive(&config.general.log_level);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();
    Ok(())
}
