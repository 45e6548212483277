#![forbid(unsafe_code)]

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use agent_validator::cli::{Cli, Commands};
use agent_validator::config::Config;
use agent_validator::error::ValidatorError;
use agent_validator::{commands, logging};

const EXIT_FAILED: u8 = 1;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let code = err
                .downcast_ref::<ValidatorError>()
                .map(ValidatorError::exit_code)
                .unwrap_or(2);
            ExitCode::from(code as u8)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // `config` subcommands report on config files themselves, so they must
    // run even when the merged config is broken.
    if let Some(Commands::Config { command }) = &cli.command {
        logging::with_bootstrap_logging(cli.verbose, || {
            commands::config::execute(command, cli.config.as_deref())
        })?;
        return Ok(ExitCode::SUCCESS);
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    // The configured level and format only apply once the config is known.
    let config = logging::with_bootstrap_logging(cli.verbose, || {
        Config::load(&cwd, cli.config.as_deref())
    })?
    .with_cli_overrides(&cli);

    logging::init_logging(&config.logging, config.verbose)?;
    tracing::debug!(
        path = %config.path,
        strict = config.strict,
        naming = config.naming.as_str(),
        parser = config.parser.as_str(),
        "starting validation"
    );

    if commands::validate::execute(&config)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_FAILED))
    }
}
