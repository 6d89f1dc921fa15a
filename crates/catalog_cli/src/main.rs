mod cli;
mod config;
mod run;

use std::process::ExitCode;

use catalog_logging::{catalog_error, catalog_info, catalog_warn, LogDestination};
use clap::Parser;
use log::LevelFilter;
use tokio_util::sync::CancellationToken;

use crate::cli::Cli;
use crate::config::AppConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    catalog_logging::initialize(LogDestination::terminal_and(cli.log_file.as_deref()), level);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            catalog_error!("Invalid configuration: {:#}", err);
            return ExitCode::from(1);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            catalog_error!("Could not start async runtime: {}", err);
            return ExitCode::from(1);
        }
    };
    runtime.block_on(harvest(config))
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::try_load_from_file_or_default(cli.config.as_deref())?;
    config.apply_cli(cli);
    config.validate()?;
    Ok(config)
}

async fn harvest(config: AppConfig) -> ExitCode {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            catalog_warn!("Interrupted; stopping before the next tag");
            on_interrupt.cancel();
        }
    });

    catalog_info!("Harvesting {} into {}", config.target_url, config.output.display());
    match run::run(&config, cancel).await {
        Ok(summary) => {
            catalog_info!(
                "Done: {} tags written to {} ({} without count)",
                summary.tags,
                summary.output.display(),
                summary.missing_counts
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            catalog_error!("Harvest failed, no artifact written: {}", err);
            ExitCode::from(err.exit_code())
        }
    }
}
