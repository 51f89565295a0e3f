use anyhow::Context;
use clap::{CommandFactory, Parser};
use domain_check::utils::{logger, validation::Validate};
use domain_check::{CheckConfig, CheckEngine, SystemResolver};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CheckConfig::parse();

    logger::init_cli_logger(config.verbose);

    // Called without a config file: print usage and do nothing, successfully.
    if config.config_file.is_none() {
        CheckConfig::command().print_help()?;
        return Ok(());
    }

    tracing::info!("Starting domain-check");
    if config.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    let resolver = Arc::new(
        SystemResolver::from_system_conf().context("initializing the system DNS resolver")?,
    );
    let engine = CheckEngine::new(config, resolver);

    match engine.run().await {
        Ok(stats) => {
            tracing::info!(
                "Finished: {} domains, {} ok, {} errors in {:?}",
                stats.domains,
                stats.ok,
                stats.errors,
                stats.elapsed
            );
            if !stats.is_clean() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!("Check run failed: {}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
