mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{CacheArgs, Cli, Commands};
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("pepcache v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let Cli {
        command,
        cache,
        threads,
        ..
    } = cli;

    let command_result = match command {
        Commands::Normalize(args) => {
            info!("Dispatching to 'normalize' command.");
            commands::normalize::run(args);
            Ok(())
        }
        Commands::Annotate(args) => {
            info!("Dispatching to 'annotate' command.");
            prepare(&cache, threads).and_then(|config| commands::annotate::run(args, config))
        }
        Commands::Batch(args) => {
            info!("Dispatching to 'batch' command.");
            prepare(&cache, threads).and_then(|config| commands::batch::run(args, config))
        }
        Commands::Status(args) => {
            info!("Dispatching to 'status' command.");
            prepare(&cache, threads).and_then(|config| commands::status::run(args, config))
        }
        Commands::Queue => {
            info!("Dispatching to 'queue' command.");
            prepare(&cache, threads).and_then(commands::queue::run)
        }
    };

    match &command_result {
        Ok(()) => info!("Command completed successfully."),
        Err(e) => error!("Command failed: {}", e),
    }
    command_result
}

/// Resolves the cache configuration and sizes the global thread pool.
fn prepare(cache: &CacheArgs, threads: Option<usize>) -> Result<AppConfig> {
    let config = config::build_config(cache, threads)?;
    if let Some(num_threads) = config.threads {
        info!(
            "Setting Rayon global thread pool to {} threads.",
            num_threads
        );
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }
    Ok(config)
}
