mod cli;
mod error;
mod scheduler;
mod signal;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ikuai_bypass_config::load_bypass_config;

use crate::cli::Cli;
use crate::error::CliError;
use crate::signal::Shutdown;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_bypass_config(&cli.config).map_err(|source| CliError::Config {
        path: cli.config.display().to_string(),
        source,
    })?;

    // Reject a bad schedule before touching the router.
    let schedule = config
        .schedule
        .as_deref()
        .map(scheduler::parse_schedule)
        .transpose()?;

    let mut shutdown = Shutdown::install()?;

    tokio::select! {
        () = shutdown.recv() => return Ok(()),
        () = scheduler::run_once(&config) => {}
    }

    match schedule {
        Some(schedule) => scheduler::run_scheduled(&schedule, &cli.config, &mut shutdown).await,
        None => {
            info!("no cron schedule configured, idling until shutdown");
            shutdown.recv().await;
        }
    }
    Ok(())
}
