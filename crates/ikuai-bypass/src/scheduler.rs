//! Cron-driven run loop.
//!
//! The next occurrence is computed after each run returns, so runs never
//! overlap and ticks missed during a long run are dropped.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::Local;
use cron::Schedule;
use tracing::{info, warn};

use ikuai_bypass_config::load_bypass_config;
use ikuai_bypass_core::BypassConfig;

use crate::error::CliError;
use crate::signal::Shutdown;

/// Parse a cron expression.
///
/// Classic 5-field expressions (minute first) get a zero seconds field
/// prepended; 6 and 7 field expressions are taken as-is.
pub fn parse_schedule(expr: &str) -> Result<Schedule, CliError> {
    Schedule::from_str(&normalize(expr)).map_err(|e| CliError::Schedule {
        expr: expr.to_owned(),
        reason: e.to_string(),
    })
}

fn normalize(expr: &str) -> String {
    let expr = expr.trim();
    if expr.split_whitespace().count() == 5 {
        format!("0 {expr}")
    } else {
        expr.to_owned()
    }
}

/// One run with the given configuration. Failures are logged by the
/// orchestrator; the next trigger is the only retry.
pub async fn run_once(config: &BypassConfig) {
    match ikuai_bypass_core::run(config).await {
        Ok(report) if !report.succeeded() => {
            for failure in report.failures() {
                warn!(
                    category = %failure.category,
                    phase = %failure.phase,
                    target = %failure.target,
                    "left unapplied until the next run"
                );
            }
        }
        Ok(_) => {}
        Err(_) => warn!("run aborted, waiting for the next trigger"),
    }
}

/// Reload the configuration and run until a shutdown signal arrives.
pub async fn run_scheduled(schedule: &Schedule, config_path: &Path, shutdown: &mut Shutdown) {
    loop {
        let Some(next) = schedule.upcoming(Local).next() else {
            warn!("cron schedule has no upcoming occurrences, idling");
            shutdown.recv().await;
            return;
        };
        let wait = (next - Local::now()).to_std().unwrap_or(Duration::ZERO);
        info!(next = %next.format("%Y-%m-%d %H:%M:%S"), "next run scheduled");

        tokio::select! {
            () = shutdown.recv() => return,
            () = tokio::time::sleep(wait) => {}
        }

        tokio::select! {
            () = shutdown.recv() => return,
            () = tick(config_path) => {}
        }
    }
}

async fn tick(config_path: &Path) {
    match load_bypass_config(config_path) {
        Ok(config) => run_once(&config).await,
        Err(e) => warn!(
            path = %config_path.display(),
            error = %e,
            "could not reload configuration, skipping this run"
        ),
    }
}
