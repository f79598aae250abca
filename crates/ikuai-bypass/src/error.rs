//! CLI error types with miette diagnostics.
//!
//! Only startup failures surface here. A failed run is logged and retried
//! on the next schedule tick instead.

use miette::Diagnostic;
use thiserror::Error;

use ikuai_bypass_config::ConfigError;

/// Process exit codes. 2 is left to clap for usage errors.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 3;
    pub const SCHEDULE: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("Could not load configuration from {path}")]
    #[diagnostic(
        code(ikuai_bypass::config),
        help(
            "Pass the file with --config (-c) or IKUAI_BYPASS_CONFIG.\n\
             Files ending in .toml are read as TOML, anything else as YAML."
        )
    )]
    Config {
        path: String,
        #[source]
        source: ConfigError,
    },

    #[error("Invalid cron expression '{expr}': {reason}")]
    #[diagnostic(
        code(ikuai_bypass::schedule),
        help(
            "Use 5 fields (minute hour day month weekday), e.g. \"0 7 * * *\",\n\
             or 6-7 fields starting with seconds."
        )
    )]
    Schedule { expr: String, reason: String },

    #[error("Could not install signal handlers")]
    #[diagnostic(code(ikuai_bypass::signal))]
    Signal(#[source] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => exit_code::CONFIG,
            Self::Schedule { .. } => exit_code::SCHEDULE,
            Self::Signal(_) => exit_code::GENERAL,
        }
    }
}
