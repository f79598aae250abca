//! Clap derive structures for the `ikuai-bypass` binary.

use std::path::PathBuf;

use clap::Parser;

/// ikuai-bypass -- keep iKuai bypass rules in sync with remote lists
#[derive(Debug, Parser)]
#[command(
    name = "ikuai-bypass",
    version,
    about = "Sync iKuai router bypass rules from remote IP and domain lists",
    long_about = "Fetches the configured custom ISP, IP group and domain lists, splits them\n\
        into router-sized chunks, and replaces the rules previously created by this\n\
        tool. Runs once at start, then on the configured cron schedule."
)]
pub struct Cli {
    /// Configuration file (YAML, or TOML with a .toml extension)
    #[arg(long, short = 'c', env = "IKUAI_BYPASS_CONFIG", default_value = "./config.yml")]
    pub config: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}
