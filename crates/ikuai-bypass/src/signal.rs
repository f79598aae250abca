//! SIGINT / SIGTERM handling.

use tokio::signal::unix::{Signal, SignalKind, signal};
use tracing::info;

use crate::error::CliError;

/// Registered termination signals.
pub struct Shutdown {
    interrupt: Signal,
    terminate: Signal,
}

impl Shutdown {
    /// Register handlers. Must be called inside the runtime.
    pub fn install() -> Result<Self, CliError> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt()).map_err(CliError::Signal)?,
            terminate: signal(SignalKind::terminate()).map_err(CliError::Signal)?,
        })
    }

    /// Resolve on the next SIGINT or SIGTERM.
    pub async fn recv(&mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => info!("received SIGINT, shutting down"),
            _ = self.terminate.recv() => info!("received SIGTERM, shutting down"),
        }
    }
}
