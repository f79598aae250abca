use thiserror::Error;

/// Top-level error type for the `ikuai-bypass-api` crate.
///
/// Covers login, transport, and `/Action/call` failures.
/// `ikuai-bypass-core` maps these into run-level diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected (wrong credentials, HTTP error, unexpected result code).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Router answered with a non-success HTTP status.
    #[error("Unexpected HTTP status {status}")]
    HttpStatus { status: u16 },

    // ── Router API ──────────────────────────────────────────────────
    /// `/Action/call` answered with a non-success `Result` code.
    #[error("Router API error ({code}): {message}")]
    Api { code: i64, message: String },

    /// Deletion made no progress: the same rows came back after `del`.
    #[error("Delete of {func_name} rows made no progress")]
    DeleteStalled { func_name: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
