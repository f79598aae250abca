// ── Core error types ──
//
// Only the run-aborting failure classes live here. Reconciliation failures
// are not errors at this level: they are recorded in the `ReconcileReport`
// and the run carries on.

use thiserror::Error;
use url::Url;

/// A source could not be retrieved or resolved. Aborts the whole run
/// before any router mutation.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build list HTTP client: {0}")]
    Client(#[source] ikuai_bypass_api::Error),

    #[error("failed to fetch {name} from {url}: {source}")]
    Transport {
        name: String,
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("{name}: {url} returned HTTP {status}")]
    Status { name: String, url: Url, status: u16 },

    #[error("failed to read {name} body from {url}: {source}")]
    Body {
        name: String,
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to resolve ip group '{group}' for stream rule on {interface}: {source}")]
    IpGroupResolution {
        group: String,
        interface: String,
        #[source]
        source: ikuai_bypass_api::Error,
    },
}

/// The router session could not be established. Aborts the run before
/// any router mutation.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("default gateway lookup failed: {reason}")]
    Gateway { reason: String },

    #[error("invalid router URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to create router client: {0}")]
    Client(#[source] ikuai_bypass_api::Error),

    #[error("login to {url} failed: {source}")]
    Login {
        url: Url,
        #[source]
        source: ikuai_bypass_api::Error,
    },
}

/// Why a run ended without reconciling.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
