// ikuai-bypass-api: Async Rust client for the iKuai router web API
//
// Session login (`/Action/login`) plus the generic `/Action/call` RPC used
// for every rule table. Rule endpoints live in `rules/` as inherent methods
// on `IkuaiClient`, one file per table.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod rules;
pub mod transport;

pub use client::IkuaiClient;
pub use error::Error;
pub use models::{
    BYPASS_COMMENT, CustomIspEntry, IpGroupEntry, StreamDomainEntry, StreamIpPortEntry,
};
pub use transport::TransportConfig;
