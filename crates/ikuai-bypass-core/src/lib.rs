//! Fetch–partition–reconcile pipeline for iKuai bypass rules.
//!
//! One run pulls every configured list, splits it into router-sized chunks,
//! and replaces the router's previous bypass rules with the new set:
//!
//! - **[`fetch`]**: retrieves each source, normalizes its lines, and
//!   partitions them. Any failure aborts the whole stage so nothing is
//!   deleted on the router unless every new rule set is in hand.
//!
//! - **[`reconcile`]**: deletes old rules per category, then adds the new
//!   ones. Every remote call is best-effort; outcomes are collected in a
//!   [`ReconcileReport`] instead of aborting.
//!
//! - **[`orchestrator`]**: the `idle → fetching → gate → reconciling → idle`
//!   state machine tying the two together. [`run`] logs in to the router
//!   (discovering the default gateway when no URL is configured) and
//!   [`run_with`] drives any [`RuleStore`].
//!
//! The router is reached through the [`RuleStore`] trait, implemented for
//! [`ikuai_bypass_api::IkuaiClient`].

pub mod config;
pub mod error;
pub mod fetch;
pub mod gateway;
pub mod model;
pub mod normalize;
pub mod orchestrator;
pub mod partition;
pub mod reconcile;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{BypassConfig, ListSource, RouterSettings, StreamDomainSource, StreamIpPortSource};
pub use error::{FetchError, RunError, SessionError};
pub use fetch::ListFetcher;
pub use model::{
    Category, CustomIspRecord, FetchedRules, IpGroupRecord, StreamDomainRecord, StreamIpPortRecord,
};
pub use orchestrator::{Orchestrator, RunState, run, run_with};
pub use partition::partition;
pub use reconcile::{OperationOutcome, Phase, ReconcileReport, reconcile};
pub use store::RuleStore;
