// ── Run orchestrator ──
//
// One run walks `idle → fetching → gate → reconciling → idle`. Session and
// fetch failures return to `idle` before the gate, so the router is never
// mutated by an aborted run. Nothing survives between runs: the caller hands
// in a freshly loaded `BypassConfig` each time.

use strum::Display;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use ikuai_bypass_api::TransportConfig;

use crate::config::BypassConfig;
use crate::error::RunError;
use crate::fetch::{ListFetcher, fetch_all};
use crate::reconcile::{ReconcileReport, reconcile};
use crate::session;
use crate::store::RuleStore;

/// Position of a run in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RunState {
    Idle,
    /// Establishing the router session and retrieving every source.
    Fetching,
    /// Every source is in hand; nothing has been mutated yet.
    Gate,
    Reconciling,
}

impl RunState {
    /// Whether `self → next` is an edge of the run state machine.
    pub fn can_transition_to(self, next: RunState) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Fetching)
                | (Self::Fetching, Self::Gate | Self::Idle)
                | (Self::Gate, Self::Reconciling | Self::Idle)
                | (Self::Reconciling, Self::Idle)
        )
    }
}

/// Drives runs and publishes the current [`RunState`].
pub struct Orchestrator {
    state: watch::Sender<RunState>,
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Orchestrator {
    pub fn new() -> Self {
        let (state, _) = watch::channel(RunState::Idle);
        Self { state }
    }

    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }

    /// Log in to the router, then fetch and reconcile.
    pub async fn run(&self, config: &BypassConfig) -> Result<ReconcileReport, RunError> {
        self.transition(RunState::Fetching);

        let prepared = async {
            let fetcher = ListFetcher::new(&TransportConfig::with_timeout(config.router.timeout))?;
            let client = session::connect(&config.router).await?;
            Ok::<_, RunError>((fetcher, client))
        }
        .await;

        match prepared {
            Ok((fetcher, client)) => self.fetch_and_reconcile(config, &fetcher, &client).await,
            Err(e) => Err(self.abort(e)),
        }
    }

    /// Fetch and reconcile against an already-authenticated `store`.
    pub async fn run_with<S: RuleStore>(
        &self,
        config: &BypassConfig,
        fetcher: &ListFetcher,
        store: &S,
    ) -> Result<ReconcileReport, RunError> {
        self.transition(RunState::Fetching);
        self.fetch_and_reconcile(config, fetcher, store).await
    }

    async fn fetch_and_reconcile<S: RuleStore>(
        &self,
        config: &BypassConfig,
        fetcher: &ListFetcher,
        store: &S,
    ) -> Result<ReconcileReport, RunError> {
        let rules = match fetch_all(config, fetcher, store).await {
            Ok(rules) => rules,
            Err(e) => return Err(self.abort(e.into())),
        };

        self.transition(RunState::Gate);
        self.transition(RunState::Reconciling);
        let report = reconcile(store, &rules).await;
        self.transition(RunState::Idle);

        if report.succeeded() {
            info!(operations = report.outcomes().len(), "run complete");
        } else {
            warn!(
                operations = report.outcomes().len(),
                failures = report.failure_count(),
                "run complete with failures"
            );
        }
        Ok(report)
    }

    fn abort(&self, err: RunError) -> RunError {
        error!(error = %err, "run aborted before any router change");
        self.transition(RunState::Idle);
        err
    }

    fn transition(&self, next: RunState) {
        let current = self.state();
        debug_assert!(
            current.can_transition_to(next),
            "invalid run state transition {current} -> {next}"
        );
        debug!(state = %next, from = %current, "run state");
        self.state.send_replace(next);
    }
}

/// Run the full pipeline once against the configured router.
pub async fn run(config: &BypassConfig) -> Result<ReconcileReport, RunError> {
    Orchestrator::new().run(config).await
}

/// Run the fetch and reconcile stages against `store`.
pub async fn run_with<S: RuleStore>(
    config: &BypassConfig,
    fetcher: &ListFetcher,
    store: &S,
) -> Result<ReconcileReport, RunError> {
    Orchestrator::new().run_with(config, fetcher, store).await
}
