// ── Reconciliation stage ──
//
// Replaces the router's bypass rules with freshly fetched records.
//
// Protocol, in this exact order:
//   1. delete-all for custom-isp, ip-group, stream-domain, stream-ipport
//   2. add new records for custom-isp, ip-group, stream-domain, stream-ipport
//
// Every delete and every add is best-effort: a failure is logged, recorded
// in the report, and the stage moves on. A category with no records is not
// deleted, so an empty source list never wipes rules without replacing them.

use strum::Display;
use tracing::{debug, info, warn};

use ikuai_bypass_api::{
    CustomIspEntry, Error, IpGroupEntry, StreamDomainEntry, StreamIpPortEntry,
};

use crate::model::{
    Category, CustomIspRecord, FetchedRules, IpGroupRecord, StreamDomainRecord,
    StreamIpPortRecord,
};
use crate::store::RuleStore;

/// Which protocol step an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Delete,
    Add,
    /// Delete not issued because the category has no records.
    Skip,
}

/// Result of one remote call (or skipped call) during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub category: Category,
    pub phase: Phase,
    /// Identity of the rule touched: category name for deletes, record
    /// name / interface (plus chunk) for adds.
    pub target: String,
    /// Error message when the call failed.
    pub error: Option<String>,
}

impl OperationOutcome {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Ordered outcomes of every reconciliation step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    outcomes: Vec<OperationOutcome>,
}

impl ReconcileReport {
    pub fn outcomes(&self) -> &[OperationOutcome] {
        &self.outcomes
    }

    pub fn failures(&self) -> impl Iterator<Item = &OperationOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// `true` when no call failed.
    pub fn succeeded(&self) -> bool {
        self.failure_count() == 0
    }

    /// Number of outcomes in `phase`.
    pub fn count(&self, phase: Phase) -> usize {
        self.outcomes.iter().filter(|o| o.phase == phase).count()
    }

    fn record(&mut self, category: Category, phase: Phase, target: String, result: Result<(), Error>) {
        let error = match result {
            Ok(()) => None,
            Err(e) => {
                warn!(%category, %phase, target = %target, error = %e, "rule operation failed");
                Some(e.to_string())
            }
        };
        self.outcomes.push(OperationOutcome {
            category,
            phase,
            target,
            error,
        });
    }

    fn skip(&mut self, category: Category) {
        self.outcomes.push(OperationOutcome {
            category,
            phase: Phase::Skip,
            target: category.to_string(),
            error: None,
        });
    }
}

/// Delete old rules per category, then add `rules`, collecting every outcome.
pub async fn reconcile<S: RuleStore>(store: &S, rules: &FetchedRules) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    delete_old_rules(store, rules, &mut report).await;

    apply_custom_isps(store, &rules.custom_isp, &mut report).await;
    apply_ip_groups(store, &rules.ip_group, &mut report).await;
    apply_stream_domains(store, &rules.stream_domain, &mut report).await;
    apply_stream_ipports(store, &rules.stream_ipport, &mut report).await;

    info!(
        deletes = report.count(Phase::Delete),
        adds = report.count(Phase::Add),
        failures = report.failure_count(),
        "reconciliation finished"
    );
    report
}

async fn delete_old_rules<S: RuleStore>(store: &S, rules: &FetchedRules, report: &mut ReconcileReport) {
    for category in Category::ALL {
        if rules.record_count(category) == 0 {
            info!(%category, "no sources configured, leaving existing rules");
            report.skip(category);
            continue;
        }
        let result = store.delete_all(category).await;
        if let Ok(removed) = result {
            info!(%category, removed, "removed old rules");
        }
        report.record(category, Phase::Delete, category.to_string(), result.map(|_| ()));
    }
}

async fn apply_custom_isps<S: RuleStore>(
    store: &S,
    records: &[CustomIspRecord],
    report: &mut ReconcileReport,
) {
    for record in records {
        let failed_before = report.failure_count();
        for (index, chunk) in record.chunks.iter().enumerate() {
            let entry = CustomIspEntry::new(record.name.as_str(), chunk.join(","));
            debug!(name = %record.name, chunk = index, entries = chunk.len(), "adding custom isp chunk");
            let result = store.add_custom_isp(&entry).await;
            report.record(
                Category::CustomIsp,
                Phase::Add,
                format!("{} [{index}]", record.name),
                result,
            );
        }
        info!(
            name = %record.name,
            chunks = record.chunks.len(),
            failed = report.failure_count() - failed_before,
            "applied custom isp"
        );
    }
}

async fn apply_ip_groups<S: RuleStore>(
    store: &S,
    records: &[IpGroupRecord],
    report: &mut ReconcileReport,
) {
    for record in records {
        let failed_before = report.failure_count();
        for (index, chunk) in record.chunks.iter().enumerate() {
            let group_name = record.chunk_name(index);
            let entry = IpGroupEntry::new(group_name.as_str(), chunk.join(","));
            debug!(group = %group_name, entries = chunk.len(), "adding ip group chunk");
            let result = store.add_ip_group(&entry).await;
            report.record(Category::IpGroup, Phase::Add, group_name, result);
        }
        info!(
            name = %record.name,
            chunks = record.chunks.len(),
            failed = report.failure_count() - failed_before,
            "applied ip group"
        );
    }
}

async fn apply_stream_domains<S: RuleStore>(
    store: &S,
    records: &[StreamDomainRecord],
    report: &mut ReconcileReport,
) {
    for record in records {
        let failed_before = report.failure_count();
        for (index, chunk) in record.chunks.iter().enumerate() {
            let entry = StreamDomainEntry::new(
                record.interface.as_str(),
                record.src_addr.as_str(),
                chunk.join(","),
            );
            debug!(interface = %record.interface, chunk = index, entries = chunk.len(), "adding domain chunk");
            let result = store.add_stream_domain(&entry).await;
            report.record(
                Category::StreamDomain,
                Phase::Add,
                format!("{} [{index}]", record.interface),
                result,
            );
        }
        info!(
            interface = %record.interface,
            chunks = record.chunks.len(),
            failed = report.failure_count() - failed_before,
            "applied domain stream rules"
        );
    }
}

async fn apply_stream_ipports<S: RuleStore>(
    store: &S,
    records: &[StreamIpPortRecord],
    report: &mut ReconcileReport,
) {
    for record in records {
        let entry = StreamIpPortEntry::new(
            record.kind.as_str(),
            record.interface.as_str(),
            record.nexthop.as_str(),
            record.src_addr.as_str(),
            record.ip_groups.join(","),
        );
        let result = store.add_stream_ipport(&entry).await;
        if result.is_ok() {
            info!(interface = %record.interface, groups = record.ip_groups.len(), "applied ip/port stream rule");
        }
        report.record(
            Category::StreamIpPort,
            Phase::Add,
            record.interface.clone(),
            result,
        );
    }
}
