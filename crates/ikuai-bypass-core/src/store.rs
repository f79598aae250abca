// ── Remote rule store seam ──
//
// The operations a run needs from the router. The orchestrator is generic
// over this trait so runs can be driven against an in-memory store.

use std::future::Future;

use ikuai_bypass_api::{
    CustomIspEntry, Error, IkuaiClient, IpGroupEntry, StreamDomainEntry, StreamIpPortEntry,
};

use crate::model::Category;

/// Authenticated access to the router's bypass rules.
///
/// Implementations are used read-only for the length of a run.
pub trait RuleStore: Sync {
    /// Remove every bypass rule in `category`; returns how many were removed.
    fn delete_all(&self, category: Category) -> impl Future<Output = Result<usize, Error>> + Send;

    fn add_custom_isp(&self, entry: &CustomIspEntry)
    -> impl Future<Output = Result<(), Error>> + Send;

    fn add_ip_group(&self, entry: &IpGroupEntry) -> impl Future<Output = Result<(), Error>> + Send;

    fn add_stream_domain(
        &self,
        entry: &StreamDomainEntry,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    fn add_stream_ipport(
        &self,
        entry: &StreamIpPortEntry,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Router group names that make up the IP group `name`.
    fn ip_group_members(&self, name: &str)
    -> impl Future<Output = Result<Vec<String>, Error>> + Send;
}

impl RuleStore for IkuaiClient {
    async fn delete_all(&self, category: Category) -> Result<usize, Error> {
        match category {
            Category::CustomIsp => self.delete_bypass_custom_isps().await,
            Category::IpGroup => self.delete_bypass_ip_groups().await,
            Category::StreamDomain => self.delete_bypass_stream_domains().await,
            Category::StreamIpPort => self.delete_bypass_stream_ipports().await,
        }
    }

    async fn add_custom_isp(&self, entry: &CustomIspEntry) -> Result<(), Error> {
        IkuaiClient::add_custom_isp(self, entry).await
    }

    async fn add_ip_group(&self, entry: &IpGroupEntry) -> Result<(), Error> {
        IkuaiClient::add_ip_group(self, entry).await
    }

    async fn add_stream_domain(&self, entry: &StreamDomainEntry) -> Result<(), Error> {
        IkuaiClient::add_stream_domain(self, entry).await
    }

    async fn add_stream_ipport(&self, entry: &StreamIpPortEntry) -> Result<(), Error> {
        IkuaiClient::add_stream_ipport(self, entry).await
    }

    async fn ip_group_members(&self, name: &str) -> Result<Vec<String>, Error> {
        self.bypass_ip_group_names(name).await
    }
}
