// ── Rule-category records ──
//
// Fully resolved, ready-to-apply values produced by the fetch stage and
// consumed by reconciliation. They own no resources and live for one run.

use std::num::NonZeroUsize;

use strum::Display;

const fn limit(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => panic!("chunk limit must be positive"),
    }
}

/// Most addresses the router accepts in one custom ISP row.
pub const CUSTOM_ISP_CHUNK: NonZeroUsize = limit(5000);
/// Most addresses the router accepts in one IP group.
pub const IP_GROUP_CHUNK: NonZeroUsize = limit(1000);
/// Most domains the router accepts in one domain stream rule.
pub const STREAM_DOMAIN_CHUNK: NonZeroUsize = limit(1000);

/// The four independently managed rule kinds, in reconciliation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Category {
    #[strum(serialize = "custom-isp")]
    CustomIsp,
    #[strum(serialize = "ip-group")]
    IpGroup,
    #[strum(serialize = "stream-domain")]
    StreamDomain,
    #[strum(serialize = "stream-ipport")]
    StreamIpPort,
}

impl Category {
    /// Every category, in the order deletes and adds are issued.
    pub const ALL: [Self; 4] = [
        Self::CustomIsp,
        Self::IpGroup,
        Self::StreamDomain,
        Self::StreamIpPort,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomIspRecord {
    pub name: String,
    pub chunks: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpGroupRecord {
    /// Base name; each chunk is added as `<name>_<index>`.
    pub name: String,
    pub chunks: Vec<Vec<String>>,
}

impl IpGroupRecord {
    /// Router-side group name of chunk `index`.
    pub fn chunk_name(&self, index: usize) -> String {
        format!("{}_{index}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDomainRecord {
    pub interface: String,
    pub src_addr: String,
    pub chunks: Vec<Vec<String>>,
}

/// One IP/port rule; applied as a single row, never chunked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamIpPortRecord {
    pub kind: String,
    pub interface: String,
    pub nexthop: String,
    pub src_addr: String,
    /// Resolved router group names from every referenced IP group.
    pub ip_groups: Vec<String>,
}

/// Output of a successful fetch stage: one record per configured source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedRules {
    pub custom_isp: Vec<CustomIspRecord>,
    pub ip_group: Vec<IpGroupRecord>,
    pub stream_domain: Vec<StreamDomainRecord>,
    pub stream_ipport: Vec<StreamIpPortRecord>,
}

impl FetchedRules {
    /// Number of records fetched for `category`.
    pub fn record_count(&self, category: Category) -> usize {
        match category {
            Category::CustomIsp => self.custom_isp.len(),
            Category::IpGroup => self.ip_group.len(),
            Category::StreamDomain => self.stream_domain.len(),
            Category::StreamIpPort => self.stream_ipport.len(),
        }
    }
}
