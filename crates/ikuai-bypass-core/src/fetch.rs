// ── Fetch stage ──
//
// Retrieves every configured source for all four categories and turns them
// into ready-to-apply records. The first failure aborts the whole stage:
// reconciliation deletes before it adds, so no router rule may be touched
// until every new rule set has been retrieved.

use reqwest::StatusCode;
use tracing::{debug, info};
use url::Url;

use ikuai_bypass_api::TransportConfig;

use crate::config::{BypassConfig, ListSource, StreamDomainSource, StreamIpPortSource};
use crate::error::FetchError;
use crate::model::{
    CUSTOM_ISP_CHUNK, CustomIspRecord, FetchedRules, IP_GROUP_CHUNK, IpGroupRecord,
    STREAM_DOMAIN_CHUNK, StreamDomainRecord, StreamIpPortRecord,
};
use crate::normalize::{domain_entries, ip_entries};
use crate::partition::partition;
use crate::store::RuleStore;

/// Plain HTTP GET retrieval of list bodies.
pub struct ListFetcher {
    http: reqwest::Client,
}

impl ListFetcher {
    pub fn new(transport: &TransportConfig) -> Result<Self, FetchError> {
        let http = transport.build_client().map_err(FetchError::Client)?;
        Ok(Self { http })
    }

    /// Create a fetcher with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// GET `url` and return its body. Anything but `200 OK` is an error.
    ///
    /// `name` identifies the source in errors and logs.
    pub async fn fetch_text(&self, name: &str, url: &Url) -> Result<String, FetchError> {
        debug!(name, %url, "GET");

        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                name: name.to_owned(),
                url: url.clone(),
                source,
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                name: name.to_owned(),
                url: url.clone(),
                status: status.as_u16(),
            });
        }

        resp.text().await.map_err(|source| FetchError::Body {
            name: name.to_owned(),
            url: url.clone(),
            source,
        })
    }
}

/// Run the fetch stage for every category.
///
/// Categories are fetched in reconciliation order; IP/port rules resolve
/// their group references through `store` (read-only).
pub async fn fetch_all<S: RuleStore>(
    config: &BypassConfig,
    fetcher: &ListFetcher,
    store: &S,
) -> Result<FetchedRules, FetchError> {
    let rules = FetchedRules {
        custom_isp: fetch_custom_isps(fetcher, &config.custom_isp).await?,
        ip_group: fetch_ip_groups(fetcher, &config.ip_group).await?,
        stream_domain: fetch_stream_domains(fetcher, &config.stream_domain).await?,
        stream_ipport: resolve_stream_ipports(store, &config.stream_ipport).await?,
    };
    info!(
        custom_isp = rules.custom_isp.len(),
        ip_group = rules.ip_group.len(),
        stream_domain = rules.stream_domain.len(),
        stream_ipport = rules.stream_ipport.len(),
        "fetched all sources"
    );
    Ok(rules)
}

pub async fn fetch_custom_isps(
    fetcher: &ListFetcher,
    sources: &[ListSource],
) -> Result<Vec<CustomIspRecord>, FetchError> {
    let mut records = Vec::with_capacity(sources.len());
    for source in sources {
        let body = fetcher.fetch_text(&source.name, &source.url).await?;
        let entries = ip_entries(&body);
        debug!(name = %source.name, entries = entries.len(), "fetched custom isp list");
        records.push(CustomIspRecord {
            name: source.name.clone(),
            chunks: partition(entries, CUSTOM_ISP_CHUNK),
        });
    }
    Ok(records)
}

pub async fn fetch_ip_groups(
    fetcher: &ListFetcher,
    sources: &[ListSource],
) -> Result<Vec<IpGroupRecord>, FetchError> {
    let mut records = Vec::with_capacity(sources.len());
    for source in sources {
        let body = fetcher.fetch_text(&source.name, &source.url).await?;
        let entries = ip_entries(&body);
        debug!(name = %source.name, entries = entries.len(), "fetched ip group list");
        records.push(IpGroupRecord {
            name: source.name.clone(),
            chunks: partition(entries, IP_GROUP_CHUNK),
        });
    }
    Ok(records)
}

pub async fn fetch_stream_domains(
    fetcher: &ListFetcher,
    sources: &[StreamDomainSource],
) -> Result<Vec<StreamDomainRecord>, FetchError> {
    let mut records = Vec::with_capacity(sources.len());
    for source in sources {
        let body = fetcher.fetch_text(source.url.as_str(), &source.url).await?;
        let entries = domain_entries(&body);
        debug!(interface = %source.interface, entries = entries.len(), "fetched domain list");
        records.push(StreamDomainRecord {
            interface: source.interface.clone(),
            src_addr: source.src_addr.clone(),
            chunks: partition(entries, STREAM_DOMAIN_CHUNK),
        });
    }
    Ok(records)
}

/// Resolve each rule's comma-separated group references into one flat list
/// of router group names. Rules are not partitioned.
pub async fn resolve_stream_ipports<S: RuleStore>(
    store: &S,
    rules: &[StreamIpPortSource],
) -> Result<Vec<StreamIpPortRecord>, FetchError> {
    let mut records = Vec::with_capacity(rules.len());
    for rule in rules {
        let mut ip_groups = Vec::new();
        for group in rule.ip_group_refs() {
            let members = store.ip_group_members(group).await.map_err(|source| {
                FetchError::IpGroupResolution {
                    group: group.to_owned(),
                    interface: rule.interface.clone(),
                    source,
                }
            })?;
            ip_groups.extend(members);
        }
        debug!(interface = %rule.interface, groups = ip_groups.len(), "resolved ip/port rule");
        records.push(StreamIpPortRecord {
            kind: rule.kind.clone(),
            interface: rule.interface.clone(),
            nexthop: rule.nexthop.clone(),
            src_addr: rule.src_addr.clone(),
            ip_groups,
        });
    }
    Ok(records)
}
