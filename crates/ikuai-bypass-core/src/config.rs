// ── Runtime run configuration ──
//
// These types describe *what* one run reconciles and *where*. They carry
// credentials and source lists but never touch disk: the binary loads the
// file fresh before every run and hands the resulting value in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// How to reach and authenticate with the router.
#[derive(Debug, Clone)]
pub struct RouterSettings {
    /// Router web UI root (e.g. `http://192.168.9.1`). `None` = use the
    /// host's default gateway.
    pub base_url: Option<Url>,
    pub username: String,
    pub password: SecretString,
    /// Per-request timeout for router calls and list downloads.
    pub timeout: Duration,
}

/// A named remote list (custom ISP or IP group category).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSource {
    pub name: String,
    pub url: Url,
}

/// A remote domain list routed out of one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDomainSource {
    pub interface: String,
    pub src_addr: String,
    pub url: Url,
}

/// An IP/port routing rule over IP groups already on the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamIpPortSource {
    /// Routing mode as the router encodes it (`"0"` = outbound interface,
    /// `"1"` = next hop).
    pub kind: String,
    pub interface: String,
    pub nexthop: String,
    pub src_addr: String,
    /// Comma-separated IP group names.
    pub ip_group: String,
}

impl StreamIpPortSource {
    /// The referenced group names, trimmed, with empty entries dropped.
    pub fn ip_group_refs(&self) -> impl Iterator<Item = &str> {
        self.ip_group
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Everything one run needs.
///
/// Built by the binary from the config file; core never reads config files.
#[derive(Debug, Clone)]
pub struct BypassConfig {
    pub router: RouterSettings,
    /// Cron expression for periodic runs. `None` = run once.
    pub schedule: Option<String>,
    pub custom_isp: Vec<ListSource>,
    pub ip_group: Vec<ListSource>,
    pub stream_domain: Vec<StreamDomainSource>,
    pub stream_ipport: Vec<StreamIpPortSource>,
}
