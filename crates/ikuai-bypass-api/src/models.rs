// Router API request/response types
//
// Every call goes through `/Action/call` with a `{func_name, action, param}`
// body and comes back in a `{Result, ErrMsg, Data}` envelope. Rule payloads
// carry the `IKUAI_BYPASS` comment so a later run can find and delete them.

use serde::{Deserialize, Serialize};

/// Comment stamped on every rule this tool creates.
pub const BYPASS_COMMENT: &str = "IKUAI_BYPASS";

/// `Result` code of a successful `/Action/login`.
pub(crate) const LOGIN_OK: i64 = 10000;

/// `Result` code of a successful `/Action/call`.
pub(crate) const CALL_OK: i64 = 30000;

/// Rows requested per `show` page.
pub(crate) const SHOW_PAGE_SIZE: usize = 1000;

const ALL_WEEK: &str = "1234567";
const ALL_DAY: &str = "00:00-23:59";

// ── Envelope ─────────────────────────────────────────────────────────

/// Response envelope shared by `/Action/login` and `/Action/call`.
///
/// ```json
/// { "Result": 30000, "ErrMsg": "Success", "Data": { ... } }
/// ```
#[derive(Debug, Deserialize)]
pub struct CallResponse<T> {
    #[serde(rename = "Result")]
    pub result: i64,
    #[serde(rename = "ErrMsg", default)]
    pub err_msg: Option<String>,
    #[serde(rename = "Data", default = "Option::default")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CallRequest<'a, P> {
    pub func_name: &'a str,
    pub action: &'a str,
    pub param: P,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub passwd: String,
    pub pass: String,
    pub remember_password: &'a str,
}

// ── show ─────────────────────────────────────────────────────────────

/// Filtered listing request for a rule table.
#[derive(Debug, Serialize)]
pub(crate) struct ShowParam<'a> {
    #[serde(rename = "TYPE")]
    pub kind: &'a str,
    pub limit: String,
    #[serde(rename = "ORDER_BY")]
    pub order_by: &'a str,
    #[serde(rename = "ORDER")]
    pub order: &'a str,
    #[serde(rename = "FINDS")]
    pub finds: &'a str,
    #[serde(rename = "KEYWORDS")]
    pub keywords: &'a str,
}

impl<'a> ShowParam<'a> {
    /// One page of at most `SHOW_PAGE_SIZE` rows starting at row `offset`.
    pub(crate) fn find(finds: &'a str, keywords: &'a str, offset: usize) -> Self {
        Self {
            kind: "total,data",
            limit: format!("{offset},{SHOW_PAGE_SIZE}"),
            order_by: "",
            order: "",
            finds,
            keywords,
        }
    }
}

/// `Data` payload of a `show` call.
#[derive(Debug, Deserialize)]
pub struct ShowData<T> {
    #[serde(default)]
    pub total: u64,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// The subset of a rule row this tool reads back.
///
/// Tables share `id` and `comment`; `group_name` is only present on `ipgroup`.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleRow {
    pub id: i64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub group_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteParam {
    pub id: String,
}

// ── Rule payloads ────────────────────────────────────────────────────

/// `custom_isp` row: a named ISP address list used for multi-WAN routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomIspEntry {
    pub name: String,
    /// Comma-joined addresses / CIDRs.
    pub ipgroup: String,
    pub comment: String,
}

impl CustomIspEntry {
    pub fn new(name: impl Into<String>, ipgroup: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ipgroup: ipgroup.into(),
            comment: BYPASS_COMMENT.into(),
        }
    }
}

/// `ipgroup` row: a named address pool referenced by stream rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpGroupEntry {
    pub group_name: String,
    /// Comma-joined addresses / CIDRs.
    pub addr_pool: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub comment: String,
}

impl IpGroupEntry {
    pub fn new(group_name: impl Into<String>, addr_pool: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            addr_pool: addr_pool.into(),
            kind: 0,
            comment: BYPASS_COMMENT.into(),
        }
    }
}

/// `stream_domain` row: route matching domains out of one interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamDomainEntry {
    pub interface: String,
    pub src_addr: String,
    /// Comma-joined domains.
    pub domain: String,
    pub week: String,
    pub time: String,
    pub enabled: String,
    pub comment: String,
}

impl StreamDomainEntry {
    pub fn new(
        interface: impl Into<String>,
        src_addr: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            interface: interface.into(),
            src_addr: src_addr.into(),
            domain: domain.into(),
            week: ALL_WEEK.into(),
            time: ALL_DAY.into(),
            enabled: "yes".into(),
            comment: BYPASS_COMMENT.into(),
        }
    }
}

/// `stream_ipport` row: route traffic to the given IP groups via an
/// interface or next hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamIpPortEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub interface: String,
    pub nexthop: String,
    pub src_addr: String,
    /// Comma-joined IP group names.
    pub dst_addr: String,
    pub src_port: String,
    pub dst_port: String,
    pub protocol: String,
    pub mode: u8,
    pub iface_band: u8,
    pub week: String,
    pub time: String,
    pub enabled: String,
    pub comment: String,
}

impl StreamIpPortEntry {
    pub fn new(
        kind: impl Into<String>,
        interface: impl Into<String>,
        nexthop: impl Into<String>,
        src_addr: impl Into<String>,
        dst_addr: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            interface: interface.into(),
            nexthop: nexthop.into(),
            src_addr: src_addr.into(),
            dst_addr: dst_addr.into(),
            src_port: String::new(),
            dst_port: String::new(),
            protocol: "tcp+udp".into(),
            mode: 0,
            iface_band: 0,
            week: ALL_WEEK.into(),
            time: ALL_DAY.into(),
            enabled: "yes".into(),
            comment: BYPASS_COMMENT.into(),
        }
    }
}
