//! Configuration file for ikuai-bypass.
//!
//! YAML (or TOML) file + `IKUAI_BYPASS_*` environment overlay, validation,
//! and translation to `ikuai_bypass_core::BypassConfig`. The binary loads
//! the file fresh before every run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Toml, Yaml},
};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use ikuai_bypass_core::{
    BypassConfig, ListSource, RouterSettings, StreamDomainSource, StreamIpPortSource,
};

/// Prefix of environment variables overlaid on the file.
pub const ENV_PREFIX: &str = "IKUAI_BYPASS_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── File schema ─────────────────────────────────────────────────────

/// Top-level configuration file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FileConfig {
    /// Router web UI root. Empty or absent = default gateway.
    #[serde(default)]
    pub ikuai_url: Option<String>,

    pub username: String,

    pub password: SecretString,

    /// Cron expression; empty or absent = run once.
    #[serde(default)]
    pub cron: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub custom_isp: Vec<ListSourceConfig>,

    #[serde(default)]
    pub ip_group: Vec<ListSourceConfig>,

    #[serde(default)]
    pub stream_domain: Vec<StreamDomainConfig>,

    #[serde(default)]
    pub stream_ipport: Vec<StreamIpPortConfig>,
}

fn default_timeout() -> u64 {
    30
}

/// `custom-isp` / `ip-group` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListSourceConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StreamDomainConfig {
    #[serde(default)]
    pub interface: String,
    #[serde(default)]
    pub src_addr: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StreamIpPortConfig {
    /// `"0"` = outbound interface, `"1"` = next hop.
    #[serde(rename = "type", default = "default_ipport_type")]
    pub kind: String,
    #[serde(default)]
    pub interface: String,
    #[serde(default)]
    pub nexthop: String,
    #[serde(default)]
    pub src_addr: String,
    /// Comma-separated IP group names.
    #[serde(default)]
    pub ip_group: String,
}

fn default_ipport_type() -> String {
    "0".into()
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the config file at `path` with the environment overlay applied.
///
/// `.toml` files are read as TOML, anything else as YAML.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let figment = if is_toml {
        Figment::new().merge(Toml::file(path))
    } else {
        Figment::new().merge(Yaml::file(path))
    };

    let figment = figment.merge(
        Env::prefixed(ENV_PREFIX)
            .ignore(&["config"])
            .map(|key| key.as_str().replace('_', "-").into()),
    );

    Ok(figment.extract()?)
}

/// Load, validate, and translate the config file at `path`.
pub fn load_bypass_config(path: &Path) -> Result<BypassConfig, ConfigError> {
    load_config(path)?.into_bypass_config()
}

// ── Translation ─────────────────────────────────────────────────────

impl FileConfig {
    /// Validate and convert into the value a run consumes.
    pub fn into_bypass_config(self) -> Result<BypassConfig, ConfigError> {
        let base_url = match self.ikuai_url.as_deref().and_then(non_empty) {
            Some(raw) => Some(parse_url("ikuai-url", raw)?),
            None => None,
        };

        if self.timeout == 0 {
            return Err(invalid("timeout", "must be at least 1 second"));
        }

        let custom_isp = list_sources("custom-isp", &self.custom_isp)?;
        let ip_group = list_sources("ip-group", &self.ip_group)?;

        let stream_domain = self
            .stream_domain
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let field = format!("stream-domain[{i}].url");
                let raw = non_empty(&entry.url).ok_or_else(|| invalid(&field, "is required"))?;
                Ok(StreamDomainSource {
                    interface: entry.interface.clone(),
                    src_addr: entry.src_addr.clone(),
                    url: parse_url(&field, raw)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let stream_ipport = self
            .stream_ipport
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let source = StreamIpPortSource {
                    kind: entry.kind.clone(),
                    interface: entry.interface.clone(),
                    nexthop: entry.nexthop.clone(),
                    src_addr: entry.src_addr.clone(),
                    ip_group: entry.ip_group.clone(),
                };
                if source.ip_group_refs().next().is_none() {
                    return Err(invalid(
                        format!("stream-ipport[{i}].ip-group"),
                        "must name at least one ip group",
                    ));
                }
                Ok(source)
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(BypassConfig {
            router: RouterSettings {
                base_url,
                username: self.username,
                password: self.password,
                timeout: Duration::from_secs(self.timeout),
            },
            schedule: self.cron.as_deref().and_then(non_empty).map(str::to_owned),
            custom_isp,
            ip_group,
            stream_domain,
            stream_ipport,
        })
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| invalid(field, format!("invalid URL '{raw}': {e}")))
}

fn list_sources(key: &str, entries: &[ListSourceConfig]) -> Result<Vec<ListSource>, ConfigError> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let name = non_empty(&entry.name)
                .ok_or_else(|| invalid(format!("{key}[{i}].name"), "is required"))?;
            let url_field = format!("{key}[{i}].url");
            let raw = non_empty(&entry.url).ok_or_else(|| invalid(&url_field, "is required"))?;
            Ok(ListSource {
                name: name.to_owned(),
                url: parse_url(&url_field, raw)?,
            })
        })
        .collect()
}
