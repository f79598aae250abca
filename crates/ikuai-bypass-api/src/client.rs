// Router API HTTP client
//
// Wraps `reqwest::Client` with `/Action/*` URL construction and envelope
// unwrapping. Rule tables (custom_isp, ipgroup, ...) are implemented as
// inherent methods in `rules/` to keep this module focused on transport.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{
    CALL_OK, CallRequest, CallResponse, DeleteParam, RuleRow, SHOW_PAGE_SIZE, ShowData, ShowParam,
};
use crate::transport::TransportConfig;

/// Raw HTTP client for the router's web API.
///
/// The session cookie set by [`login`](Self::login) lives in the client's
/// cookie jar and is sent with every subsequent call. Nothing on the client
/// changes after login, so one instance can be shared by reference for a
/// whole run.
pub struct IkuaiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl IkuaiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// A cookie jar is added if the config doesn't carry one (session auth
    /// requires cookies). `base_url` is the router root, e.g.
    /// `http://192.168.9.1`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self { http, base_url })
    }

    /// The underlying HTTP client (for the login flow).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/Action/{action}`.
    pub(crate) fn action_url(&self, action: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("/Action/{action}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// `POST /Action/call` and unwrap the envelope's `Data`.
    pub(crate) async fn call<P, T>(
        &self,
        func_name: &str,
        action: &str,
        param: P,
    ) -> Result<Option<T>, Error>
    where
        P: Serialize,
        T: DeserializeOwned,
    {
        let url = self.action_url("call")?;
        debug!(func_name, action, "POST {}", url);

        let body = CallRequest {
            func_name,
            action,
            param,
        };

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let envelope: CallResponse<T> = parse_body(resp).await?;
        if envelope.result == CALL_OK {
            Ok(envelope.data)
        } else {
            Err(Error::Api {
                code: envelope.result,
                message: envelope
                    .err_msg
                    .unwrap_or_else(|| format!("Result={}", envelope.result)),
            })
        }
    }

    /// One page of `show` rows filtered by `finds`/`keywords`.
    ///
    /// The router matches `keywords` as a substring, so callers must check
    /// the returned rows themselves.
    pub(crate) async fn show(
        &self,
        func_name: &str,
        finds: &str,
        keywords: &str,
        offset: usize,
    ) -> Result<Vec<RuleRow>, Error> {
        let data: Option<ShowData<RuleRow>> = self
            .call(func_name, "show", ShowParam::find(finds, keywords, offset))
            .await?;
        Ok(data.map(|d| d.data).unwrap_or_default())
    }

    /// `add` one row to a table.
    pub(crate) async fn add(&self, func_name: &str, param: &impl Serialize) -> Result<(), Error> {
        let _: Option<serde_json::Value> = self.call(func_name, "add", param).await?;
        Ok(())
    }

    /// Delete every row of `func_name` tagged with `comment`.
    ///
    /// Rows whose comment only contains `comment` are kept and paged past;
    /// the loop ends on a short page with nothing left to delete. Returns
    /// the number of rows removed.
    pub(crate) async fn delete_by_comment(
        &self,
        func_name: &str,
        comment: &str,
    ) -> Result<usize, Error> {
        let mut removed = 0;
        // Kept rows sit ahead of the window and keep their order after a `del`.
        let mut offset = 0;
        let mut previous: Option<Vec<i64>> = None;

        loop {
            let rows = self.show(func_name, "comment", comment, offset).await?;
            let page_len = rows.len();
            let (tagged, kept): (Vec<RuleRow>, Vec<RuleRow>) =
                rows.into_iter().partition(|row| row.comment == comment);
            let ids: Vec<i64> = tagged.iter().map(|row| row.id).collect();

            if ids.is_empty() {
                if page_len < SHOW_PAGE_SIZE {
                    debug!(func_name, removed, "nothing left to delete");
                    return Ok(removed);
                }
                offset += page_len;
                continue;
            }
            if previous.as_ref() == Some(&ids) {
                return Err(Error::DeleteStalled {
                    func_name: func_name.to_owned(),
                });
            }

            let joined = ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            trace!(func_name, ids = %joined, offset, "deleting rows");

            let _: Option<serde_json::Value> = self
                .call(func_name, "del", DeleteParam { id: joined })
                .await?;

            removed += ids.len();
            offset += kept.len();
            previous = Some(ids);
        }
    }
}

/// Read the body as text and decode it, keeping the raw body on failure.
pub(crate) async fn parse_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            status: status.as_u16(),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}
