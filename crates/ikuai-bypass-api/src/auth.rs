// Router authentication
//
// Cookie-based session login. The login endpoint sets `sess_key` in the
// client's jar; subsequent `/Action/call` requests use it automatically.
// There is no explicit logout: the session lapses on the router side.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use md5::{Digest, Md5};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::{IkuaiClient, parse_body};
use crate::error::Error;
use crate::models::{CallResponse, LOGIN_OK, LoginRequest};

/// Salt the web UI prepends before base64-encoding the password.
const PASS_SALT: &str = "salt_11";

impl IkuaiClient {
    /// Authenticate with the router using username/password.
    ///
    /// `POST /Action/login` with the password both md5-hex encoded
    /// (`passwd`) and salted + base64 encoded (`pass`), as the web UI
    /// sends it.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.action_url("login")?;
        debug!("logging in at {}", url);

        let body = login_request(username, password.expose_secret());

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let envelope: CallResponse<serde_json::Value> = parse_body(resp).await?;
        if envelope.result != LOGIN_OK {
            return Err(Error::Authentication {
                message: envelope
                    .err_msg
                    .unwrap_or_else(|| format!("Result={}", envelope.result)),
            });
        }

        debug!("login successful");
        Ok(())
    }
}

fn login_request<'a>(username: &'a str, password: &str) -> LoginRequest<'a> {
    LoginRequest {
        username,
        passwd: format!("{:x}", Md5::digest(password.as_bytes())),
        pass: STANDARD.encode(format!("{PASS_SALT}{password}")),
        remember_password: "",
    }
}
