// ── Router session ──
//
// Resolves the router address and logs in. The returned client carries the
// session cookie and is the `RuleStore` for the rest of the run.

use tracing::info;

use ikuai_bypass_api::{IkuaiClient, TransportConfig};

use crate::config::RouterSettings;
use crate::error::SessionError;
use crate::gateway::{default_gateway, gateway_base_url};

/// Resolve the router base URL and authenticate.
///
/// Without a configured URL the host's default gateway is used.
pub async fn connect(router: &RouterSettings) -> Result<IkuaiClient, SessionError> {
    let base_url = match &router.base_url {
        Some(url) => url.clone(),
        None => {
            let gateway = default_gateway()?;
            info!(%gateway, "no router URL configured, using default gateway");
            gateway_base_url(gateway)?
        }
    };

    let transport = TransportConfig::with_timeout(router.timeout);
    let client = IkuaiClient::new(base_url.clone(), &transport).map_err(SessionError::Client)?;

    client
        .login(&router.username, &router.password)
        .await
        .map_err(|source| SessionError::Login {
            url: base_url.clone(),
            source,
        })?;

    info!(url = %base_url, user = %router.username, "logged in to router");
    Ok(client)
}
