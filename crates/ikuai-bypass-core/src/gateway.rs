// ── Default gateway discovery ──
//
// Used only when no router URL is configured: the router is assumed to be
// the host's default gateway.

use std::fs;
use std::net::Ipv4Addr;

use tracing::debug;
use url::Url;

use crate::error::SessionError;

const ROUTE_TABLE: &str = "/proc/net/route";

/// `RTF_GATEWAY` from the kernel route flags.
const RTF_GATEWAY: u32 = 0x2;

/// Look up the IPv4 default gateway from the kernel routing table.
pub fn default_gateway() -> Result<Ipv4Addr, SessionError> {
    let table = fs::read_to_string(ROUTE_TABLE).map_err(|e| SessionError::Gateway {
        reason: format!("cannot read {ROUTE_TABLE}: {e}"),
    })?;
    let gateway = parse_default_gateway(&table).ok_or_else(|| SessionError::Gateway {
        reason: format!("no default route in {ROUTE_TABLE}"),
    })?;
    debug!(%gateway, "found default gateway");
    Ok(gateway)
}

/// Router base URL for a gateway address.
pub fn gateway_base_url(gateway: Ipv4Addr) -> Result<Url, SessionError> {
    let url = format!("http://{gateway}");
    Url::parse(&url).map_err(|source| SessionError::InvalidBaseUrl { url, source })
}

/// First default route with the gateway flag set.
///
/// Columns are `Iface Destination Gateway Flags ...`; addresses are the
/// kernel's network-order `u32` printed as native-endian hex.
pub fn parse_default_gateway(table: &str) -> Option<Ipv4Addr> {
    table.lines().skip(1).find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let (destination, gateway, flags) = (fields.get(1)?, fields.get(2)?, fields.get(3)?);
        if *destination != "00000000" {
            return None;
        }
        let flags = u32::from_str_radix(flags, 16).ok()?;
        if flags & RTF_GATEWAY == 0 {
            return None;
        }
        let raw = u32::from_str_radix(gateway, 16).ok()?;
        Some(Ipv4Addr::from(raw.to_ne_bytes()))
    })
}
