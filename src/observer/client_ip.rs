//! Client address extraction.

use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderMap;

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Best-effort client IP for a request.
///
/// With `trust_forwarded` set every proxy hop is trusted, so the left-most
/// `X-Forwarded-For` entry wins. A header with any unparseable entry is
/// discarded as a whole and `X-Real-IP` is tried next. Otherwise, or when
/// neither header is usable, the peer socket address is used. Empty when
/// nothing is known.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded: bool) -> String {
    if trust_forwarded {
        if let Some(ip) = forwarded_ip(headers) {
            return ip.to_string();
        }
    }
    peer.map(|addr| addr.ip().to_string()).unwrap_or_default()
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    [X_FORWARDED_FOR, X_REAL_IP].into_iter().find_map(|name| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(origin_of_chain)
    })
}

/// Walk a proxy chain from the nearest hop outwards; the last hop reached
/// is the origin. Any unparseable hop invalidates the chain.
fn origin_of_chain(chain: &str) -> Option<IpAddr> {
    let mut origin = None;
    for hop in chain.split(',').rev() {
        origin = Some(hop.trim().parse::<IpAddr>().ok()?);
    }
    origin
}
