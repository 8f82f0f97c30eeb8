use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{HeaderMap, request::Parts},
};

/// 无法识别来源时共用的标识
pub const UNKNOWN_CLIENT: &str = "unknown";

/// 按优先级确定客户端标识：
/// x-forwarded-for 的第一个地址 > x-real-ip > 连接地址 > "unknown"
pub fn client_identifier(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').map(str::trim).find(|ip| !ip.is_empty()));

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

/// 请求来源标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

impl<S> FromRequestParts<S> for ClientId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0);
        Ok(ClientId(client_identifier(&parts.headers, peer)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for &(name, value) in pairs {
            map.insert(name, HeaderValue::from_static(value));
        }
        map
    }

    fn peer() -> Option<SocketAddr> {
        Some("10.0.0.9:51000".parse().unwrap())
    }

    #[test]
    fn forwarded_for_first_entry_wins() {
        let h = headers(&[
            ("x-forwarded-for", " 1.2.3.4 , 5.6.7.8"),
            ("x-real-ip", "9.9.9.9"),
        ]);
        assert_eq!(client_identifier(&h, peer()), "1.2.3.4");
    }

    #[test]
    fn blank_forwarded_entries_are_skipped() {
        let h = headers(&[("x-forwarded-for", " , 5.6.7.8")]);
        assert_eq!(client_identifier(&h, peer()), "5.6.7.8");
    }

    #[test]
    fn real_ip_used_without_forwarded_for() {
        let h = headers(&[("x-real-ip", "9.9.9.9")]);
        assert_eq!(client_identifier(&h, peer()), "9.9.9.9");
    }

    #[test]
    fn falls_back_to_peer_address() {
        assert_eq!(client_identifier(&HeaderMap::new(), peer()), "10.0.0.9");
    }

    #[test]
    fn unknown_without_any_source() {
        let h = headers(&[("x-forwarded-for", "  ")]);
        assert_eq!(client_identifier(&h, None), UNKNOWN_CLIENT);
    }
}
