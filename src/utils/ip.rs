//! 客户端 IP 解析
//!
//! 点赞、翻译接口按 IP 限流，需要拿到真实客户端地址：
//! - 连接来自 `server.trusted_proxies` 中的地址时信任 X-Forwarded-For
//! - 未配置可信代理且连接来自内网地址时，视为反向代理部署
//! - 其余情况使用 TCP 对端地址

use std::net::{IpAddr, SocketAddr};

use actix_web::dev::ConnectionInfo;
use actix_web::http::header::HeaderMap;
use tracing::debug;

/// 私有地址或回环地址
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00 // fc00::/7
                || (v6.segments()[0] & 0xffc0) == 0xfe80 // fe80::/10
        }
    }
}

fn parse_peer(peer: &str) -> Option<IpAddr> {
    peer.parse::<SocketAddr>()
        .map(|s| s.ip())
        .or_else(|_| peer.parse::<IpAddr>())
        .ok()
}

/// `peer` 是否匹配可信代理列表（单 IP 或 CIDR）
pub fn is_trusted_proxy(peer: &str, trusted_proxies: &[String]) -> bool {
    let Some(ip) = parse_peer(peer) else {
        return false;
    };

    trusted_proxies.iter().any(|proxy| {
        if proxy.contains('/') {
            ip_in_cidr(&ip, proxy)
        } else {
            proxy.parse::<IpAddr>().is_ok_and(|p| p == ip)
        }
    })
}

pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };
    let Ok(prefix_len) = prefix_len.parse::<u32>() else {
        return false;
    };
    let Ok(network) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network) {
        (IpAddr::V4(ip), IpAddr::V4(net)) if prefix_len <= 32 => {
            let mask = u32::MAX.checked_shl(32 - prefix_len).unwrap_or(0);
            (u32::from(*ip) & mask) == (u32::from(net) & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) if prefix_len <= 128 => {
            let mask = u128::MAX.checked_shl(128 - prefix_len).unwrap_or(0);
            (u128::from(*ip) & mask) == (u128::from(net) & mask)
        }
        _ => false,
    }
}

/// 取 X-Forwarded-For 的第一个地址，其次 X-Real-IP
pub fn forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
        })
}

/// 解析客户端 IP
pub fn client_ip(
    conn_info: &ConnectionInfo,
    headers: &HeaderMap,
    trusted_proxies: &[String],
) -> Option<String> {
    let peer = conn_info.peer_addr()?;

    if !trusted_proxies.is_empty() {
        if is_trusted_proxy(peer, trusted_proxies) {
            let real = forwarded_ip(headers).unwrap_or_else(|| peer.to_string());
            debug!("Trusted proxy {} -> client {}", peer, real);
            return Some(real);
        }
        return Some(peer.to_string());
    }

    if parse_peer(peer).is_some_and(|ip| is_private_or_local(&ip))
        && let Some(real) = forwarded_ip(headers)
    {
        debug!("Private peer {}, using forwarded client {}", peer, real);
        return Some(real);
    }

    Some(peer.to_string())
}
