//! Client IP extraction.
//!
//! Validated extraction from `X-Forwarded-For` with a configurable trusted
//! proxy count, so a spoofed header cannot pick the provenance IP or dodge
//! the rate limiter.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Extract the client IP for provenance and rate limiting.
///
/// Tries `X-Forwarded-For` (validated against `trusted_proxy_count`), then
/// `X-Real-IP`, then the direct socket address. Returns `"unknown"` when
/// nothing usable is available.
pub fn extract_client_ip(
    headers: &HeaderMap,
    socket_addr: Option<&std::net::SocketAddr>,
    trusted_proxy_count: usize,
) -> String {
    if let Some(forwarded_for) = headers.get("x-forwarded-for") {
        if let Ok(header_value) = forwarded_for.to_str() {
            let ip = extract_from_forwarded_for(header_value, trusted_proxy_count);
            if ip != "unknown" {
                return ip;
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip") {
        if let Ok(header_value) = real_ip.to_str() {
            let trimmed = header_value.trim();
            if is_valid_ip(trimmed) {
                return trimmed.to_string();
            }
        }
    }

    if let Some(addr) = socket_addr {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

/// Pick the client IP out of an `X-Forwarded-For` chain
/// (`client, proxy1, proxy2, ...`): with N trusted proxies at the end of the
/// chain, the client sits just before them.
fn extract_from_forwarded_for(header_value: &str, trusted_proxy_count: usize) -> String {
    let ips: Vec<&str> = header_value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if ips.is_empty() {
        return "unknown".to_string();
    }

    // With no trusted proxies the header is unverifiable; fall back to the
    // last entry (closest to us). Same fallback when the chain is shorter
    // than the proxy count.
    if trusted_proxy_count == 0 || ips.len() <= trusted_proxy_count {
        let last_ip = ips.last().unwrap_or(&"");
        if is_valid_ip(last_ip) {
            return last_ip.to_string();
        }
        return "unknown".to_string();
    }

    let client_ip_pos = ips.len().saturating_sub(trusted_proxy_count + 1);
    let client_ip = ips.get(client_ip_pos).unwrap_or(&"");

    if is_valid_ip(client_ip) {
        return client_ip.to_string();
    }

    "unknown".to_string()
}

fn is_valid_ip(ip_str: &str) -> bool {
    ip_str.parse::<IpAddr>().is_ok()
}
