//! Helper functions: correlation ids, timestamps, client IP extraction

use chrono::Utc;
use std::collections::HashMap;
use uuid::Uuid;

/// Generate a unique correlation id for joining all records of one request
///
/// Uses UUID v4 for guaranteed uniqueness across distributed systems.
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current wall-clock time as fractional seconds since the Unix epoch
pub fn epoch_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Host identifier for record metadata
///
/// Resolved from the `HOSTNAME` environment variable (set by most container
/// runtimes and init systems); falls back to `"unknown"`.
pub fn hostname() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string())
}

/// Extract real client IP from request headers, handling proxies
///
/// Checks headers in this order:
/// 1. X-Real-IP (set by nginx)
/// 2. X-Forwarded-For (standard proxy header, takes first IP)
/// 3. Falls back to connection peer address
pub fn extract_ip(
    headers: &HashMap<String, String>,
    peer_addr: Option<&str>,
) -> Option<String> {
    if let Some(ip) = headers.get("x-real-ip") {
        return Some(ip.clone());
    }

    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Some(ip) = forwarded.split(',').next() {
            return Some(ip.trim().to_string());
        }
    }

    peer_addr.map(|s| s.to_string())
}
