//! Severity classification for log records

/// Log importance level assigned to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Map a response status and latency to a severity
///
/// Check order matters: status always wins over latency, so a fast 404 is
/// WARNING and a slow 503 is ERROR.
pub fn classify(status: u16, latency_secs: f64, latency_threshold: f64) -> Severity {
    if status >= 500 {
        Severity::Error
    } else if status >= 400 {
        Severity::Warning
    } else if latency_secs > latency_threshold {
        Severity::Warning
    } else {
        Severity::Info
    }
}
