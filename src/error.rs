//! Error types for body capture
//!
//! Capture failures are never propagated to the request path. They are
//! converted into fixed sentinel strings that take the place of the body
//! content inside the log record, so a record is always produced even when
//! a body could not be read.

use thiserror::Error;

/// Reasons a request or response body could not be captured verbatim.
///
/// The `Display` form of each variant is the exact sentinel string embedded
/// in the log record in place of the body content.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    /// Body stream could not be read, or the bytes were not valid JSON
    #[error("Unable to read body")]
    Unreadable,

    /// Serialized (redacted) request body exceeds the configured size limit
    #[error("Body too large to log")]
    BodyTooLarge,

    /// Drained response body exceeds the configured size limit
    #[error("Response too large to log")]
    ResponseTooLarge,

    /// Response content-type is not in the loggable set; body left untouched
    #[error("Skipped logging due to content type")]
    SkippedContentType,
}

impl CaptureError {
    /// Sentinel string recorded in place of the body content
    pub fn sentinel(&self) -> &'static str {
        match self {
            CaptureError::Unreadable => "Unable to read body",
            CaptureError::BodyTooLarge => "Body too large to log",
            CaptureError::ResponseTooLarge => "Response too large to log",
            CaptureError::SkippedContentType => "Skipped logging due to content type",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_matches_display() {
        let variants = [
            CaptureError::Unreadable,
            CaptureError::BodyTooLarge,
            CaptureError::ResponseTooLarge,
            CaptureError::SkippedContentType,
        ];

        for v in variants {
            assert_eq!(v.to_string(), v.sentinel());
        }
    }

    #[test]
    fn test_sentinel_strings() {
        assert_eq!(CaptureError::Unreadable.sentinel(), "Unable to read body");
        assert_eq!(CaptureError::BodyTooLarge.sentinel(), "Body too large to log");
        assert_eq!(
            CaptureError::ResponseTooLarge.sentinel(),
            "Response too large to log"
        );
        assert_eq!(
            CaptureError::SkippedContentType.sentinel(),
            "Skipped logging due to content type"
        );
    }
}
