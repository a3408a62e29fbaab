//! Request body capture
//!
//! Buffers the incoming payload once, puts an equivalent single-chunk
//! payload back for downstream extractors, and renders a redacted,
//! size-limited JSON string for the log record. Failures never reach the
//! caller as errors: they fold into sentinel strings.

use actix_web::error::PayloadError;
use actix_web::web::{Bytes, BytesMut};
use actix_web::{dev::Payload, dev::ServiceRequest, HttpMessage};
use futures::stream::{self, Stream};
use futures::StreamExt;
use std::pin::Pin;

use crate::config::Config;
use crate::error::CaptureError;
use crate::redact::mask_sensitive_fields;

/// Read the full request payload and restore it for downstream handlers
///
/// The payload stream is consumed exactly once here; handlers see a
/// single-chunk replacement carrying the same bytes. On a mid-stream read
/// error the chunks received so far are restored and the capture fails.
pub async fn buffer_and_restore(req: &mut ServiceRequest) -> Result<Bytes, CaptureError> {
    let mut payload = req.take_payload();
    let mut buffer = BytesMut::new();
    let mut failed = false;

    while let Some(chunk) = payload.next().await {
        match chunk {
            Ok(chunk) => buffer.extend_from_slice(&chunk),
            Err(_) => {
                failed = true;
                break;
            }
        }
    }

    let bytes = buffer.freeze();
    req.set_payload(replay_payload(bytes.clone()));

    if failed {
        Err(CaptureError::Unreadable)
    } else {
        Ok(bytes)
    }
}

/// Single-chunk payload yielding exactly `bytes`
fn replay_payload(bytes: Bytes) -> Payload {
    Payload::Stream {
        payload: Box::pin(stream::once(async move { Ok::<_, PayloadError>(bytes) }))
            as Pin<Box<dyn Stream<Item = Result<Bytes, PayloadError>>>>,
    }
}

/// Render the buffered body for inclusion in a log record
///
/// Parses the bytes as JSON, masks sensitive fields, and re-serializes.
/// A serialized form larger than the configured maximum is replaced by a
/// sentinel rather than truncated, so the record never carries partial
/// JSON. Parse failures (including an empty body) also yield a sentinel.
pub fn render_body(config: &Config, bytes: &[u8]) -> Result<String, CaptureError> {
    let value =
        serde_json::from_slice(bytes).map_err(|_| CaptureError::Unreadable)?;
    let masked = mask_sensitive_fields(config, value);
    let serialized =
        serde_json::to_string(&masked).map_err(|_| CaptureError::Unreadable)?;

    if serialized.len() > config.max_body_size {
        return Err(CaptureError::BodyTooLarge);
    }
    Ok(serialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use serde_json::json;

    fn config() -> Config {
        Config::new(1.0, 2.0)
    }

    #[test]
    fn test_render_redacts_sensitive_fields() {
        let body = br#"{"user":"bob","password":"hunter2"}"#;
        let rendered = render_body(&config(), body).expect("valid json");

        assert!(rendered.contains(r#""password":"*****""#));
        assert!(rendered.contains(r#""user":"bob""#));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_render_invalid_json_is_unreadable() {
        assert_eq!(
            render_body(&config(), b"not json"),
            Err(CaptureError::Unreadable)
        );
    }

    #[test]
    fn test_render_empty_body_is_unreadable() {
        assert_eq!(render_body(&config(), b""), Err(CaptureError::Unreadable));
    }

    #[test]
    fn test_render_oversized_body() {
        let body = serde_json::to_vec(&json!({"data": "x".repeat(2000)})).expect("serialize");
        assert_eq!(
            render_body(&config(), &body),
            Err(CaptureError::BodyTooLarge)
        );
    }

    #[test]
    fn test_render_body_at_exact_limit() {
        // {"data":"xx...x"} serializes to exactly 1024 bytes with 1013 x's
        let body = serde_json::to_vec(&json!({"data": "x".repeat(1013)})).expect("serialize");
        assert_eq!(body.len(), 1024);

        let rendered = render_body(&config(), &body).expect("fits the limit");
        assert_eq!(rendered.len(), 1024);
    }

    #[actix_rt::test]
    async fn test_buffer_and_restore_round_trip() {
        let payload = Bytes::from_static(br#"{"key":"value"}"#);
        let mut req = TestRequest::post()
            .set_payload(payload.clone())
            .to_srv_request();

        let captured = buffer_and_restore(&mut req).await.expect("readable");
        assert_eq!(captured, payload);

        // Downstream still sees the identical bytes
        let mut restored = req.take_payload();
        let mut seen = BytesMut::new();
        while let Some(chunk) = restored.next().await {
            seen.extend_from_slice(&chunk.expect("restored chunk"));
        }
        assert_eq!(seen.freeze(), payload);
    }

    #[actix_rt::test]
    async fn test_buffer_empty_payload() {
        let mut req = TestRequest::get().to_srv_request();
        let captured = buffer_and_restore(&mut req).await.expect("readable");
        assert!(captured.is_empty());
    }
}
