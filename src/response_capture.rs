//! Response body capture and reconstruction
//!
//! For loggable content types the response stream is drained into memory
//! exactly once, then the response is rebuilt around a single-chunk body
//! carrying the identical bytes. The client observes the same content and
//! the same finite, single-pass body semantics as if this module had never
//! run. Non-loggable content types are passed through untouched.
//!
//! The drain happens before the size check, so a very large loggable
//! response is fully buffered even though only a sentinel ends up in the
//! record. Memory cost is proportional to response size for loggable
//! content types; keep streaming endpoints out of the loggable set.

use actix_web::body::{self, BoxBody, MessageBody};
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::web::Bytes;

use crate::config::Config;
use crate::error::CaptureError;

/// Capture the response body for logging and rebuild the response
///
/// Returns the (possibly reconstructed) response together with the text to
/// record: the decoded body when it fits the configured maximum, otherwise
/// a sentinel.
pub async fn capture_response<B>(
    config: &Config,
    res: ServiceResponse<B>,
) -> (ServiceResponse<BoxBody>, Result<String, CaptureError>)
where
    B: MessageBody + 'static,
{
    let content_type = res
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();

    if !config.is_loggable_content_type(&content_type) {
        return (
            res.map_into_boxed_body(),
            Err(CaptureError::SkippedContentType),
        );
    }

    let (req, res) = res.into_parts();
    let (head, body) = res.into_parts();

    let bytes = match body::to_bytes(body).await {
        Ok(bytes) => bytes,
        Err(_) => {
            // Stream failed mid-drain; nothing left to replay
            let res = ServiceResponse::new(req, head.set_body(Bytes::new()));
            return (res.map_into_boxed_body(), Err(CaptureError::Unreadable));
        }
    };

    let captured = if bytes.len() > config.max_body_size {
        Err(CaptureError::ResponseTooLarge)
    } else {
        Ok(String::from_utf8_lossy(&bytes).to_string())
    };

    let res = ServiceResponse::new(req, head.set_body(bytes));
    (res.map_into_boxed_body(), captured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::{read_body, TestRequest};
    use actix_web::HttpResponse;

    fn config() -> Config {
        Config::new(1.0, 2.0)
    }

    fn service_response(content_type: &str, payload: Bytes) -> ServiceResponse {
        let req = TestRequest::default().to_http_request();
        let res = HttpResponse::Ok()
            .content_type(content_type)
            .body(payload);
        ServiceResponse::new(req, res)
    }

    #[actix_rt::test]
    async fn test_skips_non_loggable_content_type() {
        let payload = Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]);
        let res = service_response("image/png", payload.clone());

        let (res, captured) = capture_response(&config(), res).await;

        assert_eq!(captured, Err(CaptureError::SkippedContentType));
        assert_eq!(read_body(res).await, payload);
    }

    #[actix_rt::test]
    async fn test_captures_json_body() {
        let payload = Bytes::from_static(br#"{"ok":true}"#);
        let res = service_response("application/json", payload.clone());

        let (res, captured) = capture_response(&config(), res).await;

        assert_eq!(captured, Ok(r#"{"ok":true}"#.to_string()));
        assert_eq!(read_body(res).await, payload);
    }

    #[actix_rt::test]
    async fn test_captures_with_charset_parameter() {
        let payload = Bytes::from_static(b"hello");
        let res = service_response("text/plain; charset=utf-8", payload.clone());

        let (res, captured) = capture_response(&config(), res).await;

        assert_eq!(captured, Ok("hello".to_string()));
        assert_eq!(read_body(res).await, payload);
    }

    #[actix_rt::test]
    async fn test_oversized_body_still_byte_identical() {
        let payload = Bytes::from(vec![b'x'; 5000]);
        let res = service_response("text/plain", payload.clone());

        let (res, captured) = capture_response(&config(), res).await;

        assert_eq!(captured, Err(CaptureError::ResponseTooLarge));
        assert_eq!(read_body(res).await, payload);
    }

    #[actix_rt::test]
    async fn test_body_at_exact_limit_captured() {
        let payload = Bytes::from(vec![b'y'; 1024]);
        let res = service_response("text/plain", payload.clone());

        let (res, captured) = capture_response(&config(), res).await;

        assert_eq!(captured, Ok("y".repeat(1024)));
        assert_eq!(read_body(res).await, payload);
    }
}
