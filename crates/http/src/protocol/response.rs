//! Response status and default header helpers.

use http::StatusCode;
use http::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE};

use crate::protocol::{HeaderMap, SendError};

/// Status codes the response writer knows how to frame.
pub const SUPPORTED_STATUS_CODES: [StatusCode; 3] =
    [StatusCode::OK, StatusCode::BAD_REQUEST, StatusCode::INTERNAL_SERVER_ERROR];

/// Returns the reason phrase written after `status` on the status line.
///
/// # Errors
///
/// Returns [`SendError::UnsupportedStatusCode`] for any status outside
/// [`SUPPORTED_STATUS_CODES`].
pub fn reason_phrase(status: StatusCode) -> Result<&'static str, SendError> {
    if !SUPPORTED_STATUS_CODES.contains(&status) {
        return Err(SendError::unsupported_status_code(status.as_u16()));
    }
    status.canonical_reason().ok_or_else(|| SendError::unsupported_status_code(status.as_u16()))
}

/// Headers every response starts from: a `text/plain` body of `content_length`
/// bytes on a connection that is closed afterwards.
pub fn default_headers(content_length: usize) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.replace(CONTENT_LENGTH, content_length.to_string());
    headers.set(CONNECTION, "close");
    headers.set(CONTENT_TYPE, mime::TEXT_PLAIN.essence_str());
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_phrases() {
        assert_eq!(reason_phrase(StatusCode::OK).unwrap(), "OK");
        assert_eq!(reason_phrase(StatusCode::BAD_REQUEST).unwrap(), "Bad Request");
        assert_eq!(reason_phrase(StatusCode::INTERNAL_SERVER_ERROR).unwrap(), "Internal Server Error");
    }

    #[test]
    fn unsupported_status() {
        let result = reason_phrase(StatusCode::NOT_FOUND);
        assert!(matches!(result, Err(SendError::UnsupportedStatusCode { code: 404 })));
    }

    #[test]
    fn default_headers_values() {
        let headers = default_headers(13);
        assert_eq!(headers.len(), 3);
        assert_eq!(headers.get("Content-Length"), Some("13"));
        assert_eq!(headers.get("Connection"), Some("close"));
        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
    }
}
