//! Request line parsing.
//!
//! Only the strict form `METHOD SP TARGET SP HTTP/1.1 CRLF` is accepted: a
//! single space between the three parts and the literal version `HTTP/1.1`.

use crate::codec::header::CRLF;
use crate::ensure;
use crate::protocol::{ParseError, RequestLine, find_crlf};

const HTTP_NAME: &[u8] = b"HTTP";
const HTTP_VERSION: &[u8] = b"1.1";

/// Parses the request line at the start of `src`.
///
/// Returns `Ok(None)` when no complete line is buffered yet, otherwise the
/// line and the number of bytes it occupied including the CRLF.
///
/// # Errors
///
/// Returns [`ParseError::MalformedRequestLine`] when the line does not have
/// exactly three parts or the version is anything but `HTTP/1.1`.
pub fn parse_request_line(src: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(idx) = find_crlf(src) else {
        return Ok(None);
    };

    let line = &src[..idx];
    let parts = line.split(|b| *b == b' ').collect::<Vec<_>>();
    ensure!(
        parts.len() == 3,
        ParseError::malformed_request_line(format!("expected 3 parts, found {} in {:?}", parts.len(), lossy(line)))
    );

    let version = parts[2].split(|b| *b == b'/').collect::<Vec<_>>();
    ensure!(
        version.len() == 2 && version[0] == HTTP_NAME && version[1] == HTTP_VERSION,
        ParseError::malformed_request_line(format!("unsupported http version {:?}", lossy(parts[2])))
    );

    let method = utf8(parts[0], "method")?;
    let target = utf8(parts[1], "target")?;
    let request_line = RequestLine::new(method, target, utf8(version[1], "version")?);

    Ok(Some((request_line, idx + CRLF.len())))
}

fn utf8<'a>(bytes: &'a [u8], part: &str) -> Result<&'a str, ParseError> {
    std::str::from_utf8(bytes).map_err(|e| ParseError::malformed_request_line(format!("{part} is not utf-8: {e}")))
}

fn lossy(bytes: &[u8]) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn good_get_request_line() {
        let src = b"GET / HTTP/1.1\r\nHost: localhost:42069\r\n\r\n";
        let (line, n) = parse_request_line(src).unwrap().unwrap();

        assert_eq!(line.method(), "GET");
        assert_eq!(line.target(), "/");
        assert_eq!(line.version(), "1.1");
        assert_eq!(n, 16);
    }

    #[test]
    fn good_request_line_with_path() {
        let (line, _) = parse_request_line(b"GET /coffee?size=medium HTTP/1.1\r\n").unwrap().unwrap();

        assert_eq!(line.method(), "GET");
        assert_eq!(line.target(), "/coffee?size=medium");
    }

    #[test]
    fn need_more_data() {
        assert!(parse_request_line(b"GET / HTTP/1.1").unwrap().is_none());
        assert!(parse_request_line(b"GET / HTTP/1.1\r").unwrap().is_none());
        assert!(parse_request_line(b"").unwrap().is_none());
    }

    #[test]
    fn wrong_number_of_parts() {
        for src in [&b"/coffee HTTP/1.1\r\n"[..], b"GET  / HTTP/1.1\r\n", b"GET / HTTP/1.1 extra\r\n"] {
            let result = parse_request_line(src);
            assert!(matches!(result, Err(ParseError::MalformedRequestLine { .. })), "{result:?}");
        }
    }

    #[test]
    fn unsupported_versions() {
        for src in [&b"GET / HTTP/1.0\r\n"[..], b"GET / HTTP/2.0\r\n", b"GET / http/1.1\r\n", b"GET / HTTP/1.1/x\r\n"] {
            let result = parse_request_line(src);
            assert!(matches!(result, Err(ParseError::MalformedRequestLine { .. })), "{result:?}");
        }
    }

    #[test]
    fn only_first_line_is_consumed() {
        let src = b"POST /x HTTP/1.1\r\nGET /y HTTP/1.1\r\n";
        let (line, n) = parse_request_line(src).unwrap().unwrap();

        assert_eq!(line.method(), "POST");
        assert_eq!(&src[n..], b"GET /y HTTP/1.1\r\n");
    }
}
