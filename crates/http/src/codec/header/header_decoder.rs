//! Header line decoding.
//!
//! A header line is `name ":" OWS value OWS`, terminated by CRLF. The name is
//! validated against the token grammar of
//! [RFC 9110 section 5.6.2](https://www.rfc-editor.org/rfc/rfc9110#section-5.6.2);
//! whitespace between the name and the colon is rejected rather than trimmed,
//! see [RFC 9112 section 5.1](https://www.rfc-editor.org/rfc/rfc9112#section-5.1).

use crate::ensure;
use crate::protocol::ParseError;

/// HTTP/1.1 line terminator, bare `\n` is never accepted.
pub const CRLF: &[u8] = b"\r\n";

/// Splits one header line (without its CRLF) into name and value.
///
/// Leading whitespace before the name is tolerated, trailing whitespace is not.
/// The value is trimmed on both sides.
pub fn parse_header_line(line: &[u8]) -> Result<(&str, &str), ParseError> {
    let Some(colon) = line.iter().position(|b| *b == b':') else {
        return Err(ParseError::malformed_header_line(format!("missing colon in {:?}", String::from_utf8_lossy(line))));
    };

    let (name, value) = (&line[..colon], &line[colon + 1..]);

    ensure!(
        !name.last().is_some_and(u8::is_ascii_whitespace),
        ParseError::malformed_header_name(String::from_utf8_lossy(name))
    );

    let name = name.trim_ascii();
    ensure!(is_token(name), ParseError::malformed_header_name(String::from_utf8_lossy(name)));

    // tokens are ascii, so only the value can fail here
    let name = std::str::from_utf8(name).map_err(ParseError::malformed_header_name)?;
    let value = std::str::from_utf8(value.trim_ascii())
        .map_err(|e| ParseError::malformed_header_line(format!("value of {name} is not utf-8: {e}")))?;

    Ok((name, value))
}

/// token = 1*tchar
pub fn is_token(bytes: &[u8]) -> bool {
    !bytes.is_empty() && bytes.iter().copied().all(is_tchar)
}

/// tchar = "!" / "#" / "$" / "%" / "&" / "'" / "*"
///       / "+" / "-" / "." / "^" / "_" / "`" / "|" / "~"
///       / DIGIT / ALPHA
#[inline]
fn is_tchar(byte: u8) -> bool {
    matches!(
        byte,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
    ) || byte.is_ascii_alphanumeric()
}
