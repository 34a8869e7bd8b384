//! Case-insensitive header storage.
//!
//! Unlike `http::HeaderMap`, a [`HeaderMap`] keeps exactly one value per name:
//! repeated fields of the same name are folded into a single comma separated
//! value, which is how they appear to handlers and how they are written back
//! onto the wire.

use std::collections::HashMap;
use std::collections::hash_map;
use std::str::FromStr;

use crate::codec::header::{CRLF, parse_header_line};
use crate::protocol::ParseError;

/// A mapping from lowercased header name to a single string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    inner: HashMap<String, String>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, merging with an existing value as `existing,value`.
    pub fn set<N: AsRef<str>, V: AsRef<str>>(&mut self, name: N, value: V) {
        let name = name.as_ref().to_ascii_lowercase();
        let value = value.as_ref();
        match self.inner.entry(name) {
            hash_map::Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.push(',');
                existing.push_str(value);
            }
            hash_map::Entry::Vacant(entry) => {
                entry.insert(value.to_owned());
            }
        }
    }

    /// Overwrites `name` with `value`, dropping any previous value.
    pub fn replace<N: AsRef<str>, V: Into<String>>(&mut self, name: N, value: V) {
        self.inner.insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn delete<N: AsRef<str>>(&mut self, name: N) {
        self.inner.remove(&name.as_ref().to_ascii_lowercase());
    }

    /// Returns the value stored for `name`, `None` if the header is absent.
    pub fn get<N: AsRef<str>>(&self, name: N) -> Option<&str> {
        self.inner.get(&name.as_ref().to_ascii_lowercase()).map(String::as_str)
    }

    /// Parses the value of `name` as a base-10 integer.
    ///
    /// Returns `default` when the header is absent or its value does not parse.
    pub fn get_int<N: AsRef<str>, T: FromStr>(&self, name: N, default: T) -> T {
        self.get(name).and_then(|value| value.parse().ok()).unwrap_or(default)
    }

    pub fn contains<N: AsRef<str>>(&self, name: N) -> bool {
        self.inner.contains_key(&name.as_ref().to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over `(name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Parses CRLF terminated header lines from the start of `src`.
    ///
    /// Returns the number of bytes consumed and whether the blank line ending
    /// the header block was reached. When `src` ends in the middle of a line,
    /// the lines before it are consumed and the caller must call again with
    /// the unconsumed remainder once more bytes arrived.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedHeaderLine`] for a line without a colon
    /// and [`ParseError::MalformedHeaderName`] for a name that is not a token or
    /// has whitespace before the colon. An error forfeits the whole call.
    pub fn parse(&mut self, src: &[u8]) -> Result<(usize, bool), ParseError> {
        let mut read = 0;

        while let Some(idx) = find_crlf(&src[read..]) {
            if idx == 0 {
                read += CRLF.len();
                return Ok((read, true));
            }

            let (name, value) = parse_header_line(&src[read..read + idx])?;
            self.set(name, value);
            read += idx + CRLF.len();
        }

        Ok((read, false))
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = (&'a String, &'a String);
    type IntoIter = hash_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

pub(crate) fn find_crlf(src: &[u8]) -> Option<usize> {
    src.windows(CRLF.len()).position(|window| window == CRLF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn set_merges_repeated_names() {
        let mut headers = HeaderMap::new();
        headers.set("X", "a");
        headers.set("x", "b");

        assert_eq!(headers.get("X"), Some("a,b"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn replace_and_delete() {
        let mut headers = HeaderMap::new();
        headers.set("Content-Length", "10");
        headers.replace("content-length", "20");
        assert_eq!(headers.get("CONTENT-LENGTH"), Some("20"));

        headers.delete("Content-length");
        assert!(!headers.contains("content-length"));
        assert_eq!(headers.get("content-length"), None);
    }

    #[test]
    fn get_int_falls_back_to_default() {
        let mut headers = HeaderMap::new();
        headers.set("content-length", "42");
        headers.set("x-bad", "4x2");

        assert_eq!(headers.get_int("Content-Length", 0usize), 42);
        assert_eq!(headers.get_int("x-bad", 7usize), 7);
        assert_eq!(headers.get_int("missing", -1i64), -1);
    }

    #[test]
    fn parse_single_header() {
        let mut headers = HeaderMap::new();
        let (n, done) = headers.parse(b"Host: localhost:42069\r\n\r\n").unwrap();

        assert_eq!(headers.get("Host"), Some("localhost:42069"));
        assert_eq!(n, 25);
        assert!(done);
    }

    #[test]
    fn parse_rejects_space_before_colon() {
        let mut headers = HeaderMap::new();
        let result = headers.parse(b"       Host : localhost:42069       \r\n\r\n");

        assert!(matches!(result, Err(ParseError::MalformedHeaderName { .. })));
    }

    #[test]
    fn parse_rejects_non_token_name() {
        let mut headers = HeaderMap::new();
        let result = headers.parse("H\u{a9}st: localhost:42069\r\n\r\n".as_bytes());

        assert!(matches!(result, Err(ParseError::MalformedHeaderName { .. })));
    }

    #[test]
    fn parse_rejects_line_without_colon() {
        let mut headers = HeaderMap::new();
        let result = headers.parse(b"Host localhost\r\n\r\n");

        assert!(matches!(result, Err(ParseError::MalformedHeaderLine { .. })));
    }

    #[test]
    fn parse_merges_repeated_fields() {
        let mut headers = HeaderMap::new();
        let data = b"Host: localhost:42069\r\nSet-Person: lane-loves-go\r\nSet-Person: prime-loves-zig\r\nSet-Person: tj-loves-ocaml\r\n\r\n";
        let (n, done) = headers.parse(data).unwrap();

        assert_eq!(headers.get("Set-Person"), Some("lane-loves-go,prime-loves-zig,tj-loves-ocaml"));
        assert_eq!(n, data.len());
        assert!(done);
    }

    #[test]
    fn parse_needs_more_data() {
        let mut headers = HeaderMap::new();
        let (n, done) = headers.parse(b"Host: a\r\nAccept: */").unwrap();

        assert_eq!(n, 9);
        assert!(!done);
        assert_eq!(headers.get("host"), Some("a"));
        assert!(!headers.contains("accept"));

        let (n, done) = headers.parse(b"Accept: */*\r\n\r\nbody").unwrap();
        assert_eq!(n, 15);
        assert!(done);
        assert_eq!(headers.get("accept"), Some("*/*"));
    }

    #[test]
    fn parse_stops_after_blank_line() {
        let str = indoc! {"
            Host: localhost:42069\r
            User-Agent: curl/8.15.0\r
            Accept: */*\r
            Content-Type: application/json\r
            Content-Length: 39\r
            \r
            {\"type\": \"dark mode\", \"size\": \"medium\"}"};

        let mut headers = HeaderMap::new();
        let (n, done) = headers.parse(str.as_bytes()).unwrap();

        assert!(done);
        assert_eq!(headers.len(), 5);
        assert_eq!(headers.get("User-Agent"), Some("curl/8.15.0"));
        assert_eq!(headers.get("Content-Type"), Some("application/json"));
        assert_eq!(headers.get_int("Content-Length", 0usize), 39);
        assert_eq!(&str[n..], "{\"type\": \"dark mode\", \"size\": \"medium\"}");
    }

    #[test]
    fn bare_lf_is_not_a_terminator() {
        let mut headers = HeaderMap::new();
        let (n, done) = headers.parse(b"Host: a\n\n").unwrap();

        assert_eq!(n, 0);
        assert!(!done);
    }
}
