//! Decoder implementation for request bodies with a Content-Length header.
//!
//! The declared size is specified by the Content-Length header, as defined in
//! [RFC 7230 Section 3.3.2](https://tools.ietf.org/html/rfc7230#section-3.3.2).

use std::cmp;

use bytes::BytesMut;

/// Accumulates a body of known length.
///
/// The decoder tracks how many bytes are still owed and never takes more than
/// that from its input, so bytes after the body stay with the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The declared content length
    expected: usize,
    /// The number of bytes remaining to be read from the payload
    length: usize,
}

impl LengthDecoder {
    /// Creates a new LengthDecoder instance.
    ///
    /// # Arguments
    /// * `length` - The total content length to decode, specified by Content-Length header
    pub fn new(length: usize) -> Self {
        Self { expected: length, length }
    }

    /// Appends up to the remaining length from `src` to `body`.
    ///
    /// Returns the number of bytes taken from `src`.
    pub fn decode(&mut self, src: &[u8], body: &mut BytesMut) -> usize {
        // Read the minimum of remaining length and available bytes
        let len = cmp::min(self.length, src.len());
        body.extend_from_slice(&src[..len]);

        self.length -= len;
        len
    }

    pub fn is_finish(&self) -> bool {
        self.length == 0
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn received(&self) -> usize {
        self.expected - self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let buffer = b"101234567890abcdef\r\n\r\n";
        let mut body = BytesMut::new();

        let mut length_decoder = LengthDecoder::new(10);
        let n = length_decoder.decode(buffer, &mut body);

        assert_eq!(n, 10);
        assert!(length_decoder.is_finish());
        assert_eq!(&body[..], b"1012345678");
        assert_eq!(&buffer[n..], b"90abcdef\r\n\r\n");
    }

    #[test]
    fn accumulates_across_calls() {
        let mut body = BytesMut::new();
        let mut length_decoder = LengthDecoder::new(5);

        assert_eq!(length_decoder.decode(b"ab", &mut body), 2);
        assert!(!length_decoder.is_finish());
        assert_eq!(length_decoder.received(), 2);

        assert_eq!(length_decoder.decode(b"", &mut body), 0);
        assert_eq!(length_decoder.decode(b"cdefg", &mut body), 3);

        assert!(length_decoder.is_finish());
        assert_eq!(length_decoder.expected(), 5);
        assert_eq!(&body[..], b"abcde");

        assert_eq!(length_decoder.decode(b"xyz", &mut body), 0);
        assert_eq!(&body[..], b"abcde");
    }
}
