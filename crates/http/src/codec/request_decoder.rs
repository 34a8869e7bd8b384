//! HTTP request decoder module
//!
//! This module provides a resumable request parser. Bytes can be fed in any
//! split, from one byte at a time to a whole request at once, and always end
//! in the same [`Request`].
//!
//! # Components
//!
//! - [`RequestDecoder`]: state machine driving the request line, header and body parsers
//! - Request line: [`parse_request_line`]
//! - Headers: [`HeaderMap::parse`](crate::protocol::HeaderMap::parse)
//! - Body: [`LengthDecoder`]
//!
//! # Example
//!
//! ```
//! use httpfromtcp::codec::RequestDecoder;
//! use httpfromtcp::protocol::Phase;
//!
//! let mut decoder = RequestDecoder::new();
//! let src = b"GET / HTTP/1.1\r\nHost: a\r\n\r\n";
//!
//! let consumed = decoder.parse(&src[..10]).unwrap();
//! assert_eq!(consumed, 0);
//!
//! let consumed = decoder.parse(src).unwrap();
//! assert_eq!(consumed, src.len());
//! assert_eq!(decoder.phase(), Phase::Done);
//! ```

use std::mem;

use bytes::{Buf, BytesMut};
use http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use tokio_util::codec::Decoder;
use tracing::{error, trace};

use crate::codec::body::LengthDecoder;
use crate::codec::parse_request_line;
use crate::protocol::{HeaderMap, ParseError, Phase, Request};

/// A decoder for HTTP requests that handles request line, headers and body
///
/// # State Machine
///
/// The phase is stored in the request being built:
/// - `Init`: waiting for the request line
/// - `Headers`: parsing header lines
/// - `Body`: accumulating `Content-Length` bytes through `payload_decoder`
/// - `Done` / `Error`: terminal, further input is not consumed
#[derive(Debug, Default)]
pub struct RequestDecoder {
    request: Request,
    payload_decoder: Option<LengthDecoder>,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }

    pub fn phase(&self) -> Phase {
        self.request.phase()
    }

    /// The request parsed so far.
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn into_request(self) -> Request {
        self.request
    }

    /// Consumes as much of `src` as the current phase allows.
    ///
    /// Moves through as many phases as the buffered bytes allow and stops,
    /// without error, as soon as a phase needs more data. The returned count
    /// covers exactly the bytes that were interpreted; the caller must keep
    /// `src[consumed..]` and pass it again, followed by newly read bytes.
    ///
    /// # Errors
    ///
    /// Any parse error moves the request to [`Phase::Error`] and is returned.
    pub fn parse(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        let mut read = 0;

        loop {
            let remaining = &src[read..];

            match self.request.phase {
                Phase::Init => match parse_request_line(remaining) {
                    Ok(Some((request_line, n))) => {
                        trace!(method = request_line.method(), target = request_line.target(), "parsed request line");
                        self.request.request_line = request_line;
                        self.request.advance(Phase::Headers);
                        read += n;
                    }
                    Ok(None) => break,
                    Err(e) => return Err(self.fail(e)),
                },

                Phase::Headers => {
                    let (n, done) = match self.request.headers.parse(remaining) {
                        Ok(parsed) => parsed,
                        Err(e) => return Err(self.fail(e)),
                    };
                    read += n;
                    if !done {
                        break;
                    }

                    match self.parse_payload() {
                        Ok(Some(payload_decoder)) => {
                            trace!(content_length = payload_decoder.expected(), "parsed headers, reading body");
                            self.payload_decoder = Some(payload_decoder);
                            self.request.advance(Phase::Body);
                        }
                        Ok(None) => {
                            trace!("parsed headers, request has no body");
                            self.request.advance(Phase::Done);
                        }
                        Err(e) => return Err(self.fail(e)),
                    }
                }

                Phase::Body => {
                    let Some(payload_decoder) = &mut self.payload_decoder else {
                        // body phase is only entered together with a payload decoder
                        self.request.advance(Phase::Done);
                        continue;
                    };

                    read += payload_decoder.decode(remaining, &mut self.request.body);
                    if !payload_decoder.is_finish() {
                        break;
                    }

                    self.payload_decoder.take();
                    self.request.advance(Phase::Done);
                }

                Phase::Done | Phase::Error => break,
            }
        }

        Ok(read)
    }

    /// Checks the end of input while the request is incomplete.
    fn eof_error(&self, src: &[u8]) -> Option<ParseError> {
        match self.request.phase {
            Phase::Init if src.is_empty() => None,
            Phase::Body => {
                let (expected, received) =
                    self.payload_decoder.as_ref().map_or((0, 0), |decoder| (decoder.expected(), decoder.received()));
                Some(ParseError::incomplete_body(expected, received))
            }
            phase => Some(ParseError::unexpected_eof(phase)),
        }
    }

    fn fail(&mut self, e: ParseError) -> ParseError {
        error!(phase = %self.request.phase, cause = %e, "failed to parse request");
        self.request.advance(Phase::Error);
        self.payload_decoder.take();
        e
    }

    /// Determines whether a body follows the headers.
    ///
    /// Refer: <https://www.rfc-editor.org/rfc/rfc9112.html#name-transfer-encoding>
    fn parse_payload(&self) -> Result<Option<LengthDecoder>, ParseError> {
        let headers = &self.request.headers;

        match (headers.get(TRANSFER_ENCODING), headers.get(CONTENT_LENGTH)) {
            (Some(_), Some(_)) => {
                Err(ParseError::invalid_content_length("transfer_encoding and content_length both present in headers"))
            }
            (Some(te_value), None) if is_chunked(te_value) => Err(ParseError::unsupported_body_encoding(te_value)),
            _ => {
                let length = content_length(headers)?;
                Ok((length > 0).then(|| LengthDecoder::new(length)))
            }
        }
    }
}

/// Reads the declared body length, 0 when absent or not a number.
///
/// Repeated `Content-Length` fields are merged by [`HeaderMap::set`] into a
/// comma separated value, which is rejected instead of being read as absent.
/// A sign is never part of a valid length.
fn content_length(headers: &HeaderMap) -> Result<usize, ParseError> {
    match headers.get(CONTENT_LENGTH) {
        Some(value) if value.contains(',') => {
            Err(ParseError::invalid_content_length(format!("multiple content-length values {value:?}")))
        }
        Some(value) if value.starts_with('+') => {
            Err(ParseError::invalid_content_length(format!("signed content-length {value:?}")))
        }
        _ => Ok(headers.get_int(CONTENT_LENGTH, 0usize)),
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode an HTTP request from the provided buffer
    ///
    /// Parsed bytes are removed from `src`, unparsed bytes stay in place.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: the request is complete, the decoder starts over
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let consumed = self.parse(src)?;
        src.advance(consumed);

        if self.request.is_done() {
            return Ok(Some(mem::take(self).request));
        }
        Ok(None)
    }

    /// Decodes what is left once the stream reached its end.
    ///
    /// # Errors
    ///
    /// - [`ParseError::IncompleteBody`] when the body is shorter than declared
    /// - [`ParseError::UnexpectedEof`] when the stream ended inside the request
    ///   line or the headers
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(src)? {
            return Ok(Some(request));
        }

        match self.eof_error(src) {
            Some(e) => Err(self.fail(e)),
            None => Ok(None),
        }
    }
}

/// Checks if the Transfer-Encoding header indicates chunked encoding.
///
/// According to RFC 7230, chunked must be the last encoding if present.
fn is_chunked(te_value: &str) -> bool {
    te_value.rsplit(',').next().is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
}
