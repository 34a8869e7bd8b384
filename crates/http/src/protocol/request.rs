//! HTTP request representation.
//!
//! A [`Request`] starts out empty in [`Phase::Init`] and is filled in
//! incrementally by [`RequestDecoder`](crate::codec::RequestDecoder) as bytes
//! arrive. Once it reaches [`Phase::Done`] it is handed to the handler and is
//! not mutated any more.

use std::fmt;

use bytes::BytesMut;

use crate::protocol::HeaderMap;

/// The parsed `METHOD SP TARGET SP HTTP/1.1` line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    target: String,
    version: String,
}

impl RequestLine {
    pub fn new<M: Into<String>, T: Into<String>, V: Into<String>>(method: M, target: T, version: V) -> Self {
        Self { method: method.into(), target: target.into(), version: version.into() }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request target exactly as sent, e.g. `/index.html?a=1`.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The version number without the `HTTP/` prefix, always `"1.1"`.
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// Parsing progress of a [`Request`].
///
/// Phases only move forward: `Init -> Headers -> (Body ->) Done`. `Error` can
/// be entered from any phase. `Done` and `Error` are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the request line
    #[default]
    Init,
    /// Reading header lines
    Headers,
    /// Accumulating a `Content-Length` body
    Body,
    Done,
    Error,
}

impl Phase {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Done | Phase::Error)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "request line",
            Phase::Headers => "headers",
            Phase::Body => "body",
            Phase::Done => "done",
            Phase::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default)]
pub struct Request {
    pub(crate) request_line: RequestLine,
    pub(crate) headers: HeaderMap,
    pub(crate) body: BytesMut,
    pub(crate) phase: Phase,
}

impl Request {
    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    pub fn method(&self) -> &str {
        self.request_line.method()
    }

    pub fn target(&self) -> &str {
        self.request_line.target()
    }

    pub fn version(&self) -> &str {
        self.request_line.version()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns true once the request was parsed completely.
    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Consumes the request and returns its body.
    pub fn into_body(self) -> BytesMut {
        self.body
    }

    /// Moves to `phase`, ignoring the move if the current phase is terminal.
    pub(crate) fn advance(&mut self, phase: Phase) {
        if !self.phase.is_terminal() {
            self.phase = phase;
        }
    }
}
