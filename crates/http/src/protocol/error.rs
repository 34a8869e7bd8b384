use std::io;
use thiserror::Error;

use crate::protocol::Phase;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    /// Also covers every HTTP version other than `HTTP/1.1`.
    #[error("malformed request line: {reason}")]
    MalformedRequestLine { reason: String },

    #[error("malformed header name: {name:?}")]
    MalformedHeaderName { name: String },

    #[error("malformed header line: {reason}")]
    MalformedHeaderLine { reason: String },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("unsupported request body encoding: {encoding}")]
    UnsupportedBodyEncoding { encoding: String },

    #[error("incomplete body: received {received} bytes of the declared {expected}")]
    IncompleteBody { expected: usize, received: usize },

    #[error("connection closed while parsing {phase}")]
    UnexpectedEof { phase: Phase },

    #[error("header size too large, current: {current_size} exceed the limit {max_size}")]
    TooLargeHeader { current_size: usize, max_size: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn malformed_request_line<S: ToString>(str: S) -> Self {
        Self::MalformedRequestLine { reason: str.to_string() }
    }

    pub fn malformed_header_name<S: ToString>(name: S) -> Self {
        Self::MalformedHeaderName { name: name.to_string() }
    }

    pub fn malformed_header_line<S: ToString>(str: S) -> Self {
        Self::MalformedHeaderLine { reason: str.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }

    pub fn unsupported_body_encoding<S: ToString>(encoding: S) -> Self {
        Self::UnsupportedBodyEncoding { encoding: encoding.to_string() }
    }

    pub fn incomplete_body(expected: usize, received: usize) -> Self {
        Self::IncompleteBody { expected, received }
    }

    pub fn unexpected_eof(phase: Phase) -> Self {
        Self::UnexpectedEof { phase }
    }

    pub fn too_large_header(current_size: usize, max_size: usize) -> Self {
        Self::TooLargeHeader { current_size, max_size }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("unsupported status code: {code}")]
    UnsupportedStatusCode { code: u16 },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn unsupported_status_code(code: u16) -> Self {
        Self::UnsupportedStatusCode { code }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
