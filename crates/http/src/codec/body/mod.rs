//! HTTP body handling module for request and response payloads
//!
//! # Components
//!
//! - [`LengthDecoder`]: Accumulates a request body of declared Content-Length
//! - [`ChunkedEncoder`]: Frames response body fragments with chunked transfer
//!   encoding
//!
//! Chunked *request* bodies are not decoded; the request decoder rejects them
//! with [`ParseError::UnsupportedBodyEncoding`](crate::protocol::ParseError::UnsupportedBodyEncoding).

mod chunked_encoder;
mod length_decoder;

pub use chunked_encoder::ChunkedEncoder;
pub use length_decoder::LengthDecoder;
