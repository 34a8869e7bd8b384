//! HTTP header processing module for encoding and decoding headers
//!
//! # Components
//!
//! - [`parse_header_line`]: Splits and validates one header line
//!   - Token grammar validation of the name via [`is_token`]
//!   - Rejects whitespace between name and colon
//!
//! - [`HeaderEncoder`]: Encodes a header (or trailer) block to bytes
//!
//! The streaming part, resuming over partial reads, lives in
//! [`HeaderMap::parse`](crate::protocol::HeaderMap::parse).

mod header_decoder;
mod header_encoder;

pub use header_decoder::{CRLF, is_token, parse_header_line};
pub use header_encoder::HeaderEncoder;
