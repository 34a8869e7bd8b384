//! HTTP codec module for encoding and decoding HTTP messages
//!
//! This module turns raw bytes into requests and responses into raw bytes.
//! Decoding is resumable: every parser reports how many bytes it consumed and
//! asks for more data instead of failing when a line is cut in half.
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestDecoder`]: Decodes incoming HTTP requests, phase by phase
//!   - Request line parsing via [`parse_request_line`]
//!   - Header parsing via [`header`] module
//!   - Content-Length bodies via [`body`] module
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: Encodes status lines and header/trailer blocks
//!   - [`ChunkedEncoder`]: Frames body fragments for chunked responses
//!
//! # Example
//!
//! ```
//! use httpfromtcp::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from(&b"GET / HTTP/1.1\r\nHost: a\r\n\r\n"[..]);
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//!
//! assert_eq!(request.target(), "/");
//! assert!(buffer.is_empty());
//! ```

pub mod body;
pub mod header;
mod request_decoder;
mod request_line;
mod response_encoder;

pub use body::ChunkedEncoder;
pub use request_decoder::RequestDecoder;
pub use request_line::parse_request_line;
pub use response_encoder::ResponseEncoder;
