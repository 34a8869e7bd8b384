//! HTTP connection handling module
//!
//! Drives a single request/response exchange over a pair of async streams.
//!
//! # Components
//!
//! - [`RequestReader`]: feeds bytes from the read half into the request
//!   decoder through a fixed-capacity buffer, so a request may arrive in any
//!   number of partial reads
//! - [`ResponseWriter`]: writes the status line, header and trailer blocks and
//!   raw body bytes onto the write half
//! - [`HttpConnection`]: ties both to a [`Handler`](crate::handler::Handler),
//!   answers `400 Bad Request` on parse failures and closes the connection
//!   once the response is written
//!
//! Connections are never reused: every connection serves one request.

mod http_connection;
mod request_reader;
mod response_writer;

pub use http_connection::HttpConnection;
pub use request_reader::{DEFAULT_READ_BUFFER_SIZE, RequestReader};
pub use response_writer::ResponseWriter;
