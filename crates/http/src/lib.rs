//! HTTP/1.1 over a raw TCP stream
//!
//! This crate parses HTTP/1.1 requests byte by byte, straight off a socket, and
//! frames responses back onto it, including chunked bodies followed by
//! trailers. It does not depend on any HTTP parsing library: the [`http`] crate
//! is only used for its [`StatusCode`](http::StatusCode) type.
//!
//! # Features
//!
//! - Resumable request parsing: a request may arrive split at any byte
//! - Bounded memory: requests are read through a fixed-capacity buffer
//! - `Content-Length` request bodies
//! - Chunked response bodies with trailers
//! - One request per connection, closed after the response
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use http::StatusCode;
//! use httpfromtcp::connection::ResponseWriter;
//! use httpfromtcp::handler::Handler;
//! use httpfromtcp::protocol::{Request, SendError, default_headers};
//! use httpfromtcp::server::Server;
//! use std::sync::Arc;
//! use tokio::io::AsyncWrite;
//! use tracing::{Level, error};
//! use tracing_subscriber::FmtSubscriber;
//!
//! struct HelloWorld;
//!
//! #[async_trait]
//! impl Handler for HelloWorld {
//!     async fn call<W>(&self, request: Request, writer: &mut ResponseWriter<W>) -> Result<(), SendError>
//!     where
//!         W: AsyncWrite + Unpin + Send,
//!     {
//!         let body = format!("Hello {}!\r\n", request.target());
//!         writer.write_status_line(StatusCode::OK).await?;
//!         writer.write_headers(&default_headers(body.len())).await?;
//!         writer.write_body(body.as_bytes()).await?;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//!     tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
//!
//!     let server = match Server::builder().address("127.0.0.1:8080").bind().await {
//!         Ok(server) => server,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     server.serve(Arc::new(HelloWorld)).await;
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: requests, headers, status codes and errors
//! - [`codec`]: the request decoder and the response framing encoders
//! - [`connection`]: reading a request and writing its response over async streams
//! - [`handler`]: the trait applications implement
//! - [`server`]: the TCP accept loop and its shutdown handle
//!
//! ## Request Parsing
//!
//! [`codec::RequestDecoder`] is a state machine moving through the request
//! line, the headers and the body. Fed any prefix of a request it consumes the
//! complete lines it finds and asks for more data, so the same request split
//! differently always yields the same result.
//! [`connection::RequestReader`] drives it from a stream.
//!
//! ## Error Handling
//!
//! - [`protocol::HttpError`]: Top-level error type
//! - [`protocol::ParseError`]: Request parsing errors, answered with `400 Bad Request`
//! - [`protocol::SendError`]: Response writing errors
//!
//! # Limitations
//!
//! - HTTP/1.1 only, no keep-alive
//! - Chunked request bodies are rejected
//! - Only the status codes 200, 400 and 500 can be written

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
