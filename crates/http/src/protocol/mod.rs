//! Core HTTP protocol types.
//!
//! - **Requests** (`request`): [`Request`], its [`RequestLine`] and the parsing [`Phase`]
//! - **Headers** (`header_map`): [`HeaderMap`], a case-insensitive store that
//!   folds repeated fields into one comma separated value
//! - **Responses** (`response`): supported status codes and [`default_headers`]
//! - **Payload** (`message`): [`PayloadItem`], the unit of chunked response bodies
//! - **Errors** (`error`): [`HttpError`], [`ParseError`] and [`SendError`]

mod message;
pub use message::PayloadItem;

mod header_map;
pub use header_map::HeaderMap;
pub(crate) use header_map::find_crlf;

mod request;
pub use request::{Phase, Request, RequestLine};

mod response;
pub use response::{SUPPORTED_STATUS_CODES, default_headers, reason_phrase};

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
