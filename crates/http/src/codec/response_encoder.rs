use crate::codec::header::HeaderEncoder;
use crate::protocol::{HeaderMap, SendError, reason_phrase};
use bytes::{BufMut, BytesMut};
use http::StatusCode;
use std::io::Write;
use tokio_util::codec::Encoder;
use tracing::error;

/// Encodes the framing parts of a response: the status line and header blocks.
///
/// Body bytes are not encoded here, they pass through
/// [`ResponseWriter::write_body`](crate::connection::ResponseWriter::write_body)
/// untouched.
#[derive(Debug, Default)]
pub struct ResponseEncoder {
    header_encoder: HeaderEncoder,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Encoder<StatusCode> for ResponseEncoder {
    type Error = SendError;

    /// Writes `HTTP/1.1 <code> <reason>\r\n`.
    fn encode(&mut self, status: StatusCode, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let reason = reason_phrase(status).inspect_err(|e| error!(cause = %e, "can't write status line"))?;
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), reason)?;
        Ok(())
    }
}

impl Encoder<&HeaderMap> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, headers: &HeaderMap, dst: &mut BytesMut) -> Result<(), Self::Error> {
        self.header_encoder.encode(headers, dst)
    }
}

/// Fast writer implementation for writing to BytesMut.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
