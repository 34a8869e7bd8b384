use crate::codec::ResponseEncoder;
use crate::protocol::{HeaderMap, SendError};
use bytes::BytesMut;
use http::StatusCode;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;
use tracing::trace;

/// Initial buffer size allocated for status line and header serialization
const INIT_HEADER_SIZE: usize = 1024;

/// Writes a response onto an output stream.
///
/// The writer only frames the status line and header blocks; body bytes are
/// passed through as given. A chunked response is written as:
///
/// 1. [`write_status_line`](Self::write_status_line)
/// 2. [`write_headers`](Self::write_headers) with `Transfer-Encoding: chunked`
/// 3. [`write_body`](Self::write_body) for every chunk framed by
///    [`ChunkedEncoder`](crate::codec::ChunkedEncoder), including the final `0\r\n`
/// 4. [`write_headers`](Self::write_headers) again with the trailer fields
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    encoder: ResponseEncoder,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self { writer, buffer: BytesMut::with_capacity(INIT_HEADER_SIZE), encoder: ResponseEncoder::new() }
    }

    /// Writes `HTTP/1.1 <code> <reason>\r\n`.
    ///
    /// # Errors
    ///
    /// [`SendError::UnsupportedStatusCode`] for codes other than 200, 400 and
    /// 500, in which case nothing is written; [`SendError::Io`] when writing fails.
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), SendError> {
        self.buffer.clear();
        self.encoder.encode(status, &mut self.buffer)?;
        trace!(status = status.as_u16(), "write status line");
        self.write_buffer().await
    }

    /// Writes every header as `name: value\r\n` followed by a blank line.
    ///
    /// Called once for the header block and, for chunked responses, once more
    /// after the last chunk for the trailer block.
    pub async fn write_headers(&mut self, headers: &HeaderMap) -> Result<(), SendError> {
        self.buffer.clear();
        self.encoder.encode(headers, &mut self.buffer)?;
        trace!(count = headers.len(), "write header block");
        self.write_buffer().await
    }

    /// Writes `body` unchanged, returning the number of bytes written.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, SendError> {
        self.writer.write_all(body).await?;
        Ok(body.len())
    }

    #[inline]
    pub async fn flush(&mut self) -> Result<(), SendError> {
        Ok(self.writer.flush().await?)
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    async fn write_buffer(&mut self) -> Result<(), SendError> {
        self.writer.write_all(&self.buffer).await?;
        self.buffer.clear();
        Ok(())
    }
}
