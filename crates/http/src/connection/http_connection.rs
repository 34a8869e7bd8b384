use std::sync::Arc;

use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{error, info, warn};

use crate::connection::{RequestReader, ResponseWriter};
use crate::handler::Handler;
use crate::protocol::{HttpError, SendError, default_headers};

/// An HTTP connection serving exactly one request.
///
/// `HttpConnection` handles the lifecycle of a connection:
/// - Reading and parsing the request through a bounded buffer
/// - Answering `400 Bad Request` when the request can't be parsed
/// - Dispatching a parsed request to the [`Handler`]
/// - Flushing the response and closing the write side
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: RequestReader<R>,
    writer: ResponseWriter<W>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader: RequestReader::new(reader), writer: ResponseWriter::new(writer) }
    }

    pub fn with_capacity(reader: R, writer: W, read_buffer_size: usize) -> Self {
        Self { reader: RequestReader::with_capacity(reader, read_buffer_size), writer: ResponseWriter::new(writer) }
    }

    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler,
    {
        let request = match self.reader.read_request().await {
            Ok(Some(request)) => request,

            Ok(None) => {
                info!("connection closed before any request was sent");
                return Ok(());
            }

            Err(e) => {
                error!(cause = %e, "can't parse request");
                if let Err(send_error) = self.send_bad_request().await {
                    warn!(cause = %send_error, "can't send bad request response");
                }
                return Err(e.into());
            }
        };

        info!(method = request.method(), target = request.target(), body_size = request.body().len(), "receive request");

        if let Err(e) = handler.call(request, &mut self.writer).await {
            error!(cause = %e, "handler failed to write response");
            // not flushed: dropping both halves closes the connection on a partial response
            return Err(e.into());
        }

        self.close().await?;
        Ok(())
    }

    async fn send_bad_request(&mut self) -> Result<(), SendError> {
        self.writer.write_status_line(StatusCode::BAD_REQUEST).await?;
        self.writer.write_headers(&default_headers(0)).await?;
        self.close().await
    }

    async fn close(&mut self) -> Result<(), SendError> {
        self.writer.flush().await?;
        self.writer.get_mut().shutdown().await.map_err(SendError::io)
    }
}
