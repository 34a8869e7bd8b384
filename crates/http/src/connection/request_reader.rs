use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::codec::RequestDecoder;
use crate::protocol::{ParseError, Request};

/// Default capacity of the scratch buffer requests are read into.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Reads one request from a byte stream through a fixed-capacity buffer.
///
/// Bytes the decoder consumed are dropped from the front of the buffer before
/// the next read, so a protocol element may span any number of reads while
/// memory stays bounded by the capacity. Body bytes are moved into the request
/// as they arrive and never pile up in the buffer.
#[derive(Debug)]
pub struct RequestReader<R> {
    reader: R,
    buffer: BytesMut,
    capacity: usize,
    decoder: RequestDecoder,
}

impl<R> RequestReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_READ_BUFFER_SIZE)
    }

    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { reader, buffer: BytesMut::with_capacity(capacity), capacity, decoder: RequestDecoder::new() }
    }

    /// Reads until one request is complete.
    ///
    /// Returns `Ok(None)` when the stream ended before any byte was received.
    ///
    /// # Errors
    ///
    /// - any parse error of [`RequestDecoder`]
    /// - [`ParseError::IncompleteBody`] when the stream ended inside the body
    /// - [`ParseError::TooLargeHeader`] when a single line does not fit the buffer
    /// - [`ParseError::Io`] when reading fails
    pub async fn read_request(&mut self) -> Result<Option<Request>, ParseError> {
        loop {
            if let Some(request) = self.decoder.decode(&mut self.buffer)? {
                return Ok(Some(request));
            }

            let free = self.capacity - self.buffer.len();
            if free == 0 {
                return Err(ParseError::too_large_header(self.buffer.len(), self.capacity));
            }

            // reclaims the space of consumed bytes by shifting pending ones to the front
            self.buffer.reserve(free);
            let n = self.reader.read_buf(&mut (&mut self.buffer).limit(free)).await.map_err(ParseError::io)?;
            trace!(read = n, pending = self.buffer.len(), phase = %self.decoder.phase(), "read request bytes");

            if n == 0 {
                debug!(phase = %self.decoder.phase(), "reached end of request stream");
                return self.decoder.decode_eof(&mut self.buffer);
            }
        }
    }

    /// Bytes read but not consumed by the decoder yet.
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::protocol::Phase;
    use std::collections::VecDeque;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    /// Reader returning the scripted pieces one read at a time, then EOF.
    #[derive(Debug)]
    pub(crate) struct ScriptedReader {
        pieces: VecDeque<Vec<u8>>,
    }

    impl ScriptedReader {
        pub(crate) fn new<I: IntoIterator<Item = T>, T: AsRef<[u8]>>(pieces: I) -> Self {
            Self { pieces: pieces.into_iter().map(|piece| piece.as_ref().to_vec()).collect() }
        }

        pub(crate) fn split_every(src: &[u8], size: usize) -> Self {
            Self::new(src.chunks(size))
        }
    }

    impl AsyncRead for ScriptedReader {
        fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            let Some(mut piece) = self.pieces.pop_front() else {
                return Poll::Ready(Ok(()));
            };

            let amt = std::cmp::min(piece.len(), buf.remaining());
            buf.put_slice(&piece[..amt]);
            if amt < piece.len() {
                let rest = piece.split_off(amt);
                self.pieces.push_front(rest);
            }
            Poll::Ready(Ok(()))
        }
    }

    #[derive(Debug)]
    struct FailingReader;

    impl AsyncRead for FailingReader {
        fn poll_read(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::from(io::ErrorKind::ConnectionReset)))
        }
    }

    const POST: &[u8] = b"POST /x HTTP/1.1\r\nHost: a\r\nContent-Length: 4\r\n\r\nabcd";

    #[tokio::test]
    async fn two_pieces_split_mid_header_and_mid_body() {
        let reader = ScriptedReader::new([&POST[..22], &POST[22..]]);
        let mut request_reader = RequestReader::new(reader);

        let request = request_reader.read_request().await.unwrap().unwrap();

        assert_eq!(request.method(), "POST");
        assert_eq!(request.target(), "/x");
        assert_eq!(request.version(), "1.1");
        assert_eq!(request.headers().len(), 2);
        assert_eq!(request.headers().get("host"), Some("a"));
        assert_eq!(request.headers().get("content-length"), Some("4"));
        assert_eq!(request.body(), b"abcd");
    }

    #[tokio::test]
    async fn one_byte_at_a_time() {
        for size in [1, 2, 3, 7, 16, POST.len()] {
            let mut request_reader = RequestReader::new(ScriptedReader::split_every(POST, size));
            let request = request_reader.read_request().await.unwrap().unwrap();

            assert_eq!(request.body(), b"abcd", "pieces of {size}");
            assert_eq!(request.headers().get("host"), Some("a"));
        }
    }

    #[tokio::test]
    async fn small_buffer_keeps_pending_bytes() {
        // every header line fits, the whole request does not
        let mut request_reader = RequestReader::with_capacity(ScriptedReader::new([POST]), 20);
        let request = request_reader.read_request().await.unwrap().unwrap();

        assert_eq!(request.target(), "/x");
        assert_eq!(request.body(), b"abcd");
        assert!(request_reader.pending().is_empty());
    }

    #[tokio::test]
    async fn body_longer_than_buffer() {
        let body = vec![b'x'; 100];
        let mut src = b"POST / HTTP/1.1\r\nContent-Length: 100\r\n\r\n".to_vec();
        src.extend_from_slice(&body);

        let mut request_reader = RequestReader::with_capacity(ScriptedReader::split_every(&src, 9), 32);
        let request = request_reader.read_request().await.unwrap().unwrap();

        assert_eq!(request.body(), &body[..]);
    }

    #[tokio::test]
    async fn incomplete_body() {
        let src = b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nabc";
        let mut request_reader = RequestReader::new(ScriptedReader::new([src]));

        let result = request_reader.read_request().await;
        assert!(matches!(result, Err(ParseError::IncompleteBody { expected: 5, received: 3 })));
    }

    #[tokio::test]
    async fn no_body_request() {
        let mut request_reader = RequestReader::new(ScriptedReader::new([b"GET / HTTP/1.1\r\nHost: a\r\n\r\n"]));

        let request = request_reader.read_request().await.unwrap().unwrap();
        assert_eq!(request.headers().get("host"), Some("a"));
        assert!(request.body().is_empty());
        assert_eq!(request.phase(), Phase::Done);
    }

    #[tokio::test]
    async fn empty_stream() {
        let mut request_reader = RequestReader::new(ScriptedReader::new(Vec::<Vec<u8>>::new()));
        assert!(request_reader.read_request().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn line_larger_than_buffer() {
        let src = b"GET /a-rather-long-target-that-does-not-fit HTTP/1.1\r\n\r\n";
        let mut request_reader = RequestReader::with_capacity(ScriptedReader::new([src]), 16);

        let result = request_reader.read_request().await;
        assert!(matches!(result, Err(ParseError::TooLargeHeader { current_size: 16, max_size: 16 })));
    }

    #[tokio::test]
    async fn malformed_header() {
        let src = b"GET / HTTP/1.1\r\nHost : a\r\n\r\n";
        let mut request_reader = RequestReader::new(ScriptedReader::split_every(src, 5));

        let result = request_reader.read_request().await;
        assert!(matches!(result, Err(ParseError::MalformedHeaderName { .. })));
    }

    #[tokio::test]
    async fn read_failure() {
        let mut request_reader = RequestReader::new(FailingReader);

        let result = request_reader.read_request().await;
        assert!(matches!(result, Err(ParseError::Io { .. })));
    }
}
