//! Chunked transfer encoding for response bodies.
//!
//! Each [`PayloadItem::Chunk`] is framed as `<hex-length>\r\n<bytes>\r\n` and
//! [`PayloadItem::Eof`] writes the terminating `0\r\n`. The blank line that
//! normally follows is not written here: it is the end of the trailer block,
//! which the handler writes afterwards with
//! [`ResponseWriter::write_headers`](crate::connection::ResponseWriter::write_headers).

use crate::codec::header::CRLF;
use crate::protocol::{PayloadItem, SendError};
use bytes::{Buf, BufMut, BytesMut};
use std::io::Write;

use tokio_util::codec::Encoder;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkedEncoder {
    eof: bool,
    send_size: usize,
}

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of payload bytes framed so far, without chunk overhead.
    pub fn send_size(&self) -> usize {
        self.send_size
    }

    pub fn is_finish(&self) -> bool {
        self.eof
    }
}

impl<D: Buf> Encoder<PayloadItem<D>> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, item: PayloadItem<D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if self.eof {
            warn!("encode payload_item after the last chunk, ignored");
            return Ok(());
        }

        match item {
            PayloadItem::Chunk(mut bytes) => {
                let size = bytes.remaining();
                // an empty chunk would read as the terminator
                if size == 0 {
                    return Ok(());
                }

                write!(helper::Writer(dst), "{size:x}\r\n")?;
                dst.reserve(size + CRLF.len());
                while bytes.has_remaining() {
                    let chunk = bytes.chunk();
                    let len = chunk.len();
                    dst.put_slice(chunk);
                    bytes.advance(len);
                }
                dst.put_slice(CRLF);
                self.send_size += size;
                Ok(())
            }
            PayloadItem::Eof => {
                self.eof = true;
                dst.put_slice(b"0\r\n");
                Ok(())
            }
        }
    }
}

mod helper {
    use bytes::{BufMut, BytesMut};
    use std::io;

    pub struct Writer<'a>(pub &'a mut BytesMut);

    impl io::Write for Writer<'_> {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.put_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
