//! HTTP header block encoder
//!
//! Serializes a [`HeaderMap`] as `name: value\r\n` lines followed by the blank
//! line that ends the block. The same wire format is used for the header block
//! of a response and for the trailer block after the last chunk of a chunked
//! body; only the position in the stream differs.

use crate::codec::header::CRLF;
use crate::protocol::{HeaderMap, SendError};

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

/// Encoder for header and trailer blocks implementing the [`Encoder`] trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl Encoder<&HeaderMap> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, headers: &HeaderMap, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let size = headers.iter().map(|(name, value)| name.len() + value.len() + 4).sum::<usize>() + CRLF.len();
        dst.reserve(size);

        for (name, value) in headers {
            dst.put_slice(name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(CRLF);
        }
        dst.put_slice(CRLF);
        Ok(())
    }
}
