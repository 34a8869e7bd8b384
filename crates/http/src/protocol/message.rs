use bytes::{Buf, Bytes};

/// Represents an item in an outgoing chunked payload stream.
///
/// Handlers feed these to [`ChunkedEncoder`](crate::codec::ChunkedEncoder):
/// every `Chunk` becomes one length-prefixed chunk on the wire and `Eof`
/// becomes the terminating zero-length chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadItem<Data: Buf = Bytes> {
    /// A chunk of payload data
    Chunk(Data),
    /// Marks the end of the payload stream
    Eof,
}
