//! Request handler trait.
//!
//! A [`Handler`] receives a fully parsed [`Request`] together with the
//! [`ResponseWriter`] of its connection and writes the whole response itself,
//! status line first, then headers, body and optional trailers.

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use crate::connection::ResponseWriter;
use crate::protocol::{Request, SendError};

#[async_trait]
pub trait Handler: Send + Sync {
    async fn call<W>(&self, request: Request, writer: &mut ResponseWriter<W>) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin + Send;
}

