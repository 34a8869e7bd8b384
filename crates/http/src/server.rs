//! TCP accept loop serving every connection on its own task.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use httpfromtcp::handler::Handler;
//! use httpfromtcp::server::Server;
//!
//! # async fn run<H: Handler + 'static>(handler: H) -> Result<(), Box<dyn std::error::Error>> {
//! let server = Server::builder().address("127.0.0.1:42069").bind().await?;
//! let shutdown = server.shutdown_handle();
//!
//! let serving = tokio::spawn(server.serve(Arc::new(handler)));
//! tokio::signal::ctrl_c().await?;
//! shutdown.close();
//! serving.await?;
//! # Ok(())
//! # }
//! ```

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::select;
use tokio::sync::Notify;
use tracing::{error, info, warn};

use crate::connection::{DEFAULT_READ_BUFFER_SIZE, HttpConnection};
use crate::ensure;
use crate::handler::Handler;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("address must be set")]
    MissingAddress,

    #[error("can't resolve address: {source}")]
    Resolve { source: io::Error },

    #[error("can't bind {address:?}: {source}")]
    Bind { address: Vec<SocketAddr>, source: io::Error },
}

#[derive(Debug)]
pub struct ServerBuilder {
    address: Option<io::Result<Vec<SocketAddr>>>,
    read_buffer_size: usize,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { address: None, read_buffer_size: DEFAULT_READ_BUFFER_SIZE }
    }

    /// Every resolved address is tried in order when binding.
    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = Some(address.to_socket_addrs().map(Iterator::collect));
        self
    }

    /// Capacity of each connection's read buffer; also the longest request or
    /// header line a client may send.
    pub fn read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.read_buffer_size = read_buffer_size;
        self
    }

    pub async fn bind(self) -> Result<Server, ServerError> {
        let address = self.address.ok_or(ServerError::MissingAddress)?.map_err(|source| ServerError::Resolve { source })?;
        ensure!(!address.is_empty(), ServerError::MissingAddress);

        let listener = TcpListener::bind(address.as_slice())
            .await
            .map_err(|source| ServerError::Bind { address, source })
            .inspect_err(|e| error!(cause = %e, "bind server error"))?;

        Ok(Server { listener, read_buffer_size: self.read_buffer_size, shutdown: ShutdownHandle::new() })
    }
}

#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    read_buffer_size: usize,
    shutdown: ShutdownHandle,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Accepts connections until [`ShutdownHandle::close`] is called.
    ///
    /// Each connection is processed on a spawned task; connections already
    /// accepted keep running after the loop returns.
    pub async fn serve<H>(self, handler: Arc<H>)
    where
        H: Handler + 'static,
    {
        info!(address = ?self.listener.local_addr().ok(), "start listening");

        while !self.shutdown.is_closed() {
            let accepted = select! {
                biased;
                () = self.shutdown.notified() => break,
                accepted = self.listener.accept() => accepted,
            };

            let (tcp_stream, remote_addr) = match accepted {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let handler = Arc::clone(&handler);
            let read_buffer_size = self.read_buffer_size;

            tokio::spawn(async move {
                let (reader, writer) = tcp_stream.into_split();
                let connection = HttpConnection::with_capacity(reader, writer, read_buffer_size);
                match connection.process(handler).await {
                    Ok(()) => info!(%remote_addr, "finished process, connection shutdown"),
                    Err(e) => error!(%remote_addr, cause = %e, "service has error, connection shutdown"),
                }
            });
        }

        info!("server closed, stop accepting connections");
    }
}

/// Stops the accept loop of a [`Server`]; cheap to clone and safe to use from
/// any task.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    closed: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl ShutdownHandle {
    fn new() -> Self {
        Self { closed: Arc::new(AtomicBool::new(false)), notify: Arc::new(Notify::new()) }
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        // stores a permit when the loop is not waiting yet
        self.notify.notify_one();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    async fn notified(&self) {
        self.notify.notified().await;
    }
}
