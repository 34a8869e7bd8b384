//! Demo HTTP server built on `httpfromtcp`.
//!
//! ```text
//! httpserver --port 42069 --assets-dir assets
//! curl -v http://localhost:42069/httpbin/stream/10 --raw
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use httpfromtcp::connection::DEFAULT_READ_BUFFER_SIZE;
use httpfromtcp::server::Server;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

mod routes;

use routes::Routes;

#[derive(Parser, Debug)]
#[command(name = "httpserver")]
#[command(about = "Serves status pages, a video and a chunked httpbin proxy over raw TCP", long_about = None)]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(short, long, default_value_t = 42069)]
    port: u16,

    /// Directory holding `vim.mp4`
    #[arg(long, default_value = "assets")]
    assets_dir: PathBuf,

    /// Capacity of each connection's read buffer in bytes
    #[arg(long, default_value_t = DEFAULT_READ_BUFFER_SIZE)]
    read_buffer_size: usize,

    /// Origin `/httpbin/*` requests are forwarded to
    #[arg(long, default_value = "https://httpbin.org")]
    upstream: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let server = match Server::builder()
        .address((args.host.as_str(), args.port))
        .read_buffer_size(args.read_buffer_size)
        .bind()
        .await
    {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "error starting server");
            std::process::exit(1);
        }
    };

    let shutdown = server.shutdown_handle();
    let routes = Arc::new(Routes::new(args.assets_dir, args.upstream));
    let serving = tokio::spawn(server.serve(routes));
    info!(host = %args.host, port = args.port, "server started");

    shutdown_signal().await;
    shutdown.close();
    if let Err(e) = serving.await {
        error!(cause = %e, "accept loop terminated abnormally");
    }
    info!("server gracefully stopped");
}

/// Waits for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(cause = %e, "can't listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(cause = %e, "can't listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT"),
        () = terminate => info!("received SIGTERM"),
    }
}
