use std::path::PathBuf;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use http::StatusCode;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, TRAILER, TRANSFER_ENCODING};
use sha2::{Digest, Sha256};
use tokio::io::AsyncWrite;
use tokio_util::codec::Encoder;
use tracing::{error, info, warn};

use httpfromtcp::codec::ChunkedEncoder;
use httpfromtcp::connection::ResponseWriter;
use httpfromtcp::handler::Handler;
use httpfromtcp::protocol::{HeaderMap, PayloadItem, Request, SendError, default_headers};

const VIDEO_FILE: &str = "vim.mp4";
const VIDEO_MP4: &str = "video/mp4";
const HTTPBIN_PREFIX: &str = "/httpbin/";

const CONTENT_SHA256: &str = "X-Content-SHA256";
const CONTENT_LENGTH_TRAILER: &str = "X-Content-Length";

/// The demo application.
///
/// | target          | response                                          |
/// |-----------------|---------------------------------------------------|
/// | `/yourproblem`  | 400 page                                          |
/// | `/myproblem`    | 500 page                                          |
/// | `/video`        | `<assets>/vim.mp4`                                |
/// | `/httpbin/...`  | the upstream resource, chunked, with trailers     |
/// | anything else   | 200 page                                          |
#[derive(Debug)]
pub struct Routes {
    assets_dir: PathBuf,
    upstream: String,
    client: reqwest::Client,
}

impl Routes {
    pub fn new(assets_dir: impl Into<PathBuf>, upstream: impl Into<String>) -> Self {
        Self { assets_dir: assets_dir.into(), upstream: upstream.into(), client: reqwest::Client::new() }
    }

    async fn video<W>(&self, writer: &mut ResponseWriter<W>) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let path = self.assets_dir.join(VIDEO_FILE);
        let video = match tokio::fs::read(&path).await {
            Ok(video) => video,
            Err(e) => {
                error!(cause = %e, path = %path.display(), "can't read video");
                return write_page(writer, StatusCode::INTERNAL_SERVER_ERROR).await;
            }
        };

        let mut headers = default_headers(video.len());
        headers.replace(CONTENT_TYPE, VIDEO_MP4);

        writer.write_status_line(StatusCode::OK).await?;
        writer.write_headers(&headers).await?;
        writer.write_body(&video).await?;
        Ok(())
    }

    /// Streams `<upstream>/<path>` back chunk by chunk, followed by the
    /// SHA-256 and length of the whole body as trailers.
    async fn proxy<W>(&self, path: &str, writer: &mut ResponseWriter<W>) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let url = format!("{}/{path}", self.upstream.trim_end_matches('/'));
        let mut response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!(cause = %e, %url, "upstream request failed");
                return write_page(writer, StatusCode::INTERNAL_SERVER_ERROR).await;
            }
        };
        info!(%url, upstream_status = response.status().as_u16(), "proxying upstream response");

        let mut headers = default_headers(0);
        headers.delete(CONTENT_LENGTH);
        headers.set(TRANSFER_ENCODING, "chunked");
        headers.replace(CONTENT_TYPE, mime::TEXT_PLAIN.essence_str());
        headers.set(TRAILER, CONTENT_SHA256);
        headers.set(TRAILER, CONTENT_LENGTH_TRAILER);

        writer.write_status_line(StatusCode::OK).await?;
        writer.write_headers(&headers).await?;

        let mut encoder = ChunkedEncoder::new();
        let mut hasher = Sha256::new();
        let mut frame = BytesMut::new();
        loop {
            let chunk = match response.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    warn!(cause = %e, %url, "upstream body ended early");
                    break;
                }
            };

            hasher.update(&chunk);
            encoder.encode(PayloadItem::Chunk(chunk), &mut frame)?;
            writer.write_body(&frame.split()).await?;
        }

        encoder.encode(PayloadItem::<Bytes>::Eof, &mut frame)?;
        writer.write_body(&frame.split()).await?;

        let mut trailers = HeaderMap::new();
        trailers.set(CONTENT_SHA256, format!("{:x}", hasher.finalize()));
        trailers.set(CONTENT_LENGTH_TRAILER, encoder.send_size().to_string());
        writer.write_headers(&trailers).await
    }
}

#[async_trait]
impl Handler for Routes {
    async fn call<W>(&self, request: Request, writer: &mut ResponseWriter<W>) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin + Send,
    {
        match request.target() {
            "/yourproblem" => write_page(writer, StatusCode::BAD_REQUEST).await,
            "/myproblem" => write_page(writer, StatusCode::INTERNAL_SERVER_ERROR).await,
            "/video" => self.video(writer).await,
            target => match target.strip_prefix(HTTPBIN_PREFIX) {
                Some(path) => self.proxy(path, writer).await,
                None => write_page(writer, StatusCode::OK).await,
            },
        }
    }
}

fn page(status: StatusCode) -> String {
    let (heading, message) = match status {
        StatusCode::OK => ("Success!", "Your request was an absolute banger."),
        StatusCode::BAD_REQUEST => ("Bad Request", "Your request honestly kinda sucked."),
        _ => ("Internal Server Error", "Okay, you know what? This one is on me."),
    };
    format!("<html> <head> <title>{status}</title> </head> <body> <h1>{heading}</h1> <p>{message}</p> </body> </html>")
}

async fn write_page<W>(writer: &mut ResponseWriter<W>, status: StatusCode) -> Result<(), SendError>
where
    W: AsyncWrite + Unpin + Send,
{
    let body = page(status);
    let mut headers = default_headers(body.len());
    headers.replace(CONTENT_TYPE, mime::TEXT_HTML.essence_str());

    writer.write_status_line(status).await?;
    writer.write_headers(&headers).await?;
    writer.write_body(body.as_bytes()).await?;
    Ok(())
}
