//! Integration tests for the Cloud Kitchen client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cloud-kitchen-integration-tests
//! ```
//!
//! No backend is needed. [`FakeBackend`] listens on a loopback port,
//! answers canned JSON per route and records every request, so tests can
//! check the headers and bodies the real [`ApiClient`] sends.
//!
//! # Test Categories
//!
//! - `rest_client` - Auth headers, envelopes and error mapping over HTTP
//! - `cart_persistence` - The cart surviving restarts on a file store
//! - `session_lifecycle` - Sign-in, restore and sign-out across processes
//!
//! [`ApiClient`]: cloud_kitchen_client::api::ApiClient

use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use url::Url;

use cloud_kitchen_client::config::ClientConfig;

/// A canned response for one method and path.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: &'static str,
    pub path: String,
    pub status: u16,
    pub body: String,
}

impl Route {
    /// A 200 response with a JSON body.
    #[must_use]
    pub fn ok(method: &'static str, path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::status(method, path, 200, body)
    }

    /// A response with any status and a JSON body.
    #[must_use]
    pub fn status(
        method: &'static str,
        path: impl Into<String>,
        status: u16,
        body: serde_json::Value,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            status,
            body: body.to_string(),
        }
    }
}

/// A request as the fake backend received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path and query string.
    pub target: String,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// The body parsed as JSON, `Null` if it is not JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or_default()
    }
}

type Log = Arc<Mutex<Vec<RecordedRequest>>>;

/// A loopback HTTP server answering from a fixed route table.
///
/// One request per connection; every response carries `Connection: close`.
/// Unknown routes get a 404 with a JSON `message`.
pub struct FakeBackend {
    addr: SocketAddr,
    log: Log,
    task: JoinHandle<()>,
}

impl FakeBackend {
    /// Bind to an ephemeral port and start serving `routes`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the listener cannot be bound.
    pub async fn start(routes: Vec<Route>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let routes = Arc::new(routes);
        let log: Log = Arc::default();

        let task = tokio::spawn({
            let log = Arc::clone(&log);
            async move {
                while let Ok((stream, _)) = listener.accept().await {
                    let routes = Arc::clone(&routes);
                    let log = Arc::clone(&log);
                    tokio::spawn(async move {
                        // A client hanging up early is not interesting here.
                        let _ = serve(stream, &routes, &log).await;
                    });
                }
            }
        });

        Ok(Self { addr, log, task })
    }

    /// Base URL to point the client at.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the bound address does not form a URL.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://{}", self.addr))
    }

    /// Every request received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent request whose target starts with `path`.
    #[must_use]
    pub fn last_request_to(&self, path: &str) -> Option<RecordedRequest> {
        self.requests()
            .into_iter()
            .rev()
            .find(|request| request.target.starts_with(path))
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Client configuration pointing at `base_url`, with data under `data_dir`.
#[must_use]
pub fn test_config(base_url: Url, data_dir: &Path) -> ClientConfig {
    ClientConfig {
        api_base_url: base_url,
        data_dir: data_dir.to_path_buf(),
        request_timeout: Duration::from_secs(5),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

async fn serve(mut stream: TcpStream, routes: &[Route], log: &Log) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 4096];

    let head_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(chunk.get(..n).unwrap_or_default());
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(buf.get(..head_end).unwrap_or_default()).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split(' ');
    let method = request_line.next().unwrap_or_default().to_string();
    let target = request_line.next().unwrap_or_default().to_string();

    let mut content_length = 0;
    let mut authorization = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                "authorization" => authorization = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    while buf.len() < head_end + content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(chunk.get(..n).unwrap_or_default());
    }
    let body = String::from_utf8_lossy(buf.get(head_end..).unwrap_or_default()).into_owned();

    let path = target.split('?').next().unwrap_or_default();
    let (status, reply) = routes
        .iter()
        .find(|route| route.method == method && route.path == path)
        .map_or_else(
            || (404, r#"{"message":"Not found"}"#.to_string()),
            |route| (route.status, route.body.clone()),
        );

    log.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RecordedRequest {
            method,
            target,
            authorization,
            body,
        });

    let response = format!(
        "HTTP/1.1 {status} {reason}\r\ncontent-type: application/json\r\ncontent-length: {len}\r\nconnection: close\r\n\r\n{reply}",
        reason = if status < 400 { "OK" } else { "Error" },
        len = reply.len(),
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}
