//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use minicurl::http::{ResponseSink, Transport};
use minicurl::FetchError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Read a request head off the socket, up to the blank line.
async fn read_request_head(socket: &mut tokio::net::TcpStream) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    buf
}

/// Path of the request line, e.g. `/start` from `GET /start HTTP/1.1`.
fn request_path(head: &[u8]) -> String {
    String::from_utf8_lossy(head)
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string()
}

/// Start a backend that answers every connection with the given raw bytes.
///
/// Returns the bound address. `Connection: close` should be part of the head.
pub async fn start_raw_backend(response: Vec<u8>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = Arc::new(response);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let response = response.clone();
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        let _ = socket.write_all(&response).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Start a backend answering by request path; unknown paths get a 404.
pub async fn start_routed_backend(routes: Vec<(&'static str, Vec<u8>)>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let routes = routes.clone();
            tokio::spawn(async move {
                let path = request_path(&read_request_head(&mut socket).await);
                let response = routes
                    .iter()
                    .find(|(route, _)| *route == path)
                    .map(|(_, response)| response.clone())
                    .unwrap_or_else(|| http_response_with_status("404 Not Found", &[], b""));
                let _ = socket.write_all(&response).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Build a raw HTTP/1.1 200 response with a correct `Content-Length`.
pub fn http_response(extra_headers: &[&str], body: &[u8]) -> Vec<u8> {
    http_response_with_status("200 OK", extra_headers, body)
}

/// Build a raw HTTP/1.1 response with the given status, e.g. `301 Moved Permanently`.
pub fn http_response_with_status(status: &str, extra_headers: &[&str], body: &[u8]) -> Vec<u8> {
    let mut raw = format!("HTTP/1.1 {}\r\n", status).into_bytes();
    for header in extra_headers {
        raw.extend_from_slice(header.as_bytes());
        raw.extend_from_slice(b"\r\n");
    }
    raw.extend_from_slice(format!("Content-Length: {}\r\n", body.len()).as_bytes());
    raw.extend_from_slice(b"Connection: close\r\n\r\n");
    raw.extend_from_slice(body);
    raw
}

/// Start a backend that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

/// Transport double that records every URL it is asked for.
#[derive(Default, Clone)]
pub struct RecordingTransport {
    pub calls: Arc<AtomicUsize>,
    pub urls: Arc<Mutex<Vec<String>>>,
}

impl Transport for RecordingTransport {
    async fn perform(&self, url: &str, sink: &mut dyn ResponseSink) -> Result<(), FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());

        sink.on_header(b"HTTP/1.1 200 OK\r\n");
        sink.on_header(b"\r\n");
        sink.on_body(b"ok");
        Ok(())
    }
}
