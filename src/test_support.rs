// src/test_support.rs
//
// A throwaway HTTP/1.1 endpoint for tests: answers each incoming connection
// with the next canned reply and hands back the request bodies it saw.

use std::net::SocketAddr;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::mpsc,
    task::JoinHandle,
};
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

pub fn init_test_logging() {
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

pub struct Stub {
    pub url: Url,
    bodies: mpsc::UnboundedReceiver<String>,
    handle: JoinHandle<()>,
}

impl Stub {
    /// Serve `replies` in order, one connection each, then stop.
    pub async fn serve(path: &str, replies: Vec<(u16, String)>) -> Stub {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, bodies) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            for (status, body) in replies {
                let (mut sock, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                let request_body = read_request(&mut sock).await;
                let _ = tx.send(request_body);
                let reply = format!(
                    "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = sock.write_all(reply.as_bytes()).await;
                let _ = sock.shutdown().await;
            }
        });

        Stub {
            url: Url::parse(&format!("http://{}{}", addr, path)).unwrap(),
            bodies,
            handle,
        }
    }

    /// Request bodies received so far, in arrival order.
    pub fn received(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(b) = self.bodies.try_recv() {
            out.push(b);
        }
        out
    }

    pub async fn finish(self) {
        let _ = self.handle.await;
    }
}

/// An address nothing listens on.
pub async fn dead_url(path: &str) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}{}", addr, path)).unwrap()
}

// Only `Content-Length` bodies are read; chunked request bodies come back empty.
// reqwest sets a length for the JSON bodies these tests send.
async fn read_request(sock: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = match sock.read(&mut chunk).await {
            Ok(0) | Err(_) => return String::new(),
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = match sock.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
    }

    let end = buf.len().min(header_end + content_length);
    String::from_utf8_lossy(&buf[header_end..end]).to_string()
}
