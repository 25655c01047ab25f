//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use playstore_proxy::{HttpServer, ProxyConfig, ServerError, Shutdown};

/// A proxy instance running in a background task.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub server: JoinHandle<Result<(), ServerError>>,
}

/// Bind an ephemeral port and run the proxy on it.
pub async fn spawn_proxy(config: ProxyConfig) -> TestProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::new(config).unwrap();
    let handle = tokio::spawn(async move { server.run(listener, rx).await });
    TestProxy {
        addr,
        shutdown,
        server: handle,
    }
}

#[allow(dead_code)]
pub fn upstream_url(addr: SocketAddr) -> String {
    format!("http://{addr}/")
}

/// Start a mock upstream that returns a fixed 200 response.
#[allow(dead_code)]
pub async fn start_mock_upstream(body: String) -> SocketAddr {
    start_programmable_upstream(move || {
        let body = body.clone();
        async move { (200, body) }
    })
    .await
}

/// Start a programmable mock upstream.
#[allow(dead_code)]
pub async fn start_programmable_upstream<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        read_request_head(&mut socket).await;
                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Drain the request head so the client never sees a reset mid-send.
async fn read_request_head(socket: &mut tokio::net::TcpStream) {
    let mut buf = vec![0u8; 4096];
    let mut read = 0;
    loop {
        match socket.read(&mut buf[read..]).await {
            Ok(0) => break,
            Ok(n) => {
                read += n;
                if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
                if read == buf.len() {
                    break;
                }
            }
            Err(_) => break,
        }
    }
}
