//! Hand-written HTTP/1.1 responder for cases wiremock cannot express:
//! bodies without Content-Length, and bodies that stall mid-transfer.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// How the server behaves after writing the response head and `body`.
#[derive(Debug, Clone, Copy)]
pub enum AfterBody {
    /// Close the connection (ends a close-delimited body).
    Close,
    /// Keep the connection open without sending anything else.
    Stall(Duration),
}

/// Serves exactly one connection with `head` + `body`, then applies `after`.
///
/// `head` must include the status line and headers, without the blank line.
/// Returns `None` when localhost binding is not available.
pub async fn serve_once(head: &str, body: Vec<u8>, after: AfterBody) -> Option<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await.ok()?;
    let addr = listener.local_addr().ok()?;
    let head = format!("{head}\r\n\r\n");

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => request.extend_from_slice(&buf[..n]),
            }
        }
        if socket.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        if socket.write_all(&body).await.is_err() {
            return;
        }
        let _ = socket.flush().await;
        match after {
            AfterBody::Close => {
                let _ = socket.shutdown().await;
            }
            AfterBody::Stall(duration) => tokio::time::sleep(duration).await,
        }
    });

    Some(addr)
}
