//! Stub discovery endpoints for tests.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Canned HTTP response served by [`serve_once`].
pub(crate) struct StubResponse {
    status: u16,
    reason: &'static str,
    body: String,
}

impl StubResponse {
    /// `200 OK` with a JSON body.
    pub(crate) fn ok(body: impl Into<String>) -> Self {
        Self::status(200, "OK", body)
    }

    /// Arbitrary status line and body.
    pub(crate) fn status(status: u16, reason: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            reason,
            body: body.into(),
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            self.reason,
            self.body.len(),
            self.body
        )
        .into_bytes()
    }
}

/// A running one-shot stub server.
pub(crate) struct Stub {
    /// Port the stub listens on.
    pub(crate) port: u16,
    handle: JoinHandle<String>,
}

impl Stub {
    /// Waits for the served request and returns its head.
    pub(crate) async fn request(self) -> String {
        self.handle.await.expect("stub task panicked")
    }
}

/// Serves exactly one request on a random localhost port.
pub(crate) async fn serve_once(response: StubResponse) -> Stub {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let port = listener.local_addr().expect("stub addr").port();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");

        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.expect("read request");
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }

        stream
            .write_all(&response.to_bytes())
            .await
            .expect("write response");
        let _ = stream.shutdown().await;

        String::from_utf8_lossy(&head).into_owned()
    });

    Stub { port, handle }
}

/// Accepts connections and never answers.
pub(crate) async fn serve_hanging() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let port = listener.local_addr().expect("stub addr").port();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    });

    port
}

/// Returns a localhost port nothing is listening on.
pub(crate) async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind probe");
    let port = listener.local_addr().expect("probe addr").port();
    drop(listener);
    port
}
