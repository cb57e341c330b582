use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tandem_core::{ClientEvent, ServerEvent};
use tandem_server::{SignalingService, router};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Timeout for a frame the test expects to arrive (ms).
pub const RECV_TIMEOUT_MS: u64 = 2000;

/// How long a client listens before concluding nothing was sent (ms).
pub const SILENCE_MS: u64 = 200;

/// A running router on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub service: SignalingService,
}

impl TestServer {
    pub async fn start(public_dir: &Path) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let service = SignalingService::start(64);
        let app = router(service.clone(), public_dir);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("[TestServer] serve failed: {}", e);
            }
        });

        Ok(Self { addr, service })
    }

    /// Poll the room manager until `room_id` holds `expected` occupants.
    pub async fn wait_for_occupancy(&self, room_id: &str, expected: usize) -> Result<()> {
        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(RECV_TIMEOUT_MS);

        loop {
            let current = self.service.occupancy(room_id).await?;
            if current == expected {
                return Ok(());
            }
            if start.elapsed() > timeout {
                anyhow::bail!(
                    "Room '{}' stuck at {} occupant(s), wanted {}",
                    room_id,
                    current,
                    expected
                );
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}

/// WebSocket client speaking the JSON event protocol.
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let (stream, _) = connect_async(format!("ws://{}/ws", addr))
            .await
            .context("WebSocket handshake failed")?;
        Ok(Self { stream })
    }

    pub async fn send(&mut self, event: &ClientEvent) -> Result<()> {
        let json = serde_json::to_string(event)?;
        self.send_raw(&json).await
    }

    pub async fn send_raw(&mut self, text: &str) -> Result<()> {
        self.stream
            .send(Message::Text(text.to_owned().into()))
            .await
            .context("Failed to send frame")
    }

    /// Next text frame, decoded.
    pub async fn recv(&mut self) -> Result<ServerEvent> {
        let text = self.recv_text().await?;
        serde_json::from_str(&text).with_context(|| format!("Undecodable frame: {}", text))
    }

    /// Next text frame, undecoded.
    pub async fn recv_text(&mut self) -> Result<String> {
        let timeout = Duration::from_millis(RECV_TIMEOUT_MS);

        loop {
            let frame = tokio::time::timeout(timeout, self.stream.next())
                .await
                .context("Timeout waiting for frame")?;

            match frame {
                Some(Ok(Message::Text(text))) => return Ok(text.as_str().to_owned()),
                Some(Ok(Message::Close(_))) | None => anyhow::bail!("Socket closed"),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Fails if any text frame arrives within `SILENCE_MS`.
    pub async fn expect_silence(&mut self) -> Result<()> {
        let window = Duration::from_millis(SILENCE_MS);

        match tokio::time::timeout(window, self.stream.next()).await {
            Err(_) => Ok(()),
            Ok(Some(Ok(Message::Text(text)))) => anyhow::bail!("Unexpected frame: {}", text.as_str()),
            Ok(other) => anyhow::bail!("Unexpected socket activity: {:?}", other),
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.stream
            .close(None)
            .await
            .context("Failed to close socket")
    }
}
