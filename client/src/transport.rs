use std::future::Future;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

/// A line-oriented connection to the server.
///
/// `receive` yields one complete frame at a time and `None` once the peer
/// has closed the connection.
pub trait Transport: Send {
    fn send(&mut self, line: String) -> impl Future<Output = Result<()>> + Send;

    fn receive(&mut self) -> impl Future<Output = Result<Option<String>>> + Send;

    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport over a websocket
pub struct WebSocketTransport {
    ws: WsStream,
}

impl WebSocketTransport {
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws, _response) = connect_async(url)
            .await
            .with_context(|| format!("Failed to connect to {}", url))?;

        Ok(Self { ws })
    }
}

impl Transport for WebSocketTransport {
    async fn send(&mut self, line: String) -> Result<()> {
        tracing::trace!(%line, "sending");
        self.ws
            .send(Message::Text(line))
            .await
            .context("Failed to send message")
    }

    async fn receive(&mut self) -> Result<Option<String>> {
        while let Some(message) = self.ws.next().await {
            let message = message.context("WebSocket error")?;

            match message {
                Message::Text(text) => return Ok(Some(text)),
                Message::Ping(data) => self
                    .ws
                    .send(Message::Pong(data))
                    .await
                    .context("Failed to send pong")?,
                Message::Close(_) => return Ok(None),
                _ => {}
            }
        }

        Ok(None)
    }

    async fn close(&mut self) -> Result<()> {
        self.ws
            .close(None)
            .await
            .context("Failed to close WebSocket")
    }
}
