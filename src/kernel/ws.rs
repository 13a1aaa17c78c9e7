use crate::core::errors::OkcoinError;
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{instrument, warn};

/// The venue expects the literal ping event body back on its liveness
/// probes rather than an echo of the probe payload.
const KEEPALIVE_PONG: &[u8] = b"{'event':'ping'}";

/// Transport and reconnect policy.
#[derive(Debug, Clone)]
pub struct WsConfig {
    /// Connection timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Delay between reconnection attempts in milliseconds; 0 retries immediately
    pub reconnect_delay_ms: u64,
    /// Max consecutive reconnection attempts; `None` retries forever
    pub max_reconnect_attempts: Option<u32>,
}

impl Default for WsConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000, // 10 seconds
            reconnect_delay_ms: 0,
            max_reconnect_attempts: None,
        }
    }
}

/// WebSocket session trait - pure transport layer.
///
/// The only suspension points of the client are `connect`, `send` and
/// `next_frame`; liveness probes are answered inside `next_frame` without
/// surfacing to the caller.
#[async_trait]
pub trait WsSession: Send {
    /// Dial the endpoint.
    async fn connect(&mut self) -> Result<(), OkcoinError>;

    /// Send one raw frame.
    async fn send(&mut self, msg: Message) -> Result<(), OkcoinError>;

    /// Receive the next data frame. Returns `None` once the connection is closed.
    async fn next_frame(&mut self) -> Option<Result<Message, OkcoinError>>;

    /// Close the connection.
    async fn close(&mut self) -> Result<(), OkcoinError>;

    /// Check if the connection is alive.
    fn is_connected(&self) -> bool;
}

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Tungstenite-based WebSocket transport.
pub struct TungsteniteWs {
    url: String,
    venue: String,
    config: WsConfig,
    write: Option<futures_util::stream::SplitSink<WsStream, Message>>,
    read: Option<futures_util::stream::SplitStream<WsStream>>,
    connected: bool,
}

impl TungsteniteWs {
    /// Create a new WebSocket transport.
    ///
    /// # Arguments
    /// * `url` - The WebSocket URL to connect to
    /// * `venue` - Venue name for logging/tracing
    pub fn new(url: String, venue: String) -> Self {
        Self {
            url,
            venue,
            config: WsConfig::default(),
            write: None,
            read: None,
            connected: false,
        }
    }

    /// Set custom transport configuration.
    pub fn with_config(mut self, config: WsConfig) -> Self {
        self.config = config;
        self
    }
}

#[async_trait]
impl WsSession for TungsteniteWs {
    #[instrument(skip(self), fields(venue = %self.venue, url = %self.url))]
    async fn connect(&mut self) -> Result<(), OkcoinError> {
        let connect_timeout = Duration::from_millis(self.config.connect_timeout_ms);

        let (ws_stream, _) = tokio::time::timeout(connect_timeout, connect_async(&self.url))
            .await
            .map_err(|_| {
                OkcoinError::ConnectionTimeout("WebSocket connection timeout".to_string())
            })?
            .map_err(|e| OkcoinError::Network(format!("WebSocket connection failed: {}", e)))?;

        let (write, read) = ws_stream.split();
        self.write = Some(write);
        self.read = Some(read);
        self.connected = true;

        Ok(())
    }

    #[instrument(skip(self, msg), fields(venue = %self.venue))]
    async fn send(&mut self, msg: Message) -> Result<(), OkcoinError> {
        if !self.connected {
            return Err(OkcoinError::Network(
                "WebSocket not connected".to_string(),
            ));
        }

        let write = self.write.as_mut().ok_or_else(|| {
            OkcoinError::Network("WebSocket write stream not available".to_string())
        })?;

        write.send(msg).await.map_err(|e| {
            self.connected = false;
            OkcoinError::Network(format!("Failed to send WebSocket message: {}", e))
        })?;

        Ok(())
    }

    #[instrument(skip(self), fields(venue = %self.venue))]
    async fn next_frame(&mut self) -> Option<Result<Message, OkcoinError>> {
        loop {
            let frame = self.read.as_mut()?.next().await;

            match frame {
                Some(Ok(Message::Ping(_))) => {
                    // Liveness probe: answer inline and keep reading. This must
                    // stay quick so the read loop is never starved.
                    let pong = Message::Pong(KEEPALIVE_PONG.to_vec());
                    if let Some(write) = self.write.as_mut() {
                        if let Err(e) = write.send(pong).await {
                            warn!("Failed to send pong response: {}", e);
                        }
                    }
                }
                Some(Ok(Message::Pong(_))) => {}
                Some(Ok(Message::Close(_))) => {
                    self.connected = false;
                    return None;
                }
                Some(Ok(message)) => return Some(Ok(message)),
                Some(Err(e)) => {
                    self.connected = false;
                    return Some(Err(OkcoinError::Network(format!(
                        "WebSocket error: {}",
                        e
                    ))));
                }
                None => {
                    self.connected = false;
                    return None;
                }
            }
        }
    }

    #[instrument(skip(self), fields(venue = %self.venue))]
    async fn close(&mut self) -> Result<(), OkcoinError> {
        if let Some(write) = self.write.as_mut() {
            let _ = write.send(Message::Close(None)).await;
        }
        self.connected = false;
        self.write = None;
        self.read = None;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
