//! Connection supervisor.
//!
//! [`OkcoinWsClient::run`] owns the transport for its whole lifetime and
//! drives a connect / subscribe / stream cycle until it is shut down. Decoded
//! events go out on an unbounded channel; commands come in the same way, so a
//! [`OkcoinHandle`] can be used from any task without touching the socket.
//! The socket has exactly one writer: the supervisor task itself.

use crate::core::config::OkcoinConfig;
use crate::core::errors::OkcoinError;
use crate::core::types::ContractTenor;
use crate::kernel::codec::WsCodec;
use crate::kernel::ws::WsSession;
use crate::okcoin::codec::{OkcoinCodec, OkcoinWsEvent};
use crate::okcoin::signer::OkcoinSigner;
use crate::okcoin::subscriptions::SubscriptionManager;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{debug, info, warn};

/// Lifecycle phase of the supervisor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Subscribing,
    Streaming,
}

/// Requests forwarded to the supervisor task, which serializes them onto the
/// socket between reads.
#[derive(Debug)]
pub enum Command {
    Subscribe {
        channel: String,
    },
    Unsubscribe {
        channel: String,
    },
    SubscribeAuthenticated {
        channel: String,
        parameters: BTreeMap<String, String>,
    },
    UnsubscribeAuthenticated {
        channel: String,
        parameters: BTreeMap<String, String>,
    },
    PlaceSpotOrder {
        symbol: String,
        order_type: String,
        price: f64,
        amount: f64,
    },
    CancelSpotOrder {
        symbol: String,
        order_id: i64,
    },
    SpotOrderStatus {
        symbol: String,
        order_id: i64,
    },
    PlaceFuturesOrder {
        symbol: String,
        tenor: ContractTenor,
        price: f64,
        amount: f64,
        order_type: i64,
        match_price: i64,
        leverage: i64,
    },
    CancelFuturesOrder {
        symbol: String,
        tenor: ContractTenor,
        order_id: i64,
    },
    FuturesOrderStatus {
        symbol: String,
        tenor: ContractTenor,
        order_id: i64,
        status: i64,
        current_page: i64,
        page_length: i64,
    },
    Shutdown,
}

/// Cloneable control handle for a running [`OkcoinWsClient`].
///
/// Every method queues a command and returns immediately; outcomes arrive as
/// events (order acknowledgements, error envelopes) on the event stream.
#[derive(Clone)]
pub struct OkcoinHandle {
    commands: mpsc::UnboundedSender<Command>,
    enabled: Arc<AtomicBool>,
}

impl OkcoinHandle {
    fn send(&self, command: Command) -> Result<(), OkcoinError> {
        self.commands
            .send(command)
            .map_err(|_| OkcoinError::ClientStopped)
    }

    pub fn subscribe(&self, channel: impl Into<String>) -> Result<(), OkcoinError> {
        self.send(Command::Subscribe {
            channel: channel.into(),
        })
    }

    pub fn unsubscribe(&self, channel: impl Into<String>) -> Result<(), OkcoinError> {
        self.send(Command::Unsubscribe {
            channel: channel.into(),
        })
    }

    pub fn subscribe_authenticated(
        &self,
        channel: impl Into<String>,
        parameters: BTreeMap<String, String>,
    ) -> Result<(), OkcoinError> {
        self.send(Command::SubscribeAuthenticated {
            channel: channel.into(),
            parameters,
        })
    }

    pub fn unsubscribe_authenticated(
        &self,
        channel: impl Into<String>,
        parameters: BTreeMap<String, String>,
    ) -> Result<(), OkcoinError> {
        self.send(Command::UnsubscribeAuthenticated {
            channel: channel.into(),
            parameters,
        })
    }

    pub fn place_spot_order(
        &self,
        symbol: impl Into<String>,
        order_type: impl Into<String>,
        price: f64,
        amount: f64,
    ) -> Result<(), OkcoinError> {
        self.send(Command::PlaceSpotOrder {
            symbol: symbol.into(),
            order_type: order_type.into(),
            price,
            amount,
        })
    }

    pub fn cancel_spot_order(
        &self,
        symbol: impl Into<String>,
        order_id: i64,
    ) -> Result<(), OkcoinError> {
        self.send(Command::CancelSpotOrder {
            symbol: symbol.into(),
            order_id,
        })
    }

    /// Query spot order status; `order_id` of -1 queries all open orders.
    pub fn spot_order_status(
        &self,
        symbol: impl Into<String>,
        order_id: i64,
    ) -> Result<(), OkcoinError> {
        self.send(Command::SpotOrderStatus {
            symbol: symbol.into(),
            order_id,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn place_futures_order(
        &self,
        symbol: impl Into<String>,
        tenor: ContractTenor,
        price: f64,
        amount: f64,
        order_type: i64,
        match_price: i64,
        leverage: i64,
    ) -> Result<(), OkcoinError> {
        self.send(Command::PlaceFuturesOrder {
            symbol: symbol.into(),
            tenor,
            price,
            amount,
            order_type,
            match_price,
            leverage,
        })
    }

    pub fn cancel_futures_order(
        &self,
        symbol: impl Into<String>,
        tenor: ContractTenor,
        order_id: i64,
    ) -> Result<(), OkcoinError> {
        self.send(Command::CancelFuturesOrder {
            symbol: symbol.into(),
            tenor,
            order_id,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn futures_order_status(
        &self,
        symbol: impl Into<String>,
        tenor: ContractTenor,
        order_id: i64,
        status: i64,
        current_page: i64,
        page_length: i64,
    ) -> Result<(), OkcoinError> {
        self.send(Command::FuturesOrderStatus {
            symbol: symbol.into(),
            tenor,
            order_id,
            status,
            current_page,
            page_length,
        })
    }

    /// Stop the supervisor. The running connection is closed and `run` returns.
    pub fn shutdown(&self) {
        self.enabled.store(false, Ordering::SeqCst);
        // Wake the supervisor if it is parked on the select.
        let _ = self.commands.send(Command::Shutdown);
    }
}

enum LoopEvent {
    Command(Option<Command>),
    Frame(Option<Result<Message, OkcoinError>>),
}

/// Resilient client for the venue's WebSocket API.
pub struct OkcoinWsClient<W: WsSession> {
    config: OkcoinConfig,
    transport: W,
    codec: OkcoinCodec,
    subscriptions: SubscriptionManager<OkcoinSigner>,
    state: ConnectionState,
    enabled: Arc<AtomicBool>,
    commands_tx: mpsc::UnboundedSender<Command>,
    commands_rx: mpsc::UnboundedReceiver<Command>,
    events_tx: mpsc::UnboundedSender<OkcoinWsEvent>,
}

impl<W: WsSession> OkcoinWsClient<W> {
    /// Build a client around an unconnected transport. Returns the client and
    /// the stream of decoded events.
    pub fn new(
        config: OkcoinConfig,
        transport: W,
    ) -> (Self, mpsc::UnboundedReceiver<OkcoinWsEvent>) {
        let signer = if config.has_credentials() {
            Some(OkcoinSigner::new(
                config.api_key().to_string(),
                config.secret_key().to_string(),
            ))
        } else {
            None
        };
        let subscriptions = SubscriptionManager::new(config.region, signer);
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let client = Self {
            config,
            transport,
            codec: OkcoinCodec::new(),
            subscriptions,
            state: ConnectionState::Disconnected,
            enabled: Arc::new(AtomicBool::new(true)),
            commands_tx,
            commands_rx,
            events_tx,
        };
        (client, events_rx)
    }

    /// Control handle usable from other tasks.
    pub fn handle(&self) -> OkcoinHandle {
        OkcoinHandle {
            commands: self.commands_tx.clone(),
            enabled: Arc::clone(&self.enabled),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Drive the connect / subscribe / stream cycle until shutdown.
    ///
    /// Every disconnect other than shutdown triggers a reconnect, and each
    /// successful connection reissues the full subscription set. Returns an
    /// error only when `max_reconnect_attempts` consecutive dials fail.
    pub async fn run(&mut self) -> Result<(), OkcoinError> {
        let mut failed_attempts: u32 = 0;

        while self.enabled.load(Ordering::SeqCst) {
            self.state = ConnectionState::Connecting;
            if let Err(e) = self.transport.connect().await {
                failed_attempts += 1;
                warn!(attempt = failed_attempts, error = %e, "connection attempt failed");
                if let Some(max) = self.config.ws.max_reconnect_attempts {
                    if failed_attempts >= max {
                        self.state = ConnectionState::Disconnected;
                        return Err(e);
                    }
                }
                self.reconnect_delay().await;
                continue;
            }
            failed_attempts = 0;
            info!(region = %self.config.region, "connected");

            self.state = ConnectionState::Subscribing;
            self.subscriptions
                .issue_subscriptions(&mut self.transport, &self.config)
                .await;

            self.state = ConnectionState::Streaming;
            self.stream().await;

            self.state = ConnectionState::Disconnected;
            let _ = self.transport.close().await;

            if self.enabled.load(Ordering::SeqCst) {
                warn!("connection lost, reconnecting");
                self.reconnect_delay().await;
            }
        }

        self.state = ConnectionState::Disconnected;
        if self.transport.is_connected() {
            let _ = self.transport.close().await;
        }
        Ok(())
    }

    async fn reconnect_delay(&self) {
        let delay_ms = self.config.ws.reconnect_delay_ms;
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    /// Pump one connection: interleave inbound frames with queued commands.
    /// Returns when the connection drops or shutdown is requested.
    async fn stream(&mut self) {
        loop {
            if !self.enabled.load(Ordering::SeqCst) {
                return;
            }

            let event = tokio::select! {
                command = self.commands_rx.recv() => LoopEvent::Command(command),
                frame = self.transport.next_frame() => LoopEvent::Frame(frame),
            };

            match event {
                LoopEvent::Command(Some(Command::Shutdown)) | LoopEvent::Command(None) => {
                    return;
                }
                LoopEvent::Command(Some(command)) => {
                    if let Err(e) = self.apply_command(command).await {
                        warn!(error = %e, "command failed");
                    }
                }
                LoopEvent::Frame(Some(Ok(message))) => self.dispatch(message),
                LoopEvent::Frame(Some(Err(e))) => {
                    warn!(error = %e, "read failed");
                    return;
                }
                LoopEvent::Frame(None) => {
                    debug!("connection closed by peer");
                    return;
                }
            }
        }
    }

    async fn apply_command(&mut self, command: Command) -> Result<(), OkcoinError> {
        match command {
            Command::Subscribe { channel } => {
                self.subscriptions
                    .subscribe(&mut self.transport, &channel)
                    .await
            }
            Command::Unsubscribe { channel } => {
                self.subscriptions
                    .unsubscribe(&mut self.transport, &channel)
                    .await
            }
            Command::SubscribeAuthenticated {
                channel,
                parameters,
            } => {
                self.subscriptions
                    .subscribe_authenticated(&mut self.transport, &channel, parameters)
                    .await
            }
            Command::UnsubscribeAuthenticated {
                channel,
                parameters,
            } => {
                self.subscriptions
                    .unsubscribe_authenticated(&mut self.transport, &channel, parameters)
                    .await
            }
            Command::PlaceSpotOrder {
                symbol,
                order_type,
                price,
                amount,
            } => {
                self.subscriptions
                    .place_spot_order(&mut self.transport, &symbol, &order_type, price, amount)
                    .await
            }
            Command::CancelSpotOrder { symbol, order_id } => {
                self.subscriptions
                    .cancel_spot_order(&mut self.transport, &symbol, order_id)
                    .await
            }
            Command::SpotOrderStatus { symbol, order_id } => {
                self.subscriptions
                    .spot_order_status(&mut self.transport, &symbol, order_id)
                    .await
            }
            Command::PlaceFuturesOrder {
                symbol,
                tenor,
                price,
                amount,
                order_type,
                match_price,
                leverage,
            } => {
                self.subscriptions
                    .place_futures_order(
                        &mut self.transport,
                        &symbol,
                        tenor,
                        price,
                        amount,
                        order_type,
                        match_price,
                        leverage,
                    )
                    .await
            }
            Command::CancelFuturesOrder {
                symbol,
                tenor,
                order_id,
            } => {
                self.subscriptions
                    .cancel_futures_order(&mut self.transport, &symbol, tenor, order_id)
                    .await
            }
            Command::FuturesOrderStatus {
                symbol,
                tenor,
                order_id,
                status,
                current_page,
                page_length,
            } => {
                self.subscriptions
                    .futures_order_status(
                        &mut self.transport,
                        &symbol,
                        tenor,
                        order_id,
                        status,
                        current_page,
                        page_length,
                    )
                    .await
            }
            Command::Shutdown => Ok(()),
        }
    }

    fn dispatch(&mut self, message: Message) {
        match self.codec.decode_message(message) {
            Ok(Some(events)) => {
                for event in events {
                    if self.events_tx.send(event).is_err() {
                        debug!("event receiver dropped");
                        return;
                    }
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "frame decode failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::okcoin::channels;

    struct NoopTransport;

    #[async_trait::async_trait]
    impl WsSession for NoopTransport {
        async fn connect(&mut self) -> Result<(), OkcoinError> {
            Ok(())
        }

        async fn send(&mut self, _msg: Message) -> Result<(), OkcoinError> {
            Ok(())
        }

        async fn next_frame(&mut self) -> Option<Result<Message, OkcoinError>> {
            None
        }

        async fn close(&mut self) -> Result<(), OkcoinError> {
            Ok(())
        }

        fn is_connected(&self) -> bool {
            false
        }
    }

    #[test]
    fn handle_reports_stopped_client() {
        let config = OkcoinConfig::read_only();
        let (client, _events) = OkcoinWsClient::new(config, NoopTransport);
        let handle = client.handle();
        drop(client);

        let result = handle.subscribe(channels::spot_ticker("btc_usd"));
        assert!(matches!(result, Err(OkcoinError::ClientStopped)));
    }

    #[test]
    fn new_client_starts_disconnected() {
        let config = OkcoinConfig::read_only();
        let (client, _events) = OkcoinWsClient::new(config, NoopTransport);
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }
}
