//! Supervisor tests against a scripted in-memory transport.

use async_trait::async_trait;
use okcoin_ws::kernel::{WsConfig, WsSession};
use okcoin_ws::okcoin::channels;
use okcoin_ws::okcoin::{OkcoinSigner, SubscriptionManager};
use okcoin_ws::{ContractTenor, KlineInterval, OkcoinConfig, OkcoinError, OkcoinWsClient, Region};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_tungstenite::tungstenite::protocol::Message;

/// Transport double. Each connect consumes one script of inbound frames and
/// opens a fresh per-session log of outbound text frames; once a script is
/// drained the read side parks forever, like an idle socket.
struct MockTransport {
    fail_all_connects: bool,
    scripts: VecDeque<Vec<Result<Message, OkcoinError>>>,
    current: VecDeque<Result<Message, OkcoinError>>,
    sent: Arc<Mutex<Vec<Vec<String>>>>,
    connect_attempts: Arc<AtomicU32>,
    connected: bool,
}

impl MockTransport {
    fn new(scripts: Vec<Vec<Result<Message, OkcoinError>>>) -> Self {
        Self {
            fail_all_connects: false,
            scripts: scripts.into(),
            current: VecDeque::new(),
            sent: Arc::new(Mutex::new(Vec::new())),
            connect_attempts: Arc::new(AtomicU32::new(0)),
            connected: false,
        }
    }

    fn refusing_connections() -> Self {
        let mut transport = Self::new(Vec::new());
        transport.fail_all_connects = true;
        transport
    }

    fn sent(&self) -> Arc<Mutex<Vec<Vec<String>>>> {
        Arc::clone(&self.sent)
    }

    fn connect_attempts(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.connect_attempts)
    }
}

#[async_trait]
impl WsSession for MockTransport {
    async fn connect(&mut self) -> Result<(), OkcoinError> {
        self.connect_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_all_connects {
            return Err(OkcoinError::Network("connection refused".to_string()));
        }
        self.current = self.scripts.pop_front().unwrap_or_default().into();
        self.sent.lock().unwrap().push(Vec::new());
        self.connected = true;
        Ok(())
    }

    async fn send(&mut self, msg: Message) -> Result<(), OkcoinError> {
        if let Message::Text(text) = msg {
            let mut sent = self.sent.lock().unwrap();
            sent.last_mut()
                .ok_or_else(|| OkcoinError::Network("not connected".to_string()))?
                .push(text);
        }
        Ok(())
    }

    async fn next_frame(&mut self) -> Option<Result<Message, OkcoinError>> {
        match self.current.pop_front() {
            Some(frame) => Some(frame),
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) -> Result<(), OkcoinError> {
        self.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

fn channel_of(frame: &str) -> String {
    let value: Value = serde_json::from_str(frame).unwrap();
    value["channel"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn public_burst_covers_every_market_data_channel() {
    let config = OkcoinConfig::read_only()
        .region(Region::International)
        .enabled_pairs(vec!["btc_usd".to_string()]);
    let manager: SubscriptionManager<OkcoinSigner> =
        SubscriptionManager::new(Region::International, None);

    let mut transport = MockTransport::new(vec![Vec::new()]);
    let sent = transport.sent();
    transport.connect().await.unwrap();
    manager.issue_subscriptions(&mut transport, &config).await;

    let sessions = sent.lock().unwrap();
    let frames = &sessions[0];
    // ticker + depth + trades + 13 klines + future index
    assert_eq!(frames.len(), 17);

    let subscribed: Vec<String> = frames.iter().map(|f| channel_of(f)).collect();
    assert!(subscribed.contains(&"ok_btc_usd_ticker".to_string()));
    assert!(subscribed.contains(&"ok_btc_usd_depth60".to_string()));
    assert!(subscribed.contains(&"ok_btc_usd_trades_v1".to_string()));
    assert!(subscribed.contains(&"ok_btc_usd_future_index".to_string()));
    for interval in KlineInterval::ALL {
        assert!(subscribed.contains(&channels::spot_kline("btc_usd", interval)));
    }

    // Without credentials nothing may be signed.
    for frame in frames {
        let value: Value = serde_json::from_str(frame).unwrap();
        assert_eq!(value["event"], "addChannel");
        assert!(value.get("parameters").is_none(), "unexpected: {}", frame);
    }
}

#[tokio::test]
async fn china_region_skips_futures_channels() {
    let config = OkcoinConfig::read_only()
        .region(Region::China)
        .enabled_pairs(vec!["btc_cny".to_string()])
        .futures_tenors(vec![ContractTenor::ThisWeek]);
    let manager: SubscriptionManager<OkcoinSigner> =
        SubscriptionManager::new(Region::China, None);

    let mut transport = MockTransport::new(vec![Vec::new()]);
    let sent = transport.sent();
    transport.connect().await.unwrap();
    manager.issue_subscriptions(&mut transport, &config).await;

    let sessions = sent.lock().unwrap();
    for frame in &sessions[0] {
        assert!(!channel_of(frame).contains("future"), "unexpected: {}", frame);
    }
    // ticker + depth + trades + 13 klines, nothing else
    assert_eq!(sessions[0].len(), 16);
}

#[tokio::test]
async fn reconnect_reissues_an_identical_subscription_burst() {
    let config = OkcoinConfig::new("partner-id".to_string(), "very-secret".to_string())
        .region(Region::International)
        .enabled_pairs(vec!["btc_usd".to_string()])
        .futures_tenors(vec![ContractTenor::ThisWeek])
        .ws_config(WsConfig {
            reconnect_delay_ms: 0,
            ..WsConfig::default()
        });

    // First session tears down with a read error; second stays idle.
    let transport = MockTransport::new(vec![
        vec![Err(OkcoinError::Network("connection reset".to_string()))],
        Vec::new(),
    ]);
    let sent = transport.sent();
    let attempts = transport.connect_attempts();

    let (mut client, _events) = OkcoinWsClient::new(config, transport);
    let handle = client.handle();
    let supervisor = tokio::spawn(async move { client.run().await });

    // Wait until the second session's burst matches the first in size.
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            {
                let sessions = sent.lock().unwrap();
                if sessions.len() == 2
                    && !sessions[0].is_empty()
                    && sessions[1].len() == sessions[0].len()
                {
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("client never completed the second subscription burst");

    handle.shutdown();
    supervisor.await.unwrap().unwrap();

    assert_eq!(attempts.load(Ordering::SeqCst), 2);

    let sessions = sent.lock().unwrap();
    // MD5 over sorted parameters is deterministic, so the reissued burst is
    // byte-for-byte the first one.
    assert_eq!(sessions[0], sessions[1]);

    // The authenticated channels are part of the burst and carry credentials.
    let realtrades = sessions[0]
        .iter()
        .find(|f| channel_of(f) == channels::FUTURES_REALTRADES)
        .expect("futures realtrades subscription missing");
    let value: Value = serde_json::from_str(realtrades).unwrap();
    assert_eq!(value["parameters"]["api_key"], "partner-id");
    let sign = value["parameters"]["sign"].as_str().unwrap();
    assert_eq!(sign.len(), 32);
    assert!(sign
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
}

#[tokio::test]
async fn bounded_reconnects_give_up_with_an_error() {
    let config = OkcoinConfig::read_only()
        .enabled_pairs(vec!["btc_usd".to_string()])
        .ws_config(WsConfig {
            reconnect_delay_ms: 0,
            max_reconnect_attempts: Some(3),
            ..WsConfig::default()
        });

    let transport = MockTransport::refusing_connections();
    let attempts = transport.connect_attempts();

    let (mut client, _events) = OkcoinWsClient::new(config, transport);
    let result = client.run().await;

    assert!(matches!(result, Err(OkcoinError::Network(_))));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn queued_commands_are_written_to_the_live_connection() {
    let config = OkcoinConfig::new("partner-id".to_string(), "very-secret".to_string())
        .region(Region::International)
        .enabled_pairs(Vec::new())
        .authenticated(false);

    let transport = MockTransport::new(vec![Vec::new()]);
    let sent = transport.sent();

    let (mut client, _events) = OkcoinWsClient::new(config, transport);
    let handle = client.handle();
    let supervisor = tokio::spawn(async move { client.run().await });

    handle.place_spot_order("btc_usd", "buy", 609.5, 0.25).unwrap();
    handle.cancel_spot_order("btc_usd", 125433029).unwrap();

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            {
                let sessions = sent.lock().unwrap();
                if sessions.first().map_or(false, |s| s.len() == 2) {
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("commands never reached the transport");

    handle.shutdown();
    supervisor.await.unwrap().unwrap();

    let sessions = sent.lock().unwrap();
    let place: Value = serde_json::from_str(&sessions[0][0]).unwrap();
    assert_eq!(place["channel"], "ok_spotusd_trade");
    assert_eq!(place["parameters"]["symbol"], "btc_usd");
    assert_eq!(place["parameters"]["type"], "buy");
    assert_eq!(place["parameters"]["api_key"], "partner-id");
    assert!(place["parameters"]["sign"].is_string());

    let cancel: Value = serde_json::from_str(&sessions[0][1]).unwrap();
    assert_eq!(cancel["channel"], "ok_spotusd_cancel_order");
    assert_eq!(cancel["parameters"]["order_id"], "125433029");
}
