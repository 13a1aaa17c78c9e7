//! Inbound frame dispatcher.
//!
//! Every text frame is a JSON array of independent channel envelopes
//! `{channel, data, success?, errorcode?}`. Envelopes are processed in array
//! order; a bad envelope is logged and skipped without affecting its siblings
//! or the read loop.

use crate::core::errors::OkcoinError;
use crate::kernel::codec::WsCodec;
use crate::okcoin::channels::{classify, ChannelKind};
use crate::okcoin::errors;
use crate::okcoin::types::{
    AuthenticatedChannelEvent, ChannelEvent, FutureIndex, FuturesAccount, FuturesFill,
    FuturesOrderInfo, FuturesTicker, OrderAck, Orderbook, SpotAccount, SpotFill, SpotOrderInfo,
    SpotTicker,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

pub const EVENT_ADD_CHANNEL: &str = "addChannel";
pub const EVENT_REMOVE_CHANNEL: &str = "removeChannel";

/// One decoded envelope. Every variant carries the originating channel name:
/// the protocol returns command results asynchronously on command channels,
/// so callers correlate by channel name and the order id in the payload.
#[derive(Debug, Clone)]
pub enum OkcoinWsEvent {
    SpotTicker {
        channel: String,
        ticker: SpotTicker,
    },
    FuturesTicker {
        channel: String,
        ticker: FuturesTicker,
    },
    Depth {
        channel: String,
        book: Orderbook,
    },
    /// Raw trade ticks; the venue ships these as string tuples and the exact
    /// field layout is not pinned down, so they are passed through unshaped.
    TradeTape {
        channel: String,
        trades: Vec<Vec<String>>,
    },
    /// K-line rows, likewise passed through as untyped OHLC arrays.
    Kline {
        channel: String,
        candles: Vec<Value>,
    },
    SpotFill {
        channel: String,
        fill: SpotFill,
    },
    FuturesFill {
        channel: String,
        fill: FuturesFill,
    },
    OrderAck {
        channel: String,
        ack: OrderAck,
    },
    SpotAccount {
        channel: String,
        account: SpotAccount,
    },
    FuturesAccount {
        channel: String,
        account: FuturesAccount,
    },
    SpotOrders {
        channel: String,
        listing: SpotOrderInfo,
    },
    FuturesOrders {
        channel: String,
        listing: FuturesOrderInfo,
    },
    FutureIndex {
        channel: String,
        index: FutureIndex,
    },
}

impl OkcoinWsEvent {
    /// Channel the event arrived on.
    pub fn channel(&self) -> &str {
        match self {
            Self::SpotTicker { channel, .. }
            | Self::FuturesTicker { channel, .. }
            | Self::Depth { channel, .. }
            | Self::TradeTape { channel, .. }
            | Self::Kline { channel, .. }
            | Self::SpotFill { channel, .. }
            | Self::FuturesFill { channel, .. }
            | Self::OrderAck { channel, .. }
            | Self::SpotAccount { channel, .. }
            | Self::FuturesAccount { channel, .. }
            | Self::SpotOrders { channel, .. }
            | Self::FuturesOrders { channel, .. }
            | Self::FutureIndex { channel, .. } => channel,
        }
    }
}

/// OKCoin WebSocket codec: control-frame encoding plus the envelope dispatcher.
#[derive(Debug, Default, Clone, Copy)]
pub struct OkcoinCodec;

impl OkcoinCodec {
    pub fn new() -> Self {
        Self
    }

    /// Encode an authenticated control frame. `parameters` must already carry
    /// `api_key` and `sign`.
    pub fn encode_authenticated(
        &self,
        event: &str,
        channel: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<Message, OkcoinError> {
        let frame = serde_json::to_string(&AuthenticatedChannelEvent {
            event,
            channel,
            parameters,
        })?;
        Ok(Message::Text(frame))
    }

    /// Decode one text frame into the events it carries. Envelope-level
    /// failures are logged and skipped; only a frame that is not a JSON array
    /// at all is an error.
    pub fn decode_frame(&self, text: &str) -> Result<Vec<OkcoinWsEvent>, OkcoinError> {
        let envelopes: Vec<Value> = serde_json::from_str(text)?;

        let mut events = Vec::with_capacity(envelopes.len());
        for envelope in &envelopes {
            if let Some(event) = self.decode_envelope(envelope) {
                events.push(event);
            }
        }
        Ok(events)
    }

    fn decode_envelope(&self, envelope: &Value) -> Option<OkcoinWsEvent> {
        let Some(channel) = envelope.get("channel").and_then(Value::as_str) else {
            warn!("envelope carries a missing or non-string channel field, skipping");
            return None;
        };

        // A payload-level protocol error: anything but the literal "true".
        if let Some(success) = envelope.get("success") {
            if success.as_str() != Some("true") {
                match envelope.get("errorcode").and_then(Value::as_str) {
                    Some(code) => warn!(
                        channel,
                        code,
                        "channel error: {}",
                        errors::describe(code).unwrap_or(code)
                    ),
                    None => warn!(
                        channel,
                        errorcode = ?envelope.get("errorcode"),
                        "channel error with missing or non-string error code"
                    ),
                }
                return None;
            }
        }

        let data = envelope.get("data").cloned().unwrap_or(Value::Null);
        let channel_name = channel.to_string();

        match classify(channel) {
            ChannelKind::SpotTicker => decode_payload(channel, data).map(|ticker| {
                OkcoinWsEvent::SpotTicker {
                    channel: channel_name,
                    ticker,
                }
            }),
            ChannelKind::FuturesTicker => decode_payload(channel, data).map(|ticker| {
                OkcoinWsEvent::FuturesTicker {
                    channel: channel_name,
                    ticker,
                }
            }),
            ChannelKind::Depth => decode_payload(channel, data).map(|book| OkcoinWsEvent::Depth {
                channel: channel_name,
                book,
            }),
            ChannelKind::TradeTape => decode_payload(channel, data).map(|trades| {
                OkcoinWsEvent::TradeTape {
                    channel: channel_name,
                    trades,
                }
            }),
            ChannelKind::Kline => decode_payload(channel, data).map(|candles| {
                OkcoinWsEvent::Kline {
                    channel: channel_name,
                    candles,
                }
            }),
            ChannelKind::SpotRealTrades => {
                // Absence of data is not a failure on the realized-trade feeds.
                if data.is_null() {
                    return None;
                }
                decode_payload(channel, data).map(|fill| OkcoinWsEvent::SpotFill {
                    channel: channel_name,
                    fill,
                })
            }
            ChannelKind::FuturesRealTrades => {
                if data.is_null() {
                    return None;
                }
                decode_payload(channel, data).map(|fill| OkcoinWsEvent::FuturesFill {
                    channel: channel_name,
                    fill,
                })
            }
            ChannelKind::OrderAck => decode_payload(channel, data).map(|ack| {
                OkcoinWsEvent::OrderAck {
                    channel: channel_name,
                    ack,
                }
            }),
            ChannelKind::SpotUserInfo => decode_payload(channel, data).map(|account| {
                OkcoinWsEvent::SpotAccount {
                    channel: channel_name,
                    account,
                }
            }),
            ChannelKind::FuturesUserInfo => decode_payload(channel, data).map(|account| {
                OkcoinWsEvent::FuturesAccount {
                    channel: channel_name,
                    account,
                }
            }),
            ChannelKind::SpotOrderInfo => decode_payload(channel, data).map(|listing| {
                OkcoinWsEvent::SpotOrders {
                    channel: channel_name,
                    listing,
                }
            }),
            ChannelKind::FuturesOrderInfo => decode_payload(channel, data).map(|listing| {
                OkcoinWsEvent::FuturesOrders {
                    channel: channel_name,
                    listing,
                }
            }),
            ChannelKind::FutureIndex => decode_payload(channel, data).map(|index| {
                OkcoinWsEvent::FutureIndex {
                    channel: channel_name,
                    index,
                }
            }),
            ChannelKind::Unhandled => {
                // Forward-compatible with venue channels not yet modeled.
                debug!(channel, "unhandled channel");
                None
            }
        }
    }
}

fn decode_payload<T: DeserializeOwned>(channel: &str, data: Value) -> Option<T> {
    match serde_json::from_value(data) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!(channel, error = %e, "failed to decode channel payload");
            None
        }
    }
}

impl WsCodec for OkcoinCodec {
    type Message = Vec<OkcoinWsEvent>;

    fn encode_subscribe(&self, channel: &str) -> Result<Message, OkcoinError> {
        let frame = serde_json::to_string(&ChannelEvent {
            event: EVENT_ADD_CHANNEL,
            channel,
        })?;
        Ok(Message::Text(frame))
    }

    fn encode_unsubscribe(&self, channel: &str) -> Result<Message, OkcoinError> {
        let frame = serde_json::to_string(&ChannelEvent {
            event: EVENT_REMOVE_CHANNEL,
            channel,
        })?;
        Ok(Message::Text(frame))
    }

    fn decode_message(&self, message: Message) -> Result<Option<Self::Message>, OkcoinError> {
        let text = match message {
            Message::Text(text) => text,
            Message::Binary(data) => String::from_utf8(data)
                .map_err(|e| OkcoinError::Network(format!("Invalid UTF-8 in binary message: {}", e)))?,
            _ => return Ok(None), // Control frames are handled at the transport level
        };

        self.decode_frame(&text).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> OkcoinCodec {
        OkcoinCodec::new()
    }

    #[test]
    fn encode_subscribe_frames() {
        let msg = codec().encode_subscribe("ok_btc_usd_ticker").unwrap();
        let Message::Text(text) = msg else {
            panic!("expected text frame");
        };
        assert_eq!(
            text,
            r#"{"event":"addChannel","channel":"ok_btc_usd_ticker"}"#
        );

        let msg = codec().encode_unsubscribe("ok_btc_usd_ticker").unwrap();
        let Message::Text(text) = msg else {
            panic!("expected text frame");
        };
        assert_eq!(
            text,
            r#"{"event":"removeChannel","channel":"ok_btc_usd_ticker"}"#
        );
    }

    #[test]
    fn ticker_accepts_both_numeric_representations() {
        let as_strings = r#"[{"channel":"ok_btc_usd_ticker","data":
            {"timestamp":"1473843321111","vol":"1,508.21","buy":"609.81",
             "high":"613.15","last":"609.92","low":"604.31","sell":"609.9"}}]"#;
        let as_numbers = r#"[{"channel":"ok_btc_usd_ticker","data":
            {"timestamp":1473843321111,"vol":"1,508.21","buy":609.81,
             "high":613.15,"last":609.92,"low":604.31,"sell":609.9}}]"#;

        let from_strings = codec().decode_frame(as_strings).unwrap();
        let from_numbers = codec().decode_frame(as_numbers).unwrap();
        assert_eq!(from_strings.len(), 1);
        assert_eq!(from_numbers.len(), 1);

        let (
            OkcoinWsEvent::SpotTicker { ticker: a, .. },
            OkcoinWsEvent::SpotTicker { ticker: b, .. },
        ) = (&from_strings[0], &from_numbers[0])
        else {
            panic!("expected spot ticker events");
        };
        assert_eq!(a.buy.to_bits(), b.buy.to_bits());
        assert_eq!(a.last.to_bits(), b.last.to_bits());
    }

    #[test]
    fn futures_ticker_routes_to_futures_schema() {
        let raw = r#"[{"channel":"ok_btc_usd_future_ticker_this_week","data":
            {"buy":609.5,"contractId":"20160923013","high":613.2,"hold_amount":1349526.0,
             "last":"609.6","low":604.2,"sell":609.8,"unitAmount":100.0,"vol":"1238094.0"}}]"#;
        let events = codec().decode_frame(raw).unwrap();
        assert_eq!(events.len(), 1);
        let OkcoinWsEvent::FuturesTicker { ticker, .. } = &events[0] else {
            panic!("expected futures ticker event");
        };
        assert_eq!(ticker.contract_id, "20160923013");
        assert!((ticker.volume - 1_238_094.0).abs() < f64::EPSILON);
    }

    #[test]
    fn null_realtrades_produce_no_events_and_no_errors() {
        let raw = r#"[{"channel":"ok_spotusd_realtrades","data":null}]"#;
        let events = codec().decode_frame(raw).unwrap();
        assert!(events.is_empty());

        let raw = r#"[{"channel":"ok_usd_future_realtrades","data":null}]"#;
        let events = codec().decode_frame(raw).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn unknown_error_code_is_skipped_without_failing() {
        let raw = r#"[{"channel":"ok_spotusd_trade","success":"false","errorcode":"99999"}]"#;
        let events = codec().decode_frame(raw).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn known_error_code_is_skipped() {
        let raw = r#"[{"channel":"ok_spotusd_trade","success":"false","errorcode":"10002"}]"#;
        let events = codec().decode_frame(raw).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn malformed_channel_does_not_abort_siblings() {
        let raw = r#"[
            {"channel":42,"data":{}},
            {"channel":"ok_btc_usd_future_index","data":{"futureIndex":606.65,"timestamp":"1473843321111"}}
        ]"#;
        let events = codec().decode_frame(raw).unwrap();
        assert_eq!(events.len(), 1);
        let OkcoinWsEvent::FutureIndex { index, .. } = &events[0] else {
            panic!("expected future index event");
        };
        assert!((index.future_index - 606.65).abs() < f64::EPSILON);
        assert_eq!(index.timestamp, 1_473_843_321_111);
    }

    #[test]
    fn decode_failure_skips_only_the_bad_envelope() {
        let raw = r#"[
            {"channel":"ok_btc_usd_depth60","data":{"asks":"not-a-book"}},
            {"channel":"ok_spotusd_trade","data":{"order_id":"1","result":"true"}}
        ]"#;
        let events = codec().decode_frame(raw).unwrap();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], OkcoinWsEvent::OrderAck { .. }));
    }

    #[test]
    fn trade_tape_and_klines_pass_through_unshaped() {
        let raw = r#"[
            {"channel":"ok_btc_usd_trades_v1","data":[["1001","609.9","0.3","15:25:02","bid"]]},
            {"channel":"ok_btc_usd_kline_1min","data":[[1473843300000,609.9,610.1,609.5,609.8,12.5]]}
        ]"#;
        let events = codec().decode_frame(raw).unwrap();
        assert_eq!(events.len(), 2);
        let OkcoinWsEvent::TradeTape { trades, .. } = &events[0] else {
            panic!("expected trade tape event");
        };
        assert_eq!(trades[0][4], "bid");
        let OkcoinWsEvent::Kline { candles, .. } = &events[1] else {
            panic!("expected kline event");
        };
        assert_eq!(candles.len(), 1);
    }

    #[test]
    fn order_listing_channels_route_to_listing_schemas() {
        let raw = r#"[{"channel":"ok_spotusd_order_info","data":{"result":true,"orders":[
            {"amount":1.0,"avg_price":0.0,"create_date":1473843321000,"deal_amount":0.0,
             "order_id":125433029,"orders_id":125433029,"price":605.0,"status":0,
             "symbol":"btc_usd","type":"sell"}]}}]"#;
        let events = codec().decode_frame(raw).unwrap();
        assert_eq!(events.len(), 1);
        let OkcoinWsEvent::SpotOrders { listing, .. } = &events[0] else {
            panic!("expected spot order listing");
        };
        assert_eq!(listing.orders.len(), 1);
        assert_eq!(listing.orders[0].symbol, "btc_usd");
    }

    #[test]
    fn non_array_frame_is_an_error() {
        assert!(codec().decode_frame(r#"{"channel":"x"}"#).is_err());
        assert!(codec().decode_frame("not json").is_err());
    }
}
