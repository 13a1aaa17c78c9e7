//! Typed payload schemas, one per channel family.
//!
//! Numeric venue fields are carried as `f64`/`i64` internally; on the wire
//! they arrive as JSON numbers or numeric strings interchangeably, so every
//! numeric field goes through the flexible deserializers in [`crate::okcoin::de`].

use crate::okcoin::de;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outbound plain subscribe/unsubscribe control frame.
#[derive(Debug, Serialize)]
pub struct ChannelEvent<'a> {
    pub event: &'a str,
    pub channel: &'a str,
}

/// Outbound authenticated control frame. `parameters` is a sorted map so the
/// serialized order matches the order the signature was computed over.
#[derive(Debug, Serialize)]
pub struct AuthenticatedChannelEvent<'a> {
    pub event: &'a str,
    pub channel: &'a str,
    pub parameters: &'a BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FutureIndex {
    #[serde(rename = "futureIndex", deserialize_with = "de::f64_flexible")]
    pub future_index: f64,
    #[serde(deserialize_with = "de::i64_flexible")]
    pub timestamp: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotTicker {
    #[serde(deserialize_with = "de::f64_flexible")]
    pub timestamp: f64,
    pub vol: String,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub buy: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub high: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub last: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub low: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub sell: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FuturesTicker {
    #[serde(deserialize_with = "de::f64_flexible")]
    pub buy: f64,
    #[serde(rename = "contractId")]
    pub contract_id: String,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub high: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub hold_amount: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub last: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub low: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub sell: f64,
    #[serde(rename = "unitAmount", deserialize_with = "de::f64_flexible")]
    pub unit_amount: f64,
    #[serde(rename = "vol", deserialize_with = "de::f64_flexible")]
    pub volume: f64,
}

/// Order book snapshot: ask/bid levels as ordered `[price, size]` pairs.
#[derive(Debug, Clone, Deserialize)]
pub struct Orderbook {
    pub asks: Vec<[f64; 2]>,
    pub bids: Vec<[f64; 2]>,
    #[serde(deserialize_with = "de::i64_flexible")]
    pub timestamp: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetSummary {
    #[serde(deserialize_with = "de::f64_flexible")]
    pub net: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub total: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyBalances {
    #[serde(deserialize_with = "de::f64_flexible")]
    pub btc: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub ltc: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub usd: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub cny: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotFunds {
    pub asset: AssetSummary,
    pub free: CurrencyBalances,
    #[serde(rename = "freezed")]
    pub frozen: CurrencyBalances,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotAccountInfo {
    pub funds: SpotFunds,
}

/// Spot account/balance snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotAccount {
    pub info: SpotAccountInfo,
    #[serde(deserialize_with = "de::bool_flexible")]
    pub result: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FuturesContractPosition {
    #[serde(deserialize_with = "de::f64_flexible")]
    pub available: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub balance: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub bond: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub contract_id: f64,
    pub contract_type: String,
    #[serde(rename = "freeze", deserialize_with = "de::f64_flexible")]
    pub frozen: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub profit: f64,
    #[serde(rename = "unprofit", deserialize_with = "de::f64_flexible")]
    pub loss: f64,
}

/// Per-asset futures balance: collateral plus open contracts.
#[derive(Debug, Clone, Deserialize)]
pub struct FuturesAssetAccount {
    #[serde(deserialize_with = "de::f64_flexible")]
    pub balance: f64,
    pub contracts: Vec<FuturesContractPosition>,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub rights: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FuturesAccountInfo {
    pub btc: FuturesAssetAccount,
    pub ltc: FuturesAssetAccount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FuturesAccount {
    pub info: FuturesAccountInfo,
    #[serde(deserialize_with = "de::bool_flexible")]
    pub result: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotOrder {
    #[serde(deserialize_with = "de::f64_flexible")]
    pub amount: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub avg_price: f64,
    #[serde(rename = "create_date", deserialize_with = "de::f64_flexible")]
    pub date_created: f64,
    #[serde(rename = "deal_amount", deserialize_with = "de::f64_flexible")]
    pub filled_amount: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub order_id: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub orders_id: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub price: f64,
    #[serde(deserialize_with = "de::i64_flexible")]
    pub status: i64,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FuturesOrder {
    #[serde(deserialize_with = "de::f64_flexible")]
    pub amount: f64,
    pub contract_name: String,
    #[serde(rename = "createdDate", deserialize_with = "de::f64_flexible")]
    pub date_created: f64,
    #[serde(rename = "deal_amount", deserialize_with = "de::f64_flexible")]
    pub filled_amount: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub fee: f64,
    #[serde(rename = "lever_rate", deserialize_with = "de::i64_flexible")]
    pub leverage: i64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub order_id: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub price: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub avg_price: f64,
    #[serde(deserialize_with = "de::i64_flexible")]
    pub status: i64,
    pub symbol: String,
    #[serde(rename = "type", deserialize_with = "de::i64_flexible")]
    pub trade_type: i64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub unit_amount: f64,
}

/// Spot realized trade. The venue names the trade price field `buy` on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotFill {
    #[serde(rename = "averagePrice", deserialize_with = "de::f64_flexible")]
    pub average_price: f64,
    #[serde(
        rename = "completedTradeAmount",
        deserialize_with = "de::f64_flexible"
    )]
    pub completed_trade_amount: f64,
    #[serde(rename = "createdDate", deserialize_with = "de::f64_flexible")]
    pub date_created: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub id: f64,
    #[serde(rename = "orderId", deserialize_with = "de::f64_flexible")]
    pub order_id: f64,
    #[serde(rename = "sigTradeAmount", deserialize_with = "de::f64_flexible")]
    pub sig_trade_amount: f64,
    #[serde(rename = "sigTradePrice", deserialize_with = "de::f64_flexible")]
    pub sig_trade_price: f64,
    #[serde(deserialize_with = "de::i64_flexible")]
    pub status: i64,
    pub symbol: String,
    #[serde(rename = "tradeAmount", deserialize_with = "de::f64_flexible")]
    pub trade_amount: f64,
    #[serde(rename = "buy", deserialize_with = "de::f64_flexible")]
    pub trade_price: f64,
    #[serde(rename = "tradeType")]
    pub trade_type: String,
    #[serde(rename = "tradeUnitPrice", deserialize_with = "de::f64_flexible")]
    pub trade_unit_price: f64,
    #[serde(rename = "unTrade", deserialize_with = "de::f64_flexible")]
    pub untraded: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FuturesFill {
    #[serde(deserialize_with = "de::f64_flexible")]
    pub amount: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub contract_id: f64,
    pub contract_name: String,
    pub contract_type: String,
    #[serde(rename = "deal_amount", deserialize_with = "de::f64_flexible")]
    pub filled_amount: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub fee: f64,
    #[serde(rename = "orderid", deserialize_with = "de::f64_flexible")]
    pub order_id: f64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub price: f64,
    #[serde(rename = "price_avg", deserialize_with = "de::f64_flexible")]
    pub avg_price: f64,
    #[serde(deserialize_with = "de::i64_flexible")]
    pub status: i64,
    #[serde(rename = "type", deserialize_with = "de::i64_flexible")]
    pub trade_type: i64,
    #[serde(deserialize_with = "de::f64_flexible")]
    pub unit_amount: f64,
    #[serde(rename = "lever_rate", deserialize_with = "de::i64_flexible")]
    pub leverage: i64,
}

/// Acknowledgement for order placement and cancellation commands. Both fields
/// are string-encoded on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderAck {
    #[serde(deserialize_with = "de::i64_flexible")]
    pub order_id: i64,
    #[serde(deserialize_with = "de::bool_flexible")]
    pub result: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotOrderInfo {
    #[serde(deserialize_with = "de::bool_flexible")]
    pub result: bool,
    pub orders: Vec<SpotOrder>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FuturesOrderInfo {
    #[serde(deserialize_with = "de::bool_flexible")]
    pub result: bool,
    pub orders: Vec<FuturesOrder>,
}
