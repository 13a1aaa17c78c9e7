//! Channel names and classification.
//!
//! A channel name is an opaque string composed of a currency/contract segment
//! and a feed-type segment. There is no canonical parser; inbound dispatch is
//! by substring containment with first-match-wins precedence, kept in one
//! table in [`classify`].

use crate::core::types::{ContractTenor, KlineInterval, Region};

pub const FUTURES_TRADE: &str = "ok_futuresusd_trade";
pub const FUTURES_CANCEL_ORDER: &str = "ok_futuresusd_cancel_order";
pub const FUTURES_REALTRADES: &str = "ok_usd_future_realtrades";
pub const FUTURES_USERINFO: &str = "ok_futureusd_userinfo";
pub const FUTURES_ORDER_INFO: &str = "ok_futureusd_order_info";

/// Spot command channels live in two parallel namespaces, one per pricing
/// region. Every spot operation must pick the namespace of the endpoint the
/// transport is dialed to.
pub fn spot_trade(region: Region) -> &'static str {
    match region {
        Region::International => "ok_spotusd_trade",
        Region::China => "ok_spotcny_trade",
    }
}

pub fn spot_cancel_order(region: Region) -> &'static str {
    match region {
        Region::International => "ok_spotusd_cancel_order",
        Region::China => "ok_spotcny_cancel_order",
    }
}

pub fn spot_userinfo(region: Region) -> &'static str {
    match region {
        Region::International => "ok_spotusd_userinfo",
        Region::China => "ok_spotcny_userinfo",
    }
}

pub fn spot_order_info(region: Region) -> &'static str {
    match region {
        Region::International => "ok_spotusd_order_info",
        Region::China => "ok_spotcny_order_info",
    }
}

pub fn spot_realtrades(region: Region) -> &'static str {
    match region {
        Region::International => "ok_usd_realtrades",
        Region::China => "ok_cny_realtrades",
    }
}

pub fn spot_ticker(pair: &str) -> String {
    format!("ok_{}_ticker", pair)
}

pub fn spot_depth(pair: &str) -> String {
    format!("ok_{}_depth60", pair)
}

pub fn spot_trades(pair: &str) -> String {
    format!("ok_{}_trades_v1", pair)
}

pub fn spot_kline(pair: &str, interval: KlineInterval) -> String {
    format!("ok_{}_kline_{}", pair, interval.as_channel_suffix())
}

pub fn future_index(pair: &str) -> String {
    format!("ok_{}_future_index", pair)
}

pub fn future_ticker(pair: &str, tenor: ContractTenor) -> String {
    format!("ok_{}_future_ticker_{}", pair, tenor.as_str())
}

pub fn future_depth(pair: &str, tenor: ContractTenor) -> String {
    format!("ok_{}_future_depth_{}_60", pair, tenor.as_str())
}

pub fn future_trades(pair: &str, tenor: ContractTenor) -> String {
    format!("ok_{}_future_trade_v1_{}", pair, tenor.as_str())
}

pub fn future_kline(pair: &str, tenor: ContractTenor, interval: KlineInterval) -> String {
    format!(
        "ok_future_{}_kline_{}_{}",
        pair,
        tenor.as_str(),
        interval.as_channel_suffix()
    )
}

/// Channel families the dispatcher can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    SpotTicker,
    FuturesTicker,
    Depth,
    TradeTape,
    Kline,
    SpotRealTrades,
    FuturesRealTrades,
    OrderAck,
    SpotUserInfo,
    FuturesUserInfo,
    SpotOrderInfo,
    FuturesOrderInfo,
    FutureIndex,
    Unhandled,
}

/// Classify an inbound channel name.
///
/// The patterns overlap, so the order of the checks is part of the protocol:
/// the first matching predicate wins. Realized-trade channels must be checked
/// before the order-acknowledgement channels because "realtrades" itself
/// contains "trade".
pub fn classify(channel: &str) -> ChannelKind {
    if channel.contains("ticker") && !channel.contains("future") {
        ChannelKind::SpotTicker
    } else if channel.contains("ticker") && channel.contains("future") {
        ChannelKind::FuturesTicker
    } else if channel.contains("depth") {
        ChannelKind::Depth
    } else if channel.contains("trades_v1") || channel.contains("trade_v1") {
        ChannelKind::TradeTape
    } else if channel.contains("kline") {
        ChannelKind::Kline
    } else if channel.contains("spot") && channel.contains("realtrades") {
        ChannelKind::SpotRealTrades
    } else if channel.contains("future") && channel.contains("realtrades") {
        ChannelKind::FuturesRealTrades
    } else if (channel.contains("spot") || channel.contains("futures")) && channel.contains("trade")
    {
        ChannelKind::OrderAck
    } else if channel.contains("cancel_order") {
        ChannelKind::OrderAck
    } else if channel.contains("spot") && channel.contains("userinfo") {
        ChannelKind::SpotUserInfo
    } else if channel.contains("futureusd_userinfo") {
        ChannelKind::FuturesUserInfo
    } else if channel.contains("spot") && channel.contains("order_info") {
        ChannelKind::SpotOrderInfo
    } else if channel.contains("futureusd_order_info") {
        ChannelKind::FuturesOrderInfo
    } else if channel.contains("future_index") {
        ChannelKind::FutureIndex
    } else {
        ChannelKind::Unhandled
    }
}
