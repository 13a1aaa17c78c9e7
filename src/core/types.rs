use serde::{Deserialize, Serialize};
use std::fmt;

/// Pricing region of the venue. The region selects both the WebSocket
/// endpoint and the spot command-channel namespace; futures channels are
/// only carried on the international endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    International,
    China,
}

impl Region {
    pub fn websocket_url(self) -> &'static str {
        match self {
            Self::International => "wss://real.okcoin.com:10440/websocket/okcoinapi",
            Self::China => "wss://real.okcoin.cn:10440/websocket/okcoinapi",
        }
    }

    pub fn supports_futures(self) -> bool {
        matches!(self, Self::International)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::International => write!(f, "international"),
            Self::China => write!(f, "china"),
        }
    }
}

/// Futures contract tenor tracked by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractTenor {
    ThisWeek,
    NextWeek,
    Quarter,
}

impl ContractTenor {
    /// Tenor segment as it appears in channel names and request parameters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ThisWeek => "this_week",
            Self::NextWeek => "next_week",
            Self::Quarter => "quarter",
        }
    }
}

impl fmt::Display for ContractTenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// K-line intervals supported by the venue's WebSocket feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KlineInterval {
    Minutes1,
    Minutes3,
    Minutes5,
    Minutes15,
    Minutes30,
    Hours1,
    Hours2,
    Hours4,
    Hours6,
    Hours12,
    Days1,
    Days3,
    Weeks1,
}

impl KlineInterval {
    /// Every interval the venue serves, in subscription order.
    pub const ALL: [Self; 13] = [
        Self::Minutes1,
        Self::Minutes3,
        Self::Minutes5,
        Self::Minutes15,
        Self::Minutes30,
        Self::Hours1,
        Self::Hours2,
        Self::Hours4,
        Self::Hours6,
        Self::Hours12,
        Self::Days1,
        Self::Days3,
        Self::Weeks1,
    ];

    /// Interval segment as it appears in k-line channel names.
    pub fn as_channel_suffix(self) -> &'static str {
        match self {
            Self::Minutes1 => "1min",
            Self::Minutes3 => "3min",
            Self::Minutes5 => "5min",
            Self::Minutes15 => "15min",
            Self::Minutes30 => "30min",
            Self::Hours1 => "1hour",
            Self::Hours2 => "2hour",
            Self::Hours4 => "4hour",
            Self::Hours6 => "6hour",
            Self::Hours12 => "12hour",
            Self::Days1 => "day",
            Self::Days3 => "3day",
            Self::Weeks1 => "week",
        }
    }
}

impl fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_channel_suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_intervals_are_distinct() {
        for (i, a) in KlineInterval::ALL.iter().enumerate() {
            for b in &KlineInterval::ALL[i + 1..] {
                assert_ne!(a.as_channel_suffix(), b.as_channel_suffix());
            }
        }
        assert_eq!(KlineInterval::ALL.len(), 13);
    }

    #[test]
    fn futures_only_on_international() {
        assert!(Region::International.supports_futures());
        assert!(!Region::China.supports_futures());
        assert_ne!(
            Region::International.websocket_url(),
            Region::China.websocket_url()
        );
    }
}
