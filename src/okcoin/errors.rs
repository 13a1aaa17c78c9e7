//! Static catalog of the venue's protocol error codes.
//!
//! Consulted when an envelope reports failure. Unknown codes are a normal,
//! non-fatal case; callers fall back to displaying the raw code.

const ERROR_CODES: &[(&str, &str)] = &[
    ("10001", "Illegal parameters"),
    ("10002", "Authentication failure"),
    ("10003", "This connection has requested other user data"),
    ("10004", "This connection did not request this user data"),
    ("10005", "System error"),
    ("10009", "Order does not exist"),
    ("10010", "Insufficient funds"),
    ("10011", "Order quantity too low"),
    ("10012", "Only support btc_usd/btc_cny ltc_usd/ltc_cny"),
    ("10014", "Order price must be between 0 - 1,000,000"),
    ("10015", "Channel subscription temporally not available"),
    ("10016", "Insufficient coins"),
    ("10017", "WebSocket authorization error"),
    ("10100", "User frozen"),
    ("10216", "Non-public API"),
    ("20001", "User does not exist"),
    ("20002", "User frozen"),
    ("20003", "Frozen due to force liquidation"),
    ("20004", "Future account frozen"),
    ("20005", "User future account does not exist"),
    ("20006", "Required field can not be null"),
    ("20007", "Illegal parameter"),
    ("20008", "Future account fund balance is zero"),
    ("20009", "Future contract status error"),
    ("20010", "Risk rate information does not exist"),
    ("20011", "Risk rate bigger than 90% before opening position"),
    ("20012", "Risk rate bigger than 90% after opening position"),
    ("20013", "Temporally no counter party price"),
    ("20014", "System error"),
    ("20015", "Order does not exist"),
    ("20016", "Liquidation quantity bigger than holding"),
    ("20017", "Not authorized/illegal order ID"),
    (
        "20018",
        "Order price higher than 105% or lower than 95% of the price of last minute",
    ),
    ("20019", "IP restrained to access the resource"),
    ("20020", "Secret key does not exist"),
    ("20021", "Index information does not exist"),
    ("20022", "Wrong API interface"),
    ("20023", "Fixed margin user"),
    ("20024", "Signature does not match"),
    ("20025", "Leverage rate error"),
];

/// Look up the human-readable description for a protocol error code.
pub fn describe(code: &str) -> Option<&'static str> {
    ERROR_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, description)| *description)
}
