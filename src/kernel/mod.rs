//! Transport kernel: venue-agnostic WebSocket session, message codec, and
//! request signer interfaces.
//!
//! The kernel contains no venue protocol logic. The `okcoin` module plugs its
//! codec and signer into these seams, and tests substitute a scripted
//! transport for the real connection.

pub mod codec;
pub mod signer;
pub mod ws;

// Re-export key types for convenience
pub use codec::WsCodec;
pub use signer::WsSigner;
pub use ws::{TungsteniteWs, WsConfig, WsSession};
