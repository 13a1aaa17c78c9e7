pub mod channels;
pub mod client;
pub mod codec;
pub mod de;
pub mod errors;
pub mod signer;
pub mod subscriptions;
pub mod types;

// Re-export main types for easier importing
pub use channels::ChannelKind;
pub use client::{Command, ConnectionState, OkcoinHandle, OkcoinWsClient};
pub use codec::{OkcoinCodec, OkcoinWsEvent};
pub use signer::OkcoinSigner;
pub use subscriptions::SubscriptionManager;
