use crate::core::errors::OkcoinError;
use tokio_tungstenite::tungstenite::Message;

/// Codec for the venue's WebSocket message framing.
///
/// Converts between raw WebSocket frames and typed messages. Control frames
/// (ping, pong, close) never reach the codec; they are handled at the
/// transport level.
pub trait WsCodec: Send + Sync + 'static {
    /// The type representing one decoded inbound frame.
    type Message: Send;

    /// Encode an "add channel" control frame for an unauthenticated feed.
    fn encode_subscribe(&self, channel: &str) -> Result<Message, OkcoinError>;

    /// Encode a "remove channel" control frame.
    fn encode_unsubscribe(&self, channel: &str) -> Result<Message, OkcoinError>;

    /// Decode one raw frame.
    ///
    /// - `Ok(Some(message))` - successfully decoded frame
    /// - `Ok(None)` - frame was ignored by the codec
    /// - `Err(error)` - the frame was not decodable at all
    fn decode_message(&self, message: Message) -> Result<Option<Self::Message>, OkcoinError>;
}
