pub mod core;
pub mod kernel;
pub mod okcoin;

pub use crate::core::{config::OkcoinConfig, errors::OkcoinError, types::*};
pub use crate::okcoin::client::{ConnectionState, OkcoinHandle, OkcoinWsClient};
pub use crate::okcoin::codec::{OkcoinCodec, OkcoinWsEvent};
