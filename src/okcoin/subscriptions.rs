//! Subscription manager: builds and sends "add/remove channel" control
//! frames, plain or authenticated, for every feed the client needs.
//!
//! Each call writes exactly one control frame. The connect-time burst is
//! fire-and-forget: a failed write is logged and the burst continues, so one
//! bad send never aborts the remaining subscriptions. Callers that need
//! delivery confirmation use the returned `Result` of the individual
//! operations instead.

use crate::core::config::OkcoinConfig;
use crate::core::errors::OkcoinError;
use crate::core::types::{ContractTenor, KlineInterval, Region};
use crate::kernel::codec::WsCodec;
use crate::kernel::signer::WsSigner;
use crate::kernel::ws::WsSession;
use crate::okcoin::channels;
use crate::okcoin::codec::{OkcoinCodec, EVENT_ADD_CHANNEL, EVENT_REMOVE_CHANNEL};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub struct SubscriptionManager<S: WsSigner> {
    codec: OkcoinCodec,
    signer: Option<S>,
    region: Region,
}

impl<S: WsSigner> SubscriptionManager<S> {
    pub fn new(region: Region, signer: Option<S>) -> Self {
        Self {
            codec: OkcoinCodec::new(),
            signer,
            region,
        }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Subscribe to an unauthenticated channel.
    pub async fn subscribe<W: WsSession>(
        &self,
        transport: &mut W,
        channel: &str,
    ) -> Result<(), OkcoinError> {
        debug!(channel, "adding channel");
        let frame = self.codec.encode_subscribe(channel)?;
        transport.send(frame).await
    }

    /// Unsubscribe from an unauthenticated channel.
    pub async fn unsubscribe<W: WsSession>(
        &self,
        transport: &mut W,
        channel: &str,
    ) -> Result<(), OkcoinError> {
        debug!(channel, "removing channel");
        let frame = self.codec.encode_unsubscribe(channel)?;
        transport.send(frame).await
    }

    /// Subscribe to an authenticated channel. The signature covers every
    /// parameter, including the inserted `api_key`.
    pub async fn subscribe_authenticated<W: WsSession>(
        &self,
        transport: &mut W,
        channel: &str,
        parameters: BTreeMap<String, String>,
    ) -> Result<(), OkcoinError> {
        debug!(channel, "adding authenticated channel");
        let parameters = self.signed_parameters(parameters)?;
        let frame = self
            .codec
            .encode_authenticated(EVENT_ADD_CHANNEL, channel, &parameters)?;
        transport.send(frame).await
    }

    /// Unsubscribe from an authenticated channel.
    pub async fn unsubscribe_authenticated<W: WsSession>(
        &self,
        transport: &mut W,
        channel: &str,
        parameters: BTreeMap<String, String>,
    ) -> Result<(), OkcoinError> {
        debug!(channel, "removing authenticated channel");
        let parameters = self.signed_parameters(parameters)?;
        let frame = self
            .codec
            .encode_authenticated(EVENT_REMOVE_CHANNEL, channel, &parameters)?;
        transport.send(frame).await
    }

    fn signed_parameters(
        &self,
        mut parameters: BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, String>, OkcoinError> {
        let signer = self.signer.as_ref().ok_or_else(|| {
            OkcoinError::Auth("credentials required for authenticated channel".to_string())
        })?;
        parameters.insert("api_key".to_string(), signer.api_key().to_string());
        let sign = signer.sign(&parameters);
        parameters.insert("sign".to_string(), sign);
        Ok(parameters)
    }

    /// Place a spot order. The result arrives asynchronously as an order
    /// acknowledgement on the region's spot trade channel.
    pub async fn place_spot_order<W: WsSession>(
        &self,
        transport: &mut W,
        symbol: &str,
        order_type: &str,
        price: f64,
        amount: f64,
    ) -> Result<(), OkcoinError> {
        let mut values = BTreeMap::new();
        values.insert("symbol".to_string(), symbol.to_string());
        values.insert("type".to_string(), order_type.to_string());
        values.insert("price".to_string(), price.to_string());
        values.insert("amount".to_string(), amount.to_string());
        self.subscribe_authenticated(transport, channels::spot_trade(self.region), values)
            .await
    }

    /// Cancel a spot order.
    pub async fn cancel_spot_order<W: WsSession>(
        &self,
        transport: &mut W,
        symbol: &str,
        order_id: i64,
    ) -> Result<(), OkcoinError> {
        let mut values = BTreeMap::new();
        values.insert("symbol".to_string(), symbol.to_string());
        values.insert("order_id".to_string(), order_id.to_string());
        self.subscribe_authenticated(transport, channels::spot_cancel_order(self.region), values)
            .await
    }

    /// Query spot order status; `order_id` of -1 queries all open orders.
    pub async fn spot_order_status<W: WsSession>(
        &self,
        transport: &mut W,
        symbol: &str,
        order_id: i64,
    ) -> Result<(), OkcoinError> {
        let mut values = BTreeMap::new();
        values.insert("symbol".to_string(), symbol.to_string());
        values.insert("order_id".to_string(), order_id.to_string());
        self.subscribe_authenticated(transport, channels::spot_order_info(self.region), values)
            .await
    }

    /// Place a futures order.
    pub async fn place_futures_order<W: WsSession>(
        &self,
        transport: &mut W,
        symbol: &str,
        tenor: ContractTenor,
        price: f64,
        amount: f64,
        order_type: i64,
        match_price: i64,
        leverage: i64,
    ) -> Result<(), OkcoinError> {
        let mut values = BTreeMap::new();
        values.insert("symbol".to_string(), symbol.to_string());
        values.insert("contract_type".to_string(), tenor.as_str().to_string());
        values.insert("price".to_string(), price.to_string());
        values.insert("amount".to_string(), amount.to_string());
        values.insert("type".to_string(), order_type.to_string());
        values.insert("match_price".to_string(), match_price.to_string());
        values.insert("lever_rate".to_string(), leverage.to_string());
        self.subscribe_authenticated(transport, channels::FUTURES_TRADE, values)
            .await
    }

    /// Cancel a futures order.
    pub async fn cancel_futures_order<W: WsSession>(
        &self,
        transport: &mut W,
        symbol: &str,
        tenor: ContractTenor,
        order_id: i64,
    ) -> Result<(), OkcoinError> {
        let mut values = BTreeMap::new();
        values.insert("symbol".to_string(), symbol.to_string());
        values.insert("order_id".to_string(), order_id.to_string());
        values.insert("contract_type".to_string(), tenor.as_str().to_string());
        self.subscribe_authenticated(transport, channels::FUTURES_CANCEL_ORDER, values)
            .await
    }

    /// Query futures order status.
    #[allow(clippy::too_many_arguments)]
    pub async fn futures_order_status<W: WsSession>(
        &self,
        transport: &mut W,
        symbol: &str,
        tenor: ContractTenor,
        order_id: i64,
        order_status: i64,
        current_page: i64,
        page_length: i64,
    ) -> Result<(), OkcoinError> {
        let mut values = BTreeMap::new();
        values.insert("symbol".to_string(), symbol.to_string());
        values.insert("order_id".to_string(), order_id.to_string());
        values.insert("contract_type".to_string(), tenor.as_str().to_string());
        values.insert("status".to_string(), order_status.to_string());
        values.insert("current_page".to_string(), current_page.to_string());
        values.insert("page_length".to_string(), page_length.to_string());
        self.subscribe_authenticated(transport, channels::FUTURES_ORDER_INFO, values)
            .await
    }

    /// Issue every subscription the configuration calls for. Ran on every
    /// successful (re)connect; the venue keeps no subscription state across
    /// connections, so the full set is reissued each time.
    pub async fn issue_subscriptions<W: WsSession>(
        &self,
        transport: &mut W,
        config: &OkcoinConfig,
    ) {
        let authenticated = config.authenticated && self.signer.is_some();

        if authenticated {
            if self.region.supports_futures() {
                self.log_failure(
                    channels::FUTURES_REALTRADES,
                    self.subscribe_authenticated(
                        transport,
                        channels::FUTURES_REALTRADES,
                        BTreeMap::new(),
                    )
                    .await,
                );
                self.log_failure(
                    channels::FUTURES_USERINFO,
                    self.subscribe_authenticated(
                        transport,
                        channels::FUTURES_USERINFO,
                        BTreeMap::new(),
                    )
                    .await,
                );
            }
            let realtrades = channels::spot_realtrades(self.region);
            self.log_failure(
                realtrades,
                self.subscribe_authenticated(transport, realtrades, BTreeMap::new())
                    .await,
            );
            let userinfo = channels::spot_userinfo(self.region);
            self.log_failure(
                userinfo,
                self.subscribe_authenticated(transport, userinfo, BTreeMap::new())
                    .await,
            );
        }

        for pair in &config.enabled_pairs {
            if authenticated {
                self.log_failure(pair, self.spot_order_status(transport, pair, -1).await);
            }

            self.log_failure(
                pair,
                self.subscribe(transport, &channels::spot_ticker(pair)).await,
            );
            self.log_failure(
                pair,
                self.subscribe(transport, &channels::spot_depth(pair)).await,
            );
            self.log_failure(
                pair,
                self.subscribe(transport, &channels::spot_trades(pair)).await,
            );
            for interval in KlineInterval::ALL {
                self.log_failure(
                    pair,
                    self.subscribe(transport, &channels::spot_kline(pair, interval))
                        .await,
                );
            }

            if self.region.supports_futures() {
                self.log_failure(
                    pair,
                    self.subscribe(transport, &channels::future_index(pair)).await,
                );
                for &tenor in &config.futures_tenors {
                    if authenticated {
                        self.log_failure(
                            pair,
                            self.futures_order_status(transport, pair, tenor, -1, 1, 1, 50)
                                .await,
                        );
                    }
                    self.log_failure(
                        pair,
                        self.subscribe(transport, &channels::future_ticker(pair, tenor))
                            .await,
                    );
                    self.log_failure(
                        pair,
                        self.subscribe(transport, &channels::future_depth(pair, tenor))
                            .await,
                    );
                    self.log_failure(
                        pair,
                        self.subscribe(transport, &channels::future_trades(pair, tenor))
                            .await,
                    );
                    for interval in KlineInterval::ALL {
                        self.log_failure(
                            pair,
                            self.subscribe(
                                transport,
                                &channels::future_kline(pair, tenor, interval),
                            )
                            .await,
                        );
                    }
                }
            }
        }
    }

    fn log_failure(&self, subject: &str, result: Result<(), OkcoinError>) {
        if let Err(e) = result {
            warn!(subject, error = %e, "subscription write failed");
        }
    }
}
