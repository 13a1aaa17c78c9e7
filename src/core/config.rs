use crate::core::types::{ContractTenor, Region};
use crate::kernel::ws::WsConfig;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;

/// Client configuration: credentials, venue region, and the feeds to track.
#[derive(Debug, Clone)]
pub struct OkcoinConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub region: Region,
    /// Trading pairs in underscore form, e.g. `"btc_usd"`.
    pub enabled_pairs: Vec<String>,
    /// Contract tenors tracked on the futures endpoint.
    pub futures_tenors: Vec<ContractTenor>,
    /// Whether the authenticated channels are subscribed on connect.
    pub authenticated: bool,
    pub ws: WsConfig,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for OkcoinConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("OkcoinConfig", 6)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("region", &self.region)?;
        state.serialize_field("enabled_pairs", &self.enabled_pairs)?;
        state.serialize_field("futures_tenors", &self.futures_tenors)?;
        state.serialize_field("authenticated", &self.authenticated)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for OkcoinConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct OkcoinConfigHelper {
            api_key: String,
            secret_key: String,
            region: Region,
            #[serde(default)]
            enabled_pairs: Vec<String>,
            #[serde(default)]
            futures_tenors: Vec<ContractTenor>,
            #[serde(default)]
            authenticated: bool,
        }

        let helper = OkcoinConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            region: helper.region,
            enabled_pairs: helper.enabled_pairs,
            futures_tenors: helper.futures_tenors,
            authenticated: helper.authenticated,
            ws: WsConfig::default(),
        })
    }
}

impl OkcoinConfig {
    /// Create a new configuration with API credentials.
    #[must_use]
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            region: Region::International,
            enabled_pairs: Vec::new(),
            futures_tenors: Vec::new(),
            authenticated: true,
            ws: WsConfig::default(),
        }
    }

    /// Configuration for public market data only; no credentials required.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            api_key: Secret::new(String::new()),
            secret_key: Secret::new(String::new()),
            region: Region::International,
            enabled_pairs: Vec::new(),
            futures_tenors: Vec::new(),
            authenticated: false,
            ws: WsConfig::default(),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Expected environment variables:
    /// - `{PREFIX}_API_KEY` (e.g., `OKCOIN_API_KEY`)
    /// - `{PREFIX}_SECRET_KEY` (e.g., `OKCOIN_SECRET_KEY`)
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let api_key_var = format!("{}_API_KEY", prefix.to_uppercase());
        let secret_key_var = format!("{}_SECRET_KEY", prefix.to_uppercase());

        let api_key = env::var(&api_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(api_key_var))?;

        let secret_key = env::var(&secret_key_var)
            .map_err(|_| ConfigError::MissingEnvironmentVariable(secret_key_var))?;

        Ok(Self::new(api_key, secret_key))
    }

    /// Check if this configuration has valid credentials for authenticated channels.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.secret_key.expose_secret().is_empty()
    }

    /// Set the venue region.
    #[must_use]
    pub fn region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Set the enabled trading pairs (underscore form, e.g. `"btc_usd"`).
    #[must_use]
    pub fn enabled_pairs(mut self, pairs: Vec<String>) -> Self {
        self.enabled_pairs = pairs;
        self
    }

    /// Set the tracked futures contract tenors.
    #[must_use]
    pub fn futures_tenors(mut self, tenors: Vec<ContractTenor>) -> Self {
        self.futures_tenors = tenors;
        self
    }

    /// Toggle authenticated mode.
    #[must_use]
    pub const fn authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }

    /// Set transport and reconnect policy.
    #[must_use]
    pub fn ws_config(mut self, ws: WsConfig) -> Self {
        self.ws = ws;
        self
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_has_no_credentials() {
        let config = OkcoinConfig::read_only();
        assert!(!config.has_credentials());
        assert!(!config.authenticated);
    }

    #[test]
    fn serialization_redacts_secrets() {
        let config = OkcoinConfig::new("key-value".to_string(), "secret-value".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret-value"));
        assert!(!json.contains("key-value"));
        assert!(json.contains("[REDACTED]"));
    }
}
