use crate::kernel::signer::WsSigner;
use md5::{Digest, Md5};
use std::collections::BTreeMap;

/// MD5 query-string signer for authenticated channel requests.
///
/// The venue does not require a particular key order, but the same encoder
/// must produce both the signed string and the transmitted parameters; sorted
/// map order guarantees that.
pub struct OkcoinSigner {
    api_key: String,
    secret_key: String,
}

impl OkcoinSigner {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self {
            api_key,
            secret_key,
        }
    }
}

impl WsSigner for OkcoinSigner {
    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn sign(&self, parameters: &BTreeMap<String, String>) -> String {
        // A previously computed `sign` value is never part of the digest input.
        let mut query = String::new();
        for (key, value) in parameters.iter().filter(|(key, _)| key.as_str() != "sign") {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(&urlencoding::encode(key));
            query.push('=');
            query.push_str(&urlencoding::encode(value));
        }
        query.push_str("&secret_key=");
        query.push_str(&self.secret_key);

        hex::encode_upper(Md5::digest(query.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> OkcoinSigner {
        OkcoinSigner::new("partner-id".to_string(), "very-secret".to_string())
    }

    fn params(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn signature_is_deterministic_uppercase_hex() {
        let p = params(&[("api_key", "partner-id"), ("symbol", "btc_usd")]);
        let first = signer().sign(&p);
        let second = signer().sign(&p);

        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        assert!(first
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn changing_any_parameter_changes_the_signature() {
        let base = params(&[("api_key", "partner-id"), ("symbol", "btc_usd")]);
        let changed = params(&[("api_key", "partner-id"), ("symbol", "ltc_usd")]);

        assert_ne!(signer().sign(&base), signer().sign(&changed));
    }

    #[test]
    fn previous_signature_is_excluded_from_the_input() {
        let mut p = params(&[("api_key", "partner-id"), ("symbol", "btc_usd")]);
        let original = signer().sign(&p);

        p.insert("sign".to_string(), original.clone());
        let resigned = signer().sign(&p);

        assert_eq!(original, resigned);
    }

    #[test]
    fn different_secrets_produce_different_signatures() {
        let p = params(&[("api_key", "partner-id")]);
        let other = OkcoinSigner::new("partner-id".to_string(), "other-secret".to_string());

        assert_ne!(signer().sign(&p), other.sign(&p));
    }
}
