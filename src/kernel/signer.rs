use std::collections::BTreeMap;

/// Request signer for authenticated channel requests.
///
/// Implementations must be deterministic pure functions over the parameter
/// set: the same parameters always produce the same signature, and the
/// computed `sign` value is never part of its own input.
pub trait WsSigner: Send + Sync {
    /// API key that accompanies every signed request as the `api_key` parameter.
    fn api_key(&self) -> &str;

    /// Compute the signature over the given parameters.
    ///
    /// The returned value goes into the request's `sign` field. Parameters
    /// are taken in their map order, which must match the order the request
    /// serializer emits so the signature covers exactly what is transmitted.
    fn sign(&self, parameters: &BTreeMap<String, String>) -> String;
}
