#![warn(missing_docs)]
//! Data types exchanged between the SDK, the registry and the resolver.

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Default rendezvous servers used when the caller configures none.
pub const DEFAULT_ICE_SERVERS: &str =
    "stun://stun.l.google.com:19302;stun://stun.services.mozilla.com";

/// Label of the single data channel opened per connection.
pub const DEFAULT_CHANNEL_LABEL: &str = "default";

/// Default bound on waiting for a resolver response.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default bound on waiting for the data channel to open.
pub const DEFAULT_NEGOTIATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Parameters for locating the registry contract.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientParams {
    /// Url of a json-rpc provider for the chain holding the registry.
    pub provider_url: String,
    /// Address of the registry contract, `0x` prefixed hex.
    pub contract_address: String,
}

/// The relayer record fetched from the registry contract.
///
/// `resolver_public_key` is either a `0x` prefixed hex string of a secp256k1
/// point or a PEM armored key, depending on what the registry holds. It is
/// kept in the exact form the registry returned so the relayer can match it
/// byte-for-byte during resolver lookup.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NetworkParams {
    /// Base url of the relayer's signaling endpoints.
    pub relayer_address: String,
    /// Public key of the resolver this relayer fronts.
    pub resolver_public_key: String,
}

/// Tunables of a client instance. [Default] matches the values the hosted
/// relayers are deployed with.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Rendezvous servers in `scheme://[username:password@]host[:port]`
    /// format, `;` separated.
    pub ice_servers: String,
    /// Label of the data channel.
    pub channel_label: String,
    /// How long `execute` waits for a response before giving up.
    pub request_timeout: Duration,
    /// How long `init` waits for the data channel to open before giving up.
    pub negotiation_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ice_servers: DEFAULT_ICE_SERVERS.to_string(),
            channel_label: DEFAULT_CHANNEL_LABEL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            negotiation_timeout: DEFAULT_NEGOTIATION_TIMEOUT,
        }
    }
}

/// A resolver method invocation. Serialized to json and carried as the
/// request payload, in the clear or encrypted under the resolver key.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct JsonRequest {
    /// Correlation id, unique among requests in flight on one client.
    pub id: String,
    /// Method name the resolver dispatches on.
    pub method: String,
    /// Positional string parameters.
    pub params: Vec<String>,
}

/// The resolver's reply to a [JsonRequest].
///
/// A set `error` field is an api-level failure (unknown method, bad
/// parameters). It still resolves `execute` successfully; callers inspect it.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct JsonResponse {
    /// Id of the originating request.
    pub id: String,
    /// Method result, any json value.
    #[serde(default)]
    pub result: serde_json::Value,
    /// Api-level failure description, empty on success.
    #[serde(default)]
    pub error: String,
}
