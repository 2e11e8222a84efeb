//! Traits of the peer connection capability.

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;

use crate::connection_ref::ConnectionRef;
use crate::core::callback::BoxedTransportCallback;

/// The state of the data channel carried by a connection.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataChannelState {
    /// The underlying connection is still negotiating.
    #[default]
    Connecting,
    /// The channel is open and may carry messages.
    Open,
    /// The channel is in the process of shutting down.
    Closing,
    /// The channel is closed or was never established.
    Closed,
}

/// The kind of a [SessionDescription].
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    /// Initial description proposed by the connecting side.
    Offer,
    /// Provisional answer, may change.
    Pranswer,
    /// Final description chosen by the answering side.
    Answer,
    /// Cancels the current negotiation and rolls back to a stable state.
    Rollback,
}

/// A session description as exchanged through the signaling channel.
///
/// Serializes to the `{"type": ..., "sdp": ...}` shape the relay expects.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionDescription {
    /// Description kind.
    #[serde(rename = "type")]
    pub sdp_type: SdpType,
    /// Raw SDP text.
    pub sdp: String,
}

/// [ConnectionInterface] defines how to drive negotiation of a peer connection
/// and then exchange binary messages over its data channel.
#[async_trait]
pub trait ConnectionInterface: Send + Sync {
    /// Sdp type of the implementation, exchanged through the signaling channel.
    type Sdp: Serialize + DeserializeOwned + Send + Sync;
    /// Error type of the implementation.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create an offer and install it as the local description.
    async fn webrtc_create_offer(&self) -> Result<Self::Sdp, Self::Error>;

    /// Apply the answer received through the signaling channel as the remote
    /// description.
    async fn webrtc_accept_answer(&self, answer: Self::Sdp) -> Result<(), Self::Error>;

    /// Send a binary message over the data channel.
    async fn send_message(&self, msg: Bytes) -> Result<(), Self::Error>;

    /// Current state of the data channel.
    fn data_channel_state(&self) -> DataChannelState;

    /// Close the connection and its data channel.
    async fn close(&self) -> Result<(), Self::Error>;
}

/// [TransportInterface] should be implemented for each Connection
/// implementation. It creates connections bound to a callback and manages
/// them by connection id.
#[async_trait]
pub trait TransportInterface: Send + Sync {
    /// The connection type managed by this transport.
    type Connection: ConnectionInterface<Sdp = Self::Sdp, Error = Self::Error>;
    /// Sdp type shared with [Self::Connection].
    type Sdp: Serialize + DeserializeOwned + Send + Sync;
    /// Error type shared with [Self::Connection].
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a new connection with one data channel labeled `label`,
    /// register it under `cid` and wire its events to `callback`.
    async fn new_connection(
        &self,
        cid: &str,
        label: &str,
        callback: BoxedTransportCallback,
    ) -> Result<(), Self::Error>;

    /// Get a reference to the connection by its id.
    fn connection(&self, cid: &str) -> Result<ConnectionRef<Self::Connection>, Self::Error>;

    /// Get all the connections in the transport.
    fn connections(&self) -> Vec<(String, ConnectionRef<Self::Connection>)>;

    /// Get all the connection ids in the transport.
    fn connection_ids(&self) -> Vec<String>;

    /// Close the connection by its id and remove it from the registry.
    async fn close_connection(&self, cid: &str) -> Result<(), Self::Error>;
}
