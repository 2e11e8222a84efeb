//! A bunch of wrap errors.

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors enum mapping global custom errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Registry lookup failed or returned an unusable record.
    #[error("Registry error: {0}")]
    Registry(String),

    /// Connection negotiation failed before the data channel opened.
    #[error("Negotiation failed: {0}")]
    Negotiation(String),

    /// The data channel did not open within the configured timeout.
    #[error("Negotiation timed out")]
    NegotiationTimeout,

    /// Errors of the underlying peer transport.
    #[error("Transport error: {0}")]
    Transport(#[from] relaynet_transport::error::Error),

    /// Encryption or decryption failed.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// A data channel message violated the wire protocol.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The remote end reported an error for this request.
    #[error("Remote error: {0}")]
    Remote(String),

    /// A signaling request was rejected or failed.
    #[error("Signaling error: {0}")]
    Signaling(String),

    /// `execute` was called while the data channel is not open.
    #[error("Data channel is not open")]
    ChannelNotOpen,

    /// The data channel closed while the request was pending.
    #[error("Data channel closed")]
    ChannelClosed,

    /// A later request reused the same request id.
    #[error("Request superseded by a newer request with the same id")]
    RequestSuperseded,

    /// No response arrived within the configured timeout.
    #[error("Request timed out")]
    RequestTimeout,

    /// Invalid log level name.
    #[error("Invalid logging level: {0}")]
    InvalidLoggingLevel(String),

    /// Serde json error.
    #[error("Serde json error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// Protobuf decode error.
    #[error("Protobuf decode error: {0}")]
    ProstDecodeError(#[from] prost::DecodeError),
}
