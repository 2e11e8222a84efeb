/// Standard error envelope.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Error {
    #[prost(enumeration = "ErrorCode", tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub message: ::prost::alloc::string::String,
}
/// Frame sent to the relay over the data channel.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IncomingMessage {
    /// Registry public keys of the resolvers that may serve the request.
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub public_keys: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
    /// Envelope forwarded to the chosen resolver.
    #[prost(message, optional, tag = "2")]
    pub request: ::core::option::Option<super::resolver::ResolverRequest>,
}
/// Frame the relay sends back over the data channel.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OutgoingMessage {
    /// Registry public key of the resolver that produced the result.
    #[prost(bytes = "vec", tag = "3")]
    pub public_key: ::prost::alloc::vec::Vec<u8>,
    #[prost(oneof = "outgoing_message::Result", tags = "1, 2")]
    pub result: ::core::option::Option<outgoing_message::Result>,
}
/// Nested message and enum types in `OutgoingMessage`.
pub mod outgoing_message {
    #[allow(clippy::derive_partial_eq_without_eq)]
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        /// Resolver response for a forwarded request.
        #[prost(message, tag = "1")]
        Response(super::super::resolver::ResolverResponse),
        /// Relay-level failure.
        #[prost(message, tag = "2")]
        Error(super::Error),
    }
}
/// Error codes a relay node may report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ErrorCode {
    /// Frame could not be decoded as an IncomingMessage.
    ErrInvalidMessageFormat = 0,
    /// No resolver address found for the given public keys.
    ErrResolverLookupFailed = 1,
    /// Forwarding the request to a resolver failed.
    ErrGrpcExecutionFailed = 2,
    /// Failed to serialize the response.
    ErrResponseSerializationFailed = 3,
    /// Failed to send the response over the data channel.
    ErrDataChannelSendFailed = 4,
}
impl ErrorCode {
    /// String value of the enum field names used in the ProtoBuf definition.
    ///
    /// The values are not transformed in any way and thus are considered stable
    /// (if the ProtoBuf definition does not change) and safe for programmatic use.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            ErrorCode::ErrInvalidMessageFormat => "ERR_INVALID_MESSAGE_FORMAT",
            ErrorCode::ErrResolverLookupFailed => "ERR_RESOLVER_LOOKUP_FAILED",
            ErrorCode::ErrGrpcExecutionFailed => "ERR_GRPC_EXECUTION_FAILED",
            ErrorCode::ErrResponseSerializationFailed => "ERR_RESPONSE_SERIALIZATION_FAILED",
            ErrorCode::ErrDataChannelSendFailed => "ERR_DATA_CHANNEL_SEND_FAILED",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "ERR_INVALID_MESSAGE_FORMAT" => Some(Self::ErrInvalidMessageFormat),
            "ERR_RESOLVER_LOOKUP_FAILED" => Some(Self::ErrResolverLookupFailed),
            "ERR_GRPC_EXECUTION_FAILED" => Some(Self::ErrGrpcExecutionFailed),
            "ERR_RESPONSE_SERIALIZATION_FAILED" => Some(Self::ErrResponseSerializationFailed),
            "ERR_DATA_CHANNEL_SEND_FAILED" => Some(Self::ErrDataChannelSendFailed),
            _ => None,
        }
    }
}
