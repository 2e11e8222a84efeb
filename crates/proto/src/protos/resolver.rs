/// Standard error envelope.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Error {
    #[prost(enumeration = "ErrorCode", tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub message: ::prost::alloc::string::String,
}
/// Request envelope executed by a resolver node.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResolverRequest {
    /// Correlation id chosen by the requester.
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    /// Whether payload is encrypted with the resolver public key.
    #[prost(bool, tag = "2")]
    pub encrypted: bool,
    /// JSON request body, possibly encrypted.
    #[prost(bytes = "vec", tag = "3")]
    pub payload: ::prost::alloc::vec::Vec<u8>,
    /// Ephemeral public key the resolver encrypts its response with.
    #[prost(bytes = "vec", tag = "4")]
    pub public_key: ::prost::alloc::vec::Vec<u8>,
}
/// Response envelope produced by a resolver node.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResolverResponse {
    /// Correlation id copied from the request.
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    /// Whether payload is encrypted with the ephemeral public key.
    #[prost(bool, tag = "2")]
    pub encrypted: bool,
    #[prost(oneof = "resolver_response::Result", tags = "3, 4")]
    pub result: ::core::option::Option<resolver_response::Result>,
}
/// Nested message and enum types in `ResolverResponse`.
pub mod resolver_response {
    #[allow(clippy::derive_partial_eq_without_eq)]
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Result {
        /// JSON response body, possibly encrypted.
        #[prost(bytes, tag = "3")]
        Payload(::prost::alloc::vec::Vec<u8>),
        /// Envelope-level execution failure.
        #[prost(message, tag = "4")]
        Error(super::Error),
    }
}
/// Error codes a resolver node may report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ErrorCode {
    /// Resolver-side execution failure.
    ErrInternalException = 0,
    /// Request envelope could not be decoded or decrypted.
    ErrInvalidMessageFormat = 1,
    /// Response payload could not be serialized or encrypted.
    ErrResponseSerializationFailed = 2,
}
impl ErrorCode {
    /// String value of the enum field names used in the ProtoBuf definition.
    ///
    /// The values are not transformed in any way and thus are considered stable
    /// (if the ProtoBuf definition does not change) and safe for programmatic use.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            ErrorCode::ErrInternalException => "ERR_INTERNAL_EXCEPTION",
            ErrorCode::ErrInvalidMessageFormat => "ERR_INVALID_MESSAGE_FORMAT",
            ErrorCode::ErrResponseSerializationFailed => "ERR_RESPONSE_SERIALIZATION_FAILED",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "ERR_INTERNAL_EXCEPTION" => Some(Self::ErrInternalException),
            "ERR_INVALID_MESSAGE_FORMAT" => Some(Self::ErrInvalidMessageFormat),
            "ERR_RESPONSE_SERIALIZATION_FAILED" => Some(Self::ErrResponseSerializationFailed),
            _ => None,
        }
    }
}
