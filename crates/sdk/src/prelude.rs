//! A prelude is provided which imports all the important data types and traits of the sdk.
/// Use this when you want to quickly bootstrap a new project.
pub use relaynet_proto;
pub use relaynet_transport;

pub use crate::client::Client;
pub use crate::crypto::KeyKind;
pub use crate::crypto::KeyPair;
pub use crate::crypto::ResolverKey;
pub use crate::error::Error;
pub use crate::error::Result;
pub use crate::logging::init_logging;
pub use crate::logging::LogLevel;
pub use crate::registry::fetch_network_params;
pub use crate::registry::RegistryClient;
pub use crate::signaling::BoxedSignaling;
pub use crate::signaling::HttpSignalingClient;
pub use crate::signaling::SignalingInterface;
pub use crate::types::ClientConfig;
pub use crate::types::ClientParams;
pub use crate::types::JsonRequest;
pub use crate::types::JsonResponse;
pub use crate::types::NetworkParams;
pub use self::relaynet_proto::relayer;
pub use self::relaynet_proto::resolver;
pub use self::relaynet_transport::core::transport::SessionDescription;
pub use self::relaynet_transport::core::transport::TransportInterface;
