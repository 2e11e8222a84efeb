//! The main concepts of this mod are:
//!
//! The [ConnectionInterface](transport::ConnectionInterface) trait defines how to
//! drive the offer/answer handshake of a peer connection and then send data
//! channel messages to the remote side. See the [transport] module.
//!
//! The [TransportInterface](transport::TransportInterface) trait should be
//! implemented for each Connection implementation. See the [transport] module.
//!
//! The [TransportCallback](callback::TransportCallback) trait is used to let the
//! upper layer handle the events of a connection: negotiation needed, discovered
//! ICE candidates, data channel state changes and incoming messages. See the
//! [callback] module.

pub mod callback;
pub mod transport;
