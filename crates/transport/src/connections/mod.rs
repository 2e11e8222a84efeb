//! Connection implementations.
//! Currently provides a `DummyConnection` for local testing.

#[cfg(feature = "dummy")]
mod dummy;

#[cfg(feature = "dummy")]
pub use crate::connections::dummy::DummyConnection;
#[cfg(feature = "dummy")]
pub use crate::connections::dummy::DummyTransport;
#[cfg(feature = "dummy")]
pub use crate::connections::dummy::DUMMY_CANDIDATE;
