//! The callback seam between a transport and the upper layer.

use async_trait::async_trait;

/// Errors returned by callback handlers. They are logged by the transport and
/// never fail the connection.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Any object that implements this trait can receive the events of a
/// connection. All methods default to a no-op so implementations only handle
/// what they need.
#[async_trait]
pub trait TransportCallback: Send + Sync {
    /// Box the callback for handing to
    /// [TransportInterface::new_connection](crate::core::transport::TransportInterface::new_connection).
    fn boxed(self) -> BoxedTransportCallback
    where Self: Sized + Send + Sync + 'static {
        Box::new(self)
    }

    /// This method is invoked when the connection requires (re)negotiation,
    /// which happens after its data channel was created.
    async fn on_negotiation_needed(&self, _cid: &str) -> Result<(), CallbackError> {
        Ok(())
    }

    /// This method is invoked for each locally discovered ICE candidate.
    /// `candidate` is the textual candidate attribute.
    async fn on_ice_candidate(&self, _cid: &str, _candidate: &str) -> Result<(), CallbackError> {
        Ok(())
    }

    /// This method is invoked when the data channel reports open.
    async fn on_data_channel_open(&self, _cid: &str) -> Result<(), CallbackError> {
        Ok(())
    }

    /// This method is invoked when the data channel reports close.
    async fn on_data_channel_close(&self, _cid: &str) -> Result<(), CallbackError> {
        Ok(())
    }

    /// This method is invoked on a binary message arrival over the data
    /// channel.
    async fn on_message(&self, _cid: &str, _msg: &[u8]) -> Result<(), CallbackError> {
        Ok(())
    }
}

/// Boxed type of [TransportCallback] as accepted by transports.
pub type BoxedTransportCallback = Box<dyn TransportCallback + Send + Sync>;
