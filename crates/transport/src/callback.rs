//! This module contains the [InnerTransportCallback] struct.

use bytes::Bytes;

use crate::core::callback::BoxedTransportCallback;

/// [InnerTransportCallback] wraps the [BoxedTransportCallback] with inner
/// handling for a specific connection. Handler errors are logged and never
/// propagated back into the transport.
pub struct InnerTransportCallback {
    /// The id of the connection to which the current callback is assigned.
    pub cid: String,
    callback: BoxedTransportCallback,
}

impl InnerTransportCallback {
    /// Create a new [InnerTransportCallback].
    pub fn new(cid: &str, callback: BoxedTransportCallback) -> Self {
        Self {
            cid: cid.to_string(),
            callback,
        }
    }

    /// Notify that the connection requires negotiation.
    pub async fn on_negotiation_needed(&self) {
        if let Err(e) = self.callback.on_negotiation_needed(&self.cid).await {
            tracing::error!("Callback on_negotiation_needed failed: {e:?}");
        }
    }

    /// Notify a locally discovered ICE candidate.
    pub async fn on_ice_candidate(&self, candidate: &str) {
        if let Err(e) = self.callback.on_ice_candidate(&self.cid, candidate).await {
            tracing::error!("Callback on_ice_candidate failed: {e:?}");
        }
    }

    /// Notify the data channel is open.
    pub async fn on_data_channel_open(&self) {
        if let Err(e) = self.callback.on_data_channel_open(&self.cid).await {
            tracing::error!("Callback on_data_channel_open failed: {e:?}");
        }
    }

    /// Notify the data channel is close.
    pub async fn on_data_channel_close(&self) {
        if let Err(e) = self.callback.on_data_channel_close(&self.cid).await {
            tracing::error!("Callback on_data_channel_close failed: {e:?}");
        }
    }

    /// This method is invoked on a binary message arrival over the data channel.
    pub async fn on_message(&self, msg: &Bytes) {
        if let Err(e) = self.callback.on_message(&self.cid, msg).await {
            tracing::error!("Callback on_message failed: {e:?}");
        }
    }
}
