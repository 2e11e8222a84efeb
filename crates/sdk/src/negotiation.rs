//! Driving a connection attempt from offer to open data channel.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use relaynet_transport::candidate::IceCandidate;
use relaynet_transport::core::transport::ConnectionInterface;
use relaynet_transport::core::transport::SessionDescription;
use relaynet_transport::core::transport::TransportInterface;
use relaynet_transport::error::Error as TransportError;
use relaynet_transport::notifier::Notifier;

use crate::error::Result;
use crate::signaling::BoxedSignaling;

/// Terminal outcomes of one connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NegotiationOutcome {
    /// The data channel opened.
    Open,
    /// The data channel closed before it ever opened.
    ChannelClosed,
    /// Description exchange with the relayer failed.
    Failed(String),
}

/// Drives the negotiation of one connection against the relayer.
///
/// The transport raises negotiation events on its callback; this type turns
/// them into signaling requests and settles the outcome of the attempt into
/// a [Notifier] exactly once.
pub(crate) struct Negotiator<T> {
    session_id: String,
    transport: Arc<T>,
    signaling: BoxedSignaling,
    notifier: Notifier<NegotiationOutcome>,
    making_offer: AtomicBool,
}

impl<T> Negotiator<T>
where T: TransportInterface<Sdp = SessionDescription, Error = TransportError> + 'static
{
    pub fn new(session_id: String, transport: Arc<T>, signaling: BoxedSignaling) -> Self {
        Self {
            session_id,
            transport,
            signaling,
            notifier: Notifier::default(),
            making_offer: AtomicBool::new(false),
        }
    }

    /// A clone of the settlement cell of this attempt.
    pub fn notifier(&self) -> Notifier<NegotiationOutcome> {
        self.notifier.clone()
    }

    /// Run the offer flow in a background task: create the local offer,
    /// announce it, apply the answer. A second negotiation request while one
    /// is in flight is ignored. Failures settle the attempt.
    pub fn handle_negotiation_needed(self: &Arc<Self>) {
        if self.making_offer.swap(true, Ordering::SeqCst) {
            tracing::debug!(
                "Session {} already has an offer in flight, ignoring negotiation request",
                self.session_id
            );
            return;
        }

        let this = self.clone();
        tokio::spawn(async move {
            let result = this.drive_offer().await;
            this.making_offer.store(false, Ordering::SeqCst);

            if let Err(e) = result {
                tracing::error!("Negotiation of session {} failed: {e}", this.session_id);
                this.notifier
                    .settle(NegotiationOutcome::Failed(e.to_string()));
            }
        });
    }

    async fn drive_offer(&self) -> Result<()> {
        let conn = self.transport.connection(&self.session_id)?;

        let offer = conn.webrtc_create_offer().await?;
        tracing::debug!("Announcing offer of session {}", self.session_id);

        let answer = self.signaling.announce_sdp(&self.session_id, &offer).await?;
        conn.webrtc_accept_answer(answer).await?;
        Ok(())
    }

    /// Announce one locally discovered candidate. An unparsable candidate is
    /// dropped; the rest of the gathering continues.
    pub async fn handle_candidate(&self, candidate: &str) -> Result<()> {
        let parsed: IceCandidate = match candidate.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::error!("Dropping unparsable candidate {candidate:?}: {e}");
                return Ok(());
            }
        };

        self.signaling
            .announce_candidate(&self.session_id, &parsed)
            .await
    }

    pub fn handle_open(&self) {
        self.notifier.settle(NegotiationOutcome::Open);
    }

    /// A close before the open settles the attempt as closed. After a
    /// successful open this is a no-op on the already settled cell.
    pub fn handle_close(&self) {
        self.notifier.settle(NegotiationOutcome::ChannelClosed);
    }
}
