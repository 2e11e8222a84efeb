#![warn(missing_docs)]
//! The relayer's HTTP signaling endpoints.
//!
//! Negotiation talks to the relayer through [SignalingInterface] so tests can
//! stand in a scripted relay. [HttpSignalingClient] is the real thing.

use async_trait::async_trait;
use relaynet_transport::candidate::IceCandidate;
use relaynet_transport::core::transport::SessionDescription;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;

/// Body of `POST /sdp`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SdpAnnouncement {
    /// Token identifying this connection attempt.
    pub session_id: String,
    /// The local session description.
    pub offer: SessionDescription,
}

/// Response body of `POST /sdp`. Extra fields are ignored.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SdpReply {
    /// The remote session description chosen by the relayer.
    pub answer: SessionDescription,
}

/// Body of `POST /candidate`.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CandidateAnnouncement {
    /// Token identifying this connection attempt.
    pub session_id: String,
    /// A locally discovered candidate.
    pub candidate: IceCandidate,
}

/// Boxed type of [SignalingInterface] as consumed by the negotiation driver.
pub type BoxedSignaling = Box<dyn SignalingInterface>;

/// The two signaling operations a relayer offers.
#[async_trait]
pub trait SignalingInterface: Send + Sync {
    /// Box the implementation for handing to the client.
    fn boxed(self) -> BoxedSignaling
    where Self: Sized + 'static {
        Box::new(self)
    }

    /// Announce the local offer, returning the remote answer.
    async fn announce_sdp(
        &self,
        session_id: &str,
        offer: &SessionDescription,
    ) -> Result<SessionDescription>;

    /// Announce a locally discovered candidate.
    async fn announce_candidate(&self, session_id: &str, candidate: &IceCandidate) -> Result<()>;
}

/// Signaling over the relayer's HTTP endpoints.
pub struct HttpSignalingClient {
    client: HttpClient,
    relayer_address: String,
}

impl HttpSignalingClient {
    /// Creates a new client for the relayer at `relayer_address`.
    pub fn new(relayer_address: &str) -> Self {
        Self {
            client: HttpClient::default(),
            relayer_address: relayer_address.trim_end_matches('/').to_string(),
        }
    }

    async fn post<B>(&self, path: &str, body: &B) -> Result<reqwest::Response>
    where B: Serialize + Sync {
        self.client
            .post(format!("{}/{}", self.relayer_address, path))
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Signaling(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::Signaling(e.to_string()))
    }
}

#[async_trait]
impl SignalingInterface for HttpSignalingClient {
    async fn announce_sdp(
        &self,
        session_id: &str,
        offer: &SessionDescription,
    ) -> Result<SessionDescription> {
        let body = SdpAnnouncement {
            session_id: session_id.to_string(),
            offer: offer.clone(),
        };

        let reply: SdpReply = self
            .post("sdp", &body)
            .await?
            .json()
            .await
            .map_err(|e| Error::Signaling(format!("bad sdp reply: {e}")))?;

        Ok(reply.answer)
    }

    async fn announce_candidate(&self, session_id: &str, candidate: &IceCandidate) -> Result<()> {
        let body = CandidateAnnouncement {
            session_id: session_id.to_string(),
            candidate: candidate.clone(),
        };

        self.post("candidate", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use relaynet_transport::core::transport::SdpType;

    use super::*;

    #[test]
    fn test_signaling_body_spelling() {
        let body = SdpAnnouncement {
            session_id: "b49c62a7".to_string(),
            offer: SessionDescription {
                sdp_type: SdpType::Offer,
                sdp: "v=0".to_string(),
            },
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "session_id": "b49c62a7",
                "offer": {"type": "offer", "sdp": "v=0"},
            })
        );

        let reply: SdpReply =
            serde_json::from_str(r#"{"answer":{"type":"answer","sdp":"v=0"},"ignored":1}"#)
                .unwrap();
        assert_eq!(reply.answer.sdp_type, SdpType::Answer);
    }

    #[test]
    fn test_candidate_body_spelling() {
        let candidate: IceCandidate =
            "candidate:1 1 udp 2113667326 192.168.1.4 54321 typ host".parse().unwrap();
        let body = CandidateAnnouncement {
            session_id: "b49c62a7".to_string(),
            candidate,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["candidate"]["protocol"], serde_json::json!(1));
        assert_eq!(json["candidate"]["port"], serde_json::json!(54321));
        assert_eq!(json["candidate"]["type"], serde_json::json!("host"));
    }
}
