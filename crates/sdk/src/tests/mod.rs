//! Scenario tests driving a client against the in-memory transport and a
//! scripted relay.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use prost::Message;
use relaynet_proto::relayer;
use relaynet_proto::resolver;
use relaynet_transport::candidate::IceCandidate;
use relaynet_transport::connections::DummyTransport;
use relaynet_transport::core::transport::SdpType;
use relaynet_transport::core::transport::SessionDescription;

use crate::client::Client;
use crate::error::Error;
use crate::error::Result;
use crate::signaling::SignalingInterface;
use crate::types::ClientConfig;
use crate::types::JsonRequest;
use crate::types::JsonResponse;
use crate::types::NetworkParams;

mod client;

/// How a [ScriptedSignaling] reacts to an announced offer.
pub enum SdpBehavior {
    /// Reply with a scripted answer.
    Answer,
    /// Reply with an offer-typed description, which no transport accepts.
    WrongTypeAnswer,
    /// Fail the announcement.
    Fail(String),
    /// Never reply.
    Hang,
}

/// A scripted relay standing in for the HTTP signaling endpoints. Records
/// everything it is told. Clone the record handles before boxing it away.
pub struct ScriptedSignaling {
    behavior: SdpBehavior,
    pub sdp_announcements: Arc<Mutex<Vec<(String, SessionDescription)>>>,
    pub candidates: Arc<Mutex<Vec<(String, IceCandidate)>>>,
}

impl ScriptedSignaling {
    pub fn new(behavior: SdpBehavior) -> Self {
        Self {
            behavior,
            sdp_announcements: Arc::new(Mutex::new(Vec::new())),
            candidates: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl SignalingInterface for ScriptedSignaling {
    async fn announce_sdp(
        &self,
        session_id: &str,
        offer: &SessionDescription,
    ) -> Result<SessionDescription> {
        self.sdp_announcements
            .lock()
            .unwrap()
            .push((session_id.to_string(), offer.clone()));

        match &self.behavior {
            SdpBehavior::Answer => Ok(SessionDescription {
                sdp_type: SdpType::Answer,
                sdp: "scripted answer".to_string(),
            }),
            SdpBehavior::WrongTypeAnswer => Ok(SessionDescription {
                sdp_type: SdpType::Offer,
                sdp: "scripted answer".to_string(),
            }),
            SdpBehavior::Fail(message) => Err(Error::Signaling(message.clone())),
            SdpBehavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }

    async fn announce_candidate(&self, session_id: &str, candidate: &IceCandidate) -> Result<()> {
        self.candidates
            .lock()
            .unwrap()
            .push((session_id.to_string(), candidate.clone()));
        Ok(())
    }
}

/// The resolver half of the protocol: owns the secp256k1 key the registry
/// would hold and answers recorded request frames.
pub struct TestResolver {
    secret: libsecp256k1::SecretKey,
}

impl TestResolver {
    pub fn new() -> Self {
        Self {
            secret: libsecp256k1::SecretKey::random(&mut rand::thread_rng()),
        }
    }

    pub fn public_point(&self) -> [u8; 33] {
        libsecp256k1::PublicKey::from_secret_key(&self.secret).serialize_compressed()
    }

    /// The registry form of the public key.
    pub fn network_params(&self) -> NetworkParams {
        NetworkParams {
            relayer_address: "http://localhost:8080".to_string(),
            resolver_public_key: format!("0x{}", hex::encode(self.public_point())),
        }
    }

    /// Decode a recorded frame and recover the request json, checking that
    /// the frame echoes the registry key bytes.
    pub fn read_request(&self, frame: &[u8]) -> (resolver::ResolverRequest, JsonRequest) {
        let decoded = relayer::IncomingMessage::decode(frame).unwrap();
        assert_eq!(decoded.public_keys, vec![self.public_point().to_vec()]);

        let request = decoded.request.unwrap();
        let body = if request.encrypted {
            ecies::decrypt(&self.secret.serialize(), &request.payload).unwrap()
        } else {
            request.payload.clone()
        };

        let json = serde_json::from_slice(&body).unwrap();
        (request, json)
    }

    /// A response frame for `request`, encrypted under its ephemeral key.
    pub fn respond(&self, request: &resolver::ResolverRequest, response: &JsonResponse) -> Bytes {
        let body = serde_json::to_vec(response).unwrap();
        let payload = ecies::encrypt(&request.public_key, &body).unwrap();

        response_frame(resolver::ResolverResponse {
            id: request.id.clone(),
            encrypted: true,
            result: Some(resolver::resolver_response::Result::Payload(payload)),
        })
    }
}

/// A representative request.
pub fn wallet_request(id: &str) -> JsonRequest {
    JsonRequest {
        id: id.to_string(),
        method: "GetWalletBalance".to_string(),
        params: vec![
            "0xBd8fF71eC8126E6CD8f61941A42916E3f00F9f8a".to_string(),
            "usdt".to_string(),
        ],
    }
}

/// A successful response body.
pub fn ok_response(id: &str, result: serde_json::Value) -> JsonResponse {
    JsonResponse {
        id: id.to_string(),
        result,
        error: String::new(),
    }
}

/// Run an encrypting `execute` of [wallet_request] on a background task.
pub fn spawn_execute(
    client: &Arc<Client<DummyTransport>>,
    id: &str,
) -> tokio::task::JoinHandle<Result<JsonResponse>> {
    let client = client.clone();
    let request = wallet_request(id);
    tokio::spawn(async move { client.execute(&request, true).await })
}

/// Wrap a resolver response envelope into the relay frame.
pub fn response_frame(response: resolver::ResolverResponse) -> Bytes {
    relayer::OutgoingMessage {
        public_key: vec![],
        result: Some(relayer::outgoing_message::Result::Response(response)),
    }
    .encode_to_vec()
    .into()
}

/// Connect a client to a [TestResolver] through the dummy transport and a
/// scripted relay.
pub async fn connected_client(config: ClientConfig) -> (Arc<Client<DummyTransport>>, TestResolver) {
    let resolver = TestResolver::new();
    let signaling = ScriptedSignaling::new(SdpBehavior::Answer);
    let transport = DummyTransport::new(&config.ice_servers);

    let client =
        Client::init_with(transport, resolver.network_params(), signaling.boxed(), config)
            .await
            .unwrap();

    (Arc::new(client), resolver)
}

/// Poll until `count` frames were sent over the data channel.
pub async fn wait_for_frames(client: &Client<DummyTransport>, count: usize) -> Vec<Bytes> {
    for _ in 0..200 {
        let frames = client
            .transport()
            .sent_messages(client.session_id())
            .unwrap();
        if frames.len() >= count {
            return frames;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("never saw {count} sent frames");
}
