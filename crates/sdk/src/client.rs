#![warn(missing_docs)]
//! The client: one negotiated connection to a relayer, multiplexing
//! encrypted requests to resolvers over its data channel.

use std::sync::Arc;

use async_trait::async_trait;
use prost::Message;
use relaynet_proto::relayer;
use relaynet_proto::resolver;
use relaynet_transport::core::callback::CallbackError;
use relaynet_transport::core::callback::TransportCallback;
use relaynet_transport::core::transport::ConnectionInterface;
use relaynet_transport::core::transport::DataChannelState;
use relaynet_transport::core::transport::SessionDescription;
use relaynet_transport::core::transport::TransportInterface;
use relaynet_transport::error::Error as TransportError;

use crate::crypto::KeyPair;
use crate::crypto::ResolverKey;
use crate::error::Error;
use crate::error::Result;
use crate::negotiation::NegotiationOutcome;
use crate::negotiation::Negotiator;
use crate::pending::PendingRequests;
use crate::registry;
use crate::signaling::BoxedSignaling;
use crate::signaling::HttpSignalingClient;
use crate::signaling::SignalingInterface;
use crate::types::ClientConfig;
use crate::types::ClientParams;
use crate::types::JsonRequest;
use crate::types::JsonResponse;
use crate::types::NetworkParams;

/// A client holding one connection to a relayer.
///
/// [Client::init] looks up the relayer in the on-chain registry, negotiates
/// a peer connection through its HTTP signaling endpoints and resolves once
/// the data channel is open. After that, [Client::execute] may be called
/// any number of times concurrently; responses are correlated to their
/// requests by id.
///
/// The connection capability is injected as `T`, which keeps the client
/// independent of any concrete WebRTC stack.
pub struct Client<T> {
    transport: Arc<T>,
    session_id: String,
    network_params: NetworkParams,
    resolver_key: ResolverKey,
    pending: Arc<PendingRequests>,
    config: ClientConfig,
}

impl<T> Client<T>
where T: TransportInterface<Sdp = SessionDescription, Error = TransportError> + 'static
{
    /// Look up the relayer of `params.contract_address` through
    /// `params.provider_url`, then connect to it.
    ///
    /// The transport should be constructed from the same `config`, e.g. from
    /// `config.ice_servers`.
    pub async fn init(transport: T, params: &ClientParams, config: ClientConfig) -> Result<Self> {
        let network_params = registry::fetch_network_params(params).await?;
        let signaling = HttpSignalingClient::new(&network_params.relayer_address).boxed();
        Self::init_with(transport, network_params, signaling, config).await
    }

    /// Connect with pre-fetched network parameters and an arbitrary
    /// signaling implementation.
    pub async fn init_with(
        transport: T,
        network_params: NetworkParams,
        signaling: BoxedSignaling,
        config: ClientConfig,
    ) -> Result<Self> {
        let resolver_key = ResolverKey::parse(&network_params.resolver_public_key)?;
        let session_id = uuid::Uuid::new_v4().to_string();
        let transport = Arc::new(transport);
        let pending = Arc::new(PendingRequests::default());

        let negotiator = Arc::new(Negotiator::new(
            session_id.clone(),
            transport.clone(),
            signaling,
        ));
        let notifier = negotiator.notifier();

        let callback = ClientCallback {
            negotiator,
            pending: pending.clone(),
        };

        tracing::info!(
            "Connecting session {session_id} to relayer {}",
            network_params.relayer_address
        );
        transport
            .new_connection(&session_id, &config.channel_label, callback.boxed())
            .await?;

        let outcome = tokio::time::timeout(config.negotiation_timeout, notifier).await;
        let client = Self {
            transport,
            session_id,
            network_params,
            resolver_key,
            pending,
            config,
        };

        match outcome {
            Ok(NegotiationOutcome::Open) => {
                tracing::info!("Session {} is open", client.session_id);
                Ok(client)
            }
            Ok(NegotiationOutcome::ChannelClosed) => {
                client.teardown().await;
                Err(Error::Negotiation(
                    "data channel closed before opening".to_string(),
                ))
            }
            Ok(NegotiationOutcome::Failed(reason)) => {
                client.teardown().await;
                Err(Error::Negotiation(reason))
            }
            Err(_elapsed) => {
                client.teardown().await;
                Err(Error::NegotiationTimeout)
            }
        }
    }

    /// Send `request` to a resolver and wait for the matching response.
    ///
    /// With `should_encrypt` the request body is encrypted with the resolver
    /// public key. Either way an ephemeral key pair of the same kind is
    /// attached so the resolver can encrypt its response.
    ///
    /// A json-level failure reported by the resolver inside the response
    /// body resolves normally; the caller inspects [JsonResponse::error].
    /// An envelope-level failure rejects with [Error::Remote].
    pub async fn execute(
        &self,
        request: &JsonRequest,
        should_encrypt: bool,
    ) -> Result<JsonResponse> {
        // A closed client has no connection any more; report that the same
        // way as a channel that is not open yet.
        let Ok(conn) = self.transport.connection(&self.session_id) else {
            return Err(Error::ChannelNotOpen);
        };
        if conn.data_channel_state() != DataChannelState::Open {
            return Err(Error::ChannelNotOpen);
        }

        let plaintext = serde_json::to_vec(request)?;
        let payload = if should_encrypt {
            self.resolver_key.encrypt(&plaintext)?
        } else {
            plaintext
        };

        let ephemeral_key = KeyPair::generate(self.resolver_key.kind()).await?;
        let public_key = ephemeral_key.public_wire_bytes()?;

        let frame = relayer::IncomingMessage {
            public_keys: vec![self.resolver_key.registry_bytes().to_vec()],
            request: Some(resolver::ResolverRequest {
                id: request.id.clone(),
                encrypted: should_encrypt,
                payload,
                public_key,
            }),
        };

        tracing::debug!(
            "Sending request {} (method {}, encrypted: {should_encrypt})",
            request.id,
            request.method
        );

        // Register before sending, lest a fast response find no entry.
        let receiver = self.pending.insert(&request.id, ephemeral_key);

        if let Err(e) = conn.send_message(frame.encode_to_vec().into()).await {
            self.pending.take(&request.id);
            return Err(match e {
                TransportError::DataChannelNotOpen => Error::ChannelNotOpen,
                other => Error::Transport(other),
            });
        }

        match tokio::time::timeout(self.config.request_timeout, receiver).await {
            Ok(Ok(outcome)) => outcome,
            // The responder was dropped without settling, which happens when
            // a newer request reused this id.
            Ok(Err(_canceled)) => Err(Error::RequestSuperseded),
            Err(_elapsed) => {
                self.pending.take(&request.id);
                Err(Error::RequestTimeout)
            }
        }
    }

    /// Close the connection. In-flight requests are rejected with
    /// [Error::ChannelClosed] through the close event of the data channel.
    pub async fn close(&self) -> Result<()> {
        self.transport.close_connection(&self.session_id).await?;
        Ok(())
    }

    /// The session id, which doubles as the connection id of the transport.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The network parameters this client was connected with.
    pub fn network_params(&self) -> &NetworkParams {
        &self.network_params
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    async fn teardown(&self) {
        if let Err(e) = self.transport.close_connection(&self.session_id).await {
            tracing::warn!("Failed to close connection {}: {e}", self.session_id);
        }
    }
}

/// Connection callback wiring transport events into negotiation and
/// response dispatch.
struct ClientCallback<T> {
    negotiator: Arc<Negotiator<T>>,
    pending: Arc<PendingRequests>,
}

#[async_trait]
impl<T> TransportCallback for ClientCallback<T>
where T: TransportInterface<Sdp = SessionDescription, Error = TransportError> + 'static
{
    async fn on_negotiation_needed(&self, _cid: &str) -> std::result::Result<(), CallbackError> {
        self.negotiator.handle_negotiation_needed();
        Ok(())
    }

    async fn on_ice_candidate(
        &self,
        _cid: &str,
        candidate: &str,
    ) -> std::result::Result<(), CallbackError> {
        self.negotiator.handle_candidate(candidate).await?;
        Ok(())
    }

    async fn on_data_channel_open(&self, cid: &str) -> std::result::Result<(), CallbackError> {
        tracing::info!("Data channel of connection {cid} is open");
        self.negotiator.handle_open();
        Ok(())
    }

    async fn on_data_channel_close(&self, cid: &str) -> std::result::Result<(), CallbackError> {
        tracing::info!("Data channel of connection {cid} closed");
        self.negotiator.handle_close();
        self.pending.drain_with(|| Error::ChannelClosed);
        Ok(())
    }

    async fn on_message(&self, _cid: &str, msg: &[u8]) -> std::result::Result<(), CallbackError> {
        dispatch_frame(&self.pending, msg)?;
        Ok(())
    }
}

/// Decode one inbound frame and settle the pending request it addresses.
///
/// Frames that address no pending request are dropped. Frames that carry no
/// request id at all cannot settle anything and are reported as protocol
/// errors, which the transport logs.
fn dispatch_frame(pending: &PendingRequests, msg: &[u8]) -> Result<()> {
    let frame = relayer::OutgoingMessage::decode(msg)?;

    let response = match frame.result {
        Some(relayer::outgoing_message::Result::Response(response)) => response,
        Some(relayer::outgoing_message::Result::Error(error)) => {
            return Err(Error::Protocol(format!("relayer reported: {error}")));
        }
        None => {
            return Err(Error::Protocol("frame with unset result".to_string()));
        }
    };

    if response.id.is_empty() {
        return Err(Error::Protocol("response without request id".to_string()));
    }

    let Some(entry) = pending.take(&response.id) else {
        tracing::debug!(
            "No pending request {}, dropping late or duplicate response",
            response.id
        );
        return Ok(());
    };

    tracing::debug!("Settling request {}", response.id);
    let outcome = decode_response(response, &entry.ephemeral_key);
    entry.respond(outcome);
    Ok(())
}

/// Recover the json body of a response envelope.
fn decode_response(
    response: resolver::ResolverResponse,
    ephemeral_key: &KeyPair,
) -> Result<JsonResponse> {
    let payload = match response.result {
        Some(resolver::resolver_response::Result::Payload(payload)) => payload,
        Some(resolver::resolver_response::Result::Error(error)) => {
            tracing::warn!("Request {} failed remotely: {error}", response.id);
            return Err(Error::Remote(error.message));
        }
        None => {
            return Err(Error::Protocol("response with unset result".to_string()));
        }
    };

    if response.encrypted {
        let plaintext = ephemeral_key.decrypt(&payload)?;
        return Ok(serde_json::from_slice(&plaintext)?);
    }

    // Not every resolver deployment sets the encrypted flag on encrypted
    // payloads. Probe for json first and fall back to decryption.
    match serde_json::from_slice(&payload) {
        Ok(response) => Ok(response),
        Err(_) => {
            let plaintext = ephemeral_key.decrypt(&payload)?;
            Ok(serde_json::from_slice(&plaintext)?)
        }
    }
}
