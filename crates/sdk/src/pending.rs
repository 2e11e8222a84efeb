//! Bookkeeping of in-flight requests.

use dashmap::DashMap;
use futures::channel::oneshot;

use crate::crypto::KeyPair;
use crate::error::Error;
use crate::error::Result;
use crate::types::JsonResponse;

/// One in-flight request: where its outcome must be delivered and the key
/// that can read its response.
pub(crate) struct PendingRequest {
    responder: oneshot::Sender<Result<JsonResponse>>,
    pub ephemeral_key: KeyPair,
}

impl PendingRequest {
    /// Deliver the outcome. The caller may be gone already, which is fine.
    pub fn respond(self, outcome: Result<JsonResponse>) {
        let _ = self.responder.send(outcome);
    }
}

/// The in-flight request table of one client.
///
/// Keyed by request id. Reusing an id while the previous request is still
/// pending evicts the earlier entry, whose caller observes
/// [Error::RequestSuperseded](crate::error::Error::RequestSuperseded).
#[derive(Default)]
pub(crate) struct PendingRequests {
    table: DashMap<String, PendingRequest>,
}

impl PendingRequests {
    /// Register a request under `id` and return the receiver its outcome
    /// will arrive on.
    pub fn insert(
        &self,
        id: &str,
        ephemeral_key: KeyPair,
    ) -> oneshot::Receiver<Result<JsonResponse>> {
        let (responder, receiver) = oneshot::channel();
        let pending = PendingRequest {
            responder,
            ephemeral_key,
        };

        if self.table.insert(id.to_string(), pending).is_some() {
            tracing::warn!("Request id {id} was already in flight, superseding it");
        }

        receiver
    }

    /// Remove and return the entry registered under `id`, if any.
    pub fn take(&self, id: &str) -> Option<PendingRequest> {
        self.table.remove(id).map(|(_, pending)| pending)
    }

    /// Reject every pending request with an error built by `make_error` and
    /// clear the table.
    pub fn drain_with(&self, make_error: impl Fn() -> Error) {
        let ids: Vec<String> = self.table.iter().map(|entry| entry.key().clone()).collect();
        for id in ids {
            if let Some(pending) = self.take(&id) {
                pending.respond(Err(make_error()));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
