//! Notification dispatch for entry prompts.

use async_trait::async_trait;
use gatelog_store::{EventStore, StoreError};
use gatelog_types::{ActorId, LogId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Payload delivered to the visiting actor's device.
///
/// Mirrors what the device needs to deep-link into the reason form:
/// the log id, the actor, and the `submit_reason` action marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushPayload {
    /// Record the prompt refers to.
    pub log_id: LogId,
    /// Addressed actor.
    pub actor_id: ActorId,
    /// Client-side action selector.
    pub action: String,
    /// Human-readable title.
    pub title: String,
    /// Human-readable body.
    pub body: String,
}

impl PushPayload {
    /// Builds the entry prompt for a visit.
    #[must_use]
    pub fn entry_prompt(log_id: LogId, actor_id: ActorId) -> Self {
        Self {
            log_id,
            actor_id,
            action: "submit_reason".to_string(),
            title: "Welcome!".to_string(),
            body: "Please submit your reason for visiting.".to_string(),
        }
    }
}

/// Receipt returned by the push provider on successful delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt(pub String);

/// Failure from the external push provider.
///
/// Transient by convention; the provider runs its own retry/backoff,
/// so this layer logs and drops.
#[derive(Debug, Clone, Error)]
#[error("push provider failure: {0}")]
pub struct ProviderError(pub String);

impl gatelog_types::ErrorCode for ProviderError {
    fn code(&self) -> &'static str {
        "DISPATCH_PROVIDER"
    }

    fn is_recoverable(&self) -> bool {
        true
    }
}

/// External push-notification provider.
#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Delivers a payload to a destination token.
    async fn send(
        &self,
        destination: &str,
        payload: &PushPayload,
    ) -> Result<DeliveryReceipt, ProviderError>;
}

/// Why a dispatch was skipped without calling the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The actor has no push destination (or no profile at all).
    /// Informational, not an error.
    NoDestination,
}

/// Outcome of one dispatch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult {
    /// Provider accepted the notification.
    Sent(DeliveryReceipt),
    /// No provider call was made.
    Skipped(SkipReason),
    /// Provider rejected or failed; not retried here.
    Failed(String),
}

/// Resolves the actor's push destination and delivers the entry prompt.
///
/// Exactly-once intent is enforced one level up: the ingestion trigger
/// never asks this component to dispatch the same log id twice.
pub struct NotificationDispatcher {
    store: Arc<dyn EventStore>,
    provider: Arc<dyn PushProvider>,
}

impl NotificationDispatcher {
    /// Creates a dispatcher over the given store and provider.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>, provider: Arc<dyn PushProvider>) -> Self {
        Self { store, provider }
    }

    /// Dispatches the entry prompt for one visit.
    ///
    /// Absence of a push destination is a skip, not an error; provider
    /// failure is reported in the result, never propagated.
    ///
    /// # Errors
    ///
    /// Only store errors surface as `Err` — the caller treats them the
    /// same as any other side-effect failure (log and drop).
    pub async fn dispatch_entry_prompt(
        &self,
        log_id: LogId,
        actor_id: &ActorId,
    ) -> Result<DispatchResult, StoreError> {
        let Some(profile) = self.store.get_actor(actor_id).await? else {
            debug!(actor = %actor_id, %log_id, "no profile, prompt skipped");
            return Ok(DispatchResult::Skipped(SkipReason::NoDestination));
        };
        let Some(destination) = profile.push_destination else {
            debug!(actor = %actor_id, %log_id, "no push destination, prompt skipped");
            return Ok(DispatchResult::Skipped(SkipReason::NoDestination));
        };

        let payload = PushPayload::entry_prompt(log_id, actor_id.clone());
        match self.provider.send(&destination, &payload).await {
            Ok(receipt) => {
                info!(actor = %actor_id, %log_id, "entry prompt delivered");
                Ok(DispatchResult::Sent(receipt))
            }
            Err(e) => Ok(DispatchResult::Failed(e.to_string())),
        }
    }
}
