//! Call Session Registry
//!
//! Mints the durable identity for each call attempt and persists it, together with
//! the caller-supplied recipient context, before the call is placed.

use crate::error::CallError;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Opaque data about the recipient, carried through to the agent untouched.
///
/// Any JSON value is accepted; no schema is imposed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientContext(pub Value);

impl RecipientContext {
    pub fn into_value(self) -> Value {
        self.0
    }
}

/// One attempted outbound call. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSession {
    pub context_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub recipient_data: Option<RecipientContext>,
}

/// Durable storage for call sessions. Insert-only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, session: &CallSession) -> Result<()>;
}

/// The authoritative source of session identifiers.
#[derive(Clone)]
pub struct SessionRegistry {
    store: Arc<dyn SessionStore>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Creates and persists a new session, returning its identifier.
    pub async fn create(
        &self,
        recipient_context: Option<RecipientContext>,
    ) -> Result<Uuid, CallError> {
        let session = CallSession {
            context_id: Uuid::new_v4(),
            created_at: Utc::now(),
            recipient_data: recipient_context,
        };

        self.store
            .insert(&session)
            .await
            .map_err(CallError::Persistence)?;

        debug!(context_id = %session.context_id, "Call session persisted");
        Ok(session.context_id)
    }
}

/// A process-local `SessionStore` for development and tests.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, CallSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, context_id: Uuid) -> Option<CallSession> {
        self.sessions.read().await.get(&context_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: &CallSession) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.context_id) {
            anyhow::bail!("duplicate context_id {}", session.context_id);
        }
        sessions.insert(session.context_id, session.clone());
        Ok(())
    }
}
