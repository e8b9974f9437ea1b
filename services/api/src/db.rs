//! Data Access Layer
//!
//! Postgres-backed storage for call sessions. Records are insert-only; retention
//! and expiry are handled outside this service.

use anyhow::Result;
use async_trait::async_trait;
use callbridge_core::session::{CallSession, RecipientContext, SessionStore};
use sqlx::PgPool;

/// A wrapper around the `PgPool` to provide a clear data access interface.
#[derive(Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    /// Creates a new `Db` instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs all pending `sqlx` migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for Db {
    async fn insert(&self, session: &CallSession) -> Result<()> {
        let recipient_data = session
            .recipient_data
            .clone()
            .map(RecipientContext::into_value);

        sqlx::query(
            "INSERT INTO call_contexts (context_id, created_at, recipient_data) VALUES ($1, $2, $3)",
        )
        .bind(session.context_id)
        .bind(session.created_at)
        .bind(recipient_data)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
