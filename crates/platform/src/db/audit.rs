//! Append-only audit log writes.

use sqlx::PgPool;

use super::RepositoryError;
use crate::services::audit::AuditEntry;

/// Insert an audit log entry.
///
/// Entries are append-only facts; nothing in this core updates or deletes
/// them.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the insert fails.
pub async fn insert(pool: &PgPool, entry: &AuditEntry) -> Result<(), RepositoryError> {
    sqlx::query(
        "INSERT INTO audit_log \
         (action, entity_type, entity_id, actor_id, actor_email, tenant_id, metadata) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&entry.action)
    .bind(&entry.entity_type)
    .bind(&entry.entity_id)
    .bind(&entry.actor_id)
    .bind(&entry.actor_email)
    .bind(&entry.tenant_id)
    .bind(&entry.metadata)
    .execute(pool)
    .await?;

    Ok(())
}
