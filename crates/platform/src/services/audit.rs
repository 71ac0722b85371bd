//! Fire-and-forget audit trail.
//!
//! Mutations record who did what to which entity. Writes happen off the
//! request path: a failed audit insert is logged and dropped, never
//! surfaced to the caller.

use sqlx::PgPool;

use herba_core::TenantId;

use crate::db;
use crate::models::CurrentActor;

/// A single audit fact.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    /// Verb, e.g. `tenant.create` or `cart.add`.
    pub action: String,
    /// Entity kind, e.g. `tenant` or `order`.
    pub entity_type: String,
    pub entity_id: String,
    pub actor_id: Option<String>,
    pub actor_email: Option<String>,
    pub tenant_id: Option<String>,
    /// Free-form context; never credentials or secrets.
    pub metadata: serde_json::Value,
}

impl AuditEntry {
    /// Build an entry for an authenticated actor.
    #[must_use]
    pub fn new(action: &str, entity_type: &str, entity_id: &str, actor: &CurrentActor) -> Self {
        Self {
            action: action.to_owned(),
            entity_type: entity_type.to_owned(),
            entity_id: entity_id.to_owned(),
            actor_id: Some(actor.id.to_string()),
            actor_email: Some(actor.email.to_string()),
            tenant_id: actor.tenant_id.as_ref().map(TenantId::to_string),
            metadata: serde_json::Value::Null,
        }
    }

    /// Attach free-form metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Audit log writer.
#[derive(Clone)]
pub struct AuditSink {
    pool: PgPool,
}

impl AuditSink {
    /// Create a sink over the given pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record an entry off the request path.
    ///
    /// Spawned onto the runtime; insert failures are logged, not returned.
    pub fn record(&self, entry: AuditEntry) {
        let pool = self.pool.clone();
        tokio::spawn(async move {
            if let Err(e) = db::audit::insert(&pool, &entry).await {
                tracing::error!(
                    error = %e,
                    action = %entry.action,
                    entity_type = %entry.entity_type,
                    entity_id = %entry.entity_id,
                    "Failed to write audit log entry"
                );
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use herba_core::{Email, Role, UserId};

    use super::*;

    fn staff() -> CurrentActor {
        CurrentActor {
            id: UserId::new("user-1"),
            email: Email::parse("staff@example.com").unwrap(),
            role: Role::TenantAdmin,
            tenant_id: Some(TenantId::new("acme")),
        }
    }

    #[test]
    fn actor_entry_carries_identity_and_tenant_scope() {
        let entry = AuditEntry::new("cart.add", "cart", "user-1", &staff());

        assert_eq!(entry.action, "cart.add");
        assert_eq!(entry.actor_id.as_deref(), Some("user-1"));
        assert_eq!(entry.actor_email.as_deref(), Some("staff@example.com"));
        assert_eq!(entry.tenant_id.as_deref(), Some("acme"));
    }

    #[test]
    fn metadata_is_attached_verbatim() {
        let entry = AuditEntry::new("cart.add", "cart", "user-1", &staff())
            .with_metadata(serde_json::json!({"strain_id": "s1", "quantity": 2}));

        assert_eq!(entry.metadata["quantity"], 2);
    }
}
