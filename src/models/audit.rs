use chrono::{DateTime, Utc};
use serde::Serialize;

/// Append-only record written on every status or badge mutation.
/// Entries are never updated or deleted.
#[derive(Debug, Default, Clone, Serialize)]
pub struct AuditLogEntry {
    pub id: i64,
    pub entity_type: String,
    pub entity_id: i64,
    pub action: String,
    pub meta: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    pub fn new(entity_type: &str, entity_id: i64, action: &str, meta: serde_json::Value) -> Self {
        Self {
            id: 0,
            entity_type: entity_type.to_string(),
            entity_id,
            action: action.to_string(),
            meta,
            created_at: Utc::now(),
        }
    }
}
