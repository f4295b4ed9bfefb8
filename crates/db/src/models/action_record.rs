//! Ledger row model and conversions to/from the core [`ActionRecord`].

use serde::Serialize;
use sqlx::FromRow;
use studyhub_core::actions::{ActionMetadata, ActionRecord, ResourceType};
use studyhub_core::types::{DbId, Timestamp};

/// A row from the `action_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActionRecordRow {
    pub id: DbId,
    pub user_id: DbId,
    pub action_type: String,
    pub resource_id: Option<DbId>,
    pub collection_id: Option<DbId>,
    pub resource_type: Option<String>,
    pub metadata: serde_json::Value,
    /// Award computed by the classifier when the row was appended.
    pub points: i64,
    pub occurred_at: Timestamp,
}

impl ActionRecordRow {
    /// Convert into the core record.
    ///
    /// The action type is passed through untouched so the classifier decides
    /// whether the row is usable. Unparseable `resource_type` or `metadata`
    /// values are dropped with a warning; an achievement row that loses its
    /// metadata this way is then rejected by the classifier.
    pub fn into_record(self) -> ActionRecord {
        let resource_type = self.resource_type.as_deref().and_then(|raw| {
            raw.parse::<ResourceType>()
                .map_err(|e| {
                    tracing::warn!(record_id = self.id, error = %e, "Ignoring unknown resource type");
                })
                .ok()
        });

        let metadata = serde_json::from_value::<ActionMetadata>(self.metadata)
            .unwrap_or_else(|e| {
                tracing::warn!(record_id = self.id, error = %e, "Ignoring unparseable action metadata");
                ActionMetadata::None
            });

        ActionRecord {
            user_id: self.user_id,
            action_type: self.action_type,
            resource_id: self.resource_id,
            collection_id: self.collection_id,
            resource_type,
            metadata,
            occurred_at: self.occurred_at,
        }
    }
}

/// DTO for appending a ledger row.
#[derive(Debug, Clone)]
pub struct CreateActionRecord {
    pub user_id: DbId,
    pub action_type: String,
    pub resource_id: Option<DbId>,
    pub collection_id: Option<DbId>,
    pub resource_type: Option<String>,
    pub metadata: serde_json::Value,
    pub points: i64,
    pub occurred_at: Timestamp,
}

impl CreateActionRecord {
    /// Build an insert from a classified core record.
    pub fn from_record(record: &ActionRecord, points: i64) -> Self {
        Self {
            user_id: record.user_id,
            action_type: record.action_type.clone(),
            resource_id: record.resource_id,
            collection_id: record.collection_id,
            resource_type: record.resource_type.map(|t| t.as_str().to_string()),
            metadata: serde_json::to_value(&record.metadata).unwrap_or_default(),
            points,
            occurred_at: record.occurred_at,
        }
    }
}
