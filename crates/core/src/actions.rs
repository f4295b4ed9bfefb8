//! Action kinds, ledger records and typed action metadata.
//!
//! An [`ActionRecord`] is one immutable row of the append-only points ledger.
//! Its `action_type` is kept as the raw stored string so that a ledger written
//! by an older deployment (or a typo in a manual import) surfaces as an
//! explicit classification error instead of silently vanishing.
//!
//! Request handlers submit the typed [`UserAction`] instead, which carries only
//! the fields meaningful for its kind and converts into a record through
//! [`UserAction::into_record`].

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// Closed set of point-worthy actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    UploadResource,
    ReceiveUpvote,
    ReceiveDownvote,
    CastVote,
    ResourceDownloaded,
    CreateCollection,
    AddToCollection,
    ShareCollection,
    DailyLogin,
    AchievementUnlocked,
}

impl ActionKind {
    /// Every kind, in declaration order.
    pub const ALL: [ActionKind; 10] = [
        ActionKind::UploadResource,
        ActionKind::ReceiveUpvote,
        ActionKind::ReceiveDownvote,
        ActionKind::CastVote,
        ActionKind::ResourceDownloaded,
        ActionKind::CreateCollection,
        ActionKind::AddToCollection,
        ActionKind::ShareCollection,
        ActionKind::DailyLogin,
        ActionKind::AchievementUnlocked,
    ];

    /// String representation for database storage.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::UploadResource => "upload_resource",
            ActionKind::ReceiveUpvote => "receive_upvote",
            ActionKind::ReceiveDownvote => "receive_downvote",
            ActionKind::CastVote => "cast_vote",
            ActionKind::ResourceDownloaded => "resource_downloaded",
            ActionKind::CreateCollection => "create_collection",
            ActionKind::AddToCollection => "add_to_collection",
            ActionKind::ShareCollection => "share_collection",
            ActionKind::DailyLogin => "daily_login",
            ActionKind::AchievementUnlocked => "achievement_unlocked",
        }
    }

    /// Whether this kind reflects something the user did themselves.
    ///
    /// System-generated rows (achievement awards) count toward points but not
    /// toward activity days or `last_activity_at`.
    pub fn is_user_activity(self) -> bool {
        !matches!(self, ActionKind::AchievementUnlocked)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = CoreError;

    /// Parse a stored action type.
    ///
    /// An empty (or whitespace-only) value is a malformed record; anything
    /// else outside the enumeration is [`CoreError::UnknownActionKind`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::MalformedAction(
                "action record is missing its action type".into(),
            ));
        }
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == trimmed)
            .ok_or_else(|| CoreError::UnknownActionKind(trimmed.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ResourceType
// ---------------------------------------------------------------------------

/// The kind of study material a resource is. Modulates upvote awards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Notes,
    PastPaper,
    Slides,
    StudyGuide,
    Video,
    Other,
}

impl ResourceType {
    pub const ALL: [ResourceType; 6] = [
        ResourceType::Notes,
        ResourceType::PastPaper,
        ResourceType::Slides,
        ResourceType::StudyGuide,
        ResourceType::Video,
        ResourceType::Other,
    ];

    /// String representation for database storage.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceType::Notes => "notes",
            ResourceType::PastPaper => "past_paper",
            ResourceType::Slides => "slides",
            ResourceType::StudyGuide => "study_guide",
            ResourceType::Video => "video",
            ResourceType::Other => "other",
        }
    }
}

impl FromStr for ResourceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown resource type '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// ActionMetadata
// ---------------------------------------------------------------------------

/// Per-kind extra data attached to a ledger record.
///
/// Only `Extra` is an open key/value bag; it exists for analytics fields that
/// have no fixed shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionMetadata {
    #[default]
    None,
    Vote {
        voter_id: DbId,
    },
    Achievement {
        achievement_id: String,
        points_awarded: i64,
    },
    Extra {
        fields: BTreeMap<String, serde_json::Value>,
    },
}

// ---------------------------------------------------------------------------
// ActionRecord
// ---------------------------------------------------------------------------

/// One append-only ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub user_id: DbId,
    /// Raw stored action type; see [`ActionKind::from_str`].
    pub action_type: String,
    #[serde(default)]
    pub resource_id: Option<DbId>,
    #[serde(default)]
    pub collection_id: Option<DbId>,
    #[serde(default)]
    pub resource_type: Option<ResourceType>,
    #[serde(default)]
    pub metadata: ActionMetadata,
    pub occurred_at: Timestamp,
}

impl ActionRecord {
    /// Create a record of the given kind with no optional fields set.
    pub fn new(user_id: DbId, kind: ActionKind, occurred_at: Timestamp) -> Self {
        Self {
            user_id,
            action_type: kind.as_str().to_string(),
            resource_id: None,
            collection_id: None,
            resource_type: None,
            metadata: ActionMetadata::None,
            occurred_at,
        }
    }

    /// The ledger row written when an achievement is unlocked.
    pub fn achievement_unlocked(
        user_id: DbId,
        achievement_id: &str,
        points_awarded: i64,
        occurred_at: Timestamp,
    ) -> Self {
        Self::new(user_id, ActionKind::AchievementUnlocked, occurred_at).with_metadata(
            ActionMetadata::Achievement {
                achievement_id: achievement_id.to_string(),
                points_awarded,
            },
        )
    }

    /// Attach the resource the action concerns.
    pub fn with_resource(mut self, resource_id: DbId, resource_type: Option<ResourceType>) -> Self {
        self.resource_id = Some(resource_id);
        self.resource_type = resource_type;
        self
    }

    /// Attach the collection the action concerns.
    pub fn with_collection(mut self, collection_id: DbId) -> Self {
        self.collection_id = Some(collection_id);
        self
    }

    /// Set the metadata payload.
    pub fn with_metadata(mut self, metadata: ActionMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Parse the stored action type.
    pub fn kind(&self) -> Result<ActionKind, CoreError> {
        self.action_type.parse()
    }
}

// ---------------------------------------------------------------------------
// UserAction
// ---------------------------------------------------------------------------

/// Typed inbound action as submitted by request handlers.
///
/// Achievement awards are deliberately absent: they are only ever produced by
/// the achievement evaluator, never accepted from a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserAction {
    UploadResource {
        resource_id: DbId,
        resource_type: ResourceType,
    },
    ReceiveUpvote {
        resource_id: DbId,
        #[serde(default)]
        resource_type: Option<ResourceType>,
        voter_id: DbId,
    },
    ReceiveDownvote {
        resource_id: DbId,
        #[serde(default)]
        resource_type: Option<ResourceType>,
        voter_id: DbId,
    },
    CastVote {
        resource_id: DbId,
    },
    ResourceDownloaded {
        resource_id: DbId,
        #[serde(default)]
        resource_type: Option<ResourceType>,
    },
    CreateCollection {
        collection_id: DbId,
    },
    AddToCollection {
        collection_id: DbId,
        resource_id: DbId,
    },
    ShareCollection {
        collection_id: DbId,
    },
    DailyLogin,
}

impl UserAction {
    /// Parse an inbound JSON action.
    ///
    /// The `type` tag is checked first so an unrecognised kind reports
    /// [`CoreError::UnknownActionKind`] rather than a generic payload error.
    /// Achievement awards cannot be submitted.
    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        let raw = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        let kind: ActionKind = raw.parse()?;
        if !kind.is_user_activity() {
            return Err(CoreError::MalformedAction(format!(
                "'{kind}' is awarded by the system and cannot be submitted"
            )));
        }
        serde_json::from_value(value)
            .map_err(|e| CoreError::MalformedAction(format!("invalid '{kind}' action: {e}")))
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            UserAction::UploadResource { .. } => ActionKind::UploadResource,
            UserAction::ReceiveUpvote { .. } => ActionKind::ReceiveUpvote,
            UserAction::ReceiveDownvote { .. } => ActionKind::ReceiveDownvote,
            UserAction::CastVote { .. } => ActionKind::CastVote,
            UserAction::ResourceDownloaded { .. } => ActionKind::ResourceDownloaded,
            UserAction::CreateCollection { .. } => ActionKind::CreateCollection,
            UserAction::AddToCollection { .. } => ActionKind::AddToCollection,
            UserAction::ShareCollection { .. } => ActionKind::ShareCollection,
            UserAction::DailyLogin => ActionKind::DailyLogin,
        }
    }

    /// Convert into the ledger record credited to `user_id`.
    pub fn into_record(self, user_id: DbId, occurred_at: Timestamp) -> ActionRecord {
        let record = ActionRecord::new(user_id, self.kind(), occurred_at);
        match self {
            UserAction::UploadResource {
                resource_id,
                resource_type,
            } => record.with_resource(resource_id, Some(resource_type)),
            UserAction::ReceiveUpvote {
                resource_id,
                resource_type,
                voter_id,
            }
            | UserAction::ReceiveDownvote {
                resource_id,
                resource_type,
                voter_id,
            } => record
                .with_resource(resource_id, resource_type)
                .with_metadata(ActionMetadata::Vote { voter_id }),
            UserAction::CastVote { resource_id } => record.with_resource(resource_id, None),
            UserAction::ResourceDownloaded {
                resource_id,
                resource_type,
            } => record.with_resource(resource_id, resource_type),
            UserAction::CreateCollection { collection_id }
            | UserAction::ShareCollection { collection_id } => record.with_collection(collection_id),
            UserAction::AddToCollection {
                collection_id,
                resource_id,
            } => record
                .with_collection(collection_id)
                .with_resource(resource_id, None),
            UserAction::DailyLogin => record,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    // -- ActionKind parsing --

    #[test]
    fn every_kind_parses_from_its_own_string() {
        for kind in ActionKind::ALL {
            assert_eq!(kind.as_str().parse::<ActionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert_matches!(
            "bogus_action".parse::<ActionKind>(),
            Err(CoreError::UnknownActionKind(s)) if s == "bogus_action"
        );
    }

    #[test]
    fn empty_kind_is_malformed() {
        assert_matches!("".parse::<ActionKind>(), Err(CoreError::MalformedAction(_)));
        assert_matches!("   ".parse::<ActionKind>(), Err(CoreError::MalformedAction(_)));
    }

    #[test]
    fn kind_parsing_is_case_sensitive() {
        assert_matches!(
            "Upload_Resource".parse::<ActionKind>(),
            Err(CoreError::UnknownActionKind(_))
        );
    }

    #[test]
    fn achievement_awards_are_not_user_activity() {
        assert!(!ActionKind::AchievementUnlocked.is_user_activity());
        assert!(ActionKind::DailyLogin.is_user_activity());
    }

    // -- ResourceType --

    #[test]
    fn resource_type_round_trips_through_str() {
        for t in ResourceType::ALL {
            assert_eq!(t.as_str().parse::<ResourceType>().unwrap(), t);
        }
        assert_matches!("poster".parse::<ResourceType>(), Err(CoreError::Validation(_)));
    }

    // -- UserAction --

    #[test]
    fn upvote_carries_voter_metadata() {
        let record = UserAction::ReceiveUpvote {
            resource_id: 4,
            resource_type: Some(ResourceType::PastPaper),
            voter_id: 9,
        }
        .into_record(1, at());

        assert_eq!(record.action_type, "receive_upvote");
        assert_eq!(record.resource_id, Some(4));
        assert_eq!(record.resource_type, Some(ResourceType::PastPaper));
        assert_eq!(record.metadata, ActionMetadata::Vote { voter_id: 9 });
    }

    #[test]
    fn add_to_collection_sets_both_ids() {
        let record = UserAction::AddToCollection {
            collection_id: 3,
            resource_id: 8,
        }
        .into_record(1, at());
        assert_eq!(record.collection_id, Some(3));
        assert_eq!(record.resource_id, Some(8));
        assert_eq!(record.kind().unwrap(), ActionKind::AddToCollection);
    }

    #[test]
    fn user_action_deserializes_from_tagged_json() {
        let action: UserAction = serde_json::from_value(serde_json::json!({
            "type": "upload_resource",
            "resource_id": 12,
            "resource_type": "slides",
        }))
        .unwrap();
        assert_eq!(
            action,
            UserAction::UploadResource {
                resource_id: 12,
                resource_type: ResourceType::Slides,
            }
        );
    }

    #[test]
    fn user_action_rejects_achievement_type() {
        let parsed = serde_json::from_value::<UserAction>(serde_json::json!({
            "type": "achievement_unlocked",
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn from_json_distinguishes_unknown_from_malformed() {
        assert_matches!(
            UserAction::from_json(serde_json::json!({"type": "bogus_action"})),
            Err(CoreError::UnknownActionKind(s)) if s == "bogus_action"
        );
        assert_matches!(
            UserAction::from_json(serde_json::json!({"resource_id": 1})),
            Err(CoreError::MalformedAction(_))
        );
        assert_matches!(
            UserAction::from_json(serde_json::json!({"type": "upload_resource"})),
            Err(CoreError::MalformedAction(_))
        );
        assert_matches!(
            UserAction::from_json(serde_json::json!({"type": "achievement_unlocked"})),
            Err(CoreError::MalformedAction(_))
        );
        assert_eq!(
            UserAction::from_json(serde_json::json!({"type": "daily_login"})).unwrap(),
            UserAction::DailyLogin
        );
    }

    #[test]
    fn metadata_serializes_with_kind_tag() {
        let meta = ActionMetadata::Achievement {
            achievement_id: "first_upload".into(),
            points_awarded: 10,
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["kind"], "achievement");
        assert_eq!(json["achievement_id"], "first_upload");
        assert_eq!(
            serde_json::to_value(ActionMetadata::None).unwrap(),
            serde_json::json!({"kind": "none"})
        );
    }
}
