//! Action classification: point awards and achievement categories.
//!
//! The point table is fixed at build time. Every award in the system flows
//! through [`classify`], so no call site can compute points on its own.

use serde::{Deserialize, Serialize};

use crate::actions::{ActionKind, ActionMetadata, ActionRecord, ResourceType, UserAction};
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Point table
// ---------------------------------------------------------------------------

pub const UPLOAD_RESOURCE_POINTS: i64 = 10;
pub const RECEIVE_UPVOTE_POINTS: i64 = 5;
/// Downvotes are a reputation penalty, not a zero award.
pub const RECEIVE_DOWNVOTE_POINTS: i64 = -2;
pub const CAST_VOTE_POINTS: i64 = 1;
pub const RESOURCE_DOWNLOADED_POINTS: i64 = 1;
pub const CREATE_COLLECTION_POINTS: i64 = 5;
pub const ADD_TO_COLLECTION_POINTS: i64 = 1;
pub const SHARE_COLLECTION_POINTS: i64 = 3;
pub const DAILY_LOGIN_POINTS: i64 = 1;

/// Extra upvote points for a past paper.
pub const PAST_PAPER_UPVOTE_BONUS: i64 = 2;
/// Extra upvote points for a study guide.
pub const STUDY_GUIDE_UPVOTE_BONUS: i64 = 1;

// ---------------------------------------------------------------------------
// AchievementCategory
// ---------------------------------------------------------------------------

/// Which family of achievements an action feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Contribution,
    Community,
    Engagement,
    Curation,
    Milestone,
}

impl AchievementCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            AchievementCategory::Contribution => "contribution",
            AchievementCategory::Community => "community",
            AchievementCategory::Engagement => "engagement",
            AchievementCategory::Curation => "curation",
            AchievementCategory::Milestone => "milestone",
        }
    }
}

/// Category an action kind triggers.
pub fn category_for(kind: ActionKind) -> AchievementCategory {
    match kind {
        ActionKind::UploadResource => AchievementCategory::Contribution,
        ActionKind::ReceiveUpvote | ActionKind::ReceiveDownvote | ActionKind::CastVote => {
            AchievementCategory::Community
        }
        ActionKind::ResourceDownloaded | ActionKind::DailyLogin => AchievementCategory::Engagement,
        ActionKind::CreateCollection
        | ActionKind::AddToCollection
        | ActionKind::ShareCollection => AchievementCategory::Curation,
        ActionKind::AchievementUnlocked => AchievementCategory::Milestone,
    }
}

/// Fixed award for a kind, before any modulation.
///
/// Returns `None` for [`ActionKind::AchievementUnlocked`], whose award is
/// carried by the record's metadata.
pub fn base_points(kind: ActionKind) -> Option<i64> {
    match kind {
        ActionKind::UploadResource => Some(UPLOAD_RESOURCE_POINTS),
        ActionKind::ReceiveUpvote => Some(RECEIVE_UPVOTE_POINTS),
        ActionKind::ReceiveDownvote => Some(RECEIVE_DOWNVOTE_POINTS),
        ActionKind::CastVote => Some(CAST_VOTE_POINTS),
        ActionKind::ResourceDownloaded => Some(RESOURCE_DOWNLOADED_POINTS),
        ActionKind::CreateCollection => Some(CREATE_COLLECTION_POINTS),
        ActionKind::AddToCollection => Some(ADD_TO_COLLECTION_POINTS),
        ActionKind::ShareCollection => Some(SHARE_COLLECTION_POINTS),
        ActionKind::DailyLogin => Some(DAILY_LOGIN_POINTS),
        ActionKind::AchievementUnlocked => None,
    }
}

/// Upvote bonus for the type of resource that was upvoted.
pub fn upvote_bonus(resource_type: Option<ResourceType>) -> i64 {
    match resource_type {
        Some(ResourceType::PastPaper) => PAST_PAPER_UPVOTE_BONUS,
        Some(ResourceType::StudyGuide) => STUDY_GUIDE_UPVOTE_BONUS,
        _ => 0,
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Result of classifying one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub kind: ActionKind,
    pub points: i64,
    pub category: AchievementCategory,
}

/// Classify a ledger record.
///
/// Fails with [`CoreError::UnknownActionKind`] for action types outside the
/// enumeration and [`CoreError::MalformedAction`] for records missing their
/// type or an achievement award payload. Never falls back to zero points.
pub fn classify(record: &ActionRecord) -> Result<Classification, CoreError> {
    let kind = record.kind()?;
    let points = award(kind, record.resource_type, &record.metadata)?;
    Ok(Classification {
        kind,
        points,
        category: category_for(kind),
    })
}

/// Classify a typed inbound action without touching the ledger.
pub fn calculate_points(action: &UserAction) -> Result<Classification, CoreError> {
    let kind = action.kind();
    let resource_type = match action {
        UserAction::UploadResource { resource_type, .. } => Some(*resource_type),
        UserAction::ReceiveUpvote { resource_type, .. }
        | UserAction::ReceiveDownvote { resource_type, .. }
        | UserAction::ResourceDownloaded { resource_type, .. } => *resource_type,
        _ => None,
    };
    let points = award(kind, resource_type, &ActionMetadata::None)?;
    Ok(Classification {
        kind,
        points,
        category: category_for(kind),
    })
}

fn award(
    kind: ActionKind,
    resource_type: Option<ResourceType>,
    metadata: &ActionMetadata,
) -> Result<i64, CoreError> {
    match kind {
        ActionKind::ReceiveUpvote => Ok(RECEIVE_UPVOTE_POINTS + upvote_bonus(resource_type)),
        ActionKind::AchievementUnlocked => match metadata {
            ActionMetadata::Achievement { points_awarded, .. } if *points_awarded >= 0 => {
                Ok(*points_awarded)
            }
            ActionMetadata::Achievement { achievement_id, .. } => Err(CoreError::MalformedAction(
                format!("achievement '{achievement_id}' has a negative award"),
            )),
            _ => Err(CoreError::MalformedAction(
                "achievement_unlocked record without achievement metadata".into(),
            )),
        },
        other => base_points(other).ok_or_else(|| {
            CoreError::Internal(format!("no point rule for action kind '{other}'"))
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
