//! Achievement catalog and evaluation.
//!
//! Achievements are one-way: once an id is in the unlocked set it is never
//! re-evaluated, even if a later downvote pulls the user back under the
//! threshold that earned it.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::actions::ActionKind;
use crate::points::AchievementCategory;
use crate::progress::UserProgress;

// ---------------------------------------------------------------------------
// Criterion
// ---------------------------------------------------------------------------

/// Threshold predicate over [`UserProgress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AchievementCriterion {
    TotalPoints { points: i64 },
    Level { level: u32 },
    ActionCount { kind: ActionKind, count: u32 },
    Streak { days: u32 },
}

impl AchievementCriterion {
    pub fn is_met(&self, progress: &UserProgress) -> bool {
        match *self {
            AchievementCriterion::TotalPoints { points } => progress.total_points >= points,
            AchievementCriterion::Level { level } => progress.level >= level,
            AchievementCriterion::ActionCount { kind, count } => {
                progress.action_count(kind) >= count
            }
            AchievementCriterion::Streak { days } => progress.longest_streak_days >= days,
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A static achievement definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub criterion: AchievementCriterion,
    pub points_awarded: i64,
    pub category: AchievementCategory,
}

const fn def(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    criterion: AchievementCriterion,
    points_awarded: i64,
    category: AchievementCategory,
) -> AchievementDefinition {
    AchievementDefinition {
        id,
        title,
        description,
        criterion,
        points_awarded,
        category,
    }
}

static DEFAULT_CATALOG: [AchievementDefinition; 12] = [
    def(
        "first_upload",
        "First Upload",
        "Share your first study resource",
        AchievementCriterion::ActionCount { kind: ActionKind::UploadResource, count: 1 },
        10,
        AchievementCategory::Contribution,
    ),
    def(
        "prolific_uploader",
        "Prolific Uploader",
        "Share 10 study resources",
        AchievementCriterion::ActionCount { kind: ActionKind::UploadResource, count: 10 },
        50,
        AchievementCategory::Contribution,
    ),
    def(
        "well_received",
        "Well Received",
        "Receive 10 upvotes on your resources",
        AchievementCriterion::ActionCount { kind: ActionKind::ReceiveUpvote, count: 10 },
        25,
        AchievementCategory::Community,
    ),
    def(
        "crowd_favorite",
        "Crowd Favorite",
        "Receive 50 upvotes on your resources",
        AchievementCriterion::ActionCount { kind: ActionKind::ReceiveUpvote, count: 50 },
        100,
        AchievementCategory::Community,
    ),
    def(
        "active_voter",
        "Active Voter",
        "Vote on 25 resources",
        AchievementCriterion::ActionCount { kind: ActionKind::CastVote, count: 25 },
        15,
        AchievementCategory::Community,
    ),
    def(
        "in_demand",
        "In Demand",
        "Have your resources downloaded 100 times",
        AchievementCriterion::ActionCount { kind: ActionKind::ResourceDownloaded, count: 100 },
        50,
        AchievementCategory::Engagement,
    ),
    def(
        "curator",
        "Curator",
        "Create your first collection",
        AchievementCriterion::ActionCount { kind: ActionKind::CreateCollection, count: 1 },
        10,
        AchievementCategory::Curation,
    ),
    def(
        "sharing_is_caring",
        "Sharing is Caring",
        "Share collections 5 times",
        AchievementCriterion::ActionCount { kind: ActionKind::ShareCollection, count: 5 },
        20,
        AchievementCategory::Curation,
    ),
    def(
        "week_streak",
        "Week Streak",
        "Be active seven days in a row",
        AchievementCriterion::Streak { days: 7 },
        30,
        AchievementCategory::Engagement,
    ),
    def(
        "rising_star",
        "Rising Star",
        "Earn 100 points",
        AchievementCriterion::TotalPoints { points: 100 },
        0,
        AchievementCategory::Milestone,
    ),
    def(
        "point_collector",
        "Point Collector",
        "Earn 1000 points",
        AchievementCriterion::TotalPoints { points: 1000 },
        0,
        AchievementCategory::Milestone,
    ),
    def(
        "halfway_there",
        "Halfway There",
        "Reach level 5",
        AchievementCriterion::Level { level: 5 },
        25,
        AchievementCategory::Milestone,
    ),
];

/// The deployed achievement catalog.
pub fn default_catalog() -> &'static [AchievementDefinition] {
    &DEFAULT_CATALOG
}

/// Look up a catalog entry by id.
pub fn find<'a>(catalog: &'a [AchievementDefinition], id: &str) -> Option<&'a AchievementDefinition> {
    catalog.iter().find(|d| d.id == id)
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Return catalog entries that are satisfied now and not already unlocked.
///
/// Result preserves catalog order. An empty vector means nothing new.
pub fn evaluate(
    progress: &UserProgress,
    catalog: &[AchievementDefinition],
    already_unlocked: &BTreeSet<String>,
) -> Vec<AchievementDefinition> {
    catalog
        .iter()
        .filter(|d| !already_unlocked.contains(d.id))
        .filter(|d| d.criterion.is_met(progress))
        .cloned()
        .collect()
}

/// Outcome of [`unlock_cascade`].
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeOutcome {
    /// Newly unlocked achievements, in unlock order.
    pub unlocked: Vec<AchievementDefinition>,
    /// Progress with every award applied.
    pub progress: UserProgress,
}

/// Evaluate repeatedly, applying each award to a working copy of the
/// progress, until nothing new qualifies.
///
/// An award can lift a user over a points or level threshold, so a single
/// [`evaluate`] pass can miss achievements the awards themselves earn. Each
/// round unlocks at least one entry, so this terminates within
/// `catalog.len()` rounds.
pub fn unlock_cascade(
    progress: &UserProgress,
    catalog: &[AchievementDefinition],
    already_unlocked: &BTreeSet<String>,
) -> CascadeOutcome {
    let mut working = progress.clone();
    let mut unlocked_ids = already_unlocked.clone();
    let mut unlocked = Vec::new();

    loop {
        let round = evaluate(&working, catalog, &unlocked_ids);
        if round.is_empty() {
            break;
        }
        for achievement in round {
            working.add_points(achievement.points_awarded);
            *working
                .action_counts
                .entry(ActionKind::AchievementUnlocked)
                .or_insert(0) += 1;
            working
                .achievements_unlocked
                .insert(achievement.id.to_string());
            unlocked_ids.insert(achievement.id.to_string());
            unlocked.push(achievement);
        }
    }

    CascadeOutcome {
        unlocked,
        progress: working,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
