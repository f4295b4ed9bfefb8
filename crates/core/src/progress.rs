//! Progress accumulation: total points, level, badge tier and streaks.
//!
//! [`compute_progress`] is a pure fold over a user's ledger. The point total is
//! order-independent; streaks and `last_activity_at` are not, so the ledger is
//! always walked in ascending `occurred_at` order regardless of input order.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::actions::{ActionKind, ActionMetadata, ActionRecord};
use crate::points::classify;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

/// Minimum total points for each level; index 0 is level 1.
pub const LEVEL_THRESHOLDS: [i64; 10] = [0, 50, 150, 300, 500, 800, 1200, 1700, 2300, 3000];

/// Highest reachable level.
pub const MAX_LEVEL: u32 = LEVEL_THRESHOLDS.len() as u32;

/// Level for a point total. Totals below zero stay at level 1.
pub fn level_for_points(points: i64) -> u32 {
    let reached = LEVEL_THRESHOLDS.iter().filter(|&&t| points >= t).count() as u32;
    reached.max(1)
}

/// Points still needed to reach the next level, or `None` at the cap.
pub fn points_to_next_level(points: i64) -> Option<i64> {
    let level = level_for_points(points);
    LEVEL_THRESHOLDS
        .get(level as usize)
        .map(|next| (next - points).max(0))
}

// ---------------------------------------------------------------------------
// BadgeLevel
// ---------------------------------------------------------------------------

/// Coarse tier shown next to a user's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeLevel {
    Newcomer,
    Contributor,
    Expert,
    Legend,
}

impl BadgeLevel {
    pub const ALL: [BadgeLevel; 4] = [
        BadgeLevel::Newcomer,
        BadgeLevel::Contributor,
        BadgeLevel::Expert,
        BadgeLevel::Legend,
    ];

    /// Bucket a level into its tier.
    pub fn from_level(level: u32) -> Self {
        match level {
            0..=2 => BadgeLevel::Newcomer,
            3..=5 => BadgeLevel::Contributor,
            6..=8 => BadgeLevel::Expert,
            _ => BadgeLevel::Legend,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BadgeLevel::Newcomer => "newcomer",
            BadgeLevel::Contributor => "contributor",
            BadgeLevel::Expert => "expert",
            BadgeLevel::Legend => "legend",
        }
    }

    /// Human-readable label for display in the UI.
    pub fn label(self) -> &'static str {
        match self {
            BadgeLevel::Newcomer => "Newcomer",
            BadgeLevel::Contributor => "Contributor",
            BadgeLevel::Expert => "Expert",
            BadgeLevel::Legend => "Legend",
        }
    }
}

// ---------------------------------------------------------------------------
// UserProgress
// ---------------------------------------------------------------------------

/// Derived per-user progress. Never stored as an authority; always
/// recomputable from the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub user_id: DbId,
    pub total_points: i64,
    pub level: u32,
    pub badge_level: BadgeLevel,
    pub achievements_unlocked: BTreeSet<String>,
    pub action_counts: BTreeMap<ActionKind, u32>,
    pub current_streak_days: u32,
    pub longest_streak_days: u32,
    pub last_activity_at: Option<Timestamp>,
    /// Ledger rows ignored because they could not be classified.
    pub skipped_records: u32,
}

impl UserProgress {
    /// Progress for a user with an empty ledger.
    pub fn empty(user_id: DbId) -> Self {
        Self {
            user_id,
            total_points: 0,
            level: 1,
            badge_level: BadgeLevel::Newcomer,
            achievements_unlocked: BTreeSet::new(),
            action_counts: BTreeMap::new(),
            current_streak_days: 0,
            longest_streak_days: 0,
            last_activity_at: None,
            skipped_records: 0,
        }
    }

    /// Number of valid ledger rows of the given kind.
    pub fn action_count(&self, kind: ActionKind) -> u32 {
        self.action_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Apply a point delta and re-derive level and badge.
    pub fn add_points(&mut self, delta: i64) {
        self.total_points += delta;
        self.level = level_for_points(self.total_points);
        self.badge_level = BadgeLevel::from_level(self.level);
    }

    /// Points still needed to reach the next level.
    pub fn points_to_next_level(&self) -> Option<i64> {
        points_to_next_level(self.total_points)
    }
}

// ---------------------------------------------------------------------------
// Accumulation
// ---------------------------------------------------------------------------

/// Fold a user's ledger into their progress.
///
/// Records that fail classification, or that belong to a different user, are
/// skipped with a warning and counted in `skipped_records`; one bad row never
/// blanks a whole history.
pub fn compute_progress(user_id: DbId, ledger: &[ActionRecord]) -> UserProgress {
    let mut ordered: Vec<&ActionRecord> = ledger.iter().collect();
    ordered.sort_by_key(|r| r.occurred_at);

    let mut progress = UserProgress::empty(user_id);
    let mut streak = StreakTracker::default();

    for record in ordered {
        if record.user_id != user_id {
            tracing::warn!(
                user_id,
                record_user_id = record.user_id,
                "Skipping ledger record that belongs to another user"
            );
            progress.skipped_records += 1;
            continue;
        }

        let classification = match classify(record) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(
                    user_id,
                    action_type = %record.action_type,
                    occurred_at = %record.occurred_at,
                    error = %e,
                    "Skipping malformed ledger record"
                );
                progress.skipped_records += 1;
                continue;
            }
        };

        progress.total_points += classification.points;
        *progress.action_counts.entry(classification.kind).or_insert(0) += 1;

        if let ActionMetadata::Achievement { achievement_id, .. } = &record.metadata {
            progress.achievements_unlocked.insert(achievement_id.clone());
        }

        if classification.kind.is_user_activity() {
            progress.last_activity_at = Some(record.occurred_at);
            streak.observe(record.occurred_at.date_naive());
        }
    }

    progress.level = level_for_points(progress.total_points);
    progress.badge_level = BadgeLevel::from_level(progress.level);
    progress.current_streak_days = streak.current;
    progress.longest_streak_days = streak.longest;
    progress
}

/// Consecutive-day tracker fed with non-decreasing dates.
#[derive(Debug, Default)]
struct StreakTracker {
    last_day: Option<NaiveDate>,
    current: u32,
    longest: u32,
}

impl StreakTracker {
    fn observe(&mut self, day: NaiveDate) {
        self.current = match self.last_day {
            Some(last) if last == day => self.current,
            Some(last) if last.succ_opt() == Some(day) => self.current + 1,
            _ => 1,
        };
        self.last_day = Some(day);
        self.longest = self.longest.max(self.current);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::actions::ResourceType;

    fn day(d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 4, d, 10, 0, 0).unwrap()
    }

    fn rec(kind: ActionKind, at: Timestamp) -> ActionRecord {
        ActionRecord::new(7, kind, at)
    }

    // -- levels --

    #[test]
    fn level_boundaries() {
        assert_eq!(level_for_points(-40), 1);
        assert_eq!(level_for_points(0), 1);
        assert_eq!(level_for_points(49), 1);
        assert_eq!(level_for_points(50), 2);
        assert_eq!(level_for_points(2999), 9);
        assert_eq!(level_for_points(3000), MAX_LEVEL);
        assert_eq!(level_for_points(1_000_000), MAX_LEVEL);
    }

    #[test]
    fn level_is_monotonic() {
        let mut previous = 0;
        for points in (-100..4000).step_by(7) {
            let level = level_for_points(points);
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn next_level_distance() {
        assert_eq!(points_to_next_level(0), Some(50));
        assert_eq!(points_to_next_level(140), Some(10));
        assert_eq!(points_to_next_level(3000), None);
    }

    #[test]
    fn badge_tiers() {
        assert_eq!(BadgeLevel::from_level(1), BadgeLevel::Newcomer);
        assert_eq!(BadgeLevel::from_level(3), BadgeLevel::Contributor);
        assert_eq!(BadgeLevel::from_level(6), BadgeLevel::Expert);
        assert_eq!(BadgeLevel::from_level(10), BadgeLevel::Legend);
    }

    // -- compute_progress --

    #[test]
    fn empty_ledger_is_floor() {
        let p = compute_progress(7, &[]);
        assert_eq!(p.total_points, 0);
        assert_eq!(p.level, 1);
        assert_eq!(p.badge_level, BadgeLevel::Newcomer);
        assert!(p.achievements_unlocked.is_empty());
        assert!(p.last_activity_at.is_none());
        assert_eq!(p, UserProgress::empty(7));
    }

    #[test]
    fn upload_upvote_downvote_totals_thirteen() {
        let ledger = vec![
            rec(ActionKind::UploadResource, day(1)),
            rec(ActionKind::ReceiveUpvote, day(2)),
            rec(ActionKind::ReceiveDownvote, day(3)),
        ];
        let p = compute_progress(7, &ledger);
        assert_eq!(p.total_points, 13);
        assert_eq!(p.action_count(ActionKind::ReceiveDownvote), 1);
    }

    #[test]
    fn total_equals_sum_of_classifications() {
        let ledger = vec![
            rec(ActionKind::UploadResource, day(1)).with_resource(1, Some(ResourceType::Notes)),
            rec(ActionKind::ReceiveUpvote, day(1)).with_resource(1, Some(ResourceType::PastPaper)),
            rec(ActionKind::ShareCollection, day(2)),
            rec(ActionKind::ReceiveDownvote, day(4)),
            ActionRecord::achievement_unlocked(7, "first_upload", 10, day(4)),
        ];
        let expected: i64 = ledger.iter().map(|r| classify(r).unwrap().points).sum();
        assert_eq!(compute_progress(7, &ledger).total_points, expected);
    }

    #[test]
    fn recomputation_is_identical() {
        let ledger = vec![
            rec(ActionKind::DailyLogin, day(3)),
            rec(ActionKind::UploadResource, day(1)),
            ActionRecord::achievement_unlocked(7, "first_upload", 10, day(1)),
        ];
        let a = compute_progress(7, &ledger);
        let b = compute_progress(7, &ledger);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn malformed_records_are_skipped_not_fatal() {
        let mut bogus = rec(ActionKind::UploadResource, day(2));
        bogus.action_type = "bogus_action".into();
        let mut missing = rec(ActionKind::UploadResource, day(2));
        missing.action_type = String::new();

        let ledger = vec![rec(ActionKind::UploadResource, day(1)), bogus, missing];
        let p = compute_progress(7, &ledger);
        assert_eq!(p.total_points, 10);
        assert_eq!(p.skipped_records, 2);
    }

    #[test]
    fn foreign_records_are_skipped() {
        let ledger = vec![
            rec(ActionKind::UploadResource, day(1)),
            ActionRecord::new(99, ActionKind::UploadResource, day(1)),
        ];
        let p = compute_progress(7, &ledger);
        assert_eq!(p.total_points, 10);
        assert_eq!(p.skipped_records, 1);
    }

    #[test]
    fn achievements_come_from_award_rows() {
        let ledger = vec![
            rec(ActionKind::UploadResource, day(1)),
            ActionRecord::achievement_unlocked(7, "first_upload", 10, day(1)),
        ];
        let p = compute_progress(7, &ledger);
        assert!(p.achievements_unlocked.contains("first_upload"));
        assert_eq!(p.total_points, 20);
    }

    // -- activity and streaks --

    #[test]
    fn last_activity_ignores_input_order_and_award_rows() {
        let ledger = vec![
            ActionRecord::achievement_unlocked(7, "first_upload", 10, day(9)),
            rec(ActionKind::DailyLogin, day(5)),
            rec(ActionKind::UploadResource, day(2)),
        ];
        let p = compute_progress(7, &ledger);
        assert_eq!(p.last_activity_at, Some(day(5)));
    }

    #[test]
    fn streak_counts_consecutive_days() {
        let ledger = vec![
            rec(ActionKind::DailyLogin, day(1)),
            rec(ActionKind::DailyLogin, day(2)),
            rec(ActionKind::UploadResource, day(2) + Duration::hours(3)),
            rec(ActionKind::DailyLogin, day(3)),
            rec(ActionKind::DailyLogin, day(6)),
            rec(ActionKind::DailyLogin, day(7)),
        ];
        let p = compute_progress(7, &ledger);
        assert_eq!(p.longest_streak_days, 3);
        assert_eq!(p.current_streak_days, 2);
    }

    #[test]
    fn streak_is_order_independent_of_input() {
        let mut ledger = vec![
            rec(ActionKind::DailyLogin, day(3)),
            rec(ActionKind::DailyLogin, day(1)),
            rec(ActionKind::DailyLogin, day(2)),
        ];
        let forward = compute_progress(7, &ledger);
        ledger.reverse();
        let backward = compute_progress(7, &ledger);
        assert_eq!(forward.current_streak_days, 3);
        assert_eq!(forward, backward);
    }

    #[test]
    fn add_points_rederives_level() {
        let mut p = UserProgress::empty(1);
        p.add_points(160);
        assert_eq!(p.level, 3);
        assert_eq!(p.badge_level, BadgeLevel::Contributor);
        p.add_points(-200);
        assert_eq!(p.level, 1);
    }
}
