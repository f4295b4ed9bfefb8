//! Leaderboard ranking.
//!
//! Ranking is two steps: score every candidate in the scope for the requested
//! timeframe, then [`assign_ranks`]. The database-backed path computes the
//! scores in SQL and reuses [`assign_ranks`] so both paths order identically.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::actions::ActionRecord;
use crate::error::CoreError;
use crate::points::classify;
use crate::progress::UserProgress;
use crate::timeframe::Timeframe;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Default number of entries returned by a leaderboard query.
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
/// Maximum number of entries a single query may request.
pub const MAX_LEADERBOARD_LIMIT: i64 = 100;

/// Clamp a requested limit to `1..=MAX_LEADERBOARD_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .clamp(1, MAX_LEADERBOARD_LIMIT)
}

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Population a leaderboard is computed over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum LeaderboardScope {
    Global,
    Department(String),
    Course(String),
}

impl LeaderboardScope {
    /// Build a scope from query-string parts.
    ///
    /// A department or course scope without its name is a validation error.
    pub fn from_parts(
        scope_type: Option<&str>,
        department: Option<&str>,
        course: Option<&str>,
    ) -> Result<Self, CoreError> {
        fn non_empty(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|s| !s.is_empty())
        }
        match scope_type.unwrap_or("global") {
            "global" => Ok(LeaderboardScope::Global),
            "department" => non_empty(department)
                .map(|d| LeaderboardScope::Department(d.to_string()))
                .ok_or_else(|| {
                    CoreError::Validation("department scope requires a department".into())
                }),
            "course" => non_empty(course)
                .map(|c| LeaderboardScope::Course(c.to_string()))
                .ok_or_else(|| CoreError::Validation("course scope requires a course".into())),
            other => Err(CoreError::Validation(format!(
                "Unknown leaderboard scope '{other}'. Expected one of: global, department, course"
            ))),
        }
    }

    /// Stable string key, e.g. `department:Physics`.
    pub fn scope_key(&self) -> String {
        match self {
            LeaderboardScope::Global => "global".to_string(),
            LeaderboardScope::Department(d) => format!("department:{d}"),
            LeaderboardScope::Course(c) => format!("course:{c}"),
        }
    }

    /// Exact-match membership test.
    pub fn includes(&self, department: Option<&str>, course: Option<&str>) -> bool {
        match self {
            LeaderboardScope::Global => true,
            LeaderboardScope::Department(d) => department == Some(d.as_str()),
            LeaderboardScope::Course(c) => course == Some(c.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// A user as seen by the ranker and the analytics aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct Contributor {
    pub user_id: DbId,
    pub department: Option<String>,
    pub course: Option<String>,
    pub progress: UserProgress,
    pub ledger: Vec<ActionRecord>,
}

/// A candidate with its timeframe-relevant score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredUser {
    pub user_id: DbId,
    pub score: i64,
    pub last_activity_at: Option<Timestamp>,
}

/// One ranked row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: DbId,
    pub scope_key: String,
    pub timeframe: Timeframe,
    /// 1-based, contiguous.
    pub rank: u32,
    pub total_points: i64,
    pub last_activity_at: Option<Timestamp>,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Sum of classified points for `user_id`'s records in `since..=now`.
///
/// Rows belonging to another user and unclassifiable rows contribute nothing;
/// the accumulator already reports them.
pub fn windowed_points(
    user_id: DbId,
    ledger: &[ActionRecord],
    since: Timestamp,
    now: Timestamp,
) -> i64 {
    ledger
        .iter()
        .filter(|r| r.user_id == user_id && r.occurred_at >= since && r.occurred_at <= now)
        .filter_map(|r| classify(r).ok())
        .map(|c| c.points)
        .sum()
}

/// The score a contributor ranks by for a timeframe.
///
/// All-time uses the lifetime total; bounded windows re-sum the ledger.
pub fn score_for(contributor: &Contributor, timeframe: Timeframe, now: Timestamp) -> i64 {
    match timeframe.window_start(now) {
        None => contributor.progress.total_points,
        Some(since) => windowed_points(contributor.user_id, &contributor.ledger, since, now),
    }
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Leaderboard order: higher score first, then earliest `last_activity_at`
/// (users with no activity last), then lower `user_id`.
pub fn compare_scored(a: &ScoredUser, b: &ScoredUser) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| match (a.last_activity_at, b.last_activity_at) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.user_id.cmp(&b.user_id))
}

/// Sort and assign ranks `1..=n`.
pub fn assign_ranks(
    mut scored: Vec<ScoredUser>,
    scope_key: &str,
    timeframe: Timeframe,
) -> Vec<LeaderboardEntry> {
    scored.sort_by(compare_scored);
    scored
        .into_iter()
        .enumerate()
        .map(|(index, s)| LeaderboardEntry {
            user_id: s.user_id,
            scope_key: scope_key.to_string(),
            timeframe,
            rank: index as u32 + 1,
            total_points: s.score,
            last_activity_at: s.last_activity_at,
        })
        .collect()
}

/// Rank contributors within a scope for a timeframe.
pub fn rank(
    contributors: &[Contributor],
    scope: &LeaderboardScope,
    timeframe: Timeframe,
    now: Timestamp,
) -> Vec<LeaderboardEntry> {
    let scored = contributors
        .iter()
        .filter(|c| scope.includes(c.department.as_deref(), c.course.as_deref()))
        .map(|c| ScoredUser {
            user_id: c.user_id,
            score: score_for(c, timeframe, now),
            last_activity_at: c.progress.last_activity_at,
        })
        .collect();
    assign_ranks(scored, &scope.scope_key(), timeframe)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
