//! Population-wide engagement, points and achievement rollups.
//!
//! Read-only over the same inputs as the ranker. Every rate and average is
//! defined as `0.0` over an empty denominator, so an empty population yields a
//! zero-filled report rather than `NaN`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::achievements::AchievementDefinition;
use crate::actions::ActionKind;
use crate::leaderboard::Contributor;
use crate::points::classify;
use crate::progress::BadgeLevel;
use crate::timeframe::Timeframe;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementStats {
    pub total_users: u32,
    /// Users with at least one valid action inside the window.
    pub active_users: u32,
    pub actions_in_window: u32,
    pub active_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointsDistribution {
    /// Net points awarded inside the window.
    pub points_awarded: i64,
    pub points_by_action: BTreeMap<ActionKind, i64>,
    pub average_points_per_user: f64,
    /// All-time badge tier of each user.
    pub users_by_badge: BTreeMap<BadgeLevel, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementStat {
    pub achievement_id: String,
    pub title: String,
    pub unlocked_count: u32,
    /// Share of the population that has unlocked this achievement.
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardStats {
    pub top_score: i64,
    pub average_score: f64,
    /// Average all-time points per department. Users without a department
    /// are left out.
    pub department_averages: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub timeframe: Timeframe,
    pub engagement: EngagementStats,
    pub points_distribution: PointsDistribution,
    pub achievement_stats: Vec<AchievementStat>,
    pub leaderboard_stats: LeaderboardStats,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// `numerator / denominator`, or `0.0` when the denominator is zero.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Roll up the population for dashboards.
pub fn aggregate(
    contributors: &[Contributor],
    catalog: &[AchievementDefinition],
    timeframe: Timeframe,
    now: Timestamp,
) -> AnalyticsReport {
    let total_users = contributors.len() as u32;

    let mut points_by_action: BTreeMap<ActionKind, i64> =
        ActionKind::ALL.into_iter().map(|k| (k, 0)).collect();
    let mut users_by_badge: BTreeMap<BadgeLevel, u32> =
        BadgeLevel::ALL.into_iter().map(|b| (b, 0)).collect();

    let mut active_users = 0u32;
    let mut actions_in_window = 0u32;
    let mut points_awarded = 0i64;

    for contributor in contributors {
        let mut active = false;
        for record in &contributor.ledger {
            if record.user_id != contributor.user_id
                || !timeframe.contains(record.occurred_at, now)
            {
                continue;
            }
            let Ok(c) = classify(record) else {
                continue;
            };
            points_awarded += c.points;
            *points_by_action.entry(c.kind).or_insert(0) += c.points;
            if c.kind.is_user_activity() {
                actions_in_window += 1;
                active = true;
            }
        }
        if active {
            active_users += 1;
        }
        *users_by_badge
            .entry(contributor.progress.badge_level)
            .or_insert(0) += 1;
    }

    let achievement_stats = catalog
        .iter()
        .map(|definition| {
            let unlocked_count = contributors
                .iter()
                .filter(|c| c.progress.achievements_unlocked.contains(definition.id))
                .count() as u32;
            AchievementStat {
                achievement_id: definition.id.to_string(),
                title: definition.title.to_string(),
                unlocked_count,
                completion_rate: ratio(unlocked_count as f64, total_users as f64),
            }
        })
        .collect();

    AnalyticsReport {
        timeframe,
        engagement: EngagementStats {
            total_users,
            active_users,
            actions_in_window,
            active_rate: ratio(active_users as f64, total_users as f64),
        },
        points_distribution: PointsDistribution {
            points_awarded,
            points_by_action,
            average_points_per_user: ratio(points_awarded as f64, total_users as f64),
            users_by_badge,
        },
        achievement_stats,
        leaderboard_stats: leaderboard_stats(contributors),
    }
}

fn leaderboard_stats(contributors: &[Contributor]) -> LeaderboardStats {
    let top_score = contributors
        .iter()
        .map(|c| c.progress.total_points)
        .max()
        .unwrap_or(0);
    let sum: i64 = contributors.iter().map(|c| c.progress.total_points).sum();

    let mut by_department: BTreeMap<String, (i64, u32)> = BTreeMap::new();
    for c in contributors {
        if let Some(department) = &c.department {
            let entry = by_department.entry(department.clone()).or_insert((0, 0));
            entry.0 += c.progress.total_points;
            entry.1 += 1;
        }
    }

    LeaderboardStats {
        top_score,
        average_score: ratio(sum as f64, contributors.len() as f64),
        department_averages: by_department
            .into_iter()
            .map(|(d, (total, count))| (d, ratio(total as f64, count as f64)))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
