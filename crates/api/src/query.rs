//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Default page size for ledger listings.
const DEFAULT_PAGE_LIMIT: i64 = 50;
/// Largest page a caller may request.
const MAX_PAGE_LIMIT: i64 = 200;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Limit clamped to `1..=200`, defaulting to 50.
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    /// Offset, never negative.
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// `?timeframe=` for analytics.
#[derive(Debug, Deserialize)]
pub struct TimeframeParams {
    pub timeframe: Option<String>,
}

/// Leaderboard query (`?scope=&department=&course=&timeframe=&limit=`).
#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub scope: Option<String>,
    pub department: Option<String>,
    pub course: Option<String>,
    pub timeframe: Option<String>,
    pub limit: Option<i64>,
}
