//! Glue between the repositories and the pure gamification core.
//!
//! Handlers load ledgers and profiles through these helpers, hand them to
//! `studyhub_core`, and route every point-changing write through [`award`].

use std::collections::{BTreeMap, BTreeSet};

use studyhub_core::achievements::{default_catalog, find, unlock_cascade, AchievementDefinition};
use studyhub_core::actions::ActionRecord;
use studyhub_core::leaderboard::Contributor;
use studyhub_core::progress::{compute_progress, UserProgress};
use studyhub_core::types::{DbId, Timestamp};
use studyhub_db::models::action_record::CreateActionRecord;
use studyhub_db::repositories::{AchievementRepo, ActionRepo, AwardRepo, ProfileRepo};

use crate::error::AppResult;
use crate::state::AppState;

/// Result of an award pass.
#[derive(Debug, Clone)]
pub struct AwardOutcome {
    /// Achievements unlocked by this pass, in unlock order.
    pub unlocked: Vec<AchievementDefinition>,
    /// Progress after every write of this pass.
    pub progress: UserProgress,
}

/// Load a user's ledger as core records, oldest first.
pub async fn load_ledger(state: &AppState, user_id: DbId) -> AppResult<Vec<ActionRecord>> {
    let rows = ActionRepo::list_for_user(&state.pool, user_id).await?;
    Ok(rows.into_iter().map(|r| r.into_record()).collect())
}

/// Recompute a user's progress from their ledger.
pub async fn load_progress(state: &AppState, user_id: DbId) -> AppResult<UserProgress> {
    let ledger = load_ledger(state, user_id).await?;
    Ok(compute_progress(user_id, &ledger))
}

/// Every known user with profile scope fields and ledger.
///
/// A user is known if they have a profile or at least one ledger row. Users
/// without a profile have no department or course.
pub async fn load_contributors(state: &AppState) -> AppResult<Vec<Contributor>> {
    let profiles = ProfileRepo::list_all(&state.pool).await?;
    let rows = ActionRepo::list_all(&state.pool).await?;

    let mut ledgers: BTreeMap<DbId, Vec<ActionRecord>> = profiles
        .iter()
        .map(|p| (p.user_id, Vec::new()))
        .collect();
    for row in rows {
        ledgers
            .entry(row.user_id)
            .or_default()
            .push(row.into_record());
    }

    let mut scopes: BTreeMap<DbId, (Option<String>, Option<String>)> = profiles
        .into_iter()
        .map(|p| (p.user_id, (p.department, p.course)))
        .collect();

    Ok(ledgers
        .into_iter()
        .map(|(user_id, ledger)| {
            let (department, course) = scopes.remove(&user_id).unwrap_or_default();
            Contributor {
                user_id,
                department,
                course,
                progress: compute_progress(user_id, &ledger),
                ledger,
            }
        })
        .collect())
}

/// Append an optional action for `user_id`, then unlock every achievement
/// the resulting progress earns.
///
/// `action` carries the record and the points the classifier assigned it.
/// Nothing is written when there is no action and nothing new unlocks.
pub async fn award(
    state: &AppState,
    user_id: DbId,
    action: Option<(ActionRecord, i64)>,
    now: Timestamp,
) -> AppResult<AwardOutcome> {
    let mut ledger = load_ledger(state, user_id).await?;
    if let Some((record, _)) = &action {
        ledger.push(record.clone());
    }
    let progress = compute_progress(user_id, &ledger);

    let mut already_unlocked: BTreeSet<String> =
        AchievementRepo::unlocked_ids(&state.pool, user_id).await?;
    already_unlocked.extend(progress.achievements_unlocked.iter().cloned());

    let cascade = unlock_cascade(&progress, default_catalog(), &already_unlocked);
    if action.is_none() && cascade.unlocked.is_empty() {
        return Ok(AwardOutcome {
            unlocked: Vec::new(),
            progress,
        });
    }

    let insert = action
        .as_ref()
        .map(|(record, points)| CreateActionRecord::from_record(record, *points));
    let receipt =
        AwardRepo::record_award(&state.pool, user_id, insert.as_ref(), &cascade.unlocked, now)
            .await?;
    state.leaderboard_cache.invalidate().await;

    let unlocked: Vec<AchievementDefinition> = receipt
        .unlocked
        .iter()
        .filter_map(|u| find(default_catalog(), &u.achievement_id).cloned())
        .collect();

    // A concurrent award won some unlocks; the working copy overcounts.
    let progress = if unlocked.len() == cascade.unlocked.len() {
        cascade.progress
    } else {
        load_progress(state, user_id).await?
    };

    for achievement in &unlocked {
        tracing::info!(
            user_id,
            achievement_id = achievement.id,
            points_awarded = achievement.points_awarded,
            "Achievement unlocked",
        );
    }

    Ok(AwardOutcome { unlocked, progress })
}
