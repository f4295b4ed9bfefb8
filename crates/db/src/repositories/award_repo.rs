//! The point-award transaction.
//!
//! Every write that changes a user's points goes through [`AwardRepo`] so the
//! ledger row, the counter increment, any achievement unlocks and their
//! notifications land together or not at all.

use serde_json::json;
use sqlx::PgPool;
use studyhub_core::achievements::AchievementDefinition;
use studyhub_core::actions::{ActionKind, ActionRecord};
use studyhub_core::types::{DbId, Timestamp};

use crate::models::achievement::UserAchievement;
use crate::models::action_record::{ActionRecordRow, CreateActionRecord};
use crate::models::notification::{CreateNotification, KIND_ACHIEVEMENT_UNLOCKED};
use crate::models::user_points::UserPoints;
use crate::repositories::{AchievementRepo, ActionRepo, NotificationRepo, UserPointsRepo};

/// What an award transaction actually wrote.
#[derive(Debug, Clone)]
pub struct AwardReceipt {
    /// The inbound action's ledger row, when one was recorded.
    pub action: Option<ActionRecordRow>,
    /// Achievements this transaction unlocked. Unlocks that lost a race with
    /// a concurrent award are absent.
    pub unlocked: Vec<UserAchievement>,
    /// Counter after the last increment, if anything was incremented.
    pub points: Option<UserPoints>,
}

/// Transactional award writes.
pub struct AwardRepo;

impl AwardRepo {
    /// Record an optional inbound action plus a batch of achievement unlocks
    /// for `user_id`, atomically.
    ///
    /// Each unlock is inserted with `ON CONFLICT DO NOTHING`; only unlocks
    /// that insert a row get their `achievement_unlocked` ledger row, point
    /// increment and notification.
    pub async fn record_award(
        pool: &PgPool,
        user_id: DbId,
        action: Option<&CreateActionRecord>,
        unlocks: &[AchievementDefinition],
        unlocked_at: Timestamp,
    ) -> Result<AwardReceipt, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut points = None;

        let action_row = match action {
            Some(input) => {
                let row = ActionRepo::insert(&mut *tx, input).await?;
                let activity_at = input
                    .action_type
                    .parse::<ActionKind>()
                    .is_ok_and(ActionKind::is_user_activity)
                    .then_some(input.occurred_at);
                points = Some(
                    UserPointsRepo::increment(&mut *tx, input.user_id, input.points, activity_at)
                        .await?,
                );
                Some(row)
            }
            None => None,
        };

        let mut unlocked = Vec::with_capacity(unlocks.len());
        for definition in unlocks {
            let Some(row) =
                AchievementRepo::unlock(&mut *tx, user_id, definition.id, unlocked_at).await?
            else {
                tracing::debug!(
                    user_id,
                    achievement_id = definition.id,
                    "Achievement already unlocked, skipping award",
                );
                continue;
            };

            let record = ActionRecord::achievement_unlocked(
                user_id,
                definition.id,
                definition.points_awarded,
                unlocked_at,
            );
            ActionRepo::insert(
                &mut *tx,
                &CreateActionRecord::from_record(&record, definition.points_awarded),
            )
            .await?;
            points = Some(
                UserPointsRepo::increment(&mut *tx, user_id, definition.points_awarded, None)
                    .await?,
            );
            NotificationRepo::create(
                &mut *tx,
                &CreateNotification {
                    user_id,
                    kind: KIND_ACHIEVEMENT_UNLOCKED.to_string(),
                    title: format!("Achievement unlocked: {}", definition.title),
                    body: definition.description.to_string(),
                    payload: json!({
                        "achievement_id": definition.id,
                        "points_awarded": definition.points_awarded,
                        "category": definition.category.as_str(),
                    }),
                },
            )
            .await?;

            unlocked.push(row);
        }

        tx.commit().await?;

        tracing::info!(
            user_id,
            recorded_action = action_row.is_some(),
            unlocked = unlocked.len(),
            "Award recorded",
        );

        Ok(AwardReceipt {
            action: action_row,
            unlocked,
            points,
        })
    }
}
