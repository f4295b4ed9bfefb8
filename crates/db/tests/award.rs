//! Integration tests for the award transaction and the ledger/counter repos.
//!
//! - Recording an action appends a ledger row and increments the counter
//! - Achievement unlocks write ledger, counter and notification rows once
//! - Re-awarding an unlocked achievement is a no-op
//! - System awards do not advance `last_activity_at`

use chrono::{Duration, TimeZone, Utc};
use sqlx::PgPool;
use studyhub_core::achievements::{default_catalog, find};
use studyhub_core::actions::{ActionKind, ActionRecord, ResourceType};
use studyhub_core::points::classify;
use studyhub_core::progress::compute_progress;
use studyhub_core::types::Timestamp;
use studyhub_db::models::action_record::CreateActionRecord;
use studyhub_db::repositories::{
    AchievementRepo, ActionRepo, AwardRepo, NotificationRepo, UserPointsRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn at(day: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, day, 10, 0, 0).unwrap()
}

fn upload(user_id: i64, resource_id: i64, when: Timestamp) -> CreateActionRecord {
    let record = ActionRecord::new(user_id, ActionKind::UploadResource, when)
        .with_resource(resource_id, Some(ResourceType::Notes));
    let points = classify(&record).unwrap().points;
    CreateActionRecord::from_record(&record, points)
}

// ---------------------------------------------------------------------------
// Test: recording an action updates ledger and counter together
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_record_action_increments_counter(pool: PgPool) {
    let receipt = AwardRepo::record_award(&pool, 7, Some(&upload(7, 1, at(2))), &[], at(2))
        .await
        .unwrap();

    let row = receipt.action.expect("action row should be returned");
    assert!(row.id > 0);
    assert_eq!(row.action_type, "upload_resource");
    assert_eq!(row.points, 10);
    assert_eq!(row.resource_type.as_deref(), Some("notes"));
    assert!(receipt.unlocked.is_empty());

    let points = UserPointsRepo::find(&pool, 7).await.unwrap().unwrap();
    assert_eq!(points.total_points, 10);
    assert_eq!(points.last_activity_at, Some(at(2)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_counter_matches_ledger_recomputation(pool: PgPool) {
    for (i, day) in [1u32, 2, 3].into_iter().enumerate() {
        AwardRepo::record_award(&pool, 3, Some(&upload(3, i as i64, at(day))), &[], at(day))
            .await
            .unwrap();
    }

    let ledger: Vec<ActionRecord> = ActionRepo::list_for_user(&pool, 3)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.into_record())
        .collect();
    let progress = compute_progress(3, &ledger);
    let counter = UserPointsRepo::find(&pool, 3).await.unwrap().unwrap();

    assert_eq!(ledger.len(), 3);
    assert_eq!(progress.total_points, counter.total_points);
    assert_eq!(progress.last_activity_at, counter.last_activity_at);
}

// ---------------------------------------------------------------------------
// Test: unlocks are written exactly once
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_unlock_writes_ledger_counter_and_notification(pool: PgPool) {
    let first_upload = find(default_catalog(), "first_upload").unwrap().clone();

    let receipt = AwardRepo::record_award(
        &pool,
        11,
        Some(&upload(11, 5, at(4))),
        std::slice::from_ref(&first_upload),
        at(4),
    )
    .await
    .unwrap();

    assert_eq!(receipt.unlocked.len(), 1);
    assert_eq!(receipt.unlocked[0].achievement_id, "first_upload");
    let points = receipt.points.unwrap();
    assert_eq!(points.total_points, 10 + first_upload.points_awarded);

    let ledger = ActionRepo::list_for_user(&pool, 11).await.unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[1].action_type, "achievement_unlocked");
    assert_eq!(ledger[1].points, first_upload.points_awarded);
    assert_eq!(ledger[1].metadata["achievement_id"], "first_upload");

    let notifications = NotificationRepo::list_for_user(&pool, 11, 10, 0).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, "achievement_unlocked");
    assert_eq!(notifications[0].payload["achievement_id"], "first_upload");
    assert!(!notifications[0].is_read);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_repeat_unlock_is_noop(pool: PgPool) {
    let curator = find(default_catalog(), "curator").unwrap().clone();
    let unlocks = std::slice::from_ref(&curator);

    AwardRepo::record_award(&pool, 2, None, unlocks, at(5))
        .await
        .unwrap();
    let again = AwardRepo::record_award(&pool, 2, None, unlocks, at(6))
        .await
        .unwrap();

    assert!(again.unlocked.is_empty());
    assert!(again.points.is_none());

    let ids = AchievementRepo::unlocked_ids(&pool, 2).await.unwrap();
    assert_eq!(ids.len(), 1);
    assert!(ids.contains("curator"));

    let counter = UserPointsRepo::find(&pool, 2).await.unwrap().unwrap();
    assert_eq!(counter.total_points, curator.points_awarded);

    let notifications = NotificationRepo::list_for_user(&pool, 2, 10, 0).await.unwrap();
    assert_eq!(notifications.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_system_award_keeps_last_activity(pool: PgPool) {
    let curator = find(default_catalog(), "curator").unwrap().clone();

    AwardRepo::record_award(&pool, 9, Some(&upload(9, 1, at(1))), &[], at(1))
        .await
        .unwrap();
    AwardRepo::record_award(&pool, 9, None, &[curator], at(1) + Duration::days(3))
        .await
        .unwrap();

    let counter = UserPointsRepo::find(&pool, 9).await.unwrap().unwrap();
    assert_eq!(counter.last_activity_at, Some(at(1)));
}

// ---------------------------------------------------------------------------
// Test: paging and windowed sums
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_paged_ledger_is_newest_first(pool: PgPool) {
    for day in 1..=5u32 {
        AwardRepo::record_award(&pool, 4, Some(&upload(4, day as i64, at(day))), &[], at(day))
            .await
            .unwrap();
    }

    let page = ActionRepo::list_for_user_paged(&pool, 4, 2, 1).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].occurred_at, at(4));
    assert_eq!(page[1].occurred_at, at(3));

    let since = ActionRepo::sum_points_since(&pool, 4, at(4)).await.unwrap();
    assert_eq!(since, 20);
}
