//! End-to-end tests for the award path against a real database.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, build_test_app, get, post_json, token};
use serde_json::json;
use sqlx::PgPool;
use studyhub_db::models::profile::UpsertProfile;
use studyhub_db::repositories::ProfileRepo;

async fn record(pool: &PgPool, user_id: i64, action: serde_json::Value) -> serde_json::Value {
    record_via(build_test_app(pool.clone()), user_id, action).await
}

/// Record through an existing app so the request shares its leaderboard cache.
async fn record_via(app: Router, user_id: i64, action: serde_json::Value) -> serde_json::Value {
    let response = post_json(
        app,
        "/api/v1/actions",
        Some(&token(user_id, "student")),
        json!({ "action": action }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

async fn board_rows(app: Router, uri: &str, viewer: &str) -> Vec<(i64, i64)> {
    let response = get(app, uri, Some(viewer)).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| (e["user_id"].as_i64().unwrap(), e["total_points"].as_i64().unwrap()))
        .collect()
}

fn upload(resource_id: i64) -> serde_json::Value {
    json!({ "type": "upload_resource", "resource_id": resource_id, "resource_type": "notes" })
}

// ---------------------------------------------------------------------------
// Test: first upload unlocks `first_upload` exactly once
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn first_upload_unlocks_achievement(pool: PgPool) {
    let json = record(&pool, 1, upload(10)).await;

    assert_eq!(json["data"]["classification"]["points"], 10);
    let unlocked: Vec<&str> = json["data"]["unlocked"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(unlocked, vec!["first_upload"]);
    // 10 for the upload plus 10 for the achievement.
    assert_eq!(json["data"]["progress"]["total_points"], 20);

    let second = record(&pool, 1, upload(11)).await;
    assert!(second["data"]["unlocked"].as_array().unwrap().is_empty());
    assert_eq!(second["data"]["progress"]["total_points"], 30);

    let achievements = get(
        build_test_app(pool.clone()),
        "/api/v1/users/1/achievements",
        Some(&token(1, "student")),
    )
    .await;
    let achievements = body_json(achievements).await;
    assert_eq!(achievements["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: progress endpoint matches the award path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn progress_reflects_recorded_actions(pool: PgPool) {
    record(&pool, 4, upload(1)).await;
    record(&pool, 4, json!({ "type": "daily_login" })).await;

    let response = get(
        build_test_app(pool.clone()),
        "/api/v1/users/4/progress",
        Some(&token(9, "student")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["total_points"], 21);
    assert_eq!(json["data"]["level"], 1);
    assert_eq!(json["data"]["badge_level"], "newcomer");
    assert_eq!(json["data"]["points_to_next_level"], 29);
    assert_eq!(json["data"]["achievements_unlocked"], json!(["first_upload"]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_user_has_empty_progress(pool: PgPool) {
    let response = get(
        build_test_app(pool),
        "/api/v1/users/777/progress",
        Some(&token(1, "student")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["total_points"], 0);
    assert_eq!(json["data"]["level"], 1);
    assert_eq!(json["data"]["achievements_unlocked"], json!([]));
}

// ---------------------------------------------------------------------------
// Test: admin crediting and ledger listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_can_credit_and_read_ledger(pool: PgPool) {
    let admin = token(100, "admin");
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/actions",
        Some(&admin),
        json!({ "user_id": 5, "action": { "type": "create_collection", "collection_id": 2 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let ledger = get(
        build_test_app(pool.clone()),
        "/api/v1/users/5/actions",
        Some(&admin),
    )
    .await;
    assert_eq!(ledger.status(), StatusCode::OK);
    let ledger = body_json(ledger).await;
    let rows = ledger["data"].as_array().unwrap();
    // create_collection plus the curator award.
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["user_id"] == 5));
}

// ---------------------------------------------------------------------------
// Test: leaderboard ordering within a department
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn leaderboard_ranks_by_department(pool: PgPool) {
    for (user_id, department) in [(1, "Maths"), (2, "Maths"), (3, "History")] {
        ProfileRepo::upsert(
            &pool,
            user_id,
            &UpsertProfile {
                display_name: format!("user{user_id}"),
                department: Some(department.to_string()),
                course: None,
                role: None,
            },
        )
        .await
        .unwrap();
    }

    let app = build_test_app(pool.clone());
    let viewer = token(1, "student");

    record(&pool, 1, json!({ "type": "daily_login" })).await;
    record(&pool, 2, json!({ "type": "daily_login" })).await;
    record(&pool, 2, json!({ "type": "daily_login" })).await;

    let response = get(
        app.clone(),
        "/api/v1/leaderboard?scope=department&department=Maths&timeframe=weekly",
        Some(&viewer),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let board = body_json(response).await;
    let users: Vec<i64> = board["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["user_id"].as_i64().unwrap())
        .collect();
    assert_eq!(users, vec![2, 1]);
    assert_eq!(board["data"][0]["rank"], 1);
    assert_eq!(board["data"][0]["scope_key"], "department:Maths");

    let limited = get(app, "/api/v1/leaderboard?limit=1", Some(&viewer)).await;
    let limited = body_json(limited).await;
    assert_eq!(limited["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: a recorded action replaces the cached board
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn leaderboard_refreshes_after_award(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let viewer = token(1, "student");
    let uri = "/api/v1/leaderboard?timeframe=weekly";

    record_via(app.clone(), 1, json!({ "type": "daily_login" })).await;
    record_via(app.clone(), 2, json!({ "type": "daily_login" })).await;
    record_via(app.clone(), 2, json!({ "type": "daily_login" })).await;

    let before = board_rows(app.clone(), uri, &viewer).await;
    assert_eq!(before, vec![(2, 2), (1, 1)]);

    // Served from the cache until the next write.
    assert_eq!(board_rows(app.clone(), uri, &viewer).await, before);

    // Upload plus the first_upload award.
    record_via(app.clone(), 1, upload(42)).await;

    let after = board_rows(app, uri, &viewer).await;
    assert_eq!(after, vec![(1, 21), (2, 2)]);
}

// ---------------------------------------------------------------------------
// Test: analytics rollup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn analytics_counts_active_users(pool: PgPool) {
    record(&pool, 1, upload(1)).await;
    record(&pool, 2, json!({ "type": "daily_login" })).await;

    let response = get(
        build_test_app(pool),
        "/api/v1/admin/analytics?timeframe=daily",
        Some(&token(100, "admin")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["timeframe"], "daily");
    assert_eq!(json["data"]["engagement"]["total_users"], 2);
    assert_eq!(json["data"]["engagement"]["active_users"], 2);
    assert_eq!(json["data"]["engagement"]["actions_in_window"], 2);
    assert_eq!(
        json["data"]["points_distribution"]["points_by_action"]["upload_resource"],
        10
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn check_achievements_is_idempotent(pool: PgPool) {
    record(&pool, 6, upload(1)).await;
    let student = token(6, "student");

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/users/6/achievements/check",
        Some(&student),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["unlocked"].as_array().unwrap().is_empty());
    assert_eq!(json["data"]["progress"]["total_points"], 20);
}
