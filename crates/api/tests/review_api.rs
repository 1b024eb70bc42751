//! HTTP-level tests for pitches, the review ledger, and review summaries.

mod common;

use axum::http::StatusCode;
use chapterhouse_core::roles::Role;
use chapterhouse_db::store::DirectoryStore;
use common::{
    body_json, build_test_app, get_auth, put_json_auth, seed_account, seed_pitch, TestApp,
};
use serde_json::json;

async fn submit(app: &TestApp, token: &str, body: serde_json::Value) -> axum::http::Response<axum::body::Body> {
    put_json_auth(app, "/api/v1/reviews", body, token).await
}

/// One pitch in Denver, one in Austin.
async fn two_chapters(app: &TestApp) {
    seed_pitch(app, "P1", "Denver").await;
    seed_pitch(app, "P2", "Austin").await;
}

// ---------------------------------------------------------------------------
// Pitches
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_pitches_is_chapter_scoped() {
    let app = build_test_app();
    two_chapters(&app).await;
    let root = seed_account(&app, "root", "root@x.org", Role::SuperAdmin, None).await;
    let denver = seed_account(&app, "den-admin", "d@x.org", Role::Admin, Some("Denver")).await;
    let lp = seed_account(&app, "lp-1", "lp@x.org", Role::Lp, Some("Austin")).await;

    let ids = |json: serde_json::Value| -> Vec<String> {
        let mut ids: Vec<String> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap().to_string())
            .collect();
        ids.sort();
        ids
    };

    let all = body_json(get_auth(&app, "/api/v1/pitches", &root).await).await;
    assert_eq!(ids(all), vec!["P1", "P2"]);

    let denver_only = body_json(get_auth(&app, "/api/v1/pitches", &denver).await).await;
    assert_eq!(ids(denver_only), vec!["P1"]);

    let austin_only = body_json(get_auth(&app, "/api/v1/pitches", &lp).await).await;
    assert_eq!(ids(austin_only), vec!["P2"]);
}

#[tokio::test]
async fn test_set_winner() {
    let app = build_test_app();
    two_chapters(&app).await;
    let denver = seed_account(&app, "den-admin", "d@x.org", Role::Admin, Some("Denver")).await;
    let lp = seed_account(&app, "lp-1", "lp@x.org", Role::Lp, Some("Denver")).await;

    let response =
        put_json_auth(&app, "/api/v1/pitches/P1/winner", json!({ "is_winner": true }), &denver)
            .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_winner"], true);

    let response =
        put_json_auth(&app, "/api/v1/pitches/P2/winner", json!({ "is_winner": true }), &denver)
            .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response =
        put_json_auth(&app, "/api/v1/pitches/P1/winner", json!({ "is_winner": false }), &lp).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response =
        put_json_auth(&app, "/api/v1/pitches/NOPE/winner", json!({ "is_winner": true }), &denver)
            .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let pitch = app.store.find_pitch("P1").await.unwrap().unwrap();
    assert!(pitch.is_winner);
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_resubmitting_overwrites_review() {
    let app = build_test_app();
    two_chapters(&app).await;
    let lp = seed_account(&app, "lp-1", "lp@x.org", Role::Lp, Some("Denver")).await;

    let response = submit(
        &app,
        &lp,
        json!({ "pitch_id": "P1", "criterion_scores": { "team": 3 }, "overall_rating": "Maybe" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_eq!(first["data"]["id"], "lp-1:P1");
    assert_eq!(first["data"]["chapter"], "Denver");

    let response = submit(
        &app,
        &lp,
        json!({
            "pitch_id": "P1",
            "criterion_scores": { "team": 5, "market": 4 },
            "overall_rating": "Favorite",
            "comments": "Great traction"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let mine = body_json(get_auth(&app, "/api/v1/reviews/mine", &lp).await).await;
    let reviews = mine["data"].as_array().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["overall_rating"], "Favorite");
    assert_eq!(reviews[0]["criterion_scores"]["team"], 5);
    assert_eq!(reviews[0]["comments"], "Great traction");
}

#[tokio::test]
async fn test_review_rejections() {
    let app = build_test_app();
    two_chapters(&app).await;
    let lp = seed_account(&app, "lp-1", "lp@x.org", Role::Lp, Some("Denver")).await;
    seed_account(&app, "lp-2", "lp2@x.org", Role::Lp, Some("Denver")).await;

    // Writing under someone else's id.
    let response =
        submit(&app, &lp, json!({ "pitch_id": "P1", "reviewer_id": "lp-2", "overall_rating": "Pass" }))
            .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Pitch in another chapter looks missing.
    let response = submit(&app, &lp, json!({ "pitch_id": "P2", "overall_rating": "Pass" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = submit(&app, &lp, json!({ "pitch_id": "P1", "overall_rating": "Amazing" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response =
        submit(&app, &lp, json!({ "pitch_id": "P1", "criterion_scores": { "team": 9 } })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(app.store.list_reviews_for_pitch("P1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_review_write_retries_transient_outage() {
    let app = build_test_app();
    two_chapters(&app).await;
    let lp = seed_account(&app, "lp-1", "lp@x.org", Role::Lp, Some("Denver")).await;

    app.store.fail_next_writes(1);
    let response = submit(&app, &lp, json!({ "pitch_id": "P1", "overall_rating": "Strong" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    // More failures than attempts surfaces as a retryable error.
    app.store.fail_next_writes(2);
    let response = submit(&app, &lp, json!({ "pitch_id": "P1", "overall_rating": "Pass" })).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.headers().contains_key("retry-after"));

    let stored = app.store.find_review("lp-1:P1").await.unwrap().unwrap();
    assert_eq!(stored.overall_rating.as_deref(), Some("Strong"));
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_summary_groups_by_rating() {
    let app = build_test_app();
    two_chapters(&app).await;
    let admin = seed_account(&app, "den-admin", "d@x.org", Role::Admin, Some("Denver")).await;
    let a = seed_account(&app, "lp-a", "a@x.org", Role::Lp, Some("Denver")).await;
    let b = seed_account(&app, "lp-b", "b@x.org", Role::Lp, Some("Denver")).await;
    let c = seed_account(&app, "lp-c", "c@x.org", Role::Lp, Some("Denver")).await;

    for token in [&a, &b] {
        let response =
            submit(&app, token, json!({ "pitch_id": "P1", "overall_rating": "Favorite" })).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = submit(&app, &c, json!({ "pitch_id": "P1", "criterion_scores": { "team": 2 } })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(&app, "/api/v1/pitches/P1/reviews/summary", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await["data"].clone();
    assert_eq!(summary["pitch_id"], "P1");
    assert_eq!(summary["count"], 3);

    let groups = summary["groups"].as_array().unwrap();
    assert_eq!(groups[0]["rating"], "Favorite");
    assert_eq!(groups[0]["count"], 2);
    let mut names: Vec<&str> = groups[0]["reviewers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n.as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["Name of lp-a", "Name of lp-b"]);
    assert_eq!(groups[1]["rating"], "No Rating");
    assert_eq!(groups[1]["count"], 1);
}

#[tokio::test]
async fn test_summary_access() {
    let app = build_test_app();
    two_chapters(&app).await;
    let lp = seed_account(&app, "lp-1", "lp@x.org", Role::Lp, Some("Denver")).await;
    let austin = seed_account(&app, "aus-admin", "au@x.org", Role::Admin, Some("Austin")).await;
    let root = seed_account(&app, "root", "root@x.org", Role::SuperAdmin, None).await;

    let uri = "/api/v1/pitches/P1/reviews/summary";
    assert_eq!(get_auth(&app, uri, &lp).await.status(), StatusCode::FORBIDDEN);
    assert_eq!(get_auth(&app, uri, &austin).await.status(), StatusCode::FORBIDDEN);

    let response = get_auth(&app, uri, &root).await;
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await["data"].clone();
    assert_eq!(summary["count"], 0);
    assert!(summary["groups"].as_array().unwrap().is_empty());
}
