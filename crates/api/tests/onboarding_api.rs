//! HTTP-level tests for invitations, session start, and account resolution.

mod common;

use axum::http::StatusCode;
use chapterhouse_api::services::credentials::StaticCredentialRegistry;
use chapterhouse_core::roles::Role;
use chapterhouse_db::models::invitation::CreateInvitation;
use chapterhouse_db::store::DirectoryStore;
use common::{
    body_json, build_test_app, build_test_app_with_credentials, delete_auth, get, get_auth,
    google_token, password_token, post_auth, post_json_auth, seed_account, TestApp,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Issue an invitation through the API and return the response body's data.
async fn issue(app: &TestApp, token: &str, email: &str, role: &str, chapter: Option<&str>) -> serde_json::Value {
    let body = json!({ "email": email, "name": "Invitee", "role": role, "chapter": chapter });
    let response = post_json_auth(app, "/api/v1/admin/invitations", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn redeem(app: &TestApp, token: &str, code: &str) -> axum::http::Response<axum::body::Body> {
    let body = json!({ "code": code, "name": "Alice Example" });
    post_json_auth(app, "/api/v1/invitations/redeem", body, token).await
}

// ---------------------------------------------------------------------------
// Issue and redeem
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_issue_then_redeem_by_code() {
    let app = build_test_app();
    let admin = seed_account(&app, "admin-1", "admin@x.org", Role::Admin, Some("Denver")).await;

    let invitation = issue(&app, &admin, "Alice@X.org", "lp", Some("Denver")).await;
    assert_eq!(invitation["email"], "alice@x.org");
    assert_eq!(invitation["used"], false);
    let code = invitation["code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));

    let alice = password_token("uid-alice", "alice@x.org");
    let response = redeem(&app, &alice, &code).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let account = body_json(response).await["data"].clone();
    assert_eq!(account["id"], "uid-alice");
    assert_eq!(account["role"], "lp");
    assert_eq!(account["chapter"], "Denver");
    assert_eq!(account["name"], "Alice Example");

    let me = body_json(get_auth(&app, "/api/v1/me", &alice).await).await;
    assert_eq!(me["data"]["id"], "uid-alice");

    // The invitation is consumed and no longer pending.
    let listed = body_json(get_auth(&app, "/api/v1/admin/invitations", &admin).await).await;
    assert_eq!(listed["data"][0]["used"], true);
    assert_eq!(listed["data"][0]["registered_account_id"], "uid-alice");
}

#[tokio::test]
async fn test_second_redeem_fails_invalid_invite() {
    let app = build_test_app();
    let admin = seed_account(&app, "admin-1", "admin@x.org", Role::Admin, Some("Denver")).await;
    let code = issue(&app, &admin, "alice@x.org", "lp", Some("Denver")).await["code"]
        .as_str()
        .unwrap()
        .to_string();

    let alice = password_token("uid-alice", "alice@x.org");
    let first = redeem(&app, &alice, &code).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    for token in [alice, password_token("uid-alice-2", "alice@x.org")] {
        let again = redeem(&app, &token, &code).await;
        assert_eq!(again.status(), StatusCode::BAD_REQUEST);
        let json = body_json(again).await;
        assert_eq!(json["code"], "INVALID_INVITE");
        assert_eq!(json["retryable"], false);
    }
    assert!(app.store.find_account("uid-alice-2").await.unwrap().is_none());
}

#[tokio::test]
async fn test_redeem_with_wrong_email_fails() {
    let app = build_test_app();
    let admin = seed_account(&app, "admin-1", "admin@x.org", Role::Admin, Some("Denver")).await;
    let code = issue(&app, &admin, "alice@x.org", "lp", Some("Denver")).await["code"]
        .as_str()
        .unwrap()
        .to_string();

    let response = redeem(&app, &password_token("uid-mallory", "mallory@x.org"), &code).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.store.find_account("uid-mallory").await.unwrap().is_none());
}

/// Codes are not unique across invitations; the email decides which one a
/// redemption consumes.
#[tokio::test]
async fn test_shared_code_redeems_only_own_invitation() {
    let app = build_test_app();
    for email in ["a@x.org", "b@x.org"] {
        app.store
            .insert_invitation(&CreateInvitation {
                email: email.to_string(),
                name: "Invitee".to_string(),
                role: "lp".to_string(),
                chapter: Some("Denver".to_string()),
                code: "SAME01".to_string(),
                created_by: "admin-1".to_string(),
            })
            .await
            .unwrap();
    }

    let response = redeem(&app, &password_token("uid-a", "a@x.org"), "same01").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let b_pending = app.store.find_pending_invitation("b@x.org").await.unwrap();
    assert!(b_pending.is_some(), "b's invitation must stay pending");

    let response = redeem(&app, &password_token("uid-b", "b@x.org"), "SAME01").await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let account = body_json(response).await;
    assert_eq!(account["data"]["email"], "b@x.org");
}

#[tokio::test]
async fn test_issue_duplicate_reasons() {
    let app = build_test_app_with_credentials(StaticCredentialRegistry::new(["known@x.org"]));
    let admin = seed_account(&app, "admin-1", "admin@x.org", Role::Admin, Some("Denver")).await;
    seed_account(&app, "bob", "bob@x.org", Role::Lp, Some("Denver")).await;
    issue(&app, &admin, "carol@x.org", "lp", Some("Denver")).await;

    for email in ["known@x.org", "BOB@x.org", "carol@x.org"] {
        let body = json!({ "email": email, "name": "X", "role": "lp", "chapter": "Denver" });
        let response = post_json_auth(&app, "/api/v1/admin/invitations", body, &admin).await;
        assert_eq!(response.status(), StatusCode::CONFLICT, "email {email}");
        assert_eq!(body_json(response).await["code"], "DUPLICATE_INVITE");
    }

    let pending = app.store.list_invitations(None).await.unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn test_issue_requires_admin() {
    let app = build_test_app();
    let lp = seed_account(&app, "bob", "bob@x.org", Role::Lp, Some("Denver")).await;

    let body = json!({ "email": "a@x.org", "name": "A", "role": "lp", "chapter": "Denver" });
    let response = post_json_auth(&app, "/api/v1/admin/invitations", body, &lp).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_revoke_invitation() {
    let app = build_test_app();
    let admin = seed_account(&app, "admin-1", "admin@x.org", Role::Admin, Some("Denver")).await;
    let id = issue(&app, &admin, "alice@x.org", "lp", Some("Denver")).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let uri = format!("/api/v1/admin/invitations/{id}");
    assert_eq!(delete_auth(&app, &uri, &admin).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(delete_auth(&app, &uri, &admin).await.status(), StatusCode::NOT_FOUND);

    // Email is free again.
    issue(&app, &admin, "alice@x.org", "lp", Some("Denver")).await;
}

// ---------------------------------------------------------------------------
// Session start
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_federated_session_provisions_account() {
    let app = build_test_app();
    let admin = seed_account(&app, "admin-1", "admin@x.org", Role::Admin, Some("Denver")).await;
    issue(&app, &admin, "dana@x.org", "admin", Some("Denver")).await;

    let dana = google_token("google|dana", "Dana@x.org");
    let response = post_auth(&app, "/api/v1/session", &dana).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["provisioned"], true);
    assert_eq!(json["data"]["account"]["role"], "admin");

    let response = post_auth(&app, "/api/v1/session", &dana).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["provisioned"], false);
}

#[tokio::test]
async fn test_session_rejections() {
    let app = build_test_app();

    let response = post_auth(&app, "/api/v1/session", &google_token("google|x", "x@x.org")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "NOT_INVITED");

    let response = post_auth(&app, "/api/v1/session", &password_token("uid-x", "x@x.org")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "ACCOUNT_SETUP_INCOMPLETE");

    let response = get(&app, "/api/v1/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHENTICATED");

    let response = get_auth(&app, "/api/v1/me", "not-a-token").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_role_forces_sign_out() {
    let app = build_test_app();
    let token = seed_account(&app, "eve", "eve@x.org", Role::Lp, Some("Denver")).await;
    let mut account = app.store.find_account("eve").await.unwrap().unwrap();
    account.role = "owner".to_string();
    app.store.seed_account(account).await;

    for response in [
        post_auth(&app, "/api/v1/session", &token).await,
        get_auth(&app, "/api/v1/pitches", &token).await,
    ] {
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("clear-site-data"));
        let json = body_json(response).await;
        assert_eq!(json["code"], "ACCOUNT_ROLE_INVALID");
        assert_eq!(json["sign_out"], true);
    }
}

#[tokio::test]
async fn test_store_outage_is_retryable() {
    let app = build_test_app();
    let token = seed_account(&app, "bob", "bob@x.org", Role::Lp, Some("Denver")).await;
    app.store.set_offline(true);

    let response = get_auth(&app, "/api/v1/me", &token).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.headers().contains_key("retry-after"));
    let json = body_json(response).await;
    assert_eq!(json["code"], "STORE_UNAVAILABLE");
    assert_eq!(json["retryable"], true);
}
