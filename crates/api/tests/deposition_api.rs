//! HTTP-level integration tests for the deposition compiler.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_json_auth, token_for};
use sqlx::PgPool;

async fn create_deposition(pool: &PgPool, token: &str, title: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "title": title });
    let response = post_json_auth(app, "/api/v1/depositions", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().expect("id")
}

async fn register_evidence(pool: &PgPool, token: &str, title: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "title": title,
        "file_path": format!("blobs/{title}.pdf"),
        "file_type": "pdf",
    });
    let response = post_json_auth(app, "/api/v1/evidence", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().expect("id")
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_attach_detach_and_ordered_detail(pool: PgPool) {
    let lawyer = common::create_user(&pool, "counsel", "lawyer").await;
    let token = token_for(&lawyer);

    let deposition_id = create_deposition(&pool, &token, "Case file").await;
    let first = register_evidence(&pool, &token, "statement").await;
    let second = register_evidence(&pool, &token, "photo-log").await;

    // Attach in reverse display order.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "evidence_id": second, "position": 2 });
    let response = post_json_auth(
        app,
        &format!("/api/v1/depositions/{deposition_id}/evidence"),
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "evidence_id": first, "position": 1 });
    let response = post_json_auth(
        app,
        &format!("/api/v1/depositions/{deposition_id}/evidence"),
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Detail returns the sequence in position order.
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/depositions/{deposition_id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let sequence = json["evidence"].as_array().expect("array");
    assert_eq!(sequence.len(), 2);
    assert_eq!(sequence[0]["evidence_id"], first);
    assert_eq!(sequence[1]["evidence_id"], second);

    // Detach and verify.
    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/depositions/{deposition_id}/evidence/{second}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/depositions/{deposition_id}"), &token).await;
    let json = body_json(response).await;
    assert_eq!(json["evidence"].as_array().expect("array").len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_attach_conflicts(pool: PgPool) {
    let lawyer = common::create_user(&pool, "counsel2", "lawyer").await;
    let token = token_for(&lawyer);

    let deposition_id = create_deposition(&pool, &token, "Dup case").await;
    let evidence_id = register_evidence(&pool, &token, "exhibit").await;

    let body = serde_json::json!({ "evidence_id": evidence_id, "position": 0 });
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/depositions/{deposition_id}/evidence"),
        body.clone(),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/depositions/{deposition_id}/evidence"),
        body,
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_author_modifies_deposition(pool: PgPool) {
    let author = common::create_user(&pool, "author", "lawyer").await;
    let other = common::create_user(&pool, "other", "lawyer").await;
    let author_token = token_for(&author);

    let deposition_id = create_deposition(&pool, &author_token, "Private file").await;
    let evidence_id = register_evidence(&pool, &author_token, "private-doc").await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "evidence_id": evidence_id, "position": 0 });
    let response = post_json_auth(
        app,
        &format!("/api/v1/depositions/{deposition_id}/evidence"),
        body,
        &token_for(&other),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A stranger cannot even read it.
    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/depositions/{deposition_id}"),
        &token_for(&other),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_listing_is_scoped_to_author(pool: PgPool) {
    let alice = common::create_user(&pool, "alice", "lawyer").await;
    let bob = common::create_user(&pool, "bob", "lawyer").await;

    create_deposition(&pool, &token_for(&alice), "Alice's notes").await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/depositions", &token_for(&alice)).await;
    assert_eq!(body_json(response).await.as_array().expect("array").len(), 1);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/depositions", &token_for(&bob)).await;
    assert_eq!(body_json(response).await.as_array().expect("array").len(), 0);
}
