//! Card service integration tests

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use devcard::backend::store::{CardStore, MemoryCardStore};

use crate::common::{
    aged, auth_header, body_json, body_text, draft_card, generate_test_token, public_card,
    storage_router, TestApp,
};

#[tokio::test]
async fn test_get_by_slug() {
    let app = TestApp::new();
    let card = app.cards.insert_card(public_card(Uuid::new_v4(), "joe")).await.unwrap();

    let response = app.get("/api/get-polaroid-by-slug?slug=joe").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["id"], json!(card.id));
    assert_eq!(body["data"]["slug"], "joe");
}

#[tokio::test]
async fn test_get_by_slug_errors() {
    let app = TestApp::new();

    let response = app.get("/api/get-polaroid-by-slug?slug=nobody").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["status"], 404);
    assert!(body["error"].is_string());

    let response = app.get("/api/get-polaroid-by-slug").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.get("/api/get-polaroid-by-slug?slug=%20%20").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.get("/api/get-polaroid-by-slug?slug=a%2Fb").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["status"], 404);

    let long = "x".repeat(200);
    let response = app.get(&format!("/api/get-polaroid-by-slug?slug={}", long)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_query_gets_error_envelope() {
    let app = TestApp::new();

    let response = app.get("/api/get-polaroids?type=community&limit=ten").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let body = body_json(response).await;
    assert_eq!(body["status"], 400);
    assert!(body["error"].is_string());

    let response = app.get("/api/get-polaroids?type=community&limit=1.5").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["status"], 400);
}

#[tokio::test]
async fn test_store_failure_is_500() {
    let app = TestApp::new();
    app.cards.set_failing(true);
    let response = app.get("/api/get-polaroid-by-slug?slug=joe").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["status"], 500);
}

#[tokio::test]
async fn test_community_feed_eligibility() {
    let app = TestApp::new();
    let owner = Uuid::new_v4();
    let mut public_ids = Vec::new();
    for handle in ["ana", "bo", "cy"] {
        let card = app.cards.insert_card(public_card(owner, handle)).await.unwrap();
        public_ids.push(card.id);
    }
    app.cards.insert_card(draft_card(owner, "no-image")).await.unwrap();
    let mut blank_handle = public_card(owner, "blank");
    blank_handle.profile.handles[0].handle = "  ".to_string();
    app.cards.insert_card(blank_handle).await.unwrap();

    let response = app
        .post_json("/api/get-polaroids", json!({"type": "community"}), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let mut ids: Vec<Uuid> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| serde_json::from_value(c["id"].clone()).unwrap())
        .collect();
    ids.sort();
    public_ids.sort();
    assert_eq!(ids, public_ids);
}

#[tokio::test]
async fn test_community_feed_limit() {
    let app = TestApp::new();
    for i in 0..6 {
        app.cards
            .insert_card(public_card(Uuid::new_v4(), &format!("dev{}", i)))
            .await
            .unwrap();
    }

    let response = app
        .post_json("/api/get-polaroids", json!({"type": "community", "limit": 2}), None)
        .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);

    let response = app.get("/api/get-polaroids?type=community&limit=4").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 4);

    // Out-of-range limits are clamped, not rejected
    let response = app
        .post_json("/api/get-polaroids", json!({"type": "community", "limit": 0}), None)
        .await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_feed_type_required() {
    let app = TestApp::new();

    let response = app.post_json("/api/get-polaroids", json!({}), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json("/api/get-polaroids", json!({"type": "everyone"}), None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_feed_requires_auth_and_orders_newest_first() {
    let app = TestApp::new();
    let owner = Uuid::new_v4();
    let old = app.cards.insert_card(aged(draft_card(owner, "old"), 30)).await.unwrap();
    let new = app.cards.insert_card(aged(draft_card(owner, "new"), 1)).await.unwrap();
    app.cards
        .insert_card(public_card(Uuid::new_v4(), "someone-else"))
        .await
        .unwrap();

    let response = app
        .post_json("/api/get-polaroids", json!({"type": "user"}), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let token = generate_test_token(owner);
    let response = app
        .post_json("/api/get-polaroids", json!({"type": "user"}), Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let slugs: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec![new.slug.as_str(), old.slug.as_str()]);
}

#[tokio::test]
async fn test_delete_enforces_ownership() {
    let app = TestApp::new();
    let owner_a = Uuid::new_v4();
    let owner_b = Uuid::new_v4();
    let card = app.cards.insert_card(public_card(owner_a, "mine")).await.unwrap();
    let blob_path = format!("{}/mine.png", owner_a);
    app.blobs.put(blob_path.clone()).await;

    let body = json!({"id": card.id});

    let response = app
        .post_json("/api/delete-polaroid", body.clone(), Some(&generate_test_token(owner_b)))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.cards.card_by_id(card.id).await.unwrap().is_some());

    let token_a = generate_test_token(owner_a);
    let response = app
        .post_json("/api/delete-polaroid", body.clone(), Some(&token_a))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"data": {"success": true}}));
    assert!(!app.blobs.contains(&blob_path).await);

    let response = app.get("/api/get-polaroid-by-slug?slug=mine").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .post_json("/api/delete-polaroid", body, Some(&token_a))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_removes_served_image_file() {
    let dir = tempfile::tempdir().unwrap();
    let owner = Uuid::new_v4();
    let image_dir = dir.path().join("polaroids").join(owner.to_string());
    std::fs::create_dir_all(&image_dir).unwrap();
    std::fs::write(image_dir.join("local.png"), b"png").unwrap();

    let cards = Arc::new(MemoryCardStore::new());
    let card = cards
        .insert_card(public_card(owner, "local").with_image(format!(
            "https://devcard.example/storage/polaroids/{}/local.png",
            owner
        )))
        .await
        .unwrap();
    let router = storage_router(cards.clone(), dir.path());

    let image_uri = format!("/storage/polaroids/{}/local.png", owner);
    let response = router
        .clone()
        .oneshot(Request::get(image_uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "png");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/delete-polaroid")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, auth_header(&generate_test_token(owner)))
        .body(Body::from(json!({"id": card.id}).to_string()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(!image_dir.join("local.png").exists());
    let response = router
        .oneshot(Request::get(image_uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_survives_blob_failure() {
    let app = TestApp::new();
    let owner = Uuid::new_v4();
    let card = app.cards.insert_card(public_card(owner, "orphan")).await.unwrap();
    app.blobs.set_failing(true);

    let response = app
        .post_json(
            "/api/delete-polaroid",
            json!({"id": card.id}),
            Some(&generate_test_token(owner)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(app.cards.card_by_id(card.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_input_validation() {
    let app = TestApp::new();
    let token = generate_test_token(Uuid::new_v4());

    let response = app
        .post_json("/api/delete-polaroid", json!({"id": Uuid::new_v4()}), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.post_json("/api/delete-polaroid", json!({}), Some(&token)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json("/api/delete-polaroid", json!({"id": "not-a-uuid"}), Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json("/api/delete-polaroid", json!({"id": Uuid::new_v4()}), Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = TestApp::new();
    let response = app
        .post_json("/api/get-polaroids", json!({"type": "user"}), Some("not.a.jwt"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["status"], 401);
}
