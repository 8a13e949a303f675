//! Share route behaviour for crawlers and people

use std::time::Duration;

use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use devcard::backend::preview::PreviewSettings;
use devcard::backend::server::ShellSettings;
use devcard::shared::CardRecord;

use crate::assert_contains;
use crate::common::{body_text, profile, TestApp};

const TWITTERBOT: &str = "Twitterbot/1.0";
const BROWSER: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15";

async fn app_with_joe() -> TestApp {
    let app = TestApp::new();
    let card = CardRecord::new(
        "abc",
        Uuid::new_v4(),
        profile("joe", Some("composer-1"), Some("pro"), true),
    );
    app.cards.insert_card(card).await.unwrap();
    app
}

#[tokio::test]
async fn test_crawler_gets_preview_document() {
    let app = app_with_joe().await;
    let response = app.get_as("/c/abc", TWITTERBOT).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=3600"
    );

    let html = body_text(response).await;
    assert_contains!(html, "<meta property=\"og:title\" content=\"@joe&#39;s dev card\">");
    assert_contains!(html, "content=\"Composer 1 · PRO · MAX\"");
    assert_contains!(html, "<meta name=\"twitter:card\" content=\"summary_large_image\">");
    assert_contains!(html, "content=\"https://devcard.example/api/og/abc\"");
    assert_contains!(html, "<link rel=\"canonical\" href=\"https://devcard.example/c/abc\">");
}

#[tokio::test]
async fn test_browser_passes_through_to_empty_shell() {
    let app = app_with_joe().await;
    let response = app.get_as("/c/abc", BROWSER).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    assert_eq!(body_text(response).await, "");
}

#[tokio::test]
async fn test_crawler_for_unknown_slug_passes_through() {
    let app = app_with_joe().await;
    let response = app.get_as("/c/nobody", TWITTERBOT).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "");
}

#[tokio::test]
async fn test_store_failure_never_fails_the_request() {
    let app = app_with_joe().await;
    app.cards.set_failing(true);
    let response = app.get_as("/c/abc", "Slackbot-LinkExpanding 1.0").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "");
}

#[tokio::test]
async fn test_slow_store_times_out_to_pass_through() {
    let app = TestApp::build(|state| {
        state.with_preview(PreviewSettings {
            fetch_timeout: Duration::from_millis(20),
            ..PreviewSettings::default()
        })
    });
    app.cards
        .insert_card(CardRecord::new("abc", Uuid::new_v4(), profile("joe", None, None, false)))
        .await
        .unwrap();
    app.cards.set_read_delay(Duration::from_millis(500));

    let response = app.get_as("/c/abc", TWITTERBOT).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "");
}

#[tokio::test]
async fn test_human_gets_configured_shell() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<div id=\"app\"></div>").unwrap();
    let app = TestApp::with_shell(ShellSettings {
        dir: Some(dir.path().to_path_buf()),
    });

    let response = app.get_as("/c/abc/edit", BROWSER).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "<div id=\"app\"></div>");
}

#[tokio::test]
async fn test_crawler_on_other_paths_is_untouched() {
    let app = app_with_joe().await;
    let response = app.get_as("/about", TWITTERBOT).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get_as("/c/", TWITTERBOT).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_forwarded_proto_shapes_absolute_urls() {
    let app = app_with_joe().await;
    let request = axum::http::Request::get("/c/abc")
        .header(header::HOST, "cards.internal:8080")
        .header("x-forwarded-proto", "http")
        .header(header::USER_AGENT, "facebookexternalhit/1.1")
        .body(axum::body::Body::empty())
        .unwrap();
    let html = body_text(app.request(request).await).await;
    assert_contains!(html, "http://cards.internal:8080/c/abc");
}
