//! CORS behaviour of the service endpoints

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};

use crate::common::{body_text, TestApp};

#[tokio::test]
async fn test_preflight_on_every_service_route() {
    let app = TestApp::new();
    for uri in [
        "/api/get-polaroid-by-slug",
        "/api/get-polaroids",
        "/api/delete-polaroid",
        "/api/notifications",
    ] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .header(header::ORIGIN, "https://elsewhere.example")
            .body(Body::empty())
            .unwrap();
        let response = app.request(request).await;
        assert_eq!(response.status(), StatusCode::OK, "preflight for {}", uri);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "GET, POST, OPTIONS"
        );
        assert!(body_text(response).await.is_empty());
    }
}

#[tokio::test]
async fn test_error_responses_carry_cors_headers() {
    let app = TestApp::new();
    let response = app.get("/api/get-polaroid-by-slug?slug=missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "authorization, x-client-info, apikey, content-type"
    );
}
