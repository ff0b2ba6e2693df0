#![cfg(feature = "server")]

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};

use everafter::{
    server::{configure, AppState},
    AppConfig, ImageProviders, ProviderConfig,
};

fn state(config: AppConfig) -> web::Data<AppState> {
    web::Data::new(AppState {
        providers: ImageProviders::new(config).unwrap(),
    })
}

#[actix_web::test]
async fn test_generate_image_rejects_bad_bodies() {
    let app = test::init_service(App::new().app_data(state(AppConfig::new())).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/generate-image")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Invalid request body"}));

    let req = test::TestRequest::post()
        .uri("/api/generate-image")
        .set_json(json!({
            "prompt": "A valid prompt",
            "model": "gemini",
            "mode": "wedding-logo",
            "logoOptions": {"initials": "ABCDEFG", "style": "minimal"}
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("initials (1-6 chars) required"));

    let req = test::TestRequest::post()
        .uri("/api/generate-image")
        .set_json(json!({"prompt": "A valid prompt", "model": "dalle"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("Model must be: openai, gemini"));
}

#[actix_web::test]
async fn test_generate_image_requires_a_token() {
    let app = test::init_service(App::new().app_data(state(AppConfig::new())).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/generate-image")
        .set_json(json!({"prompt": "A valid prompt", "model": "openai"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("Authentication failed. Please sign in."));
}

#[actix_web::test]
async fn test_edit_image_validation() {
    let app = test::init_service(App::new().app_data(state(AppConfig::new())).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/edit-image")
        .set_json(json!({"prompt": "add florals", "imageUrls": [], "provider": "openai"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("At least one image is required"));
}

#[actix_web::test]
async fn test_auth_status() {
    let config = AppConfig::new()
        .with_app_id("everafter-test")
        .with_gemini(ProviderConfig::gemini().with_api_key("server-key"));
    let app = test::init_service(App::new().app_data(state(config)).configure(configure)).await;

    let req = test::TestRequest::get().uri("/api/auth-status").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"signedIn": false, "hasToken": true, "user": null}));

    let req = test::TestRequest::get()
        .uri("/api/auth-status")
        .insert_header(("authorization", "Bearer session-token"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["signedIn"], json!(true));
    assert_eq!(body["user"]["appId"], json!("everafter-test"));
}

#[actix_web::test]
async fn test_landing_page_and_health() {
    let app = test::init_service(App::new().app_data(state(AppConfig::new())).configure(configure)).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let html = test::read_body(resp).await;
    let html = String::from_utf8(html.to_vec()).unwrap();
    assert!(html.contains("EverAfter Logos"));
    assert!(html.contains("Loved by Couples Everywhere"));

    let req = test::TestRequest::get().uri("/healthz").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], json!("ok"));
}
