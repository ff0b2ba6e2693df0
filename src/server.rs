use actix_web::{
    http::{header, StatusCode},
    web, App, HttpRequest, HttpResponse, HttpServer, Responder,
};

use crate::{
    config::AppConfig,
    error::{LogoError, Result},
    logger,
    providers::ImageProviders,
    routes::{self, RouteResponse},
    site,
};

pub struct AppState {
    pub providers: ImageProviders,
}

/// Token from an `Authorization: Bearer ...` header, if any.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn respond(response: RouteResponse) -> HttpResponse {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(response.body)
}

async fn landing() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(site::render_landing_page())
}

async fn healthz() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

async fn generate_image(state: web::Data<AppState>, req: HttpRequest, body: web::Bytes) -> impl Responder {
    let token = bearer_token(&req);
    let body = routes::parse_body(&body);
    respond(routes::generate_image(&state.providers, &body, token.as_deref()).await)
}

async fn edit_image(state: web::Data<AppState>, req: HttpRequest, body: web::Bytes) -> impl Responder {
    let token = bearer_token(&req);
    let body = routes::parse_body(&body);
    respond(routes::edit_image(&state.providers, &body, token.as_deref()).await)
}

async fn auth_status(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let token = bearer_token(&req);
    respond(routes::auth_status(&state.providers, token.as_deref()))
}

/// Registers every route. Shared by [`run`] and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(landing))
        .route("/healthz", web::get().to(healthz))
        .service(
            web::scope("/api")
                .route("/generate-image", web::post().to(generate_image))
                .route("/edit-image", web::post().to(edit_image))
                .route("/auth-status", web::get().to(auth_status)),
        );
}

pub async fn run(config: AppConfig) -> Result<()> {
    let address = config.bind_address();
    logger::log_startup_info("EverAfter Logos", env!("CARGO_PKG_VERSION"), &address);
    logger::log_config_info(&config);

    let providers = ImageProviders::new(config)?;
    let state = web::Data::new(AppState { providers });

    // Data URLs for multi-image edits easily exceed the default payload cap.
    let payload_limit = web::PayloadConfig::new(32 * 1024 * 1024);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(payload_limit.clone())
            .configure(configure)
    })
    .bind(&address)
    .map_err(|e| LogoError::ConfigError(format!("cannot bind {}: {}", address, e)))?
    .run()
    .await?;

    log::info!("👋 Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc123"))
            .to_http_request();
        assert_eq!(bearer_token(&req).as_deref(), Some("abc123"));

        let basic = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic abc123"))
            .to_http_request();
        assert!(bearer_token(&basic).is_none());
        assert!(bearer_token(&TestRequest::default().to_http_request()).is_none());
    }
}
