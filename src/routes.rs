//! Framework-independent API handlers.
//!
//! Each handler takes an already-read body and returns a status plus JSON,
//! so the same logic backs the actix server, the in-process CLI path and
//! the tests.

use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::LogoError,
    logger,
    models::{AuthStatus, EditImageRequest, ErrorResponse, GenerateImageRequest, ImageResponse},
    prompt::build_prompt,
    providers::ImageProviders,
    validation::{validate_edit_image_request, validate_generate_image_request, ValidationResult},
};

pub const AUTH_CHECK_FAILED: &str = "auth check failed";

#[derive(Debug, Clone, PartialEq)]
pub struct RouteResponse {
    pub status: u16,
    pub body: Value,
}

impl RouteResponse {
    pub fn ok<T: Serialize>(body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status: 200, body },
            Err(e) => Self::error(500, e.to_string()),
        }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        let body = serde_json::to_value(ErrorResponse {
            error: message.into(),
        })
        .unwrap_or(Value::Null);
        Self { status, body }
    }

    pub fn from_error(error: &LogoError) -> Self {
        Self::error(error.status_code(), error.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `imageUrl` of a successful image response.
    pub fn image_url(&self) -> Option<&str> {
        self.body.get("imageUrl").and_then(Value::as_str)
    }

    /// The `error` message of a failed response.
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

/// Bodies that aren't JSON become `null`, which the validators reject as an
/// invalid body.
pub fn parse_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or(Value::Null)
}

fn rejection(result: ValidationResult) -> Option<RouteResponse> {
    if result.is_valid {
        return None;
    }
    let error = result.error.unwrap_or_else(|| crate::validation::ValidationError {
        message: "Invalid request body".to_string(),
        status: 400,
    });
    Some(RouteResponse::error(error.status, error.message))
}

pub async fn generate_image(
    providers: &ImageProviders,
    body: &Value,
    session_token: Option<&str>,
) -> RouteResponse {
    let _timer = logger::timer("generate-image");

    if let Some(response) = rejection(validate_generate_image_request(body)) {
        log::warn!("Rejected generate request: {:?}", response.error_message());
        return response;
    }

    let request: GenerateImageRequest = match serde_json::from_value(body.clone()) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Generate request did not deserialize: {}", e);
            return RouteResponse::error(400, "Invalid request body");
        }
    };

    let prompt = match (&request.logo_options, request.is_wedding_logo()) {
        (Some(options), true) => build_prompt(options, request.preset, request.seed),
        _ => request.prompt.clone(),
    };

    let token = match providers.resolve_token(request.model, session_token) {
        Some(token) => token,
        None => return RouteResponse::from_error(&LogoError::AuthError),
    };

    log::info!(
        "🎨 Generating with {} ({} chars of prompt)",
        request.model.display_name(),
        prompt.chars().count()
    );

    match providers.generate(request.model, &prompt, &token).await {
        Ok(image_url) => RouteResponse::ok(&ImageResponse { image_url }),
        Err(e) => {
            log::error!("Image generation failed: {}", e);
            RouteResponse::from_error(&e)
        }
    }
}

pub async fn edit_image(
    providers: &ImageProviders,
    body: &Value,
    session_token: Option<&str>,
) -> RouteResponse {
    let _timer = logger::timer("edit-image");

    if let Some(response) = rejection(validate_edit_image_request(body)) {
        log::warn!("Rejected edit request: {:?}", response.error_message());
        return response;
    }

    let request: EditImageRequest = match serde_json::from_value(body.clone()) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Edit request did not deserialize: {}", e);
            return RouteResponse::error(400, "Invalid request body");
        }
    };

    let token = match providers.resolve_token(request.provider, session_token) {
        Some(token) => token,
        None => return RouteResponse::from_error(&LogoError::AuthError),
    };

    log::info!(
        "✏️  Editing {} image(s) with {}",
        request.image_urls.len(),
        request.provider.display_name()
    );

    match providers
        .edit(request.provider, &request.prompt, &request.image_urls, &token)
        .await
    {
        Ok(image_url) => RouteResponse::ok(&ImageResponse { image_url }),
        Err(e) => {
            log::error!("Image edit failed: {}", e);
            RouteResponse::from_error(&e)
        }
    }
}

/// Signed in means the caller sent a session token. `hasToken` is whether
/// any provider call could be authenticated at all.
pub fn auth_status(providers: &ImageProviders, session_token: Option<&str>) -> RouteResponse {
    let session = session_token.filter(|token| !token.trim().is_empty());
    let has_token = crate::models::ModelOption::ALL
        .into_iter()
        .any(|model| providers.resolve_token(model, session).is_some());

    let user = session.map(|_| json!({ "appId": providers.config().app_id }));
    let status = AuthStatus {
        signed_in: session.is_some(),
        has_token,
        user,
    };

    match serde_json::to_value(&status) {
        Ok(body) => RouteResponse { status: 200, body },
        Err(e) => {
            log::error!("Auth status failed: {}", e);
            RouteResponse::error(500, AUTH_CHECK_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, ProviderConfig};

    fn providers() -> ImageProviders {
        ImageProviders::new(AppConfig::new()).unwrap()
    }

    #[test]
    fn test_parse_body_tolerates_garbage() {
        assert_eq!(parse_body(b"{not json"), Value::Null);
        assert_eq!(parse_body(br#"{"prompt":"x"}"#), json!({"prompt": "x"}));
    }

    #[tokio::test]
    async fn test_generate_rejects_invalid_body() {
        let response = generate_image(&providers(), &Value::Null, None).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.error_message(), Some("Invalid request body"));
    }

    #[tokio::test]
    async fn test_generate_rejects_short_prompt() {
        let body = json!({"prompt": "hi", "model": "gemini"});
        let response = generate_image(&providers(), &body, None).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.error_message(), Some("Prompt must be 3-1000 characters"));
    }

    #[tokio::test]
    async fn test_generate_without_token_is_unauthorized() {
        let body = json!({"prompt": "A valid prompt", "model": "openai"});
        let response = generate_image(&providers(), &body, None).await;
        assert_eq!(response.status, 401);
        assert_eq!(
            response.error_message(),
            Some("Authentication failed. Please sign in.")
        );
    }

    #[tokio::test]
    async fn test_loosely_typed_bodies_that_validate_reach_token_check() {
        let bodies = [
            json!({"prompt": "A valid prompt", "model": "gemini", "mode": "wedding-logo",
                   "logoOptions": {"initials": "AB", "style": "modern", "colors": null}}),
            json!({"prompt": "A valid prompt", "model": "gemini", "mode": "wedding-logo",
                   "logoOptions": {"initials": "AB", "style": "modern", "variants": null}}),
            json!({"prompt": "A valid prompt", "model": "openai", "logoOptions": {"initials": "AB"}}),
            json!({"prompt": "A valid prompt", "model": "openai", "count": -1}),
            json!({"prompt": "A valid prompt", "model": "openai", "mode": false}),
        ];

        for body in bodies {
            assert!(validate_generate_image_request(&body).is_valid, "{}", body);
            let response = generate_image(&providers(), &body, None).await;
            assert_eq!(response.status, 401, "{}", body);
        }
    }

    #[tokio::test]
    async fn test_edit_requires_images() {
        let body = json!({"prompt": "make it gold", "imageUrls": [], "provider": "gemini"});
        let response = edit_image(&providers(), &body, Some("token")).await;
        assert_eq!(response.status, 400);
        assert_eq!(response.error_message(), Some("At least one image is required"));
    }

    #[test]
    fn test_auth_status_reports_session_and_keys() {
        let anonymous = auth_status(&providers(), None);
        assert_eq!(anonymous.status, 200);
        assert_eq!(
            anonymous.body,
            json!({"signedIn": false, "hasToken": false, "user": null})
        );

        let keyed = ImageProviders::new(
            AppConfig::new()
                .with_app_id("app-123")
                .with_openai(ProviderConfig::openai().with_api_key("sk-test")),
        )
        .unwrap();
        let anonymous_with_key = auth_status(&keyed, None);
        assert_eq!(anonymous_with_key.body["hasToken"], json!(true));

        let signed_in = auth_status(&keyed, Some("session"));
        assert_eq!(signed_in.body["signedIn"], json!(true));
        assert_eq!(signed_in.body["user"]["appId"], json!("app-123"));
    }
}
