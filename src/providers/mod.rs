pub mod gemini_client;
pub mod openai_client;

use serde_json::Value;
use std::time::Duration;

use crate::{
    config::AppConfig,
    error::{LogoError, Result},
    models::ModelOption,
};

pub use gemini_client::GeminiClient;
pub use openai_client::OpenAiClient;

pub const NO_IMAGE_GENERATED: &str = "No image was generated";
pub const NO_EDITED_IMAGE: &str = "No edited image was returned";

/// Both image backends behind one handle. Selection is a plain `match` on
/// [`ModelOption`]; unknown model names never get this far.
#[derive(Clone)]
pub struct ImageProviders {
    openai: OpenAiClient,
    gemini: GeminiClient,
    config: AppConfig,
}

impl ImageProviders {
    pub fn new(config: AppConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| LogoError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            openai: OpenAiClient::new(http.clone(), config.openai.clone()),
            gemini: GeminiClient::new(http, config.gemini.clone()),
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The caller's session token wins; otherwise the server-side key for
    /// that provider, if one is configured.
    pub fn resolve_token(&self, model: ModelOption, session_token: Option<&str>) -> Option<String> {
        session_token
            .filter(|token| !token.trim().is_empty())
            .map(String::from)
            .or_else(|| self.config.provider(model).api_key.clone())
    }

    pub async fn generate(&self, model: ModelOption, prompt: &str, token: &str) -> Result<String> {
        match model {
            ModelOption::OpenAi => self.openai.generate(prompt, token).await,
            ModelOption::Gemini => self.gemini.generate(prompt, token).await,
        }
    }

    pub async fn edit(
        &self,
        model: ModelOption,
        prompt: &str,
        image_urls: &[String],
        token: &str,
    ) -> Result<String> {
        match model {
            ModelOption::OpenAi => self.openai.edit(prompt, image_urls, token).await,
            ModelOption::Gemini => self.gemini.edit(prompt, image_urls, token).await,
        }
    }
}

/// Reads a provider response as text and checks the status before parsing,
/// so an HTML error page still yields the status fallback message.
pub(crate) async fn read_json(provider: &str, response: reqwest::Response) -> Result<Value> {
    let status = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| LogoError::ResponseError(e.to_string()))?;
    parse_body(provider, status, &text)
}

fn parse_body(provider: &str, status: u16, text: &str) -> Result<Value> {
    if !(200..300).contains(&status) {
        log::error!("{} returned {}: {}", provider, status, text);
        let body: Value = serde_json::from_str(text).unwrap_or(Value::Null);
        return Err(LogoError::ProviderError(error_message(&body).unwrap_or_else(|| {
            format!("{} request failed with status {}", provider, status)
        })));
    }
    serde_json::from_str(text).map_err(|e| LogoError::ResponseError(e.to_string()))
}

/// Pulls a human readable message out of a provider error body.
pub(crate) fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use serde_json::json;

    #[test]
    fn test_resolve_token_prefers_session() {
        let config = AppConfig::new().with_gemini(ProviderConfig::gemini().with_api_key("server-key"));
        let providers = ImageProviders::new(config).unwrap();

        assert_eq!(
            providers.resolve_token(ModelOption::Gemini, Some("user-token")).as_deref(),
            Some("user-token")
        );
        assert_eq!(
            providers.resolve_token(ModelOption::Gemini, Some("  ")).as_deref(),
            Some("server-key")
        );
        assert!(providers.resolve_token(ModelOption::OpenAi, None).is_none());
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(&json!({"error": {"message": "quota exceeded"}})).as_deref(),
            Some("quota exceeded")
        );
        assert_eq!(error_message(&json!({"error": "bad"})).as_deref(), Some("bad"));
        assert!(error_message(&json!({"ok": true})).is_none());
    }

    #[test]
    fn test_parse_body_checks_status_before_json() {
        let err = parse_body("Gemini", 502, "<html><body>Bad Gateway</body></html>").unwrap_err();
        assert_eq!(err.to_string(), "Gemini request failed with status 502");

        let err = parse_body("OpenAI", 429, r#"{"error":{"message":"quota exceeded"}}"#).unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");

        let err = parse_body("OpenAI", 200, "not json").unwrap_err();
        assert!(matches!(err, LogoError::ResponseError(_)));

        assert_eq!(parse_body("OpenAI", 200, r#"{"data":[]}"#).unwrap(), json!({"data": []}));
    }
}
