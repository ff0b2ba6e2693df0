use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    error::{LogoError, Result},
    models::{AuthStatus, EditImageRequest, GenerateImageRequest, ImageResponse},
    service::ImageService,
};

/// Talks to a running EverAfter server over its JSON API.
#[derive(Clone)]
pub struct LogoApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl LogoApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let request = self.authorize(self.http.post(self.url(path)).json(body));
        let response = request
            .send()
            .await
            .map_err(|e| LogoError::RequestError(format!("POST {} failed: {}", path, e)))?;
        read_response(response).await
    }

    pub async fn generate_image(&self, request: &GenerateImageRequest) -> Result<ImageResponse> {
        self.post_json("/api/generate-image", request).await
    }

    pub async fn edit_image(&self, request: &EditImageRequest) -> Result<ImageResponse> {
        self.post_json("/api/edit-image", request).await
    }

    pub async fn auth_status(&self) -> Result<AuthStatus> {
        let request = self.authorize(self.http.get(self.url("/api/auth-status")));
        let response = request
            .send()
            .await
            .map_err(|e| LogoError::RequestError(format!("GET /api/auth-status failed: {}", e)))?;
        read_response(response).await
    }
}

async fn read_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| LogoError::ResponseError(e.to_string()))?;

    if !status.is_success() {
        return Err(LogoError::HttpError {
            status: status.as_u16(),
            body: error_body(status, &text),
        });
    }

    serde_json::from_str(&text).map_err(|e| LogoError::SerializationError(e.to_string()))
}

/// Prefers the `{error}` message of an API error body over the raw text.
fn error_body(status: StatusCode, text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(String::from))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            if text.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                text.to_string()
            }
        })
}

#[async_trait]
impl ImageService for LogoApiClient {
    async fn generate(&self, request: &GenerateImageRequest) -> Result<String> {
        Ok(self.generate_image(request).await?.image_url)
    }

    async fn edit(&self, request: &EditImageRequest) -> Result<String> {
        Ok(self.edit_image(request).await?.image_url)
    }
}
