use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};

use crate::{
    config::ProviderConfig,
    data_url::{self, DataUrl},
    error::{LogoError, Result},
};

use super::{read_json, NO_EDITED_IMAGE, NO_IMAGE_GENERATED};

const IMAGE_SIZE: &str = "1024x1024";

#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, config: ProviderConfig) -> Self {
        Self { http, config }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    pub async fn generate(&self, prompt: &str, token: &str) -> Result<String> {
        let payload = json!({
            "model": self.config.model,
            "prompt": prompt,
            "size": IMAGE_SIZE,
            "n": 1
        });

        log::info!("Generating image with OpenAI model: {}", self.config.model);
        log::debug!("OpenAI prompt length: {} chars", prompt.len());

        let response = self
            .http
            .post(self.endpoint("images/generations"))
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LogoError::RequestError(e.to_string()))?;

        let body = read_json("OpenAI", response).await?;
        extract_image(&body).ok_or_else(|| LogoError::ProviderError(NO_IMAGE_GENERATED.into()))
    }

    pub async fn edit(&self, prompt: &str, image_urls: &[String], token: &str) -> Result<String> {
        let mut form = Form::new()
            .text("model", self.config.model.clone())
            .text("prompt", prompt.to_string())
            .text("size", IMAGE_SIZE);

        for (index, url) in image_urls.iter().enumerate() {
            let image = DataUrl::parse(url)
                .map_err(|e| LogoError::ValidationError(format!("imageUrls[{}]: {}", index, e)))?;
            let filename = format!(
                "image-{}.{}",
                index + 1,
                data_url::extension_for_media_type(&image.media_type)
            );
            let part = Part::bytes(image.data)
                .file_name(filename)
                .mime_str(&image.media_type)
                .map_err(|e| LogoError::RequestError(e.to_string()))?;
            form = form.part("image[]", part);
        }

        log::info!(
            "Editing {} image(s) with OpenAI model: {}",
            image_urls.len(),
            self.config.model
        );

        let response = self
            .http
            .post(self.endpoint("images/edits"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| LogoError::RequestError(e.to_string()))?;

        let body = read_json("OpenAI", response).await?;
        extract_image(&body).ok_or_else(|| LogoError::ProviderError(NO_EDITED_IMAGE.into()))
    }
}

/// First `b64_json` entry of an images API response, as a PNG data URL.
pub fn extract_image(body: &Value) -> Option<String> {
    body["data"]
        .as_array()?
        .iter()
        .find_map(|item| item["b64_json"].as_str())
        .map(|payload| data_url::from_base64("image/png", payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_image_uses_first_b64_entry() {
        let body = json!({
            "created": 1,
            "data": [{"url": "https://x"}, {"b64_json": "iVBORw0KGgo="}, {"b64_json": "second"}]
        });
        assert_eq!(
            extract_image(&body).as_deref(),
            Some("data:image/png;base64,iVBORw0KGgo=")
        );
    }

    #[test]
    fn test_extract_image_missing() {
        assert!(extract_image(&json!({"data": []})).is_none());
        assert!(extract_image(&json!({})).is_none());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = OpenAiClient::new(
            reqwest::Client::new(),
            ProviderConfig::openai().with_base_url("http://localhost:9000/v1/"),
        );
        assert_eq!(
            client.endpoint("images/edits"),
            "http://localhost:9000/v1/images/edits"
        );
    }
}
