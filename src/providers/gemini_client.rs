use serde_json::{json, Value};

use crate::{
    config::ProviderConfig,
    data_url,
    error::{LogoError, Result},
};

use super::{read_json, NO_EDITED_IMAGE, NO_IMAGE_GENERATED};

#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client, config: ProviderConfig) -> Self {
        Self { http, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    pub async fn generate(&self, prompt: &str, token: &str) -> Result<String> {
        log::info!("Generating image with Gemini model: {}", self.config.model);
        let parts = vec![json!({ "text": prompt })];
        let body = self.invoke(parts, token).await?;
        extract_image(&body).ok_or_else(|| LogoError::ProviderError(NO_IMAGE_GENERATED.into()))
    }

    pub async fn edit(&self, prompt: &str, image_urls: &[String], token: &str) -> Result<String> {
        log::info!(
            "Editing {} image(s) with Gemini model: {}",
            image_urls.len(),
            self.config.model
        );
        let mut parts = vec![json!({ "text": prompt })];
        for (index, url) in image_urls.iter().enumerate() {
            parts.push(inline_image_part(url).ok_or_else(|| {
                LogoError::ValidationError(format!("imageUrls[{}] must be a base64 data URL", index))
            })?);
        }
        let body = self.invoke(parts, token).await?;
        extract_image(&body).ok_or_else(|| LogoError::ProviderError(NO_EDITED_IMAGE.into()))
    }

    async fn invoke(&self, parts: Vec<Value>, token: &str) -> Result<Value> {
        let payload = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": { "responseModalities": ["TEXT", "IMAGE"] }
        });

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LogoError::RequestError(e.to_string()))?;

        read_json("Gemini", response).await
    }
}

fn inline_image_part(url: &str) -> Option<Value> {
    let (header, payload) = url.strip_prefix("data:")?.split_once(";base64,")?;
    let mime_type = if header.is_empty() {
        data_url::media_type_of(url)
    } else {
        header
    };
    Some(json!({ "inlineData": { "mimeType": mime_type, "data": payload } }))
}

/// First image part across all candidates, as a data URL.
pub fn extract_image(body: &Value) -> Option<String> {
    body["candidates"]
        .as_array()?
        .iter()
        .filter_map(|candidate| candidate["content"]["parts"].as_array())
        .flatten()
        .find_map(|part| {
            let inline = part.get("inlineData").or_else(|| part.get("inline_data"))?;
            let mime = inline
                .get("mimeType")
                .or_else(|| inline.get("mime_type"))?
                .as_str()?;
            if !mime.starts_with("image/") {
                return None;
            }
            let payload = inline["data"].as_str()?;
            Some(data_url::from_base64(mime, payload))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_image_skips_text_and_non_images() {
        let body = json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "Here is your logo"},
                    {"inlineData": {"mimeType": "text/plain", "data": "aGk="}},
                    {"inlineData": {"mimeType": "image/webp", "data": "UklGRg=="}}
                ]}
            }]
        });
        assert_eq!(
            extract_image(&body).as_deref(),
            Some("data:image/webp;base64,UklGRg==")
        );
    }

    #[test]
    fn test_extract_image_accepts_snake_case() {
        let body = json!({
            "candidates": [{"content": {"parts": [
                {"inline_data": {"mime_type": "image/png", "data": "AAAA"}}
            ]}}]
        });
        assert_eq!(extract_image(&body).as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_extract_image_none_when_text_only() {
        let body = json!({"candidates": [{"content": {"parts": [{"text": "sorry"}]}}]});
        assert!(extract_image(&body).is_none());
    }

    #[test]
    fn test_inline_image_part() {
        let part = inline_image_part("data:image/jpeg;base64,/9j/").unwrap();
        assert_eq!(part["inlineData"]["mimeType"], json!("image/jpeg"));
        assert_eq!(part["inlineData"]["data"], json!("/9j/"));
        assert!(inline_image_part("https://example.com/a.png").is_none());
    }

    #[test]
    fn test_endpoint_includes_model() {
        let client = GeminiClient::new(reqwest::Client::new(), ProviderConfig::gemini());
        assert!(client
            .endpoint()
            .ends_with("/models/gemini-2.5-flash-image-preview:generateContent"));
    }
}
