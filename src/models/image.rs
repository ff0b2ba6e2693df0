use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::ModelOption;
use super::logo::{lenient_or_default, lenient_preset, lenient_seed, LogoOptions, LogoPreset};

pub const WEDDING_LOGO_MODE: &str = "wedding-logo";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    pub prompt: String,
    pub model: ModelOption,
    #[serde(
        default,
        deserialize_with = "lenient_or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub mode: Option<String>,
    /// Only read in wedding-logo mode; anything unusable outside it is dropped.
    #[serde(
        default,
        deserialize_with = "lenient_or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub logo_options: Option<LogoOptions>,
    #[serde(
        default,
        deserialize_with = "lenient_or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub count: Option<u32>,
    #[serde(
        default,
        deserialize_with = "lenient_seed",
        skip_serializing_if = "Option::is_none"
    )]
    pub seed: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_preset",
        skip_serializing_if = "Option::is_none"
    )]
    pub preset: Option<LogoPreset>,
}

impl GenerateImageRequest {
    pub fn new(prompt: impl Into<String>, model: ModelOption) -> Self {
        Self {
            prompt: prompt.into(),
            model,
            mode: None,
            logo_options: None,
            count: None,
            seed: None,
            preset: None,
        }
    }

    pub fn wedding_logo(
        prompt: impl Into<String>,
        model: ModelOption,
        options: LogoOptions,
        preset: Option<LogoPreset>,
        seed: Option<f64>,
    ) -> Self {
        Self {
            mode: Some(WEDDING_LOGO_MODE.to_string()),
            logo_options: Some(options),
            preset,
            seed,
            ..Self::new(prompt, model)
        }
    }

    pub fn is_wedding_logo(&self) -> bool {
        self.mode.as_deref() == Some(WEDDING_LOGO_MODE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditImageRequest {
    pub prompt: String,
    pub image_urls: Vec<String>,
    pub provider: ModelOption,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub signed_in: bool,
    pub has_token: bool,
    pub user: Option<serde_json::Value>,
}

/// One entry of the in-memory generation history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelOption>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
    pub is_edit: bool,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl GeneratedImage {
    pub fn placeholder(id: impl Into<String>, prompt: impl Into<String>, model: ModelOption) -> Self {
        Self {
            id: id.into(),
            image_url: None,
            prompt: prompt.into(),
            model: Some(model),
            timestamp: Utc::now(),
            attachments: None,
            is_edit: false,
            is_loading: true,
            error: None,
            seed: None,
            score: None,
        }
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn as_edit(mut self, attachments: Vec<String>) -> Self {
        self.is_edit = true;
        self.attachments = Some(attachments);
        self
    }

    pub fn resolve(&mut self, image_url: String, score: Option<f64>) {
        self.image_url = Some(image_url);
        self.score = score;
        self.is_loading = false;
        self.error = None;
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.is_loading = false;
        self.error = Some(error.into());
    }
}
