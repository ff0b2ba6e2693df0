//! `data:<mime>;base64,<payload>` helpers.
//!
//! Every image in the system travels as a data URL, so these are used by the
//! providers, the scorer, the exporter and the attachment tray alike.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

use crate::error::{LogoError, Result};

pub const DEFAULT_MEDIA_TYPE: &str = "image/png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub media_type: String,
    pub data: Vec<u8>,
}

impl DataUrl {
    pub fn new(media_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            data,
        }
    }

    /// Parses a base64 data URL. A header without a media type falls back to
    /// `image/png`.
    pub fn parse(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| LogoError::DecodeError("not a data URL".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| LogoError::DecodeError("data URL has no payload".into()))?;

        let mut params = header.split(';');
        let media_type = params
            .next()
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_MEDIA_TYPE)
            .to_string();
        if !params.any(|param| param.eq_ignore_ascii_case("base64")) {
            return Err(LogoError::DecodeError(
                "only base64 data URLs are supported".into(),
            ));
        }

        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| LogoError::DecodeError(e.to_string()))?;

        Ok(Self { media_type, data })
    }

    pub fn encode(&self) -> String {
        encode(&self.data, &self.media_type)
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

pub fn encode(bytes: &[u8], media_type: &str) -> String {
    format!("data:{};base64,{}", media_type, STANDARD.encode(bytes))
}

/// Builds a data URL from a provider's raw base64 payload.
pub fn from_base64(media_type: &str, payload: &str) -> String {
    format!("data:{};base64,{}", media_type, payload)
}

/// Media type advertised by a data URL; anything that isn't one is assumed
/// to be a JPEG.
pub fn media_type_of(url: &str) -> &str {
    if !url.starts_with("data:") {
        return "image/jpeg";
    }
    url.strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
        .map(|(mime, _)| mime)
        .filter(|mime| !mime.is_empty() && !mime.contains(','))
        .unwrap_or("image/jpeg")
}

pub fn media_type_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

pub fn extension_for_media_type(media_type: &str) -> &'static str {
    match media_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/svg+xml" => "svg",
        _ => "png",
    }
}

pub async fn file_to_data_url(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    Ok(encode(&bytes, media_type_for_path(path)))
}

pub async fn data_url_to_file(url: &str, path: impl AsRef<Path>) -> Result<()> {
    let parsed = DataUrl::parse(url)?;
    tokio::fs::write(path, parsed.data).await?;
    Ok(())
}
