use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::data_url::{self, DataUrl};
use crate::error::Result;

/// A file staged for the next edit, already encoded as a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub filename: String,
    pub media_type: String,
    pub data_url: String,
}

impl Attachment {
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// Wraps a data URL as an attachment named `filename`.
pub fn data_url_to_attachment(url: &str, filename: impl Into<String>) -> Result<Attachment> {
    let parsed = DataUrl::parse(url)?;
    Ok(Attachment {
        filename: filename.into(),
        media_type: parsed.media_type,
        data_url: url.to_string(),
    })
}

pub async fn file_to_attachment(path: impl AsRef<Path>) -> Result<Attachment> {
    let path = path.as_ref();
    let url = data_url::file_to_data_url(path).await?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    Ok(Attachment {
        filename,
        media_type: data_url::media_type_for_path(path).to_string(),
        data_url: url,
    })
}

/// Files waiting to be sent with the next edit. Owned by whoever drives the
/// prompt input and passed by `&mut`.
#[derive(Debug, Clone, Default)]
pub struct AttachmentTray {
    files: Vec<Attachment>,
}

impl AttachmentTray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_files<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = Attachment>,
    {
        self.files.extend(files);
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[Attachment] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Data URLs of the image attachments, in the order they were added.
    pub fn image_data_urls(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|file| file.is_image())
            .map(|file| file.data_url.clone())
            .collect()
    }

    /// Hands back the image data URLs and empties the tray.
    pub fn take_images(&mut self) -> Vec<String> {
        let urls = self.image_data_urls();
        self.clear();
        urls
    }
}
