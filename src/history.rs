//! In-memory generation history and the per-image actions offered on it.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::attachments::{data_url_to_attachment, Attachment};
use crate::data_url;
use crate::error::{LogoError, Result};
use crate::models::{GeneratedImage, ModelOption};

/// Shared, newest-first list of generated images. Every change replaces the
/// whole list inside one lock, so readers never see a half-applied update.
#[derive(Debug, Clone, Default)]
pub struct ImageHistory {
    inner: Arc<Mutex<Vec<GeneratedImage>>>,
}

impl ImageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<GeneratedImage>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(Vec<GeneratedImage>) -> Vec<GeneratedImage>,
    {
        let mut guard = self.lock();
        let previous = std::mem::take(&mut *guard);
        *guard = f(previous);
    }

    pub fn snapshot(&self) -> Vec<GeneratedImage> {
        self.lock().clone()
    }

    pub fn get(&self, id: &str) -> Option<GeneratedImage> {
        self.lock().iter().find(|image| image.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

fn by_score_desc(a: &GeneratedImage, b: &GeneratedImage) -> Ordering {
    let a = a.score.unwrap_or(0.0);
    let b = b.score.unwrap_or(0.0);
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Pulls the entries named by `batch_ids` out of `previous`, sorts them by
/// score (highest first, stable, unscored counts as 0) and puts them in
/// front of everything else.
pub fn merge_ranked_batch(previous: Vec<GeneratedImage>, batch_ids: &[String]) -> Vec<GeneratedImage> {
    let (mut batch, rest): (Vec<_>, Vec<_>) = previous
        .into_iter()
        .partition(|image| batch_ids.contains(&image.id));
    batch.sort_by(by_score_desc);
    batch.extend(rest);
    batch
}

pub fn generate_filename(image_id: &str) -> String {
    format!("generated-image-{}.png", image_id)
}

pub fn is_actionable(image: &GeneratedImage) -> bool {
    image.image_url.is_some()
}

pub fn model_display_name(model: Option<ModelOption>) -> &'static str {
    model.map(|model| model.display_name()).unwrap_or("Unknown Model")
}

/// Turns a finished image into an attachment for a follow-up edit.
pub fn image_to_attachment(image: &GeneratedImage) -> Result<Attachment> {
    let url = image
        .image_url
        .as_deref()
        .ok_or_else(|| LogoError::ValidationError(format!("image {} has no data yet", image.id)))?;
    data_url_to_attachment(url, generate_filename(&image.id))
}

/// Writes the image into `dir` under its generated filename.
pub async fn download_image(image: &GeneratedImage, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let url = image
        .image_url
        .as_deref()
        .ok_or_else(|| LogoError::ValidationError(format!("image {} has no data yet", image.id)))?;
    let path = dir.as_ref().join(generate_filename(&image.id));
    data_url::data_url_to_file(url, &path).await?;
    Ok(path)
}
