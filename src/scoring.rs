//! Heuristic logo quality score in `[0, 1]`.
//!
//! Favors high local contrast, dark mass near the center and a limited
//! palette. The image is sampled into a fixed 128x128 buffer first, so
//! non-square inputs are stretched.

use image::{imageops::FilterType, DynamicImage, RgbaImage};

use crate::data_url::DataUrl;
use crate::error::{LogoError, Result};

pub const SAMPLE_SIZE: u32 = 128;
pub const NEUTRAL_SCORE: f64 = 0.5;

const CONTRAST_WEIGHT: f64 = 0.45;
const CENTRALITY_WEIGHT: f64 = 0.35;
const SIMPLICITY_WEIGHT: f64 = 0.20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub contrast: f64,
    pub centrality: f64,
    pub color_simplicity: f64,
    pub score: f64,
}

fn luma(r: u8, g: u8, b: u8) -> f64 {
    0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64
}

/// Scores a data URL. Never fails: anything that can't be decoded gets
/// [`NEUTRAL_SCORE`].
pub async fn score_logo_image(data_url: &str) -> f64 {
    let url = data_url.to_string();
    match tokio::task::spawn_blocking(move || score_data_url(&url)).await {
        Ok(Ok(breakdown)) => {
            log::debug!(
                "Scored image: contrast={:.4} centrality={:.4} simplicity={:.4} -> {:.4}",
                breakdown.contrast,
                breakdown.centrality,
                breakdown.color_simplicity,
                breakdown.score
            );
            breakdown.score
        }
        Ok(Err(e)) => {
            log::warn!("Could not score image, using neutral score: {}", e);
            NEUTRAL_SCORE
        }
        Err(e) => {
            log::error!("Scoring task failed: {}", e);
            NEUTRAL_SCORE
        }
    }
}

pub fn score_data_url(data_url: &str) -> Result<ScoreBreakdown> {
    let parsed = DataUrl::parse(data_url)?;
    let image = image::load_from_memory(&parsed.data)
        .map_err(|e| LogoError::DecodeError(e.to_string()))?;
    Ok(score_image(&image))
}

pub fn score_image(image: &DynamicImage) -> ScoreBreakdown {
    score_pixels(&sample(image))
}

/// Resamples to the scoring grid. Colour channels are premultiplied around
/// the resize so fully transparent pixels read back as black, the way a
/// 2D canvas reports them.
fn sample(image: &DynamicImage) -> RgbaImage {
    let mut rgba = image.to_rgba8();
    for pixel in rgba.pixels_mut() {
        let alpha = pixel[3] as u32;
        for channel in 0..3 {
            pixel[channel] = ((pixel[channel] as u32 * alpha + 127) / 255) as u8;
        }
    }

    let mut sampled = image::imageops::resize(&rgba, SAMPLE_SIZE, SAMPLE_SIZE, FilterType::Triangle);
    for pixel in sampled.pixels_mut() {
        let alpha = pixel[3] as u32;
        for channel in 0..3 {
            pixel[channel] = if alpha == 0 {
                0
            } else {
                ((pixel[channel] as u32 * 255 + alpha / 2) / alpha).min(255) as u8
            };
        }
    }
    sampled
}

/// Core heuristic over an already-sampled buffer.
pub fn score_pixels(pixels: &RgbaImage) -> ScoreBreakdown {
    let (width, height) = pixels.dimensions();
    let count = (width as f64) * (height as f64);
    if count == 0.0 {
        return ScoreBreakdown {
            contrast: 0.0,
            centrality: 0.0,
            color_simplicity: 1.0,
            score: NEUTRAL_SCORE,
        };
    }

    let half = width as f64 / 2.0;
    let center_y = height as f64 / 2.0;

    let mut contrast_sum = 0.0;
    let mut color_var_sum = 0.0;
    let mut center_mass = 0.0;

    for y in 0..height {
        let mut previous_luma: Option<f64> = None;
        for x in 0..width {
            let [r, g, b, _] = pixels.get_pixel(x, y).0;
            let l = luma(r, g, b);

            if let Some(prev) = previous_luma {
                contrast_sum += (l - prev).abs();
            }
            previous_luma = Some(l);

            let mean = (r as f64 + g as f64 + b as f64) / 3.0;
            color_var_sum += (r as f64 - mean).abs() + (g as f64 - mean).abs() + (b as f64 - mean).abs();

            let dx = x as f64 - half;
            let dy = y as f64 - center_y;
            let dist = (dx * dx + dy * dy).sqrt();
            let weight = 1.0 - (dist / half).min(1.0);
            center_mass += weight * (255.0 - l.clamp(0.0, 255.0));
        }
    }

    let contrast = contrast_sum / (count * 255.0);
    let color_simplicity = 1.0 - (color_var_sum / (count * 255.0 * 3.0)).min(1.0);
    let centrality = center_mass / (count * 255.0);

    let score = (CONTRAST_WEIGHT * contrast
        + CENTRALITY_WEIGHT * centrality
        + SIMPLICITY_WEIGHT * color_simplicity)
        .clamp(0.0, 1.0);

    ScoreBreakdown {
        contrast,
        centrality,
        color_simplicity,
        score,
    }
}
