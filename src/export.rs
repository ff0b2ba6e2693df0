use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

use crate::data_url::DataUrl;
use crate::error::{LogoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Svg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Svg => "image/svg+xml",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Controls which pixels the SVG trace treats as ink.
#[derive(Debug, Clone, Copy)]
pub struct TraceOptions {
    /// Pixels with luma below this are ink.
    pub luma_threshold: f64,
    /// Pixels with alpha below this are background.
    pub alpha_threshold: u8,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            luma_threshold: 128.0,
            alpha_threshold: 128,
        }
    }
}

pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| LogoError::SerializationError(e.to_string()))?;
    Ok(bytes)
}

fn decode(parsed: &DataUrl) -> Result<DynamicImage> {
    image::load_from_memory(&parsed.data).map_err(|e| LogoError::DecodeError(e.to_string()))
}

pub fn export_png(data_url: &str) -> Result<Vec<u8>> {
    let parsed = DataUrl::parse(data_url)?;
    if parsed.media_type == "image/png" {
        return Ok(parsed.data);
    }
    encode_png(&decode(&parsed)?)
}

/// Vectorizes a logo by tracing ink pixels row by row into one filled path.
/// Each horizontal run becomes a 1px-high rectangle sub-path, filled with
/// the mean ink colour.
pub fn export_svg(data_url: &str, options: TraceOptions) -> Result<String> {
    let parsed = DataUrl::parse(data_url)?;
    let rgba = decode(&parsed)?.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut path = String::new();
    let mut ink_total = [0u64; 3];
    let mut ink_count = 0u64;

    for y in 0..height {
        let mut run_start: Option<u32> = None;
        for x in 0..=width {
            let is_ink = x < width && {
                let [r, g, b, a] = rgba.get_pixel(x, y).0;
                let luma = 0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * (b as f64);
                let ink = a >= options.alpha_threshold && luma < options.luma_threshold;
                if ink {
                    ink_total[0] += r as u64;
                    ink_total[1] += g as u64;
                    ink_total[2] += b as u64;
                    ink_count += 1;
                }
                ink
            };

            match (is_ink, run_start) {
                (true, None) => run_start = Some(x),
                (false, Some(start)) => {
                    path.push_str(&format!("M{} {}h{}v1h-{}z", start, y, x - start, x - start));
                    run_start = None;
                }
                _ => {}
            }
        }
    }

    if ink_count == 0 {
        return Err(LogoError::DecodeError("no ink found to trace".into()));
    }

    let fill = format!(
        "#{:02x}{:02x}{:02x}",
        ink_total[0] / ink_count,
        ink_total[1] / ink_count,
        ink_total[2] / ink_count
    );

    Ok(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" shape-rendering="crispEdges"><path fill="{fill}" d="{path}"/></svg>"#,
        w = width,
        h = height,
        fill = fill,
        path = path
    ))
}

pub fn logo_filename(index: usize, format: ExportFormat) -> String {
    format!("everafter-logo-{}.{}", index + 1, format.extension())
}

/// Exports the `index`-th candidate. A failed SVG trace falls back to PNG.
pub fn export_logo(data_url: &str, index: usize, format: ExportFormat) -> Result<ExportedFile> {
    if format == ExportFormat::Svg {
        match export_svg(data_url, TraceOptions::default()) {
            Ok(svg) => {
                return Ok(ExportedFile {
                    filename: logo_filename(index, ExportFormat::Svg),
                    media_type: ExportFormat::Svg.media_type().to_string(),
                    bytes: svg.into_bytes(),
                })
            }
            Err(e) => log::warn!("SVG vectorization failed; falling back to PNG: {}", e),
        }
    }

    Ok(ExportedFile {
        filename: logo_filename(index, ExportFormat::Png),
        media_type: ExportFormat::Png.media_type().to_string(),
        bytes: export_png(data_url)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn logo_url() -> String {
        let mut canvas = RgbaImage::from_pixel(8, 4, Rgba([255, 255, 255, 255]));
        for x in 2..5 {
            canvas.put_pixel(x, 1, Rgba([10, 20, 30, 255]));
        }
        let bytes = encode_png(&DynamicImage::ImageRgba8(canvas)).unwrap();
        crate::data_url::encode(&bytes, "image/png")
    }

    #[test]
    fn test_png_passes_through() {
        let url = logo_url();
        let bytes = export_png(&url).unwrap();
        assert_eq!(bytes, DataUrl::parse(&url).unwrap().data);
    }

    #[test]
    fn test_svg_traces_ink_runs() {
        let svg = export_svg(&logo_url(), TraceOptions::default()).unwrap();
        assert!(svg.contains(r#"viewBox="0 0 8 4""#));
        assert!(svg.contains(r##"fill="#0a141e""##));
        assert!(svg.contains("M2 1h3v1h-3z"));
    }

    #[test]
    fn test_blank_image_falls_back_to_png() {
        let blank = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
        let bytes = encode_png(&DynamicImage::ImageRgba8(blank)).unwrap();
        let url = crate::data_url::encode(&bytes, "image/png");

        let exported = export_logo(&url, 0, ExportFormat::Svg).unwrap();
        assert_eq!(exported.filename, "everafter-logo-1.png");
        assert_eq!(exported.media_type, "image/png");
    }

    #[test]
    fn test_svg_export_filename() {
        let exported = export_logo(&logo_url(), 2, ExportFormat::Svg).unwrap();
        assert_eq!(exported.filename, "everafter-logo-3.svg");
        assert!(String::from_utf8(exported.bytes).unwrap().starts_with("<svg"));
    }
}
