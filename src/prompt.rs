//! Wedding-logo prompt construction.
//!
//! Turns [`LogoOptions`] into a tightly constrained, monogram-focused prompt.
//! The output is deterministic: the seed is only written into the text for
//! the downstream model, it never changes which clauses are emitted.

use crate::models::{LogoOptions, LogoPreset};

const CONSTRAINTS: &str = "Constraints: vector-like, flat design, high contrast, crisp edges, centered composition, no photorealism, no backgrounds or scenes, no drop shadows, avoid busy details.";
const BACKGROUND: &str = "Background: plain white or transparent. If transparency unsupported, ensure pure white background and clean edges for easy background removal.";
const DELIVERABLE: &str = "Deliver a logo-style image with the monogram as the primary focal point and optional minimal motif embellishments.";
const DEFAULT_PALETTE: &str = "Use a single-color palette suitable for inversion (black or white).";
const DARK_VARIANT: &str = "Also suitable for white-on-black inversion.";

pub fn preset_sentence(preset: LogoPreset) -> &'static str {
    match preset {
        LogoPreset::MinimalMonogram => {
            "Preset: minimal monogram, single-weight strokes, negative space, no ornaments."
        }
        LogoPreset::CrestFlorals => {
            "Preset: crest with subtle florals, balanced wreath-like framing, restrained detailing."
        }
        LogoPreset::ArtDeco => {
            "Preset: art deco geometry, symmetrical forms, clean lines, limited ornament."
        }
        LogoPreset::ModernSerif => {
            "Preset: modern serif typography, refined contrast, elegant curves."
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn build_prompt(options: &LogoOptions, preset: Option<LogoPreset>, seed: Option<f64>) -> String {
    let initials = options.initials.trim().to_uppercase();
    let mut parts: Vec<String> = Vec::with_capacity(12);

    parts.push(format!(
        "Design a wedding logo (monogram) for {} with initials {}.",
        present(&options.names).unwrap_or("a couple"),
        initials
    ));

    if let Some(date) = present(&options.date) {
        parts.push(format!("Include the date: {}.", date));
    }
    if let Some(location) = present(&options.location) {
        parts.push(format!("Location context: {}.", location));
    }

    parts.push(format!(
        "Style: {}. Focus on elegant typography and clear symbol integration.",
        options.style
    ));

    if let Some(preset) = preset {
        parts.push(preset_sentence(preset).to_string());
    }

    if let Some(seed) = seed.filter(|s| s.is_finite()) {
        parts.push(format!("Use a consistent seed for reproducibility: {}.", seed));
    }

    if !options.motifs.is_empty() {
        parts.push(format!(
            "Incorporate subtle motifs: {} (tasteful, not busy).",
            options.motifs.join(", ")
        ));
    }

    parts.push(color_clause(options));
    parts.push(CONSTRAINTS.to_string());
    parts.push(BACKGROUND.to_string());
    parts.push(DELIVERABLE.to_string());

    if options.variants.dark == Some(true) {
        parts.push(DARK_VARIANT.to_string());
    }

    parts.join(" ")
}

fn color_clause(options: &LogoOptions) -> String {
    let primary = present(&options.colors.primary);
    let accent = present(&options.colors.accent);

    if primary.is_none() && accent.is_none() {
        return DEFAULT_PALETTE.to_string();
    }

    let mut palette = match primary {
        Some(primary) => format!("primary {}", primary),
        None => "a single-color palette".to_string(),
    };
    if let Some(accent) = accent {
        palette.push_str(&format!(" with optional accent {}", accent));
    }
    format!("Color palette: {}.", palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogoStyle;

    fn base() -> LogoOptions {
        LogoOptions::new(" ab ", LogoStyle::Minimal)
    }

    #[test]
    fn test_opening_clause_uppercases_and_defaults_couple() {
        let prompt = build_prompt(&base(), None, None);
        assert!(prompt.starts_with("Design a wedding logo (monogram) for a couple with initials AB."));

        let named = base().with_names("Jess & Alex");
        let prompt = build_prompt(&named, None, None);
        assert!(prompt.starts_with("Design a wedding logo (monogram) for Jess & Alex with initials AB."));
    }

    #[test]
    fn test_motifs_joined_once_and_suppressed_when_empty() {
        let with = base().with_motifs(["rings", "florals"]);
        let prompt = build_prompt(&with, None, None);
        assert_eq!(prompt.matches("rings, florals").count(), 1);
        assert_eq!(prompt.matches("rings").count(), 1);
        assert_eq!(prompt.matches("florals").count(), 1);

        let prompt = build_prompt(&base(), None, None);
        assert!(!prompt.contains("motifs:"));
    }

    #[test]
    fn test_each_preset_emits_its_sentence() {
        for preset in LogoPreset::ALL {
            let prompt = build_prompt(&base(), Some(preset), None);
            assert!(prompt.contains(preset_sentence(preset)));
            let others = LogoPreset::ALL.iter().filter(|p| **p != preset);
            for other in others {
                assert!(!prompt.contains(preset_sentence(*other)));
            }
        }
        let prompt = build_prompt(&base(), None, None);
        assert!(!prompt.contains("Preset:"));
    }

    #[test]
    fn test_seed_clause_only_for_finite_numbers() {
        assert!(build_prompt(&base(), None, Some(42.0)).contains("reproducibility: 42."));
        assert!(!build_prompt(&base(), None, Some(f64::NAN)).contains("seed"));
        assert!(!build_prompt(&base(), None, None).contains("seed"));
    }

    #[test]
    fn test_clause_order_and_optional_fields() {
        let options = base()
            .with_date("2025-06-15")
            .with_location("Napa Valley")
            .with_motifs(["laurel"])
            .with_primary("#000000")
            .with_dark_variant(true);
        let prompt = build_prompt(&options, Some(LogoPreset::ArtDeco), Some(7.0));

        let order = [
            "Design a wedding logo",
            "Include the date: 2025-06-15.",
            "Location context: Napa Valley.",
            "Style: minimal.",
            "Preset: art deco",
            "reproducibility: 7.",
            "Incorporate subtle motifs: laurel",
            "Color palette: primary #000000.",
            "Constraints:",
            "Background:",
            "Deliver a logo-style image",
            DARK_VARIANT,
        ];
        let positions: Vec<usize> = order.iter().map(|s| prompt.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(prompt.ends_with(DARK_VARIANT));
    }

    #[test]
    fn test_empty_optional_strings_are_skipped() {
        let mut options = base();
        options.date = Some(String::new());
        options.names = Some(String::new());
        let prompt = build_prompt(&options, None, None);
        assert!(!prompt.contains("Include the date"));
        assert!(prompt.contains("for a couple"));
    }

    #[test]
    fn test_color_clauses() {
        assert!(build_prompt(&base(), None, None).contains(DEFAULT_PALETTE));

        let both = base().with_primary("#111111").with_accent("#C9A227");
        assert!(build_prompt(&both, None, None)
            .contains("Color palette: primary #111111 with optional accent #C9A227."));

        let accent_only = base().with_accent("#C9A227");
        assert!(build_prompt(&accent_only, None, None)
            .contains("Color palette: a single-color palette with optional accent #C9A227."));
    }

    #[test]
    fn test_is_deterministic() {
        let options = base().with_motifs(["rings"]);
        assert_eq!(
            build_prompt(&options, Some(LogoPreset::CrestFlorals), Some(3.0)),
            build_prompt(&options, Some(LogoPreset::CrestFlorals), Some(3.0))
        );
    }
}
