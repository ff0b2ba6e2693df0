use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogoStyle {
    #[default]
    Minimal,
    Modern,
    Ornate,
    Vintage,
}

impl LogoStyle {
    pub const ALL: [LogoStyle; 4] = [
        LogoStyle::Minimal,
        LogoStyle::Modern,
        LogoStyle::Ornate,
        LogoStyle::Vintage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogoStyle::Minimal => "minimal",
            LogoStyle::Modern => "modern",
            LogoStyle::Ornate => "ornate",
            LogoStyle::Vintage => "vintage",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.as_str() == value)
    }
}

impl fmt::Display for LogoStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named stylistic modifier appended to a wedding-logo prompt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum LogoPreset {
    MinimalMonogram,
    CrestFlorals,
    ArtDeco,
    ModernSerif,
}

impl LogoPreset {
    pub const ALL: [LogoPreset; 4] = [
        LogoPreset::MinimalMonogram,
        LogoPreset::CrestFlorals,
        LogoPreset::ArtDeco,
        LogoPreset::ModernSerif,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogoPreset::MinimalMonogram => "minimal-monogram",
            LogoPreset::CrestFlorals => "crest-florals",
            LogoPreset::ArtDeco => "art-deco",
            LogoPreset::ModernSerif => "modern-serif",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LogoPreset::MinimalMonogram => "Minimal Monogram",
            LogoPreset::CrestFlorals => "Crest + Florals",
            LogoPreset::ArtDeco => "Art Deco",
            LogoPreset::ModernSerif => "Modern Serif",
        }
    }

    /// Style the form switches to when this preset is picked.
    pub fn default_style(&self) -> LogoStyle {
        match self {
            LogoPreset::MinimalMonogram => LogoStyle::Minimal,
            LogoPreset::CrestFlorals => LogoStyle::Ornate,
            LogoPreset::ArtDeco | LogoPreset::ModernSerif => LogoStyle::Modern,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.as_str() == value)
    }
}

impl fmt::Display for LogoPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LogoColors {
    #[serde(
        default,
        deserialize_with = "lenient_or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub primary: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub accent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LogoVariants {
    #[serde(
        default,
        deserialize_with = "lenient_or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub transparent: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub dark: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub square: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient_or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub wide: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LogoOptions {
    pub initials: String,
    #[serde(
        default,
        deserialize_with = "lenient_or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub names: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_or_default",
        skip_serializing_if = "Option::is_none"
    )]
    pub location: Option<String>,
    pub style: LogoStyle,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub motifs: Vec<String>,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub colors: LogoColors,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub variants: LogoVariants,
}

impl LogoOptions {
    pub fn new(initials: impl Into<String>, style: LogoStyle) -> Self {
        Self {
            initials: initials.into(),
            style,
            ..Default::default()
        }
    }

    pub fn with_names(mut self, names: impl Into<String>) -> Self {
        self.names = Some(names.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_motifs<I, S>(mut self, motifs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.motifs = motifs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_primary(mut self, color: impl Into<String>) -> Self {
        self.colors.primary = Some(color.into());
        self
    }

    pub fn with_accent(mut self, color: impl Into<String>) -> Self {
        self.colors.accent = Some(color.into());
        self
    }

    pub fn with_dark_variant(mut self, dark: bool) -> Self {
        self.variants.dark = Some(dark);
        self
    }

    /// Splits a comma separated motif field the way the form does: trimmed,
    /// empty entries dropped.
    pub fn parse_motifs(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|motif| !motif.is_empty())
            .map(String::from)
            .collect()
    }
}

/// Accepts any JSON value; null or a value of the wrong shape becomes the
/// field's default.
pub(crate) fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Accepts any JSON value and keeps only recognized preset names.
pub(crate) fn lenient_preset<'de, D>(deserializer: D) -> Result<Option<LogoPreset>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(LogoPreset::parse))
}

/// Accepts any JSON value and keeps only finite numbers.
pub(crate) fn lenient_seed<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(|v| v.as_f64())
        .filter(|seed| seed.is_finite()))
}
