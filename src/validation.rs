//! Shape and bounds checks for the two image API request bodies.
//!
//! Both validators are total: they inspect an untyped JSON body and always
//! return a [`ValidationResult`], stopping at the first failed check.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::{LogoStyle, ModelOption, WEDDING_LOGO_MODE};

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#?[0-9A-Fa-f]{6}$").expect("valid regex"));

pub const PROMPT_MIN_LEN: usize = 3;
pub const PROMPT_MAX_LEN: usize = 1000;
pub const INITIALS_MAX_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub message: String,
    pub status: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ValidationError>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(ValidationError {
                message: message.into(),
                status: 400,
            }),
        }
    }
}

/// Prompt and initials bounds are counted in UTF-16 code units, which is how
/// browser clients measure the same strings.
fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn truthy_field<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| is_truthy(v))
}

fn valid_models() -> String {
    ModelOption::ALL
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_known_model(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .and_then(ModelOption::parse)
        .is_some()
}

pub fn validate_generate_image_request(body: &Value) -> ValidationResult {
    let Some(object) = body.as_object() else {
        return ValidationResult::invalid("Invalid request body");
    };

    let prompt = match truthy_field(object, "prompt").and_then(Value::as_str) {
        Some(prompt) => prompt,
        None => return ValidationResult::invalid("Prompt is required"),
    };
    let length = utf16_len(prompt);
    if !(PROMPT_MIN_LEN..=PROMPT_MAX_LEN).contains(&length) {
        return ValidationResult::invalid("Prompt must be 3-1000 characters");
    }

    if !is_known_model(object.get("model")) {
        return ValidationResult::invalid(format!("Model must be: {}", valid_models()));
    }

    let mode = truthy_field(object, "mode");
    if let Some(mode) = mode {
        if mode.as_str() != Some(WEDDING_LOGO_MODE) {
            return ValidationResult::invalid("Unsupported mode");
        }
        return validate_logo_options(truthy_field(object, "logoOptions"));
    }

    ValidationResult::valid()
}

fn validate_logo_options(options: Option<&Value>) -> ValidationResult {
    let Some(options) = options else {
        return ValidationResult::invalid("logoOptions required for wedding-logo mode");
    };

    let initials_len = options
        .get("initials")
        .and_then(Value::as_str)
        .map(|initials| utf16_len(initials.trim()));
    match initials_len {
        Some(len) if (1..=INITIALS_MAX_LEN).contains(&len) => {}
        _ => return ValidationResult::invalid("initials (1-6 chars) required"),
    }

    let style_ok = options
        .get("style")
        .and_then(Value::as_str)
        .and_then(LogoStyle::parse)
        .is_some();
    if !style_ok {
        let styles: Vec<&str> = LogoStyle::ALL.iter().map(|s| s.as_str()).collect();
        return ValidationResult::invalid(format!("style must be one of: {}", styles.join(", ")));
    }

    if let Some(colors) = options.get("colors").filter(|c| is_truthy(c)) {
        let checks = [
            ("primary", "colors.primary must be hex like #000000"),
            ("accent", "colors.accent must be hex like #FFFFFF"),
        ];
        for (key, message) in checks {
            if let Some(color) = colors.get(key).filter(|c| is_truthy(c)) {
                let ok = color.as_str().map_or(false, |c| HEX_COLOR.is_match(c));
                if !ok {
                    return ValidationResult::invalid(message);
                }
            }
        }
    }

    ValidationResult::valid()
}

pub fn validate_edit_image_request(body: &Value) -> ValidationResult {
    let Some(object) = body.as_object() else {
        return ValidationResult::invalid("Invalid request body");
    };

    if truthy_field(object, "prompt").and_then(Value::as_str).is_none() {
        return ValidationResult::invalid("Prompt is required");
    }

    let urls_ok = object
        .get("imageUrls")
        .and_then(Value::as_array)
        .map_or(false, |urls| !urls.is_empty() && urls.iter().all(Value::is_string));
    if !urls_ok {
        return ValidationResult::invalid("At least one image is required");
    }

    if !is_known_model(object.get("provider")) {
        return ValidationResult::invalid(format!("Provider must be: {}", valid_models()));
    }

    ValidationResult::valid()
}
