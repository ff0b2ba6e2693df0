use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two image backends an API request may name.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ModelOption {
    #[serde(rename = "openai")]
    OpenAi,
    Gemini,
}

impl ModelOption {
    pub const ALL: [ModelOption; 2] = [ModelOption::OpenAi, ModelOption::Gemini];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelOption::OpenAi => "openai",
            ModelOption::Gemini => "gemini",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelOption::OpenAi => "GPT Image",
            ModelOption::Gemini => "Gemini Flash Image",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|model| model.as_str() == value)
    }
}

impl Default for ModelOption {
    fn default() -> Self {
        ModelOption::Gemini
    }
}

impl fmt::Display for ModelOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unsupported model: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: ModelOption,
    pub name: String,
}

pub fn supported_models() -> Vec<ModelInfo> {
    ModelOption::ALL
        .into_iter()
        .map(|id| ModelInfo {
            id,
            name: id.display_name().to_string(),
        })
        .collect()
}
