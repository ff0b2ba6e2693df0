use std::env;

use crate::models::ModelOption;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_IMAGE_MODEL: &str = "gpt-image-1";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn openai() -> Self {
        Self::new(DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_IMAGE_MODEL)
    }

    pub fn gemini() -> Self {
        Self::new(DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_IMAGE_MODEL)
    }

    /// Reads `{PREFIX}_API_KEY`, `{PREFIX}_BASE_URL` and `{PREFIX}_IMAGE_MODEL`
    /// on top of `defaults`.
    pub fn from_env(prefix: &str, defaults: Self) -> Self {
        let api_key = env::var(format!("{}_API_KEY", prefix))
            .ok()
            .filter(|key| !key.trim().is_empty());
        let base_url = env::var(format!("{}_BASE_URL", prefix)).unwrap_or(defaults.base_url);
        let model = env::var(format!("{}_IMAGE_MODEL", prefix)).unwrap_or(defaults.model);

        ProviderConfig {
            api_key,
            base_url,
            model,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub app_id: Option<String>,
    pub request_timeout_secs: u64,
    pub openai: ProviderConfig,
    pub gemini: ProviderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            app_id: None,
            request_timeout_secs: 120,
            openai: ProviderConfig::openai(),
            gemini: ProviderConfig::gemini(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(defaults.port);
        let app_id = env::var("ECHO_APP_ID")
            .or_else(|_| env::var("NEXT_PUBLIC_ECHO_APP_ID"))
            .ok()
            .filter(|id| !id.trim().is_empty());
        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse().ok())
            .unwrap_or(defaults.request_timeout_secs);

        AppConfig {
            host,
            port,
            app_id,
            request_timeout_secs,
            openai: ProviderConfig::from_env("OPENAI", ProviderConfig::openai()),
            gemini: ProviderConfig::from_env("GEMINI", ProviderConfig::gemini()),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    pub fn with_openai(mut self, config: ProviderConfig) -> Self {
        self.openai = config;
        self
    }

    pub fn with_gemini(mut self, config: ProviderConfig) -> Self {
        self.gemini = config;
        self
    }

    pub fn provider(&self, model: ModelOption) -> &ProviderConfig {
        match model {
            ModelOption::OpenAi => &self.openai,
            ModelOption::Gemini => &self.gemini,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
