pub mod attachments;
pub mod client;
pub mod config;
pub mod data_url;
pub mod error;
pub mod export;
pub mod history;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod providers;
pub mod routes;
pub mod scoring;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod site;
pub mod validation;

pub use attachments::{Attachment, AttachmentTray};
pub use client::LogoApiClient;
pub use config::{AppConfig, ProviderConfig};
pub use error::{LogoError, Result};
pub use export::{export_logo, ExportFormat, ExportedFile};
pub use history::ImageHistory;
pub use models::{
    AuthStatus, EditImageRequest, GenerateImageRequest, GeneratedImage, ImageResponse, LogoColors,
    LogoOptions, LogoPreset, LogoStyle, LogoVariants, ModelOption,
};
pub use orchestrator::{BatchRequest, GenerationOrchestrator, HeuristicScorer, LogoScorer};
pub use prompt::build_prompt;
pub use providers::ImageProviders;
pub use scoring::score_logo_image;
pub use service::{ImageService, LocalService};
pub use validation::{validate_edit_image_request, validate_generate_image_request, ValidationResult};
