use clap::{Parser, Subcommand};
use std::path::PathBuf;

use everafter::{
    attachments::{file_to_attachment, AttachmentTray},
    export::{export_logo, ExportFormat},
    history::download_image,
    logger, server, AppConfig, BatchRequest, GenerationOrchestrator, ImageHistory, ImageProviders, ImageService,
    LocalService, LogoApiClient, LogoError, LogoOptions, LogoPreset, LogoStyle, ModelOption,
};

#[derive(Parser)]
#[command(name = "everafter")]
#[command(version, about = "EverAfter Logos: wedding monogram generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate and rank a batch of wedding logo candidates
    Generate {
        /// Couple initials, e.g. "A&J"
        #[arg(long)]
        initials: String,
        #[arg(long)]
        names: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// minimal, modern, ornate or vintage; defaults to the preset's style
        #[arg(long)]
        style: Option<String>,
        /// Repeatable, or comma separated
        #[arg(long = "motif")]
        motifs: Vec<String>,
        #[arg(long)]
        primary: Option<String>,
        #[arg(long)]
        accent: Option<String>,
        /// minimal-monogram, crest-florals, art-deco or modern-serif
        #[arg(long)]
        preset: Option<String>,
        /// Ask for a design that also works inverted on black
        #[arg(long)]
        dark: bool,
        #[arg(long, default_value = "gemini")]
        model: ModelOption,
        #[arg(long, default_value_t = 4)]
        count: usize,
        #[arg(long)]
        seed: Option<i64>,
        /// png or svg
        #[arg(long, default_value = "png")]
        format: String,
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Base URL of a running server; providers are called in-process when omitted
        #[arg(long)]
        api: Option<String>,
        #[arg(long)]
        token: Option<String>,
    },
    /// Edit existing images with a prompt
    Edit {
        #[arg(long)]
        prompt: String,
        #[arg(long = "image", required = true)]
        images: Vec<PathBuf>,
        #[arg(long, default_value = "gemini")]
        model: ModelOption,
        #[arg(long, default_value = ".")]
        out: PathBuf,
        #[arg(long)]
        api: Option<String>,
        #[arg(long)]
        token: Option<String>,
    },
}

fn parse_style(value: &str) -> Result<LogoStyle, LogoError> {
    LogoStyle::parse(value).ok_or_else(|| {
        LogoError::ValidationError("style must be one of: minimal, modern, ornate, vintage".into())
    })
}

fn parse_preset(value: Option<&str>) -> Result<Option<LogoPreset>, LogoError> {
    value
        .map(|preset| {
            LogoPreset::parse(preset)
                .ok_or_else(|| LogoError::ValidationError(format!("unknown preset: {}", preset)))
        })
        .transpose()
}

fn parse_format(value: &str) -> Result<ExportFormat, LogoError> {
    match value.to_ascii_lowercase().as_str() {
        "png" => Ok(ExportFormat::Png),
        "svg" => Ok(ExportFormat::Svg),
        other => Err(LogoError::ValidationError(format!("unknown export format: {}", other))),
    }
}

fn service(api: Option<String>, token: Option<String>) -> Result<Box<dyn ImageService>, LogoError> {
    match api {
        Some(base_url) => {
            log::info!("🌐 Using API at {}", base_url);
            let client = LogoApiClient::new(base_url);
            Ok(Box::new(match token {
                Some(token) => client.with_token(token),
                None => client,
            }))
        }
        None => {
            let local = LocalService::new(ImageProviders::new(AppConfig::from_env())?);
            Ok(Box::new(match token {
                Some(token) => local.with_session_token(token),
                None => local,
            }))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    logger::init()?;
    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::debug!("No .env file found, using system environment variables");
    }

    match Cli::parse().command {
        Commands::Serve { host, port } => {
            let mut config = AppConfig::from_env();
            if let Some(host) = host {
                config = config.with_host(host);
            }
            if let Some(port) = port {
                config = config.with_port(port);
            }
            server::run(config).await?;
        }
        Commands::Generate {
            initials,
            names,
            date,
            location,
            style,
            motifs,
            primary,
            accent,
            preset,
            dark,
            model,
            count,
            seed,
            format,
            out,
            api,
            token,
        } => {
            let format = parse_format(&format)?;
            let preset = parse_preset(preset.as_deref())?;
            let style = match style {
                Some(style) => parse_style(&style)?,
                None => preset.map(|preset| preset.default_style()).unwrap_or_default(),
            };
            if let Some(preset) = preset {
                log::info!("✨ Preset: {}", preset.label());
            }
            let mut options = LogoOptions::new(initials, style)
                .with_motifs(motifs.iter().flat_map(|m| LogoOptions::parse_motifs(m)))
                .with_dark_variant(dark);
            if let Some(names) = names {
                options = options.with_names(names);
            }
            if let Some(date) = date {
                options = options.with_date(date);
            }
            if let Some(location) = location {
                options = options.with_location(location);
            }
            if let Some(primary) = primary {
                options = options.with_primary(primary);
            }
            if let Some(accent) = accent {
                options = options.with_accent(accent);
            }

            let mut batch = BatchRequest::wedding_logo(options, preset, model).with_count(count);
            if let Some(seed) = seed {
                batch = batch.with_seed(seed);
            }

            let orchestrator = GenerationOrchestrator::new(service(api, token)?, ImageHistory::new());
            let ranked = orchestrator.submit_batch(&batch).await;

            tokio::fs::create_dir_all(&out).await?;
            let mut written = 0;
            for (index, image) in ranked.iter().enumerate() {
                match (&image.image_url, &image.error) {
                    (Some(url), _) => {
                        let file = export_logo(url, index, format)?;
                        let path = out.join(&file.filename);
                        tokio::fs::write(&path, &file.bytes).await?;
                        log::info!(
                            "💾 {} (score {:.3}, seed {})",
                            path.display(),
                            image.score.unwrap_or(0.0),
                            image.seed.unwrap_or_default()
                        );
                        written += 1;
                    }
                    (None, Some(error)) => log::error!("❌ Candidate {} failed: {}", image.id, error),
                    (None, None) => {}
                }
            }
            if written == 0 {
                return Err(LogoError::ProviderError("no candidate produced an image".into()).into());
            }
        }
        Commands::Edit {
            prompt,
            images,
            model,
            out,
            api,
            token,
        } => {
            let mut tray = AttachmentTray::new();
            for path in &images {
                tray.add_files(Some(file_to_attachment(path).await?));
            }

            let orchestrator = GenerationOrchestrator::new(service(api, token)?, ImageHistory::new());
            let edited = orchestrator.submit_edit(&prompt, model, &mut tray).await;
            if let Some(error) = edited.error {
                return Err(LogoError::ProviderError(error).into());
            }

            tokio::fs::create_dir_all(&out).await?;
            let path = download_image(&edited, &out).await?;
            log::info!("💾 {}", path.display());
        }
    }

    Ok(())
}
