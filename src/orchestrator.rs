//! Multi-candidate generation: placeholders, parallel calls, scoring and
//! ranking into the shared history.

use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use uuid::Uuid;

use crate::{
    attachments::AttachmentTray,
    history::{merge_ranked_batch, ImageHistory},
    models::{EditImageRequest, GenerateImageRequest, GeneratedImage, LogoOptions, LogoPreset, ModelOption},
    prompt::build_prompt,
    scoring,
    service::ImageService,
};

pub const MIN_CANDIDATES: usize = 1;
pub const MAX_CANDIDATES: usize = 8;
pub const DEFAULT_CANDIDATES: usize = 4;
pub const SEED_RANGE: u128 = 1_000_000_000;

pub const NO_IMAGE_ATTACHMENTS: &str = "No image files found in attachments";

#[async_trait]
pub trait LogoScorer: Send + Sync {
    async fn score(&self, image_url: &str) -> f64;
}

/// The pixel heuristic from [`crate::scoring`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicScorer;

#[async_trait]
impl LogoScorer for HeuristicScorer {
    async fn score(&self, image_url: &str) -> f64 {
        scoring::score_logo_image(image_url).await
    }
}

#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub prompt: String,
    pub model: ModelOption,
    pub logo: Option<(LogoOptions, Option<LogoPreset>)>,
    pub count: usize,
    pub seed: Option<i64>,
}

impl BatchRequest {
    pub fn new(prompt: impl Into<String>, model: ModelOption) -> Self {
        Self {
            prompt: prompt.into(),
            model,
            logo: None,
            count: DEFAULT_CANDIDATES,
            seed: None,
        }
    }

    pub fn wedding_logo(options: LogoOptions, preset: Option<LogoPreset>, model: ModelOption) -> Self {
        Self {
            logo: Some((options, preset)),
            ..Self::new(String::new(), model)
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn candidate_count(&self) -> usize {
        self.count.clamp(MIN_CANDIDATES, MAX_CANDIDATES)
    }

    /// The prompt shown in history. In wedding-logo mode it is built from
    /// the options and the caller's seed, so no seed clause appears when the
    /// base seed was drawn at random.
    fn display_prompt(&self) -> String {
        match &self.logo {
            Some((options, preset)) => build_prompt(options, *preset, self.seed.map(|seed| seed as f64)),
            None => self.prompt.trim().to_string(),
        }
    }

    fn candidate_request(&self, prompt: &str, seed: i64) -> GenerateImageRequest {
        match &self.logo {
            Some((options, preset)) => GenerateImageRequest::wedding_logo(
                prompt,
                self.model,
                options.clone(),
                *preset,
                Some(seed as f64),
            ),
            None => GenerateImageRequest::new(prompt, self.model),
        }
    }
}

pub fn random_seed() -> i64 {
    (Uuid::new_v4().as_u128() % SEED_RANGE) as i64
}

fn new_image_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("img_{}_{}", Utc::now().timestamp_millis(), &suffix[..8])
}

enum CandidateResult {
    Done { image_url: String, score: f64 },
    Failed(String),
}

pub struct GenerationOrchestrator<S, C = HeuristicScorer> {
    service: S,
    scorer: C,
    history: ImageHistory,
}

impl<S: ImageService> GenerationOrchestrator<S, HeuristicScorer> {
    pub fn new(service: S, history: ImageHistory) -> Self {
        Self {
            service,
            scorer: HeuristicScorer,
            history,
        }
    }
}

impl<S: ImageService, C: LogoScorer> GenerationOrchestrator<S, C> {
    pub fn with_scorer<D: LogoScorer>(self, scorer: D) -> GenerationOrchestrator<S, D> {
        GenerationOrchestrator {
            service: self.service,
            scorer,
            history: self.history,
        }
    }

    pub fn history(&self) -> &ImageHistory {
        &self.history
    }

    /// Generates the batch and returns its entries, best first. Candidates
    /// fail independently; a failed one keeps its error and sorts as 0.
    pub async fn submit_batch(&self, request: &BatchRequest) -> Vec<GeneratedImage> {
        let count = request.candidate_count();
        let base_seed = request.seed.unwrap_or_else(random_seed);
        let prompt = request.display_prompt();
        let image_id = new_image_id();

        let candidates: Vec<(String, i64)> = (0..count)
            .map(|i| (format!("{}_{}", image_id, i + 1), base_seed.saturating_add(i as i64)))
            .collect();
        let batch_ids: Vec<String> = candidates.iter().map(|(id, _)| id.clone()).collect();

        let placeholders: Vec<GeneratedImage> = candidates
            .iter()
            .map(|(id, seed)| GeneratedImage::placeholder(id.as_str(), prompt.as_str(), request.model).with_seed(*seed))
            .collect();
        self.history.update(|previous| placeholders.into_iter().chain(previous).collect());

        log::info!(
            "🎨 Generating {} candidate(s) with {} (base seed {})",
            count,
            request.model.display_name(),
            base_seed
        );

        let results = join_all(candidates.iter().map(|(id, seed)| {
            let candidate = request.candidate_request(&prompt, *seed);
            async move {
                let result = match self.service.generate(&candidate).await {
                    Ok(image_url) => {
                        let score = self.scorer.score(&image_url).await;
                        CandidateResult::Done { image_url, score }
                    }
                    Err(e) => {
                        log::warn!("Candidate {} failed: {}", id, e);
                        CandidateResult::Failed(e.to_string())
                    }
                };
                (id.clone(), result)
            }
        }))
        .await;

        self.history.update(|previous| {
            let updated = previous
                .into_iter()
                .map(|mut image| {
                    if let Some((_, result)) = results.iter().find(|(id, _)| *id == image.id) {
                        match result {
                            CandidateResult::Done { image_url, score } => {
                                image.resolve(image_url.clone(), Some(*score))
                            }
                            CandidateResult::Failed(error) => image.fail(error.clone()),
                        }
                    }
                    image
                })
                .collect();
            merge_ranked_batch(updated, &batch_ids)
        });

        let ranked: Vec<GeneratedImage> = self
            .history
            .snapshot()
            .into_iter()
            .filter(|image| batch_ids.contains(&image.id))
            .collect();
        if let Some(best) = ranked.first() {
            log::info!("🏆 Best candidate {} (score {:.3})", best.id, best.score.unwrap_or(0.0));
        }
        ranked
    }

    /// Edits the tray's images with `prompt`. The tray is emptied whether or
    /// not the edit succeeds.
    pub async fn submit_edit(
        &self,
        prompt: &str,
        model: ModelOption,
        tray: &mut AttachmentTray,
    ) -> GeneratedImage {
        let image_urls = tray.take_images();
        let id = new_image_id();
        let prompt = prompt.trim().to_string();

        let placeholder =
            GeneratedImage::placeholder(id.as_str(), prompt.as_str(), model).as_edit(image_urls.clone());
        self.history.update(|previous| std::iter::once(placeholder).chain(previous).collect());

        let outcome = if image_urls.is_empty() {
            Err(NO_IMAGE_ATTACHMENTS.to_string())
        } else {
            let request = EditImageRequest {
                prompt: prompt.clone(),
                image_urls,
                provider: model,
            };
            self.service.edit(&request).await.map_err(|e| e.to_string())
        };

        if let Err(error) = &outcome {
            log::warn!("Edit {} failed: {}", id, error);
        }

        self.history.update(|previous| {
            previous
                .into_iter()
                .map(|mut image| {
                    if image.id == id {
                        match &outcome {
                            Ok(image_url) => image.resolve(image_url.clone(), None),
                            Err(error) => image.fail(error.clone()),
                        }
                    }
                    image
                })
                .collect()
        });

        self.history
            .get(&id)
            .unwrap_or_else(|| GeneratedImage::placeholder(id.as_str(), prompt.as_str(), model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachments::Attachment;
    use crate::error::{LogoError, Result};
    use crate::models::LogoStyle;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockService {
        failing_seeds: Vec<i64>,
        seen: Mutex<Vec<GenerateImageRequest>>,
    }

    #[async_trait]
    impl ImageService for MockService {
        async fn generate(&self, request: &GenerateImageRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            let seed = request.seed.unwrap_or(-1.0) as i64;
            if self.failing_seeds.contains(&seed) {
                return Err(LogoError::HttpError {
                    status: 500,
                    body: "No image was generated".into(),
                });
            }
            Ok(format!("mock://{}", seed))
        }

        async fn edit(&self, request: &EditImageRequest) -> Result<String> {
            Ok(format!("mock://edit/{}", request.image_urls.len()))
        }
    }

    struct TableScorer(HashMap<String, f64>);

    #[async_trait]
    impl LogoScorer for TableScorer {
        async fn score(&self, image_url: &str) -> f64 {
            self.0.get(image_url).copied().unwrap_or(0.5)
        }
    }

    fn scorer() -> TableScorer {
        TableScorer(HashMap::from([
            ("mock://100".to_string(), 0.2),
            ("mock://101".to_string(), 0.9),
            ("mock://102".to_string(), 0.5),
        ]))
    }

    fn logo_batch() -> BatchRequest {
        BatchRequest::wedding_logo(LogoOptions::new("ab", LogoStyle::Modern), Some(LogoPreset::ArtDeco), ModelOption::Gemini)
            .with_count(3)
            .with_seed(100)
    }

    fn seeds(images: &[GeneratedImage]) -> Vec<i64> {
        images.iter().filter_map(|image| image.seed).collect()
    }

    #[test]
    fn test_candidate_count_is_clamped() {
        let request = BatchRequest::new("logo", ModelOption::OpenAi);
        assert_eq!(request.clone().with_count(0).candidate_count(), 1);
        assert_eq!(request.clone().with_count(20).candidate_count(), 8);
        assert_eq!(request.candidate_count(), DEFAULT_CANDIDATES);
        assert!((0..1_000_000_000).contains(&random_seed()));
    }

    #[tokio::test]
    async fn test_batch_is_ranked_by_score() {
        let history = ImageHistory::new();
        history.update(|_| vec![GeneratedImage::placeholder("older", "earlier", ModelOption::OpenAi)]);

        let orchestrator = GenerationOrchestrator::new(MockService::default(), history.clone()).with_scorer(scorer());
        let ranked = orchestrator.submit_batch(&logo_batch()).await;

        assert_eq!(seeds(&ranked), vec![101, 102, 100]);
        assert!(ranked.iter().all(|image| !image.is_loading && image.error.is_none()));
        assert!(ranked[0].prompt.contains("initials AB"));

        let all = history.snapshot();
        assert_eq!(all.len(), 4);
        assert_eq!(all[3].id, "older");

        let seen = orchestrator.service.seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|request| request.is_wedding_logo()));
        assert!(seen.iter().all(|request| request.preset == Some(LogoPreset::ArtDeco)));
    }

    #[tokio::test]
    async fn test_failed_candidate_is_isolated() {
        let service = MockService {
            failing_seeds: vec![101],
            ..Default::default()
        };
        let orchestrator = GenerationOrchestrator::new(service, ImageHistory::new()).with_scorer(scorer());
        let ranked = orchestrator.submit_batch(&logo_batch()).await;

        assert_eq!(seeds(&ranked), vec![102, 100, 101]);
        let failed = &ranked[2];
        assert!(!failed.is_loading);
        assert!(failed.image_url.is_none());
        assert_eq!(failed.error.as_deref(), Some("HTTP 500: No image was generated"));
        assert!(ranked[0].image_url.is_some());
    }

    #[tokio::test]
    async fn test_plain_prompt_batch_sends_no_seed() {
        let orchestrator = GenerationOrchestrator::new(MockService::default(), ImageHistory::new()).with_scorer(scorer());
        let ranked = orchestrator
            .submit_batch(&BatchRequest::new("  a gold monogram  ", ModelOption::OpenAi).with_count(2))
            .await;

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].prompt, "a gold monogram");
        let seen = orchestrator.service.seen.lock().unwrap();
        assert!(seen.iter().all(|request| request.seed.is_none() && !request.is_wedding_logo()));
    }

    #[tokio::test]
    async fn test_seeds_saturate_at_the_top_of_the_range() {
        let orchestrator = GenerationOrchestrator::new(MockService::default(), ImageHistory::new()).with_scorer(scorer());
        let ranked = orchestrator
            .submit_batch(&BatchRequest::new("a logo", ModelOption::OpenAi).with_count(2).with_seed(i64::MAX))
            .await;

        assert_eq!(seeds(&ranked), vec![i64::MAX, i64::MAX]);
        assert!(ranked.iter().all(|image| !image.is_loading));
    }

    #[tokio::test]
    async fn test_history_prompt_carries_only_the_callers_seed() {
        let orchestrator = GenerationOrchestrator::new(MockService::default(), ImageHistory::new()).with_scorer(scorer());
        let unseeded = BatchRequest::wedding_logo(LogoOptions::new("ab", LogoStyle::Minimal), None, ModelOption::Gemini)
            .with_count(2);
        let ranked = orchestrator.submit_batch(&unseeded).await;
        assert!(ranked.iter().all(|image| !image.prompt.contains("seed")));

        let seen = orchestrator.service.seen.lock().unwrap();
        assert!(seen.iter().all(|request| request.seed.is_some()));
        drop(seen);

        let ranked = orchestrator.submit_batch(&logo_batch()).await;
        assert!(ranked
            .iter()
            .all(|image| image.prompt.contains("Use a consistent seed for reproducibility: 100.")));
    }

    #[tokio::test]
    async fn test_edit_consumes_tray() {
        let orchestrator = GenerationOrchestrator::new(MockService::default(), ImageHistory::new());
        let mut tray = AttachmentTray::new();
        tray.add_files(vec![Attachment {
            filename: "logo.png".into(),
            media_type: "image/png".into(),
            data_url: "data:image/png;base64,AAAA".into(),
        }]);

        let edited = orchestrator.submit_edit("make it gold", ModelOption::Gemini, &mut tray).await;
        assert!(tray.is_empty());
        assert!(edited.is_edit);
        assert_eq!(edited.image_url.as_deref(), Some("mock://edit/1"));
        assert_eq!(edited.attachments.as_ref().map(Vec::len), Some(1));

        let empty = orchestrator.submit_edit("again", ModelOption::Gemini, &mut tray).await;
        assert_eq!(empty.error.as_deref(), Some(NO_IMAGE_ATTACHMENTS));
        assert_eq!(orchestrator.history().len(), 2);
    }
}
