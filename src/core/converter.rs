//! Conversion client: story text in, shot list out.
//!
//! A conversion is validate → check credentials → request (with retry) →
//! strict decode. Each call builds its own request and its own ShotList;
//! the only thing shared between calls is the read-only HTTP pool.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::{debug, error, info, instrument, warn};

use super::decode::decode_breakdown;
use super::prompt::build_messages;
use crate::adapters::{Completion, CompletionBackend, CompletionRequest, OpenAiBackend};
use crate::config::ConvertConfig;
use crate::domain::ShotList;
use crate::error::{ConvertError, Result, UpstreamError};

/// Converts narrative text into scenes and shots
#[derive(Clone)]
pub struct Converter {
    config: ConvertConfig,
    backend: Arc<dyn CompletionBackend>,
}

impl Converter {
    /// Create a converter backed by the OpenAI-compatible API in `config`
    pub fn new(config: ConvertConfig) -> Self {
        // Invalid keys are rejected by `convert` before the backend is used
        let api_key = config.api_key().map(str::to_string).unwrap_or_default();
        let backend = OpenAiBackend::new(config.base_url.clone(), api_key);
        Self::with_backend(config, Arc::new(backend))
    }

    /// Create a converter with a custom completion backend
    pub fn with_backend(config: ConvertConfig, backend: Arc<dyn CompletionBackend>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert one story into an ordered shot list
    #[instrument(skip_all, fields(model = %self.config.model, bytes = text.len()))]
    pub async fn convert(&self, text: &str) -> Result<ShotList> {
        let story = self.config.limits.validate(text)?;
        self.config.api_key()?;

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages: build_messages(&story, self.config.language.as_deref()),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            json_mode: true,
            timeout: self.config.request_timeout(),
        };

        let started = Instant::now();
        let completion = self.complete_with_retry(&request).await?;

        if completion.is_truncated() {
            error!("Completion stopped at the token limit");
            return Err(ConvertError::malformed(
                "response was truncated at the token limit",
            ));
        }

        let scenes = decode_breakdown(&completion.content).map_err(|e| {
            error!(error = %e, "Failed to decode breakdown");
            e
        })?;

        let shot_list = ShotList::new(completion.model, scenes).with_usage(completion.usage);

        info!(
            id = %shot_list.id,
            scenes = shot_list.scene_count(),
            shots = shot_list.shot_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Conversion completed"
        );

        Ok(shot_list)
    }

    /// Convert several independent stories concurrently.
    ///
    /// Returns one result per input, in input order.
    pub async fn convert_batch<I, S>(&self, texts: I, max_concurrency: usize) -> Vec<Result<ShotList>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));

        let handles: Vec<_> = texts
            .into_iter()
            .map(|text| {
                let text: String = text.into();
                let converter = self.clone();
                let semaphore = Arc::clone(&semaphore);
                tokio::spawn(async move {
                    let _permit = semaphore.acquire_owned().await.ok();
                    converter.convert(&text).await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(e) => Err(UpstreamError::Unreachable(format!("conversion task cancelled: {}", e)).into()),
            };
            results.push(result);
        }
        results
    }

    /// Verify the backend is reachable with the configured credential
    pub async fn health_check(&self) -> Result<()> {
        self.config.api_key()?;
        self.backend.health_check().await
    }

    /// Execute a request with retry logic
    async fn complete_with_retry(&self, request: &CompletionRequest) -> Result<Completion> {
        let policy = &self.config.retry;
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            debug!(backend = self.backend.name(), attempt, "Requesting completion");

            match self.backend.complete(request).await {
                Ok(completion) => return Ok(completion),
                Err(e) if e.is_retryable() && policy.should_retry(attempt) => {
                    let delay = policy.delay_with_hint(attempt, e.retry_after());
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Completion failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    error!(attempt, error = %e, "Completion failed");
                    return Err(e);
                }
            }
        }
    }
}

/// Convert one story with the given configuration
pub async fn convert(text: &str, config: &ConvertConfig) -> Result<ShotList> {
    Converter::new(config.clone()).convert(text).await
}
