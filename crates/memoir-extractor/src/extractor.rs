//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::filter::select_units;
use crate::parser::parse_batch_response;
use crate::prompt::BatchPromptBuilder;
use crate::types::{ExtractionMetadata, ExtractionReport, ExtractionUnit};
use memoir_domain::{Fact, Message};
use memoir_llm::{LlmClient, Prompt};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Turns chat messages into categorized facts through an LLM
///
/// Batches are dispatched concurrently, but never more than
/// `max_concurrent` LLM calls are in flight at once. A batch whose call
/// fails contributes nothing; the other batches are unaffected.
pub struct FactExtractor<L: LlmClient + ?Sized> {
    llm: Arc<L>,
    config: Arc<ExtractorConfig>,
}

/// What one batch produced
#[derive(Debug, Default)]
struct BatchOutcome {
    facts: Vec<Fact>,
    discarded: usize,
    failed: bool,
}

impl BatchOutcome {
    fn failed() -> Self {
        Self {
            failed: true,
            ..Self::default()
        }
    }
}

impl<L: LlmClient + ?Sized + 'static> FactExtractor<L> {
    /// Create an extractor with the default configuration
    pub fn new(llm: Arc<L>) -> Self {
        Self {
            llm,
            config: Arc::new(ExtractorConfig::default()),
        }
    }

    /// Create an extractor with a custom configuration
    pub fn with_config(llm: Arc<L>, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate()?;
        Ok(Self {
            llm,
            config: Arc::new(config),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract facts from a message sequence
    ///
    /// Facts arrive grouped by batch in completion order, so the order is
    /// not stable across runs.
    pub async fn extract(&self, messages: &[Message]) -> Vec<Fact> {
        self.extract_report(messages).await.facts
    }

    /// Extract facts and report what happened along the way
    pub async fn extract_report(&self, messages: &[Message]) -> ExtractionReport {
        let start = Instant::now();
        let mut metadata = ExtractionMetadata {
            model_name: self.llm.model_name().to_string(),
            messages_seen: messages.len(),
            ..ExtractionMetadata::default()
        };

        let units = select_units(messages, &self.config);
        metadata.units_extracted = units.len();

        if units.is_empty() {
            debug!("No candidate messages among {}", messages.len());
            metadata.processing_time_ms = start.elapsed().as_millis() as u64;
            return ExtractionReport {
                facts: Vec::new(),
                metadata,
            };
        }

        info!(
            "Extracting from {} of {} messages in batches of {}",
            units.len(),
            messages.len(),
            self.config.batch_size
        );

        let permits = Arc::new(Semaphore::new(self.config.max_concurrent));
        let mut tasks = JoinSet::new();

        for batch in units.chunks(self.config.batch_size) {
            let batch = batch.to_vec();
            let llm = Arc::clone(&self.llm);
            let config = Arc::clone(&self.config);
            let permits = Arc::clone(&permits);

            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    warn!("Concurrency limiter closed; dropping batch");
                    return BatchOutcome::failed();
                };
                run_batch(llm.as_ref(), &batch, &config).await
            });
            metadata.batches_dispatched += 1;
        }

        let mut facts = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    metadata.lines_discarded += outcome.discarded;
                    if outcome.failed {
                        metadata.batches_failed += 1;
                    }
                    facts.extend(outcome.facts);
                }
                Err(e) => {
                    warn!("Batch task aborted: {}", e);
                    metadata.batches_failed += 1;
                }
            }
        }

        metadata.processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "Extraction complete: {} facts from {} batches ({} failed, {} lines discarded)",
            facts.len(),
            metadata.batches_dispatched,
            metadata.batches_failed,
            metadata.lines_discarded
        );

        ExtractionReport { facts, metadata }
    }

    /// Blocking wrapper around [`FactExtractor::extract`]
    ///
    /// Builds a private single-threaded runtime. Must not be called from
    /// inside an async context.
    pub fn extract_blocking(&self, messages: &[Message]) -> Result<Vec<Fact>, ExtractorError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ExtractorError::Runtime(format!("Failed to start runtime: {}", e)))?;

        Ok(runtime.block_on(self.extract(messages)))
    }
}

async fn run_batch<L: LlmClient + ?Sized>(
    llm: &L,
    batch: &[ExtractionUnit],
    config: &ExtractorConfig,
) -> BatchOutcome {
    let prompt = BatchPromptBuilder::new(batch, config).build();
    debug!("Batch of {} units, prompt length {} chars", batch.len(), prompt.len());

    let response = match llm.generate(Prompt::Text(prompt)).await {
        Ok(response) => response,
        Err(e) => {
            let first = batch.first().map(|unit| unit.index).unwrap_or_default();
            warn!("LLM call failed for batch starting at message {}: {}", first, e);
            return BatchOutcome::failed();
        }
    };

    let parsed = parse_batch_response(&response, batch);
    if parsed.discarded > 0 {
        debug!("Discarded {} malformed response lines", parsed.discarded);
    }

    BatchOutcome {
        facts: parsed.facts,
        discarded: parsed.discarded,
        failed: false,
    }
}
