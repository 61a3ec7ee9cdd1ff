//! Batch orchestrator.
//!
//! For each file:
//! 1. Ask the provider for its semantic analysis
//! 2. Validate on a blocking worker under the validation timeout
//! 3. Decide through the deterministic core
//!
//! Files are processed `max_concurrency` at a time and records come back
//! in input order. Failures at any step are folded into that file's record.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use claimcheck_core::{DecisionRecord, DocumentAnalysis, EngineConfig, FileType, Pipeline};

use crate::config::RuntimeConfig;
use crate::providers::AnalysisProvider;
use crate::RuntimeError;

/// Runs the engine over batches of files.
pub struct BatchOrchestrator {
    provider: Arc<dyn AnalysisProvider>,
    engine: Arc<EngineConfig>,
    config: RuntimeConfig,
    /// Pinned "today" for the date validator
    today: Option<NaiveDate>,
}

impl BatchOrchestrator {
    pub fn builder() -> BatchOrchestratorBuilder {
        BatchOrchestratorBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    /// Assess every file. Output order matches input order.
    pub async fn assess_batch(&self, paths: Vec<PathBuf>) -> Vec<DecisionRecord> {
        info!(
            files = paths.len(),
            provider = self.provider.name(),
            max_concurrency = self.config.max_concurrency,
            "assessing batch"
        );

        stream::iter(paths)
            .map(|path| async move { self.assess_one(&path).await })
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await
    }

    /// Assess one file. Never fails: problems end up in the record.
    pub async fn assess_one(&self, path: &Path) -> DecisionRecord {
        let analysis = match self.provider.analyze(path).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "analysis unavailable");
                let file_type = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(FileType::from_extension)
                    .unwrap_or(FileType::Unknown);
                DocumentAnalysis::failed(path.display().to_string(), file_type, e)
            }
        };

        let engine = Arc::clone(&self.engine);
        let today = self.today;
        let worker_path = path.to_path_buf();
        let worker_analysis = analysis.clone();
        let validated = run_blocking(self.config.validation_timeout, move || {
            pipeline(&engine, today).validate_file(&worker_path, &worker_analysis)
        })
        .await;

        let pipeline = pipeline(&self.engine, self.today);
        match validated {
            Ok(validation) => pipeline.assess(analysis, validation),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "validation did not complete");
                pipeline.assess_failure(path, analysis, &e.to_string())
            }
        }
    }
}

fn pipeline(engine: &EngineConfig, today: Option<NaiveDate>) -> Pipeline<'_> {
    match today {
        Some(today) => Pipeline::new(engine).with_today(today),
        None => Pipeline::new(engine),
    }
}

/// Run synchronous work on the blocking pool with an upper bound on wall time.
///
/// A timed-out worker keeps running to completion in the background; its
/// result is discarded.
async fn run_blocking<T, F>(timeout: Duration, work: F) -> Result<T, RuntimeError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(work)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(join)) => Err(RuntimeError::Join(join.to_string())),
        Err(_) => Err(RuntimeError::Timeout(timeout)),
    }
}

/// Builder for [`BatchOrchestrator`].
pub struct BatchOrchestratorBuilder {
    provider: Option<Arc<dyn AnalysisProvider>>,
    engine: Option<Arc<EngineConfig>>,
    config: RuntimeConfig,
    today: Option<NaiveDate>,
}

impl BatchOrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            engine: None,
            config: RuntimeConfig::default(),
            today: None,
        }
    }

    pub fn provider(mut self, provider: Arc<dyn AnalysisProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Engine configuration. Defaults to `EngineConfig::default()`.
    pub fn engine(mut self, engine: Arc<EngineConfig>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn build(self) -> Result<BatchOrchestrator, RuntimeError> {
        let provider = self
            .provider
            .ok_or_else(|| RuntimeError::NotConfigured("no analysis provider".to_string()))?;
        if self.config.max_concurrency == 0 {
            return Err(RuntimeError::InvalidConfig(
                "max_concurrency must be at least 1".to_string(),
            ));
        }

        Ok(BatchOrchestrator {
            provider,
            engine: self.engine.unwrap_or_default(),
            config: self.config,
            today: self.today,
        })
    }
}

impl Default for BatchOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
