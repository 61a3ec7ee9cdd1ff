//! # claimcheck-runtime
//!
//! Async batch orchestration for claimcheck.
//!
//! The deterministic engine in `claimcheck-core` is synchronous and
//! stateless. This crate runs it over many files at once:
//! - one blocking worker per file, bounded by `max_concurrency`
//! - a per-file validation timeout
//! - an injected [`AnalysisProvider`] supplying each file's semantic analysis
//!
//! A slow, crashing or unanalysable file only affects its own record.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use claimcheck_runtime::{BatchOrchestrator, RuntimeConfig, SidecarAnalysisProvider};
//!
//! let orchestrator = BatchOrchestrator::builder()
//!     .engine(Arc::new(engine_config))
//!     .provider(Arc::new(SidecarAnalysisProvider::new()))
//!     .config(RuntimeConfig::default().with_timeout("45s")?)
//!     .build()?;
//!
//! let records = orchestrator.assess_batch(paths).await;
//! ```

mod config;
pub mod orchestrator;
pub mod providers;

use std::time::Duration;

use thiserror::Error;

pub use config::RuntimeConfig;
pub use orchestrator::{BatchOrchestrator, BatchOrchestratorBuilder};
pub use providers::{
    AnalysisProvider, ProviderError, SidecarAnalysisProvider, StaticAnalysisProvider,
};

/// Errors from the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Analysis provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Validation timed out after {}", humantime::format_duration(.0.clone()))]
    Timeout(Duration),

    #[error("Validation failed: worker {0}")]
    Join(String),

    #[error("Invalid runtime config: {0}")]
    InvalidConfig(String),

    #[error("Orchestrator not configured: {0}")]
    NotConfigured(String),
}
