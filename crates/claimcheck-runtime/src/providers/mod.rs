//! Sources of semantic analysis.
//!
//! Producing a [`DocumentAnalysis`] (classification, extraction, red flags)
//! happens outside this workspace. The orchestrator only needs something
//! that hands one over per file, so the provider is injected as a trait
//! object instead of being a global client.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use claimcheck_core::DocumentAnalysis;

/// Errors from analysis providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("cannot read analysis {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid analysis JSON in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no analysis available for {0}")]
    Missing(String),
}

/// Supplies the semantic analysis of a submitted file.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, path: &Path) -> Result<DocumentAnalysis, ProviderError>;

    /// Provider name for logs.
    fn name(&self) -> &str;
}

/// Fixed analyses, keyed by path, with an optional fallback for any other file.
#[derive(Debug, Clone, Default)]
pub struct StaticAnalysisProvider {
    analyses: HashMap<PathBuf, DocumentAnalysis>,
    fallback: Option<DocumentAnalysis>,
}

impl StaticAnalysisProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every file gets the same analysis.
    pub fn uniform(analysis: DocumentAnalysis) -> Self {
        Self {
            analyses: HashMap::new(),
            fallback: Some(analysis),
        }
    }

    pub fn with(mut self, path: impl Into<PathBuf>, analysis: DocumentAnalysis) -> Self {
        self.analyses.insert(path.into(), analysis);
        self
    }
}

#[async_trait]
impl AnalysisProvider for StaticAnalysisProvider {
    async fn analyze(&self, path: &Path) -> Result<DocumentAnalysis, ProviderError> {
        self.analyses
            .get(path)
            .or(self.fallback.as_ref())
            .cloned()
            .map(|analysis| analysis.with_path(path.display().to_string()))
            .ok_or_else(|| ProviderError::Missing(path.display().to_string()))
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// Reads `<file>.analysis.json` next to each submitted file.
#[derive(Debug, Clone)]
pub struct SidecarAnalysisProvider {
    suffix: String,
}

impl SidecarAnalysisProvider {
    pub const DEFAULT_SUFFIX: &'static str = ".analysis.json";

    pub fn new() -> Self {
        Self {
            suffix: Self::DEFAULT_SUFFIX.to_string(),
        }
    }

    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self { suffix: suffix.into() }
    }

    /// Sidecar path for a submitted file.
    pub fn sidecar_path(&self, path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(&self.suffix);
        PathBuf::from(name)
    }
}

impl Default for SidecarAnalysisProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalysisProvider for SidecarAnalysisProvider {
    async fn analyze(&self, path: &Path) -> Result<DocumentAnalysis, ProviderError> {
        let sidecar = self.sidecar_path(path);
        let sidecar_display = sidecar.display().to_string();
        debug!(sidecar = %sidecar_display, "reading analysis sidecar");

        let contents = tokio::fs::read_to_string(&sidecar)
            .await
            .map_err(|source| ProviderError::Io {
                path: sidecar_display.clone(),
                source,
            })?;
        let analysis: DocumentAnalysis =
            serde_json::from_str(&contents).map_err(|source| ProviderError::Parse {
                path: sidecar_display,
                source,
            })?;
        Ok(analysis.with_path(path.display().to_string()))
    }

    fn name(&self) -> &str {
        "sidecar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimcheck_core::{CreationMethod, DocumentKind, FileType};

    fn act() -> DocumentAnalysis {
        DocumentAnalysis::new(FileType::Pdf, DocumentKind::DamageAct, CreationMethod::Scanned, 0.9)
    }

    #[tokio::test]
    async fn test_static_provider_lookup_and_fallback() {
        let provider = StaticAnalysisProvider::new().with("a.pdf", act());
        let found = provider.analyze(Path::new("a.pdf")).await.unwrap();
        assert_eq!(found.file_path, "a.pdf");
        assert!(matches!(
            provider.analyze(Path::new("b.pdf")).await,
            Err(ProviderError::Missing(_))
        ));

        let uniform = StaticAnalysisProvider::uniform(act());
        let any = uniform.analyze(Path::new("c.pdf")).await.unwrap();
        assert_eq!(any.file_path, "c.pdf");
        assert_eq!(any.document_type, DocumentKind::DamageAct);
    }

    #[tokio::test]
    async fn test_sidecar_provider_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("photo.jpg");
        std::fs::write(
            dir.path().join("photo.jpg.analysis.json"),
            r#"{"file_type": "image", "document_type": "damage_photo", "creation_method": "unknown",
                "confidence": 0.85, "red_flags": ["Tampered"], "warnings": [], "images_match_claims": null}"#,
        )
        .unwrap();

        let provider = SidecarAnalysisProvider::new();
        let analysis = provider.analyze(&photo).await.unwrap();
        assert_eq!(analysis.file_type, FileType::Image);
        assert_eq!(analysis.red_flags, ["Tampered"]);
        assert_eq!(analysis.file_path, photo.display().to_string());
    }

    #[tokio::test]
    async fn test_sidecar_errors() {
        let dir = tempfile::tempdir().unwrap();
        let provider = SidecarAnalysisProvider::new();

        let missing = provider.analyze(&dir.path().join("none.jpg")).await;
        assert!(matches!(missing, Err(ProviderError::Io { .. })));

        std::fs::write(dir.path().join("bad.jpg.analysis.json"), "{ not json").unwrap();
        let bad = provider.analyze(&dir.path().join("bad.jpg")).await;
        assert!(matches!(bad, Err(ProviderError::Parse { .. })));
    }

    #[test]
    fn test_sidecar_path() {
        let provider = SidecarAnalysisProvider::with_suffix(".json");
        assert_eq!(
            provider.sidecar_path(Path::new("/claims/act.pdf")),
            PathBuf::from("/claims/act.pdf.json")
        );
    }
}
