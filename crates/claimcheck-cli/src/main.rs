//! claimcheck CLI
//!
//! Usage:
//!   claimcheck assess <FILES>... [--analysis FILE] [--config FILE] [--format json|text]
//!   claimcheck check-config <FILE>
//!   claimcheck metadata <FILE> [--config FILE] [--interpret]
//!
//! Exit codes:
//!   0 = Completed
//!   1 = Usage, config or input error

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use claimcheck_core::metadata::render_interpreted;
use claimcheck_core::{BatchReport, DocumentAnalysis, EngineConfig, FileType, MetadataExtractor, PdfMetadata};
use claimcheck_runtime::{
    AnalysisProvider, BatchOrchestrator, RuntimeConfig, SidecarAnalysisProvider, StaticAnalysisProvider,
};

#[derive(Parser)]
#[command(name = "claimcheck")]
#[command(author, version, about = "Assess claim documents and photos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate files and decide accept / review / reject
    Assess {
        /// Files to assess
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// One analysis JSON used for every file (default: <file>.analysis.json sidecars)
        #[arg(short, long)]
        analysis: Option<PathBuf>,

        /// Engine config (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Files validated at once
        #[arg(long, default_value_t = 4)]
        concurrency: usize,

        /// Per-file validation timeout, e.g. "30s" or "1m"
        #[arg(long, default_value = "30s")]
        timeout: String,

        /// Date treated as today by the date check (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Validate an engine config file
    CheckConfig {
        /// Path to config file (YAML or JSON)
        file: PathBuf,
    },

    /// Dump grouped metadata of a file as JSON
    Metadata {
        file: PathBuf,

        /// Engine config supplying extraction limits
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print image metadata as text with the meaning of each tag
        #[arg(short, long)]
        interpret: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Assess {
            files,
            analysis,
            config,
            format,
            concurrency,
            timeout,
            today,
        } => {
            let engine = load_config(config.as_deref())?;
            let runtime = RuntimeConfig::default()
                .with_timeout(&timeout)?
                .with_concurrency(concurrency)?;
            let provider = load_provider(analysis.as_deref())?;

            let mut builder = BatchOrchestrator::builder()
                .engine(Arc::new(engine))
                .provider(provider)
                .config(runtime);
            if let Some(today) = today {
                builder = builder.today(today);
            }
            let orchestrator = builder.build()?;

            let records = orchestrator.assess_batch(files).await;
            info!(files = records.len(), "assessment complete");

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
                OutputFormat::Text => println!("{}", BatchReport::from_records(&records).render()),
            }
        }

        Commands::CheckConfig { file } => {
            let config = load_config(Some(&file))?;
            println!(
                "Config OK: version {}, territory {}",
                config.config_version, config.territory.name
            );
        }

        Commands::Metadata {
            file,
            config,
            interpret,
        } => {
            let engine = load_config(config.as_deref())?;
            let output = dump_metadata(&file, &engine, interpret)?;
            println!("{}", output);
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn load_provider(analysis: Option<&Path>) -> Result<Arc<dyn AnalysisProvider>> {
    let Some(path) = analysis else {
        return Ok(Arc::new(SidecarAnalysisProvider::new()));
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read analysis: {}", path.display()))?;
    let analysis: DocumentAnalysis = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse analysis: {}", path.display()))?;
    Ok(Arc::new(StaticAnalysisProvider::uniform(analysis)))
}

/// PDFs are always dumped as JSON; `interpret` applies to images.
fn dump_metadata(file: &Path, engine: &EngineConfig, interpret: bool) -> Result<String> {
    let file_type = file
        .extension()
        .and_then(|e| e.to_str())
        .map(FileType::from_extension)
        .unwrap_or(FileType::Unknown);

    let output = match file_type {
        FileType::Pdf => {
            let metadata = PdfMetadata::from_path(file, &engine.limits)
                .with_context(|| format!("Failed to read PDF: {}", file.display()))?;
            serde_json::to_string_pretty(&metadata)?
        }
        _ => {
            let extraction = MetadataExtractor::new(engine.limits)
                .extract_path(file)
                .with_context(|| format!("Failed to extract metadata: {}", file.display()))?;
            if interpret {
                render_interpreted(&extraction.groups)
            } else {
                serde_json::to_string_pretty(&extraction)?
            }
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_assess_defaults() {
        let cli = Cli::try_parse_from(["claimcheck", "assess", "a.jpg", "b.pdf"]).unwrap();
        match cli.command {
            Commands::Assess {
                files,
                format,
                concurrency,
                timeout,
                analysis,
                ..
            } => {
                assert_eq!(files.len(), 2);
                assert_eq!(format, OutputFormat::Text);
                assert_eq!(concurrency, 4);
                assert_eq!(timeout, "30s");
                assert!(analysis.is_none());
            }
            _ => panic!("expected assess"),
        }
    }

    #[test]
    fn test_assess_requires_files() {
        assert!(Cli::try_parse_from(["claimcheck", "assess"]).is_err());
    }

    #[test]
    fn test_assess_flags() {
        let cli = Cli::try_parse_from([
            "claimcheck", "assess", "a.jpg", "--format", "json", "--today", "2024-05-01", "--timeout", "5s",
        ])
        .unwrap();
        match cli.command {
            Commands::Assess { format, today, .. } => {
                assert_eq!(format, OutputFormat::Json);
                assert_eq!(today, NaiveDate::from_ymd_opt(2024, 5, 1));
            }
            _ => panic!("expected assess"),
        }
    }

    #[test]
    fn test_load_provider_from_analysis_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        std::fs::write(
            &path,
            r#"{"file_type": "pdf", "document_type": "damage_act", "creation_method": "scanned",
                "confidence": 0.9, "red_flags": [], "warnings": [], "images_match_claims": null}"#,
        )
        .unwrap();
        let provider = load_provider(Some(&path)).unwrap();
        assert_eq!(provider.name(), "static");
        assert_eq!(load_provider(None).unwrap().name(), "sidecar");

        std::fs::write(&path, "nope").unwrap();
        let err = load_provider(Some(&path)).err().unwrap();
        assert!(err.to_string().contains("Failed to parse analysis"));
    }

    #[test]
    fn test_metadata_interpret_flag() {
        let cli = Cli::try_parse_from(["claimcheck", "metadata", "a.tif", "--interpret"]).unwrap();
        assert!(matches!(cli.command, Commands::Metadata { interpret: true, .. }));

        let cli = Cli::try_parse_from(["claimcheck", "metadata", "a.tif"]).unwrap();
        assert!(matches!(cli.command, Commands::Metadata { interpret: false, .. }));
    }

    /// 1x1 RGBA PNG
    const TINY_PNG: [u8; 67] = [
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
        0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
        0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
        0x42, 0x60, 0x82,
    ];

    #[test]
    fn test_dump_metadata_interpreted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        std::fs::write(&path, TINY_PNG).unwrap();
        let engine = EngineConfig::default();

        let text = dump_metadata(&path, &engine, true).unwrap();
        assert!(text.contains(" BASIC INFO"));
        assert!(text.contains("  file_size: 67"));
        assert!(text.contains("    → File size in bytes"));

        let json = dump_metadata(&path, &engine, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["groups"]["basic_info"]["file_size"], 67);
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let err = load_config(Some(Path::new("/nonexistent/engine.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
        assert!(load_config(None).is_ok());
    }
}
