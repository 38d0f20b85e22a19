//! Session settings and their TOML file.
//!
//! Every section derives serde and `Default`.  Missing keys fall back to their defaults, so a hand-edited
//! `settings.toml` only needs the values it overrides.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// Selects which service answers the capability providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Backend {
    /// Ollama running locally. Missing models can be pulled on demand.
    Ollama,
    /// Any OpenAI-compatible REST API (OpenAI, Groq, LM Studio ...).
    /// Models must already be served; nothing is downloaded.
    OpenAiCompatible,
    /// Every capability probes as unavailable.
    Disabled,
}

impl Default for Backend {
    fn default() -> Self {
        Self::Ollama
    }
}

// ---------------------------------------------------------------------------
// CapabilityConfig
// ---------------------------------------------------------------------------

/// Per-capability switch and model selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityConfig {
    /// When `false` the capability probes as unavailable for the session.
    pub enabled: bool,
    /// Model identifier sent to the backend (e.g. `"qwen2.5:3b"`).
    pub model: String,
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "qwen2.5:3b".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProviderConfig
// ---------------------------------------------------------------------------

/// Connection settings shared by the three capability providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Which backend to talk to.
    pub backend: Backend,
    /// Base URL of the API endpoint.
    ///
    /// - Ollama default: `http://localhost:11434`
    /// - OpenAI: `https://api.openai.com`
    pub base_url: String,
    /// API key, `None` for local providers.
    pub api_key: Option<String>,
    /// Maximum seconds to wait for a single verb call (`detect`, `summarize`,
    /// `translate`).  Model downloads are not bounded by this.
    pub timeout_secs: u64,
    /// Allow pulling a missing model (Ollama only).  When `false` a missing
    /// model probes as unavailable instead of downloadable.
    pub auto_download: bool,
    /// Language detector.
    pub detector: CapabilityConfig,
    /// Summarizer.
    pub summarizer: CapabilityConfig,
    /// Translator.
    pub translator: CapabilityConfig,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            base_url: "http://localhost:11434".into(),
            api_key: None,
            timeout_secs: 10,
            auto_download: true,
            detector: CapabilityConfig::default(),
            summarizer: CapabilityConfig::default(),
            translator: CapabilityConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// PipelineConfig
// ---------------------------------------------------------------------------

/// Gates and fallbacks used by the send and translation pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum text length, in characters, before summarization is attempted.
    pub summary_min_chars: usize,
    /// The only language the summarizer is run for.
    pub summarizable_language: String,
    /// Language assumed when detection is unavailable or fails, and the
    /// translation source for messages that never got a language.
    pub fallback_language: String,
    /// Initial translation target for a new session.
    pub default_target_language: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            summary_min_chars: 150,
            summarizable_language: "en".into(),
            fallback_language: "en".into(),
            default_target_language: "en".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// SummarizerOptions
// ---------------------------------------------------------------------------

/// What kind of summary the summarizer is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryKind {
    KeyPoints,
    Tldr,
    Teaser,
    Headline,
}

/// Output markup of the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryFormat {
    Markdown,
    PlainText,
}

/// Relative summary length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryLength {
    Short,
    Medium,
    Long,
}

/// Options passed to the summarizer at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerOptions {
    /// Background sentence prepended to every summarization request.
    pub shared_context: String,
    pub kind: SummaryKind,
    pub format: SummaryFormat,
    pub length: SummaryLength,
}

impl Default for SummarizerOptions {
    fn default() -> Self {
        Self {
            shared_context: "This is a scientific article".into(),
            kind: SummaryKind::KeyPoints,
            format: SummaryFormat::Markdown,
            length: SummaryLength::Medium,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Everything the session reads at startup, stored as `settings.toml`.
///
/// ```rust,no_run
/// use text_processor::config::AppConfig;
///
/// let mut config = AppConfig::load()?;
/// config.pipeline.summary_min_chars = 300;
/// config.save()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Capability provider connection settings.
    pub provider: ProviderConfig,
    /// Pipeline gates and fallbacks.
    pub pipeline: PipelineConfig,
    /// Summarizer creation options.
    pub summarizer: SummarizerOptions,
}

impl AppConfig {
    /// Read [`AppPaths::settings_file`]; a first run (no file) yields defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("config: {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Write [`AppPaths::settings_file`], creating its directory if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)
            .with_context(|| format!("writing {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.provider.backend, loaded.provider.backend);
        assert_eq!(original.provider.base_url, loaded.provider.base_url);
        assert_eq!(original.provider.api_key, loaded.provider.api_key);
        assert_eq!(original.provider.summarizer, loaded.provider.summarizer);
        assert_eq!(original.pipeline, loaded.pipeline);
        assert_eq!(original.summarizer, loaded.summarizer);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");

        assert_eq!(config.pipeline, PipelineConfig::default());
        assert_eq!(config.provider.backend, Backend::Ollama);
    }

    #[test]
    fn malformed_file_names_the_path() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "pipeline = [").expect("write");

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.toml"));
    }

    /// The defaults carry the fixed pipeline constants.
    #[test]
    fn default_values_match_pipeline_constants() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.pipeline.summary_min_chars, 150);
        assert_eq!(cfg.pipeline.summarizable_language, "en");
        assert_eq!(cfg.pipeline.fallback_language, "en");
        assert_eq!(cfg.pipeline.default_target_language, "en");
        assert_eq!(cfg.provider.base_url, "http://localhost:11434");
        assert_eq!(cfg.provider.timeout_secs, 10);
        assert!(cfg.provider.api_key.is_none());
        assert!(cfg.provider.auto_download);
        assert_eq!(cfg.summarizer.kind, SummaryKind::KeyPoints);
        assert_eq!(cfg.summarizer.format, SummaryFormat::Markdown);
        assert_eq!(cfg.summarizer.length, SummaryLength::Medium);
        assert_eq!(cfg.summarizer.shared_context, "This is a scientific article");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "[provider]\nbackend = \"OpenAiCompatible\"\n\n[pipeline]\nsummary_min_chars = 300\n",
        )
        .expect("write");

        let cfg = AppConfig::load_from(&path).expect("load");

        assert_eq!(cfg.provider.backend, Backend::OpenAiCompatible);
        assert_eq!(cfg.provider.timeout_secs, 10);
        assert_eq!(cfg.pipeline.summary_min_chars, 300);
        assert_eq!(cfg.pipeline.summarizable_language, "en");
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.provider.backend = Backend::Disabled;
        cfg.provider.api_key = Some("sk-test".into());
        cfg.provider.translator.model = "gpt-4o-mini".into();
        cfg.provider.detector.enabled = false;
        cfg.pipeline.default_target_language = "fr".into();
        cfg.summarizer.kind = SummaryKind::Tldr;
        cfg.summarizer.length = SummaryLength::Short;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.provider.backend, Backend::Disabled);
        assert_eq!(loaded.provider.api_key, Some("sk-test".into()));
        assert_eq!(loaded.provider.translator.model, "gpt-4o-mini");
        assert!(!loaded.provider.detector.enabled);
        assert_eq!(loaded.pipeline.default_target_language, "fr");
        assert_eq!(loaded.summarizer.kind, SummaryKind::Tldr);
        assert_eq!(loaded.summarizer.length, SummaryLength::Short);
    }
}
