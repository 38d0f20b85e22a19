//! Configuration module for the text-processing session.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the capability
//! providers, the pipeline gates and the summarizer options, `AppPaths` for
//! the platform config directory, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, Backend, CapabilityConfig, PipelineConfig, ProviderConfig, SummaryFormat,
    SummaryKind, SummaryLength, SummarizerOptions,
};
