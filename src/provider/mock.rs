//! Scripted test doubles for the three capability providers.
//!
//! Each mock handle answers from a script (the last entry repeats once the
//! script runs out) and counts its verb calls; each mock factory counts
//! probes and creations.  Counters are shared `Arc<AtomicUsize>` so tests can
//! keep reading them after the factory has been handed to a controller.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::SummarizerOptions;
use crate::language::LanguageCode;
use crate::provider::capability::{Capability, ProgressReporter, ProviderKind};
use crate::provider::handles::{
    LanguageCandidate, LanguageDetector, LanguagePair, ProviderError, Summarizer, Translator,
};
use crate::provider::lifecycle::ProviderFactory;
use crate::provider::summary::SummaryResponse;

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

struct Script<T> {
    responses: Vec<Result<T, ProviderError>>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
    panics: bool,
}

impl<T: Clone> Script<T> {
    fn new(responses: Vec<Result<T, ProviderError>>) -> Self {
        assert!(!responses.is_empty(), "script needs at least one response");
        Self {
            responses,
            calls: Arc::new(AtomicUsize::new(0)),
            delay: None,
            panics: false,
        }
    }

    async fn next(&self) -> Result<T, ProviderError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panics {
            panic!("scripted provider panic");
        }
        let idx = n.min(self.responses.len() - 1);
        self.responses[idx].clone()
    }
}

// ---------------------------------------------------------------------------
// Handles
// ---------------------------------------------------------------------------

pub struct MockDetector(Script<Vec<LanguageCandidate>>);

impl MockDetector {
    /// Always detects `code` with high confidence.
    pub fn detects(code: &str) -> Self {
        Self(Script::new(vec![Ok(vec![LanguageCandidate {
            detected_language: LanguageCode::new(code),
            confidence: 0.97,
        }])]))
    }

    pub fn scripted(responses: Vec<Result<Vec<LanguageCandidate>, ProviderError>>) -> Self {
        Self(Script::new(responses))
    }

    pub fn failing() -> Self {
        Self::scripted(vec![Err(ProviderError::Request("detector down".into()))])
    }

    /// Panics inside `detect`.
    pub fn panicking() -> Self {
        let mut script = Script::new(vec![Err(ProviderError::EmptyResponse)]);
        script.panics = true;
        Self(script)
    }
}

#[async_trait]
impl LanguageDetector for MockDetector {
    async fn detect(&self, _text: &str) -> Result<Vec<LanguageCandidate>, ProviderError> {
        self.0.next().await
    }
}

pub struct MockSummarizer(Script<SummaryResponse>);

impl MockSummarizer {
    pub fn ok(summary: &str) -> Self {
        Self::scripted(vec![Ok(SummaryResponse::Text(summary.into()))])
    }

    pub fn scripted(responses: Vec<Result<SummaryResponse, ProviderError>>) -> Self {
        Self(Script::new(responses))
    }

    pub fn failing() -> Self {
        Self::scripted(vec![Err(ProviderError::Timeout)])
    }

    /// Panics inside `summarize`, simulating an unexpected fault.
    pub fn panicking() -> Self {
        let mut script = Script::new(vec![Err(ProviderError::EmptyResponse)]);
        script.panics = true;
        Self(script)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.0.delay = Some(delay);
        self
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, _text: &str) -> Result<SummaryResponse, ProviderError> {
        self.0.next().await
    }
}

pub struct MockTranslator(Script<String>);

impl MockTranslator {
    pub fn ok(translation: &str) -> Self {
        Self::scripted(vec![Ok(translation.into())])
    }

    pub fn scripted(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self(Script::new(responses))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.0.delay = Some(delay);
        self
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, _text: &str) -> Result<String, ProviderError> {
        self.0.next().await
    }
}

// ---------------------------------------------------------------------------
// MockFactory
// ---------------------------------------------------------------------------

/// Where a factory panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Probe,
    Create,
}

/// Factory that hands out one pre-built handle.
pub struct MockFactory<H: ?Sized, C> {
    kind: ProviderKind,
    handle: Arc<H>,
    probe_result: Result<Capability, ProviderError>,
    unavailable_for: Vec<C>,
    fault: Option<Fault>,
    progress: Vec<(u64, u64)>,
    create_delay: Option<Duration>,
    fail_next_create: AtomicBool,
    probe_calls: Arc<AtomicUsize>,
    create_calls: Arc<AtomicUsize>,
    verb_calls: Arc<AtomicUsize>,
    configs: Mutex<Vec<C>>,
}

impl<H: ?Sized, C> MockFactory<H, C> {
    fn build(kind: ProviderKind, handle: Arc<H>, verb_calls: Arc<AtomicUsize>) -> Self {
        Self {
            kind,
            handle,
            probe_result: Ok(Capability::Available),
            unavailable_for: Vec::new(),
            fault: None,
            progress: Vec::new(),
            create_delay: None,
            fail_next_create: AtomicBool::new(false),
            probe_calls: Arc::new(AtomicUsize::new(0)),
            create_calls: Arc::new(AtomicUsize::new(0)),
            verb_calls,
            configs: Mutex::new(Vec::new()),
        }
    }

    /// Probe reports `capability`.
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.probe_result = Ok(capability);
        self
    }

    pub fn with_probe_error(mut self, error: ProviderError) -> Self {
        self.probe_result = Err(error);
        self
    }

    /// Probe reports `Unavailable` for exactly this config.
    pub fn unavailable_for(mut self, config: C) -> Self {
        self.unavailable_for.push(config);
        self
    }

    pub fn panicking_in(mut self, fault: Fault) -> Self {
        self.fault = Some(fault);
        self
    }

    /// Probe reports `Downloadable`; `create` emits these progress steps.
    pub fn downloadable(mut self, steps: Vec<(u64, u64)>) -> Self {
        self.probe_result = Ok(Capability::Downloadable);
        self.progress = steps;
        self
    }

    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    pub fn probe_calls(&self) -> usize {
        self.probe_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of `detect` / `summarize` / `translate` calls on the handle.
    pub fn verb_calls(&self) -> usize {
        self.verb_calls.load(Ordering::SeqCst)
    }

}

impl<H: ?Sized, C: Clone> MockFactory<H, C> {
    /// Configs passed to `create`, in order.
    pub fn created_configs(&self) -> Vec<C> {
        self.configs.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

pub type MockDetectorFactory = MockFactory<dyn LanguageDetector, ()>;
pub type MockSummarizerFactory = MockFactory<dyn Summarizer, SummarizerOptions>;
pub type MockTranslatorFactory = MockFactory<dyn Translator, LanguagePair>;

impl MockFactory<dyn LanguageDetector, ()> {
    pub fn new(detector: MockDetector) -> Self {
        let calls = Arc::clone(&detector.0.calls);
        Self::build(ProviderKind::LanguageDetector, Arc::new(detector), calls)
    }

    pub fn unavailable() -> Self {
        Self::new(MockDetector::detects("en")).with_capability(Capability::Unavailable)
    }
}

impl MockFactory<dyn Summarizer, SummarizerOptions> {
    pub fn new(summarizer: MockSummarizer) -> Self {
        let calls = Arc::clone(&summarizer.0.calls);
        Self::build(ProviderKind::Summarizer, Arc::new(summarizer), calls)
    }

    pub fn unavailable() -> Self {
        Self::new(MockSummarizer::ok("unused")).with_capability(Capability::Unavailable)
    }
}

impl MockFactory<dyn Translator, LanguagePair> {
    pub fn new(translator: MockTranslator) -> Self {
        let calls = Arc::clone(&translator.0.calls);
        Self::build(ProviderKind::Translator, Arc::new(translator), calls)
    }

    pub fn unavailable() -> Self {
        Self::new(MockTranslator::ok("unused")).with_capability(Capability::Unavailable)
    }
}

#[async_trait]
impl<H, C> ProviderFactory for MockFactory<H, C>
where
    H: ?Sized + Send + Sync + 'static,
    C: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static,
{
    type Handle = H;
    type Config = C;

    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn probe(&self, config: &C) -> Result<Capability, ProviderError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);
        if self.fault == Some(Fault::Probe) {
            panic!("scripted probe panic");
        }
        if self.unavailable_for.contains(config) {
            return Ok(Capability::Unavailable);
        }
        self.probe_result.clone()
    }

    async fn create(
        &self,
        config: &C,
        _capability: Capability,
        progress: ProgressReporter,
    ) -> Result<Arc<H>, ProviderError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.configs.lock().unwrap_or_else(PoisonError::into_inner).push(config.clone());
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fault == Some(Fault::Create) {
            panic!("scripted create panic");
        }
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(ProviderError::Download("scripted failure".into()));
        }
        for (loaded, total) in &self.progress {
            progress.report(*loaded, *total);
        }
        Ok(Arc::clone(&self.handle))
    }
}
