//! Controller harness shared by the pipeline tests.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::provider::mock::{
    MockDetector, MockDetectorFactory, MockSummarizer, MockSummarizerFactory, MockTranslator,
    MockTranslatorFactory,
};
use crate::provider::Providers;

use super::events::EventSender;
use super::runner::SessionController;

/// `len` characters of English-looking prose.
pub fn english_prose(len: usize) -> String {
    "The quick brown fox jumps over the lazy dog. "
        .chars()
        .cycle()
        .take(len)
        .collect()
}

/// A controller wired to mock factories whose counters stay readable.
///
/// Defaults: detector answers `en`, summarizer answers
/// `"A short summary."`, translator answers `"Hello world"`.
pub struct Harness {
    pub controller: Arc<SessionController>,
    pub detector: Arc<MockDetectorFactory>,
    pub summarizer: Arc<MockSummarizerFactory>,
    pub translator: Arc<MockTranslatorFactory>,
    events: EventSender,
}

impl Harness {
    pub fn with_events(events: EventSender) -> Self {
        Self::build(
            Arc::new(MockDetectorFactory::new(MockDetector::detects("en"))),
            Arc::new(MockSummarizerFactory::new(MockSummarizer::ok("A short summary."))),
            Arc::new(MockTranslatorFactory::new(MockTranslator::ok("Hello world"))),
            events,
        )
    }

    pub fn with_detector(self, detector: MockDetectorFactory) -> Self {
        Self::build(Arc::new(detector), self.summarizer, self.translator, self.events)
    }

    pub fn with_summarizer(self, summarizer: MockSummarizerFactory) -> Self {
        Self::build(self.detector, Arc::new(summarizer), self.translator, self.events)
    }

    pub fn with_translator(self, translator: MockTranslatorFactory) -> Self {
        Self::build(self.detector, self.summarizer, Arc::new(translator), self.events)
    }

    fn build(
        detector: Arc<MockDetectorFactory>,
        summarizer: Arc<MockSummarizerFactory>,
        translator: Arc<MockTranslatorFactory>,
        events: EventSender,
    ) -> Self {
        let providers = Providers {
            detector: detector.clone(),
            summarizer: summarizer.clone(),
            translator: translator.clone(),
        };
        let controller = Arc::new(SessionController::new(
            providers,
            &AppConfig::default(),
            events.clone(),
        ));
        Self {
            controller,
            detector,
            summarizer,
            translator,
            events,
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::with_events(EventSender::detached())
    }
}
