//! Remote translator, bound to one language pair per handle.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::CapabilityConfig;
use crate::provider::{
    Capability, LanguagePair, ProgressReporter, ProviderError, ProviderFactory, ProviderKind,
    Translator,
};
use crate::remote::client::ApiClient;
use crate::remote::prompt::ChatPrompt;

pub struct RemoteTranslator {
    client: Arc<ApiClient>,
    model: String,
    pair: LanguagePair,
}

#[async_trait]
impl Translator for RemoteTranslator {
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        let prompt = ChatPrompt::translate(&self.pair, text);
        self.client.chat(&self.model, &prompt).await
    }
}

pub struct RemoteTranslatorFactory {
    client: Arc<ApiClient>,
    capability: CapabilityConfig,
}

impl RemoteTranslatorFactory {
    pub fn new(client: Arc<ApiClient>, capability: CapabilityConfig) -> Self {
        Self { client, capability }
    }
}

#[async_trait]
impl ProviderFactory for RemoteTranslatorFactory {
    type Handle = dyn Translator;
    type Config = LanguagePair;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Translator
    }

    /// Targets outside the supported table are unavailable.
    async fn probe(&self, pair: &LanguagePair) -> Result<Capability, ProviderError> {
        if !pair.target.is_supported() {
            log::info!("provider[translator]: unsupported target {}", pair.target);
            return Ok(Capability::Unavailable);
        }
        self.client.probe_model(&self.capability).await
    }

    async fn create(
        &self,
        pair: &LanguagePair,
        capability: Capability,
        progress: ProgressReporter,
    ) -> Result<Arc<dyn Translator>, ProviderError> {
        self.client
            .prepare(&self.capability.model, capability, &progress)
            .await?;
        Ok(Arc::new(RemoteTranslator {
            client: Arc::clone(&self.client),
            model: self.capability.model.clone(),
            pair: pair.clone(),
        }))
    }
}
