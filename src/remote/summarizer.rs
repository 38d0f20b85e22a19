//! Remote summarizer.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{CapabilityConfig, SummarizerOptions};
use crate::provider::{
    Capability, ProgressReporter, ProviderError, ProviderFactory, ProviderKind, Summarizer,
    SummaryResponse,
};
use crate::remote::client::ApiClient;
use crate::remote::detector::strip_fences;
use crate::remote::prompt::ChatPrompt;

pub struct RemoteSummarizer {
    client: Arc<ApiClient>,
    model: String,
    options: SummarizerOptions,
}

#[async_trait]
impl Summarizer for RemoteSummarizer {
    async fn summarize(&self, text: &str) -> Result<SummaryResponse, ProviderError> {
        let prompt = ChatPrompt::summarize(&self.options, text);
        let content = self.client.chat(&self.model, &prompt).await?;
        Ok(SummaryResponse::from_content(strip_fences(&content)))
    }
}

pub struct RemoteSummarizerFactory {
    client: Arc<ApiClient>,
    capability: CapabilityConfig,
}

impl RemoteSummarizerFactory {
    pub fn new(client: Arc<ApiClient>, capability: CapabilityConfig) -> Self {
        Self { client, capability }
    }
}

#[async_trait]
impl ProviderFactory for RemoteSummarizerFactory {
    type Handle = dyn Summarizer;
    type Config = SummarizerOptions;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Summarizer
    }

    async fn probe(&self, _options: &SummarizerOptions) -> Result<Capability, ProviderError> {
        self.client.probe_model(&self.capability).await
    }

    async fn create(
        &self,
        options: &SummarizerOptions,
        capability: Capability,
        progress: ProgressReporter,
    ) -> Result<Arc<dyn Summarizer>, ProviderError> {
        self.client
            .prepare(&self.capability.model, capability, &progress)
            .await?;
        Ok(Arc::new(RemoteSummarizer {
            client: Arc::clone(&self.client),
            model: self.capability.model.clone(),
            options: options.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Backend, ProviderConfig};
    use crate::provider::{progress_channel, DownloadProgress, NO_SUMMARY};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn summarizer_replying(server: &MockServer, content: &str) -> Arc<dyn Summarizer> {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "content": content } }]
            })))
            .mount(server)
            .await;

        let config = ProviderConfig {
            backend: Backend::OpenAiCompatible,
            base_url: server.uri(),
            ..ProviderConfig::default()
        };
        let factory = RemoteSummarizerFactory::new(
            Arc::new(ApiClient::from_config(&config)),
            config.summarizer.clone(),
        );
        let (reporter, _rx) = progress_channel();
        factory
            .create(&SummarizerOptions::default(), Capability::Available, reporter)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn plain_reply_is_the_summary() {
        let server = MockServer::start().await;
        let summarizer = summarizer_replying(&server, "- point one\n- point two").await;

        let summary = summarizer.summarize("long text").await.unwrap().into_text();
        assert_eq!(summary, "- point one\n- point two");
    }

    #[tokio::test]
    async fn object_reply_is_normalised() {
        let server = MockServer::start().await;
        let summarizer = summarizer_replying(&server, r#"{"summary":"from object"}"#).await;

        let summary = summarizer.summarize("long text").await.unwrap().into_text();
        assert_eq!(summary, "from object");
    }

    #[tokio::test]
    async fn empty_chunk_list_uses_placeholder() {
        let server = MockServer::start().await;
        let summarizer = summarizer_replying(&server, "[]").await;

        let summary = summarizer.summarize("long text").await.unwrap().into_text();
        assert_eq!(summary, NO_SUMMARY);
    }

    #[tokio::test]
    async fn downloadable_model_is_pulled_before_use() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/pull"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "{\"completed\":5,\"total\":5}\n{\"status\":\"success\"}\n",
                "application/x-ndjson",
            ))
            .expect(1)
            .mount(&server)
            .await;
        let config = ProviderConfig {
            base_url: server.uri(),
            ..ProviderConfig::default()
        };
        let factory = RemoteSummarizerFactory::new(
            Arc::new(ApiClient::from_config(&config)),
            config.summarizer.clone(),
        );
        let (reporter, mut rx) = progress_channel();

        factory
            .create(&SummarizerOptions::default(), Capability::Downloadable, reporter)
            .await
            .unwrap();

        assert_eq!(rx.try_recv().unwrap(), DownloadProgress { loaded: 5, total: 5 });
    }
}
