//! HTTP client shared by the remote capability providers.
//!
//! [`ApiClient`] talks to either a local Ollama server or any
//! OpenAI-compatible REST API.  All connection details come from
//! [`ProviderConfig`]; nothing is hardcoded.
//!
//! * Probing asks the backend which models it serves (`/api/tags` or
//!   `/v1/models`).
//! * Pulling streams Ollama's `/api/pull` NDJSON progress lines.
//! * Verbs go through `/v1/chat/completions`.

use std::time::Duration;

use serde::Deserialize;

use crate::config::{Backend, CapabilityConfig, ProviderConfig};
use crate::provider::{Capability, ProgressReporter, ProviderError};
use crate::remote::prompt::ChatPrompt;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct OllamaTags {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiModels {
    #[serde(default)]
    data: Vec<OpenAiModel>,
}

#[derive(Debug, Deserialize)]
struct OpenAiModel {
    id: String,
}

/// One NDJSON line of an Ollama pull.
#[derive(Debug, Default, Deserialize)]
struct PullStatus {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    completed: Option<u64>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

/// Ollama lists untagged models with an implicit `:latest`.
fn same_model(listed: &str, wanted: &str) -> bool {
    listed == wanted || (!wanted.contains(':') && listed == format!("{wanted}:latest"))
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

pub struct ApiClient {
    http: reqwest::Client,
    backend: Backend,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    auto_download: bool,
}

impl ApiClient {
    /// Build a client from provider config.
    ///
    /// `timeout_secs` bounds probes and verb calls; model pulls run
    /// unbounded.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            backend: config.backend,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout,
            auto_download: config.auto_download,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach `Authorization: Bearer ...` only for a non-empty key.
    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => req.bearer_auth(key),
            _ => req,
        }
    }

    // -----------------------------------------------------------------------
    // Probe
    // -----------------------------------------------------------------------

    /// Whether `capability`'s model can be used.
    pub async fn probe_model(
        &self,
        capability: &CapabilityConfig,
    ) -> Result<Capability, ProviderError> {
        if !capability.enabled {
            return Ok(Capability::Unavailable);
        }

        match self.backend {
            Backend::Disabled => Ok(Capability::Unavailable),
            Backend::Ollama => {
                let req = self.http.get(self.url("/api/tags")).timeout(self.timeout);
                let tags: OllamaTags = self
                    .authorize(req)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await
                    .map_err(|e| ProviderError::Parse(e.to_string()))?;

                if tags.models.iter().any(|m| same_model(&m.name, &capability.model)) {
                    Ok(Capability::Available)
                } else if self.auto_download {
                    Ok(Capability::Downloadable)
                } else {
                    Ok(Capability::Unavailable)
                }
            }
            Backend::OpenAiCompatible => {
                let req = self.http.get(self.url("/v1/models")).timeout(self.timeout);
                let models: OpenAiModels = self
                    .authorize(req)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await
                    .map_err(|e| ProviderError::Parse(e.to_string()))?;

                if models.data.iter().any(|m| m.id == capability.model) {
                    Ok(Capability::Available)
                } else {
                    Ok(Capability::Unavailable)
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Pull
    // -----------------------------------------------------------------------

    /// Make `model` usable, pulling it first when the probe said so.
    pub async fn prepare(
        &self,
        model: &str,
        capability: Capability,
        progress: &ProgressReporter,
    ) -> Result<(), ProviderError> {
        match capability {
            Capability::Available => Ok(()),
            Capability::Downloadable => self.pull_model(model, progress).await,
            Capability::Unavailable => Err(ProviderError::Unavailable),
        }
    }

    /// Stream an Ollama pull, reporting byte progress.  Resolves once the
    /// server reports `success`.
    pub async fn pull_model(
        &self,
        model: &str,
        progress: &ProgressReporter,
    ) -> Result<(), ProviderError> {
        log::info!("provider: pulling model {model}");
        let body = serde_json::json!({ "model": model, "stream": true });
        let req = self.http.post(self.url("/api/pull")).json(&body);
        let mut response = self
            .authorize(req)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ProviderError::Download(e.to_string()))?;

        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            buf.extend_from_slice(&chunk);
            while let Some(pos) = buf.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buf.drain(..=pos).collect();
                if Self::pull_line(&line, progress)? {
                    return Ok(());
                }
            }
        }
        if Self::pull_line(&buf, progress)? {
            return Ok(());
        }

        Err(ProviderError::Download(format!(
            "pull of {model} ended without success"
        )))
    }

    /// Handle one NDJSON line.  Returns `Ok(true)` on the success line.
    fn pull_line(line: &[u8], progress: &ProgressReporter) -> Result<bool, ProviderError> {
        let line = String::from_utf8_lossy(line);
        let line = line.trim();
        if line.is_empty() {
            return Ok(false);
        }

        let status: PullStatus =
            serde_json::from_str(line).map_err(|e| ProviderError::Parse(e.to_string()))?;

        if let Some(error) = status.error {
            return Err(ProviderError::Download(error));
        }
        if let (Some(completed), Some(total)) = (status.completed, status.total) {
            progress.report(completed, total);
        }
        Ok(status.status.as_deref() == Some("success"))
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    /// Send one system + user exchange and return the trimmed reply.
    pub async fn chat(&self, model: &str, prompt: &ChatPrompt) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "model":       model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user",   "content": prompt.user   }
            ],
            "stream":      false,
            "temperature": 0.2
        });

        let req = self
            .http
            .post(self.url("/v1/chat/completions"))
            .timeout(self.timeout)
            .json(&body);

        let json: serde_json::Value = self
            .authorize(req)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ProviderError::EmptyResponse)?
            .trim()
            .to_string();

        if content.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
