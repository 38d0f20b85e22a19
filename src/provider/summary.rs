//! Summarizer result shapes and their normalisation to a single string.
//!
//! Summarizer backends disagree on what they return.  Three shapes are
//! recognised:
//!
//! | Shape | Example | Text taken |
//! |-------|---------|------------|
//! | bare string | `"Short summary"` | the string |
//! | list of chunks | `[{"text": "Short summary"}]` | first chunk's `text` |
//! | object | `{"summary": "Short summary"}` | the `summary` field |
//!
//! Anything else flattens to [`NO_SUMMARY`].

use serde::Deserialize;

/// Placeholder stored when a summarizer answers with an unrecognised shape.
pub const NO_SUMMARY: &str = "no summary available";

/// One element of a list-shaped summary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummaryChunk {
    #[serde(default)]
    pub text: Option<String>,
}

/// Raw summarizer output, before normalisation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SummaryResponse {
    Text(String),
    Chunks(Vec<SummaryChunk>),
    Object { summary: String },
    Other(serde_json::Value),
}

impl SummaryResponse {
    /// Interpret a model's reply body.
    ///
    /// JSON replies that match a known shape are taken as that shape; any
    /// other reply is treated as a bare string.
    pub fn from_content(content: &str) -> Self {
        match serde_json::from_str::<SummaryResponse>(content) {
            Ok(SummaryResponse::Other(_)) | Err(_) => SummaryResponse::Text(content.trim().to_string()),
            Ok(shape) => shape,
        }
    }

    /// Flatten to the text stored on the message.
    pub fn into_text(self) -> String {
        match self {
            SummaryResponse::Text(text) => text,
            SummaryResponse::Chunks(chunks) => chunks
                .into_iter()
                .next()
                .and_then(|c| c.text)
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| NO_SUMMARY.to_string()),
            SummaryResponse::Object { summary } if !summary.is_empty() => summary,
            SummaryResponse::Object { .. } | SummaryResponse::Other(_) => NO_SUMMARY.to_string(),
        }
    }
}
