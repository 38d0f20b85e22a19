//! Chat prompts for the three remote capabilities.
//!
//! Every verb is one `(system, user)` exchange against an OpenAI-compatible
//! `/v1/chat/completions` endpoint.  The system message pins the output
//! format so replies can be parsed without guessing.

use crate::config::{SummarizerOptions, SummaryFormat, SummaryKind, SummaryLength};
use crate::language::language_label;
use crate::provider::LanguagePair;

// ---------------------------------------------------------------------------
// System instructions
// ---------------------------------------------------------------------------

const DETECT_INSTRUCTION: &str = "\
You are a language identification service.
Task: Identify the language of the text the user sends.

Rules:
1. Reply with ONLY a JSON array, no explanation and no code fences.
2. Each element is {\"detectedLanguage\": \"<ISO-639-1 code>\", \"confidence\": <0.0-1.0>}.
3. List at most three candidates, most likely first.
4. Use lower-case two-letter codes (en, fr, es, pt, ru, tr, ...).";

const SUMMARIZE_INSTRUCTION: &str = "\
You are a summarization service.
Task: Summarize the text the user sends.

Rules:
1. Reply with ONLY the summary, no preamble.
2. Do not add facts that are not in the text.";

const TRANSLATE_INSTRUCTION: &str = "\
You are a translation service.
Task: Translate the text the user sends.

Rules:
1. Reply with ONLY the translated text, no explanation.
2. Preserve line breaks, numbers, names and code exactly.
3. If the text is already in the target language, return it unchanged.";

// ---------------------------------------------------------------------------
// ChatPrompt
// ---------------------------------------------------------------------------

/// A `(system, user)` message pair.
///
/// # Example
/// ```rust
/// use text_processor::provider::LanguagePair;
/// use text_processor::remote::ChatPrompt;
///
/// let prompt = ChatPrompt::translate(&LanguagePair::new("fr", "en"), "Bonjour");
/// assert!(prompt.system.contains("French"));
/// assert!(prompt.user.ends_with("Bonjour"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

impl ChatPrompt {
    pub fn detect(text: &str) -> Self {
        Self {
            system: DETECT_INSTRUCTION.to_string(),
            user: text.to_string(),
        }
    }

    /// Summary prompt shaped by `options` (kind, length, format and the
    /// shared context sentence).
    pub fn summarize(options: &SummarizerOptions, text: &str) -> Self {
        let mut system = String::with_capacity(512);
        system.push_str(SUMMARIZE_INSTRUCTION);
        system.push_str(&format!("\n3. {}", kind_instruction(options.kind, options.length)));
        system.push_str(&format!("\n4. {}", format_instruction(options.format)));

        let mut user = String::with_capacity(text.len() + 128);
        if !options.shared_context.is_empty() {
            user.push_str(&format!("Context: {}\n\n", options.shared_context));
        }
        user.push_str("Text:\n");
        user.push_str(text);

        Self { system, user }
    }

    pub fn translate(pair: &LanguagePair, text: &str) -> Self {
        let system = format!(
            "{TRANSLATE_INSTRUCTION}\n\nSource language: {} ({}).\nTarget language: {} ({}).",
            language_label(&pair.source),
            pair.source,
            language_label(&pair.target),
            pair.target,
        );
        Self {
            system,
            user: text.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn kind_instruction(kind: SummaryKind, length: SummaryLength) -> String {
    let (bullets, sentences, words) = match length {
        SummaryLength::Short => (3, 1, 12),
        SummaryLength::Medium => (5, 3, 17),
        SummaryLength::Long => (7, 5, 22),
    };
    match kind {
        SummaryKind::KeyPoints => {
            format!("Extract the {bullets} most important points as a bulleted list.")
        }
        SummaryKind::Tldr => format!("Write a TL;DR of at most {sentences} sentences."),
        SummaryKind::Teaser => format!(
            "Write a teaser of at most {sentences} sentences that makes the reader want more."
        ),
        SummaryKind::Headline => format!("Write a single headline of at most {words} words."),
    }
}

fn format_instruction(format: SummaryFormat) -> &'static str {
    match format {
        SummaryFormat::Markdown => "Format the reply as Markdown.",
        SummaryFormat::PlainText => "Reply in plain text without any Markdown.",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
