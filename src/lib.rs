//! Text processing session: language detection, gated summarization and
//! on-demand translation of chat messages through pluggable capability
//! providers.
//!
//! * [`config`]: settings and their TOML persistence.
//! * [`language`]: language codes and the supported-target table.
//! * [`provider`]: provider contracts and the probe/create lifecycle.
//! * [`remote`]: HTTP-backed providers (Ollama / OpenAI-compatible).
//! * [`session`]: messages, session state and derived predicates.
//! * [`pipeline`]: the session controller driving both pipelines.

pub mod config;
pub mod language;
pub mod pipeline;
pub mod provider;
pub mod remote;
pub mod session;
