//! Two-phase provider lifecycle: probe, then create.
//!
//! [`ProviderFactory`] is the contract a capability provider fulfils.
//! [`ProviderSlot`] wraps one factory in a small state machine:
//!
//! ```text
//! Unprobed ──probe: Unavailable──────────────▶ config added to the unavailable set (sticky)
//!          ──probe: Available/Downloadable──▶ create ──▶ Ready(config, handle)
//! Ready(c) ──ensure_ready(c')  c' != c ─────▶ probe c' unless already unavailable
//! ```
//!
//! The slot's async mutex is held across probe and create, so concurrent
//! [`ensure_ready`](ProviderSlot::ensure_ready) callers collapse into one
//! creation: the second caller waits, then finds the slot ready.  Probe and
//! create *errors* leave the slot as it was, so a later call retries.
//!
//! Probe and create run on their own task; a panic inside a factory comes
//! back as [`ProviderError::Aborted`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinError;

use crate::provider::capability::{
    progress_channel, Capability, DownloadProgress, ProgressReporter, ProgressSink,
    ProgressUpdate, ProviderKind,
};
use crate::provider::handles::ProviderError;

// ---------------------------------------------------------------------------
// ProviderFactory
// ---------------------------------------------------------------------------

/// A capability provider: probed for availability, then asked to create a
/// handle for a given configuration.
#[async_trait]
pub trait ProviderFactory: Send + Sync {
    /// Handle produced by `create` (usually a `dyn` capability trait).
    type Handle: ?Sized + Send + Sync;
    /// Creation config.  A live handle is reused while the config is equal.
    type Config: Clone + PartialEq + fmt::Debug + Send + Sync;

    fn kind(&self) -> ProviderKind;

    /// Query whether a handle for `config` can be created.
    async fn probe(&self, config: &Self::Config) -> Result<Capability, ProviderError>;

    /// Create a handle.  When `capability` is [`Capability::Downloadable`]
    /// the factory reports progress through `progress` and must not resolve
    /// until the handle is usable.
    async fn create(
        &self,
        config: &Self::Config,
        capability: Capability,
        progress: ProgressReporter,
    ) -> Result<Arc<Self::Handle>, ProviderError>;
}

// ---------------------------------------------------------------------------
// SlotStatus
// ---------------------------------------------------------------------------

/// Externally visible state of a [`ProviderSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Unprobed,
    Unavailable,
    Ready,
}

struct SlotState<H: ?Sized, C> {
    ready: Option<(C, Arc<H>)>,
    unavailable: Vec<C>,
}

// ---------------------------------------------------------------------------
// ProviderSlot
// ---------------------------------------------------------------------------

/// Lazily created, session-scoped provider handle.
pub struct ProviderSlot<H, C>
where
    H: ?Sized + Send + Sync + 'static,
    C: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
{
    factory: Arc<dyn ProviderFactory<Handle = H, Config = C>>,
    state: Mutex<SlotState<H, C>>,
    sink: Option<ProgressSink>,
}

impl<H, C> ProviderSlot<H, C>
where
    H: ?Sized + Send + Sync + 'static,
    C: Clone + PartialEq + fmt::Debug + Send + Sync + 'static,
{
    pub fn new(factory: Arc<dyn ProviderFactory<Handle = H, Config = C>>) -> Self {
        Self {
            factory,
            state: Mutex::new(SlotState {
                ready: None,
                unavailable: Vec::new(),
            }),
            sink: None,
        }
    }

    /// Forward every consumed progress event to `sink`.
    pub fn with_progress_sink(mut self, sink: ProgressSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// `Ready` while any handle is live, else `Unavailable` once some config
    /// probed unavailable.
    pub async fn status(&self) -> SlotStatus {
        let state = self.state.lock().await;
        if state.ready.is_some() {
            SlotStatus::Ready
        } else if !state.unavailable.is_empty() {
            SlotStatus::Unavailable
        } else {
            SlotStatus::Unprobed
        }
    }

    /// Return a usable handle for `config`, probing and creating on first use.
    ///
    /// `Ok(None)` means the provider reported the capability unavailable for
    /// this config; callers skip the stage.
    pub async fn ensure_ready(&self, config: &C) -> Result<Option<Arc<H>>, ProviderError> {
        let kind = self.factory.kind();
        let mut state = self.state.lock().await;

        if let Some((c, handle)) = &state.ready {
            if c == config {
                return Ok(Some(Arc::clone(handle)));
            }
        }
        if state.unavailable.contains(config) {
            return Ok(None);
        }

        let capability = {
            let factory = Arc::clone(&self.factory);
            let config = config.clone();
            joined(tokio::spawn(async move { factory.probe(&config).await }).await)?
        };
        log::debug!("provider[{kind}]: probe {config:?} -> {capability:?}");

        if !capability.is_usable() {
            log::info!("provider[{kind}]: unavailable for {config:?}; stage will be skipped");
            state.unavailable.push(config.clone());
            return Ok(None);
        }

        let (reporter, mut progress_rx) = progress_channel();
        let mut create = {
            let factory = Arc::clone(&self.factory);
            let config = config.clone();
            tokio::spawn(async move { factory.create(&config, capability, reporter).await })
        };

        let created = loop {
            tokio::select! {
                result = &mut create => break result,
                Some(progress) = progress_rx.recv() => self.report(kind, progress),
            }
        };
        while let Ok(progress) = progress_rx.try_recv() {
            self.report(kind, progress);
        }

        let handle = joined(created)?;
        log::info!("provider[{kind}]: ready for {config:?}");
        state.ready = Some((config.clone(), Arc::clone(&handle)));
        Ok(Some(handle))
    }

    fn report(&self, kind: ProviderKind, progress: DownloadProgress) {
        log::info!(
            "provider[{kind}]: Downloaded {} of {} bytes.",
            progress.loaded,
            progress.total
        );
        if let Some(sink) = &self.sink {
            sink(ProgressUpdate { kind, progress });
        }
    }
}

/// Flatten a factory task's join result; a panicked task becomes
/// [`ProviderError::Aborted`].
fn joined<T>(task: Result<Result<T, ProviderError>, JoinError>) -> Result<T, ProviderError> {
    match task {
        Ok(result) => result,
        Err(e) => {
            log::error!("provider: factory task failed: {e}");
            Err(ProviderError::Aborted(e.to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
