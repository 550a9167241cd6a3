//! Registry of available backends.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::config::FfToolConfig;
use super::traits::Transcoder;
use super::types::TranscoderKind;

/// Maps each available backend identifier to its implementation.
///
/// Identifiers that are not compiled in are simply absent. Iteration
/// follows [`TranscoderKind`] declaration order.
#[derive(Clone, Default)]
pub struct TranscoderRegistry {
    backends: BTreeMap<TranscoderKind, Arc<dyn Transcoder>>,
}

impl TranscoderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every backend enabled by cargo features.
    #[cfg_attr(not(feature = "fftool"), allow(unused_variables))]
    pub fn builtin(fftool: &FfToolConfig) -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "fftool")]
        registry.register(Arc::new(super::FfToolTranscoder::new(fftool.clone())));

        registry
    }

    /// Adds a backend under its own kind.
    ///
    /// Returns the backend previously registered for that kind, if any.
    pub fn register(&mut self, transcoder: Arc<dyn Transcoder>) -> Option<Arc<dyn Transcoder>> {
        let kind = transcoder.kind();
        tracing::debug!(%kind, "Registering transcoder backend");
        self.backends.insert(kind, transcoder)
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, transcoder: Arc<dyn Transcoder>) -> Self {
        self.register(transcoder);
        self
    }

    /// Looks up a backend.
    pub fn get(&self, kind: TranscoderKind) -> Option<Arc<dyn Transcoder>> {
        self.backends.get(&kind).cloned()
    }

    /// Whether a backend is available for `kind`.
    pub fn contains(&self, kind: TranscoderKind) -> bool {
        self.backends.contains_key(&kind)
    }

    /// Available identifiers, in default-selection order.
    pub fn kinds(&self) -> Vec<TranscoderKind> {
        self.backends.keys().copied().collect()
    }

    /// Iterates over the registered backends in default-selection order.
    pub fn iter(&self) -> impl Iterator<Item = (TranscoderKind, &Arc<dyn Transcoder>)> {
        self.backends.iter().map(|(kind, backend)| (*kind, backend))
    }

    /// Number of registered backends.
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// Whether no backend is registered.
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

impl fmt::Debug for TranscoderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscoderRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
