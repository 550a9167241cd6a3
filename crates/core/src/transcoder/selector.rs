//! Exclusive selection of the active backend.

use std::sync::{Arc, PoisonError, RwLock};

use super::choice::ExclusiveChoice;
use super::error::SelectError;
use super::registry::TranscoderRegistry;
use super::traits::Transcoder;
use super::types::TranscoderKind;

/// Holds the single active backend out of the compiled-in registry.
///
/// Invalid selections are logged and ignored: the active backend only ever
/// changes to another available one.
pub struct TranscoderSelector {
    backends: Vec<Arc<dyn Transcoder>>,
    choice: RwLock<ExclusiveChoice<TranscoderKind>>,
}

impl TranscoderSelector {
    /// Creates a selector with the first available backend active.
    pub fn new(registry: TranscoderRegistry) -> Result<Self, SelectError> {
        let backends: Vec<Arc<dyn Transcoder>> =
            registry.iter().map(|(_, backend)| Arc::clone(backend)).collect();
        let choice = ExclusiveChoice::new(registry.kinds()).ok_or(SelectError::NoBackends)?;

        tracing::info!(
            active = %choice.selected(),
            available = ?choice.options(),
            "Transcoder selector ready"
        );

        Ok(Self {
            backends,
            choice: RwLock::new(choice),
        })
    }

    /// Selects a backend by name.
    ///
    /// Unknown or unavailable names leave the active backend unchanged; the
    /// rejection is logged and returned for information only.
    pub fn select(&self, name: &str) -> Result<TranscoderKind, SelectError> {
        match name.parse::<TranscoderKind>() {
            Ok(kind) => self.select_kind(kind),
            Err(e) => {
                tracing::warn!(name, active = %self.active(), "Error: Undefined transcoder name, keeping current backend");
                Err(e)
            }
        }
    }

    /// Selects a backend by identifier.
    pub fn select_kind(&self, kind: TranscoderKind) -> Result<TranscoderKind, SelectError> {
        let mut choice = self.choice.write().unwrap_or_else(PoisonError::into_inner);
        if choice.select(kind) {
            tracing::info!(%kind, "Current transcoder changed");
            Ok(kind)
        } else {
            tracing::warn!(%kind, active = %choice.selected(), "Transcoder not available in this build, keeping current backend");
            Err(SelectError::invalid_backend(kind.as_str()))
        }
    }

    /// The active backend identifier.
    pub fn active(&self) -> TranscoderKind {
        self.choice
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .selected()
    }

    /// The active backend implementation.
    pub fn active_transcoder(&self) -> Arc<dyn Transcoder> {
        let index = self
            .choice
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .selected_index();
        // Options and backends are built from the same registry in the same order.
        Arc::clone(&self.backends[index])
    }

    /// Identifiers that can be selected.
    pub fn available(&self) -> Vec<TranscoderKind> {
        self.choice
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .options()
            .to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTranscoder;

    fn selector(kinds: &[TranscoderKind]) -> TranscoderSelector {
        let mut registry = TranscoderRegistry::new();
        for kind in kinds {
            registry.register(Arc::new(MockTranscoder::new(*kind)));
        }
        TranscoderSelector::new(registry).unwrap()
    }

    #[test]
    fn test_empty_registry_rejected() {
        let result = TranscoderSelector::new(TranscoderRegistry::new());
        assert!(matches!(result, Err(SelectError::NoBackends)));
    }

    #[test]
    fn test_first_available_is_default() {
        let selector = selector(&[TranscoderKind::Bmf, TranscoderKind::Fftool]);
        assert_eq!(selector.active(), TranscoderKind::Fftool);
        assert_eq!(selector.active_transcoder().kind(), TranscoderKind::Fftool);
        assert_eq!(
            selector.available(),
            vec![TranscoderKind::Fftool, TranscoderKind::Bmf]
        );
    }

    #[test]
    fn test_select_switches_backend() {
        let selector = selector(&[TranscoderKind::Ffmpeg, TranscoderKind::Bmf]);
        assert_eq!(selector.select("BMF"), Ok(TranscoderKind::Bmf));
        assert_eq!(selector.active(), TranscoderKind::Bmf);
        assert_eq!(selector.active_transcoder().kind(), TranscoderKind::Bmf);

        assert_eq!(selector.select("FFMPEG"), Ok(TranscoderKind::Ffmpeg));
        assert_eq!(selector.active_transcoder().kind(), TranscoderKind::Ffmpeg);
    }

    #[test]
    fn test_unknown_name_keeps_active() {
        let selector = selector(&[TranscoderKind::Ffmpeg, TranscoderKind::Bmf]);
        selector.select("BMF").unwrap();

        let result = selector.select("QUICKTIME");
        assert_eq!(result, Err(SelectError::invalid_backend("QUICKTIME")));
        assert_eq!(selector.active(), TranscoderKind::Bmf);
    }

    #[test]
    fn test_known_but_not_compiled_in_keeps_active() {
        let selector = selector(&[TranscoderKind::Ffmpeg]);

        let result = selector.select("FFTOOL");
        assert!(matches!(result, Err(SelectError::InvalidBackend { .. })));
        assert_eq!(selector.active(), TranscoderKind::Ffmpeg);
    }
}
