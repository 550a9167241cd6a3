//! Metadata extraction with a cached snapshot.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::probe::MediaProbe;
use super::types::QuickInfo;

/// Runs a [`MediaProbe`] and keeps the most recent result.
///
/// Each extraction replaces the snapshot wholesale. A failed extraction
/// clears it, so readers never see stale data from a previous file. When
/// extractions overlap, the most recently started one wins regardless of
/// which probe finishes last.
pub struct MetadataExtractor {
    probe: Arc<dyn MediaProbe>,
    requests: AtomicU64,
    quick_info: RwLock<Stored>,
}

#[derive(Default)]
struct Stored {
    generation: u64,
    info: Option<Arc<QuickInfo>>,
}

impl MetadataExtractor {
    pub fn new(probe: Arc<dyn MediaProbe>) -> Self {
        Self {
            probe,
            requests: AtomicU64::new(0),
            quick_info: RwLock::new(Stored::default()),
        }
    }

    /// Probes `path` and stores the result.
    ///
    /// Failures are logged and leave no snapshot; they are never returned.
    pub async fn send_info(&self, path: &Path) {
        let generation = self.requests.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.probe.probe(path).await;
        let snapshot = match result {
            Ok(info) => {
                tracing::debug!(
                    path = %path.display(),
                    probe = self.probe.name(),
                    has_video = info.has_video(),
                    has_audio = info.has_audio(),
                    "Extracted media info"
                );
                Some(Arc::new(info))
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), probe = self.probe.name(), error = %e, "Failed to extract media info");
                None
            }
        };

        let mut stored = self
            .quick_info
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if generation < stored.generation {
            tracing::debug!(path = %path.display(), "Discarding result of superseded extraction");
            return;
        }
        *stored = Stored {
            generation,
            info: snapshot,
        };
    }

    /// The most recent snapshot, if the last extraction succeeded.
    pub fn quick_info(&self) -> Option<Arc<QuickInfo>> {
        self.quick_info
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .info
            .clone()
    }
}
