//! Mock media probe for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::info::{MediaProbe, ProbeError, QuickInfo};

type FailureFn = Box<dyn Fn(&Path) -> ProbeError + Send + Sync>;

/// Mock implementation of the MediaProbe trait.
///
/// Returns [`fixtures::quick_info`](super::fixtures::quick_info) unless
/// configured otherwise, and records every probed path.
pub struct MockProbe {
    info: Mutex<QuickInfo>,
    failure: Mutex<Option<FailureFn>>,
    probed: Mutex<Vec<PathBuf>>,
}

impl Default for MockProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProbe {
    pub fn new() -> Self {
        Self {
            info: Mutex::new(super::fixtures::quick_info()),
            failure: Mutex::new(None),
            probed: Mutex::new(Vec::new()),
        }
    }

    /// Returns `info` from later probes and clears any configured failure.
    pub fn set_info(&self, info: QuickInfo) {
        *self.info.lock().unwrap() = info;
        *self.failure.lock().unwrap() = None;
    }

    /// Makes later probes fail with the error built by `make_error`.
    pub fn fail_with<F>(&self, make_error: F)
    where
        F: Fn(&Path) -> ProbeError + Send + Sync + 'static,
    {
        *self.failure.lock().unwrap() = Some(Box::new(make_error));
    }

    /// Paths probed so far.
    pub fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaProbe for MockProbe {
    fn name(&self) -> &str {
        "mock"
    }

    async fn probe(&self, path: &Path) -> Result<QuickInfo, ProbeError> {
        self.probed.lock().unwrap().push(path.to_path_buf());

        if let Some(make_error) = self.failure.lock().unwrap().as_ref() {
            return Err(make_error(path));
        }
        Ok(self.info.lock().unwrap().clone())
    }
}
