//! Parameter store: encode settings and live process state.
//!
//! The UI owns writes to [`EncodeParameter`]; the conversion engine takes a
//! snapshot at job start and never reads it again for that job. The engine
//! and the running backend own writes to [`ProcessParameter`], which the UI
//! follows through the [`ProgressObserver`] protocol instead of polling.

mod encode;
mod observer;
mod process;

pub use encode::EncodeParameter;
pub use observer::ProgressObserver;
pub use process::{JobStatus, ProcessParameter, ProcessSnapshot};

use std::sync::{Arc, PoisonError, RwLock};

/// Shared holder for both parameter sets.
pub struct ParameterStore {
    encode: RwLock<EncodeParameter>,
    process: Arc<ProcessParameter>,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(EncodeParameter::default())
    }
}

impl ParameterStore {
    /// Creates a store with the given initial encode settings.
    pub fn new(encode: EncodeParameter) -> Self {
        Self {
            encode: RwLock::new(encode),
            process: Arc::new(ProcessParameter::new()),
        }
    }

    /// Returns a copy of the current encode settings.
    pub fn encode(&self) -> EncodeParameter {
        self.snapshot()
    }

    /// Returns an immutable copy of the current encode settings.
    pub fn snapshot(&self) -> EncodeParameter {
        self.encode
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the encode settings wholesale.
    pub fn set_encode(&self, encode: EncodeParameter) {
        *self.encode.write().unwrap_or_else(PoisonError::into_inner) = encode;
    }

    /// Edits the encode settings in place.
    pub fn update_encode<F>(&self, edit: F)
    where
        F: FnOnce(&mut EncodeParameter),
    {
        let mut encode = self.encode.write().unwrap_or_else(PoisonError::into_inner);
        edit(&mut encode);
    }

    /// The shared process parameter.
    pub fn process(&self) -> &Arc<ProcessParameter> {
        &self.process
    }
}
