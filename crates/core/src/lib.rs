pub mod config;
pub mod context;
pub mod engine;
pub mod format;
pub mod info;
pub mod params;
pub mod testing;
pub mod transcoder;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ProbeConfig,
    TranscoderConfig,
};
pub use context::{ContextHandle, EventLoop};
pub use engine::{derive_output_path, ConversionEngine, ConversionOutcome, ConvertError, JobHandle};
pub use info::{FfprobeProbe, MediaProbe, MetadataExtractor, ProbeError, QuickInfo, QuickInfoDisplay};
pub use params::{EncodeParameter, JobStatus, ParameterStore, ProcessParameter, ProgressObserver};
pub use transcoder::{
    FfToolConfig, SelectError, Transcoder, TranscoderError, TranscoderKind, TranscoderRegistry,
    TranscoderSelector,
};
