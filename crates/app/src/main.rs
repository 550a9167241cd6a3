mod console;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use rustop::opts;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use openconverter_core::{
    load_config, validate_config, Config, ConfigError, ConversionEngine, EventLoop, FfprobeProbe,
    MetadataExtractor, ParameterStore, ProgressObserver, QuickInfoDisplay, TranscoderRegistry,
    TranscoderSelector,
};

use console::ConsoleObserver;

/// Config file used when neither `--config` nor `OPENCONVERTER_CONFIG` is set.
const DEFAULT_CONFIG: &str = "openconverter.toml";

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let (args, _rest) = opts! {
        synopsis "Convert media files with a selectable transcoder backend";
        opt config:Option<String>, desc:"Configuration file (default: $OPENCONVERTER_CONFIG or openconverter.toml)";
        opt transcoder:Option<String>, short:'t', desc:"Transcoder backend [FFMPEG, FFTOOL, BMF]";
        opt info:bool=false, short:'i', desc:"Print stream information and exit.";
        opt video_codec:Option<String>, desc:"Video encoder (e.g. libx264).";
        opt audio_codec:Option<String>, desc:"Audio encoder (e.g. aac).";
        opt video_bitrate:Option<i64>, desc:"Video bitrate in bits per second.";
        opt audio_bitrate:Option<i64>, desc:"Audio bitrate in bits per second.";
        opt width:Option<u32>, desc:"Output width in pixels.";
        opt height:Option<u32>, desc:"Output height in pixels.";
        opt frame_rate:Option<f64>, desc:"Output frame rate.";
        opt sample_rate:Option<u32>, desc:"Output sample rate in Hz.";
        opt pixel_format:Option<String>, desc:"Output pixel format (e.g. yuv420p).";
        opt qscale:Option<u8>, desc:"Fixed video quality scale.";
        param input:String, desc:"Input media file";
        param output:Option<String>, desc:"Output file (default: <input>-oc-output.<ext>)";
    }
    .parse_or_exit();

    info!(version = VERSION, "Starting openconverter");
    let mut config = resolve_config(args.config.as_deref())?;

    // Command line knobs win over the [encode] section
    let encode = &mut config.encode;
    overlay(&mut encode.video_codec, args.video_codec);
    overlay(&mut encode.audio_codec, args.audio_codec);
    overlay(&mut encode.video_bit_rate, args.video_bitrate);
    overlay(&mut encode.audio_bit_rate, args.audio_bitrate);
    overlay(&mut encode.width, args.width);
    overlay(&mut encode.height, args.height);
    overlay(&mut encode.frame_rate, args.frame_rate);
    overlay(&mut encode.sample_rate, args.sample_rate);
    overlay(&mut encode.pixel_format, args.pixel_format);
    overlay(&mut encode.qscale, args.qscale);
    validate_config(&config).context("Configuration validation failed")?;

    let input = PathBuf::from(&args.input);

    if args.info {
        let probe = Arc::new(FfprobeProbe::new(config.probe.ffprobe_path.clone()));
        let extractor = MetadataExtractor::new(probe);
        extractor.send_info(&input).await;
        return Ok(match extractor.quick_info() {
            Some(info) => {
                print!("{}", QuickInfoDisplay::from(info.as_ref()));
                ExitCode::SUCCESS
            }
            None => {
                eprintln!("Unable to read stream information from {}", input.display());
                ExitCode::FAILURE
            }
        });
    }

    let registry = TranscoderRegistry::builtin(&config.fftool);
    let selector = Arc::new(
        TranscoderSelector::new(registry).context("Failed to create transcoder selector")?,
    );
    if let Some(name) = args.transcoder.or(config.transcoder.default.clone()) {
        // Invalid names are logged by the selector; the current backend stays active
        let _ = selector.select(&name);
    }

    let active = selector.active_transcoder();
    if let Err(e) = active.validate().await {
        warn!(transcoder = active.name(), error = %e, "Transcoder backend is not usable");
    }

    let store = Arc::new(ParameterStore::new(config.encode.clone()));
    let mut ui = EventLoop::new("ui");

    let console = Arc::new(ConsoleObserver::new());
    let observer: Arc<dyn ProgressObserver> = console.clone();
    store.process().add_observer(observer, &ui.handle());

    let engine = ConversionEngine::new(Arc::clone(&selector), Arc::clone(&store), ui.handle());

    let mut output = args.output.map(PathBuf::from).unwrap_or_default();
    let handle = engine
        .convert(&input, &mut output)
        .with_context(|| format!("Cannot convert {}", input.display()))?;

    info!(
        job_id = handle.job_id(),
        transcoder = %handle.transcoder(),
        output = %output.display(),
        "Conversion started"
    );

    let outcome = handle.wait_on(&mut ui).await;
    console.finish();
    println!("{}", outcome);

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Loads the configuration file, falling back to built-in defaults when the
/// implicit default file does not exist.
fn resolve_config(explicit: Option<&str>) -> Result<Config> {
    let (path, implicit) = match explicit {
        Some(path) => (PathBuf::from(path), false),
        None => match std::env::var("OPENCONVERTER_CONFIG") {
            Ok(path) => (PathBuf::from(path), false),
            Err(_) => (PathBuf::from(DEFAULT_CONFIG), true),
        },
    };

    match load_config(&path) {
        Ok(config) => {
            info!("Configuration loaded from {:?}", path);
            Ok(config)
        }
        Err(ConfigError::FileNotFound(_)) if implicit => {
            info!("No configuration file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load config from {:?}", path)),
    }
}

fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}
