//! Conversion lifecycle integration tests.
//!
//! These tests drive the engine the way a UI does: select a backend,
//! register observers on the UI context, start a job and pump the context
//! until the result arrives.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use openconverter_core::{
    testing::{fixtures, MockTranscoder, ObservedEvent, RecordingObserver},
    ConversionEngine, ConversionOutcome, ConvertError, EventLoop, JobStatus, ParameterStore,
    ProgressObserver, SelectError, TranscoderKind, TranscoderRegistry, TranscoderSelector,
};

/// Test helper wiring an engine to mock backends and a UI context.
struct TestHarness {
    ui: EventLoop,
    ffmpeg: Arc<MockTranscoder>,
    bmf: Arc<MockTranscoder>,
    selector: Arc<TranscoderSelector>,
    store: Arc<ParameterStore>,
    engine: ConversionEngine,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_backends(
            MockTranscoder::new(TranscoderKind::Ffmpeg),
            MockTranscoder::new(TranscoderKind::Bmf),
        )
    }

    fn with_backends(ffmpeg: MockTranscoder, bmf: MockTranscoder) -> Self {
        let ui = EventLoop::new("ui");
        let ffmpeg = Arc::new(ffmpeg);
        let bmf = Arc::new(bmf);

        let registry = TranscoderRegistry::new()
            .with(ffmpeg.clone())
            .with(bmf.clone());
        let selector = Arc::new(TranscoderSelector::new(registry).expect("registry is not empty"));
        let store = Arc::new(ParameterStore::default());
        let engine = ConversionEngine::new(Arc::clone(&selector), Arc::clone(&store), ui.handle());

        Self {
            ui,
            ffmpeg,
            bmf,
            selector,
            store,
            engine,
        }
    }

    fn observe(&self) -> Arc<RecordingObserver> {
        let recorder = Arc::new(RecordingObserver::new());
        let observer: Arc<dyn ProgressObserver> = recorder.clone();
        assert!(self.store.process().add_observer(observer, &self.ui.handle()));
        recorder
    }
}

fn assert_non_decreasing(values: &[f64]) {
    for pair in values.windows(2) {
        assert!(pair[0] <= pair[1], "progress went backwards: {:?}", values);
    }
    assert!(values.iter().all(|v| (0.0..=100.0).contains(v)));
}

#[tokio::test]
async fn test_full_conversion_with_progress() {
    let mut h = TestHarness::with_backends(
        MockTranscoder::new(TranscoderKind::Ffmpeg)
            .with_progress_steps(vec![10.0, 35.0, 30.0, 80.0])
            .with_delay(Duration::from_millis(40)),
        MockTranscoder::new(TranscoderKind::Bmf),
    );
    let recorder = h.observe();

    let mut output = PathBuf::new();
    let handle = h
        .engine
        .convert(Path::new("/media/in/clip.mp4"), &mut output)
        .unwrap();
    assert_eq!(output, PathBuf::from("/media/in/clip-oc-output.mp4"));
    assert_eq!(handle.transcoder(), TranscoderKind::Ffmpeg);

    let outcome = handle.wait_on(&mut h.ui).await;
    assert_eq!(outcome, ConversionOutcome::Success);

    // Every notification was delivered before the outcome; 30 was dropped.
    let progress = recorder.progress_values();
    assert_eq!(progress, vec![10.0, 35.0, 80.0, 100.0]);
    assert_non_decreasing(&progress);
    // The mock reports four estimates; success resets the estimate to zero.
    let times = recorder.time_values();
    assert_eq!(times.len(), 5);
    assert_eq!(times.last(), Some(&0.0));
    assert_eq!(h.store.process().time_required(), 0.0);
    assert_eq!(recorder.events().last(), Some(&ObservedEvent::Progress(100.0)));

    let snapshot = h.store.process().snapshot();
    assert_eq!(snapshot.status, JobStatus::Succeeded);
    assert_eq!(snapshot.transcoder, Some(TranscoderKind::Ffmpeg));
    assert_eq!(snapshot.job_id.as_deref(), Some(h.ffmpeg.recorded_jobs()[0].job_id.as_str()));
}

#[tokio::test]
async fn test_selected_backend_receives_job() {
    let mut h = TestHarness::new();
    assert_eq!(h.selector.select("bmf"), Ok(TranscoderKind::Bmf));

    let mut output = PathBuf::from("/out/clip.mkv");
    let handle = h.engine.convert(Path::new("/in/clip.mp4"), &mut output).unwrap();
    assert!(handle.wait_on(&mut h.ui).await.is_success());

    assert_eq!(h.ffmpeg.invocation_count(), 0);
    assert_eq!(h.bmf.invocation_count(), 1);
    assert_eq!(h.store.process().transcoder(), Some(TranscoderKind::Bmf));
}

#[tokio::test]
async fn test_invalid_selection_keeps_backend() {
    let mut h = TestHarness::new();
    h.selector.select("BMF").unwrap();

    let result = h.selector.select("HANDBRAKE");
    assert_eq!(result, Err(SelectError::invalid_backend("HANDBRAKE")));
    assert_eq!(h.selector.active(), TranscoderKind::Bmf);

    let mut output = PathBuf::new();
    let handle = h.engine.convert(Path::new("/in/a.mov"), &mut output).unwrap();
    handle.wait_on(&mut h.ui).await;
    assert_eq!(h.bmf.invocation_count(), 1);
    assert_eq!(h.ffmpeg.invocation_count(), 0);
}

#[tokio::test]
async fn test_same_path_is_rejected_without_job() {
    let mut h = TestHarness::new();
    let recorder = h.observe();

    let mut output = PathBuf::from("/in/a.mp4");
    let err = h.engine.convert(Path::new("/in/a.mp4"), &mut output).unwrap_err();
    assert!(matches!(err, ConvertError::SamePath { .. }));

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(h.ui.run_pending(), 0);
    assert_eq!(h.ffmpeg.invocation_count(), 0);
    assert!(recorder.events().is_empty());
    assert_eq!(h.store.process().status(), JobStatus::Idle);
}

#[tokio::test]
async fn test_busy_engine_rejects_overlapping_request() {
    let mut h = TestHarness::with_backends(
        MockTranscoder::new(TranscoderKind::Ffmpeg).with_delay(Duration::from_millis(100)),
        MockTranscoder::new(TranscoderKind::Bmf),
    );

    let mut first = PathBuf::new();
    let handle = h.engine.convert(Path::new("/in/one.mp4"), &mut first).unwrap();

    let mut second = PathBuf::new();
    let err = h.engine.convert(Path::new("/in/two.mp4"), &mut second).unwrap_err();
    assert_eq!(err, ConvertError::Busy);
    // The rejected request still had its default output derived.
    assert_eq!(second, PathBuf::from("/in/two-oc-output.mp4"));

    assert!(handle.wait_on(&mut h.ui).await.is_success());
    assert!(!h.engine.is_busy());
    assert_eq!(h.ffmpeg.invocation_count(), 1);
}

#[tokio::test]
async fn test_duplicate_observer_notified_once() {
    let mut h = TestHarness::with_backends(
        MockTranscoder::new(TranscoderKind::Ffmpeg).with_progress_steps(vec![50.0]),
        MockTranscoder::new(TranscoderKind::Bmf),
    );
    let recorder = Arc::new(RecordingObserver::new());
    let observer: Arc<dyn ProgressObserver> = recorder.clone();
    assert!(h.store.process().add_observer(Arc::clone(&observer), &h.ui.handle()));
    assert!(!h.store.process().add_observer(observer, &h.ui.handle()));

    let mut output = PathBuf::new();
    let handle = h.engine.convert(Path::new("/in/a.mp4"), &mut output).unwrap();
    handle.wait_on(&mut h.ui).await;

    assert_eq!(recorder.progress_values(), vec![50.0, 100.0]);
}

#[tokio::test]
async fn test_failed_backend_reports_failure() {
    let mut h = TestHarness::with_backends(
        MockTranscoder::new(TranscoderKind::Ffmpeg)
            .with_progress_steps(vec![40.0])
            .with_result(false),
        MockTranscoder::new(TranscoderKind::Bmf),
    );
    let recorder = h.observe();

    let mut output = PathBuf::new();
    let handle = h.engine.convert(Path::new("/in/a.mp4"), &mut output).unwrap();
    assert_eq!(handle.wait_on(&mut h.ui).await, ConversionOutcome::Failure);

    // No forced 100% on failure
    assert_eq!(recorder.progress_values(), vec![40.0]);
    assert_eq!(h.store.process().status(), JobStatus::Failed);
}

#[tokio::test]
async fn test_job_uses_encode_snapshot() {
    let mut h = TestHarness::new();
    h.store.set_encode(fixtures::encode_720p());

    let mut output = PathBuf::new();
    let handle = h.engine.convert(Path::new("/in/a.mp4"), &mut output).unwrap();
    h.store.update_encode(|p| p.width = Some(640));
    handle.wait_on(&mut h.ui).await;

    let job = &h.ffmpeg.recorded_jobs()[0];
    assert_eq!(job.params, fixtures::encode_720p());
    assert_eq!(h.store.encode().width, Some(640));
}

#[tokio::test]
async fn test_sequential_jobs_reset_progress() {
    let mut h = TestHarness::with_backends(
        MockTranscoder::new(TranscoderKind::Ffmpeg).with_progress_steps(vec![60.0]),
        MockTranscoder::new(TranscoderKind::Bmf),
    );
    let recorder = h.observe();

    for name in ["a", "b"] {
        let mut output = PathBuf::new();
        let input = PathBuf::from(format!("/in/{}.mp4", name));
        let handle = h.engine.convert(&input, &mut output).unwrap();
        assert!(handle.wait_on(&mut h.ui).await.is_success());
    }

    // Each job starts from zero again
    assert_eq!(recorder.progress_values(), vec![60.0, 100.0, 60.0, 100.0]);
    assert_eq!(h.ffmpeg.invocation_count(), 2);
}

#[cfg(all(unix, feature = "fftool"))]
mod fftool {
    use super::*;
    use openconverter_core::transcoder::{FfToolConfig, FfToolTranscoder};
    use std::os::unix::fs::PermissionsExt;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_fftool_survives_non_utf8_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let ffprobe = write_script(
            dir.path(),
            "ffprobe",
            r#"echo '{"format": {"duration": "10.0"}}'"#,
        );
        // Latin-1 file name, then well over a pipe buffer of chatter
        let ffmpeg = write_script(
            dir.path(),
            "ffmpeg",
            r#"for last; do :; done
printf 'Input #0, from caf\351.mp4:\n' >&2
i=0
while [ $i -lt 3000 ]; do
  echo "frame=$i fps=25.0 q=28.0 size=1024kB time=00:00:01.00 bitrate=800kbits/s" >&2
  i=$((i+1))
done
echo "out_time_ms=5000000" >&2
echo "progress=continue" >&2
echo "out_time_ms=10000000" >&2
echo "progress=end" >&2
: > "$last""#,
        );

        let input = dir.path().join("clip.mp4");
        std::fs::write(&input, b"fake media").unwrap();

        let config = FfToolConfig::with_binaries(ffmpeg, ffprobe).with_timeout(30);
        let registry = TranscoderRegistry::new().with(Arc::new(FfToolTranscoder::new(config)));
        let selector = Arc::new(TranscoderSelector::new(registry).unwrap());
        let store = Arc::new(ParameterStore::default());
        let mut ui = EventLoop::new("ui");
        let engine = ConversionEngine::new(selector, Arc::clone(&store), ui.handle());

        let recorder = Arc::new(RecordingObserver::new());
        let observer: Arc<dyn ProgressObserver> = recorder.clone();
        store.process().add_observer(observer, &ui.handle());

        let started = std::time::Instant::now();
        let mut output = PathBuf::new();
        let handle = engine.convert(&input, &mut output).unwrap();
        assert_eq!(handle.wait_on(&mut ui).await, ConversionOutcome::Success);

        assert!(started.elapsed() < Duration::from_secs(20));
        assert!(output.exists());
        let progress = recorder.progress_values();
        assert_eq!(progress.first(), Some(&50.0));
        assert_eq!(progress.last(), Some(&100.0));
    }

    #[tokio::test]
    async fn test_fftool_against_fake_ffmpeg() {
        let dir = tempfile::tempdir().unwrap();
        let ffprobe = write_script(
            dir.path(),
            "ffprobe",
            r#"echo '{"format": {"duration": "10.0"}}'"#,
        );
        let ffmpeg = write_script(
            dir.path(),
            "ffmpeg",
            r#"for last; do :; done
echo "out_time_ms=2500000" >&2
echo "progress=continue" >&2
echo "out_time_ms=5000000" >&2
echo "progress=continue" >&2
echo "out_time_ms=10000000" >&2
echo "progress=end" >&2
: > "$last""#,
        );

        let input = dir.path().join("clip.mp4");
        std::fs::write(&input, b"fake media").unwrap();

        let backend = FfToolTranscoder::new(FfToolConfig::with_binaries(ffmpeg, ffprobe));
        let registry = TranscoderRegistry::new().with(Arc::new(backend));
        let selector = Arc::new(TranscoderSelector::new(registry).unwrap());
        let store = Arc::new(ParameterStore::default());
        let mut ui = EventLoop::new("ui");
        let engine = ConversionEngine::new(selector, Arc::clone(&store), ui.handle());

        let recorder = Arc::new(RecordingObserver::new());
        let observer: Arc<dyn ProgressObserver> = recorder.clone();
        store.process().add_observer(observer, &ui.handle());

        let mut output = PathBuf::new();
        let handle = engine.convert(&input, &mut output).unwrap();
        assert_eq!(handle.wait_on(&mut ui).await, ConversionOutcome::Success);

        assert!(output.exists());
        let progress = recorder.progress_values();
        assert_eq!(progress.first(), Some(&25.0));
        assert_eq!(progress.last(), Some(&100.0));
        assert_non_decreasing(&progress);
    }
}
