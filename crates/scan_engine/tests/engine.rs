use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use scan_engine::{
    AnalysisPayload, ClientError, EngineEvent, EngineHandle, FailureKind, ImageUpload,
    ReportPayload, ScanService,
};
use tempfile::TempDir;

/// Answers instantly, except for files named `slow*` which take a while.
#[derive(Default)]
struct FakeService {
    reports: AtomicUsize,
}

#[async_trait::async_trait]
impl ScanService for FakeService {
    async fn analyze(&self, upload: ImageUpload) -> Result<AnalysisPayload, ClientError> {
        if upload.file_name.starts_with("slow") {
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        Ok(AnalysisPayload {
            processed_images: Vec::new(),
            cancer_type: upload.file_name,
            cancer_stage: "I".to_string(),
            confidence: 0.5,
        })
    }

    async fn generate_report(&self, payload: &ReportPayload) -> Result<Vec<u8>, ClientError> {
        self.reports.fetch_add(1, Ordering::SeqCst);
        Ok(payload.cancer_type.as_bytes().to_vec())
    }
}

fn write_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"img").unwrap();
    path
}

fn collect_events(engine: &EngineHandle, wait: Duration) -> Vec<EngineEvent> {
    let deadline = Instant::now() + wait;
    let mut events = Vec::new();
    while Instant::now() < deadline {
        if let Some(event) = engine.recv_timeout(Duration::from_millis(20)) {
            events.push(event);
        }
    }
    events
}

#[test]
fn cancelled_analysis_never_reports() {
    let temp = TempDir::new().unwrap();
    let slow = write_file(temp.path(), "slow.png");
    let fast = write_file(temp.path(), "fast.png");
    let engine = EngineHandle::with_service(Arc::new(FakeService::default())).unwrap();

    engine.analyze(1, slow);
    engine.cancel_analysis(1);
    engine.analyze(2, fast);

    let generations: Vec<u64> = collect_events(&engine, Duration::from_millis(600))
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::AnalysisCompleted { generation, .. } => Some(generation),
            _ => None,
        })
        .collect();
    assert_eq!(generations, vec![2]);
}

#[test]
fn missing_image_reports_io_failure() {
    let temp = TempDir::new().unwrap();
    let engine = EngineHandle::with_service(Arc::new(FakeService::default())).unwrap();

    engine.analyze(7, temp.path().join("missing.png"));

    let event = engine
        .recv_timeout(Duration::from_secs(2))
        .expect("completion event");
    match event {
        EngineEvent::AnalysisCompleted { generation, result } => {
            assert_eq!(generation, 7);
            assert_eq!(result.unwrap_err().kind, FailureKind::Io);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn preview_ready_carries_data_uri() {
    let temp = TempDir::new().unwrap();
    let path = write_file(temp.path(), "ct.png");
    let engine = EngineHandle::with_service(Arc::new(FakeService::default())).unwrap();

    engine.load_preview(&path);

    let event = engine
        .recv_timeout(Duration::from_secs(2))
        .expect("preview event");
    assert_eq!(
        event,
        EngineEvent::PreviewReady {
            path,
            data_uri: "data:image/png;base64,aW1n".to_string(),
        }
    );
}

#[test]
fn preview_read_error_is_swallowed() {
    let temp = TempDir::new().unwrap();
    let engine = EngineHandle::with_service(Arc::new(FakeService::default())).unwrap();

    engine.load_preview(temp.path().join("missing.png"));

    assert!(collect_events(&engine, Duration::from_millis(200)).is_empty());
}

#[test]
fn each_report_request_resolves_independently() {
    let service = Arc::new(FakeService::default());
    let engine = EngineHandle::with_service(service.clone()).unwrap();
    let payload = ReportPayload {
        cancer_type: "Carcinoma".to_string(),
        cancer_stage: "II".to_string(),
        confidence: 0.87,
    };

    engine.request_report(1, payload.clone());
    engine.request_report(2, payload);

    let mut ids: Vec<u64> = collect_events(&engine, Duration::from_millis(300))
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::ReportCompleted { request_id, result } => {
                assert_eq!(result.unwrap(), b"Carcinoma".to_vec());
                Some(request_id)
            }
            _ => None,
        })
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(service.reports.load(Ordering::SeqCst), 2);
}
