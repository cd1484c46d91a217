use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use scan_logging::{scan_debug, scan_info, scan_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::client::{ClientSettings, ReqwestScanClient, ScanService};
use crate::preview::load_preview;
use crate::{AnalysisPayload, ClientError, EngineEvent, ImageUpload, ReportPayload};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("client setup failed: {0}")]
    Client(#[from] ClientError),
    #[error("runtime setup failed: {0}")]
    Runtime(#[from] io::Error),
}

enum EngineCommand {
    LoadPreview { path: PathBuf },
    Analyze { generation: u64, path: PathBuf },
    CancelAnalysis { generation: u64 },
    Report { request_id: u64, payload: ReportPayload },
}

type InFlight = Arc<Mutex<HashMap<u64, CancellationToken>>>;

/// Owns a tokio runtime on a background thread. Commands go in through
/// the handle; results come back as [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let service = Arc::new(ReqwestScanClient::new(settings)?);
        Self::with_service(service)
    }

    pub fn with_service(service: Arc<dyn ScanService>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            let in_flight: InFlight = Arc::new(Mutex::new(HashMap::new()));
            while let Ok(command) = cmd_rx.recv() {
                handle_command(&runtime, &service, &in_flight, command, &event_tx);
            }
            scan_debug!("Engine command channel closed; shutting down");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn load_preview(&self, path: impl Into<PathBuf>) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::LoadPreview { path: path.into() });
    }

    pub fn analyze(&self, generation: u64, path: impl Into<PathBuf>) {
        let _ = self.cmd_tx.send(EngineCommand::Analyze {
            generation,
            path: path.into(),
        });
    }

    /// Abandons the analysis for `generation`. Its result is never delivered.
    pub fn cancel_analysis(&self, generation: u64) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::CancelAnalysis { generation });
    }

    pub fn request_report(&self, request_id: u64, payload: ReportPayload) {
        let _ = self.cmd_tx.send(EngineCommand::Report {
            request_id,
            payload,
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    service: &Arc<dyn ScanService>,
    in_flight: &InFlight,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::LoadPreview { path } => {
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                match load_preview(&path).await {
                    Ok(data_uri) => {
                        let _ = event_tx.send(EngineEvent::PreviewReady { path, data_uri });
                    }
                    // Preview is a convenience; a read failure leaves the old one in place.
                    Err(err) => scan_warn!("Preview of {:?} failed: {}", path, err),
                }
            });
        }
        EngineCommand::Analyze { generation, path } => {
            let token = CancellationToken::new();
            if let Ok(mut tokens) = in_flight.lock() {
                tokens.insert(generation, token.clone());
            }
            let service = Arc::clone(service);
            let in_flight = Arc::clone(in_flight);
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                tokio::select! {
                    _ = token.cancelled() => {
                        scan_info!("Analysis generation {} cancelled", generation);
                    }
                    result = analyze_file(service.as_ref(), &path) => {
                        let _ = event_tx.send(EngineEvent::AnalysisCompleted { generation, result });
                    }
                }
                if let Ok(mut tokens) = in_flight.lock() {
                    tokens.remove(&generation);
                }
            });
        }
        EngineCommand::CancelAnalysis { generation } => {
            let token = in_flight
                .lock()
                .ok()
                .and_then(|mut tokens| tokens.remove(&generation));
            match token {
                Some(token) => token.cancel(),
                None => scan_debug!("No in-flight analysis for generation {}", generation),
            }
        }
        EngineCommand::Report {
            request_id,
            payload,
        } => {
            let service = Arc::clone(service);
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = service.generate_report(&payload).await;
                let _ = event_tx.send(EngineEvent::ReportCompleted { request_id, result });
            });
        }
    }
}

async fn analyze_file(
    service: &dyn ScanService,
    path: &Path,
) -> Result<AnalysisPayload, ClientError> {
    let upload = ImageUpload::from_path(path).await?;
    service.analyze(upload).await
}
