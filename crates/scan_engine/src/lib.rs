//! Scan engine: HTTP client, local file access and effect execution.
mod client;
mod engine;
mod gate;
mod persist;
mod preview;
mod types;

pub use client::{ClientSettings, ReqwestScanClient, ScanService, ANALYZE_PATH, REPORT_PATH};
pub use engine::{EngineError, EngineHandle};
pub use gate::{check_content_type, parse_analysis_body, parse_analysis_response};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use preview::{data_uri, load_preview, mime_from_path};
pub use types::{
    AnalysisPayload, ClientError, EngineEvent, FailureKind, ImageUpload, ProcessedStage,
    ReportPayload,
};
