use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::preview::mime_from_path;

/// Multipart payload for the analyze endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub async fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| ClientError::new(FailureKind::Io, format!("{}: {err}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self {
            file_name,
            mime: mime_from_path(path).to_string(),
            bytes,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedStage {
    pub stage: String,
    pub image_ref: String,
}

/// A fully validated analyze response.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPayload {
    pub processed_images: Vec<ProcessedStage>,
    pub cancer_type: String,
    pub cancer_stage: String,
    pub confidence: f64,
}

/// JSON body for the report endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPayload {
    pub cancer_type: String,
    pub cancer_stage: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PreviewReady {
        path: PathBuf,
        data_uri: String,
    },
    AnalysisCompleted {
        generation: u64,
        result: Result<AnalysisPayload, ClientError>,
    },
    ReportCompleted {
        request_id: u64,
        result: Result<Vec<u8>, ClientError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    /// Response was not JSON, or the JSON was not an object.
    UnexpectedFormat,
    /// Server reported failure through status or an `error` field.
    Server { status: u16, message: Option<String> },
    MalformedResult,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Io,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::UnexpectedFormat => write!(f, "unexpected response format"),
            FailureKind::Server { status, .. } => write!(f, "server error (status {status})"),
            FailureKind::MalformedResult => write!(f, "malformed result"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Io => write!(f, "io error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
