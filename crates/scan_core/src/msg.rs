use std::path::PathBuf;

use crate::{AnalysisResult, Generation, ReportRequestId, SelectedImage, WorkflowError};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User changed the file input. `None` means nothing was picked.
    FileSelected(Option<SelectedImage>),
    /// Local preview for `path` is ready.
    PreviewLoaded { path: PathBuf, data_uri: String },
    /// User submitted the selected image for analysis.
    AnalyzeClicked,
    /// Engine settled the analyze request issued for `generation`.
    AnalysisSettled {
        generation: Generation,
        result: Result<AnalysisResult, WorkflowError>,
    },
    /// User asked for a report on the last result.
    ReportClicked,
    /// Engine settled a report request.
    ReportSettled {
        request_id: ReportRequestId,
        result: Result<Vec<u8>, WorkflowError>,
    },
    /// The report file was written.
    ReportSaved {
        request_id: ReportRequestId,
        path: PathBuf,
    },
    /// Writing the report file failed.
    ReportSaveFailed {
        request_id: ReportRequestId,
        message: String,
    },
    /// User closed the notification.
    DismissNotification,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
