use std::path::PathBuf;

use crate::{Generation, ReportRequest, ReportRequestId, SelectedImage};

/// Side effects requested by [`crate::update`]; executed by the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Read the file locally and produce a displayable preview.
    LoadPreview { path: PathBuf },
    /// Upload the image to the analyze endpoint.
    SubmitAnalysis {
        generation: Generation,
        image: SelectedImage,
    },
    /// Abandon the in-flight analysis for `generation`.
    CancelAnalysis { generation: Generation },
    /// Ask the report endpoint for a document.
    RequestReport {
        request_id: ReportRequestId,
        request: ReportRequest,
    },
    /// Offer the generated report as a file download.
    SaveReport {
        request_id: ReportRequestId,
        file_name: String,
        bytes: Vec<u8>,
    },
}

/// What a submit does while an analysis is already uploading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitPolicy {
    /// Ignore the new submit; the running request stays current.
    #[default]
    Reject,
    /// Cancel the running request and start a new one.
    Supersede,
}
