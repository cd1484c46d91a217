use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::view_model::{AppViewModel, ResultView};
use crate::{Notifier, ResultStore, SubmitPolicy, WorkflowError};

/// File name offered for every downloaded report.
pub const REPORT_FILE_NAME: &str = "Health_Report.pdf";

pub type Generation = u64;
pub type ReportRequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Uploading,
    Success,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportState {
    #[default]
    Idle,
    Generating,
    Success,
    Failed,
}

/// The file the user picked. Replaced on every selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub path: PathBuf,
}

impl SelectedImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// One pipeline stage and its rendered image. `image_ref` is opaque
/// (data URI or server URL) and is handed to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    pub stage: String,
    pub image_ref: String,
}

impl ProcessedImage {
    pub fn new(stage: impl Into<String>, image_ref: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            image_ref: image_ref.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Server order is rendering order.
    pub processed_images: Vec<ProcessedImage>,
    pub cancer_type: String,
    pub cancer_stage: String,
    pub confidence: f64,
}

impl AnalysisResult {
    /// Checks the invariants a result must hold before it is trusted.
    pub fn validate(&self) -> Result<(), WorkflowError> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(WorkflowError::malformed_result());
        }
        Ok(())
    }
}

/// Payload for the report endpoint, taken from the stored structured result.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub cancer_type: String,
    pub cancer_stage: String,
    pub confidence: f64,
}

impl From<&AnalysisResult> for ReportRequest {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            cancer_type: result.cancer_type.clone(),
            cancer_stage: result.cancer_stage.clone(),
            confidence: result.confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) policy: SubmitPolicy,
    pub(crate) workflow: WorkflowState,
    pub(crate) generation: Generation,
    pub(crate) selected: Option<SelectedImage>,
    pub(crate) preview: Option<String>,
    pub(crate) results: ResultStore,
    pub(crate) report: ReportState,
    pub(crate) next_report_id: ReportRequestId,
    pub(crate) pending_reports: BTreeSet<ReportRequestId>,
    pub(crate) last_report_path: Option<PathBuf>,
    pub(crate) notifier: Notifier,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: SubmitPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn workflow(&self) -> WorkflowState {
        self.workflow
    }

    pub fn report_state(&self) -> ReportState {
        self.report
    }

    /// Generation of the analysis request that is allowed to settle.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    pub fn view(&self) -> AppViewModel {
        let result = match self.workflow {
            WorkflowState::Success => self.results.latest().map(ResultView::from_result),
            WorkflowState::Idle | WorkflowState::Uploading | WorkflowState::Failed => None,
        };
        AppViewModel {
            workflow: self.workflow,
            busy: self.workflow == WorkflowState::Uploading,
            selected_file: self.selected.as_ref().map(SelectedImage::file_name),
            preview: self.preview.clone(),
            result,
            report: self.report,
            last_report_path: self.last_report_path.clone(),
            notification: self.notifier.current().cloned(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether anything changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_confidence(confidence: f64) -> AnalysisResult {
        AnalysisResult {
            processed_images: Vec::new(),
            cancer_type: "Carcinoma".to_string(),
            cancer_stage: "II".to_string(),
            confidence,
        }
    }

    #[test]
    fn confidence_outside_unit_range_is_rejected() {
        assert!(result_with_confidence(0.0).validate().is_ok());
        assert!(result_with_confidence(1.0).validate().is_ok());
        assert_eq!(
            result_with_confidence(1.2).validate(),
            Err(WorkflowError::malformed_result())
        );
        assert!(result_with_confidence(-0.1).validate().is_err());
        assert!(result_with_confidence(f64::NAN).validate().is_err());
    }

    #[test]
    fn report_request_copies_structured_fields() {
        let request = ReportRequest::from(&result_with_confidence(0.87));
        assert_eq!(request.cancer_type, "Carcinoma");
        assert_eq!(request.cancer_stage, "II");
        assert_eq!(request.confidence, 0.87);
    }

    #[test]
    fn selected_image_uses_file_name() {
        let image = SelectedImage::new("/tmp/scans/ct_01.png");
        assert_eq!(image.file_name(), "ct_01.png");
    }

    #[test]
    fn consume_dirty_resets_flag() {
        let mut state = AppState::new();
        state.mark_dirty();
        assert!(state.consume_dirty());
        assert!(!state.consume_dirty());
    }
}
