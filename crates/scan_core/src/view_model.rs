use std::path::PathBuf;

use crate::{AnalysisResult, Notification, ReportState, WorkflowState};

/// Everything the rendering layer needs for one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub workflow: WorkflowState,
    /// In-flight indicator. Derived from `Uploading`, so it clears on every exit path.
    pub busy: bool,
    pub selected_file: Option<String>,
    pub preview: Option<String>,
    /// Only present in `WorkflowState::Success`.
    pub result: Option<ResultView>,
    pub report: ReportState,
    pub last_report_path: Option<PathBuf>,
    pub notification: Option<Notification>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub stages: Vec<StageView>,
    pub cancer_type: String,
    pub cancer_stage: String,
    pub confidence: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageView {
    pub stage: String,
    pub title: String,
    pub image_ref: String,
}

impl ResultView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            stages: result
                .processed_images
                .iter()
                .map(|image| StageView {
                    stage: image.stage.clone(),
                    title: capitalize_words(&image.stage),
                    image_ref: image.image_ref.clone(),
                })
                .collect(),
            cancer_type: result.cancer_type.clone(),
            cancer_stage: result.cancer_stage.clone(),
            confidence: format_confidence(result.confidence),
        }
    }
}

/// Formats a [0, 1] fraction as a percentage with one decimal, e.g. `87.0%`.
///
/// Halves round away from zero (`0.8725` is `87.3%`); the formatter alone
/// would round them to even.
pub fn format_confidence(confidence: f64) -> String {
    let percent = confidence * 100.0;
    format!("{:.1}%", (percent * 10.0).round() / 10.0)
}

fn capitalize_words(input: &str) -> String {
    input
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
