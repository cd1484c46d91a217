//! Scan core: pure workflow state machine and view-model helpers.
//!
//! Nothing in this crate performs I/O. The front end feeds [`Msg`] values into
//! [`update`] and executes the returned [`Effect`]s; engine results come back
//! as further messages.
mod effect;
mod error;
mod msg;
mod notifier;
mod preview;
mod report;
mod result_store;
mod state;
mod update;
mod view_model;
mod workflow;

pub use effect::{Effect, SubmitPolicy};
pub use error::{
    WorkflowError, ANALYSIS_IN_PROGRESS, ANALYSIS_SUCCEEDED, GENERIC_FAILURE, MALFORMED_RESULT,
    NO_ANALYSIS_AVAILABLE, NO_IMAGE_SELECTED, REPORT_DOWNLOADED, REPORT_FAILED, REQUEST_TIMED_OUT,
    UNEXPECTED_FORMAT,
};
pub use msg::Msg;
pub use notifier::{Notification, Notifier, Severity};
pub use result_store::ResultStore;
pub use state::{
    AnalysisResult, AppState, Generation, ProcessedImage, ReportRequest, ReportRequestId,
    ReportState, SelectedImage, WorkflowState, REPORT_FILE_NAME,
};
pub use update::update;
pub use view_model::{format_confidence, AppViewModel, ResultView, StageView};
