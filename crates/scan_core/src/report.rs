//! Report generation and download handoff.

use std::path::PathBuf;

use scan_logging::{scan_debug, scan_info, scan_warn};

use crate::{
    AppState, Effect, ReportRequest, ReportRequestId, ReportState, Severity, WorkflowError,
    REPORT_DOWNLOADED, REPORT_FILE_NAME,
};

pub(crate) fn request_report(state: &mut AppState) -> Vec<Effect> {
    let Some(request) = state.results.latest().map(ReportRequest::from) else {
        let err = WorkflowError::no_analysis_available();
        scan_warn!("Report request rejected: {}", err);
        state.notifier.show_error(&err);
        state.mark_dirty();
        return Vec::new();
    };

    state.next_report_id += 1;
    let request_id = state.next_report_id;
    state.pending_reports.insert(request_id);
    state.report = ReportState::Generating;
    state.mark_dirty();
    scan_info!("Requesting report {}", request_id);
    vec![Effect::RequestReport {
        request_id,
        request,
    }]
}

pub(crate) fn on_report_settled(
    state: &mut AppState,
    request_id: ReportRequestId,
    result: Result<Vec<u8>, WorkflowError>,
) -> Vec<Effect> {
    if !state.pending_reports.remove(&request_id) {
        scan_debug!("Ignoring settlement for unknown report {}", request_id);
        return Vec::new();
    }

    let (outcome, effects) = match result {
        Ok(bytes) => {
            scan_info!("Report {} generated ({} bytes)", request_id, bytes.len());
            state.notifier.show(REPORT_DOWNLOADED, Severity::Success);
            let effect = Effect::SaveReport {
                request_id,
                file_name: REPORT_FILE_NAME.to_string(),
                bytes,
            };
            (ReportState::Success, vec![effect])
        }
        Err(err) => {
            scan_warn!("Report {} failed: {:?}", request_id, err);
            state.notifier.show_error(&err);
            (ReportState::Failed, Vec::new())
        }
    };
    state.report = settled_state(state, outcome);
    state.mark_dirty();
    effects
}

pub(crate) fn on_report_saved(
    state: &mut AppState,
    request_id: ReportRequestId,
    path: PathBuf,
) -> Vec<Effect> {
    scan_info!("Report {} saved to {:?}", request_id, path);
    state.last_report_path = Some(path);
    state.mark_dirty();
    Vec::new()
}

pub(crate) fn on_report_save_failed(
    state: &mut AppState,
    request_id: ReportRequestId,
    message: &str,
) -> Vec<Effect> {
    scan_warn!("Report {} could not be saved: {}", request_id, message);
    state
        .notifier
        .show(format!("Could not save {REPORT_FILE_NAME}: {message}"), Severity::Danger);
    state.report = settled_state(state, ReportState::Failed);
    state.mark_dirty();
    Vec::new()
}

fn settled_state(state: &AppState, outcome: ReportState) -> ReportState {
    if state.pending_reports.is_empty() {
        outcome
    } else {
        ReportState::Generating
    }
}
