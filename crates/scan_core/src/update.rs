use crate::{preview, report, workflow, AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FileSelected(file) => preview::on_file_selected(&mut state, file),
        Msg::PreviewLoaded { path, data_uri } => {
            preview::on_preview_loaded(&mut state, path, data_uri)
        }
        Msg::AnalyzeClicked => workflow::submit_analysis(&mut state),
        Msg::AnalysisSettled { generation, result } => {
            workflow::on_analysis_settled(&mut state, generation, result)
        }
        Msg::ReportClicked => report::request_report(&mut state),
        Msg::ReportSettled { request_id, result } => {
            report::on_report_settled(&mut state, request_id, result)
        }
        Msg::ReportSaved { request_id, path } => report::on_report_saved(&mut state, request_id, path),
        Msg::ReportSaveFailed {
            request_id,
            message,
        } => report::on_report_save_failed(&mut state, request_id, &message),
        Msg::DismissNotification => {
            if state.notifier.current().is_some() {
                state.notifier.clear();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
