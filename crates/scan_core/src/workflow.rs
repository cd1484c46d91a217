//! Analyze submit sequence and settlement.

use scan_logging::{scan_debug, scan_info, scan_warn};

use crate::{
    AnalysisResult, AppState, Effect, Generation, Severity, SubmitPolicy, WorkflowError,
    WorkflowState, ANALYSIS_IN_PROGRESS, ANALYSIS_SUCCEEDED,
};

pub(crate) fn submit_analysis(state: &mut AppState) -> Vec<Effect> {
    let Some(image) = state.selected.clone() else {
        let err = WorkflowError::no_image_selected();
        scan_warn!("Analysis submit rejected: {}", err);
        state.notifier.show_error(&err);
        state.mark_dirty();
        return Vec::new();
    };

    let mut effects = Vec::with_capacity(2);
    if state.workflow == WorkflowState::Uploading {
        match state.policy {
            SubmitPolicy::Reject => {
                scan_info!(
                    "Analysis submit ignored; generation {} still in flight",
                    state.generation
                );
                state.notifier.show(ANALYSIS_IN_PROGRESS, Severity::Info);
                state.mark_dirty();
                return Vec::new();
            }
            SubmitPolicy::Supersede => {
                scan_info!("Superseding in-flight analysis generation {}", state.generation);
                effects.push(Effect::CancelAnalysis {
                    generation: state.generation,
                });
            }
        }
    }

    state.generation += 1;
    state.workflow = WorkflowState::Uploading;
    state.notifier.clear();
    state.mark_dirty();
    scan_info!(
        "Submitting {} for analysis (generation {})",
        image.file_name(),
        state.generation
    );
    effects.push(Effect::SubmitAnalysis {
        generation: state.generation,
        image,
    });
    effects
}

pub(crate) fn on_analysis_settled(
    state: &mut AppState,
    generation: Generation,
    result: Result<AnalysisResult, WorkflowError>,
) -> Vec<Effect> {
    if generation != state.generation || state.workflow != WorkflowState::Uploading {
        scan_debug!(
            "Discarding stale analysis response for generation {} (current {}, state {:?})",
            generation,
            state.generation,
            state.workflow
        );
        return Vec::new();
    }

    match result.and_then(|result| result.validate().map(|()| result)) {
        Ok(result) => {
            scan_info!(
                "Analysis generation {} succeeded: {} stage(s), type={}, stage={}",
                generation,
                result.processed_images.len(),
                result.cancer_type,
                result.cancer_stage
            );
            state.results.publish(result);
            state.workflow = WorkflowState::Success;
            state.notifier.show(ANALYSIS_SUCCEEDED, Severity::Success);
        }
        Err(err) => {
            scan_warn!("Analysis generation {} failed: {:?}", generation, err);
            state.workflow = WorkflowState::Failed;
            state.notifier.show_error(&err);
        }
    }
    state.mark_dirty();
    Vec::new()
}
