use scan_core::{AppViewModel, ReportState, Severity, WorkflowState};

const MAX_REF_CHARS: usize = 48;

/// Renders one frame of the view model as terminal text.
pub fn render(view: &AppViewModel) -> String {
    let mut lines = Vec::new();

    let selected = view.selected_file.as_deref().unwrap_or("no image selected");
    lines.push(format!(
        "── {} | {}",
        workflow_label(view.workflow),
        selected
    ));

    if let Some(preview) = &view.preview {
        lines.push(format!("Preview: {}", abbreviate(preview)));
    }

    if view.busy {
        lines.push("⏳ Analyzing image...".to_string());
    }

    if let Some(result) = &view.result {
        lines.push("Processing steps:".to_string());
        for (index, stage) in result.stages.iter().enumerate() {
            lines.push(format!(
                "  {}. {}: {}",
                index + 1,
                stage.title,
                abbreviate(&stage.image_ref)
            ));
        }
        lines.push(format!("Cancer type:  {}", result.cancer_type));
        lines.push(format!("Cancer stage: {}", result.cancer_stage));
        lines.push(format!("Confidence:   {}", result.confidence));
    }

    match view.report {
        ReportState::Idle => {}
        ReportState::Generating => lines.push("Report: generating...".to_string()),
        ReportState::Success => match &view.last_report_path {
            Some(path) => lines.push(format!("Report: saved to {}", path.display())),
            None => lines.push("Report: ready".to_string()),
        },
        ReportState::Failed => lines.push("Report: failed".to_string()),
    }

    if let Some(notification) = &view.notification {
        lines.push(format!(
            "{} {}",
            severity_glyph(notification.severity),
            notification.message
        ));
    }

    lines.join("\n")
}

fn workflow_label(state: WorkflowState) -> &'static str {
    match state {
        WorkflowState::Idle => "Idle",
        WorkflowState::Uploading => "Uploading",
        WorkflowState::Success => "Analysis complete",
        WorkflowState::Failed => "Analysis failed",
    }
}

fn severity_glyph(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "ℹ️",
        Severity::Success => "✅",
        Severity::Warning => "⚠️",
        Severity::Danger => "❌",
    }
}

/// Data URIs are long; show the head and the total length.
fn abbreviate(image_ref: &str) -> String {
    let total = image_ref.chars().count();
    if total <= MAX_REF_CHARS {
        return image_ref.to_string();
    }
    let head: String = image_ref.chars().take(MAX_REF_CHARS).collect();
    format!("{head}... ({total} chars)")
}
