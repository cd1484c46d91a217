use scan_core::{
    AnalysisResult, Effect, Msg, ProcessedImage, ReportRequest, WorkflowError,
};
use scan_engine::{
    AnalysisPayload, AtomicFileWriter, ClientError, EngineEvent, EngineHandle, FailureKind,
    ReportPayload,
};
use scan_logging::{scan_debug, scan_error, scan_info, scan_warn};

/// Executes core effects against the engine and the output directory.
pub struct EffectRunner {
    engine: EngineHandle,
    writer: AtomicFileWriter,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, writer: AtomicFileWriter) -> Self {
        Self { engine, writer }
    }

    /// Runs `effects`; returns messages for effects that complete synchronously.
    pub fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut feedback = Vec::new();
        for effect in effects {
            match effect {
                Effect::LoadPreview { path } => {
                    scan_debug!("LoadPreview path={:?}", path);
                    self.engine.load_preview(path);
                }
                Effect::SubmitAnalysis { generation, image } => {
                    scan_info!("SubmitAnalysis generation={} path={:?}", generation, image.path);
                    self.engine.analyze(generation, image.path);
                }
                Effect::CancelAnalysis { generation } => {
                    scan_info!("CancelAnalysis generation={}", generation);
                    self.engine.cancel_analysis(generation);
                }
                Effect::RequestReport {
                    request_id,
                    request,
                } => {
                    scan_info!("RequestReport request_id={}", request_id);
                    self.engine.request_report(request_id, report_payload(request));
                }
                Effect::SaveReport {
                    request_id,
                    file_name,
                    bytes,
                } => match self.writer.write(&file_name, &bytes) {
                    Ok(path) => feedback.push(Msg::ReportSaved { request_id, path }),
                    Err(err) => {
                        scan_error!(
                            "Failed to write {} into {:?}: {}",
                            file_name,
                            self.writer.dir(),
                            err
                        );
                        feedback.push(Msg::ReportSaveFailed {
                            request_id,
                            message: err.to_string(),
                        });
                    }
                },
            }
        }
        feedback
    }

    pub fn try_recv(&self) -> Option<Msg> {
        self.engine.try_recv().map(map_event)
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PreviewReady { path, data_uri } => Msg::PreviewLoaded { path, data_uri },
        EngineEvent::AnalysisCompleted { generation, result } => Msg::AnalysisSettled {
            generation,
            result: result.map(analysis_result).map_err(analysis_error),
        },
        EngineEvent::ReportCompleted { request_id, result } => Msg::ReportSettled {
            request_id,
            result: result.map_err(report_error),
        },
    }
}

fn analysis_result(payload: AnalysisPayload) -> AnalysisResult {
    AnalysisResult {
        processed_images: payload
            .processed_images
            .into_iter()
            .map(|stage| ProcessedImage::new(stage.stage, stage.image_ref))
            .collect(),
        cancer_type: payload.cancer_type,
        cancer_stage: payload.cancer_stage,
        confidence: payload.confidence,
    }
}

fn report_payload(request: ReportRequest) -> ReportPayload {
    ReportPayload {
        cancer_type: request.cancer_type,
        cancer_stage: request.cancer_stage,
        confidence: request.confidence,
    }
}

pub fn analysis_error(err: ClientError) -> WorkflowError {
    scan_warn!("Analysis request failed: {}", err);
    match err.kind {
        FailureKind::UnexpectedFormat => WorkflowError::unexpected_format(),
        FailureKind::Server { message, .. } => WorkflowError::server(message.as_deref()),
        FailureKind::HttpStatus(_) => WorkflowError::server(None),
        FailureKind::MalformedResult => WorkflowError::malformed_result(),
        FailureKind::Timeout => WorkflowError::timeout(),
        FailureKind::TooLarge { .. } => {
            WorkflowError::Protocol("The server response was too large.".to_string())
        }
        FailureKind::Io => {
            WorkflowError::Validation(format!("Could not read the selected image: {}", err.message))
        }
        FailureKind::InvalidUrl => {
            WorkflowError::Network(format!("Invalid server address: {}", err.message))
        }
        FailureKind::Network => WorkflowError::Network(format!(
            "Could not reach the analysis server: {}",
            err.message
        )),
    }
}

/// The report endpoint has no structured error body, so a bad status gets a
/// generic message and everything else reports the underlying error.
pub fn report_error(err: ClientError) -> WorkflowError {
    scan_warn!("Report request failed: {}", err);
    match err.kind {
        FailureKind::HttpStatus(_) => WorkflowError::report_failed(),
        _ => WorkflowError::Network(format!("Error generating report: {}", err.message)),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use scan_core::{GENERIC_FAILURE, REPORT_FAILED, UNEXPECTED_FORMAT};
    use scan_engine::ProcessedStage;

    use super::*;

    fn client_error(kind: FailureKind, message: &str) -> ClientError {
        ClientError {
            kind,
            message: message.to_string(),
        }
    }

    #[test]
    fn analysis_failures_map_to_user_messages() {
        assert_eq!(
            analysis_error(client_error(FailureKind::UnexpectedFormat, "text/html")),
            WorkflowError::Protocol(UNEXPECTED_FORMAT.to_string())
        );
        assert_eq!(
            analysis_error(client_error(
                FailureKind::Server {
                    status: 400,
                    message: Some("Not a CT scan".to_string()),
                },
                "Not a CT scan",
            )),
            WorkflowError::Application("Not a CT scan".to_string())
        );
        assert_eq!(
            analysis_error(client_error(
                FailureKind::Server {
                    status: 502,
                    message: None,
                },
                "status 502",
            )),
            WorkflowError::Application(GENERIC_FAILURE.to_string())
        );
        assert_eq!(
            analysis_error(client_error(
                FailureKind::Server {
                    status: 200,
                    message: Some("  ".to_string()),
                },
                "  ",
            )),
            WorkflowError::Application(GENERIC_FAILURE.to_string())
        );
        assert_eq!(
            analysis_error(client_error(FailureKind::Timeout, "deadline")),
            WorkflowError::timeout()
        );
        assert!(matches!(
            analysis_error(client_error(FailureKind::Io, "missing")),
            WorkflowError::Validation(_)
        ));
    }

    #[test]
    fn report_failures_map_to_user_messages() {
        assert_eq!(
            report_error(client_error(FailureKind::HttpStatus(500), "500")),
            WorkflowError::Application(REPORT_FAILED.to_string())
        );
        assert_eq!(
            report_error(client_error(FailureKind::Network, "connection refused")),
            WorkflowError::Network("Error generating report: connection refused".to_string())
        );
    }

    #[test]
    fn completed_analysis_keeps_stage_order() {
        let msg = map_event(EngineEvent::AnalysisCompleted {
            generation: 3,
            result: Ok(AnalysisPayload {
                processed_images: vec![
                    ProcessedStage {
                        stage: "original".to_string(),
                        image_ref: "a".to_string(),
                    },
                    ProcessedStage {
                        stage: "segmented".to_string(),
                        image_ref: "b".to_string(),
                    },
                ],
                cancer_type: "Carcinoma".to_string(),
                cancer_stage: "II".to_string(),
                confidence: 0.87,
            }),
        });
        assert_eq!(
            msg,
            Msg::AnalysisSettled {
                generation: 3,
                result: Ok(AnalysisResult {
                    processed_images: vec![
                        ProcessedImage::new("original", "a"),
                        ProcessedImage::new("segmented", "b"),
                    ],
                    cancer_type: "Carcinoma".to_string(),
                    cancer_stage: "II".to_string(),
                    confidence: 0.87,
                }),
            }
        );
    }

    #[test]
    fn preview_event_maps_to_preview_loaded() {
        let msg = map_event(EngineEvent::PreviewReady {
            path: PathBuf::from("ct.png"),
            data_uri: "data:image/png;base64,AA".to_string(),
        });
        assert_eq!(
            msg,
            Msg::PreviewLoaded {
                path: PathBuf::from("ct.png"),
                data_uri: "data:image/png;base64,AA".to_string(),
            }
        );
    }
}
