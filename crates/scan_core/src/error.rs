use thiserror::Error;

use crate::Severity;

pub const NO_IMAGE_SELECTED: &str = "Please select an image before analyzing.";
pub const NO_ANALYSIS_AVAILABLE: &str = "Analyze an image before requesting a report.";
pub const ANALYSIS_IN_PROGRESS: &str = "An analysis is already in progress.";
pub const UNEXPECTED_FORMAT: &str = "Session expired or server error. Please log in again.";
pub const GENERIC_FAILURE: &str = "An unexpected error occurred.";
pub const MALFORMED_RESULT: &str = "The server returned a malformed result.";
pub const REQUEST_TIMED_OUT: &str = "The request timed out.";
pub const REPORT_FAILED: &str = "Failed to generate report. Please try again.";
pub const ANALYSIS_SUCCEEDED: &str = "Image successfully analyzed!";
pub const REPORT_DOWNLOADED: &str = "Health Report downloaded successfully!";

/// Every way a workflow step can fail. The payload is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Bad or missing local input; no request was made.
    #[error("{0}")]
    Validation(String),
    /// The response violated the expected contract.
    #[error("{0}")]
    Protocol(String),
    /// The server reported a failure, or the result was incomplete.
    #[error("{0}")]
    Application(String),
    /// Transport-level failure.
    #[error("{0}")]
    Network(String),
}

impl WorkflowError {
    pub fn no_image_selected() -> Self {
        Self::Validation(NO_IMAGE_SELECTED.to_string())
    }

    pub fn no_analysis_available() -> Self {
        Self::Validation(NO_ANALYSIS_AVAILABLE.to_string())
    }

    pub fn unexpected_format() -> Self {
        Self::Protocol(UNEXPECTED_FORMAT.to_string())
    }

    pub fn timeout() -> Self {
        Self::Protocol(REQUEST_TIMED_OUT.to_string())
    }

    pub fn malformed_result() -> Self {
        Self::Application(MALFORMED_RESULT.to_string())
    }

    /// Server-reported failure; blank messages fall back to a generic one.
    pub fn server(message: Option<&str>) -> Self {
        match message.map(str::trim) {
            Some(message) if !message.is_empty() => Self::Application(message.to_string()),
            _ => Self::Application(GENERIC_FAILURE.to_string()),
        }
    }

    pub fn report_failed() -> Self {
        Self::Application(REPORT_FAILED.to_string())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Validation(message)
            | Self::Protocol(message)
            | Self::Application(message)
            | Self::Network(message) => message,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Validation(_) => Severity::Warning,
            Self::Protocol(_) | Self::Application(_) | Self::Network(_) => Severity::Danger,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_falls_back_when_blank() {
        assert_eq!(
            WorkflowError::server(Some("  ")),
            WorkflowError::Application(GENERIC_FAILURE.to_string())
        );
        assert_eq!(
            WorkflowError::server(None).message(),
            GENERIC_FAILURE
        );
        assert_eq!(
            WorkflowError::server(Some("Not a CT scan")).message(),
            "Not a CT scan"
        );
    }

    #[test]
    fn validation_is_a_warning() {
        assert_eq!(WorkflowError::no_image_selected().severity(), Severity::Warning);
        assert_eq!(WorkflowError::unexpected_format().severity(), Severity::Danger);
        assert_eq!(WorkflowError::unexpected_format().to_string(), UNEXPECTED_FORMAT);
    }
}
