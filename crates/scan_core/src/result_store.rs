use crate::AnalysisResult;

/// Holds the last successful analysis. Last write wins; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultStore {
    last: Option<AnalysisResult>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn publish(&mut self, result: AnalysisResult) {
        self.last = Some(result);
    }

    pub fn latest(&self) -> Option<&AnalysisResult> {
        self.last.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.last.is_none()
    }
}
