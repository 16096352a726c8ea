use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    #[error("LLM rate limit exceeded, retry after {retry_after:?} seconds")]
    LlmRateLimit { retry_after: Option<u64> },
}

/// Why a cross-report storyboard could not be produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisFailure {
    #[error("at least 2 reports are required, {available} available")]
    InsufficientData { available: usize },

    #[error("model error: {0}")]
    ModelError(String),
}

impl SynthesisFailure {
    /// Message shown to the end user. The underlying cause is only logged.
    pub fn user_message(&self) -> &'static str {
        match self {
            SynthesisFailure::InsufficientData { .. } => {
                "Please add at least two reports to generate a storyboard."
            }
            SynthesisFailure::ModelError(_) => {
                "An error occurred while generating the storyboard. The AI couldn't process the request. Please check the logs for details."
            }
        }
    }
}

/// Reason a single uploaded file could not become a report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestionFailureReason {
    #[error("Could not extract text. The file might be empty or image-based.")]
    EmptyText,

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("AI could not structure the data from the text.")]
    Structuring,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to process \"{file_name}\": {reason}")]
pub struct IngestionFailure {
    pub file_name: String,
    pub reason: IngestionFailureReason,
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingestion_failure_message_names_file() {
        let failure = IngestionFailure {
            file_name: "report.pdf".to_string(),
            reason: IngestionFailureReason::EmptyText,
        };

        assert_eq!(
            failure.to_string(),
            "Failed to process \"report.pdf\": Could not extract text. The file might be empty or image-based."
        );
    }

    #[test]
    fn test_synthesis_user_message_hides_cause() {
        let failure = SynthesisFailure::ModelError("socket closed by peer".to_string());
        assert!(!failure.user_message().contains("socket"));
        assert!(failure.user_message().contains("logs"));
    }
}
