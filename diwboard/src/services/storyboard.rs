use crate::error::SynthesisFailure;
use crate::llm::{prompts, ModelClient};
use crate::models::{ReportRecord, StoryboardData};
use crate::validation::parse_storyboard_response;

/// Minimum number of reports a synthesis needs.
pub const MIN_STORYBOARD_REPORTS: usize = 2;

/// Builds a cross-report storyboard. Holds no state of its own; the caller
/// owns loading, error and result state.
pub struct StoryboardAssembler<'a> {
    model: &'a dyn ModelClient,
}

impl<'a> StoryboardAssembler<'a> {
    pub fn new(model: &'a dyn ModelClient) -> Self {
        Self { model }
    }

    pub async fn generate(
        &self,
        reports: &[ReportRecord],
    ) -> std::result::Result<StoryboardData, SynthesisFailure> {
        if reports.len() < MIN_STORYBOARD_REPORTS {
            tracing::warn!(available = reports.len(), "Not enough reports for a storyboard");
            return Err(SynthesisFailure::InsufficientData {
                available: reports.len(),
            });
        }

        if !self.model.is_available() {
            tracing::error!("Storyboard requested but AI features are disabled");
            return Err(SynthesisFailure::ModelError(
                "model client unavailable".to_string(),
            ));
        }

        let prompt = prompts::storyboard_prompt(reports).map_err(|e| {
            tracing::error!(error = %e, "Failed to build storyboard prompt");
            SynthesisFailure::ModelError(e.to_string())
        })?;

        tracing::info!(reports = reports.len(), "Generating storyboard");
        let raw = self.model.generate(&prompt).await.map_err(|e| {
            tracing::error!(error = %e, "Storyboard model call failed");
            SynthesisFailure::ModelError(e.to_string())
        })?;

        let storyboard = parse_storyboard_response(&raw)
            .map_err(|e| SynthesisFailure::ModelError(e.to_string()))?;

        tracing::info!(
            nodes = storyboard.relationship_graph.nodes.len(),
            edges = storyboard.relationship_graph.edges.len(),
            charts = storyboard.charts.len(),
            "Storyboard generated"
        );
        Ok(storyboard)
    }
}
