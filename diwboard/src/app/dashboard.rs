use std::sync::Arc;

use crate::config::Config;
use crate::db::{KeyValueStore, ReportStore};
use crate::error::{DashboardError, Result};
use crate::llm::ModelClient;
use crate::models::{ChatMessage, ReportRecord};
use crate::processing::{TextExtractor, UploadedFile};
use crate::services::{
    merge, BatchOutcome, ChatSession, IngestionPipeline, IngestionProgress, MergeOutcome,
    NarrativeService, StoryboardAssembler,
};

use super::state::{Action, AppState, Panel, StoryboardState};

/// Owns the report store, the model and extraction collaborators and the
/// view state, and drives every user-visible operation.
pub struct Dashboard<S: KeyValueStore> {
    config: Arc<Config>,
    store: ReportStore<S>,
    model: Arc<dyn ModelClient>,
    extractor: Arc<dyn TextExtractor>,
    state: AppState,
    chat: Option<ChatSession>,
}

impl<S: KeyValueStore> Dashboard<S> {
    pub fn new(
        config: Config,
        store: ReportStore<S>,
        model: Arc<dyn ModelClient>,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        if let Err(e) = store.initialize() {
            tracing::error!(error = %e, "Failed to initialize report storage");
        }
        let reports = store.load();
        tracing::info!(reports = reports.len(), "Dashboard loaded");

        Self {
            config: Arc::new(config),
            store,
            model,
            extractor,
            state: AppState::new(reports),
            chat: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &ReportStore<S> {
        &self.store
    }

    pub fn select_panel(&mut self, panel: Panel) {
        self.state.apply(Action::SelectPanel(panel));
        self.close_stale_chat();
    }

    /// Merge structured reports into the set, persisting when anything new
    /// was added. A storage failure is logged; the in-memory set is still
    /// updated.
    pub fn add_reports(&mut self, candidates: Vec<ReportRecord>) -> Option<String> {
        let reports = self.state.reports();
        let outcome: MergeOutcome = merge(&reports, candidates);

        if outcome.changed {
            if let Err(e) = self.store.save(&outcome.merged) {
                tracing::error!(error = %e, "Failed to persist reports");
            }
        }

        let selected = outcome.newly_selected_id.clone();
        self.state.apply(Action::ReportsMerged(outcome));
        self.close_stale_chat();
        selected
    }

    /// Extract and structure `files` one by one, then merge whatever
    /// succeeded.
    pub async fn ingest_files<F>(&mut self, files: &[UploadedFile], on_progress: F) -> BatchOutcome
    where
        F: FnMut(IngestionProgress<'_>),
    {
        let outcome = IngestionPipeline::new(self.extractor.as_ref(), self.model.as_ref())
            .run(files, on_progress)
            .await;

        if !outcome.reports.is_empty() {
            self.add_reports(outcome.reports.clone());
        }
        if let Some(summary) = outcome.summary() {
            tracing::warn!("{summary}");
        }
        outcome
    }

    /// Synthesize a storyboard over the whole report set, replacing any
    /// previous one.
    pub async fn generate_storyboard(&mut self) -> &StoryboardState {
        self.state.apply(Action::StoryboardRequested);
        let reports = self.state.reports();

        let result = StoryboardAssembler::new(self.model.as_ref())
            .generate(&reports)
            .await;

        match result {
            Ok(storyboard) => self.state.apply(Action::StoryboardReady(storyboard)),
            Err(failure) => {
                tracing::warn!(error = %failure, "Storyboard generation failed");
                self.state
                    .apply(Action::StoryboardFailed(failure.user_message().to_string()));
            }
        }
        self.state.storyboard()
    }

    /// Key actors come from the storyboard: switch to it, generating one if
    /// none exists yet.
    pub async fn request_key_actors(&mut self) -> &StoryboardState {
        self.select_panel(Panel::Storyboard);
        if self.state.storyboard().data.is_none() {
            return self.generate_storyboard().await;
        }
        self.state.storyboard()
    }

    pub async fn narrative(&self, report_id: &str) -> Result<String> {
        let report = self.find_report(report_id)?;
        let service = NarrativeService::new(
            self.model.as_ref(),
            self.config.analysis.narrative_excerpt_chars,
        );
        Ok(service.generate(report).await)
    }

    /// Select `report_id` and open a fresh conversation about it, replacing
    /// any other.
    pub fn start_chat(&mut self, report_id: &str) -> Result<&ChatSession> {
        let session = ChatSession::start(
            self.find_report(report_id)?,
            self.config.analysis.chat_excerpt_chars,
        );
        self.state
            .apply(Action::SelectPanel(Panel::Report(report_id.to_string())));
        Ok(self.chat.insert(session))
    }

    pub fn chat(&self) -> Option<&ChatSession> {
        self.chat.as_ref()
    }

    /// Send a user message to the open chat. Blank messages yield `None`.
    pub async fn send_chat(&mut self, message: &str) -> Result<Option<ChatMessage>> {
        let session = self
            .chat
            .as_mut()
            .ok_or_else(|| DashboardError::NotFound("No active chat session".to_string()))?;

        Ok(session.send(self.model.as_ref(), message).await.cloned())
    }

    /// A chat lives only while its report is the selected panel.
    fn close_stale_chat(&mut self) {
        let Some(session) = &self.chat else {
            return;
        };
        let still_selected =
            matches!(self.state.panel(), Panel::Report(id) if id == session.report_id());
        if !still_selected {
            tracing::debug!(report_id = %session.report_id(), "Closing chat for deselected report");
            self.chat = None;
        }
    }

    fn find_report(&self, report_id: &str) -> Result<&ReportRecord> {
        self.state
            .report(report_id)
            .ok_or_else(|| DashboardError::NotFound(format!("Report not found: {report_id}")))
    }
}
