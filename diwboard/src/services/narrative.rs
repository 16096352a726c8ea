use crate::llm::{prompts, ModelClient};
use crate::models::{ChatMessage, ReportRecord};
use crate::validation::validate_narrative;

pub const AI_DISABLED_MESSAGE: &str = "AI features are disabled. Please configure an LLM model.";
pub const NARRATIVE_ERROR_MESSAGE: &str =
    "An error occurred while generating the analysis. Please check the logs for details.";
pub const CHAT_ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";

/// Markdown analysis of a single report.
pub struct NarrativeService<'a> {
    model: &'a dyn ModelClient,
    excerpt_chars: usize,
}

impl<'a> NarrativeService<'a> {
    pub fn new(model: &'a dyn ModelClient, excerpt_chars: usize) -> Self {
        Self {
            model,
            excerpt_chars,
        }
    }

    /// Always yields displayable text; failures collapse into a fixed message.
    pub async fn generate(&self, report: &ReportRecord) -> String {
        if !self.model.is_available() {
            return AI_DISABLED_MESSAGE.to_string();
        }

        let prompt = match prompts::narrative_prompt(report, self.excerpt_chars) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::error!(report_id = %report.id, error = %e, "Failed to build narrative prompt");
                return NARRATIVE_ERROR_MESSAGE.to_string();
            }
        };

        let narrative = self
            .model
            .generate(&prompt)
            .await
            .and_then(|raw| validate_narrative(&raw));

        match narrative {
            Ok(text) => {
                tracing::debug!(report_id = %report.id, chars = text.len(), "Narrative generated");
                text
            }
            Err(e) => {
                tracing::error!(report_id = %report.id, error = %e, "Narrative generation failed");
                NARRATIVE_ERROR_MESSAGE.to_string()
            }
        }
    }
}

/// A conversation grounded in one report.
///
/// `transcript` is what the user sees, starting with a greeting. Only
/// completed exchanges are replayed to the model as history.
#[derive(Debug, Clone)]
pub struct ChatSession {
    report_id: String,
    system_instruction: String,
    transcript: Vec<ChatMessage>,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn start(report: &ReportRecord, excerpt_chars: usize) -> Self {
        let greeting = format!(
            "Hello! I'm ready to answer your questions about the \"{}\" report.",
            report.title
        );
        Self {
            report_id: report.id.clone(),
            system_instruction: prompts::chat_system_instruction(report, excerpt_chars),
            transcript: vec![ChatMessage::model(greeting)],
            history: Vec::new(),
        }
    }

    pub fn report_id(&self) -> &str {
        &self.report_id
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Send one user turn. Blank input is ignored and returns `None`.
    pub async fn send(&mut self, model: &dyn ModelClient, message: &str) -> Option<&ChatMessage> {
        if message.trim().is_empty() {
            return None;
        }

        self.transcript.push(ChatMessage::user(message));

        let reply = if model.is_available() {
            match model
                .converse(&self.system_instruction, &self.history, message)
                .await
            {
                Ok(reply) => {
                    self.history.push(ChatMessage::user(message));
                    self.history.push(ChatMessage::model(reply.clone()));
                    reply
                }
                Err(e) => {
                    tracing::error!(report_id = %self.report_id, error = %e, "Chat turn failed");
                    CHAT_ERROR_MESSAGE.to_string()
                }
            }
        } else {
            AI_DISABLED_MESSAGE.to_string()
        };

        self.transcript.push(ChatMessage::model(reply));
        self.transcript.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChatRole;

    fn report() -> ReportRecord {
        ReportRecord {
            id: "energy".to_string(),
            title: "Energy Transition".to_string(),
            release_date: None,
            summary: "Renewables grow.".to_string(),
            key_findings: vec!["Wind up".to_string()],
            charts: vec![],
            full_text: "Long text".to_string(),
        }
    }

    #[test]
    fn test_session_opens_with_greeting() {
        let session = ChatSession::start(&report(), 6000);
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].role, ChatRole::Model);
        assert_eq!(
            session.transcript()[0].content,
            "Hello! I'm ready to answer your questions about the \"Energy Transition\" report."
        );
        assert!(session.system_instruction().contains("Energy Transition"));
    }
}
