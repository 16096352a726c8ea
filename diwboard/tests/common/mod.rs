// Common test utilities for integration tests
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};

use async_trait::async_trait;

use diwboard::error::{DashboardError, Result};
use diwboard::llm::ModelClient;
use diwboard::models::{ChatMessage, ReportRecord};
use diwboard::processing::{TextExtractor, UploadedFile};

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Model double that replays canned responses in order and counts calls.
/// Once the queue is empty every call fails.
#[derive(Default)]
pub struct MockModel {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    histories: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses<I, T>(responses: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let model = Self::default();
        for response in responses {
            model.push_ok(response);
        }
        model
    }

    pub fn push_ok(&self, response: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(response.into()));
    }

    pub fn push_err(&self, error: DashboardError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn histories(&self) -> Vec<Vec<ChatMessage>> {
        self.histories.lock().unwrap().clone()
    }

    fn next(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DashboardError::Llm("no canned response".to_string())))
    }
}

#[async_trait]
impl ModelClient for MockModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.next(prompt)
    }

    async fn converse(
        &self,
        _system_instruction: &str,
        history: &[ChatMessage],
        message: &str,
    ) -> Result<String> {
        self.histories.lock().unwrap().push(history.to_vec());
        self.next(message)
    }
}

/// Extractor double keyed by file name; unknown files fail.
#[derive(Default)]
pub struct MockExtractor {
    texts: HashMap<String, String>,
}

impl MockExtractor {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            texts: entries
                .into_iter()
                .map(|(name, text)| (name.to_string(), text.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl TextExtractor for MockExtractor {
    async fn extract_text(&self, file: &UploadedFile) -> Result<String> {
        self.texts
            .get(&file.name)
            .cloned()
            .ok_or_else(|| DashboardError::Extraction(format!("unreadable: {}", file.name)))
    }
}

pub fn pdf(name: &str) -> UploadedFile {
    UploadedFile::new(name, b"%PDF-1.7\n".to_vec()).with_mime("application/pdf")
}

pub fn sample_report(id: &str) -> ReportRecord {
    ReportRecord {
        id: id.to_string(),
        title: format!("Report {id}"),
        release_date: Some("2024-03-01".to_string()),
        summary: "A summary.".to_string(),
        key_findings: vec!["Finding one".to_string()],
        charts: vec![],
        full_text: "Full report text.".to_string(),
    }
}

/// Model output for a structured report, as a model would send it.
pub fn report_response(id: &str) -> String {
    format!(
        r#"```json
{{
  "id": "{id}",
  "title": "Structured {id}",
  "releaseDate": "2024-06-01",
  "summary": "Structured from a PDF.",
  "keyFindings": ["First finding", "Second finding"],
  "charts": [],
}}
```"#
    )
}

pub const STORYBOARD_RESPONSE: &str = r#"{
  "narrative": "Construction and energy are linked.",
  "charts": [],
  "introspection": "Underlying drivers.",
  "retrospection": "Looking back.",
  "relationshipGraph": {
    "nodes": [{"id": "construction", "title": "Construction"}, {"id": "energy_transition", "title": "Energy"}],
    "edges": [{"source": "energy_transition", "target": "construction", "label": "raises costs"}]
  },
  "keyActors": [{"name": "Bundesbank", "description": "Central bank", "icon": "fa-solid fa-landmark"}]
}"#;

// Re-export commonly used crates for convenience
pub use serial_test::serial;
pub use tempfile;
pub use wiremock;
