use crate::error::{IngestionFailure, IngestionFailureReason};
use crate::llm::{prompts, ModelClient};
use crate::models::ReportRecord;
use crate::processing::{TextExtractor, UploadedFile};
use crate::validation::parse_report_response;

pub const NON_PDF_REJECTED: &str = "Some files were not PDFs and were ignored.";
pub const NO_FILES_SELECTED: &str = "Please select one or more PDF files to analyze.";

/// Result of adding files to a pending selection.
#[derive(Debug, Default)]
pub struct FileSelection {
    pub accepted: Vec<UploadedFile>,
    /// Set when at least one incoming file was not a PDF.
    pub warning: Option<&'static str>,
}

/// Keep the PDFs from `incoming` whose names are not already selected.
pub fn select_pdf_files(already_selected: &[UploadedFile], incoming: Vec<UploadedFile>) -> FileSelection {
    let total = incoming.len();
    let pdfs: Vec<UploadedFile> = incoming.into_iter().filter(UploadedFile::is_pdf).collect();

    let warning = (pdfs.len() != total).then_some(NON_PDF_REJECTED);
    if warning.is_some() {
        tracing::warn!(rejected = total - pdfs.len(), "Ignored non-PDF files");
    }

    let mut accepted: Vec<UploadedFile> = Vec::with_capacity(pdfs.len());
    for file in pdfs {
        let duplicate = already_selected
            .iter()
            .chain(accepted.iter())
            .any(|existing| existing.name == file.name);
        if !duplicate {
            accepted.push(file);
        }
    }

    FileSelection { accepted, warning }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionProgress<'a> {
    /// 1-based position of the file being processed.
    pub current: usize,
    pub total: usize,
    pub file_name: &'a str,
}

impl std::fmt::Display for IngestionProgress<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Processing {} of {}: {}", self.current, self.total, self.file_name)
    }
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub reports: Vec<ReportRecord>,
    pub failures: Vec<IngestionFailure>,
}

impl BatchOutcome {
    /// Single-line summary of the failures, if there were any.
    pub fn summary(&self) -> Option<String> {
        let first = self.failures.first()?;
        Some(format!(
            "{} file(s) failed to process. First error: {}",
            self.failures.len(),
            first
        ))
    }
}

/// Turns uploaded PDFs into validated report records, one file at a time.
pub struct IngestionPipeline<'a> {
    extractor: &'a dyn TextExtractor,
    model: &'a dyn ModelClient,
}

impl<'a> IngestionPipeline<'a> {
    pub fn new(extractor: &'a dyn TextExtractor, model: &'a dyn ModelClient) -> Self {
        Self { extractor, model }
    }

    /// Process `files` in order. A failing file is recorded and the batch
    /// moves on to the next one.
    pub async fn run<F>(&self, files: &[UploadedFile], mut on_progress: F) -> BatchOutcome
    where
        F: FnMut(IngestionProgress<'_>),
    {
        let total = files.len();
        let mut outcome = BatchOutcome::default();

        for (index, file) in files.iter().enumerate() {
            on_progress(IngestionProgress {
                current: index + 1,
                total,
                file_name: &file.name,
            });

            match self.ingest(file).await {
                Ok(report) => {
                    tracing::info!(file = %file.name, report_id = %report.id, "Structured report from file");
                    outcome.reports.push(report);
                }
                Err(reason) => {
                    let failure = IngestionFailure {
                        file_name: file.name.clone(),
                        reason,
                    };
                    tracing::error!(error = %failure, "Ingestion failed");
                    outcome.failures.push(failure);
                }
            }
        }

        outcome
    }

    async fn ingest(&self, file: &UploadedFile) -> Result<ReportRecord, IngestionFailureReason> {
        let text = self
            .extractor
            .extract_text(file)
            .await
            .map_err(|e| IngestionFailureReason::Extraction(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(IngestionFailureReason::EmptyText);
        }

        let prompt = prompts::report_structuring_prompt(&text);
        let raw = self.model.generate(&prompt).await.map_err(|e| {
            tracing::error!(file = %file.name, error = %e, "Report structuring call failed");
            IngestionFailureReason::Structuring
        })?;

        parse_report_response(&raw, &text).map_err(|_| IngestionFailureReason::Structuring)
    }
}
