use std::path::Path;

use async_trait::async_trait;

use crate::error::{DashboardError, Result};

pub const PDF_MIME: &str = "application/pdf";

/// A file handed to the dashboard for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    /// MIME type declared by whoever supplied the file, if any.
    pub mime: Option<String>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    /// Declared MIME type first, then magic bytes, then the file extension.
    pub fn is_pdf(&self) -> bool {
        if let Some(mime) = &self.mime {
            return mime.eq_ignore_ascii_case(PDF_MIME);
        }

        if let Some(kind) = infer::get(&self.bytes) {
            return kind.mime_type() == PDF_MIME;
        }

        Path::new(&self.name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    }
}

/// Turns an uploaded document into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, file: &UploadedFile) -> Result<String>;
}

/// Extracts text page by page; pages are joined by a blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_blocking(bytes: &[u8]) -> Result<String> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
            .map_err(|e| DashboardError::Extraction(format!("PDF extraction failed: {e}")))?;

        let pages: Vec<&str> = pages.iter().map(|page| page.trim()).collect();
        Ok(pages.join("\n\n"))
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_text(&self, file: &UploadedFile) -> Result<String> {
        let bytes = file.bytes.clone();
        let name = file.name.clone();

        let text = tokio::task::spawn_blocking(move || Self::extract_blocking(&bytes))
            .await
            .map_err(|e| DashboardError::Extraction(format!("PDF task panicked: {e}")))??;

        tracing::debug!(file = %name, chars = text.len(), "Extracted PDF text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PDF_HEADER: &[u8] = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n";

    #[test]
    fn test_declared_mime_wins() {
        let file = UploadedFile::new("report.pdf", PDF_HEADER.to_vec()).with_mime("text/plain");
        assert!(!file.is_pdf());

        let file = UploadedFile::new("notes.txt", b"hello".to_vec()).with_mime("application/pdf");
        assert!(file.is_pdf());
    }

    #[test]
    fn test_magic_bytes_detect_pdf() {
        let file = UploadedFile::new("upload.bin", PDF_HEADER.to_vec());
        assert!(file.is_pdf());
    }

    #[test]
    fn test_magic_bytes_reject_other_formats() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        let file = UploadedFile::new("chart.pdf", png.to_vec());
        assert!(!file.is_pdf());
    }

    #[test]
    fn test_extension_fallback() {
        assert!(UploadedFile::new("Weekly.PDF", b"???".to_vec()).is_pdf());
        assert!(!UploadedFile::new("weekly.docx", b"???".to_vec()).is_pdf());
    }

    #[tokio::test]
    async fn test_garbage_bytes_fail_extraction() {
        let file = UploadedFile::new("broken.pdf", b"not a pdf at all".to_vec());
        let result = PdfTextExtractor::new().extract_text(&file).await;
        assert!(matches!(result, Err(DashboardError::Extraction(_))));
    }
}
