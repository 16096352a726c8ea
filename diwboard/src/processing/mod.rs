mod extractor;

pub use extractor::{PdfTextExtractor, TextExtractor, UploadedFile, PDF_MIME};
