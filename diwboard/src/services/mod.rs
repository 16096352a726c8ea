pub mod ingestion;
mod merge;
pub mod narrative;
mod storyboard;

pub use ingestion::{select_pdf_files, BatchOutcome, FileSelection, IngestionPipeline, IngestionProgress};
pub use merge::{merge, MergeOutcome};
pub use narrative::{ChatSession, NarrativeService};
pub use storyboard::{StoryboardAssembler, MIN_STORYBOARD_REPORTS};
