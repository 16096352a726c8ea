pub mod backends;
mod reports;
pub mod traits;

pub use backends::{FileStore, MemoryStore};
pub use reports::{seed_reports, ReportStore, USER_REPORTS_KEY};
pub use traits::*;
