//! Untrusted model output → typed values.
//!
//! Every generative-model response passes through here before anything else
//! in the crate touches it.

mod json;
mod schema;

pub use json::extract_json;
pub use schema::{
    parse_report_response, parse_storyboard_response, validate_narrative, validate_report,
    validate_storyboard,
};
