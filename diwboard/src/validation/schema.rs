use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{DashboardError, Result};
use crate::models::{ReportRecord, StoryboardData};

use super::json::extract_json;

fn as_object<'a>(json: &'a Value, shape: &str) -> Result<&'a Map<String, Value>> {
    json.as_object()
        .ok_or_else(|| DashboardError::Validation(format!("{shape} must be a JSON object")))
}

fn require_text(object: &Map<String, Value>, field: &str) -> Result<()> {
    match object.get(field).and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => Ok(()),
        Some(_) => Err(DashboardError::Validation(format!("`{field}` is empty"))),
        None => Err(DashboardError::Validation(format!(
            "`{field}` is missing or not a string"
        ))),
    }
}

fn require_array(object: &Map<String, Value>, field: &str) -> Result<()> {
    match object.get(field) {
        Some(Value::Array(_)) => Ok(()),
        Some(_) => Err(DashboardError::Validation(format!(
            "`{field}` must be an array"
        ))),
        None => Err(DashboardError::Validation(format!("`{field}` is missing"))),
    }
}

fn convert<T: DeserializeOwned>(json: Value, shape: &str) -> Result<T> {
    serde_json::from_value(json)
        .map_err(|e| DashboardError::Validation(format!("{shape} has malformed fields: {e}")))
}

/// Check a structured-report payload and attach the source text.
///
/// `id`, `title` and `summary` must be non-empty strings; `keyFindings` and
/// `charts` must be arrays. Any `fullText` the model echoed back is replaced.
pub fn validate_report(json: Value, full_text: &str) -> Result<ReportRecord> {
    let object = as_object(&json, "report")?;
    for field in ["id", "title", "summary"] {
        require_text(object, field)?;
    }
    require_array(object, "keyFindings")?;
    require_array(object, "charts")?;

    let mut json = json;
    if let Value::Object(object) = &mut json {
        object.insert(
            "fullText".to_string(),
            Value::String(full_text.to_string()),
        );
    }

    convert(json, "report")
}

/// Check a storyboard payload: three non-empty prose sections, a `charts`
/// array and a `relationshipGraph` with `nodes` and `edges` arrays.
pub fn validate_storyboard(json: Value) -> Result<StoryboardData> {
    let object = as_object(&json, "storyboard")?;
    for field in ["narrative", "introspection", "retrospection"] {
        require_text(object, field)?;
    }
    require_array(object, "charts")?;

    let graph = object
        .get("relationshipGraph")
        .ok_or_else(|| DashboardError::Validation("`relationshipGraph` is missing".to_string()))?;
    let graph = as_object(graph, "relationshipGraph")?;
    require_array(graph, "nodes")?;
    require_array(graph, "edges")?;

    convert(json, "storyboard")
}

/// Narrative analysis is free markdown; it only has to contain something.
pub fn validate_narrative(raw: &str) -> Result<String> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(DashboardError::Validation(
            "narrative analysis is empty".to_string(),
        ));
    }
    Ok(text.to_string())
}

pub fn parse_report_response(raw: &str, full_text: &str) -> Result<ReportRecord> {
    let json = extract_json(raw)?;
    validate_report(json, full_text).inspect_err(|e| {
        tracing::error!(error = %e, raw_response = %raw, "Report response failed validation");
    })
}

pub fn parse_storyboard_response(raw: &str) -> Result<StoryboardData> {
    let json = extract_json(raw)?;
    validate_storyboard(json).inspect_err(|e| {
        tracing::error!(error = %e, raw_response = %raw, "Storyboard response failed validation");
    })
}
