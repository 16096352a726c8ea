use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One data row of a chart: a category field plus arbitrary series fields.
pub type ChartDataPoint = Map<String, Value>;

/// Rendering strategy requested by a chart configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    /// Anything the model produced that is not bar/line/pie.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Describes one series of a chart and how to draw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataKey {
    pub key: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DataKey {
    /// Legend label: the display name if given, otherwise the raw key.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(rename = "type", default)]
    pub kind: ChartKind,
    #[serde(default)]
    pub data: Vec<ChartDataPoint>,
    #[serde(default)]
    pub data_keys: Vec<DataKey>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_x_axis_key")]
    pub x_axis_key: String,
}

fn default_x_axis_key() -> String {
    "name".to_string()
}

/// One economic report, either seeded or structured from an uploaded PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRecord {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    pub summary: String,
    pub key_findings: Vec<String>,
    pub charts: Vec<ChartConfig>,
    #[serde(default)]
    pub full_text: String,
}

impl ReportRecord {
    /// Parsed release date. Accepts `YYYY-MM-DD` or an RFC 3339 timestamp;
    /// anything else (or no date at all) yields `None`.
    pub fn release_date(&self) -> Option<NaiveDate> {
        let raw = self.release_date.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|dt| dt.date_naive())
            })
    }

    /// First `max_chars` characters of the full text.
    pub fn excerpt(&self, max_chars: usize) -> &str {
        match self.full_text.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.full_text[..idx],
            None => &self.full_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with_date(date: Option<&str>) -> ReportRecord {
        ReportRecord {
            id: "r".to_string(),
            title: "R".to_string(),
            release_date: date.map(String::from),
            summary: String::new(),
            key_findings: vec![],
            charts: vec![],
            full_text: "Konjunktur über alles".to_string(),
        }
    }

    #[test]
    fn test_release_date_iso() {
        let report = report_with_date(Some("2024-02-14"));
        assert_eq!(
            report.release_date(),
            NaiveDate::from_ymd_opt(2024, 2, 14)
        );
    }

    #[test]
    fn test_release_date_rfc3339() {
        let report = report_with_date(Some("2024-02-14T10:00:00Z"));
        assert_eq!(
            report.release_date(),
            NaiveDate::from_ymd_opt(2024, 2, 14)
        );
    }

    #[test]
    fn test_release_date_unparseable_or_missing() {
        assert!(report_with_date(Some("sometime in spring")).release_date().is_none());
        assert!(report_with_date(Some("")).release_date().is_none());
        assert!(report_with_date(None).release_date().is_none());
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        let report = report_with_date(None);
        assert_eq!(report.excerpt(12), "Konjunktur ü");
        assert_eq!(report.excerpt(1000), report.full_text);
    }

    #[test]
    fn test_unknown_chart_type_deserializes() {
        let chart: ChartConfig =
            serde_json::from_str(r#"{"type": "scatter", "title": "Dots"}"#).unwrap();
        assert_eq!(chart.kind, ChartKind::Unknown);
        assert_eq!(chart.x_axis_key, "name");
        assert!(chart.data.is_empty());
    }

    #[test]
    fn test_data_key_label_falls_back_to_key() {
        let key: DataKey = serde_json::from_str(r##"{"key": "2024", "color": "#fff"}"##).unwrap();
        assert_eq!(key.label(), "2024");
    }
}
