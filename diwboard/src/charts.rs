//! Turns model-produced chart configurations into render-ready series.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::models::{ChartConfig, ChartDataPoint, ChartKind};

pub const DEFAULT_SLICE_COLOR: &str = "#8884d8";
pub const DEFAULT_PIE_VALUE_KEY: &str = "value";
pub const UNSUPPORTED_CHART_MESSAGE: &str = "Unknown chart type";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub key: String,
    pub label: String,
    pub color: String,
    /// Only set for bar series that share their stack with another series.
    pub stack_id: Option<String>,
    /// One value per category; missing or non-numeric cells are `None`.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: Option<f64>,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Cartesian {
        title: String,
        description: String,
        series_kind: SeriesKind,
        categories: Vec<String>,
        series: Vec<Series>,
    },
    Pie {
        title: String,
        description: String,
        value_key: String,
        slices: Vec<PieSlice>,
    },
    Unsupported {
        title: String,
        message: &'static str,
    },
}

/// Build the render spec for one chart. Unknown chart types yield a
/// placeholder rather than an error.
pub fn adapt(config: &ChartConfig) -> ChartSpec {
    match config.kind {
        ChartKind::Bar => cartesian(config, SeriesKind::Bar),
        ChartKind::Line => cartesian(config, SeriesKind::Line),
        ChartKind::Pie => pie(config),
        ChartKind::Unknown => {
            tracing::debug!(title = %config.title, "Unsupported chart type");
            ChartSpec::Unsupported {
                title: config.title.clone(),
                message: UNSUPPORTED_CHART_MESSAGE,
            }
        }
    }
}

fn cartesian(config: &ChartConfig, series_kind: SeriesKind) -> ChartSpec {
    let categories = config
        .data
        .iter()
        .map(|point| category_label(point, &config.x_axis_key))
        .collect();

    let mut stack_sizes: HashMap<&str, usize> = HashMap::new();
    if series_kind == SeriesKind::Bar {
        for key in &config.data_keys {
            if let Some(stack_id) = key.stack_id.as_deref() {
                *stack_sizes.entry(stack_id).or_default() += 1;
            }
        }
    }

    let series = config
        .data_keys
        .iter()
        .map(|key| Series {
            key: key.key.clone(),
            label: key.label().to_string(),
            color: key.color.clone(),
            stack_id: key
                .stack_id
                .as_deref()
                .filter(|id| stack_sizes.get(id).is_some_and(|&n| n >= 2))
                .map(str::to_string),
            values: config
                .data
                .iter()
                .map(|point| numeric(point.get(&key.key)))
                .collect(),
        })
        .collect();

    ChartSpec::Cartesian {
        title: config.title.clone(),
        description: config.description.clone(),
        series_kind,
        categories,
        series,
    }
}

fn pie(config: &ChartConfig) -> ChartSpec {
    let value_key = config
        .data_keys
        .first()
        .map(|k| k.key.as_str())
        .filter(|k| !k.is_empty())
        .unwrap_or(DEFAULT_PIE_VALUE_KEY)
        .to_string();

    let slices = config
        .data
        .iter()
        .enumerate()
        .map(|(i, point)| PieSlice {
            label: category_label(point, &config.x_axis_key),
            value: numeric(point.get(&value_key)),
            color: slice_color(config, i),
        })
        .collect();

    ChartSpec::Pie {
        title: config.title.clone(),
        description: config.description.clone(),
        value_key,
        slices,
    }
}

fn slice_color(config: &ChartConfig, index: usize) -> String {
    if config.data_keys.is_empty() {
        return DEFAULT_SLICE_COLOR.to_string();
    }
    let color = &config.data_keys[index % config.data_keys.len()].color;
    if color.is_empty() {
        DEFAULT_SLICE_COLOR.to_string()
    } else {
        color.clone()
    }
}

fn category_label(point: &ChartDataPoint, x_axis_key: &str) -> String {
    match point.get(x_axis_key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Numbers pass through; numeric strings such as `"3.5"` are parsed.
fn numeric(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
