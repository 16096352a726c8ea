use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{ReportRecord, StoryboardData};
use crate::services::MergeOutcome;

/// What the main area shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Panel {
    #[default]
    Storyboard,
    KeyActors,
    Highlights,
    AddReport,
    /// A single report, by id. The id may not resolve to anything.
    Report(String),
}

impl Panel {
    pub fn parse(value: &str) -> Self {
        match value {
            "storyboard" => Panel::Storyboard,
            "key_actors" => Panel::KeyActors,
            "highlights" => Panel::Highlights,
            "add_report" => Panel::AddReport,
            id => Panel::Report(id.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Panel::Storyboard => "storyboard",
            Panel::KeyActors => "key_actors",
            Panel::Highlights => "highlights",
            Panel::AddReport => "add_report",
            Panel::Report(id) => id,
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoryboardState {
    pub data: Option<Arc<StoryboardData>>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Action {
    SelectPanel(Panel),
    ReportsMerged(MergeOutcome),
    StoryboardRequested,
    StoryboardReady(StoryboardData),
    StoryboardFailed(String),
}

/// Sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub id: String,
    pub title: String,
    pub release_date: NaiveDate,
    /// e.g. "February 14, 2024"
    pub date_label: String,
    pub summary: String,
}

/// Everything the front end renders from. Updated only through [`AppState::apply`].
#[derive(Debug, Clone, Default)]
pub struct AppState {
    reports: Arc<Vec<ReportRecord>>,
    panel: Panel,
    storyboard: StoryboardState,
}

impl AppState {
    pub fn new(reports: Vec<ReportRecord>) -> Self {
        Self {
            reports: Arc::new(reports),
            ..Self::default()
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SelectPanel(panel) => {
                tracing::debug!(panel = %panel, "Panel selected");
                self.panel = panel;
            }
            Action::ReportsMerged(outcome) => {
                if outcome.changed {
                    self.reports = Arc::new(outcome.merged);
                }
                if let Some(id) = outcome.newly_selected_id {
                    self.panel = Panel::Report(id);
                }
            }
            Action::StoryboardRequested => {
                self.storyboard = StoryboardState {
                    data: None,
                    loading: true,
                    error: None,
                };
            }
            Action::StoryboardReady(data) => {
                self.storyboard = StoryboardState {
                    data: Some(Arc::new(data)),
                    loading: false,
                    error: None,
                };
            }
            Action::StoryboardFailed(message) => {
                self.storyboard = StoryboardState {
                    data: None,
                    loading: false,
                    error: Some(message),
                };
            }
        }
    }

    pub fn reports(&self) -> Arc<Vec<ReportRecord>> {
        Arc::clone(&self.reports)
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn storyboard(&self) -> &StoryboardState {
        &self.storyboard
    }

    pub fn report(&self, id: &str) -> Option<&ReportRecord> {
        self.reports.iter().find(|r| r.id == id)
    }

    /// The report behind the current panel, if it is a report panel and the
    /// id resolves.
    pub fn selected_report(&self) -> Option<&ReportRecord> {
        match &self.panel {
            Panel::Report(id) => self.report(id),
            _ => None,
        }
    }

    /// Newest first; undated reports keep their store order at the end.
    pub fn topics(&self) -> Vec<Topic> {
        let mut sorted: Vec<&ReportRecord> = self.reports.iter().collect();
        sorted.sort_by(|a, b| match (a.release_date(), b.release_date()) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        sorted
            .into_iter()
            .map(|r| Topic {
                id: r.id.clone(),
                title: r.title.clone(),
            })
            .collect()
    }

    /// Dated reports only, newest first.
    pub fn highlights(&self) -> Vec<Highlight> {
        let mut dated: Vec<(NaiveDate, &ReportRecord)> = self
            .reports
            .iter()
            .filter_map(|r| r.release_date().map(|date| (date, r)))
            .collect();
        dated.sort_by(|a, b| b.0.cmp(&a.0));

        dated
            .into_iter()
            .map(|(date, r)| Highlight {
                id: r.id.clone(),
                title: r.title.clone(),
                release_date: date,
                date_label: date.format("%B %-d, %Y").to_string(),
                summary: r.summary.clone(),
            })
            .collect()
    }
}
