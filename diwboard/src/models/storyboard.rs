use serde::{Deserialize, Serialize};

use super::{ChartConfig, RelationshipGraph};

/// A stakeholder the synthesis identified as central to its thesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyActor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Icon class reference, e.g. `fa-solid fa-building-columns`.
    #[serde(default)]
    pub icon: String,
}

/// One AI-generated synthesis across every report in the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardData {
    pub narrative: String,
    pub charts: Vec<ChartConfig>,
    pub introspection: String,
    pub retrospection: String,
    pub relationship_graph: RelationshipGraph,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_actors: Option<Vec<KeyActor>>,
}

impl StoryboardData {
    pub fn key_actors(&self) -> &[KeyActor] {
        self.key_actors.as_deref().unwrap_or(&[])
    }
}
