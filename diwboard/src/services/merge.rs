use std::collections::HashSet;

use crate::models::ReportRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub merged: Vec<ReportRecord>,
    /// Report the UI should navigate to, if any.
    pub newly_selected_id: Option<String>,
    /// Whether `merged` differs from the existing set and must be persisted.
    pub changed: bool,
}

/// Fold newly structured reports into the existing set by id.
///
/// Existing records always win over same-id candidates. When every candidate
/// is a duplicate, the last candidate's id is still selected so the caller
/// lands on the pre-existing record sharing it.
pub fn merge(existing: &[ReportRecord], candidates: Vec<ReportRecord>) -> MergeOutcome {
    let Some(last_candidate_id) = candidates.last().map(|c| c.id.clone()) else {
        return MergeOutcome {
            merged: existing.to_vec(),
            newly_selected_id: None,
            changed: false,
        };
    };

    let mut seen: HashSet<String> = existing.iter().map(|r| r.id.clone()).collect();
    let survivors: Vec<ReportRecord> = candidates
        .into_iter()
        .filter(|candidate| seen.insert(candidate.id.clone()))
        .collect();

    match survivors.last().map(|r| r.id.clone()) {
        Some(selected) => {
            tracing::info!(
                added = survivors.len(),
                selected = %selected,
                "Merged new reports"
            );
            let mut merged = Vec::with_capacity(existing.len() + survivors.len());
            merged.extend_from_slice(existing);
            merged.extend(survivors);
            MergeOutcome {
                merged,
                newly_selected_id: Some(selected),
                changed: true,
            }
        }
        None => {
            tracing::info!(selected = %last_candidate_id, "All candidate reports already present");
            MergeOutcome {
                merged: existing.to_vec(),
                newly_selected_id: Some(last_candidate_id),
                changed: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str, title: &str) -> ReportRecord {
        ReportRecord {
            id: id.to_string(),
            title: title.to_string(),
            release_date: None,
            summary: String::new(),
            key_findings: vec![],
            charts: vec![],
            full_text: String::new(),
        }
    }

    #[test]
    fn test_empty_candidates_is_noop() {
        let existing = vec![report("a", "A")];
        let outcome = merge(&existing, vec![]);
        assert_eq!(outcome.merged, existing);
        assert_eq!(outcome.newly_selected_id, None);
        assert!(!outcome.changed);
    }

    #[test]
    fn test_existing_record_is_never_overwritten() {
        let existing = vec![report("a", "Original")];
        let outcome = merge(&existing, vec![report("a", "Impostor"), report("b", "B")]);

        assert_eq!(outcome.merged.len(), 2);
        assert_eq!(outcome.merged[0].title, "Original");
        assert_eq!(outcome.newly_selected_id.as_deref(), Some("b"));
        assert!(outcome.changed);
    }

    #[test]
    fn test_selects_last_survivor_not_last_candidate() {
        let existing = vec![report("a", "A")];
        let outcome = merge(&existing, vec![report("b", "B"), report("a", "A2")]);
        assert_eq!(outcome.newly_selected_id.as_deref(), Some("b"));
    }

    #[test]
    fn test_duplicate_ids_within_batch_collapse() {
        let outcome = merge(&[], vec![report("x", "First"), report("x", "Second")]);
        assert_eq!(outcome.merged.len(), 1);
        assert_eq!(outcome.merged[0].title, "First");
    }
}
