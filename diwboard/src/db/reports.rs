use std::collections::HashSet;

use crate::db::traits::KeyValueStore;
use crate::error::Result;
use crate::models::ReportRecord;

/// Storage key holding the JSON array of user-added reports.
pub const USER_REPORTS_KEY: &str = "diw-dashboard-user-reports";

const SEED_REPORTS_JSON: &str = include_str!("../../data/seed_reports.json");

/// The reports shipped with the dashboard.
pub fn seed_reports() -> Result<Vec<ReportRecord>> {
    Ok(serde_json::from_str(SEED_REPORTS_JSON)?)
}

/// Canonical report set: immutable seed records followed by whatever the
/// user added, the latter persisted under [`USER_REPORTS_KEY`].
pub struct ReportStore<S: KeyValueStore> {
    storage: S,
    seed: Vec<ReportRecord>,
    seed_ids: HashSet<String>,
}

impl<S: KeyValueStore> ReportStore<S> {
    pub fn new(storage: S) -> Result<Self> {
        Ok(Self::with_seed(storage, seed_reports()?))
    }

    pub fn with_seed(storage: S, seed: Vec<ReportRecord>) -> Self {
        let seed_ids = seed.iter().map(|r| r.id.clone()).collect();
        Self {
            storage,
            seed,
            seed_ids,
        }
    }

    pub fn seed(&self) -> &[ReportRecord] {
        &self.seed
    }

    pub fn is_seed(&self, id: &str) -> bool {
        self.seed_ids.contains(id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Make sure the user-report key exists, writing `[]` if it does not.
    pub fn initialize(&self) -> Result<()> {
        if self.storage.get(USER_REPORTS_KEY)?.is_none() {
            tracing::info!(key = USER_REPORTS_KEY, "Initializing empty user report storage");
            self.storage.set(USER_REPORTS_KEY, "[]")?;
        }
        Ok(())
    }

    /// Seed records followed by the persisted user records.
    ///
    /// A corrupted stored value is reset to `[]` instead of failing the load.
    /// Stored records whose id is already taken, by a seed record or an
    /// earlier stored one, are skipped.
    pub fn load(&self) -> Vec<ReportRecord> {
        let mut seen: HashSet<String> = self.seed.iter().map(|r| r.id.clone()).collect();
        let mut reports = self.seed.clone();

        for report in self.load_user_reports() {
            if seen.insert(report.id.clone()) {
                reports.push(report);
            } else {
                tracing::warn!(report_id = %report.id, "Skipping stored report with duplicate id");
            }
        }
        reports
    }

    fn load_user_reports(&self) -> Vec<ReportRecord> {
        let raw = match self.storage.get(USER_REPORTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read user reports");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<ReportRecord>>(&raw) {
            Ok(reports) => reports,
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse user reports, resetting storage");
                if let Err(e) = self.storage.set(USER_REPORTS_KEY, "[]") {
                    tracing::error!(error = %e, "Failed to reset user reports");
                }
                Vec::new()
            }
        }
    }

    /// Persist everything in `reports` that is not a seed record, replacing
    /// the stored value wholesale.
    pub fn save(&self, reports: &[ReportRecord]) -> Result<()> {
        let user_reports: Vec<&ReportRecord> = reports
            .iter()
            .filter(|report| !self.is_seed(&report.id))
            .collect();

        let json = serde_json::to_string(&user_reports)?;
        self.storage.set(USER_REPORTS_KEY, &json)?;
        tracing::info!(count = user_reports.len(), "Saved user reports");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::backends::MemoryStore;

    fn user_report(id: &str) -> ReportRecord {
        ReportRecord {
            id: id.to_string(),
            title: format!("Report {id}"),
            release_date: Some("2024-05-01".to_string()),
            summary: "summary".to_string(),
            key_findings: vec![],
            charts: vec![],
            full_text: "text".to_string(),
        }
    }

    #[test]
    fn test_embedded_seed_parses() {
        let seed = seed_reports().expect("embedded seed must parse");
        assert_eq!(seed.len(), 5);
        let ids: HashSet<_> = seed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 5, "seed ids must be unique");
        assert!(ids.contains("construction"));
    }

    #[test]
    fn test_initialize_writes_empty_array_once() {
        let store = ReportStore::new(MemoryStore::new()).unwrap();
        store.initialize().unwrap();
        assert_eq!(
            store.storage().get(USER_REPORTS_KEY).unwrap().as_deref(),
            Some("[]")
        );

        store.storage().set(USER_REPORTS_KEY, "[ ]").unwrap();
        store.initialize().unwrap();
        assert_eq!(
            store.storage().get(USER_REPORTS_KEY).unwrap().as_deref(),
            Some("[ ]")
        );
    }

    #[test]
    fn test_save_skips_seed_records() {
        let store = ReportStore::new(MemoryStore::new()).unwrap();
        let mut reports = store.load();
        reports.push(user_report("new-report"));

        store.save(&reports).unwrap();

        let raw = store.storage().get(USER_REPORTS_KEY).unwrap().unwrap();
        let persisted: Vec<ReportRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].id, "new-report");

        let reloaded = store.load();
        assert_eq!(reloaded.len(), 6);
        assert_eq!(reloaded.last().unwrap().id, "new-report");
    }

    #[test]
    fn test_load_skips_stored_ids_already_taken() {
        let store = ReportStore::new(MemoryStore::new()).unwrap();
        let stored = vec![
            user_report("construction"),
            user_report("weekly"),
            user_report("weekly"),
        ];
        store
            .storage()
            .set(USER_REPORTS_KEY, &serde_json::to_string(&stored).unwrap())
            .unwrap();

        let reports = store.load();

        assert_eq!(reports.len(), 6);
        let ids: HashSet<_> = reports.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 6);
        let construction = reports.iter().find(|r| r.id == "construction").unwrap();
        assert_ne!(construction.title, "Report construction");
    }

    #[test]
    fn test_corrupted_storage_is_reset() {
        let store = ReportStore::new(MemoryStore::new()).unwrap();
        store.storage().set(USER_REPORTS_KEY, "{not json").unwrap();

        let reports = store.load();

        assert_eq!(reports.len(), 5);
        assert_eq!(
            store.storage().get(USER_REPORTS_KEY).unwrap().as_deref(),
            Some("[]")
        );
    }
}
