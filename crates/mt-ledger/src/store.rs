// store.rs — StateStore: the single source of truth for both dashboards.
//
// Holds the target and activity collections plus the selected month. The
// store never edits a record in place: lifecycle operations compute a new
// `Ledger` from a snapshot and the store swaps whole collections in.
//
// A snapshot can be exported to (and imported from) pretty JSON for
// inspection; the store itself keeps nothing on disk.

use std::fs;
use std::path::Path;

use crate::activity::{Activity, ActivityId};
use crate::error::LedgerError;
use crate::lifecycle::Ledger;
use crate::month::Month;
use crate::target::{Target, TargetId, TargetStatus};

/// In-memory store shared by every surface.
#[derive(Debug, Clone)]
pub struct StateStore {
    targets: Vec<Target>,
    activities: Vec<Activity>,
    selected_month: Month,
}

impl StateStore {
    /// An empty store with the given month selected.
    pub fn new(selected_month: Month) -> Self {
        Self {
            targets: Vec::new(),
            activities: Vec::new(),
            selected_month,
        }
    }

    /// A store pre-loaded with `ledger`.
    pub fn with_ledger(ledger: Ledger, selected_month: Month) -> Self {
        Self {
            targets: ledger.targets,
            activities: ledger.activities,
            selected_month,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn selected_month(&self) -> Month {
        self.selected_month
    }

    pub fn target(&self, id: &TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| &t.id == id)
    }

    pub fn activity(&self, id: &ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| &a.id == id)
    }

    /// Owned copy of both collections, for lifecycle operations to compute from.
    pub fn snapshot(&self) -> Ledger {
        Ledger::new(self.targets.clone(), self.activities.clone())
    }

    pub fn replace_targets(&mut self, targets: Vec<Target>) {
        self.targets = targets;
    }

    pub fn replace_activities(&mut self, activities: Vec<Activity>) {
        self.activities = activities;
    }

    /// Replace both collections at once.
    pub fn commit(&mut self, ledger: Ledger) {
        self.targets = ledger.targets;
        self.activities = ledger.activities;
    }

    pub fn select_month(&mut self, month: Month) {
        self.selected_month = month;
    }

    /// Targets owned by `agent` in `month`, any status.
    pub fn targets_for(&self, agent: &str, month: Month) -> Vec<&Target> {
        self.targets
            .iter()
            .filter(|t| t.agent == agent && t.month == month)
            .collect()
    }

    /// Targets still awaiting `agent`'s response, across all months.
    pub fn pending_for(&self, agent: &str) -> Vec<&Target> {
        self.targets
            .iter()
            .filter(|t| t.agent == agent && t.status == TargetStatus::Pending)
            .collect()
    }

    /// Activities scheduled in `month`, most recent first.
    pub fn activities_in(&self, month: Month) -> Vec<&Activity> {
        self.activities
            .iter()
            .filter(|a| month.contains(a.date))
            .collect()
    }

    /// Write the current collections to `path` as pretty JSON.
    pub fn export_json(&self, path: impl AsRef<Path>) -> Result<(), LedgerError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        fs::write(path, json).map_err(LedgerError::io(path))
    }

    /// Read a ledger previously written by [`export_json`](Self::export_json).
    pub fn import_json(path: impl AsRef<Path>) -> Result<Ledger, LedgerError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(LedgerError::io(path))?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityDetails;
    use crate::target::TargetCategory;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn month(s: &str) -> Month {
        s.parse().unwrap()
    }

    fn sample_store() -> StateStore {
        let mut pending = Target::new("张三", month("2026-02"), TargetCategory::TrainingMeeting, 4);
        pending.id = TargetId::new("p1");
        let mut accepted =
            Target::new("张三", month("2026-01"), TargetCategory::OneOnOneInterview, 20);
        accepted.status = TargetStatus::Accepted;
        let other = Target::new("李四", month("2026-01"), TargetCategory::TrainingMeeting, 10);

        let jan = Activity::new(
            "张三",
            "jan",
            "早会",
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            ActivityDetails::blank(crate::ActivityKind::Meeting),
        );
        let dec = Activity::new(
            "张三",
            "dec",
            "面谈",
            NaiveDate::from_ymd_opt(2025, 12, 30).unwrap(),
            ActivityDetails::blank(crate::ActivityKind::Interview),
        );

        StateStore::with_ledger(
            Ledger::new(vec![pending, accepted, other], vec![jan, dec]),
            month("2026-01"),
        )
    }

    #[test]
    fn filters_by_agent_month_and_status() {
        let store = sample_store();
        assert_eq!(store.targets_for("张三", month("2026-01")).len(), 1);
        assert_eq!(store.pending_for("张三").len(), 1);
        assert_eq!(store.pending_for("张三")[0].id, TargetId::new("p1"));
        assert_eq!(store.pending_for("王五").len(), 0);

        let jan = store.activities_in(month("2026-01"));
        assert_eq!(jan.len(), 1);
        assert_eq!(jan[0].title, "jan");
    }

    #[test]
    fn commit_replaces_whole_collections() {
        let mut store = sample_store();
        let mut next = store.snapshot();
        next.targets.truncate(1);
        next.activities.clear();
        store.commit(next);
        assert_eq!(store.targets().len(), 1);
        assert!(store.activities().is_empty());
    }

    #[test]
    fn snapshot_is_detached_from_store() {
        let store = sample_store();
        let mut snap = store.snapshot();
        snap.targets.clear();
        assert_eq!(store.targets().len(), 3);
    }

    #[test]
    fn select_month_changes_scope() {
        let mut store = sample_store();
        store.select_month(month("2025-12"));
        assert_eq!(store.selected_month(), month("2025-12"));
        assert_eq!(store.activities_in(store.selected_month()).len(), 1);
    }

    #[test]
    fn export_and_import_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let store = sample_store();
        store.export_json(&path).unwrap();

        let ledger = StateStore::import_json(&path).unwrap();
        assert_eq!(ledger, store.snapshot());
    }

    #[test]
    fn import_missing_file_reports_path() {
        let dir = tempdir().unwrap();
        let result = StateStore::import_json(dir.path().join("absent.json"));
        assert!(matches!(result, Err(LedgerError::IoError { ref path, .. }) if path.ends_with("absent.json")));
    }
}
