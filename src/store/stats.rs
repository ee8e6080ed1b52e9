use std::path::PathBuf;

use anyhow::Result;

use crate::model::QuizResult;
use crate::store::json_store::JsonStore;
use crate::store::schema::{FlagsData, ResultHistoryData};

const RESULTS_FILE: &str = "result_history.json";
const FLAGS_FILE: &str = "flags.json";

/// Local performance history plus best-effort flags. Records are immutable
/// and append-only; aggregation happens elsewhere (`stats::aggregate`) and
/// never touches the stored data.
///
/// Built once per process and handed to whoever needs it — storage is never
/// reached through ambient globals.
pub struct StatsStore {
    store: JsonStore,
}

impl StatsStore {
    pub fn new() -> Result<Self> {
        Ok(Self {
            store: JsonStore::new()?,
        })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        Ok(Self {
            store: JsonStore::with_base_dir(base_dir)?,
        })
    }

    pub fn base_dir(&self) -> &PathBuf {
        self.store.base_dir()
    }

    /// Append one result. Never rejects and never deduplicates — identical
    /// quizzes produce identical entries. A failed write only loses the
    /// entry, it does not disturb the caller.
    pub fn record(&self, result: QuizResult) {
        let mut data: ResultHistoryData = self.store.load(RESULTS_FILE);
        data.results.push(result);
        if let Err(e) = self.store.save(RESULTS_FILE, &data) {
            log::warn!("could not persist quiz result: {e}");
        }
    }

    /// All recorded results, oldest first. Unreadable or corrupt storage
    /// reads as empty.
    pub fn list(&self) -> Vec<QuizResult> {
        let data: ResultHistoryData = self.store.load(RESULTS_FILE);
        data.results
    }

    /// Irreversibly empty the history. Confirmation is the caller's job.
    pub fn clear(&self) {
        if let Err(e) = self.store.save(RESULTS_FILE, &ResultHistoryData::default()) {
            log::warn!("could not clear result history: {e}");
        }
    }

    pub fn banner_dismissed(&self) -> bool {
        let flags: FlagsData = self.store.load(FLAGS_FILE);
        flags.banner_dismissed
    }

    pub fn dismiss_banner(&self) {
        let flags = FlagsData {
            banner_dismissed: true,
        };
        if let Err(e) = self.store.save(FLAGS_FILE, &flags) {
            log::warn!("could not persist banner dismissal: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::fs;
    use tempfile::TempDir;

    fn make_store() -> (TempDir, StatsStore) {
        let dir = TempDir::new().unwrap();
        let store = StatsStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    fn result(subject: &str) -> QuizResult {
        QuizResult {
            subject: subject.to_string(),
            total_questions: 10,
            correct_answers: 6,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn recorded_result_comes_back_unchanged_as_last_element() {
        let (_dir, store) = make_store();
        store.record(result("Português"));
        let latest = result("Direito");
        store.record(latest.clone());

        let listed = store.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed.last(), Some(&latest));
    }

    #[test]
    fn duplicate_results_are_both_kept() {
        let (_dir, store) = make_store();
        let r = result("Português");
        store.record(r.clone());
        store.record(r);
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn clear_then_list_is_empty() {
        let (_dir, store) = make_store();
        store.record(result("Português"));
        store.record(result("Direito"));
        store.clear();
        assert!(store.list().is_empty());
    }

    #[test]
    fn corrupt_history_reads_as_empty() {
        let (dir, store) = make_store();
        fs::write(dir.path().join(RESULTS_FILE), "{\"nope").unwrap();
        assert!(store.list().is_empty());
    }

    #[test]
    fn banner_flag_defaults_false_and_persists() {
        let (_dir, store) = make_store();
        assert!(!store.banner_dismissed());
        store.dismiss_banner();
        assert!(store.banner_dismissed());
    }

    #[test]
    fn recording_after_corruption_starts_fresh() {
        let (dir, store) = make_store();
        fs::write(dir.path().join(RESULTS_FILE), "garbage").unwrap();
        store.record(result("Português"));
        assert_eq!(store.list().len(), 1);
    }
}
