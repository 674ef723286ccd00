use chrono::Utc;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, warn};

// Use shared types
use scorecard_types::ReportEntry;

/// Key under which the report index is persisted.
pub const REPORT_INDEX_KEY: &str = "assessmentReports";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Durable string key-value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Process-local store, used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().map_err(|_| StoreError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a new store at the given path (e.g., "reports/scorecard.db")
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI,
        )?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

/// Whether `ReportIndex::append` stored a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Added,
    Duplicate,
}

/// Append-only catalog of generated reports, kept as one JSON array under
/// [`REPORT_INDEX_KEY`].
///
/// Reads never fail: a missing or unreadable value is treated as an empty
/// index. Writes are last-writer-wins and failures are logged, not raised.
#[derive(Clone)]
pub struct ReportIndex {
    store: Arc<dyn KeyValueStore>,
}

impl ReportIndex {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// All entries in insertion order.
    pub fn load(&self) -> Vec<ReportEntry> {
        let raw = match self.store.get(REPORT_INDEX_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("Failed to read stored reports: {}", err);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Stored report index is unreadable, starting empty: {}", err);
                Vec::new()
            }
        }
    }

    /// Appends `entry` unless an entry with the same report id exists.
    /// Returns the outcome and the index as it stands afterwards.
    pub fn append(&self, entry: ReportEntry) -> (AppendOutcome, Vec<ReportEntry>) {
        let mut entries = self.load();

        if entries.iter().any(|e| e.report_id == entry.report_id) {
            debug!(report_id = %entry.report_id, "report already indexed");
            return (AppendOutcome::Duplicate, entries);
        }

        entries.push(entry);
        self.persist(&entries);
        (AppendOutcome::Added, entries)
    }

    /// Replaces the index with an empty sequence.
    pub fn clear(&self) {
        self.persist(&[]);
    }

    pub fn count(&self) -> usize {
        self.load().len()
    }

    fn persist(&self, entries: &[ReportEntry]) {
        let result = serde_json::to_string(entries)
            .map_err(StoreError::from)
            .and_then(|json| self.store.set(REPORT_INDEX_KEY, &json));

        if let Err(err) = result {
            warn!("Failed to store reports: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> ReportEntry {
        ReportEntry {
            filename: format!("assessment_{id}.html"),
            timestamp: "2024-05-01T10:00:00.000Z".to_string(),
            report_id: id.to_string(),
            overall_score: "7.5".to_string(),
        }
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Poisoned)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    #[test]
    fn test_empty_index_loads_empty() {
        let index = ReportIndex::in_memory();
        assert!(index.load().is_empty());
        assert_eq!(index.count(), 0);
    }

    #[test]
    fn test_append_preserves_order() {
        let index = ReportIndex::in_memory();
        index.append(entry("a"));
        index.append(entry("b"));
        let (outcome, entries) = index.append(entry("c"));
        assert_eq!(outcome, AppendOutcome::Added);
        let ids: Vec<_> = entries.iter().map(|e| e.report_id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(index.load(), entries);
    }

    #[test]
    fn test_append_deduplicates_by_report_id() {
        let index = ReportIndex::in_memory();
        index.append(entry("same"));
        let (outcome, entries) = index.append(entry("same"));
        assert_eq!(outcome, AppendOutcome::Duplicate);
        assert_eq!(entries.len(), 1);
        assert_eq!(index.count(), 1);
    }

    #[test]
    fn test_clear_empties_index() {
        let index = ReportIndex::in_memory();
        index.append(entry("a"));
        index.clear();
        assert!(index.load().is_empty());
    }

    #[test]
    fn test_unreadable_value_degrades_to_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(REPORT_INDEX_KEY, "{not json").unwrap();
        let index = ReportIndex::new(store);
        assert!(index.load().is_empty());

        let (outcome, entries) = index.append(entry("a"));
        assert_eq!(outcome, AppendOutcome::Added);
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_failing_store_never_propagates() {
        let index = ReportIndex::new(Arc::new(FailingStore));
        assert!(index.load().is_empty());
        let (outcome, entries) = index.append(entry("a"));
        assert_eq!(outcome, AppendOutcome::Added);
        assert_eq!(entries.len(), 1);
        index.clear();
    }

    #[test]
    fn test_stored_json_shape() {
        let store = Arc::new(MemoryStore::new());
        let index = ReportIndex::new(store.clone());
        index.append(entry("r1"));
        let raw = store.get(REPORT_INDEX_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["reportId"], "r1");
        assert_eq!(value[0]["filename"], "assessment_r1.html");
    }

    #[test]
    fn test_sqlite_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scorecard.db");

        {
            let index = ReportIndex::new(Arc::new(SqliteStore::open(&path).unwrap()));
            index.append(entry("a"));
            index.append(entry("b"));
        }

        let reopened = ReportIndex::new(Arc::new(SqliteStore::open(&path).unwrap()));
        let ids: Vec<_> = reopened.load().into_iter().map(|e| e.report_id).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_sqlite_set_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("kv.db")).unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
    }
}
