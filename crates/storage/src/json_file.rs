//! JSON-file record store.
//!
//! A single JSON file holds a flat list of records. Every mutation rewrites
//! the whole file through a temp-file + rename, so a crash mid-write never
//! leaves a half-written store behind. An in-memory mode (no backing file)
//! is available for testing and development.

use crate::error::StorageError;
use crate::Result;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::debug;
use uuid::Uuid;

/// Unique identifier assigned to a record on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generate a new unique record ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A record together with its store-assigned ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    /// Store-assigned identifier.
    pub id: RecordId,
    /// The record payload, flattened alongside the id on disk.
    #[serde(flatten)]
    pub record: T,
}

/// On-disk layout of the store file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct FileContents<T> {
    records: Vec<Stored<T>>,
}

impl<T> Default for FileContents<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

/// A flat-file store of records of type `T`.
///
/// Records are kept in memory behind a mutex and written back to the file
/// after every mutation. Opening a path that does not exist yet starts an
/// empty store; the file is created on first insert.
pub struct JsonFileStore<T> {
    path: Option<PathBuf>,
    records: Mutex<Vec<Stored<T>>>,
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Open a store backed by the given file, loading any existing records.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let contents: FileContents<T> = serde_json::from_str(&content)?;
            contents.records
        } else {
            Vec::new()
        };

        debug!(path = %path.display(), count = records.len(), "Opened record store");

        Ok(Self {
            path: Some(path),
            records: Mutex::new(records),
        })
    }

    /// Create a store with no backing file.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Insert a record, returning its assigned ID.
    pub fn insert(&self, record: T) -> Result<RecordId> {
        let mut records = self.records.lock();
        let id = RecordId::generate();
        records.push(Stored { id, record });
        self.persist(&records)?;
        Ok(id)
    }

    /// Return all records.
    pub fn all(&self) -> Result<Vec<Stored<T>>> {
        Ok(self.records.lock().clone())
    }

    /// Return all records matching the predicate.
    pub fn find<P>(&self, predicate: P) -> Result<Vec<Stored<T>>>
    where
        P: Fn(&T) -> bool,
    {
        Ok(self
            .records
            .lock()
            .iter()
            .filter(|stored| predicate(&stored.record))
            .cloned()
            .collect())
    }

    /// Apply a mutation to every record matching the predicate.
    ///
    /// Returns the number of records updated. Zero matches is not an error.
    pub fn update_where<P, F>(&self, predicate: P, mut apply: F) -> Result<usize>
    where
        P: Fn(&T) -> bool,
        F: FnMut(&mut T),
    {
        let mut records = self.records.lock();
        let mut updated = 0;
        for stored in records.iter_mut() {
            if predicate(&stored.record) {
                apply(&mut stored.record);
                updated += 1;
            }
        }
        if updated > 0 {
            self.persist(&records)?;
        }
        Ok(updated)
    }

    /// Delete the record with the given ID.
    pub fn delete(&self, id: RecordId) -> Result<()> {
        let mut records = self.records.lock();
        let position = records
            .iter()
            .position(|stored| stored.id == id)
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        records.remove(position);
        self.persist(&records)?;
        Ok(())
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Write the full record list back to the backing file, if any.
    fn persist(&self, records: &[Stored<T>]) -> Result<()> {
        let Some(ref path) = self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let contents = FileContents {
            records: records.to_vec(),
        };
        let encoded = serde_json::to_string_pretty(&contents)?;

        // Rename is atomic on the same filesystem; the temp file sits next
        // to the target to stay on it.
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, encoded)?;
        fs::rename(&tmp_path, path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        key: i64,
        body: String,
    }

    fn note(key: i64, body: &str) -> Note {
        Note {
            key,
            body: body.to_string(),
        }
    }

    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("labgate-store-{}", Uuid::new_v4()));
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn file(&self, name: &str) -> PathBuf {
            self.0.join(name)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_insert_and_all() {
        let store = JsonFileStore::in_memory();

        store.insert(note(1, "first")).unwrap();
        store.insert(note(2, "second")).unwrap();

        let all = store.all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].record.body, "first");
    }

    #[test]
    fn test_find_by_predicate() {
        let store = JsonFileStore::in_memory();
        store.insert(note(1, "keep")).unwrap();
        store.insert(note(2, "drop")).unwrap();
        store.insert(note(1, "keep too")).unwrap();

        let found = store.find(|n| n.key == 1).unwrap();
        assert_eq!(found.len(), 2);

        let none = store.find(|n| n.key == 99).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_update_where_counts_matches() {
        let store = JsonFileStore::in_memory();
        store.insert(note(1, "old")).unwrap();
        store.insert(note(2, "old")).unwrap();

        let updated = store
            .update_where(|n| n.key == 1, |n| n.body = "new".to_string())
            .unwrap();
        assert_eq!(updated, 1);

        let found = store.find(|n| n.key == 1).unwrap();
        assert_eq!(found[0].record.body, "new");

        // No matches is not an error
        let updated = store
            .update_where(|n| n.key == 99, |n| n.body = "never".to_string())
            .unwrap();
        assert_eq!(updated, 0);
    }

    #[test]
    fn test_delete() {
        let store = JsonFileStore::in_memory();
        let id = store.insert(note(1, "gone soon")).unwrap();

        store.delete(id).unwrap();
        assert!(store.is_empty());

        let result = store.delete(id);
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new();
        let path = dir.file("notes.json");

        {
            let store = JsonFileStore::open(&path).unwrap();
            store.insert(note(7, "durable")).unwrap();
            store.insert(note(8, "also durable")).unwrap();
        }

        let reopened: JsonFileStore<Note> = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        let found = reopened.find(|n| n.key == 7).unwrap();
        assert_eq!(found[0].record.body, "durable");
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let dir = TempDir::new();
        let path = dir.file("does-not-exist.json");

        let store: JsonFileStore<Note> = JsonFileStore::open(&path).unwrap();
        assert!(store.is_empty());
        // File only appears once something is written
        assert!(!Path::new(&path).exists());
    }

    #[test]
    fn test_open_creates_parent_dirs_on_insert() {
        let dir = TempDir::new();
        let path = dir.file("nested/deeper/notes.json");

        let store = JsonFileStore::open(&path).unwrap();
        store.insert(note(1, "nested")).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_open_corrupt_file_errors() {
        let dir = TempDir::new();
        let path = dir.file("corrupt.json");
        fs::write(&path, "not json at all {").unwrap();

        let result: Result<JsonFileStore<Note>> = JsonFileStore::open(&path);
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_deletion_is_persisted() {
        let dir = TempDir::new();
        let path = dir.file("notes.json");

        let store = JsonFileStore::open(&path).unwrap();
        let id = store.insert(note(1, "temporary")).unwrap();
        store.insert(note(2, "lasting")).unwrap();
        store.delete(id).unwrap();

        let reopened: JsonFileStore<Note> = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.all().unwrap()[0].record.key, 2);
    }
}
