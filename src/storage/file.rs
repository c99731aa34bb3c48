use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use super::{KeyValueStore, StorageError};

const STORAGE_FILE: &str = "storage.json";
const LOCK_FILE: &str = "storage.lock";

/// Durable store backed by a single JSON object on disk.
///
/// Every write is a locked read-modify-write followed by an atomic rename,
/// so concurrent processes never observe a half-written file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

type Entries = BTreeMap<String, String>;

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the JSON file holding the entries.
    pub fn path(&self) -> PathBuf {
        self.dir.join(STORAGE_FILE)
    }

    fn lock(&self, exclusive: bool) -> Result<Option<File>, StorageError> {
        let lock_path = self.dir.join(LOCK_FILE);
        if !exclusive && !self.dir.exists() {
            return Ok(None);
        }
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| StorageError::Io {
                path: lock_path.clone(),
                source: e,
            })?;

        let locked = if exclusive {
            FileExt::lock_exclusive(&file)
        } else {
            FileExt::lock_shared(&file)
        };
        locked.map_err(|e| StorageError::Lock {
            path: lock_path,
            source: e,
        })?;

        // Released when the handle is dropped.
        Ok(Some(file))
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        let path = self.path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(StorageError::Io { path, source: e }),
        };
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }
        serde_json::from_str(&content).map_err(|e| StorageError::Corrupt { path, source: e })
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        let path = self.path();
        let tmp = self.dir.join(format!("{}.tmp", STORAGE_FILE));
        let content = serde_json::to_string_pretty(entries).map_err(|e| StorageError::Corrupt {
            path: path.clone(),
            source: e,
        })?;
        write_then_rename(&tmp, &path, &content)
    }

    fn modify(&self, f: impl FnOnce(&mut Entries) -> bool) -> Result<(), StorageError> {
        let _lock = self.lock(true)?;
        let mut entries = self.read_entries()?;
        if f(&mut entries) {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

fn write_then_rename(tmp: &Path, dest: &Path, content: &str) -> Result<(), StorageError> {
    fs::write(tmp, content).map_err(|e| StorageError::Io {
        path: tmp.to_path_buf(),
        source: e,
    })?;
    fs::rename(tmp, dest).map_err(|e| StorageError::Io {
        path: dest.to_path_buf(),
        source: e,
    })
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _lock = self.lock(false)?;
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.modify(|entries| entries.remove(key).is_some())
    }
}
