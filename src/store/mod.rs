pub mod codec;

use crate::error::{RankerError, Result};
use crate::profile::KindProfile;
use crate::types::item::Item;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// One lock per backing file, shared by every handle in the process.
static FILE_LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

fn file_lock(path: &Path) -> Arc<Mutex<()>> {
    let key = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut locks = FILE_LOCKS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(locks.entry(key).or_default())
}

/// Flat-file record store for one item kind.
///
/// Every read-modify-write cycle runs under the lock of the backing file,
/// so handles opened separately on the same path still serialize. Every
/// write replaces the whole file through a sibling temporary file so a
/// failed write leaves the previous contents intact.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    sub_columns: Vec<String>,
    defaults: Vec<Item>,
    lock: Arc<Mutex<()>>,
}

impl RecordStore {
    pub fn open(data_dir: &Path, profile: &KindProfile) -> Self {
        Self::at(
            data_dir.join(profile.kind.file_name()),
            profile.sub_parameter_columns(),
            profile.defaults.clone(),
        )
    }

    pub fn at(path: PathBuf, sub_columns: Vec<String>, defaults: Vec<Item>) -> Self {
        let lock = file_lock(&path);
        Self {
            path,
            sub_columns,
            defaults,
            lock,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Returns every stored item, seeding the defaults on first access.
    pub fn load(&self) -> Result<Vec<Item>> {
        let _guard = self.guard();
        self.load_locked()
    }

    /// Creates the store with its defaults if absent. Returns whether it seeded.
    pub fn seed(&self) -> Result<bool> {
        let _guard = self.guard();
        if self.exists() {
            return Ok(false);
        }
        self.write_all(&self.defaults)?;
        Ok(true)
    }

    /// Appends one item and rewrites the whole collection.
    pub fn append(&self, item: Item) -> Result<Vec<Item>> {
        let _guard = self.guard();
        let mut items = self.load_locked()?;
        tracing::info!(path = %self.path.display(), name = %item.name, "appending item");
        items.push(item);
        self.write_all(&items)?;
        Ok(items)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load_locked(&self) -> Result<Vec<Item>> {
        if !self.exists() {
            tracing::info!(path = %self.path.display(), count = self.defaults.len(), "seeding store with defaults");
            self.write_all(&self.defaults)?;
            return Ok(self.defaults.clone());
        }
        let file = File::open(&self.path).map_err(|source| self.io_error(source))?;
        let items = codec::read_items(file, &self.path)?;
        tracing::debug!(path = %self.path.display(), count = items.len(), "loaded store");
        Ok(items)
    }

    fn write_all(&self, items: &[Item]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let staging = self.staging_path();
        let result = File::create(&staging)
            .map_err(|source| self.io_error(source))
            .and_then(|file| {
                codec::write_items(BufWriter::new(file), &self.sub_columns, items)
                    .map_err(|err| codec::csv_error(&self.path, err))
            })
            .and_then(|()| fs::rename(&staging, &self.path).map_err(|source| self.io_error(source)));

        if result.is_err() {
            let _ = fs::remove_file(&staging);
        } else {
            tracing::debug!(path = %self.path.display(), count = items.len(), "store written");
        }
        result
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> RankerError {
        RankerError::StoreIo {
            path: self.path.clone(),
            source,
        }
    }
}
