use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::error;

use super::StoreError;

/// One JSON-array-on-disk collection.
///
/// Every access goes through the internal mutex, so a read-modify-write
/// cycle performed inside [`JsonFile::mutate`] is atomic with respect to
/// other callers on the same collection. Ids come from a counter seeded
/// with the highest id present at load time.
pub struct JsonFile<T> {
    path: PathBuf,
    state: Mutex<FileState<T>>,
}

struct FileState<T> {
    records: Vec<T>,
    next_id: i64,
}

impl<T> JsonFile<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    pub async fn open(path: impl Into<PathBuf>, id_of: fn(&T) -> i64) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let records = Self::load(&path).await;
        let next_id = records.iter().map(id_of).max().unwrap_or(0) + 1;

        Ok(Self {
            path,
            state: Mutex::new(FileState { records, next_id }),
        })
    }

    /// Reads the collection from disk. A missing file is an empty
    /// collection; an unreadable or corrupt file is logged and treated the
    /// same way, so callers never see a read error.
    async fn load(path: &Path) -> Vec<T> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                error!("Failed to read {}: {e}", path.display());
                return Vec::new();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to parse {}: {e}", path.display());
                Vec::new()
            }
        }
    }

    /// Clones the current records out under the lock.
    pub async fn snapshot(&self) -> Vec<T> {
        self.state.lock().await.records.clone()
    }

    pub async fn find<P>(&self, pred: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.state
            .lock()
            .await
            .records
            .iter()
            .find(|r| pred(r))
            .cloned()
    }

    /// Runs `f` against the records under the lock, then rewrites the whole
    /// file as pretty-printed JSON.
    pub async fn mutate<R>(&self, f: impl FnOnce(&mut Rows<'_, T>) -> R) -> Result<R, StoreError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let out = {
            let mut rows = Rows {
                records: &mut state.records,
                next_id: &mut state.next_id,
            };
            f(&mut rows)
        };

        let json = serde_json::to_vec_pretty(&state.records)?;
        tokio::fs::write(&self.path, json).await?;

        Ok(out)
    }
}

/// Mutable view over a collection, handed to [`JsonFile::mutate`] closures.
pub struct Rows<'a, T> {
    records: &'a mut Vec<T>,
    next_id: &'a mut i64,
}

impl<T> Rows<'_, T> {
    /// Hands out the next sequential id. Safe under concurrency because the
    /// collection lock is held for the whole `mutate` call.
    pub fn allocate_id(&mut self) -> i64 {
        let id = *self.next_id;
        *self.next_id += 1;
        id
    }

    pub fn push(&mut self, record: T) {
        self.records.push(record);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.records.iter_mut()
    }
}
