//! redb-backed preferences store

use redb::{Database, ReadableDatabase, TableDefinition};
use shared::preferences::Preferences;
use shared::storage::{KeyValueStore, StorageError, StorageKey, StorageResult};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Preferences table: key = namespaced key, value = raw string
const PREFERENCES_TABLE: TableDefinition<&str, &str> = TableDefinition::new("preferences");

#[derive(Debug, Error)]
pub enum RedbStoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),
}

impl From<RedbStoreError> for StorageError {
    fn from(err: RedbStoreError) -> Self {
        StorageError::Backend(err.to_string())
    }
}

/// Persistent key-value store in a single redb file
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create database
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RedbStoreError> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, RedbStoreError> {
        let db =
            Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> Result<Self, RedbStoreError> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PREFERENCES_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    fn read(&self, key: &str) -> Result<Option<String>, RedbStoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PREFERENCES_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_string()))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), RedbStoreError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(PREFERENCES_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, RedbStoreError> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut table = write_txn.open_table(PREFERENCES_TABLE)?;
            let removed = table.remove(key)?;
            removed.is_some()
        };
        write_txn.commit()?;
        Ok(existed)
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &StorageKey) -> StorageResult<Option<String>> {
        Ok(self.read(&key.as_key())?)
    }

    fn set(&self, key: &StorageKey, value: &str) -> StorageResult<()> {
        Ok(self.write(&key.as_key(), value)?)
    }

    fn remove(&self, key: &StorageKey) -> StorageResult<bool> {
        Ok(self.delete(&key.as_key())?)
    }
}

/// Open persisted preferences at `path`
pub fn open_preferences(path: impl AsRef<Path>) -> Result<Preferences<RedbStore>, RedbStoreError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "Opening preferences store");
    Ok(Preferences::new(RedbStore::open(path)?))
}
