//! 键值持久化后端
//!
//! 同步的 get/set/remove 接口，值为字符串。提供内存实现和基于 redb 的磁盘实现。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use redb::{Database, ReadableTable, TableDefinition};

use crate::translation::error::{TranslationError, TranslationResult};

/// 键值存储接口
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> TranslationResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> TranslationResult<()>;
    fn remove(&self, key: &str) -> TranslationResult<()>;
}

/// 内存存储，克隆后共享同一份数据
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> TranslationResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| TranslationError::StorageError(format!("内存存储锁失效: {}", e)))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> TranslationResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> TranslationResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> TranslationResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

const KV_TABLE: TableDefinition<&str, &str> = TableDefinition::new("libretranslator_kv");

/// 基于 redb 的磁盘存储
pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl RedbStore {
    /// 打开（或创建）数据库文件，并确保表存在
    pub fn open<P: AsRef<Path>>(path: P) -> TranslationResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(&path)?;

        // 初始化表
        let write_txn = db.begin_write()?;
        {
            let _table = write_txn.open_table(KV_TABLE)?;
        }
        write_txn.commit()?;

        tracing::info!("已打开历史数据库: {}", path.display());
        Ok(Self { db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> TranslationResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KV_TABLE)?;
        let value = table.get(key)?.map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> TranslationResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> TranslationResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV_TABLE)?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn KeyValueStore) {
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("uiLanguage", "de").unwrap();
        assert_eq!(store.get("uiLanguage").unwrap().as_deref(), Some("de"));

        store.set("uiLanguage", "zh").unwrap();
        assert_eq!(store.get("uiLanguage").unwrap().as_deref(), Some("zh"));

        store.remove("uiLanguage").unwrap();
        assert_eq!(store.get("uiLanguage").unwrap(), None);

        // 删除不存在的键不是错误
        store.remove("uiLanguage").unwrap();
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        exercise(&store);

        let shared = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(shared.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_redb_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("nested").join("history.redb")).unwrap();
        exercise(&store);
    }

    #[test]
    fn test_redb_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store.set("translationHistory", "[]").unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get("translationHistory").unwrap().as_deref(), Some("[]"));
    }
}
