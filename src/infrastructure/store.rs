//! 键值存储 - 基础设施层
//!
//! 外部应用的两种持久化方案（文档数据库集合 / 平面结构化文件）统一抽象为 get/put，
//! 核心逻辑和测试不依赖具体选择。

use crate::error::StoreError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use tracing::debug;

/// 按键读写字符串值的存储能力
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// 进程内存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.write()?.insert(key.to_string(), value);
        Ok(())
    }
}

/// TOML 平面文件存储
///
/// 整个文件是一张字符串值的表；每次 put 先写临时文件再 rename 覆盖。
pub struct TomlFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl TomlFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::ReadFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        toml::from_str(&content).map_err(|e| StoreError::Malformed {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn write_table(&self, table: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let content = toml::to_string(table).map_err(|e| StoreError::Malformed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        let tmp_path = self.path.with_extension("toml.tmp");
        let write_failed = |source| StoreError::WriteFailed {
            path: self.path.clone(),
            source,
        };
        std::fs::write(&tmp_path, content).map_err(write_failed)?;
        std::fs::rename(&tmp_path, &self.path).map_err(write_failed)?;
        Ok(())
    }
}

impl KeyValueStore for TomlFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_table()?.remove(key))
    }

    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        // 读-改-写需要串行，避免并发 put 丢失更新
        let _guard = self.write_lock.lock()?;
        let mut table = self.read_table()?;
        table.insert(key.to_string(), value);
        self.write_table(&table)?;
        debug!("写入存储: {} ({} 个键)", self.path.display(), table.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_put() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.put("k", "v1".to_string()).unwrap();
        store.put("k", "v2".to_string()).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_toml_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.toml");

        let store = TomlFileStore::new(&path);
        assert_eq!(store.get("scores/a@b.c").unwrap(), None);
        store.put("scores/a@b.c", "[1, 2]".to_string()).unwrap();
        store.put("other", "x".to_string()).unwrap();

        let reopened = TomlFileStore::new(&path);
        assert_eq!(
            reopened.get("scores/a@b.c").unwrap().as_deref(),
            Some("[1, 2]")
        );
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_toml_store_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let err = TomlFileStore::new(&path).get("k").unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }
}
