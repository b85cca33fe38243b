//! 存储管理模块
//!
//! - `kv`: 键值存储后端（内存、redb）
//! - `history`: 翻译历史记录
//! - `preferences`: 界面语言偏好

pub mod history;
pub mod kv;
pub mod preferences;

pub use history::{HistoryEntry, HistoryStore};
pub use kv::{KeyValueStore, MemoryStore, RedbStore};
pub use preferences::UiLanguage;
