//! 翻译历史记录
//!
//! 最新的记录在前，超出上限时淘汰最旧的记录。整个列表以一个 JSON 数组
//! 保存在 `translationHistory` 键下，每次修改后整体覆盖写入。

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::kv::KeyValueStore;
use crate::translation::config::constants::HISTORY_KEY;
use crate::translation::core::collaborators::Confirm;
use crate::translation::core::language::is_auto;
use crate::translation::error::{helpers, TranslationError, TranslationResult};
use crate::utils::is_blank;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: u64,
    pub source_text: String,
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub timestamp: DateTime<Utc>,
}

pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<HistoryEntry>,
    limit: usize,
    last_id: u64,
    last_persist_error: Option<TranslationError>,
}

impl HistoryStore {
    /// 从存储中加载历史
    ///
    /// 数据损坏或读取失败时从空列表开始，不会返回错误。
    pub fn load(store: Arc<dyn KeyValueStore>, limit: usize) -> Self {
        let entries = match store.get(HISTORY_KEY) {
            Ok(Some(blob)) => match parse_blob(&blob) {
                Ok(mut entries) => {
                    entries.truncate(limit);
                    tracing::info!("已加载 {} 条历史记录", entries.len());
                    entries
                }
                Err(e) => {
                    helpers::log_error(&e);
                    if let Err(e) = store.remove(HISTORY_KEY) {
                        helpers::log_error(&e);
                    }
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                helpers::log_error(&e.with_context("读取历史记录"));
                Vec::new()
            }
        };

        let last_id = entries.iter().map(|e| e.id).max().unwrap_or(0);
        Self {
            store,
            entries,
            limit,
            last_id,
            last_persist_error: None,
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn get(&self, id: u64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// 最近一次持久化失败（成功写入后清除）
    pub fn last_persist_error(&self) -> Option<&TranslationError> {
        self.last_persist_error.as_ref()
    }

    /// 记录一次成功的翻译，返回新记录的 id
    ///
    /// 源语言为 AUTO 且接口返回了检测结果时，记录检测到的语言。
    pub fn record(
        &mut self,
        source_text: &str,
        translated_text: &str,
        source_lang: &str,
        target_lang: &str,
        detected_language: Option<&str>,
    ) -> Option<u64> {
        if is_blank(source_text) || is_blank(translated_text) {
            return None;
        }

        let source_lang = match detected_language {
            Some(detected) if is_auto(source_lang) => detected,
            _ => source_lang,
        };

        let timestamp = Utc::now();
        let id = self.next_id(timestamp);
        self.entries.insert(
            0,
            HistoryEntry {
                id,
                source_text: source_text.to_string(),
                translated_text: translated_text.to_string(),
                source_lang: source_lang.to_string(),
                target_lang: target_lang.to_string(),
                timestamp,
            },
        );
        self.entries.truncate(self.limit);

        tracing::debug!("记录历史 #{}, 共 {} 条", id, self.entries.len());
        self.persist_logged();
        Some(id)
    }

    /// 清空历史（需要确认）
    pub fn clear(&mut self, confirm: &dyn Confirm) -> bool {
        if !confirm.confirm("clearHistory") {
            tracing::debug!("用户取消清空历史");
            return false;
        }

        self.entries.clear();
        match self.store.remove(HISTORY_KEY) {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                helpers::log_error(&e);
                self.last_persist_error = Some(e);
            }
        }
        tracing::info!("历史记录已清空");
        true
    }

    /// 整体写入存储
    pub fn persist(&self) -> TranslationResult<()> {
        let blob = serde_json::to_string(&self.entries)?;
        self.store.set(HISTORY_KEY, &blob)
    }

    fn persist_logged(&mut self) {
        match self.persist() {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                let e = e.with_context("保存历史记录");
                helpers::log_error(&e);
                self.last_persist_error = Some(e);
            }
        }
    }

    /// 毫秒时间戳作为 id，时钟未前进时顺延
    fn next_id(&mut self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last_id.saturating_add(1));
        self.last_id = id;
        id
    }
}

/// 解析持久化的历史列表
///
/// id 已到 `u64::MAX` 的列表无法再分配更大的 id，按损坏处理。
fn parse_blob(blob: &str) -> TranslationResult<Vec<HistoryEntry>> {
    let entries: Vec<HistoryEntry> = serde_json::from_str(blob)
        .map_err(|e| TranslationError::PersistenceCorruption(e.to_string()))?;
    if entries.iter().any(|entry| entry.id == u64::MAX) {
        return Err(TranslationError::PersistenceCorruption(
            "历史记录 id 已达上限".to_string(),
        ));
    }
    Ok(entries)
}
