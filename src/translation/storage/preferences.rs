//! 界面语言偏好
//!
//! 优先使用已保存的 `uiLanguage`，否则根据系统区域设置的主语言子标签推断，
//! 都无法识别时使用英语。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::kv::KeyValueStore;
use crate::translation::config::constants::UI_LANGUAGE_KEY;
use crate::translation::error::{helpers, TranslationError, TranslationResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiLanguage {
    #[default]
    En,
    Zh,
    De,
}

impl UiLanguage {
    pub const ALL: [UiLanguage; 3] = [UiLanguage::En, UiLanguage::Zh, UiLanguage::De];

    pub fn code(&self) -> &'static str {
        match self {
            UiLanguage::En => "en",
            UiLanguage::Zh => "zh",
            UiLanguage::De => "de",
        }
    }

    /// 从区域设置推断（`zh-CN`、`de_DE.UTF-8`、`en` 等）
    pub fn from_locale(locale: &str) -> Option<Self> {
        let primary = locale
            .split(['-', '_', '.', '@'])
            .next()
            .unwrap_or_default();
        primary.parse().ok()
    }

    /// 启动时确定界面语言
    pub fn resolve(store: &dyn KeyValueStore, locale: Option<&str>) -> Self {
        match store.get(UI_LANGUAGE_KEY) {
            Ok(Some(saved)) => match saved.parse() {
                Ok(lang) => return lang,
                Err(e) => helpers::log_error(&e),
            },
            Ok(None) => {}
            Err(e) => helpers::log_error(&e),
        }

        locale
            .and_then(Self::from_locale)
            .unwrap_or_default()
    }

    /// 保存界面语言
    pub fn persist(&self, store: &dyn KeyValueStore) -> TranslationResult<()> {
        store.set(UI_LANGUAGE_KEY, self.code())
    }
}

impl FromStr for UiLanguage {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(UiLanguage::En),
            "zh" => Ok(UiLanguage::Zh),
            "de" => Ok(UiLanguage::De),
            other => Err(TranslationError::InvalidInput(format!(
                "不支持的界面语言: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for UiLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::storage::kv::MemoryStore;

    #[test]
    fn test_from_locale() {
        assert_eq!(UiLanguage::from_locale("zh-CN"), Some(UiLanguage::Zh));
        assert_eq!(UiLanguage::from_locale("de_DE.UTF-8"), Some(UiLanguage::De));
        assert_eq!(UiLanguage::from_locale("EN"), Some(UiLanguage::En));
        assert_eq!(UiLanguage::from_locale("fr-FR"), None);
        assert_eq!(UiLanguage::from_locale(""), None);
    }

    #[test]
    fn test_resolve_prefers_saved_value() {
        let store = MemoryStore::new();
        store.set(UI_LANGUAGE_KEY, "de").unwrap();
        assert_eq!(UiLanguage::resolve(&store, Some("zh-CN")), UiLanguage::De);
    }

    #[test]
    fn test_resolve_falls_back_to_locale_then_english() {
        let store = MemoryStore::new();
        assert_eq!(UiLanguage::resolve(&store, Some("zh-TW")), UiLanguage::Zh);
        assert_eq!(UiLanguage::resolve(&store, Some("ja-JP")), UiLanguage::En);
        assert_eq!(UiLanguage::resolve(&store, None), UiLanguage::En);

        store.set(UI_LANGUAGE_KEY, "klingon").unwrap();
        assert_eq!(UiLanguage::resolve(&store, Some("de-AT")), UiLanguage::De);
    }

    #[test]
    fn test_persist() {
        let store = MemoryStore::new();
        UiLanguage::Zh.persist(&store).unwrap();
        assert_eq!(store.get(UI_LANGUAGE_KEY).unwrap().as_deref(), Some("zh"));
    }
}
