//! 语言对状态
//!
//! 语言代码是不透明字符串，原样传给翻译接口（`EN-GB`、`ZH-HANS` 等）。
//! 只有 `AUTO` 有特殊含义，且不区分大小写。

use serde::{Deserialize, Serialize};

use crate::translation::config::constants::AUTO;

/// 判断语言代码是否为自动检测
pub fn is_auto(code: &str) -> bool {
    code.trim().eq_ignore_ascii_case(AUTO)
}

/// 可选的源语言（代码, 名称）
pub const SOURCE_LANGUAGES: &[(&str, &str)] = &[
    ("AUTO", "Detect language"),
    ("AR", "Arabic"),
    ("BG", "Bulgarian"),
    ("CS", "Czech"),
    ("DA", "Danish"),
    ("DE", "German"),
    ("EL", "Greek"),
    ("EN", "English"),
    ("ES", "Spanish"),
    ("ET", "Estonian"),
    ("FI", "Finnish"),
    ("FR", "French"),
    ("HU", "Hungarian"),
    ("ID", "Indonesian"),
    ("IT", "Italian"),
    ("JA", "Japanese"),
    ("KO", "Korean"),
    ("LT", "Lithuanian"),
    ("LV", "Latvian"),
    ("NB", "Norwegian"),
    ("NL", "Dutch"),
    ("PL", "Polish"),
    ("PT", "Portuguese"),
    ("RO", "Romanian"),
    ("RU", "Russian"),
    ("SK", "Slovak"),
    ("SL", "Slovenian"),
    ("SV", "Swedish"),
    ("TR", "Turkish"),
    ("UK", "Ukrainian"),
    ("ZH", "Chinese"),
];

/// 可选的目标语言（代码, 名称），包含地区变体
pub const TARGET_LANGUAGES: &[(&str, &str)] = &[
    ("AR", "Arabic"),
    ("BG", "Bulgarian"),
    ("CS", "Czech"),
    ("DA", "Danish"),
    ("DE", "German"),
    ("EL", "Greek"),
    ("EN", "English"),
    ("EN-GB", "English (British)"),
    ("EN-US", "English (American)"),
    ("ES", "Spanish"),
    ("ET", "Estonian"),
    ("FI", "Finnish"),
    ("FR", "French"),
    ("HU", "Hungarian"),
    ("ID", "Indonesian"),
    ("IT", "Italian"),
    ("JA", "Japanese"),
    ("KO", "Korean"),
    ("LT", "Lithuanian"),
    ("LV", "Latvian"),
    ("NB", "Norwegian"),
    ("NL", "Dutch"),
    ("PL", "Polish"),
    ("PT", "Portuguese"),
    ("PT-BR", "Portuguese (Brazilian)"),
    ("PT-PT", "Portuguese (European)"),
    ("RO", "Romanian"),
    ("RU", "Russian"),
    ("SK", "Slovak"),
    ("SL", "Slovenian"),
    ("SV", "Swedish"),
    ("TR", "Turkish"),
    ("UK", "Ukrainian"),
    ("ZH", "Chinese"),
    ("ZH-HANS", "Chinese (Simplified)"),
    ("ZH-HANT", "Chinese (Traditional)"),
];

/// 当前选择的源语言和目标语言
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub source_lang: String,
    pub target_lang: String,
}

impl LanguagePair {
    pub fn new(source_lang: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }

    pub fn source_is_auto(&self) -> bool {
        is_auto(&self.source_lang)
    }

    /// 任意一侧为 AUTO 时不能交换
    pub fn can_swap(&self) -> bool {
        !is_auto(&self.source_lang) && !is_auto(&self.target_lang)
    }

    /// 交换源语言与目标语言，返回是否真的发生了交换
    pub fn swap(&mut self) -> bool {
        if !self.can_swap() {
            tracing::debug!(
                "跳过语言交换: {} -> {} 含有 AUTO",
                self.source_lang,
                self.target_lang
            );
            return false;
        }
        std::mem::swap(&mut self.source_lang, &mut self.target_lang);
        true
    }
}
