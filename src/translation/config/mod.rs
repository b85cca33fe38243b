//! 翻译配置管理模块
//!
//! 提供简化的配置管理，支持环境变量、配置文件和默认值

pub mod manager;

// 重新导出主要类型
pub use manager::{ConfigManager, DebounceConfig, TokenPlacement, TranslatorConfig};

/// 配置常量
pub mod constants {
    use std::time::Duration;

    // 防抖相关
    pub const DEBOUNCE_BASE_MS: u64 = 600;
    pub const DEBOUNCE_SIZE_DIVISOR: u64 = 20;
    pub const DEBOUNCE_PER_CHUNK_MS: u64 = 100;
    pub const DEBOUNCE_MIN_MS: u64 = 600;
    pub const DEBOUNCE_MAX_MS: u64 = 1500;

    // 界面相关
    pub const STATUS_TIMEOUT: Duration = Duration::from_millis(2000);

    // 默认API设置
    pub const DEFAULT_API_URL: &str = "http://localhost:1188/translate";
    pub const DEFAULT_SOURCE_LANG: &str = "ZH";
    pub const DEFAULT_TARGET_LANG: &str = "EN";
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

    // 自动检测源语言
    pub const AUTO: &str = "AUTO";

    // 历史记录
    pub const HISTORY_LIMIT: usize = 50;
    pub const HISTORY_DB_FILE: &str = "history.redb";

    // 持久化键名
    pub const HISTORY_KEY: &str = "translationHistory";
    pub const UI_LANGUAGE_KEY: &str = "uiLanguage";

    // 配置文件搜索路径
    pub const CONFIG_PATHS: &[&str] = &[
        "libretranslator.toml",
        "libretranslator.json",
        ".libretranslator.toml",
        "~/.config/libretranslator/config.toml",
        "/etc/libretranslator/config.toml",
    ];
}
