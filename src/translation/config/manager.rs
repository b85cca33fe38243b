//! 简化的配置管理器
//!
//! 提供统一的配置接口，支持文件配置、环境变量和默认值

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::constants;
use crate::translation::core::language;
use crate::translation::error::{TranslationError, TranslationResult};

/// 防抖延迟参数
///
/// `delay = clamp(base + floor(chars / size_divisor) * per_chunk, min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DebounceConfig {
    pub base_ms: u64,
    pub size_divisor: u64,
    pub per_chunk_ms: u64,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            base_ms: constants::DEBOUNCE_BASE_MS,
            size_divisor: constants::DEBOUNCE_SIZE_DIVISOR,
            per_chunk_ms: constants::DEBOUNCE_PER_CHUNK_MS,
            min_ms: constants::DEBOUNCE_MIN_MS,
            max_ms: constants::DEBOUNCE_MAX_MS,
        }
    }
}

impl DebounceConfig {
    pub fn validate(&self) -> TranslationResult<()> {
        if self.size_divisor == 0 {
            return Err(TranslationError::ConfigError("防抖字符分档不能为0".to_string()));
        }
        if self.min_ms > self.max_ms {
            return Err(TranslationError::ConfigError(format!(
                "防抖下限 {}ms 大于上限 {}ms",
                self.min_ms, self.max_ms
            )));
        }
        Ok(())
    }
}

/// 访问令牌的发送位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPlacement {
    /// `Authorization: Bearer <token>`
    #[default]
    Header,
    /// `?token=<token>`
    Query,
}

/// 翻译前端配置
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslatorConfig {
    // 接口配置
    pub api_url: String,
    pub access_token: Option<String>,
    pub token_placement: TokenPlacement,
    pub request_timeout_secs: u64,

    // 语言配置
    pub source_lang: String,
    pub target_lang: String,
    pub auto_translate: bool,

    // 界面配置
    pub status_timeout_ms: u64,
    pub locale: Option<String>,

    // 历史配置
    pub history_limit: usize,
    pub history_path: Option<PathBuf>,

    // 访问口令
    pub access_password: Option<String>,

    // 防抖配置
    pub debounce: DebounceConfig,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            api_url: constants::DEFAULT_API_URL.to_string(),
            access_token: None,
            token_placement: TokenPlacement::Header,
            request_timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT.as_secs(),

            source_lang: constants::DEFAULT_SOURCE_LANG.to_string(),
            target_lang: constants::DEFAULT_TARGET_LANG.to_string(),
            auto_translate: false,

            status_timeout_ms: constants::STATUS_TIMEOUT.as_millis() as u64,
            locale: None,

            history_limit: constants::HISTORY_LIMIT,
            history_path: None,

            access_password: None,

            debounce: DebounceConfig::default(),
        }
    }
}

impl TranslatorConfig {
    /// 验证配置
    pub fn validate(&self) -> TranslationResult<()> {
        let url = url::Url::parse(&self.api_url)
            .map_err(|e| TranslationError::ConfigError(format!("无效的 API URL '{}': {}", self.api_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TranslationError::ConfigError(format!(
                "API URL 只支持 http/https: {}",
                self.api_url
            )));
        }

        if self.target_lang.trim().is_empty() {
            return Err(TranslationError::ConfigError("目标语言不能为空".to_string()));
        }

        if language::is_auto(&self.target_lang) {
            return Err(TranslationError::ConfigError("目标语言不能为 AUTO".to_string()));
        }

        if self.source_lang.trim().is_empty() {
            return Err(TranslationError::ConfigError("源语言不能为空".to_string()));
        }

        if self.request_timeout_secs == 0 {
            return Err(TranslationError::ConfigError("请求超时必须大于0".to_string()));
        }

        if self.history_limit == 0 {
            return Err(TranslationError::ConfigError("历史记录上限不能为0".to_string()));
        }

        if self.status_timeout_ms == 0 {
            return Err(TranslationError::ConfigError("提示显示时间必须大于0".to_string()));
        }

        self.debounce.validate()
    }

    /// 应用环境变量覆盖（使用类型安全环境变量系统）
    ///
    /// 只覆盖显式设置的变量；无法解析的值会记录警告并保留原值。
    pub fn apply_env_overrides(&mut self) {
        use crate::env::{debounce, history, security, translation, ui, EnvVar};

        fn explicit<T, V: EnvVar<T>>() -> Option<T> {
            std::env::var(V::NAME).ok()?;
            match V::get() {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("忽略无效的环境变量: {}", e);
                    None
                }
            }
        }

        // 翻译接口
        if let Some(api_url) = explicit::<String, translation::ApiUrl>() {
            self.api_url = api_url;
            tracing::info!("环境变量覆盖 API URL: {}", self.api_url);
        }
        if let Some(token) = explicit::<String, translation::AccessToken>() {
            self.access_token = Some(token);
        }
        if let Some(source_lang) = explicit::<String, translation::SourceLang>() {
            self.source_lang = source_lang;
        }
        if let Some(target_lang) = explicit::<String, translation::TargetLang>() {
            self.target_lang = target_lang;
        }
        if let Some(auto) = explicit::<bool, translation::AutoTranslate>() {
            self.auto_translate = auto;
        }
        if let Some(timeout) = explicit::<Duration, translation::RequestTimeout>() {
            self.request_timeout_secs = timeout.as_secs();
        }

        // 防抖
        if let Some(base) = explicit::<u64, debounce::BaseDelay>() {
            self.debounce.base_ms = base;
        }
        if let Some(divisor) = explicit::<u64, debounce::SizeDivisor>() {
            self.debounce.size_divisor = divisor;
        }
        if let Some(per_chunk) = explicit::<u64, debounce::PerChunk>() {
            self.debounce.per_chunk_ms = per_chunk;
        }
        if let Some(min) = explicit::<u64, debounce::MinDelay>() {
            self.debounce.min_ms = min;
        }
        if let Some(max) = explicit::<u64, debounce::MaxDelay>() {
            self.debounce.max_ms = max;
        }

        // 界面
        if let Some(timeout) = explicit::<u64, ui::StatusTimeout>() {
            self.status_timeout_ms = timeout;
        }
        if let Some(locale) = explicit::<String, ui::Locale>() {
            self.locale = Some(locale);
        }

        // 历史
        if let Some(limit) = explicit::<usize, history::Limit>() {
            self.history_limit = limit;
        }
        if let Some(path) = explicit::<String, history::Path>() {
            self.history_path = Some(PathBuf::from(path));
        }

        // 安全
        if let Some(password) = explicit::<String, security::AccessPassword>() {
            self.access_password = Some(password);
        }
    }

    /// 转换为Duration类型
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }

    /// 历史数据库路径，未配置时使用平台数据目录
    pub fn resolved_history_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.history_path {
            return Some(path.clone());
        }
        directories::ProjectDirs::from("dev", "libretranslator", "libretranslator")
            .map(|dirs| dirs.data_dir().join(constants::HISTORY_DB_FILE))
    }
}

/// 简化的配置管理器
pub struct ConfigManager {
    config: TranslatorConfig,
}

impl ConfigManager {
    /// 创建新的配置管理器
    pub fn new() -> TranslationResult<Self> {
        let mut config = Self::load_config()?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config })
    }

    /// 从指定配置文件创建（仍会应用环境变量覆盖）
    pub fn from_file<P: AsRef<Path>>(path: P) -> TranslationResult<Self> {
        let mut config = Self::load_from_file(path.as_ref())?;
        config.apply_env_overrides();
        config.validate()?;

        Ok(Self { config })
    }

    /// 获取配置
    pub fn get_config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub fn into_config(self) -> TranslatorConfig {
        self.config
    }

    /// 从搜索路径加载配置
    fn load_config() -> TranslationResult<TranslatorConfig> {
        // 首先尝试加载 .env 文件
        Self::load_dotenv();

        // 查找配置文件
        for path in constants::CONFIG_PATHS {
            let expanded_path = shellexpand::tilde(path);
            let candidate = Path::new(expanded_path.as_ref());
            if candidate.exists() {
                tracing::info!("加载配置文件: {}", expanded_path);
                return Self::load_from_file(candidate);
            }
        }

        tracing::info!("未找到配置文件，使用默认配置");
        Ok(TranslatorConfig::default())
    }

    /// 从指定文件加载配置
    fn load_from_file(path: &Path) -> TranslationResult<TranslatorConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranslationError::ConfigError(format!("读取配置文件失败: {}", e)))?;

        // 按扩展名选择格式
        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析JSON配置失败: {}", e)))
        } else {
            toml::from_str(&content)
                .map_err(|e| TranslationError::ConfigError(format!("解析TOML配置失败: {}", e)))
        }
    }

    /// 加载 .env 文件
    fn load_dotenv() {
        let env_files = [".env.local", ".env.development", ".env.production", ".env"];

        for env_file in &env_files {
            if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
                tracing::info!("已加载环境变量文件: {}", env_file);
                break;
            }
        }
    }

    /// 生成示例配置文件
    pub fn generate_example_config<P: AsRef<Path>>(path: P) -> TranslationResult<()> {
        let config = TranslatorConfig::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| TranslationError::ConfigError(format!("序列化配置失败: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| TranslationError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }
}
