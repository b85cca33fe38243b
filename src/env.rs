//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，所有变量都以 `LIBRETRANSLATOR_` 为前缀

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "LIBRETRANSLATOR_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 禁用颜色输出
    pub struct NoColor;
    impl EnvVar<bool> for NoColor {
        const NAME: &'static str = "NO_COLOR";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Disable colored output when set to any value";

        fn parse(value: &str) -> EnvResult<bool> {
            // NO_COLOR 遵循标准：任何值都表示禁用颜色
            Ok(!value.is_empty())
        }
    }
}

/// 翻译接口相关环境变量
pub mod translation {
    use super::*;

    /// DeepLX 接口地址
    pub struct ApiUrl;
    impl EnvVar<String> for ApiUrl {
        const NAME: &'static str = "LIBRETRANSLATOR_API_URL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "DeepLX-compatible translation endpoint URL";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("http://localhost:1188/translate".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            let url = value.trim();
            if url.starts_with("http://") || url.starts_with("https://") {
                Ok(url.to_string())
            } else {
                Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "API URL must start with http:// or https://".to_string(),
                })
            }
        }
    }

    /// 接口访问令牌（以 Bearer 方式发送）
    pub struct AccessToken;
    impl EnvVar<String> for AccessToken {
        const NAME: &'static str = "LIBRETRANSLATOR_ACCESS_TOKEN";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Bearer token sent to the translation endpoint";

        fn parse(value: &str) -> EnvResult<String> {
            let token = value.trim();
            if token.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Token cannot be empty".to_string(),
                });
            }
            Ok(token.to_string())
        }
    }

    /// 默认源语言（AUTO 表示自动检测）
    pub struct SourceLang;
    impl EnvVar<String> for SourceLang {
        const NAME: &'static str = "LIBRETRANSLATOR_SOURCE_LANG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Default source language code ('AUTO' for detection)";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("ZH".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            parse_language_code(value, Self::NAME)
        }
    }

    /// 默认目标语言
    pub struct TargetLang;
    impl EnvVar<String> for TargetLang {
        const NAME: &'static str = "LIBRETRANSLATOR_TARGET_LANG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Default target language code (e.g. EN, EN-GB, ZH-HANS)";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("EN".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            let code = parse_language_code(value, Self::NAME)?;
            if crate::translation::core::language::is_auto(&code) {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Target language cannot be AUTO".to_string(),
                });
            }
            Ok(code)
        }
    }

    /// 自动翻译开关
    pub struct AutoTranslate;
    impl EnvVar<bool> for AutoTranslate {
        const NAME: &'static str = "LIBRETRANSLATOR_AUTO_TRANSLATE";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Translate automatically while typing";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 请求超时
    pub struct RequestTimeout;
    impl EnvVar<Duration> for RequestTimeout {
        const NAME: &'static str = "LIBRETRANSLATOR_REQUEST_TIMEOUT";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(15));
        const DESCRIPTION: &'static str = "Translation request timeout in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let seconds = parse_positive_u64(value, Self::NAME, 1, 120)?;
            Ok(Duration::from_secs(seconds))
        }
    }
}

/// 防抖调度相关环境变量（单位均为毫秒）
pub mod debounce {
    use super::*;

    /// 基础延迟
    pub struct BaseDelay;
    impl EnvVar<u64> for BaseDelay {
        const NAME: &'static str = "LIBRETRANSLATOR_DEBOUNCE_BASE_MS";
        const DEFAULT: Option<u64> = Some(600);
        const DESCRIPTION: &'static str = "Base debounce delay in milliseconds";

        fn parse(value: &str) -> EnvResult<u64> {
            parse_positive_u64(value, Self::NAME, 50, 10_000)
        }
    }

    /// 每多少个字符增加一档延迟
    pub struct SizeDivisor;
    impl EnvVar<u64> for SizeDivisor {
        const NAME: &'static str = "LIBRETRANSLATOR_DEBOUNCE_SIZE_DIVISOR";
        const DEFAULT: Option<u64> = Some(20);
        const DESCRIPTION: &'static str = "Characters per additional delay chunk";

        fn parse(value: &str) -> EnvResult<u64> {
            parse_positive_u64(value, Self::NAME, 1, 10_000)
        }
    }

    /// 每一档增加的延迟
    pub struct PerChunk;
    impl EnvVar<u64> for PerChunk {
        const NAME: &'static str = "LIBRETRANSLATOR_DEBOUNCE_PER_CHUNK_MS";
        const DEFAULT: Option<u64> = Some(100);
        const DESCRIPTION: &'static str = "Extra delay per chunk in milliseconds";

        fn parse(value: &str) -> EnvResult<u64> {
            value.trim().parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid number of milliseconds".to_string(),
            })
        }
    }

    /// 延迟下限
    pub struct MinDelay;
    impl EnvVar<u64> for MinDelay {
        const NAME: &'static str = "LIBRETRANSLATOR_DEBOUNCE_MIN_MS";
        const DEFAULT: Option<u64> = Some(600);
        const DESCRIPTION: &'static str = "Lower bound of the debounce delay in milliseconds";

        fn parse(value: &str) -> EnvResult<u64> {
            parse_positive_u64(value, Self::NAME, 0, 10_000)
        }
    }

    /// 延迟上限
    pub struct MaxDelay;
    impl EnvVar<u64> for MaxDelay {
        const NAME: &'static str = "LIBRETRANSLATOR_DEBOUNCE_MAX_MS";
        const DEFAULT: Option<u64> = Some(1500);
        const DESCRIPTION: &'static str = "Upper bound of the debounce delay in milliseconds";

        fn parse(value: &str) -> EnvResult<u64> {
            parse_positive_u64(value, Self::NAME, 50, 30_000)
        }
    }
}

/// 界面相关环境变量
pub mod ui {
    use super::*;

    /// 提示消息自动消失时间
    pub struct StatusTimeout;
    impl EnvVar<u64> for StatusTimeout {
        const NAME: &'static str = "LIBRETRANSLATOR_STATUS_TIMEOUT_MS";
        const DEFAULT: Option<u64> = Some(2000);
        const DESCRIPTION: &'static str = "Transient status message lifetime in milliseconds";

        fn parse(value: &str) -> EnvResult<u64> {
            parse_positive_u64(value, Self::NAME, 500, 10_000)
        }
    }

    /// 系统区域设置，用于推断界面语言
    pub struct Locale;
    impl EnvVar<String> for Locale {
        const NAME: &'static str = "LANG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "System locale used to pick the initial UI language";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("en".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            Ok(value.trim().to_string())
        }
    }
}

/// 历史记录相关环境变量
pub mod history {
    use super::*;

    /// 历史记录条数上限
    pub struct Limit;
    impl EnvVar<usize> for Limit {
        const NAME: &'static str = "LIBRETRANSLATOR_HISTORY_LIMIT";
        const DEFAULT: Option<usize> = Some(50);
        const DESCRIPTION: &'static str = "Maximum number of history entries kept";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 1000)
        }
    }

    /// 历史数据库文件路径
    pub struct Path;
    impl EnvVar<String> for Path {
        const NAME: &'static str = "LIBRETRANSLATOR_HISTORY_PATH";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Path of the on-disk history database";

        fn parse(value: &str) -> EnvResult<String> {
            let path = value.trim();
            if path.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Path cannot be empty".to_string(),
                });
            }
            Ok(shellexpand::tilde(path).into_owned())
        }
    }
}

/// 安全相关环境变量
pub mod security {
    use super::*;

    /// 访问口令（单一共享口令）
    pub struct AccessPassword;
    impl EnvVar<String> for AccessPassword {
        const NAME: &'static str = "LIBRETRANSLATOR_PASSWORD";
        const DEFAULT: Option<String> = None; // 未设置时不启用口令
        const DESCRIPTION: &'static str = "Shared access password (unset disables the gate)";

        fn parse(value: &str) -> EnvResult<String> {
            if value.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Password cannot be empty".to_string(),
                });
            }
            Ok(value.to_string())
        }
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

fn parse_positive_u64(value: &str, var_name: &str, min: u64, max: u64) -> EnvResult<u64> {
    parse_positive_usize(value, var_name, min as usize, max as usize).map(|n| n as u64)
}

fn parse_language_code(value: &str, var_name: &str) -> EnvResult<String> {
    let code = value.trim();
    let valid = !code.is_empty()
        && code.len() <= 16
        && code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(code.to_string())
    } else {
        Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Invalid language code '{}'", value),
        })
    }
}

/// 环境变量配置汇总
#[derive(Debug, Clone)]
pub struct EnvConfig {
    // 核心配置
    pub log_level: String,
    pub no_color: bool,

    // 翻译接口
    pub api_url: String,
    pub access_token: Option<String>,
    pub source_lang: String,
    pub target_lang: String,
    pub auto_translate: bool,
    pub request_timeout: Duration,

    // 防抖
    pub debounce_base_ms: u64,
    pub debounce_size_divisor: u64,
    pub debounce_per_chunk_ms: u64,
    pub debounce_min_ms: u64,
    pub debounce_max_ms: u64,

    // 界面
    pub status_timeout_ms: u64,
    pub locale: String,

    // 历史
    pub history_limit: usize,
    pub history_path: Option<String>,

    // 安全
    pub access_password: Option<String>,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            log_level: core::LogLevel::get()?,
            no_color: core::NoColor::get()?,

            api_url: translation::ApiUrl::get()?,
            access_token: translation::AccessToken::get().ok(),
            source_lang: translation::SourceLang::get()?,
            target_lang: translation::TargetLang::get()?,
            auto_translate: translation::AutoTranslate::get()?,
            request_timeout: translation::RequestTimeout::get()?,

            debounce_base_ms: debounce::BaseDelay::get()?,
            debounce_size_divisor: debounce::SizeDivisor::get()?,
            debounce_per_chunk_ms: debounce::PerChunk::get()?,
            debounce_min_ms: debounce::MinDelay::get()?,
            debounce_max_ms: debounce::MaxDelay::get()?,

            status_timeout_ms: ui::StatusTimeout::get()?,
            locale: ui::Locale::get()?,

            history_limit: history::Limit::get()?,
            history_path: history::Path::get().ok(),

            access_password: security::AccessPassword::get().ok(),
        })
    }

    /// 跨字段验证
    pub fn validate(&self) -> EnvResult<()> {
        if self.debounce_min_ms > self.debounce_max_ms {
            return Err(EnvError {
                variable: debounce::MinDelay::NAME.to_string(),
                message: format!(
                    "Minimum delay {}ms exceeds maximum delay {}ms",
                    self.debounce_min_ms, self.debounce_max_ms
                ),
            });
        }
        Ok(())
    }

    /// 输出配置摘要（隐藏敏感信息）
    pub fn log_summary(&self) {
        tracing::info!("环境配置摘要: 日志级别={}", self.log_level);
        tracing::info!(
            "翻译接口: {} ({} -> {}), 自动翻译: {}",
            self.api_url,
            self.source_lang,
            self.target_lang,
            if self.auto_translate { "开启" } else { "关闭" }
        );
        if self.access_token.is_some() {
            tracing::info!("访问令牌: [已配置]");
        }
        if self.access_password.is_some() {
            tracing::info!("访问口令: [已配置]");
        }
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    push_doc(&mut docs, core::LogLevel::NAME, core::LogLevel::DESCRIPTION, "info");
    push_doc(&mut docs, core::NoColor::NAME, core::NoColor::DESCRIPTION, "false");

    docs.push_str("\n## Translation Endpoint\n\n");
    push_doc(
        &mut docs,
        translation::ApiUrl::NAME,
        translation::ApiUrl::DESCRIPTION,
        "http://localhost:1188/translate",
    );
    push_doc(&mut docs, translation::AccessToken::NAME, translation::AccessToken::DESCRIPTION, "unset");
    push_doc(&mut docs, translation::SourceLang::NAME, translation::SourceLang::DESCRIPTION, "ZH");
    push_doc(&mut docs, translation::TargetLang::NAME, translation::TargetLang::DESCRIPTION, "EN");
    push_doc(&mut docs, translation::AutoTranslate::NAME, translation::AutoTranslate::DESCRIPTION, "false");
    push_doc(&mut docs, translation::RequestTimeout::NAME, translation::RequestTimeout::DESCRIPTION, "15");

    docs.push_str("\n## Debounce\n\n");
    push_doc(&mut docs, debounce::BaseDelay::NAME, debounce::BaseDelay::DESCRIPTION, "600");
    push_doc(&mut docs, debounce::SizeDivisor::NAME, debounce::SizeDivisor::DESCRIPTION, "20");
    push_doc(&mut docs, debounce::PerChunk::NAME, debounce::PerChunk::DESCRIPTION, "100");
    push_doc(&mut docs, debounce::MinDelay::NAME, debounce::MinDelay::DESCRIPTION, "600");
    push_doc(&mut docs, debounce::MaxDelay::NAME, debounce::MaxDelay::DESCRIPTION, "1500");

    docs.push_str("\n## UI, History and Security\n\n");
    push_doc(&mut docs, ui::StatusTimeout::NAME, ui::StatusTimeout::DESCRIPTION, "2000");
    push_doc(&mut docs, history::Limit::NAME, history::Limit::DESCRIPTION, "50");
    push_doc(&mut docs, history::Path::NAME, history::Path::DESCRIPTION, "platform data dir");
    push_doc(&mut docs, security::AccessPassword::NAME, security::AccessPassword::DESCRIPTION, "unset");

    docs
}

fn push_doc(docs: &mut String, name: &str, description: &str, default: &str) {
    docs.push_str(&format!("- `{}`: {} (default: {})\n", name, description, default));
}
