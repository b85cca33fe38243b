//! 翻译模块统一错误处理
//!
//! 提供结构化错误类型和错误处理机制。核心流程中没有致命错误：
//! 每一种错误要么被静默忽略，要么转换成一条短暂的状态提示。

use std::fmt;

use thiserror::Error;

use crate::translation::core::status::MessageKey;

/// 翻译错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    /// 输入验证错误（空文本等，调用方静默跳过）
    #[error("输入无效: {0}")]
    InvalidInput(String),

    /// 翻译接口返回了失败结果（`code != 200` 或非 2xx 状态）
    #[error("翻译失败 (code {code}): {message}")]
    ApplicationFailure { code: i64, message: String },

    /// 网络、超时或响应解析失败
    #[error("网络错误: {0}")]
    TransportFailure(String),

    /// 持久化数据损坏
    #[error("持久化数据损坏: {0}")]
    PersistenceCorruption(String),

    /// 存储后端错误
    #[error("存储错误: {0}")]
    StorageError(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// 剪贴板不可用或写入失败
    #[error("剪贴板错误: {0}")]
    ClipboardError(String),

    /// 序列化错误
    #[error("序列化错误: {0}")]
    SerializationError(String),

    /// 内部错误
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl TranslationError {
    /// 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TranslationError::InvalidInput(_) => ErrorSeverity::Info,
            TranslationError::ApplicationFailure { .. } => ErrorSeverity::Warning,
            TranslationError::TransportFailure(_) => ErrorSeverity::Warning,
            TranslationError::PersistenceCorruption(_) => ErrorSeverity::Warning,
            TranslationError::StorageError(_) => ErrorSeverity::Error,
            TranslationError::ClipboardError(_) => ErrorSeverity::Warning,
            TranslationError::ConfigError(_) => ErrorSeverity::Critical,
            TranslationError::SerializationError(_) => ErrorSeverity::Error,
            TranslationError::InternalError(_) => ErrorSeverity::Critical,
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self {
            TranslationError::InvalidInput(_) => ErrorCategory::ValidationSkip,
            TranslationError::ApplicationFailure { .. } => ErrorCategory::Application,
            TranslationError::TransportFailure(_) => ErrorCategory::Transport,
            TranslationError::PersistenceCorruption(_) => ErrorCategory::Persistence,
            TranslationError::StorageError(_) => ErrorCategory::Storage,
            TranslationError::ClipboardError(_) => ErrorCategory::Clipboard,
            TranslationError::ConfigError(_) => ErrorCategory::Configuration,
            TranslationError::SerializationError(_) => ErrorCategory::Serialization,
            TranslationError::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// 需要展示给用户的状态提示
    ///
    /// 只有翻译请求的两类失败和复制失败会产生提示，其余错误只写日志。
    pub fn status_key(&self) -> Option<MessageKey> {
        match self {
            TranslationError::ApplicationFailure { .. } => Some(MessageKey::TranslationFailed),
            TranslationError::TransportFailure(_) => Some(MessageKey::TranslationError),
            TranslationError::ClipboardError(_) => Some(MessageKey::CopyFailed),
            _ => None,
        }
    }

    /// 创建带上下文的错误
    pub fn with_context<T: fmt::Display>(mut self, context: T) -> Self {
        let append = |msg: &mut String| {
            *msg = format!("{} (上下文: {})", msg, context);
        };

        match &mut self {
            TranslationError::InvalidInput(msg)
            | TranslationError::TransportFailure(msg)
            | TranslationError::PersistenceCorruption(msg)
            | TranslationError::StorageError(msg)
            | TranslationError::ClipboardError(msg)
            | TranslationError::ConfigError(msg)
            | TranslationError::SerializationError(msg)
            | TranslationError::InternalError(msg)
            | TranslationError::ApplicationFailure { message: msg, .. } => append(msg),
        }

        self
    }
}

/// 错误严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    ValidationSkip,
    Application,
    Transport,
    Persistence,
    Storage,
    Clipboard,
    Configuration,
    Serialization,
    Internal,
}

/// 标准错误转换
impl From<reqwest::Error> for TranslationError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TranslationError::TransportFailure(format!("请求超时: {}", error))
        } else if error.is_decode() {
            TranslationError::TransportFailure(format!("响应解析失败: {}", error))
        } else {
            TranslationError::TransportFailure(format!("请求失败: {}", error))
        }
    }
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        TranslationError::StorageError(format!("IO错误: {}", error))
    }
}

impl From<serde_json::Error> for TranslationError {
    fn from(error: serde_json::Error) -> Self {
        TranslationError::SerializationError(format!("JSON序列化错误: {}", error))
    }
}

impl From<toml::de::Error> for TranslationError {
    fn from(error: toml::de::Error) -> Self {
        TranslationError::ConfigError(format!("TOML解析错误: {}", error))
    }
}

impl From<crate::env::EnvError> for TranslationError {
    fn from(error: crate::env::EnvError) -> Self {
        TranslationError::ConfigError(error.to_string())
    }
}

macro_rules! impl_from_redb {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for TranslationError {
                fn from(error: $ty) -> Self {
                    TranslationError::StorageError(format!("数据库错误: {}", error))
                }
            }
        )*
    };
}

impl_from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

/// 错误结果类型别名
pub type TranslationResult<T> = Result<T, TranslationError>;

/// 错误处理助手函数
pub mod helpers {
    use super::*;

    /// 按严重程度记录错误
    pub fn log_error(error: &TranslationError) {
        match error.severity() {
            ErrorSeverity::Info => tracing::debug!("翻译信息: {}", error),
            ErrorSeverity::Warning => tracing::warn!("翻译警告: {}", error),
            ErrorSeverity::Error => tracing::error!("翻译错误: {}", error),
            ErrorSeverity::Critical => tracing::error!("翻译严重错误: {}", error),
        }
    }

    /// 创建网络错误
    pub fn transport_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::TransportFailure(msg.to_string())
    }

    /// 创建配置错误
    pub fn config_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::ConfigError(msg.to_string())
    }

    /// 创建存储错误
    pub fn storage_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::StorageError(msg.to_string())
    }

    /// 创建输入验证错误
    pub fn validation_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::InvalidInput(msg.to_string())
    }

    /// 创建内部错误
    pub fn internal_error<T: fmt::Display>(msg: T) -> TranslationError {
        TranslationError::InternalError(msg.to_string())
    }
}
