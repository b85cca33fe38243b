//! 翻译模块
//!
//! 采用清晰的模块化架构：
//! - **core**: 输入管道与控制器（组合守卫、防抖、调用、语言对）
//! - **client**: DeepLX 兼容接口客户端
//! - **storage**: 历史记录与偏好的持久化
//! - **config**: 配置管理
//! - **error**: 错误处理
//!
//! # 基本用法
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use libretranslator::translation::core::AlwaysConfirm;
//! use libretranslator::translation::{create_translator, UiEvent};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let translator = create_translator(Arc::new(AlwaysConfirm(false)))?;
//! let (handle, task) = translator.spawn();
//!
//! handle.send(UiEvent::SetAutoTranslate(true)).await?;
//! handle.send(UiEvent::TextChanged("你好，世界".to_string())).await?;
//!
//! handle.shutdown().await?;
//! task.await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// 子模块声明
// ============================================================================

/// DeepLX 兼容接口客户端
pub mod client;

/// 配置管理模块 - 处理接口、语言、防抖、历史等全部配置
pub mod config;

/// 核心模块 - 输入管道、调度、调用与控制器
pub mod core;

/// 错误处理模块 - 统一的错误类型和处理机制
pub mod error;

/// 存储管理模块 - 历史记录与界面语言偏好
pub mod storage;

// ============================================================================
// 核心API导出
// ============================================================================

pub use client::{DeepLxClient, TranslationClient, TranslationRequest, TranslationResponse};

pub use config::{constants, ConfigManager, DebounceConfig, TokenPlacement, TranslatorConfig};

pub use core::{
    CopyTarget, Key, KeyPress, LanguagePair, MessageKey, Phase, Tick, Translator,
    TranslatorHandle, UiEvent, ViewState,
};

pub use error::{ErrorCategory, ErrorSeverity, TranslationError, TranslationResult};

pub use storage::{HistoryEntry, HistoryStore, KeyValueStore, MemoryStore, RedbStore, UiLanguage};

use std::sync::Arc;

use crate::env::EnvConfig;
use crate::utils::init_tracing;

// ============================================================================
// 便利函数
// ============================================================================

/// 初始化日志并按配置文件和环境变量创建控制器
pub fn create_translator(confirm: Arc<dyn core::Confirm>) -> TranslationResult<Translator> {
    init()?;
    let config = ConfigManager::new()?.into_config();
    Translator::from_config(config, confirm)
}

// ============================================================================
// 模块信息和元数据
// ============================================================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 运行翻译模块自检
pub fn self_check() -> TranslationResult<()> {
    tracing::info!("开始翻译模块自检...");

    // 检查配置
    let config = TranslatorConfig::default();
    config.validate()?;
    tracing::debug!("✓ 默认配置有效");

    // 检查防抖计算
    let scheduler = core::DebounceScheduler::new(config.debounce);
    let short = scheduler.delay_for("hi");
    let long = scheduler.delay_for(&"x".repeat(10_000));
    if short > long || long.as_millis() as u64 != config.debounce.max_ms {
        return Err(error::helpers::internal_error("防抖延迟计算异常"));
    }
    tracing::debug!("✓ 防抖调度正常");

    // 检查存储
    let store = MemoryStore::new();
    store.set(constants::UI_LANGUAGE_KEY, "en")?;
    if store.get(constants::UI_LANGUAGE_KEY)?.as_deref() != Some("en") {
        return Err(error::helpers::internal_error("内存存储读写异常"));
    }
    tracing::debug!("✓ 存储正常");

    tracing::info!("翻译模块自检完成，所有组件正常");
    Ok(())
}

/// 模块初始化
///
/// 读取环境变量，按 `LIBRETRANSLATOR_LOG_LEVEL` 和 `NO_COLOR` 安装日志订阅器，
/// 并输出配置摘要。订阅器已存在时沿用现有的。
pub fn init() -> TranslationResult<EnvConfig> {
    let env_config = EnvConfig::from_env()?;
    env_config.validate()?;

    if !init_tracing(&env_config.log_level, env_config.no_color) {
        tracing::debug!("日志订阅器已存在，沿用现有配置");
    }
    tracing::info!("翻译模块 v{} 已加载", VERSION);
    env_config.log_summary();
    Ok(env_config)
}
