//! # LibreTranslator Core
//!
//! 翻译前端的核心库：收集用户输入，经由 DeepLX 兼容的翻译接口完成翻译，
//! 并维护与最新输入保持一致的界面状态。
//!
//! ## 模块组织
//!
//! - `env` - 类型安全的环境变量管理
//! - `translation` - 输入管道、翻译调用、历史记录与配置
//! - `utils` - 文本工具函数与日志初始化

pub mod env;
pub mod translation;
pub mod utils;

// Re-export commonly used items for convenience
pub use translation::{
    Translator, TranslatorConfig, TranslatorHandle, TranslationError, TranslationResult,
    UiEvent, ViewState,
};
pub use utils::*;
