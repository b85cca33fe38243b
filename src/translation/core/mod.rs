//! 翻译前端核心模块
//!
//! 把原始输入事件流转换成恰当时机的翻译请求，并维护与最新输入一致的视图状态。
//!
//! ## 组件
//!
//! - **组合守卫** (`composition.rs`): 输入法组合期间抑制调度
//! - **防抖调度** (`scheduler.rs`): 合并连续编辑，任意时刻最多一个定时器
//! - **翻译调用** (`invoker.rs`): 发起请求，用票据丢弃过期结果
//! - **语言对** (`language.rs`): 源/目标语言及交换规则
//! - **状态提示** (`status.rs`): 自动消失的短暂提示
//! - **访问口令** (`access.rs`): 可选的单一共享口令
//! - **控制器** (`controller.rs`): 事件处理与异步事件复用
//!
//! ## 模块依赖关系
//!
//! ```text
//! Translator (controller.rs)
//!     ├── CompositionGuard (composition.rs)
//!     ├── DebounceScheduler (scheduler.rs)
//!     ├── TranslationInvoker (invoker.rs)
//!     │       └── TranslationClient (client.rs)
//!     ├── HistoryStore (storage/history.rs)
//!     ├── StatusBar (status.rs)
//!     └── AccessGate (access.rs)
//! ```

pub mod access;
pub mod collaborators;
pub mod composition;
pub mod controller;
pub mod invoker;
pub mod language;
pub mod scheduler;
pub mod status;

pub use access::AccessGate;
pub use collaborators::{AlwaysConfirm, Clipboard, Confirm, MemoryClipboard, NoClipboard};
pub use composition::CompositionGuard;
pub use controller::{
    CopyTarget, Key, KeyPress, Phase, Tick, Translator, TranslatorHandle, UiEvent, ViewState,
};
pub use invoker::{Completion, Ticket, TranslationInvoker};
pub use language::{is_auto, LanguagePair, SOURCE_LANGUAGES, TARGET_LANGUAGES};
pub use scheduler::{DebounceScheduler, PendingTranslation, ScheduleGate, ScheduleOutcome, SkipReason};
pub use status::{MessageKey, MessageKind, StatusBar, StatusMessage};
