//! 外部协作者接口（剪贴板、确认对话框）

use std::sync::{Arc, Mutex};

use crate::translation::error::{TranslationError, TranslationResult};

/// 剪贴板
pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> TranslationResult<()>;
}

/// 确认对话框（清空历史前调用）
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

/// 内存剪贴板，保留最后一次写入的内容
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> TranslationResult<()> {
        let mut contents = self
            .contents
            .lock()
            .map_err(|_| TranslationError::ClipboardError("剪贴板锁已损坏".to_string()))?;
        *contents = Some(text.to_string());
        Ok(())
    }
}

/// 没有剪贴板的环境
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&self, _text: &str) -> TranslationResult<()> {
        Err(TranslationError::ClipboardError("剪贴板不可用".to_string()))
    }
}

/// 固定回答的确认器
#[derive(Debug, Clone, Copy)]
pub struct AlwaysConfirm(pub bool);

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}
