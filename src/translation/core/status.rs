//! 短暂状态提示
//!
//! 每条提示在超时后自动清除；新提示会替换旧提示并重新计时。

use std::future;
use std::pin::Pin;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Sleep;

/// 提示消息的键，文本由界面层按当前语言渲染
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKey {
    TranslationSuccess,
    TranslationFailed,
    TranslationError,
    CopySuccess,
    CopyFailed,
    WrongPassword,
    HistoryCleared,
}

impl MessageKey {
    pub fn kind(&self) -> MessageKind {
        match self {
            MessageKey::TranslationSuccess | MessageKey::CopySuccess | MessageKey::HistoryCleared => {
                MessageKind::Success
            }
            MessageKey::TranslationFailed
            | MessageKey::TranslationError
            | MessageKey::CopyFailed
            | MessageKey::WrongPassword => MessageKind::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub key: MessageKey,
    pub kind: MessageKind,
    pub detail: Option<String>,
}

pub struct StatusBar {
    timeout: Duration,
    current: Option<StatusMessage>,
    timer: Option<Pin<Box<Sleep>>>,
}

impl StatusBar {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            current: None,
            timer: None,
        }
    }

    pub fn show(&mut self, key: MessageKey) {
        self.show_with_detail(key, None);
    }

    pub fn show_with_detail(&mut self, key: MessageKey, detail: Option<String>) {
        self.current = Some(StatusMessage {
            key,
            kind: key.kind(),
            detail,
        });
        self.timer = Some(Box::pin(tokio::time::sleep(self.timeout)));
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.timer = None;
    }

    /// 等待当前提示过期并清除它
    pub async fn expired(&mut self) {
        match self.timer.as_mut() {
            Some(timer) => timer.as_mut().await,
            None => future::pending::<()>().await,
        }
        self.clear();
    }
}
