//! 防抖调度器
//!
//! 把连续的编辑合并为一次翻译请求。任意时刻最多只有一个定时器，
//! 定时器由调度器持有，调度器被丢弃时定时器随之失效。

use std::future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{Instant, Sleep};

use crate::translation::config::DebounceConfig;
use crate::utils::{char_count, is_blank};

/// 已挂起的翻译
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTranslation {
    pub scheduled_at: Instant,
    pub delay: Duration,
    /// 调度时的文本；触发时以当时的输入为准
    pub source_text_snapshot: String,
}

impl PendingTranslation {
    pub fn deadline(&self) -> Instant {
        self.scheduled_at + self.delay
    }
}

/// 调度时需要的外部状态
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleGate {
    pub auto_translate: bool,
    pub in_flight: bool,
    pub composing: bool,
}

/// 跳过调度的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AutoTranslateOff,
    BlankText,
    InFlight,
    Composing,
}

/// 调度结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Armed(Duration),
    Skipped(SkipReason),
}

struct Armed {
    pending: PendingTranslation,
    timer: Pin<Box<Sleep>>,
}

pub struct DebounceScheduler {
    config: DebounceConfig,
    armed: Option<Armed>,
}

impl DebounceScheduler {
    pub fn new(config: DebounceConfig) -> Self {
        Self { config, armed: None }
    }

    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    /// 根据文本长度计算延迟
    ///
    /// 长文本给予更长的停顿时间，结果落在 `[min, max]` 区间内。
    pub fn delay_for(&self, text: &str) -> Duration {
        let cfg = &self.config;
        let chunks = char_count(text) as u64 / cfg.size_divisor.max(1);
        let raw = cfg
            .base_ms
            .saturating_add(chunks.saturating_mul(cfg.per_chunk_ms));
        let ms = raw.max(cfg.min_ms).min(cfg.max_ms);
        Duration::from_millis(ms)
    }

    /// 调度一次翻译
    ///
    /// 成功时取消旧定时器并启动新定时器。
    pub fn schedule(&mut self, text: &str, gate: ScheduleGate) -> ScheduleOutcome {
        let skip = if !gate.auto_translate {
            Some(SkipReason::AutoTranslateOff)
        } else if is_blank(text) {
            Some(SkipReason::BlankText)
        } else if gate.in_flight {
            Some(SkipReason::InFlight)
        } else if gate.composing {
            Some(SkipReason::Composing)
        } else {
            None
        };

        if let Some(reason) = skip {
            tracing::debug!("跳过调度: {:?}", reason);
            return ScheduleOutcome::Skipped(reason);
        }

        self.cancel();

        let delay = self.delay_for(text);
        let scheduled_at = Instant::now();
        self.armed = Some(Armed {
            pending: PendingTranslation {
                scheduled_at,
                delay,
                source_text_snapshot: text.to_string(),
            },
            timer: Box::pin(tokio::time::sleep_until(scheduled_at + delay)),
        });

        tracing::debug!("已调度翻译: {} 字符, 延迟 {:?}", char_count(text), delay);
        ScheduleOutcome::Armed(delay)
    }

    /// 取消挂起的定时器，返回之前是否有挂起
    pub fn cancel(&mut self) -> bool {
        let had_pending = self.armed.take().is_some();
        if had_pending {
            tracing::debug!("已取消挂起的翻译");
        }
        had_pending
    }

    pub fn is_pending(&self) -> bool {
        self.armed.is_some()
    }

    pub fn pending(&self) -> Option<&PendingTranslation> {
        self.armed.as_ref().map(|armed| &armed.pending)
    }

    /// 等待定时器触发
    ///
    /// 没有挂起时永不完成。取消安全：在触发前被丢弃不会改变状态。
    pub async fn fired(&mut self) -> PendingTranslation {
        match self.armed.as_mut() {
            Some(armed) => armed.timer.as_mut().await,
            None => future::pending::<()>().await,
        }

        match self.armed.take() {
            Some(armed) => armed.pending,
            None => future::pending().await,
        }
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        if self.armed.is_some() {
            tracing::debug!("调度器释放，丢弃挂起的定时器");
        }
    }
}
