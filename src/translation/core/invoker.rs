//! 翻译调用器
//!
//! 负责发起请求并追踪进行中的请求。每个请求带有一张票据，
//! 用于在结果返回时判断它是否仍然对应当前输入。

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;

use super::language::LanguagePair;
use crate::translation::client::{TranslationClient, TranslationRequest, TranslationResponse};
use crate::translation::error::{TranslationError, TranslationResult};
use crate::utils::is_blank;

/// 请求票据：请求 id 与发起时的文本、语言对快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub text: String,
    pub pair: LanguagePair,
}

impl Ticket {
    fn same_snapshot(&self, other: &Ticket) -> bool {
        self.text == other.text && self.pair == other.pair
    }
}

/// 一次请求的结果
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: TranslationResult<TranslationResponse>,
}

pub struct TranslationInvoker {
    client: Arc<dyn TranslationClient>,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
    next_id: u64,
    latest: Option<Ticket>,
    /// 最新票据的结果尚未返回
    awaiting_latest: bool,
}

impl TranslationInvoker {
    pub fn new(client: Arc<dyn TranslationClient>) -> Self {
        Self {
            client,
            in_flight: FuturesUnordered::new(),
            next_id: 1,
            latest: None,
            awaiting_latest: false,
        }
    }

    /// 最新发出的请求是否仍在进行中
    ///
    /// 被取代的旧请求不计入加载状态。
    pub fn is_loading(&self) -> bool {
        self.awaiting_latest
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn latest(&self) -> Option<&Ticket> {
        self.latest.as_ref()
    }

    /// 发起翻译，返回请求票据
    ///
    /// 空白文本直接返回 `InvalidInput`，不会发出请求。
    pub fn translate(&mut self, text: &str, pair: &LanguagePair) -> TranslationResult<Ticket> {
        if is_blank(text) {
            return Err(TranslationError::InvalidInput("待翻译文本为空".to_string()));
        }

        let ticket = Ticket {
            id: self.next_id,
            text: text.to_string(),
            pair: pair.clone(),
        };
        self.next_id += 1;
        self.latest = Some(ticket.clone());
        self.awaiting_latest = true;

        let request = TranslationRequest::new(text, &pair.source_lang, &pair.target_lang);
        let client = Arc::clone(&self.client);
        let future_ticket = ticket.clone();

        let future = async move {
            let outcome = match AssertUnwindSafe(client.translate(&request)).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(_) => {
                    tracing::error!("翻译客户端在请求 #{} 中发生 panic", future_ticket.id);
                    Err(TranslationError::TransportFailure("翻译客户端异常终止".to_string()))
                }
            };
            Completion {
                ticket: future_ticket,
                outcome,
            }
        }
        .boxed();

        self.in_flight.push(future);
        tracing::info!(
            "开始翻译 #{}: {} -> {}",
            ticket.id,
            pair.source_lang,
            pair.target_lang
        );
        Ok(ticket)
    }

    /// 判断结果是否可以应用
    ///
    /// 票据是最新发出的，或者最新票据与它的文本和语言对相同。
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        match &self.latest {
            Some(latest) => latest.id == ticket.id || latest.same_snapshot(ticket),
            None => false,
        }
    }

    /// 票据是否为最新发出的请求
    pub fn is_latest(&self, ticket: &Ticket) -> bool {
        self.latest.as_ref().is_some_and(|latest| latest.id == ticket.id)
    }

    /// 等待下一个请求完成；没有进行中的请求时永不完成
    pub async fn completed(&mut self) -> Completion {
        if self.in_flight.is_empty() {
            return std::future::pending().await;
        }
        match self.in_flight.next().await {
            Some(completion) => {
                if self.is_latest(&completion.ticket) {
                    self.awaiting_latest = false;
                }
                completion
            }
            None => std::future::pending().await,
        }
    }

    /// 丢弃所有进行中的请求
    pub fn abandon_all(&mut self) -> usize {
        let count = self.in_flight.len();
        if count > 0 {
            tracing::debug!("丢弃 {} 个进行中的请求", count);
        }
        self.in_flight = FuturesUnordered::new();
        self.awaiting_latest = false;
        count
    }
}
