// 集成测试公共模块
//
// 提供模拟翻译客户端、控制器构建器和时间驱动辅助函数

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use libretranslator::translation::client::{
    TranslationClient, TranslationRequest, TranslationResponse,
};
use libretranslator::translation::config::TranslatorConfig;
use libretranslator::translation::core::{AlwaysConfirm, MemoryClipboard, Tick, Translator};
use libretranslator::translation::error::{TranslationError, TranslationResult};
use libretranslator::translation::storage::{KeyValueStore, MemoryStore};

/// 模拟客户端的应答
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 成功；`text` 为空时返回 `"<TARGET>:<text>"`
    Success {
        text: Option<String>,
        detected: Option<String>,
    },
    ApplicationFailure(i64, String),
    Transport(String),
    Panic,
}

impl MockReply {
    pub fn echo() -> Self {
        MockReply::Success {
            text: None,
            detected: None,
        }
    }

    pub fn detected(lang: &str) -> Self {
        MockReply::Success {
            text: None,
            detected: Some(lang.to_string()),
        }
    }
}

/// 记录所有请求的模拟翻译客户端
#[derive(Clone)]
pub struct MockClient {
    calls: Arc<Mutex<Vec<TranslationRequest>>>,
    replies: Arc<Mutex<VecDeque<(MockReply, Option<Duration>)>>>,
    latency: Duration,
    fallback: MockReply,
}

impl MockClient {
    pub fn new(latency: Duration) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            replies: Arc::new(Mutex::new(VecDeque::new())),
            latency,
            fallback: MockReply::echo(),
        }
    }

    pub fn with_fallback(mut self, reply: MockReply) -> Self {
        self.fallback = reply;
        self
    }

    pub fn push_reply(&self, reply: MockReply) {
        self.replies.lock().unwrap().push_back((reply, None));
    }

    /// 下一次请求使用指定延迟
    pub fn push_reply_after(&self, reply: MockReply, latency: Duration) {
        self.replies.lock().unwrap().push_back((reply, Some(latency)));
    }

    pub fn calls(&self) -> Vec<TranslationRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_texts(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.text).collect()
    }

    pub fn expected_echo(text: &str, target: &str) -> String {
        format!("{}:{}", target, text)
    }
}

#[async_trait]
impl TranslationClient for MockClient {
    async fn translate(&self, request: &TranslationRequest) -> TranslationResult<TranslationResponse> {
        self.calls.lock().unwrap().push(request.clone());
        let (reply, latency) = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| (self.fallback.clone(), None));

        tokio::time::sleep(latency.unwrap_or(self.latency)).await;

        match reply {
            MockReply::Success { text, detected } => Ok(TranslationResponse {
                translated_text: text
                    .unwrap_or_else(|| Self::expected_echo(&request.text, &request.target_lang)),
                detected_language: detected,
            }),
            MockReply::ApplicationFailure(code, message) => {
                Err(TranslationError::ApplicationFailure { code, message })
            }
            MockReply::Transport(message) => Err(TranslationError::TransportFailure(message)),
            MockReply::Panic => panic!("mock client failure"),
        }
    }
}

/// 测试控制器构建器
pub struct TestTranslatorBuilder {
    config: TranslatorConfig,
    latency: Duration,
    store: MemoryStore,
    confirm: bool,
    fallback: MockReply,
}

impl TestTranslatorBuilder {
    pub fn new() -> Self {
        Self {
            config: TranslatorConfig {
                locale: Some("en-US".to_string()),
                ..TranslatorConfig::default()
            },
            latency: Duration::from_millis(200),
            store: MemoryStore::new(),
            confirm: true,
            fallback: MockReply::echo(),
        }
    }

    pub fn auto_translate(mut self, enabled: bool) -> Self {
        self.config.auto_translate = enabled;
        self
    }

    pub fn languages(mut self, source: &str, target: &str) -> Self {
        self.config.source_lang = source.to_string();
        self.config.target_lang = target.to_string();
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.config.access_password = Some(password.to_string());
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    pub fn store(mut self, store: MemoryStore) -> Self {
        self.store = store;
        self
    }

    pub fn confirm(mut self, answer: bool) -> Self {
        self.confirm = answer;
        self
    }

    pub fn fallback(mut self, reply: MockReply) -> Self {
        self.fallback = reply;
        self
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub fn build(self) -> TestTranslator {
        let client = MockClient::new(self.latency).with_fallback(self.fallback);
        let clipboard = MemoryClipboard::new();
        let store: Arc<dyn KeyValueStore> = Arc::new(self.store.clone());
        let confirm = Arc::new(AlwaysConfirm(self.confirm));
        let translator = Translator::new(self.config, Arc::new(client.clone()), store, confirm)
            .with_clipboard(Arc::new(clipboard.clone()));

        TestTranslator {
            translator,
            client,
            store: self.store,
            clipboard,
        }
    }
}

impl Default for TestTranslatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 构建好的测试环境
pub struct TestTranslator {
    pub translator: Translator,
    pub client: MockClient,
    pub store: MemoryStore,
    pub clipboard: MemoryClipboard,
}

/// 在给定时间内等待下一个异步事件；超时返回 None
pub async fn tick_within(translator: &mut Translator, limit: Duration) -> Option<Tick> {
    tokio::time::timeout(limit, translator.next_tick()).await.ok()
}

/// 处理异步事件直到请求全部完成且没有挂起的定时器
pub async fn settle(translator: &mut Translator) -> Vec<Tick> {
    let mut ticks = Vec::new();
    while translator.is_loading() || translator.scheduler().is_pending() {
        ticks.push(translator.next_tick().await);
    }
    ticks
}

/// 推进虚拟时间
pub async fn advance_ms(ms: u64) {
    tokio::time::advance(Duration::from_millis(ms)).await;
}
