//! 翻译控制器
//!
//! 持有所有组件，为每个界面事件提供一个同步处理函数；异步部分
//! （防抖定时器、网络请求、提示过期）统一在 [`Translator::next_tick`] 中用
//! `tokio::select!` 复用。
//!
//! 数据流：界面事件 → 组合守卫 → 防抖调度 → 翻译调用 → 历史记录 + 视图状态

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::access::AccessGate;
use super::collaborators::{Clipboard, Confirm, NoClipboard};
use super::composition::CompositionGuard;
use super::invoker::{Completion, TranslationInvoker};
use super::language::LanguagePair;
use super::scheduler::{DebounceScheduler, PendingTranslation, ScheduleGate, ScheduleOutcome};
use super::status::{MessageKey, StatusBar, StatusMessage};
use crate::translation::client::{DeepLxClient, TranslationClient};
use crate::translation::config::TranslatorConfig;
use crate::translation::error::{helpers, TranslationError, TranslationResult};
use crate::translation::storage::{HistoryEntry, HistoryStore, KeyValueStore, MemoryStore, RedbStore, UiLanguage};
use crate::utils::{char_count, is_blank};

/// 按键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
    pub ctrl: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            shift: false,
            ctrl: false,
        }
    }
}

/// 复制的目标区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    Input,
    Output,
}

/// 界面事件
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    TextChanged(String),
    CompositionStart,
    CompositionUpdate(String),
    CompositionEnd(String),
    /// 粘贴后的完整文本
    Paste(String),
    KeyDown(KeyPress),
    ManualTranslate,
    Swap,
    SelectSource(String),
    SelectTarget(String),
    SetAutoTranslate(bool),
    OutputEdited(String),
    Copy(CopyTarget),
    OpenHistory,
    CloseHistory,
    SelectHistory(u64),
    ClearHistory,
    SubmitPassword(String),
    SetUiLanguage(UiLanguage),
    Shutdown,
}

/// 派生的控制器阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Idle,
    Composing,
    Pending,
    InFlight,
    /// 结果已展示，提示消息尚未消失
    Cooldown,
}

/// 界面渲染所需的全部状态快照
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub input_text: String,
    pub input_char_count: usize,
    pub preedit: String,
    pub output_text: String,
    pub output_char_count: usize,
    pub source_lang: String,
    pub target_lang: String,
    pub detected_language: Option<String>,
    pub can_swap: bool,
    pub auto_translate: bool,
    pub composing: bool,
    pub pending: bool,
    pub loading: bool,
    pub phase: Phase,
    pub status: Option<StatusMessage>,
    pub history: Vec<HistoryEntry>,
    pub history_open: bool,
    pub ui_language: UiLanguage,
    pub locked: bool,
}

/// `next_tick` 处理了什么
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// 防抖定时器触发，`true` 表示发出了请求
    TimerFired(bool),
    /// 请求完成，`true` 表示结果被应用
    Completed(bool),
    StatusExpired,
}

#[derive(Debug, Default, Clone)]
struct TextArea {
    text: String,
    char_count: usize,
}

impl TextArea {
    fn set(&mut self, text: String) {
        self.char_count = char_count(&text);
        self.text = text;
    }
}

pub struct Translator {
    config: TranslatorConfig,
    input: TextArea,
    output: TextArea,
    detected_language: Option<String>,
    pair: LanguagePair,
    auto_translate: bool,
    composition: CompositionGuard,
    scheduler: DebounceScheduler,
    invoker: TranslationInvoker,
    history: HistoryStore,
    history_open: bool,
    status: StatusBar,
    access: AccessGate,
    ui_language: UiLanguage,
    store: Arc<dyn KeyValueStore>,
    clipboard: Arc<dyn Clipboard>,
    confirm: Arc<dyn Confirm>,
}

impl Translator {
    /// 使用给定的客户端和存储创建控制器
    ///
    /// `confirm` 在清空历史前被询问。
    pub fn new(
        config: TranslatorConfig,
        client: Arc<dyn TranslationClient>,
        store: Arc<dyn KeyValueStore>,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        let history = HistoryStore::load(Arc::clone(&store), config.history_limit);
        let ui_language = UiLanguage::resolve(store.as_ref(), config.locale.as_deref());

        tracing::info!(
            "初始化翻译控制器: {} -> {}, 自动翻译: {}, 界面语言: {}",
            config.source_lang,
            config.target_lang,
            config.auto_translate,
            ui_language
        );

        Self {
            input: TextArea::default(),
            output: TextArea::default(),
            detected_language: None,
            pair: LanguagePair::new(config.source_lang.clone(), config.target_lang.clone()),
            auto_translate: config.auto_translate,
            composition: CompositionGuard::new(),
            scheduler: DebounceScheduler::new(config.debounce),
            invoker: TranslationInvoker::new(client),
            history,
            history_open: false,
            status: StatusBar::new(config.status_timeout()),
            access: AccessGate::new(config.access_password.clone()),
            ui_language,
            store,
            clipboard: Arc::new(NoClipboard),
            confirm,
            config,
        }
    }

    /// 按配置创建 DeepLX 客户端和磁盘存储
    ///
    /// 数据库无法打开时退回内存存储。
    pub fn from_config(config: TranslatorConfig, confirm: Arc<dyn Confirm>) -> TranslationResult<Self> {
        config.validate()?;
        let client: Arc<dyn TranslationClient> = Arc::new(DeepLxClient::new(&config)?);

        let store: Arc<dyn KeyValueStore> = match config.resolved_history_path() {
            Some(path) => match RedbStore::open(&path) {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    tracing::warn!("无法打开历史数据库 {}，使用内存存储: {}", path.display(), e);
                    Arc::new(MemoryStore::new())
                }
            },
            None => {
                tracing::warn!("无法确定数据目录，使用内存存储");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::new(config, client, store, confirm))
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &DebounceScheduler {
        &self.scheduler
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        self.invoker.is_loading()
    }

    pub fn phase(&self) -> Phase {
        if self.composition.is_active() {
            Phase::Composing
        } else if self.invoker.is_loading() {
            Phase::InFlight
        } else if self.scheduler.is_pending() {
            Phase::Pending
        } else if self.status.current().is_some() {
            Phase::Cooldown
        } else {
            Phase::Idle
        }
    }

    /// 当前视图快照
    pub fn view(&self) -> ViewState {
        ViewState {
            input_text: self.input.text.clone(),
            input_char_count: self.input.char_count,
            preedit: self.composition.preedit().to_string(),
            output_text: self.output.text.clone(),
            output_char_count: self.output.char_count,
            source_lang: self.pair.source_lang.clone(),
            target_lang: self.pair.target_lang.clone(),
            detected_language: self.detected_language.clone(),
            can_swap: self.pair.can_swap(),
            auto_translate: self.auto_translate,
            composing: self.composition.is_active(),
            pending: self.scheduler.is_pending(),
            loading: self.invoker.is_loading(),
            phase: self.phase(),
            status: self.status.current().cloned(),
            history: self.history.entries().to_vec(),
            history_open: self.history_open,
            ui_language: self.ui_language,
            locked: !self.access.is_unlocked(),
        }
    }

    /// 处理一个界面事件，返回是否继续运行
    pub fn handle(&mut self, event: UiEvent) -> bool {
        if !self.access.is_unlocked() {
            match event {
                UiEvent::SubmitPassword(password) => self.submit_password(&password),
                UiEvent::Shutdown => return false,
                other => tracing::debug!("未解锁，忽略事件: {:?}", other),
            }
            return true;
        }

        match event {
            UiEvent::TextChanged(text) | UiEvent::Paste(text) => self.text_changed(text),
            UiEvent::CompositionStart => self.composition.start(),
            UiEvent::CompositionUpdate(partial) => self.composition.update(&partial),
            UiEvent::CompositionEnd(text) => self.composition_end(text),
            UiEvent::KeyDown(key) => self.key_down(key),
            UiEvent::ManualTranslate => self.manual_translate(),
            UiEvent::Swap => self.swap(),
            UiEvent::SelectSource(code) => self.select_source(code),
            UiEvent::SelectTarget(code) => self.select_target(code),
            UiEvent::SetAutoTranslate(enabled) => self.set_auto_translate(enabled),
            UiEvent::OutputEdited(text) => self.output.set(text),
            UiEvent::Copy(target) => self.copy(target),
            UiEvent::OpenHistory => self.history_open = true,
            UiEvent::CloseHistory => self.history_open = false,
            UiEvent::SelectHistory(id) => self.select_history(id),
            UiEvent::ClearHistory => self.clear_history(),
            UiEvent::SubmitPassword(password) => self.submit_password(&password),
            UiEvent::SetUiLanguage(lang) => self.set_ui_language(lang),
            UiEvent::Shutdown => return false,
        }
        true
    }

    fn text_changed(&mut self, text: String) {
        self.input.set(text);
        if self.composition.is_active() {
            return;
        }
        self.schedule();
    }

    fn composition_end(&mut self, text: String) {
        let text = self.composition.end(text);
        self.input.set(text);
        self.schedule();
    }

    fn key_down(&mut self, key: KeyPress) {
        if self.composition.is_active() {
            // 输入法用 Enter 提交候选词
            return;
        }
        match key.key {
            Key::Enter if key.ctrl => self.manual_translate(),
            Key::Enter | Key::Tab if !key.shift => {
                self.scheduler.cancel();
                if self.auto_translate {
                    self.translate_now();
                }
            }
            _ => {}
        }
    }

    fn manual_translate(&mut self) {
        self.scheduler.cancel();
        self.translate_now();
    }

    fn swap(&mut self) {
        if !self.pair.swap() {
            return;
        }
        self.scheduler.cancel();
        // 两个文本区都被替换，进行中的结果不再对应任何一侧
        self.invoker.abandon_all();
        std::mem::swap(&mut self.input, &mut self.output);
        self.detected_language = None;
        tracing::debug!("已交换语言: {} -> {}", self.pair.source_lang, self.pair.target_lang);
    }

    fn select_source(&mut self, code: String) {
        if code == self.pair.source_lang {
            return;
        }
        self.pair.source_lang = code;
        self.detected_language = None;
        self.schedule();
    }

    fn select_target(&mut self, code: String) {
        if code == self.pair.target_lang {
            return;
        }
        self.pair.target_lang = code;
        self.schedule();
    }

    fn set_auto_translate(&mut self, enabled: bool) {
        if self.auto_translate == enabled {
            return;
        }
        self.auto_translate = enabled;
        tracing::info!("自动翻译: {}", if enabled { "开启" } else { "关闭" });
        if enabled {
            self.schedule();
        } else {
            self.scheduler.cancel();
        }
    }

    fn copy(&mut self, target: CopyTarget) {
        let text = match target {
            CopyTarget::Input => &self.input.text,
            CopyTarget::Output => &self.output.text,
        };
        match self.clipboard.write_text(text) {
            Ok(()) => self.status.show(MessageKey::CopySuccess),
            Err(e) => {
                helpers::log_error(&e);
                let key = e.status_key().unwrap_or(MessageKey::CopyFailed);
                self.status.show_with_detail(key, Some(e.to_string()));
            }
        }
    }

    fn select_history(&mut self, id: u64) {
        let Some(entry) = self.history.get(id).cloned() else {
            tracing::debug!("历史记录 #{} 不存在", id);
            return;
        };
        self.scheduler.cancel();
        self.invoker.abandon_all();
        self.input.set(entry.source_text);
        self.output.set(entry.translated_text);
        self.pair = LanguagePair::new(entry.source_lang, entry.target_lang);
        self.detected_language = None;
        self.history_open = false;
    }

    fn clear_history(&mut self) {
        if self.history.clear(self.confirm.as_ref()) {
            self.status.show(MessageKey::HistoryCleared);
        }
    }

    fn submit_password(&mut self, password: &str) {
        if !self.access.submit(password) {
            self.status.show(MessageKey::WrongPassword);
        }
    }

    fn set_ui_language(&mut self, lang: UiLanguage) {
        self.ui_language = lang;
        if let Err(e) = lang.persist(self.store.as_ref()) {
            helpers::log_error(&e.with_context("保存界面语言"));
        }
    }

    fn schedule(&mut self) -> ScheduleOutcome {
        let gate = ScheduleGate {
            auto_translate: self.auto_translate,
            in_flight: self.invoker.is_loading(),
            composing: self.composition.is_active(),
        };
        self.scheduler.schedule(&self.input.text, gate)
    }

    fn translate_now(&mut self) -> bool {
        match self.invoker.translate(&self.input.text, &self.pair) {
            Ok(_) => true,
            Err(TranslationError::InvalidInput(reason)) => {
                tracing::debug!("跳过翻译: {}", reason);
                false
            }
            Err(e) => {
                helpers::log_error(&e);
                false
            }
        }
    }

    fn on_timer_fired(&mut self, pending: PendingTranslation) -> bool {
        if self.composition.is_active() || self.invoker.is_loading() {
            tracing::debug!("定时器触发时输入未就绪，等待后续调度");
            return false;
        }
        tracing::debug!(
            "防抖定时器触发 (延迟 {:?}, 调度时 {} 字符)",
            pending.delay,
            char_count(&pending.source_text_snapshot)
        );
        self.translate_now()
    }

    fn on_completed(&mut self, completion: Completion) -> bool {
        let Completion { ticket, outcome } = completion;

        // 请求期间语言对发生变化且会重新翻译时，旧语言对的结果不再展示
        let pair_changed = ticket.pair != self.pair;
        let retranslate = self.auto_translate && !is_blank(&self.input.text);

        let applied = if !self.invoker.is_current(&ticket) {
            tracing::debug!("丢弃过期的翻译结果 #{}", ticket.id);
            false
        } else if pair_changed && retranslate {
            tracing::debug!(
                "丢弃旧语言对的翻译结果 #{}: {} -> {}",
                ticket.id,
                ticket.pair.source_lang,
                ticket.pair.target_lang
            );
            false
        } else {
            match outcome {
                Ok(response) => {
                    let detected = if ticket.pair.source_is_auto() {
                        response.detected_language.clone()
                    } else {
                        None
                    };
                    self.output.set(response.translated_text.clone());
                    self.detected_language = detected.clone();
                    self.status.show(MessageKey::TranslationSuccess);
                    self.history.record(
                        &ticket.text,
                        &response.translated_text,
                        &ticket.pair.source_lang,
                        &ticket.pair.target_lang,
                        detected.as_deref(),
                    );
                    tracing::info!("翻译完成 #{}: {} 字符", ticket.id, self.output.char_count);
                }
                Err(e) => {
                    helpers::log_error(&e);
                    if let Some(key) = e.status_key() {
                        self.status.show_with_detail(key, Some(e.to_string()));
                    }
                }
            }
            true
        };

        // 请求期间的编辑和语言切换不会被调度，最新请求完成后补一次
        let input_changed = self.input.text != ticket.text;
        if self.auto_translate
            && self.invoker.is_latest(&ticket)
            && (input_changed || pair_changed)
        {
            if let ScheduleOutcome::Armed(delay) = self.schedule() {
                tracing::debug!("输入或语言在请求期间发生变化，重新调度 ({:?})", delay);
            }
        }

        applied
    }

    /// 等待并处理下一个异步事件
    ///
    /// 取消安全：在任何分支完成之前丢弃不会改变状态。
    pub async fn next_tick(&mut self) -> Tick {
        tokio::select! {
            pending = self.scheduler.fired() => {
                let sent = self.on_timer_fired(pending);
                Tick::TimerFired(sent)
            }
            completion = self.invoker.completed() => {
                let applied = self.on_completed(completion);
                Tick::Completed(applied)
            }
            _ = self.status.expired() => Tick::StatusExpired,
        }
    }

    /// 在 tokio 任务中运行控制器
    pub fn spawn(self) -> (TranslatorHandle, JoinHandle<()>) {
        let (events_tx, events_rx) = mpsc::channel(64);
        let (view_tx, view_rx) = watch::channel(self.view());
        let task = tokio::spawn(self.run(events_rx, view_tx));
        (
            TranslatorHandle {
                events: events_tx,
                view: view_rx,
            },
            task,
        )
    }

    async fn run(mut self, mut events: mpsc::Receiver<UiEvent>, view: watch::Sender<ViewState>) {
        tracing::info!("翻译控制器已启动");
        loop {
            tokio::select! {
                event = events.recv() => {
                    let keep_running = match event {
                        Some(event) => self.handle(event),
                        None => false,
                    };
                    if !keep_running {
                        break;
                    }
                }
                _ = self.next_tick() => {}
            }
            view.send_replace(self.view());
        }
        self.shutdown();
    }

    /// 释放定时器和进行中的请求
    pub fn shutdown(&mut self) {
        self.scheduler.cancel();
        self.invoker.abandon_all();
        self.status.clear();
        tracing::info!("翻译控制器已停止");
    }
}

/// 运行中控制器的句柄
#[derive(Clone)]
pub struct TranslatorHandle {
    events: mpsc::Sender<UiEvent>,
    view: watch::Receiver<ViewState>,
}

impl TranslatorHandle {
    /// 发送界面事件
    pub async fn send(&self, event: UiEvent) -> TranslationResult<()> {
        self.events
            .send(event)
            .await
            .map_err(|_| helpers::internal_error("翻译控制器已停止"))
    }

    /// 当前视图快照
    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    /// 等待视图更新
    pub async fn changed(&mut self) -> TranslationResult<ViewState> {
        self.view
            .changed()
            .await
            .map_err(|_| helpers::internal_error("翻译控制器已停止"))?;
        Ok(self.view.borrow_and_update().clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.clone()
    }

    pub async fn shutdown(&self) -> TranslationResult<()> {
        self.send(UiEvent::Shutdown).await
    }
}
