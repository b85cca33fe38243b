//! 历史记录与持久化集成测试

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use libretranslator::translation::config::constants::{HISTORY_KEY, UI_LANGUAGE_KEY};
use libretranslator::translation::core::{AlwaysConfirm, Confirm, MessageKey, UiEvent};
use libretranslator::translation::storage::{
    HistoryStore, KeyValueStore, MemoryStore, RedbStore, UiLanguage,
};
use libretranslator::translation::{Translator, TranslatorConfig};

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{settle, MockClient, TestTranslatorBuilder};

/// 第 51 条记录淘汰最旧的记录
#[test]
fn test_history_keeps_newest_fifty() {
    let backend = MemoryStore::new();
    let mut history = HistoryStore::load(Arc::new(backend.clone()), 50);

    for i in 0..51 {
        history.record(&format!("source {}", i), &format!("target {}", i), "EN", "DE", None);
    }

    assert_eq!(history.len(), 50);
    assert_eq!(history.entries()[0].source_text, "source 50");
    assert_eq!(history.entries()[49].source_text, "source 1");
    assert!(history.entries().iter().all(|e| e.source_text != "source 0"));

    let ids: Vec<u64> = history.entries().iter().map(|e| e.id).collect();
    assert!(ids.windows(2).all(|w| w[0] > w[1]), "ids strictly decrease from newest");

    let persisted: Vec<serde_json::Value> =
        serde_json::from_str(&backend.get(HISTORY_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted.len(), 50);
    println!("✅ 历史上限 50 条");
}

/// 损坏的数据被丢弃，从空历史开始
#[test]
fn test_corrupt_history_starts_empty() {
    for blob in ["{not json", "42", r#"[{"id":"x"}]"#, ""] {
        let backend = MemoryStore::new();
        backend.set(HISTORY_KEY, blob).unwrap();

        let mut history = HistoryStore::load(Arc::new(backend.clone()), 50);
        assert!(history.is_empty(), "blob {:?} should be discarded", blob);
        assert_eq!(backend.get(HISTORY_KEY).unwrap(), None);

        history.record("hello", "hallo", "EN", "DE", None);
        assert_eq!(history.len(), 1);
        println!("✅ 损坏数据 {:?} 已丢弃", blob);
    }
}

/// 控制器启动时遇到损坏数据照常工作
#[tokio::test(start_paused = true)]
async fn test_translator_recovers_from_corrupt_history() {
    let backend = MemoryStore::new();
    backend.set(HISTORY_KEY, "]]garbage[[").unwrap();

    let mut env = TestTranslatorBuilder::new().store(backend.clone()).build();
    let t = &mut env.translator;
    assert!(t.view().history.is_empty());

    t.handle(UiEvent::TextChanged("hello".to_string()));
    t.handle(UiEvent::ManualTranslate);
    settle(t).await;

    assert_eq!(t.view().history.len(), 1);
    assert!(backend.get(HISTORY_KEY).unwrap().unwrap().contains("hello"));
}

/// 选择历史记录恢复文本与语言，不触发翻译
#[tokio::test(start_paused = true)]
async fn test_select_history_restores_without_translating() {
    let mut env = TestTranslatorBuilder::new()
        .auto_translate(true)
        .languages("EN", "DE")
        .build();
    let t = &mut env.translator;

    t.handle(UiEvent::TextChanged("good night".to_string()));
    settle(t).await;
    let id = t.view().history[0].id;

    t.handle(UiEvent::SelectTarget("FR".to_string()));
    t.handle(UiEvent::TextChanged("something else".to_string()));
    settle(t).await;
    assert_eq!(env.client.calls().len(), 2);

    t.handle(UiEvent::OpenHistory);
    assert!(t.view().history_open);
    t.handle(UiEvent::SelectHistory(id));

    let view = t.view();
    assert!(!view.history_open);
    assert!(!view.pending);
    assert_eq!(view.input_text, "good night");
    assert_eq!(view.output_text, MockClient::expected_echo("good night", "DE"));
    assert_eq!(view.target_lang, "DE");
    assert_eq!(env.client.calls().len(), 2);
}

/// 按用户回答决定是否确认
struct ScriptedConfirm {
    answer: AtomicBool,
    prompts: Mutex<Vec<String>>,
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer.load(Ordering::SeqCst)
    }
}

/// 清空历史需要确认
#[tokio::test(start_paused = true)]
async fn test_clear_history_is_confirmed() {
    let confirm = Arc::new(ScriptedConfirm {
        answer: AtomicBool::new(false),
        prompts: Mutex::new(Vec::new()),
    });
    let store = MemoryStore::new();
    let client = Arc::new(MockClient::new(std::time::Duration::from_millis(100)));
    let mut t = Translator::new(
        TranslatorConfig::default(),
        client,
        Arc::new(store.clone()),
        confirm.clone(),
    );

    t.handle(UiEvent::TextChanged("hello".to_string()));
    t.handle(UiEvent::ManualTranslate);
    settle(&mut t).await;

    t.handle(UiEvent::ClearHistory);
    assert_eq!(t.view().history.len(), 1, "declined clear keeps history");

    confirm.answer.store(true, Ordering::SeqCst);
    t.handle(UiEvent::ClearHistory);
    let view = t.view();
    assert!(view.history.is_empty());
    assert_eq!(view.status.map(|s| s.key), Some(MessageKey::HistoryCleared));
    assert_eq!(store.get(HISTORY_KEY).unwrap(), None);
    assert_eq!(confirm.prompts.lock().unwrap().len(), 2);
}

/// 默认构建的测试控制器拒绝清空时不会丢失历史
#[tokio::test(start_paused = true)]
async fn test_declined_clear_via_builder() {
    let mut env = TestTranslatorBuilder::new().confirm(false).build();
    let t = &mut env.translator;
    t.handle(UiEvent::TextChanged("hello".to_string()));
    t.handle(UiEvent::ManualTranslate);
    settle(t).await;

    t.handle(UiEvent::ClearHistory);
    assert_eq!(t.view().history.len(), 1);
    assert!(env.store.get(HISTORY_KEY).unwrap().is_some());
}

/// redb 存储在重启后保留历史和界面语言
#[tokio::test(start_paused = true)]
async fn test_redb_persistence_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.redb");

    {
        let store: Arc<dyn KeyValueStore> = Arc::new(RedbStore::open(&path).unwrap());
        let client = Arc::new(MockClient::new(std::time::Duration::from_millis(100)));
        let mut t = Translator::new(TranslatorConfig::default(), client, store, Arc::new(AlwaysConfirm(false)));

        t.handle(UiEvent::TextChanged("persist me".to_string()));
        t.handle(UiEvent::ManualTranslate);
        settle(&mut t).await;
        t.handle(UiEvent::SetUiLanguage(UiLanguage::De));
    }

    let store = RedbStore::open(&path).unwrap();
    assert_eq!(store.get(UI_LANGUAGE_KEY).unwrap().as_deref(), Some("de"));

    let store: Arc<dyn KeyValueStore> = Arc::new(store);
    let client = Arc::new(MockClient::new(std::time::Duration::from_millis(100)));
    let t = Translator::new(TranslatorConfig::default(), client, store, Arc::new(AlwaysConfirm(false)));
    let view = t.view();
    assert_eq!(view.ui_language, UiLanguage::De);
    assert_eq!(view.history.len(), 1);
    assert_eq!(view.history[0].source_text, "persist me");
}

/// 界面语言从区域设置推断
#[test]
fn test_ui_language_detection() {
    let cases = [
        (Some("zh-CN"), UiLanguage::Zh),
        (Some("de_CH.UTF-8"), UiLanguage::De),
        (Some("en-GB"), UiLanguage::En),
        (Some("pt-BR"), UiLanguage::En),
        (None, UiLanguage::En),
    ];

    for (locale, expected) in cases {
        let config = TranslatorConfig {
            locale: locale.map(str::to_string),
            ..TranslatorConfig::default()
        };
        let client = Arc::new(MockClient::new(std::time::Duration::ZERO));
        let t = Translator::new(
            config,
            client,
            Arc::new(MemoryStore::new()),
            Arc::new(AlwaysConfirm(false)),
        );
        assert_eq!(t.view().ui_language, expected, "locale {:?}", locale);
    }
}
