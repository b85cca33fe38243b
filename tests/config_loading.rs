//! 配置加载集成测试
//!
//! 配置文件解析、环境变量覆盖与环境变量文档

use std::sync::Mutex;

use libretranslator::env::{generate_env_docs, EnvConfig};
use libretranslator::translation::config::{ConfigManager, TokenPlacement, TranslatorConfig};
use libretranslator::translation::error::TranslationError;

/// 环境变量是进程级状态，读写它的测试串行执行
static ENV_LOCK: Mutex<()> = Mutex::new(());

const OVERRIDES: &[(&str, &str)] = &[
    ("LIBRETRANSLATOR_API_URL", "https://env.example.com/translate"),
    ("LIBRETRANSLATOR_TARGET_LANG", "DE"),
    ("LIBRETRANSLATOR_AUTO_TRANSLATE", "yes"),
    ("LIBRETRANSLATOR_DEBOUNCE_MAX_MS", "1800"),
    ("LIBRETRANSLATOR_HISTORY_LIMIT", "not-a-number"),
    ("LIBRETRANSLATOR_PASSWORD", "hunter2"),
];

fn write_config(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// TOML 配置文件
#[test]
fn test_load_toml_file() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "libretranslator.toml",
        r#"
        api_url = "https://deeplx.example.com/translate"
        access_token = "secret"
        token_placement = "query"
        source_lang = "AUTO"
        target_lang = "JA"
        history_limit = 20

        [debounce]
        base_ms = 400
        min_ms = 400
        "#,
    );

    let config = ConfigManager::from_file(&path).unwrap().into_config();
    assert_eq!(config.api_url, "https://deeplx.example.com/translate");
    assert_eq!(config.access_token.as_deref(), Some("secret"));
    assert_eq!(config.token_placement, TokenPlacement::Query);
    assert_eq!(config.source_lang, "AUTO");
    assert_eq!(config.target_lang, "JA");
    assert_eq!(config.history_limit, 20);
    assert_eq!(config.debounce.base_ms, 400);
    assert_eq!(config.debounce.max_ms, 1500);
    println!("✅ TOML 配置加载成功");
}

/// JSON 配置文件按扩展名识别
#[test]
fn test_load_json_file() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "libretranslator.json",
        r#"{ "target_lang": "FR", "auto_translate": true, "debounce": { "max_ms": 1200 } }"#,
    );

    let config = ConfigManager::from_file(&path).unwrap().into_config();
    assert_eq!(config.target_lang, "FR");
    assert!(config.auto_translate);
    assert_eq!(config.debounce.max_ms, 1200);
    assert_eq!(config.api_url, TranslatorConfig::default().api_url);
}

/// 无效配置文件返回配置错误
#[test]
fn test_invalid_files_are_config_errors() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();

    let cases = [
        ("broken.toml", "api_url = [unterminated"),
        ("auto-target.toml", r#"target_lang = "auto""#),
        ("inverted.toml", "[debounce]\nmin_ms = 2000\nmax_ms = 1000"),
        ("broken.json", "{ nope"),
    ];

    for (name, content) in cases {
        let path = write_config(&dir, name, content);
        let result = ConfigManager::from_file(&path);
        assert!(
            matches!(result, Err(TranslationError::ConfigError(_))),
            "{} should be rejected",
            name
        );
        println!("✅ {} 被拒绝", name);
    }

    let missing = dir.path().join("missing.toml");
    assert!(matches!(
        ConfigManager::from_file(&missing),
        Err(TranslationError::ConfigError(_))
    ));
}

/// 环境变量覆盖配置文件，无效值被忽略
#[test]
fn test_env_overrides_file_values() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "libretranslator.toml",
        "api_url = \"https://file.example.com/translate\"\nhistory_limit = 30\n",
    );

    for (name, value) in OVERRIDES {
        std::env::set_var(name, value);
    }

    let result = ConfigManager::from_file(&path);
    let env_config = EnvConfig::from_env();

    for (name, _) in OVERRIDES {
        std::env::remove_var(name);
    }

    let config = result.unwrap().into_config();
    assert_eq!(config.api_url, "https://env.example.com/translate");
    assert_eq!(config.target_lang, "DE");
    assert!(config.auto_translate);
    assert_eq!(config.debounce.max_ms, 1800);
    assert_eq!(config.history_limit, 30, "invalid override keeps the file value");
    assert_eq!(config.access_password.as_deref(), Some("hunter2"));

    assert!(env_config.is_err(), "strict env loading reports the bad limit");
    println!("✅ 环境变量覆盖生效");
}

/// 环境变量文档覆盖所有变量
#[test]
fn test_env_docs_list_variables() {
    let docs = generate_env_docs();
    for name in [
        "LIBRETRANSLATOR_API_URL",
        "LIBRETRANSLATOR_DEBOUNCE_BASE_MS",
        "LIBRETRANSLATOR_STATUS_TIMEOUT_MS",
        "LIBRETRANSLATOR_HISTORY_LIMIT",
        "LIBRETRANSLATOR_PASSWORD",
    ] {
        assert!(docs.contains(name), "missing {}", name);
    }
}
