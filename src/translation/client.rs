//! DeepLX 兼容翻译接口客户端
//!
//! 请求体为 `{ text, target_lang, source_lang? }`，源语言为 AUTO 时省略
//! `source_lang` 由服务端自动检测。响应分类：
//!
//! - 2xx 且 `code == 200`：成功
//! - 2xx 且 `code != 200`，或非 2xx 状态：接口失败
//! - 网络错误、超时、响应无法解析：传输失败

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::translation::config::{TokenPlacement, TranslatorConfig};
use crate::translation::core::language::is_auto;
use crate::translation::error::{TranslationError, TranslationResult};

/// 翻译请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_lang: Option<String>,
    pub target_lang: String,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, source_lang: &str, target_lang: &str) -> Self {
        Self {
            text: text.into(),
            source_lang: (!is_auto(source_lang)).then(|| source_lang.to_string()),
            target_lang: target_lang.to_string(),
        }
    }
}

/// 成功的翻译结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResponse {
    pub translated_text: String,
    pub detected_language: Option<String>,
}

/// 接口响应信封
#[derive(Debug, Deserialize)]
struct Envelope {
    code: i64,
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    detected_language: Option<String>,
    /// DeepLX 在这里返回检测到的源语言
    #[serde(default)]
    source_lang: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// 翻译接口抽象
#[async_trait]
pub trait TranslationClient: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> TranslationResult<TranslationResponse>;
}

/// 解析接口响应
pub fn parse_envelope(status: u16, body: &str) -> TranslationResult<TranslationResponse> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<Envelope>(body)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| body.trim().to_string());
        return Err(TranslationError::ApplicationFailure {
            code: i64::from(status),
            message,
        });
    }

    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| TranslationError::TransportFailure(format!("响应解析失败: {}", e)))?;

    if envelope.code != 200 {
        return Err(TranslationError::ApplicationFailure {
            code: envelope.code,
            message: envelope.message.unwrap_or_default(),
        });
    }

    let translated_text = envelope
        .data
        .ok_or_else(|| TranslationError::TransportFailure("响应缺少 data 字段".to_string()))?;

    let detected_language = envelope
        .detected_language
        .or(envelope.source_lang)
        .filter(|lang| !lang.trim().is_empty() && !is_auto(lang));

    Ok(TranslationResponse {
        translated_text,
        detected_language,
    })
}

/// 基于 reqwest 的 DeepLX 客户端
#[derive(Debug, Clone)]
pub struct DeepLxClient {
    http: reqwest::Client,
    api_url: String,
    access_token: Option<String>,
    token_placement: TokenPlacement,
}

impl DeepLxClient {
    pub fn new(config: &TranslatorConfig) -> TranslationResult<Self> {
        Self::with_options(
            &config.api_url,
            config.access_token.clone(),
            config.token_placement,
            config.request_timeout(),
        )
    }

    pub fn with_options(
        api_url: &str,
        access_token: Option<String>,
        token_placement: TokenPlacement,
        timeout: Duration,
    ) -> TranslationResult<Self> {
        url::Url::parse(api_url)
            .map_err(|e| TranslationError::ConfigError(format!("无效的 API URL '{}': {}", api_url, e)))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslationError::ConfigError(format!("创建 HTTP 客户端失败: {}", e)))?;

        Ok(Self {
            http,
            api_url: api_url.to_string(),
            access_token: access_token.filter(|t| !t.is_empty()),
            token_placement,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl TranslationClient for DeepLxClient {
    async fn translate(&self, request: &TranslationRequest) -> TranslationResult<TranslationResponse> {
        let mut builder = self.http.post(&self.api_url).json(request);

        if let Some(token) = &self.access_token {
            builder = match self.token_placement {
                TokenPlacement::Header => builder.bearer_auth(token),
                TokenPlacement::Query => builder.query(&[("token", token)]),
            };
        }

        tracing::debug!(
            "发送翻译请求: {} 字符, {} -> {}",
            request.text.chars().count(),
            request.source_lang.as_deref().unwrap_or("AUTO"),
            request.target_lang
        );

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_envelope(status, &body)
    }
}
