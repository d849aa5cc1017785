//! 翻译代理
//!
//! 使用 Google Cloud Translation v2 REST API。
//! ureq 是同步客户端，请求放到 spawn_blocking 中执行；
//! 结果按 (目标语言, 原文) 缓存在 moka 中。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, trace, warn};
use ureq::Agent;

use crate::config::TranslateConfig;
use crate::errors::{BlogError, Result};

#[async_trait]
pub trait Translator: Send + Sync {
    /// 翻译一组文本，输出与输入一一对应
    async fn translate(&self, texts: &[String], target_language: &str) -> Result<Vec<String>>;

    fn name(&self) -> &'static str;
}

/// 根据配置选择实现：未配置 API key 时返回 [`DisabledTranslator`]
pub fn translator_from_config(config: &TranslateConfig) -> Arc<dyn Translator> {
    if config.api_key.trim().is_empty() {
        warn!("translate.api_key is empty, /api/translate will return 503");
        Arc::new(DisabledTranslator)
    } else {
        Arc::new(GoogleTranslator::new(config))
    }
}

// ============ DisabledTranslator ============

pub struct DisabledTranslator;

#[async_trait]
impl Translator for DisabledTranslator {
    async fn translate(&self, _texts: &[String], _target_language: &str) -> Result<Vec<String>> {
        Err(BlogError::service_unavailable(
            "Translation service is not configured.",
        ))
    }

    fn name(&self) -> &'static str {
        "Disabled"
    }
}

// ============ GoogleTranslator ============

#[derive(Deserialize)]
struct TranslateEnvelope {
    data: TranslateData,
}

#[derive(Deserialize)]
struct TranslateData {
    translations: Vec<TranslationItem>,
}

#[derive(Deserialize)]
struct TranslationItem {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    message: String,
}

pub struct GoogleTranslator {
    agent: Agent,
    api_key: String,
    endpoint: String,
    cache: Cache<String, String>,
}

fn cache_key(target_language: &str, text: &str) -> String {
    format!("{}\u{0}{}", target_language, text)
}

impl GoogleTranslator {
    pub fn new(config: &TranslateConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs.max(1))))
            .http_status_as_error(false)
            .build()
            .into();

        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .max_capacity(config.cache_capacity)
            .build();

        Self {
            agent,
            api_key: config.api_key.clone(),
            endpoint: config.endpoint.clone(),
            cache,
        }
    }

    /// 同步请求（在 spawn_blocking 中调用）
    fn request_sync(
        agent: Agent,
        endpoint: String,
        api_key: String,
        texts: Vec<String>,
        target_language: String,
    ) -> Result<Vec<String>> {
        let body = json!({
            "q": texts,
            "target": target_language,
            "format": "text",
        });

        let response = agent
            .post(&endpoint)
            .query("key", &api_key)
            .send_json(&body)
            .map_err(|e| BlogError::external_service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let reason = response
                .into_body()
                .read_json::<GoogleErrorEnvelope>()
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            return Err(BlogError::external_service(reason));
        }

        let envelope: TranslateEnvelope = response
            .into_body()
            .read_json()
            .map_err(|e| BlogError::external_service(format!("invalid response: {}", e)))?;

        let translated: Vec<String> = envelope
            .data
            .translations
            .into_iter()
            .map(|t| t.translated_text)
            .collect();

        if translated.len() != texts.len() {
            return Err(BlogError::external_service(format!(
                "expected {} translations, got {}",
                texts.len(),
                translated.len()
            )));
        }
        Ok(translated)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, texts: &[String], target_language: &str) -> Result<Vec<String>> {
        let mut results: Vec<Option<String>> = Vec::with_capacity(texts.len());
        let mut missing: Vec<(usize, String)> = Vec::new();

        for (i, text) in texts.iter().enumerate() {
            match self.cache.get(&cache_key(target_language, text)).await {
                Some(hit) => results.push(Some(hit)),
                None => {
                    results.push(None);
                    missing.push((i, text.clone()));
                }
            }
        }

        trace!(
            "Translation cache: {} hits, {} misses",
            texts.len() - missing.len(),
            missing.len()
        );

        if !missing.is_empty() {
            let agent = self.agent.clone();
            let endpoint = self.endpoint.clone();
            let api_key = self.api_key.clone();
            let target = target_language.to_string();
            let batch: Vec<String> = missing.iter().map(|(_, t)| t.clone()).collect();

            let translated = tokio::task::spawn_blocking(move || {
                Self::request_sync(agent, endpoint, api_key, batch, target)
            })
            .await
            .map_err(|e| BlogError::external_service(format!("translation task failed: {}", e)))??;

            for ((index, original), value) in missing.into_iter().zip(translated) {
                self.cache
                    .insert(cache_key(target_language, &original), value.clone())
                    .await;
                results[index] = Some(value);
            }
            debug!("Translated {} text(s) to {}", texts.len(), target_language);
        }

        Ok(results.into_iter().map(Option::unwrap_or_default).collect())
    }

    fn name(&self) -> &'static str {
        "GoogleTranslate"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_separates_languages() {
        assert_ne!(cache_key("ja", "hello"), cache_key("en", "hello"));
        assert_ne!(cache_key("ja", "a\u{0}b"), cache_key("ja\u{0}a", "b"));
    }

    #[tokio::test]
    async fn test_disabled_translator_is_unavailable() {
        let translator = DisabledTranslator;
        let err = translator
            .translate(&["hello".to_string()], "ja")
            .await
            .unwrap_err();
        assert!(matches!(err, BlogError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_factory_without_key_is_disabled() {
        let config = TranslateConfig::default();
        assert_eq!(translator_from_config(&config).name(), "Disabled");

        let config = TranslateConfig {
            api_key: "k".to_string(),
            ..TranslateConfig::default()
        };
        assert_eq!(translator_from_config(&config).name(), "GoogleTranslate");
    }

    #[tokio::test]
    async fn test_cached_translations_skip_network() {
        let config = TranslateConfig {
            api_key: "k".to_string(),
            // 不可达端点：只要缓存命中就不会发请求
            endpoint: "http://127.0.0.1:9/unreachable".to_string(),
            ..TranslateConfig::default()
        };
        let translator = GoogleTranslator::new(&config);
        translator
            .cache
            .insert(cache_key("ja", "hello"), "こんにちは".to_string())
            .await;

        let out = translator
            .translate(&["hello".to_string()], "ja")
            .await
            .unwrap();
        assert_eq!(out, vec!["こんにちは".to_string()]);
    }
}
