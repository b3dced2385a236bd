//! OpenAI 호환 Chat Completions 요약기.
//!
//! `{base_url}/chat/completions`에 단일 사용자 메시지를 보내고 첫 번째 응답의
//! 본문을 요약으로 사용합니다.

use std::time::Duration;

use async_trait::async_trait;
use scope_core::{AggregationReport, SummaryConfig};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::prompt::build_prompt;
use crate::types::{SummaryError, SummaryRequester, SummaryResult};

/// API 키 환경 변수 이름.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// 요약기 설정.
///
/// API 키는 실행 시 전달받으며 설정 파일에 저장하지 않습니다.
#[derive(Debug)]
pub struct OpenAiConfig {
    /// API 키
    pub api_key: SecretString,
    /// 모델 식별자
    pub model: String,
    /// 최대 출력 토큰
    pub max_tokens: u32,
    /// API 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    /// 요약 설정과 API 키로 생성합니다.
    pub fn from_settings(settings: &SummaryConfig, api_key: SecretString) -> Self {
        Self {
            api_key,
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            base_url: settings.base_url.clone(),
            timeout_secs: settings.timeout_secs,
        }
    }

    /// `OPENAI_API_KEY` 환경 변수에서 키를 읽어 생성합니다.
    pub fn from_env(settings: &SummaryConfig) -> Option<Self> {
        let key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())?;
        Some(Self::from_settings(settings, SecretString::from(key)))
    }

    /// 기본 URL 지정.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatContent,
}

#[derive(Debug, Deserialize)]
struct ChatContent {
    content: Option<String>,
}

/// OpenAI Chat Completions 요약기.
pub struct OpenAiSummarizer {
    config: OpenAiConfig,
    client: reqwest::Client,
    in_flight: Mutex<()>,
}

impl OpenAiSummarizer {
    /// 새 요약기를 생성합니다.
    ///
    /// API 키가 비어 있으면 `MissingApiKey`를 반환합니다.
    pub fn new(config: OpenAiConfig) -> SummaryResult<Self> {
        if config.api_key.expose_secret().trim().is_empty() {
            return Err(SummaryError::MissingApiKey);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SummaryError::Network(e.to_string()))?;

        Ok(Self {
            config,
            client,
            in_flight: Mutex::new(()),
        })
    }

    /// 사용 중인 모델.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn request(&self, prompt: &str) -> SummaryResult<String> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.config.max_tokens,
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "requesting summary");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&text);
            warn!(status = status.as_u16(), "summary request failed");
            return Err(match status.as_u16() {
                401 => SummaryError::Unauthorized(message),
                429 => SummaryError::RateLimited(message),
                code => SummaryError::Api { status: code, message },
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| SummaryError::Parse("응답에 요약 내용이 없습니다".to_string()))?;

        info!(chars = content.chars().count(), "summary received");
        Ok(content)
    }
}

/// 에러 응답 본문에서 메시지를 추출합니다 (`{"error": {"message": ...}}`).
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl SummaryRequester for OpenAiSummarizer {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn summarize(&self, report: &AggregationReport, instructions: &str) -> SummaryResult<String> {
        let _guard = self.in_flight.try_lock().map_err(|_| SummaryError::Busy)?;
        let prompt = build_prompt(report, instructions)?;
        self.request(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use scope_core::{Timeframe, TimeframeSnapshot};

    fn config(key: &str) -> OpenAiConfig {
        OpenAiConfig::from_settings(&SummaryConfig::default(), SecretString::from(key.to_string()))
    }

    fn report() -> AggregationReport {
        let mut report = AggregationReport::new("BTCUSDT");
        report.insert(TimeframeSnapshot {
            label: "1분봉".to_string(),
            interval: Timeframe::M1,
            timestamp: DateTime::from_timestamp(0, 0).unwrap(),
            close: 100.0,
            volume: 1.0,
            rsi: 50.0,
            ema20: 100.0,
            ema50: 100.0,
            ema200: 100.0,
            stoch_rsi: None,
        });
        report
    }

    #[test]
    fn test_empty_key_is_rejected() {
        assert_eq!(OpenAiSummarizer::new(config("  ")).err(), Some(SummaryError::MissingApiKey));
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let debug = format!("{:?}", config("sk-very-secret"));
        assert!(!debug.contains("sk-very-secret"));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error":{"message":"Incorrect API key"}}"#),
            "Incorrect API key"
        );
        assert_eq!(error_message("gateway down"), "gateway down");
    }

    #[tokio::test]
    async fn test_concurrent_call_is_busy() {
        let summarizer = OpenAiSummarizer::new(config("sk-test")).unwrap();
        let _held = summarizer.in_flight.try_lock().unwrap();

        let result = summarizer.summarize(&report(), "요약").await;
        assert_eq!(result, Err(SummaryError::Busy));
    }

    #[tokio::test]
    async fn test_empty_report_fails_before_request() {
        let summarizer = OpenAiSummarizer::new(config("sk-test").with_base_url("http://127.0.0.1:9")).unwrap();
        let result = summarizer.summarize(&AggregationReport::new("BTCUSDT"), "요약").await;
        assert_eq!(result, Err(SummaryError::EmptyReport));
    }
}
