//! Binance 클라인 커넥터.
//!
//! 공개 REST 엔드포인트 `/api/v3/klines`만 사용하므로 인증이 필요 없습니다.

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use scope_core::{Candle, CandleSeries, MarketDataConfig, Timeframe};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use crate::traits::{ExchangeResult, MarketDataSource};
use crate::ExchangeError;

const KLINES_ENDPOINT: &str = "/api/v3/klines";

// ============================================================================
// 설정
// ============================================================================

/// Binance 클라이언트 설정.
#[derive(Debug, Clone)]
pub struct BinanceConfig {
    /// REST API 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            timeout_secs: 10,
        }
    }
}

impl BinanceConfig {
    /// 기본 URL을 지정해 설정 생성.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// 타임아웃 설정.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// 애플리케이션 설정에서 생성.
    pub fn from_settings(settings: &MarketDataConfig) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            timeout_secs: settings.timeout_secs,
        }
    }

    fn rest_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

// ============================================================================
// API 응답 타입
// ============================================================================

#[derive(Debug, Deserialize)]
struct BinanceError {
    code: i32,
    msg: String,
}

// ============================================================================
// Binance 클라이언트
// ============================================================================

/// Binance 클라인 클라이언트.
#[derive(Debug, Clone)]
pub struct BinanceClient {
    config: BinanceConfig,
    client: Client,
}

impl BinanceClient {
    /// 새 Binance 클라이언트 생성.
    ///
    /// # Errors
    /// HTTP 클라이언트 생성에 실패하면 `ExchangeError::NetworkError`를 반환합니다.
    pub fn new(config: BinanceConfig) -> Result<Self, ExchangeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ExchangeError::NetworkError(format!("HTTP 클라이언트 생성 실패: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// 공개 API 요청 (인증 불필요).
    async fn public_get(&self, endpoint: &str, params: &[(&str, String)]) -> ExchangeResult<Value> {
        let url = format!("{}{}", self.config.rest_base_url(), endpoint);
        debug!(url = %url, ?params, "GET");

        let response = self.client.get(&url).query(params).send().await?;

        self.handle_response(response).await
    }

    /// API 응답 처리.
    async fn handle_response(&self, response: reqwest::Response) -> ExchangeResult<Value> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| {
                error!("Failed to parse response: {} - Body: {}", e, body);
                ExchangeError::ParseError(e.to_string())
            });
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ExchangeError::RateLimited);
        }

        // 에러 응답 파싱 시도
        match serde_json::from_str::<BinanceError>(&body) {
            Ok(err) => Err(Self::map_error_code(err.code, &err.msg)),
            Err(_) => Err(ExchangeError::ApiError {
                code: i32::from(status.as_u16()),
                message: body,
            }),
        }
    }

    /// Binance 에러 코드를 ExchangeError로 매핑.
    fn map_error_code(code: i32, msg: &str) -> ExchangeError {
        match code {
            -1003 => ExchangeError::RateLimited,
            -1121 => ExchangeError::SymbolNotFound(msg.to_string()),
            -2014 | -2015 => ExchangeError::Unauthorized(msg.to_string()),
            _ => ExchangeError::ApiError {
                code,
                message: msg.to_string(),
            },
        }
    }

    /// 클라인 응답 본문을 캔들 시계열로 변환.
    ///
    /// 각 행은 `[open_time, open, high, low, close, volume, ...]` 형식이며
    /// 숫자는 문자열 또는 JSON 숫자로 올 수 있습니다. 나머지 필드는 무시합니다.
    pub fn parse_klines(body: &Value) -> ExchangeResult<CandleSeries> {
        let rows = body
            .as_array()
            .ok_or_else(|| ExchangeError::ParseError("응답이 JSON 배열이 아닙니다".to_string()))?;

        let candles = rows
            .iter()
            .enumerate()
            .map(|(i, row)| Self::parse_kline_row(i, row))
            .collect::<ExchangeResult<Vec<_>>>()?;

        CandleSeries::new(candles).map_err(|e| ExchangeError::ParseError(e.to_string()))
    }

    fn parse_kline_row(index: usize, row: &Value) -> ExchangeResult<Candle> {
        let fields = row
            .as_array()
            .filter(|f| f.len() >= 6)
            .ok_or_else(|| {
                ExchangeError::ParseError(format!("{}번째 행: 필드가 6개 미만인 배열이 아닙니다", index))
            })?;

        let number = |pos: usize, name: &str| -> ExchangeResult<f64> {
            let parsed = match &fields[pos] {
                Value::String(s) => s.parse::<f64>().ok(),
                Value::Number(n) => n.as_f64(),
                _ => None,
            };
            parsed.filter(|v| v.is_finite()).ok_or_else(|| {
                ExchangeError::ParseError(format!(
                    "{}번째 행: {} 값을 숫자로 읽을 수 없습니다: {}",
                    index, name, fields[pos]
                ))
            })
        };

        let open_time_ms = match &fields[0] {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse::<i64>().ok(),
            _ => None,
        }
        .ok_or_else(|| ExchangeError::ParseError(format!("{}번째 행: open_time이 잘못되었습니다", index)))?;

        let timestamp = DateTime::from_timestamp_millis(open_time_ms).ok_or_else(|| {
            ExchangeError::ParseError(format!("{}번째 행: 범위를 벗어난 시간 {}", index, open_time_ms))
        })?;

        Ok(Candle::new(
            timestamp,
            number(1, "open")?,
            number(2, "high")?,
            number(3, "low")?,
            number(4, "close")?,
            number(5, "volume")?,
        ))
    }
}

#[async_trait]
impl MarketDataSource for BinanceClient {
    fn name(&self) -> &str {
        "Binance"
    }

    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: u32,
    ) -> ExchangeResult<CandleSeries> {
        let body = self
            .public_get(
                KLINES_ENDPOINT,
                &[
                    ("symbol", symbol.to_uppercase()),
                    ("interval", timeframe.as_interval().to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        let series = Self::parse_klines(&body)?;
        debug!(
            symbol,
            interval = %timeframe,
            candles = series.len(),
            "klines received"
        );
        Ok(series)
    }
}
