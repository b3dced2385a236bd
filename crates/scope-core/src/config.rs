//! 설정 관리.
//!
//! 파일(TOML)과 `SCOPE__` 접두사 환경 변수에서 설정을 로드합니다.
//! 언어 모델 API 키는 설정에 포함하지 않으며 실행 시점에 따로 전달합니다.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{ScopeError, ScopeResult};
use crate::types::Timeframe;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 분석 대상 심볼 (예: BTCUSDT)
    pub symbol: String,
    /// 타임프레임 정의 (순서 = 리포트 순서)
    pub timeframes: Vec<TimeframeConfig>,
    /// 시장 데이터 요청 설정
    pub market_data: MarketDataConfig,
    /// 지표 설정
    pub indicators: IndicatorConfig,
    /// 요약 설정
    pub summary: SummaryConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".to_string(),
            timeframes: default_timeframes(),
            market_data: MarketDataConfig::default(),
            indicators: IndicatorConfig::default(),
            summary: SummaryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// 타임프레임 하나의 정의.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeframeConfig {
    /// 표시용 라벨
    pub label: String,
    /// 캔들 간격 문자열 (예: "1m", "4h")
    pub interval: String,
    /// 요청할 캔들 수
    pub limit: u32,
}

impl TimeframeConfig {
    /// 새 타임프레임 정의를 생성합니다.
    pub fn new(label: impl Into<String>, interval: impl Into<String>, limit: u32) -> Self {
        Self {
            label: label.into(),
            interval: interval.into(),
            limit,
        }
    }

    /// 간격 문자열을 파싱합니다.
    pub fn timeframe(&self) -> ScopeResult<Timeframe> {
        self.interval.parse().map_err(|_| {
            ScopeError::Config(format!(
                "{}: 알 수 없는 간격 '{}'",
                self.label, self.interval
            ))
        })
    }
}

fn default_timeframes() -> Vec<TimeframeConfig> {
    vec![
        TimeframeConfig::new("1분봉", "1m", 100),
        TimeframeConfig::new("5분봉", "5m", 200),
        TimeframeConfig::new("15분봉", "15m", 100),
        TimeframeConfig::new("1시간봉", "1h", 100),
        TimeframeConfig::new("4시간봉", "4h", 100),
    ]
}

/// 시장 데이터 요청 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// REST API 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 재시도 가능한 에러의 최대 재시도 횟수
    pub max_retries: u32,
    /// 재시도 대기 시간 상한 (밀리초)
    pub retry_delay_ms: u64,
    /// 타임프레임을 동시에 요청할지 여부
    pub concurrent: bool,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".to_string(),
            timeout_secs: 10,
            max_retries: 0,
            retry_delay_ms: 500,
            concurrent: false,
        }
    }
}

/// StochRSI 설정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StochRsiConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// RSI 기간
    pub rsi_period: usize,
    /// 최소/최대 정규화 기간
    pub stoch_period: usize,
    /// %K 스무딩 기간
    pub smooth_k: usize,
    /// %D 스무딩 기간
    pub smooth_d: usize,
}

impl Default for StochRsiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rsi_period: 14,
            stoch_period: 14,
            smooth_k: 3,
            smooth_d: 3,
        }
    }
}

impl StochRsiConfig {
    /// %K가 처음 정의되기까지 필요한 캔들 수.
    pub fn warmup(&self) -> usize {
        (self.rsi_period + self.stoch_period + self.smooth_k).saturating_sub(2)
    }
}

/// 지표 설정.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// RSI 기간
    pub rsi_period: usize,
    /// EMA 스팬 (20, 50, 200 순서)
    pub ema_spans: [usize; 3],
    /// 분석에 필요한 최소 캔들 수
    pub min_candles: usize,
    /// StochRSI 설정
    pub stoch_rsi: StochRsiConfig,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ema_spans: [20, 50, 200],
            min_candles: 50,
            stoch_rsi: StochRsiConfig::default(),
        }
    }
}

impl IndicatorConfig {
    /// 활성화된 지표의 워밍업 중 가장 긴 것.
    pub fn warmup(&self) -> usize {
        let rsi = self.rsi_period;
        if self.stoch_rsi.enabled {
            rsi.max(self.stoch_rsi.warmup())
        } else {
            rsi
        }
    }
}

/// 언어 모델 요약 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// 모델 식별자
    pub model: String,
    /// 최대 출력 토큰
    pub max_tokens: u32,
    /// API 기본 URL
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
    /// 분석 관점 지시문
    pub instructions: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_tokens: 200,
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 60,
            instructions: "스윙 트레이딩 관점에서 단기 가격 전략을 한국어로 요약해줘.".to_string(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("SCOPE")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load(DEFAULT_CONFIG_PATH)
    }

    /// 설정을 검증합니다.
    ///
    /// 빈 타임프레임 목록은 유효하며 빈 리포트를 만듭니다.
    pub fn validate(&self) -> ScopeResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(ScopeError::Config("심볼이 비어 있습니다".to_string()));
        }

        let mut seen = HashSet::new();
        for tf in &self.timeframes {
            tf.timeframe()?;
            if !seen.insert(tf.label.as_str()) {
                return Err(ScopeError::Config(format!("중복된 라벨: {}", tf.label)));
            }
        }

        let ind = &self.indicators;
        if ind.rsi_period == 0 || ind.ema_spans.contains(&0) {
            return Err(ScopeError::Config(
                "지표 기간은 0보다 커야 합니다".to_string(),
            ));
        }
        let stoch = &ind.stoch_rsi;
        if stoch.enabled
            && (stoch.rsi_period == 0
                || stoch.stoch_period == 0
                || stoch.smooth_k == 0
                || stoch.smooth_d == 0)
        {
            return Err(ScopeError::Config(
                "StochRSI 기간은 0보다 커야 합니다".to_string(),
            ));
        }
        if ind.min_candles < ind.warmup() {
            return Err(ScopeError::Config(format!(
                "min_candles({})가 지표 워밍업({})보다 작습니다",
                ind.min_candles,
                ind.warmup()
            )));
        }

        for tf in &self.timeframes {
            if (tf.limit as usize) < ind.min_candles {
                return Err(ScopeError::Config(format!(
                    "{}: limit({})이 min_candles({})보다 작습니다",
                    tf.label, tf.limit, ind.min_candles
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeframes.len(), 5);
        assert_eq!(config.timeframes[1].limit, 200);
        assert_eq!(config.market_data.timeout_secs, 10);
    }

    #[test]
    fn test_empty_timeframes_is_valid() {
        let config = AppConfig {
            timeframes: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_duplicate_labels() {
        let mut config = AppConfig::default();
        config.timeframes.push(TimeframeConfig::new("1분봉", "1m", 100));
        assert!(matches!(config.validate(), Err(ScopeError::Config(_))));
    }

    #[test]
    fn test_rejects_unknown_interval() {
        let config = AppConfig {
            timeframes: vec![TimeframeConfig::new("x", "7m", 100)],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_min_candles_below_warmup() {
        let mut config = AppConfig::default();
        config.indicators.stoch_rsi.enabled = true;
        config.indicators.min_candles = 20;
        assert!(config.validate().is_err());

        config.indicators.min_candles = 50;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stoch_warmup() {
        let stoch = StochRsiConfig::default();
        assert_eq!(stoch.warmup(), 14 + 14 + 3 - 2);
    }

    #[test]
    fn test_stoch_warmup_with_zero_periods() {
        let stoch = StochRsiConfig {
            enabled: true,
            rsi_period: 1,
            stoch_period: 0,
            smooth_k: 0,
            smooth_d: 0,
        };
        assert_eq!(stoch.warmup(), 0);
    }

    #[test]
    fn test_rejects_limit_below_min_candles() {
        let mut config = AppConfig::default();
        config.timeframes[2].limit = 49;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ScopeError::Config(ref msg) if msg.contains("15분봉")));

        config.timeframes[2].limit = 50;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_limit() {
        let mut config = AppConfig::default();
        config.timeframes[0].limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.symbol, "BTCUSDT");
        assert_eq!(config.summary.model, "gpt-4o");
    }
}
