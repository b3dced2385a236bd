//! 기술적 지표 모듈.
//!
//! 종가 시계열에서 캔들 단위 지표를 계산합니다. 모든 지표는 입력 길이와
//! 같은 길이의 벡터를 반환하며, 아직 정의되지 않은 구간은 `None`입니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **EMA**: 지수 이동평균 (가중 평균 방식, 워밍업 없음)
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: 상대강도지수 (단순 이동평균 방식)
//! - **StochRSI**: RSI의 스토캐스틱 정규화
//!
//! # 사용 예시
//!
//! ```ignore
//! use scope_analytics::indicators::{IndicatorEngine, RsiParams, EmaParams};
//!
//! let engine = IndicatorEngine::new();
//!
//! let rsi = engine.rsi(&closes, RsiParams { period: 14 })?;
//! let ema = engine.ema(&closes, EmaParams { span: 20 })?;
//! ```

pub mod momentum;
pub mod trend;

use scope_core::{CandleSeries, IndicatorConfig, IndicatorRow, IndicatorSet, ScopeError};
use thiserror::Error;

pub use momentum::{MomentumCalculator, RsiParams, StochRsiParams, StochRsiResult};
pub use trend::{EmaParams, TrendIndicators};

/// 지표 계산 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// 데이터 부족 오류
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

impl From<IndicatorError> for ScopeError {
    fn from(err: IndicatorError) -> Self {
        match err {
            IndicatorError::InsufficientData { .. } => ScopeError::InsufficientData(err.to_string()),
            IndicatorError::InvalidParameter(_) => ScopeError::Config(err.to_string()),
        }
    }
}

/// 단순 이동평균 (rolling mean).
///
/// 창 안의 값이 모두 정의된 위치에서만 값을 가집니다. 인덱스 `i`의 값은
/// `values[i + 1 - window..=i]`의 평균이며, 창마다 새로 합산합니다.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let mut sum = 0.0;
            for value in &values[i + 1 - window..=i] {
                sum += (*value)?;
            }
            Some(sum / window as f64)
        })
        .collect()
}

/// 기술적 지표 엔진.
///
/// 개별 계산기를 묶은 파사드이며 상태를 갖지 않습니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self {
            trend: TrendIndicators::new(),
            momentum: MomentumCalculator::new(),
        }
    }

    /// 지수 이동평균 (EMA) 계산.
    pub fn ema(&self, prices: &[f64], params: EmaParams) -> IndicatorResult<Vec<f64>> {
        self.trend.ema(prices, params)
    }

    /// RSI 계산.
    pub fn rsi(&self, prices: &[f64], params: RsiParams) -> IndicatorResult<Vec<Option<f64>>> {
        self.momentum.rsi(prices, params)
    }

    /// StochRSI 계산.
    pub fn stoch_rsi(&self, prices: &[f64], params: StochRsiParams) -> IndicatorResult<Vec<StochRsiResult>> {
        self.momentum.stoch_rsi(prices, params)
    }

    /// 시계열 전체에 대해 설정된 지표를 계산합니다.
    ///
    /// 입력 캔들마다 하나의 행을 반환합니다. 워밍업 구간의 행은 일부 값이
    /// `None`이며, 유효성 판단은 호출자가 [`IndicatorRow::is_complete`]로 합니다.
    /// 시계열이 가장 긴 워밍업보다 짧으면 `InsufficientData`를 반환합니다.
    pub fn compute(&self, series: &CandleSeries, config: &IndicatorConfig) -> IndicatorResult<Vec<IndicatorRow>> {
        let required = config.warmup();
        if series.len() < required {
            return Err(IndicatorError::InsufficientData {
                required,
                provided: series.len(),
            });
        }

        let closes = series.closes();
        let rsi = self.rsi(&closes, RsiParams { period: config.rsi_period })?;
        let [fast, mid, slow] = config.ema_spans;
        let ema20 = self.ema(&closes, EmaParams { span: fast })?;
        let ema50 = self.ema(&closes, EmaParams { span: mid })?;
        let ema200 = self.ema(&closes, EmaParams { span: slow })?;

        let stoch = if config.stoch_rsi.enabled {
            let stoch_config = &config.stoch_rsi;
            Some(self.stoch_rsi(
                &closes,
                StochRsiParams {
                    rsi_period: stoch_config.rsi_period,
                    stoch_period: stoch_config.stoch_period,
                    smooth_k: stoch_config.smooth_k,
                    smooth_d: stoch_config.smooth_d,
                },
            )?)
        } else {
            None
        };

        let rows = series
            .iter()
            .enumerate()
            .map(|(i, candle)| {
                let indicators = IndicatorSet {
                    rsi: rsi[i],
                    ema20: Some(ema20[i]),
                    ema50: Some(ema50[i]),
                    ema200: Some(ema200[i]),
                    stoch_rsi: stoch.as_ref().and_then(|s| s[i].k),
                };
                IndicatorRow::new(*candle, indicators)
            })
            .collect();

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scope_exchange::simulated::synthetic::{linear_series, zigzag_series};

    #[test]
    fn test_rolling_mean_window() {
        let values = vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let mean = rolling_mean(&values, 2);
        assert_eq!(mean, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
    }

    #[test]
    fn test_rolling_mean_skips_undefined_windows() {
        let values = vec![None, Some(2.0), Some(4.0), Some(6.0)];
        let mean = rolling_mean(&values, 2);
        assert_eq!(mean, vec![None, None, Some(3.0), Some(5.0)]);
    }

    #[test]
    fn test_rolling_mean_zero_window() {
        assert_eq!(rolling_mean(&[Some(1.0)], 0), vec![None]);
    }

    #[test]
    fn test_compute_row_per_candle() {
        let engine = IndicatorEngine::new();
        let series = zigzag_series(80, 100.0, 2.0);
        let rows = engine.compute(&series, &IndicatorConfig::default()).unwrap();

        assert_eq!(rows.len(), 80);
        // RSI(14)는 인덱스 13부터 정의
        assert!(rows[12].indicators.rsi.is_none());
        assert!(rows[13].indicators.rsi.is_some());
        assert!(rows[13].is_complete(false));
        // EMA는 첫 캔들부터 정의
        assert!(rows[0].indicators.ema200.is_some());
        assert!(rows.iter().all(|r| r.indicators.stoch_rsi.is_none()));
    }

    #[test]
    fn test_compute_with_stoch_rsi() {
        let engine = IndicatorEngine::new();
        let mut config = IndicatorConfig::default();
        config.stoch_rsi.enabled = true;

        let rows = engine.compute(&zigzag_series(80, 100.0, 2.0), &config).unwrap();
        let first_complete = rows.iter().position(|r| r.is_complete(true));
        // 14 + 14 + 3 - 2 = 29번째 캔들 (인덱스 28)
        assert_eq!(first_complete, Some(28));
    }

    #[test]
    fn test_compute_rejects_short_series() {
        let engine = IndicatorEngine::new();
        let result = engine.compute(&linear_series(5, 100.0, 1.0), &IndicatorConfig::default());
        assert_eq!(
            result.unwrap_err(),
            IndicatorError::InsufficientData {
                required: 14,
                provided: 5
            }
        );
    }

    #[test]
    fn test_indicator_error_into_scope_error() {
        let err: ScopeError = IndicatorError::InvalidParameter("period".to_string()).into();
        assert!(matches!(err, ScopeError::Config(_)));

        let err: ScopeError = IndicatorError::InsufficientData {
            required: 14,
            provided: 3,
        }
        .into();
        assert!(matches!(err, ScopeError::InsufficientData(_)));
    }
}
