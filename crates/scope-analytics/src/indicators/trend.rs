//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표를 제공합니다.
//! - EMA (Exponential Moving Average)

use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// 스팬 (평활 계수 α = 2 / (span + 1)).
    pub span: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { span: 20 }
    }
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// 지금까지의 모든 관측치에 대한 가중 평균입니다. 가장 최근 값의 가중치가 1이고
    /// 한 칸 과거로 갈 때마다 `(1 - α)`배 감소합니다.
    ///
    /// EMA_t = Σ (1-α)^j · p_{t-j} / Σ (1-α)^j
    ///
    /// 워밍업 구간이 없으므로 첫 캔들부터 값이 정의되며, 첫 값은 첫 가격과 같습니다.
    pub fn ema(&self, prices: &[f64], params: EmaParams) -> IndicatorResult<Vec<f64>> {
        let span = params.span;
        if span == 0 {
            return Err(IndicatorError::InvalidParameter(
                "EMA 스팬은 0보다 커야 합니다".to_string(),
            ));
        }

        let alpha = 2.0 / (span as f64 + 1.0);
        let decay = 1.0 - alpha;

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        let result = prices
            .iter()
            .map(|price| {
                numerator = price + decay * numerator;
                denominator = 1.0 + decay * denominator;
                numerator / denominator
            })
            .collect();

        Ok(result)
    }
}
