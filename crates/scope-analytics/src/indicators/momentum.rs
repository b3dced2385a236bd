//! 모멘텀 지표 (Momentum Indicators).
//!
//! 가격 모멘텀과 과매수/과매도 상태를 측정하는 지표들을 제공합니다.
//! - RSI (Relative Strength Index)
//! - StochRSI (Stochastic RSI)

use serde::{Deserialize, Serialize};

use super::{rolling_mean, IndicatorError, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// StochRSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StochRsiParams {
    /// RSI 기간 (기본: 14).
    pub rsi_period: usize,
    /// 최소/최대 정규화 기간 (기본: 14).
    pub stoch_period: usize,
    /// %K 스무딩 기간 (기본: 3).
    pub smooth_k: usize,
    /// %D 스무딩 기간 (기본: 3).
    pub smooth_d: usize,
}

impl Default for StochRsiParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            stoch_period: 14,
            smooth_k: 3,
            smooth_d: 3,
        }
    }
}

/// StochRSI 결과.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StochRsiResult {
    /// %K (정규화된 RSI의 이동평균).
    pub k: Option<f64>,
    /// %D (%K의 이동평균).
    pub d: Option<f64>,
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS))
    /// RS = 평균 상승폭 / 평균 하락폭
    ///
    /// 평균은 `period`개 창의 단순 이동평균입니다. 첫 캔들의 상승/하락폭은 0으로
    /// 간주하므로 인덱스 `period - 1`부터 값이 정의됩니다.
    /// 평균 하락폭이 0이면 RSI는 100이고, 상승폭도 0이면 (평평한 구간) 정의하지 않습니다.
    ///
    /// # 인자
    /// * `prices` - 가격 데이터 (종가)
    /// * `params` - RSI 파라미터
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들
    pub fn rsi(&self, prices: &[f64], params: RsiParams) -> IndicatorResult<Vec<Option<f64>>> {
        let period = params.period;
        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "RSI 기간은 0보다 커야 합니다".to_string(),
            ));
        }

        let mut gains = vec![Some(0.0); prices.len()];
        let mut losses = vec![Some(0.0); prices.len()];
        for i in 1..prices.len() {
            let change = prices[i] - prices[i - 1];
            if change > 0.0 {
                gains[i] = Some(change);
            } else if change < 0.0 {
                losses[i] = Some(-change);
            }
        }

        let avg_gains = rolling_mean(&gains, period);
        let avg_losses = rolling_mean(&losses, period);

        let rsi = avg_gains
            .iter()
            .zip(avg_losses.iter())
            .map(|(gain, loss)| match (gain, loss) {
                // 상승/하락이 모두 없는 창은 RS가 0/0이므로 정의하지 않음
                (Some(gain), Some(loss)) if *loss == 0.0 && *gain == 0.0 => None,
                (Some(_), Some(loss)) if *loss == 0.0 => Some(100.0),
                (Some(gain), Some(loss)) => {
                    let rs = gain / loss;
                    Some((100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0))
                }
                _ => None,
            })
            .collect();

        Ok(rsi)
    }

    /// StochRSI 계산.
    ///
    /// 각 RSI 값을 직전 `stoch_period`개 RSI의 최소/최대로 0-100 정규화한 뒤
    /// `smooth_k` 이동평균으로 %K, 다시 `smooth_d` 이동평균으로 %D를 구합니다.
    /// 창 안의 RSI가 모두 같으면 (범위 0) 중립값 50을 사용합니다.
    pub fn stoch_rsi(&self, prices: &[f64], params: StochRsiParams) -> IndicatorResult<Vec<StochRsiResult>> {
        let StochRsiParams {
            rsi_period,
            stoch_period,
            smooth_k,
            smooth_d,
        } = params;

        if stoch_period == 0 || smooth_k == 0 || smooth_d == 0 {
            return Err(IndicatorError::InvalidParameter(
                "StochRSI 기간은 0보다 커야 합니다".to_string(),
            ));
        }

        let rsi = self.rsi(prices, RsiParams { period: rsi_period })?;

        let stoch: Vec<Option<f64>> = (0..rsi.len())
            .map(|i| {
                if i + 1 < stoch_period {
                    return None;
                }
                let current = rsi[i]?;
                let mut lowest = f64::INFINITY;
                let mut highest = f64::NEG_INFINITY;
                for value in &rsi[i + 1 - stoch_period..=i] {
                    let value = (*value)?;
                    lowest = lowest.min(value);
                    highest = highest.max(value);
                }

                let range = highest - lowest;
                if range > 0.0 {
                    Some(((current - lowest) / range * 100.0).clamp(0.0, 100.0))
                } else {
                    Some(50.0)
                }
            })
            .collect();

        let k = rolling_mean(&stoch, smooth_k);
        let d = rolling_mean(&k, smooth_d);

        Ok(k
            .into_iter()
            .zip(d)
            .map(|(k, d)| StochRsiResult {
                k: k.map(|v| v.clamp(0.0, 100.0)),
                d: d.map(|v| v.clamp(0.0, 100.0)),
            })
            .collect())
    }
}
