//! 캔들 단위 파생 지표 값.
//!
//! 워밍업 구간의 값은 NaN 같은 센티넬 대신 `None`으로 표현합니다.

use serde::{Deserialize, Serialize};

use super::market_data::Candle;

/// 한 캔들에 대한 지표 값 묶음.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    /// RSI (0-100)
    pub rsi: Option<f64>,
    /// EMA 20
    pub ema20: Option<f64>,
    /// EMA 50
    pub ema50: Option<f64>,
    /// EMA 200
    pub ema200: Option<f64>,
    /// StochRSI %K (0-100), 비활성화 시 항상 `None`
    pub stoch_rsi: Option<f64>,
}

impl IndicatorSet {
    /// 유효성 규칙: 계산된 모든 열이 정의되어 있는지 확인합니다.
    ///
    /// StochRSI는 활성화된 경우에만 검사 대상입니다.
    pub fn is_complete(&self, stoch_enabled: bool) -> bool {
        self.rsi.is_some()
            && self.ema20.is_some()
            && self.ema50.is_some()
            && self.ema200.is_some()
            && (!stoch_enabled || self.stoch_rsi.is_some())
    }
}

/// 캔들과 그 지표 값의 쌍.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorRow {
    /// 원본 캔들
    pub candle: Candle,
    /// 계산된 지표
    pub indicators: IndicatorSet,
}

impl IndicatorRow {
    /// 새 지표 행을 생성합니다.
    pub fn new(candle: Candle, indicators: IndicatorSet) -> Self {
        Self { candle, indicators }
    }

    /// 완전히 정의된 행인지 확인합니다.
    pub fn is_complete(&self, stoch_enabled: bool) -> bool {
        self.indicators.is_complete(stoch_enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_set() -> IndicatorSet {
        IndicatorSet {
            rsi: Some(55.0),
            ema20: Some(1.0),
            ema50: Some(1.0),
            ema200: Some(1.0),
            stoch_rsi: None,
        }
    }

    #[test]
    fn test_complete_without_stoch() {
        assert!(full_set().is_complete(false));
        assert!(!full_set().is_complete(true));
    }

    #[test]
    fn test_missing_rsi_is_incomplete() {
        let set = IndicatorSet {
            rsi: None,
            ..full_set()
        };
        assert!(!set.is_complete(false));
    }

    #[test]
    fn test_complete_with_stoch() {
        let set = IndicatorSet {
            stoch_rsi: Some(20.0),
            ..full_set()
        };
        assert!(set.is_complete(true));
    }
}
