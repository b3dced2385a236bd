//! 시장 데이터 타입 및 구조체.
//!
//! - `Candle` - OHLCV 캔들스틱 데이터
//! - `CandleSeries` - 시간 순으로 정렬된 캔들 시계열

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ScopeError, ScopeResult};

/// OHLCV 캔들스틱 데이터.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// 캔들 시작 시간
    pub timestamp: DateTime<Utc>,
    /// 시가
    pub open: f64,
    /// 고가
    pub high: f64,
    /// 저가
    pub low: f64,
    /// 종가
    pub close: f64,
    /// 거래량 (기준 자산 단위)
    pub volume: f64,
}

impl Candle {
    /// 새 캔들을 생성합니다.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// 시간 순으로 정렬된 캔들 시계열.
///
/// 타임스탬프는 엄격하게 증가하며 중복이 없습니다. 빈 시계열도 유효합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// 캔들 목록에서 시계열을 생성합니다.
    ///
    /// # Errors
    /// 타임스탬프가 엄격하게 증가하지 않으면 `ScopeError::DataFetch`를 반환합니다.
    pub fn new(candles: Vec<Candle>) -> ScopeResult<Self> {
        if let Some(pos) = candles
            .windows(2)
            .position(|w| w[0].timestamp >= w[1].timestamp)
        {
            return Err(ScopeError::DataFetch(format!(
                "캔들 타임스탬프가 증가하지 않습니다: {}번째 {} >= {}",
                pos,
                candles[pos].timestamp,
                candles[pos + 1].timestamp
            )));
        }
        Ok(Self { candles })
    }

    /// 빈 시계열을 생성합니다.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 캔들 개수.
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// 캔들 슬라이스.
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    /// 가장 최근 캔들.
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// 종가 열.
    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    /// 거래량 열.
    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }

    /// 캔들을 순회합니다.
    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }
}

impl<'a> IntoIterator for &'a CandleSeries {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}

impl<'de> Deserialize<'de> for CandleSeries {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            candles: Vec<Candle>,
        }
        let raw = Raw::deserialize(deserializer)?;
        CandleSeries::new(raw.candles).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle_at(secs: i64, close: f64) -> Candle {
        let ts = DateTime::from_timestamp(secs, 0).unwrap();
        Candle::new(ts, close, close + 1.0, close - 1.0, close, 10.0)
    }

    #[test]
    fn test_series_accepts_increasing_timestamps() {
        let series =
            CandleSeries::new(vec![candle_at(0, 1.0), candle_at(60, 2.0), candle_at(120, 3.0)])
                .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.last().map(|c| c.close), Some(3.0));
    }

    #[test]
    fn test_series_rejects_duplicate_timestamps() {
        let result = CandleSeries::new(vec![candle_at(0, 1.0), candle_at(0, 2.0)]);
        assert!(matches!(result, Err(ScopeError::DataFetch(_))));
    }

    #[test]
    fn test_series_rejects_out_of_order() {
        let result = CandleSeries::new(vec![candle_at(120, 1.0), candle_at(60, 2.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_series_is_valid() {
        let series = CandleSeries::new(Vec::new()).unwrap();
        assert!(series.is_empty());
        assert!(series.last().is_none());
    }

    #[test]
    fn test_series_deserialize_validates_order() {
        let bad = r#"{"candles":[
            {"timestamp":"2024-01-01T00:01:00Z","open":1,"high":1,"low":1,"close":1,"volume":1},
            {"timestamp":"2024-01-01T00:00:00Z","open":1,"high":1,"low":1,"close":1,"volume":1}
        ]}"#;
        assert!(serde_json::from_str::<CandleSeries>(bad).is_err());
    }
}
