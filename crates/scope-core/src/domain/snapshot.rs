//! 타임프레임 스냅샷과 집계 리포트.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::indicator::IndicatorRow;
use crate::error::ScopeError;
use crate::types::Timeframe;

/// 한 타임프레임의 마지막 완전 계산 행.
///
/// 분석 실행마다 한 번 생성되며 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeSnapshot {
    /// 사람이 읽는 타임프레임 라벨 (예: "1시간봉")
    pub label: String,
    /// 캔들 간격
    pub interval: Timeframe,
    /// 캔들 시작 시간
    pub timestamp: DateTime<Utc>,
    /// 종가
    pub close: f64,
    /// 거래량
    pub volume: f64,
    /// RSI
    pub rsi: f64,
    /// EMA 20
    pub ema20: f64,
    /// EMA 50
    pub ema50: f64,
    /// EMA 200
    pub ema200: f64,
    /// StochRSI %K (활성화된 경우)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stoch_rsi: Option<f64>,
}

impl TimeframeSnapshot {
    /// 완전히 정의된 지표 행에서 스냅샷을 생성합니다.
    ///
    /// 필수 지표 중 하나라도 정의되지 않았으면 `None`을 반환합니다.
    pub fn from_row(label: impl Into<String>, interval: Timeframe, row: &IndicatorRow) -> Option<Self> {
        let ind = &row.indicators;
        Some(Self {
            label: label.into(),
            interval,
            timestamp: row.candle.timestamp,
            close: row.candle.close,
            volume: row.candle.volume,
            rsi: ind.rsi?,
            ema20: ind.ema20?,
            ema50: ind.ema50?,
            ema200: ind.ema200?,
            stoch_rsi: ind.stoch_rsi,
        })
    }

    /// EMA가 정배열(EMA20 > EMA50 > EMA200)인지 확인합니다.
    pub fn is_ema_aligned_up(&self) -> bool {
        self.ema20 > self.ema50 && self.ema50 > self.ema200
    }

    /// EMA가 역배열(EMA20 < EMA50 < EMA200)인지 확인합니다.
    pub fn is_ema_aligned_down(&self) -> bool {
        self.ema20 < self.ema50 && self.ema50 < self.ema200
    }
}

/// 타임프레임 라벨 → 스냅샷의 순서 보존 매핑.
///
/// 삽입 순서는 설정 순서와 같습니다. 실패한 타임프레임은 항목 자체가 없습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationReport {
    symbol: String,
    generated_at: DateTime<Utc>,
    entries: Vec<TimeframeSnapshot>,
}

impl AggregationReport {
    /// 빈 리포트를 생성합니다.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            generated_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    /// 생성 시각을 지정합니다.
    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = at;
        self
    }

    /// 스냅샷을 삽입합니다.
    ///
    /// 같은 라벨이 이미 있으면 그 자리에서 교체하며 위치는 유지됩니다.
    pub fn insert(&mut self, snapshot: TimeframeSnapshot) {
        match self.entries.iter_mut().find(|s| s.label == snapshot.label) {
            Some(existing) => *existing = snapshot,
            None => self.entries.push(snapshot),
        }
    }

    /// 라벨로 스냅샷을 조회합니다.
    pub fn get(&self, label: &str) -> Option<&TimeframeSnapshot> {
        self.entries.iter().find(|s| s.label == label)
    }

    /// 라벨이 있는지 확인합니다.
    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    /// 삽입 순서대로 라벨을 반환합니다.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|s| s.label.as_str()).collect()
    }

    /// 삽입 순서대로 스냅샷을 순회합니다.
    pub fn iter(&self) -> std::slice::Iter<'_, TimeframeSnapshot> {
        self.entries.iter()
    }

    /// 항목 수.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 대상 심볼.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// 생성 시각.
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}

impl<'a> IntoIterator for &'a AggregationReport {
    type Item = &'a TimeframeSnapshot;
    type IntoIter = std::slice::Iter<'a, TimeframeSnapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// 라벨 순서를 유지한 JSON 객체로 직렬화합니다.
struct OrderedSnapshots<'a>(&'a [TimeframeSnapshot]);

impl Serialize for OrderedSnapshots<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for snapshot in self.0 {
            map.serialize_entry(&snapshot.label, snapshot)?;
        }
        map.end()
    }
}

impl Serialize for AggregationReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("symbol", &self.symbol)?;
        map.serialize_entry("generated_at", &self.generated_at)?;
        map.serialize_entry("timeframes", &OrderedSnapshots(&self.entries))?;
        map.end()
    }
}

/// 리포트에서 제외된 타임프레임과 그 사유.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeframeFailure {
    /// 타임프레임 라벨
    pub label: String,
    /// 실패 사유
    pub error: ScopeError,
}

/// 한 번의 분석 실행 결과.
#[derive(Debug, Clone)]
pub struct ReportRun {
    /// 성공한 타임프레임의 리포트
    pub report: AggregationReport,
    /// 실패한 타임프레임 (설정 순서)
    pub failures: Vec<TimeframeFailure>,
}

impl ReportRun {
    /// 모든 타임프레임이 성공했는지 확인합니다.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candle, IndicatorSet};

    fn snapshot(label: &str, close: f64) -> TimeframeSnapshot {
        TimeframeSnapshot {
            label: label.to_string(),
            interval: Timeframe::M1,
            timestamp: DateTime::from_timestamp(0, 0).unwrap(),
            close,
            volume: 1.0,
            rsi: 50.0,
            ema20: 3.0,
            ema50: 2.0,
            ema200: 1.0,
            stoch_rsi: None,
        }
    }

    #[test]
    fn test_report_preserves_insertion_order() {
        let mut report = AggregationReport::new("BTCUSDT");
        report.insert(snapshot("4시간봉", 1.0));
        report.insert(snapshot("1분봉", 2.0));
        report.insert(snapshot("1시간봉", 3.0));

        assert_eq!(report.labels(), vec!["4시간봉", "1분봉", "1시간봉"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut report = AggregationReport::new("BTCUSDT");
        report.insert(snapshot("a", 1.0));
        report.insert(snapshot("b", 2.0));
        report.insert(snapshot("a", 9.0));

        assert_eq!(report.labels(), vec!["a", "b"]);
        assert_eq!(report.get("a").map(|s| s.close), Some(9.0));
    }

    #[test]
    fn test_report_json_is_ordered_object() {
        let mut report = AggregationReport::new("BTCUSDT");
        report.insert(snapshot("z", 1.0));
        report.insert(snapshot("a", 2.0));

        let json = serde_json::to_string(&report).unwrap();
        let z = json.find("\"z\":").unwrap();
        let a = json.find("\"a\":").unwrap();
        assert!(z < a);
        assert!(json.contains("\"symbol\":\"BTCUSDT\""));
        assert!(!json.contains("stoch_rsi"));
    }

    #[test]
    fn test_from_row_requires_defined_values() {
        let candle = Candle::new(DateTime::from_timestamp(60, 0).unwrap(), 1.0, 2.0, 0.5, 1.5, 7.0);
        let partial = IndicatorRow::new(
            candle,
            IndicatorSet {
                rsi: None,
                ema20: Some(1.0),
                ema50: Some(1.0),
                ema200: Some(1.0),
                stoch_rsi: None,
            },
        );
        assert!(TimeframeSnapshot::from_row("1분봉", Timeframe::M1, &partial).is_none());

        let full = IndicatorRow::new(
            candle,
            IndicatorSet {
                rsi: Some(70.0),
                ..partial.indicators
            },
        );
        let snap = TimeframeSnapshot::from_row("1분봉", Timeframe::M1, &full).unwrap();
        assert_eq!(snap.close, 1.5);
        assert_eq!(snap.volume, 7.0);
        assert_eq!(snap.rsi, 70.0);
    }

    #[test]
    fn test_ema_alignment() {
        let snap = snapshot("x", 1.0);
        assert!(snap.is_ema_aligned_up());
        assert!(!snap.is_ema_aligned_down());
    }
}
