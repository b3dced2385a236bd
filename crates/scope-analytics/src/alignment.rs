//! 다중 타임프레임 추세 정렬 분석.
//!
//! 각 타임프레임 스냅샷의 EMA 배열과 종가 위치로 추세 방향을 판단하고,
//! 리포트 전체에서 방향이 얼마나 일치하는지 요약합니다.

use scope_core::{AggregationReport, TimeframeSnapshot};
use serde::Serialize;

/// RSI 과매수 기준.
pub const RSI_OVERBOUGHT: f64 = 70.0;
/// RSI 과매도 기준.
pub const RSI_OVERSOLD: f64 = 30.0;

/// 추세 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// 상승 (정배열 + 종가가 EMA20 위)
    Bullish,
    /// 하락 (역배열 + 종가가 EMA20 아래)
    Bearish,
    /// 중립
    Neutral,
}

impl TrendDirection {
    /// 스냅샷에서 추세 방향을 판단합니다.
    pub fn from_snapshot(snapshot: &TimeframeSnapshot) -> Self {
        if snapshot.is_ema_aligned_up() && snapshot.close > snapshot.ema20 {
            TrendDirection::Bullish
        } else if snapshot.is_ema_aligned_down() && snapshot.close < snapshot.ema20 {
            TrendDirection::Bearish
        } else {
            TrendDirection::Neutral
        }
    }

    /// 표시용 한국어 이름.
    pub fn label(&self) -> &'static str {
        match self {
            TrendDirection::Bullish => "상승",
            TrendDirection::Bearish => "하락",
            TrendDirection::Neutral => "중립",
        }
    }
}

/// RSI 구간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiZone {
    /// 과매수 (70 이상)
    Overbought,
    /// 과매도 (30 이하)
    Oversold,
    /// 중립
    Neutral,
}

impl RsiZone {
    /// RSI 값으로 구간을 결정합니다.
    pub fn from_rsi(rsi: f64) -> Self {
        if rsi >= RSI_OVERBOUGHT {
            RsiZone::Overbought
        } else if rsi <= RSI_OVERSOLD {
            RsiZone::Oversold
        } else {
            RsiZone::Neutral
        }
    }

    /// 표시용 한국어 이름.
    pub fn label(&self) -> &'static str {
        match self {
            RsiZone::Overbought => "과매수",
            RsiZone::Oversold => "과매도",
            RsiZone::Neutral => "중립",
        }
    }
}

/// 리포트 전체의 추세 정렬 요약.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentSummary {
    /// 라벨별 추세 방향 (리포트 순서)
    pub trends: Vec<(String, TrendDirection)>,
    /// 상승 타임프레임 수
    pub bullish: usize,
    /// 하락 타임프레임 수
    pub bearish: usize,
    /// 중립 타임프레임 수
    pub neutral: usize,
    /// 모든 타임프레임이 같은 방향(상승 또는 하락)인지
    pub is_aligned: bool,
    /// 가장 많은 방향 (동률이면 중립)
    pub dominant: TrendDirection,
}

/// 리포트의 타임프레임별 추세를 요약합니다.
pub fn summarize_alignment(report: &AggregationReport) -> AlignmentSummary {
    let trends: Vec<(String, TrendDirection)> = report
        .iter()
        .map(|s| (s.label.clone(), TrendDirection::from_snapshot(s)))
        .collect();

    let count = |dir: TrendDirection| trends.iter().filter(|(_, d)| *d == dir).count();
    let bullish = count(TrendDirection::Bullish);
    let bearish = count(TrendDirection::Bearish);
    let neutral = count(TrendDirection::Neutral);

    let is_aligned = !trends.is_empty() && (bullish == trends.len() || bearish == trends.len());
    let dominant = if bullish > bearish && bullish > neutral {
        TrendDirection::Bullish
    } else if bearish > bullish && bearish > neutral {
        TrendDirection::Bearish
    } else {
        TrendDirection::Neutral
    };

    AlignmentSummary {
        trends,
        bullish,
        bearish,
        neutral,
        is_aligned,
        dominant,
    }
}
