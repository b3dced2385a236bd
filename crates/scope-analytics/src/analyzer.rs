//! 단일 타임프레임 분석기.
//!
//! 캔들 조회 → 최소 길이 검사 → 지표 계산 → 마지막 완전 행 선택 순서로
//! 하나의 [`TimeframeSnapshot`]을 만듭니다.

use std::sync::Arc;

use scope_core::{
    timeframe_span, IndicatorConfig, ScopeError, ScopeResult, TimeframeConfig, TimeframeSnapshot,
};
use scope_exchange::{with_retry, MarketDataSource, RetryConfig};
use tracing::{debug, Instrument};

use crate::indicators::IndicatorEngine;

/// 타임프레임 분석기.
///
/// 데이터 소스와 심볼, 지표 설정을 묶어 타임프레임 단위 스냅샷을 생성합니다.
pub struct TimeframeAnalyzer {
    source: Arc<dyn MarketDataSource>,
    symbol: String,
    indicators: IndicatorConfig,
    retry: RetryConfig,
    engine: IndicatorEngine,
}

impl TimeframeAnalyzer {
    /// 새 분석기 생성 (재시도 없음).
    pub fn new(source: Arc<dyn MarketDataSource>, symbol: impl Into<String>, indicators: IndicatorConfig) -> Self {
        Self {
            source,
            symbol: symbol.into(),
            indicators,
            retry: RetryConfig::default(),
            engine: IndicatorEngine::new(),
        }
    }

    /// 재시도 설정 지정.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// 분석 대상 심볼.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// 한 타임프레임을 분석합니다.
    ///
    /// # 에러
    /// - 간격 문자열이 잘못됨 → `Config`
    /// - 조회 실패 또는 잘못된 응답 → `DataFetch`
    /// - 캔들이 `min_candles`보다 적거나 완전 행이 없음 → `InsufficientData`
    pub async fn analyze(&self, config: &TimeframeConfig) -> ScopeResult<TimeframeSnapshot> {
        let span = timeframe_span!("analyze_timeframe", self.symbol, config.label);
        self.analyze_inner(config).instrument(span).await
    }

    async fn analyze_inner(&self, config: &TimeframeConfig) -> ScopeResult<TimeframeSnapshot> {
        let timeframe = config.timeframe()?;

        let series = with_retry(self.retry, || {
            self.source.fetch_candles(&self.symbol, timeframe, config.limit)
        })
        .await
        .map_err(ScopeError::from)?;

        debug!(candles = series.len(), source = self.source.name(), "candles fetched");

        let min_candles = self.indicators.min_candles;
        if series.len() < min_candles {
            return Err(ScopeError::InsufficientData(format!(
                "{}: 캔들 {}개 (최소 {}개 필요)",
                config.label,
                series.len(),
                min_candles
            )));
        }

        let rows = self.engine.compute(&series, &self.indicators)?;
        let stoch_enabled = self.indicators.stoch_rsi.enabled;

        let latest = rows
            .iter()
            .rev()
            .find(|row| row.is_complete(stoch_enabled))
            .ok_or_else(|| {
                ScopeError::InsufficientData(format!("{}: 모든 지표가 정의된 캔들이 없습니다", config.label))
            })?;

        let snapshot = TimeframeSnapshot::from_row(config.label.clone(), timeframe, latest).ok_or_else(|| {
            ScopeError::InsufficientData(format!("{}: 스냅샷 생성 실패", config.label))
        })?;

        debug!(close = snapshot.close, rsi = snapshot.rsi, "snapshot ready");
        Ok(snapshot)
    }
}
