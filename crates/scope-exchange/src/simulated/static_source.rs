//! 고정 데이터를 반환하는 메모리 기반 데이터 소스.

use async_trait::async_trait;
use scope_core::{CandleSeries, Timeframe};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::traits::{ExchangeResult, MarketDataSource};
use crate::ExchangeError;

#[derive(Debug, Clone)]
enum Entry {
    Series(CandleSeries),
    Failure(ExchangeError),
}

/// 타임프레임별로 고정된 시계열 또는 실패를 돌려주는 데이터 소스.
///
/// 등록되지 않은 타임프레임은 빈 시계열을 반환합니다. `limit`보다 긴
/// 시계열은 가장 최근 `limit`개만 반환합니다.
#[derive(Debug, Default)]
pub struct StaticMarketData {
    entries: HashMap<Timeframe, Entry>,
    delays: HashMap<Timeframe, Duration>,
    requests: AtomicUsize,
}

impl StaticMarketData {
    /// 빈 데이터 소스 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 타임프레임에 시계열을 등록합니다.
    pub fn with_series(mut self, timeframe: Timeframe, series: CandleSeries) -> Self {
        self.entries.insert(timeframe, Entry::Series(series));
        self
    }

    /// 타임프레임에 실패를 등록합니다.
    pub fn with_failure(mut self, timeframe: Timeframe, error: ExchangeError) -> Self {
        self.entries.insert(timeframe, Entry::Failure(error));
        self
    }

    /// 타임프레임 응답을 지연시킵니다 (완료 순서 테스트용).
    pub fn with_delay(mut self, timeframe: Timeframe, delay: Duration) -> Self {
        self.delays.insert(timeframe, delay);
        self
    }

    /// 지금까지 받은 요청 수.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for StaticMarketData {
    fn name(&self) -> &str {
        "Static"
    }

    async fn fetch_candles(
        &self,
        _symbol: &str,
        timeframe: Timeframe,
        limit: u32,
    ) -> ExchangeResult<CandleSeries> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&timeframe) {
            tokio::time::sleep(*delay).await;
        }

        match self.entries.get(&timeframe) {
            Some(Entry::Failure(err)) => Err(err.clone()),
            Some(Entry::Series(series)) => {
                let candles = series.candles();
                let start = candles.len().saturating_sub(limit as usize);
                CandleSeries::new(candles[start..].to_vec())
                    .map_err(|e| ExchangeError::ParseError(e.to_string()))
            }
            None => Ok(CandleSeries::empty()),
        }
    }
}
