//! 시장 데이터 소스 trait 정의.

use async_trait::async_trait;
use scope_core::{CandleSeries, Timeframe};

use crate::ExchangeError;

/// 시장 데이터 요청을 위한 Result 타입.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// OHLCV 시계열 조회 인터페이스.
///
/// 요청 실패는 `Err`, 정상 응답이지만 데이터가 없으면 빈 시계열을 반환합니다.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 데이터 소스 이름 반환.
    fn name(&self) -> &str;

    /// 최근 캔들 `limit`개를 시간 순으로 조회.
    async fn fetch_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: u32,
    ) -> ExchangeResult<CandleSeries>;
}
