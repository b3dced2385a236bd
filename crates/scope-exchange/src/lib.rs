//! 시장 데이터 소스.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - MarketDataSource trait: 심볼/간격/개수로 캔들 시계열을 조회하는 통합 인터페이스
//! - Binance 클라인 REST 커넥터
//! - 재시도 헬퍼
//! - 테스트와 데모용 고정 데이터 소스

pub mod connector;
pub mod error;
pub mod retry;
pub mod simulated;
pub mod traits;

pub use connector::{BinanceClient, BinanceConfig};
pub use error::*;
pub use retry::{with_retry, RetryConfig};
pub use simulated::StaticMarketData;
pub use traits::*;
