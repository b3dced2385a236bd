//! 테스트와 데모를 위한 고정 데이터 소스.
//!
//! 네트워크 없이 결정적인 시계열을 돌려주므로 분석 파이프라인을
//! 재현 가능하게 검증할 수 있습니다.
//!
//! # 예제
//!
//! ```ignore
//! use scope_exchange::simulated::{synthetic, StaticMarketData};
//!
//! let source = StaticMarketData::new()
//!     .with_series(Timeframe::M1, synthetic::linear_series(60, 100.0, 1.0));
//! ```

mod static_source;
pub mod synthetic;

pub use static_source::StaticMarketData;
