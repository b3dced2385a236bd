//! 스냅샷 파이프라인의 도메인 모델.

mod indicator;
mod market_data;
mod snapshot;

pub use indicator::*;
pub use market_data::*;
pub use snapshot::*;
