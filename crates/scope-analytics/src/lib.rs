//! # Scope Analytics
//!
//! 캔들 시계열에서 기술적 지표를 계산하고, 여러 타임프레임의 최신 값을
//! 하나의 집계 리포트로 모읍니다.
//!
//! # 모듈 구성
//!
//! - [`indicators`]: RSI, EMA, StochRSI 계산과 지표 엔진
//! - [`analyzer`]: 단일 타임프레임 분석 (조회 → 계산 → 최신 완전 행)
//! - [`report`]: 설정된 모든 타임프레임의 집계 리포트
//! - [`alignment`]: 타임프레임 간 추세 정렬 요약
//!
//! # 사용 예시
//!
//! ```ignore
//! use scope_analytics::{ReportBuilder, TimeframeAnalyzer};
//!
//! let analyzer = TimeframeAnalyzer::new(source, "BTCUSDT", config.indicators.clone());
//! let run = ReportBuilder::new(analyzer).build(&config.timeframes).await;
//! println!("{}", serde_json::to_string_pretty(&run.report)?);
//! ```

pub mod alignment;
pub mod analyzer;
pub mod indicators;
pub mod report;

pub use alignment::{summarize_alignment, AlignmentSummary, RsiZone, TrendDirection};
pub use analyzer::TimeframeAnalyzer;
pub use indicators::{IndicatorEngine, IndicatorError, IndicatorResult};
pub use report::{FetchMode, ReportBuilder};
