//! # Scope Core
//!
//! 다중 타임프레임 스냅샷의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 분석 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 캔들 및 캔들 시계열
//! - 지표 행과 타임프레임 스냅샷
//! - 타임프레임별 집계 리포트
//! - 타임프레임(캔들 간격) 정의
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use self::config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
