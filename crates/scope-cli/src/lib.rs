//! CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 다중 타임프레임 지표 분석 및 출력
//! - 언어 모델 요약 요청
//! - 설정 점검 도구

pub mod commands;

pub use commands::*;
