//! # Scope Summary
//!
//! 다중 타임프레임 집계 리포트의 자연어 요약.
//!
//! 지원 서비스:
//! - OpenAI 호환 Chat Completions API
//!
//! 요약은 사용자가 명시적으로 요청할 때만 실행되며, 실패해도 이미 계산된
//! 리포트에는 영향을 주지 않습니다.

pub mod openai;
pub mod prompt;
pub mod types;

pub use openai::*;
pub use prompt::build_prompt;
pub use types::*;
