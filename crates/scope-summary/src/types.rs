//! 요약 서비스 공통 타입.

use async_trait::async_trait;
use scope_core::{AggregationReport, ScopeError};

/// 요약 결과 타입.
pub type SummaryResult<T> = Result<T, SummaryError>;

/// 요약 요청 에러.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SummaryError {
    #[error("API 키가 설정되지 않았습니다")]
    MissingApiKey,

    #[error("인증 실패: {0}")]
    Unauthorized(String),

    #[error("요청 한도 초과: {0}")]
    RateLimited(String),

    #[error("네트워크 에러: {0}")]
    Network(String),

    #[error("요청 시간 초과: {0}")]
    Timeout(String),

    #[error("API 에러 (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("응답 파싱 에러: {0}")]
    Parse(String),

    #[error("요약할 타임프레임이 없습니다")]
    EmptyReport,

    #[error("이미 요약 요청이 진행 중입니다")]
    Busy,
}

impl From<reqwest::Error> for SummaryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SummaryError::Timeout(err.to_string())
        } else if err.is_decode() {
            SummaryError::Parse(err.to_string())
        } else {
            SummaryError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SummaryError {
    fn from(err: serde_json::Error) -> Self {
        SummaryError::Parse(err.to_string())
    }
}

impl From<SummaryError> for ScopeError {
    fn from(err: SummaryError) -> Self {
        ScopeError::SummaryService(err.to_string())
    }
}

/// 집계 리포트를 자연어 요약으로 바꾸는 요청기.
///
/// 구현체는 동시에 하나의 요청만 처리하며, 진행 중에 들어온 요청은
/// [`SummaryError::Busy`]로 거절합니다.
#[async_trait]
pub trait SummaryRequester: Send + Sync {
    /// 요청기 이름.
    fn name(&self) -> &str;

    /// 리포트와 분석 관점 지시문으로 요약을 요청합니다.
    async fn summarize(&self, report: &AggregationReport, instructions: &str) -> SummaryResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_error_into_scope_error() {
        let err: ScopeError = SummaryError::Unauthorized("invalid key".to_string()).into();
        match err {
            ScopeError::SummaryService(msg) => assert!(msg.contains("invalid key")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_message() {
        let err = SummaryError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API 에러 (HTTP 500): boom");
    }
}
