//! 시장 데이터 요청 에러 타입.

use scope_core::ScopeError;
use thiserror::Error;

/// 시장 데이터 요청 관련 에러.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExchangeError {
    /// 네트워크/연결 에러
    #[error("Network error: {0}")]
    NetworkError(String),

    /// 요청 타임아웃
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// 요청 한도 초과
    #[error("Rate limit exceeded")]
    RateLimited,

    /// 인증/권한 에러
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 심볼을 찾을 수 없음
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// API 에러 코드 (HTTP 상태 또는 거래소 에러 코드)
    #[error("API error {code}: {message}")]
    ApiError { code: i32, message: String },

    /// 파싱/역직렬화 에러
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ExchangeError {
    /// 재시도 가능한 에러인지 확인.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExchangeError::NetworkError(_)
            | ExchangeError::Timeout(_)
            | ExchangeError::RateLimited => true,
            ExchangeError::ApiError { code, .. } => *code >= 500,
            _ => false,
        }
    }

    /// 권장 재시도 대기 시간(밀리초) 반환.
    pub fn retry_delay_ms(&self) -> Option<u64> {
        match self {
            ExchangeError::RateLimited => Some(60000), // 1분
            ExchangeError::NetworkError(_) => Some(1000),
            ExchangeError::Timeout(_) => Some(500),
            ExchangeError::ApiError { code, .. } if *code >= 500 => Some(1000),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ExchangeError::Timeout(err.to_string())
        } else if err.is_decode() {
            ExchangeError::ParseError(err.to_string())
        } else {
            ExchangeError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::ParseError(err.to_string())
    }
}

impl From<ExchangeError> for ScopeError {
    fn from(err: ExchangeError) -> Self {
        ScopeError::DataFetch(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(ExchangeError::Timeout("10s".to_string()).is_retryable());
        assert!(ExchangeError::ApiError {
            code: 503,
            message: "unavailable".to_string()
        }
        .is_retryable());
        assert!(!ExchangeError::ParseError("not an array".to_string()).is_retryable());
        assert!(!ExchangeError::SymbolNotFound("FOO".to_string()).is_retryable());
    }

    #[test]
    fn test_converts_to_data_fetch() {
        let err: ScopeError = ExchangeError::RateLimited.into();
        assert!(matches!(err, ScopeError::DataFetch(msg) if msg.contains("Rate limit")));
    }
}
