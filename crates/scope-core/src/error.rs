//! 스냅샷 파이프라인의 에러 타입.
//!
//! 타임프레임 단위로 격리되는 에러 분류를 정의합니다. 어떤 에러도
//! 형제 타임프레임의 계산을 중단시키지 않습니다.

use thiserror::Error;

/// 핵심 파이프라인 에러.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScopeError {
    /// 네트워크/전송 실패, HTTP 에러 상태, 잘못된 페이로드
    #[error("데이터 요청 에러: {0}")]
    DataFetch(String),

    /// 캔들 수 부족 또는 워밍업 이후 유효한 지표 행 없음
    #[error("데이터 부족: {0}")]
    InsufficientData(String),

    /// 언어 모델 요약 호출 실패
    #[error("요약 서비스 에러: {0}")]
    SummaryService(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 파이프라인 작업을 위한 Result 타입.
pub type ScopeResult<T> = Result<T, ScopeError>;

impl From<serde_json::Error> for ScopeError {
    fn from(err: serde_json::Error) -> Self {
        ScopeError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_is_serialization() {
        let err: ScopeError = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(matches!(err, ScopeError::Serialization(_)));
    }

    #[test]
    fn test_error_display() {
        let err = ScopeError::InsufficientData("캔들 49개".to_string());
        assert_eq!(err.to_string(), "데이터 부족: 캔들 49개");
    }
}
