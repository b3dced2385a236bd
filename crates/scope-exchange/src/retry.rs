//! 재시도 가능한 요청 에러를 위한 재시도 헬퍼.
//!
//! 기본 설정은 재시도 0회이며 첫 실패를 그대로 반환합니다.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::traits::ExchangeResult;

/// 재시도 설정.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    /// 최대 재시도 횟수 (첫 시도 제외)
    pub max_retries: u32,
    /// 재시도 대기 시간 상한 (밀리초)
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            max_delay_ms: 500,
        }
    }
}

impl RetryConfig {
    /// 새 재시도 설정 생성.
    pub fn new(max_retries: u32, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            max_delay_ms,
        }
    }
}

/// 재시도 가능한 에러에 한해 작업을 다시 실행합니다.
///
/// 대기 시간은 에러가 권장하는 값과 `max_delay_ms` 중 작은 값입니다.
pub async fn with_retry<T, F, Fut>(config: RetryConfig, mut op: F) -> ExchangeResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ExchangeResult<T>>,
{
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < config.max_retries => {
                attempt += 1;
                let delay = err
                    .retry_delay_ms()
                    .unwrap_or(config.max_delay_ms)
                    .min(config.max_delay_ms);
                warn!(attempt, delay_ms = delay, error = %err, "retrying request");
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            Err(err) => return Err(err),
        }
    }
}
