//! 선형 백오프 재시도.
//!
//! `attempt`번째 실패 후 `base_delay * attempt`만큼 쉬고 다시 시도합니다.
//! 마지막 시도 후에는 쉬지 않습니다.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use nse_core::DataKind;
use tracing::{error, warn};

/// 재시도 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 최대 시도 횟수 (최소 1)
    pub max_attempts: u32,
    /// 백오프 기본 대기
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// 새 정책. `max_attempts`가 0이면 1로 올립니다.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// `attempt`번째 실패 후 대기 시간.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// 모든 시도가 실패했을 때의 결과.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    /// 수행한 시도 횟수
    pub attempts: u32,
    /// 마지막 에러
    pub last_error: E,
}

/// `op`가 성공할 때까지 정책에 따라 반복합니다.
///
/// `op`는 1부터 시작하는 시도 번호를 받습니다. 빈 결과는 성공으로 취급되므로
/// 재시도 여부는 오직 `Err`로만 결정됩니다.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    kind: DataKind,
    ticker: &str,
    mut op: F,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                error!(
                    kind = %kind,
                    ticker = ticker,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    error = %e,
                    "최종 실패, 종목 건너뜀"
                );
                return Err(RetryExhausted {
                    attempts: attempt,
                    last_error: e,
                });
            }
            Err(e) => {
                let delay = policy.delay_after(attempt);
                warn!(
                    kind = %kind,
                    ticker = ticker,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_secs = delay.as_secs_f64(),
                    error = %e,
                    "조회 실패, 재시도 예정"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    #[test]
    fn test_zero_attempts_becomes_one() {
        let policy = RetryPolicy::new(0, Duration::from_secs(2));
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.delay_after(3), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_linear_backoff_until_exhausted() {
        let policy = RetryPolicy::new(4, Duration::from_secs(2));
        let started = Instant::now();
        let calls = Arc::new(Mutex::new(Vec::new()));

        let result: Result<(), _> = retry_with_backoff(&policy, DataKind::Ohlcv, "ZZZ", |attempt| {
            let calls = Arc::clone(&calls);
            async move {
                calls.lock().unwrap().push((attempt, started.elapsed()));
                Err::<(), _>(format!("failure {}", attempt))
            }
        })
        .await;

        let exhausted = result.unwrap_err();
        assert_eq!(exhausted.attempts, 4);
        assert_eq!(exhausted.last_error, "failure 4");

        // 대기: 2s, 4s, 6s (마지막 시도 후에는 없음)
        let calls = calls.lock().unwrap();
        let offsets: Vec<u64> = calls.iter().map(|(_, at)| at.as_secs()).collect();
        assert_eq!(offsets, vec![0, 2, 6, 12]);
        assert_eq!(started.elapsed().as_secs(), 12);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_failure_stops_retrying() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1));
        let mut seen = 0;

        let value = retry_with_backoff(&policy, DataKind::Metadata, "AAA", |attempt| {
            seen = attempt;
            async move {
                if attempt < 2 {
                    Err("transient")
                } else {
                    Ok(attempt * 10)
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(value, 20);
        assert_eq!(seen, 2);
    }
}
