//! 핵심 타입의 에러 정의.

use thiserror::Error;

/// 도메인 타입 파싱/변환 에러.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// 지원하지 않는 조회 기간 문자열
    #[error("지원하지 않는 조회 기간: {0}")]
    InvalidPeriod(String),

    /// 날짜 형식 오류
    #[error("잘못된 날짜 형식 (YYYY-MM-DD): {0}")]
    InvalidDate(String),

    /// 시작일이 종료일보다 늦거나 같음
    #[error("잘못된 날짜 범위: {start} ~ {end}")]
    InvalidRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

/// 핵심 타입 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;
