//! 가격 봉 조회 구간 및 IST 기준 날짜 계산.
//!
//! NSE 세션 날짜는 인도 표준시(Asia/Kolkata) 기준입니다. Provider 타임스탬프를
//! UTC 날짜로 자르면 장 시작 시각에 따라 하루가 어긋날 수 있으므로
//! 모든 날짜 변환은 이 모듈을 거칩니다.

use super::period::LookbackPeriod;
use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Asia::Kolkata;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 가격 봉 조회 구간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetchWindow {
    /// 명시적 구간 `[start, end)`. 단일 세션 조회로, 첫 행 하나만 사용합니다.
    Session { start: NaiveDate, end: NaiveDate },
    /// 오늘 기준 상대 기간. 과거 데이터 일괄 조회로, 모든 행을 사용합니다.
    Lookback(LookbackPeriod),
}

impl FetchWindow {
    /// 명시적 구간을 생성합니다.
    pub fn session(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if start >= end {
            return Err(CoreError::InvalidRange { start, end });
        }
        Ok(Self::Session { start, end })
    }

    /// 전일 ~ 오늘 구간 (일일 갱신 기본값).
    pub fn latest_session(today: NaiveDate) -> Self {
        Self::Session {
            start: today - Duration::days(1),
            end: today,
        }
    }

    /// 과거 데이터 일괄 조회 여부.
    pub fn is_historical(&self) -> bool {
        matches!(self, Self::Lookback(_))
    }
}

impl fmt::Display for FetchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session { start, end } => write!(f, "{} ~ {}", start, end),
            Self::Lookback(period) => write!(f, "last {}", period),
        }
    }
}

/// IST 기준 오늘 날짜.
pub fn ist_today() -> NaiveDate {
    Utc::now().with_timezone(&Kolkata).date_naive()
}

/// Unix 타임스탬프(초)를 IST 세션 날짜로 변환합니다.
pub fn ist_date_from_timestamp(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.with_timezone(&Kolkata).date_naive())
}

/// IST 자정의 Unix 타임스탬프(초).
pub fn ist_midnight_timestamp(date: NaiveDate) -> Option<i64> {
    date.and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(Kolkata).single())
        .map(|dt| dt.timestamp())
}

/// `YYYY-MM-DD` 문자열을 파싱합니다.
pub fn parse_date(s: &str) -> CoreResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| CoreError::InvalidDate(s.to_string()))
}
