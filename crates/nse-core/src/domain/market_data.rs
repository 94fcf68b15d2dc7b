//! 가격 봉 타입.
//!
//! - `RawBar` - Provider가 반환한 일봉 한 행
//! - `PriceBar` - 저장소에 upsert되는 레코드 (`ticker`, `date` 기준 유일)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Provider가 반환한 일봉 원본.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    /// 세션 날짜 (IST)
    pub date: NaiveDate,
    /// 시가
    pub open: f64,
    /// 고가
    pub high: f64,
    /// 저가
    pub low: f64,
    /// 종가
    pub close: f64,
    /// 거래량
    pub volume: u64,
}

impl RawBar {
    /// 가격 필드가 모두 NaN인 자리표시 행인지 확인합니다.
    ///
    /// Yahoo Finance는 휴장일에 가격 없이 타임스탬프만 있는 행을 돌려주기도 합니다.
    pub fn is_placeholder(&self) -> bool {
        self.open.is_nan() && self.high.is_nan() && self.low.is_nan() && self.close.is_nan()
    }
}

/// 저장용 OHLCV 가격 봉.
///
/// JSON 필드명은 `stock_ohlcv` 테이블 컬럼명과 일치합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// 세션 날짜 (`YYYY-MM-DD`)
    pub date: NaiveDate,
    /// 접미사 없는 티커
    pub ticker: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Provider 원본 행을 저장용 레코드로 변환합니다.
    pub fn from_raw(ticker: impl Into<String>, raw: &RawBar) -> Self {
        Self {
            date: raw.date,
            ticker: ticker.into(),
            open: raw.open,
            high: raw.high,
            low: raw.low,
            close: raw.close,
            volume: raw.volume,
        }
    }
}
