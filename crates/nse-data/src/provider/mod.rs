//! 데이터 Provider 모듈.
//!
//! ## 시세 Provider
//! - `MarketDataProvider`: 일봉 조회 및 종목 프로필 조회 추상화
//! - `YahooMarketData`: Yahoo Finance 구현 (`yahoo_finance_api` 크레이트)
//!
//! ## 종목 목록
//! - `TickerSource`: NSE `EQUITY_L.csv` 형식의 로컬 파일 또는 URL

pub mod ticker_list;
pub mod yahoo;

use async_trait::async_trait;
use nse_core::{FetchWindow, RawBar, SymbolProfile};

use crate::error::Result;

pub use ticker_list::{dedup_tickers, parse_ticker_csv, TickerSource, NSE_EQUITY_LIST_URL};
pub use yahoo::YahooMarketData;

/// 시세 및 종목 정보 Provider.
///
/// `symbol`은 시장 접미사가 붙은 심볼(`RELIANCE.NS`)입니다.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Provider 이름 (로그용).
    fn name(&self) -> &str;

    /// 조회 구간의 일봉을 날짜 오름차순으로 반환합니다.
    ///
    /// 데이터가 없으면 빈 벡터를 반환합니다 (에러 아님).
    async fn fetch_bars(&self, symbol: &str, window: &FetchWindow) -> Result<Vec<RawBar>>;

    /// 종목 프로필을 조회합니다. 결과 자체가 없으면 `None`.
    async fn fetch_profile(&self, symbol: &str) -> Result<Option<SymbolProfile>>;
}
