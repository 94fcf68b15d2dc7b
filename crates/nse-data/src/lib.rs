//! 외부 데이터 소스 및 저장소 어댑터.
//!
//! 이 crate는 다음을 제공합니다:
//! - 시세/종목 정보 Provider (`MarketDataProvider`, Yahoo Finance 구현)
//! - 테이블 저장소 upsert 대상 (`RecordSink`, Supabase REST 구현)
//! - 종목 목록 CSV 로더 (로컬 파일 또는 URL)

pub mod error;
pub mod provider;
pub mod storage;

pub use error::{DataError, Result};

// Provider 재내보내기
pub use provider::{
    dedup_tickers, parse_ticker_csv, MarketDataProvider, TickerSource, YahooMarketData,
    NSE_EQUITY_LIST_URL,
};

// 저장소 재내보내기
pub use storage::{RecordSink, SupabaseConfig, SupabaseSink};
