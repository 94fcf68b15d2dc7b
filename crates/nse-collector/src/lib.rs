//! NSE 종목 데이터 수집기.
//!
//! 이 crate는 cron으로 실행하는 배치 수집 바이너리를 제공합니다:
//! - OHLCV 일봉 수집 (최근 세션 또는 과거 기간 일괄)
//! - 종목 메타데이터 동기화 (섹터, 산업, 발행 주식 수)
//!
//! 종목 목록 → 배치 실행기 → 종목별 처리(조회 → 변환 → upsert) 순서로
//! 흐르며, 종목 단위 실패는 실패 로그에 남기고 다음 종목으로 넘어갑니다.

pub mod config;
pub mod context;
pub mod error;
pub mod failure_log;
pub mod logging;
pub mod modules;
pub mod stats;

pub use config::CollectorConfig;
pub use context::CollectorContext;
pub use error::{CollectorError, Result};
pub use failure_log::FailureLog;
pub use stats::CollectionStats;
