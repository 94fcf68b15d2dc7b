//! 데이터 수집 모듈.

pub mod batch_runner;
pub mod metadata_sync;
pub mod ohlcv_collect;
pub mod report;
pub mod retry;

pub use batch_runner::{run_batches, BatchPlan};
pub use metadata_sync::{sync_metadata, sync_ticker_metadata};
pub use ohlcv_collect::{collect_ohlcv, collect_ticker_ohlcv};
pub use report::{FailureStage, SymbolOutcome, SymbolReport};
pub use retry::{retry_with_backoff, RetryExhausted, RetryPolicy};
