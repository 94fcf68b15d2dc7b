//! 종목 메타데이터 동기화 모듈.
//!
//! 종목당 Provider 조회 한 번, upsert 한 번. 가격 봉 수집과는 독립적으로
//! 실행되며 같은 재시도/배치 규칙을 따릅니다.

use std::time::Instant;

use nse_core::{DataKind, TickerMetadata};
use tracing::{debug, error, info, warn};

use super::batch_runner::run_batches;
use super::report::{FailureStage, SymbolOutcome, SymbolReport};
use super::retry::retry_with_backoff;
use crate::{CollectionStats, CollectorContext};

/// 전체 종목 메타데이터 동기화.
pub async fn sync_metadata(ctx: &CollectorContext, tickers: &[String]) -> CollectionStats {
    let start = Instant::now();

    info!(
        symbols = tickers.len(),
        batch_size = ctx.batch.batch_size,
        "메타데이터 동기화 시작"
    );

    let reports = run_batches(tickers, &ctx.batch, |ticker| sync_ticker_metadata(ctx, ticker)).await;

    let mut stats = CollectionStats::from_reports(&reports);
    stats.elapsed = start.elapsed();
    stats
}

/// 종목 하나의 메타데이터 동기화.
pub async fn sync_ticker_metadata(ctx: &CollectorContext, ticker: &str) -> SymbolReport {
    let symbol = ctx.suffix.qualify(ticker);
    let symbol = symbol.as_str();
    debug!(ticker = ticker, symbol = symbol, "메타데이터 조회");

    let fetched = retry_with_backoff(&ctx.retry, DataKind::Metadata, ticker, |_| {
        ctx.provider.fetch_profile(symbol)
    })
    .await;

    let outcome = match fetched {
        Ok(None) => {
            warn!(ticker = ticker, "메타데이터 없음");
            SymbolOutcome::Empty
        }
        Ok(Some(profile)) => {
            let record = TickerMetadata::from_profile(ticker, profile);
            match ctx.sink.upsert_metadata(&record).await {
                Ok(()) => {
                    info!(
                        ticker = ticker,
                        sector = %record.sector,
                        industry = %record.industry,
                        "메타데이터 저장 완료"
                    );
                    SymbolOutcome::Upserted { rows: 1 }
                }
                Err(e) => {
                    error!(ticker = ticker, error = %e, "메타데이터 저장 실패");
                    SymbolOutcome::Failed {
                        stage: FailureStage::Sink { rows_written: 0 },
                        reason: e.to_string(),
                    }
                }
            }
        }
        Err(exhausted) => SymbolOutcome::Failed {
            stage: FailureStage::Fetch {
                attempts: exhausted.attempts,
            },
            reason: exhausted.last_error.to_string(),
        },
    };

    let report = SymbolReport::new(ticker, DataKind::Metadata, outcome);
    ctx.note_failure(&report).await;
    report
}
