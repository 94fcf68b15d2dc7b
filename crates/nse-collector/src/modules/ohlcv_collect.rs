//! OHLCV 데이터 수집 모듈.
//!
//! - 단일 세션 구간: 첫 행 하나로 가격 봉 하나를 만들어 한 번 upsert
//! - 과거 기간: 모든 행을 가격 봉으로 만들어 `upsert_batch_size`개씩 순서대로 upsert

use std::time::Instant;

use nse_core::{DataKind, FetchWindow, PriceBar, RawBar};
use nse_data::RecordSink;
use tracing::{debug, error, info, warn};

use super::batch_runner::run_batches;
use super::report::{FailureStage, SymbolOutcome, SymbolReport};
use super::retry::retry_with_backoff;
use crate::{CollectionStats, CollectorContext};

/// 전체 종목 OHLCV 수집.
pub async fn collect_ohlcv(
    ctx: &CollectorContext,
    tickers: &[String],
    window: FetchWindow,
) -> CollectionStats {
    let start = Instant::now();

    info!(
        symbols = tickers.len(),
        window = %window,
        historical = window.is_historical(),
        batch_size = ctx.batch.batch_size,
        "OHLCV 수집 시작"
    );

    let window = &window;
    let reports = run_batches(tickers, &ctx.batch, |ticker| {
        collect_ticker_ohlcv(ctx, ticker, window)
    })
    .await;

    let mut stats = CollectionStats::from_reports(&reports);
    stats.elapsed = start.elapsed();
    stats
}

/// 종목 하나의 OHLCV 수집.
///
/// 어떤 실패도 호출자에게 전파하지 않고 보고로 돌려줍니다.
pub async fn collect_ticker_ohlcv(
    ctx: &CollectorContext,
    ticker: &str,
    window: &FetchWindow,
) -> SymbolReport {
    let symbol = ctx.suffix.qualify(ticker);
    let symbol = symbol.as_str();
    debug!(ticker = ticker, symbol = symbol, "수집 시작");

    let fetched = retry_with_backoff(&ctx.retry, DataKind::Ohlcv, ticker, |_| {
        ctx.provider.fetch_bars(symbol, window)
    })
    .await;

    let outcome = match fetched {
        Ok(raw) if raw.is_empty() => {
            warn!(ticker = ticker, window = %window, "데이터 없음");
            SymbolOutcome::Empty
        }
        Ok(raw) => {
            let bars = to_price_bars(ticker, &raw, window);
            upsert_in_chunks(ctx.sink.as_ref(), ticker, &bars, ctx.upsert_batch_size).await
        }
        Err(exhausted) => SymbolOutcome::Failed {
            stage: FailureStage::Fetch {
                attempts: exhausted.attempts,
            },
            reason: exhausted.last_error.to_string(),
        },
    };

    let report = SymbolReport::new(ticker, DataKind::Ohlcv, outcome);
    ctx.note_failure(&report).await;
    report
}

/// Provider 행을 저장용 가격 봉으로 변환.
///
/// 단일 세션 구간이면 첫 행만 사용합니다.
fn to_price_bars(ticker: &str, raw: &[RawBar], window: &FetchWindow) -> Vec<PriceBar> {
    match window {
        FetchWindow::Session { .. } => raw
            .first()
            .map(|bar| vec![PriceBar::from_raw(ticker, bar)])
            .unwrap_or_default(),
        FetchWindow::Lookback(_) => raw.iter().map(|bar| PriceBar::from_raw(ticker, bar)).collect(),
    }
}

/// 가격 봉을 `chunk_size`개씩 순서대로 upsert합니다.
///
/// 첫 번째 실패에서 멈추며, 그 전까지 쓴 묶음은 그대로 남습니다.
async fn upsert_in_chunks(
    sink: &dyn RecordSink,
    ticker: &str,
    bars: &[PriceBar],
    chunk_size: usize,
) -> SymbolOutcome {
    let mut written = 0;

    for chunk in bars.chunks(chunk_size.max(1)) {
        if let Err(e) = sink.upsert_price_bars(chunk).await {
            error!(
                ticker = ticker,
                rows_written = written,
                chunk = chunk.len(),
                error = %e,
                "저장 실패"
            );
            return SymbolOutcome::Failed {
                stage: FailureStage::Sink {
                    rows_written: written,
                },
                reason: e.to_string(),
            };
        }
        written += chunk.len();
    }

    info!(ticker = ticker, rows = written, "수집 및 저장 완료");
    SymbolOutcome::Upserted { rows: written }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use nse_core::LookbackPeriod;

    fn raw(day: u32, close: f64) -> RawBar {
        RawBar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn test_session_window_uses_first_row_only() {
        let window = FetchWindow::session(
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        )
        .unwrap();

        let bars = to_price_bars("AAA", &[raw(4, 10.0), raw(5, 11.0)], &window);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].ticker, "AAA");
        assert_eq!(bars[0].close, 10.0);
    }

    #[test]
    fn test_lookback_window_keeps_every_row_in_order() {
        let window = FetchWindow::Lookback(LookbackPeriod::M1);
        let bars = to_price_bars("AAA", &[raw(4, 10.0), raw(5, 11.0), raw(6, 12.0)], &window);

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![10.0, 11.0, 12.0]);
    }
}
