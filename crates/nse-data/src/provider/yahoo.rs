//! Yahoo Finance 시세/프로필 Provider.
//!
//! `yahoo_finance_api` 크레이트를 사용합니다.
//!
//! - 단일 세션 조회: `get_quote_history` (종료일 미포함)
//! - 과거 일괄 조회: `get_quote_range(symbol, "1d", period)`
//! - 종목 프로필: `get_ticker_info` (crumb 토큰 인증 자동 처리, `&mut self` 필요)
//!
//! 프로필 조회는 커넥터 풀에서 비어 있는 커넥터를 잡아 수행하므로 배치 안의
//! 워커들이 서로의 네트워크 호출을 기다리지 않습니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use nse_core::{FetchWindow, LookbackPeriod};
//! use nse_data::{MarketDataProvider, YahooMarketData};
//!
//! let provider = YahooMarketData::new()?;
//! let bars = provider
//!     .fetch_bars("RELIANCE.NS", &FetchWindow::Lookback(LookbackPeriod::D5))
//!     .await?;
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use nse_core::{ist_date_from_timestamp, ist_midnight_timestamp, FetchWindow, RawBar, SymbolProfile};
use time::OffsetDateTime;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;
use yahoo_finance_api as yahoo;

use super::MarketDataProvider;
use crate::error::{DataError, Result};

/// 일봉 간격.
const DAILY_INTERVAL: &str = "1d";

/// Yahoo Finance가 "데이터 없음"을 에러로 돌려줄 때의 메시지 조각.
const NO_DATA_MARKERS: [&str; 3] = ["may be delisted", "no data found", "empty data set"];

/// Yahoo Finance Provider.
pub struct YahooMarketData {
    /// 시세 조회용 커넥터
    connector: yahoo::YahooConnector,
    /// 프로필 조회용 커넥터 풀 (get_ticker_info는 `&mut self` 필요)
    info_connectors: ConnectorPool<yahoo::YahooConnector>,
}

impl YahooMarketData {
    /// 프로필 커넥터 하나로 Provider 생성.
    pub fn new() -> Result<Self> {
        Self::with_profile_pool(1)
    }

    /// 프로필 커넥터 `pool_size`개로 Provider 생성.
    ///
    /// 동시에 프로필을 조회할 워커 수(배치 크기)에 맞춥니다.
    pub fn with_profile_pool(pool_size: usize) -> Result<Self> {
        let connector = new_connector()?;
        let info_connectors = (0..pool_size.max(1))
            .map(|_| new_connector())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            connector,
            info_connectors: ConnectorPool::new(info_connectors),
        })
    }

    /// 프로필 커넥터 수.
    pub fn profile_pool_size(&self) -> usize {
        self.info_connectors.len()
    }
}

/// 배타적으로 빌려 쓰는 커넥터 풀.
///
/// 비어 있는 커넥터를 먼저 잡고, 모두 사용 중이면 라운드로빈 순서의
/// 커넥터를 기다립니다.
struct ConnectorPool<T> {
    slots: Vec<Mutex<T>>,
    next: AtomicUsize,
}

impl<T> ConnectorPool<T> {
    fn new(items: Vec<T>) -> Self {
        Self {
            slots: items.into_iter().map(Mutex::new).collect(),
            next: AtomicUsize::new(0),
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    async fn acquire(&self) -> MutexGuard<'_, T> {
        let len = self.slots.len();
        let start = self.next.fetch_add(1, Ordering::Relaxed) % len;

        for offset in 0..len {
            if let Ok(guard) = self.slots[(start + offset) % len].try_lock() {
                return guard;
            }
        }
        self.slots[start].lock().await
    }
}

fn new_connector() -> Result<yahoo::YahooConnector> {
    yahoo::YahooConnector::new()
        .map_err(|e| DataError::ConnectionError(format!("Yahoo Finance 연결 실패: {}", e)))
}

#[async_trait]
impl MarketDataProvider for YahooMarketData {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch_bars(&self, symbol: &str, window: &FetchWindow) -> Result<Vec<RawBar>> {
        let response = match window {
            FetchWindow::Session { start, end } => {
                debug!(
                    symbol = symbol,
                    start = %start,
                    end = %end,
                    "Yahoo Finance API 날짜 범위 호출"
                );
                let start = to_offset_datetime(*start)?;
                let end = to_offset_datetime(*end)?;
                self.connector.get_quote_history(symbol, start, end).await
            }
            FetchWindow::Lookback(period) => {
                debug!(
                    symbol = symbol,
                    range = period.as_range_str(),
                    "Yahoo Finance API 기간 호출"
                );
                self.connector
                    .get_quote_range(symbol, DAILY_INTERVAL, period.as_range_str())
                    .await
            }
        };

        let response = match response {
            Ok(r) => r,
            Err(e) if is_no_data_message(&e.to_string()) => {
                debug!(symbol = symbol, error = %e, "Yahoo Finance 데이터 없음");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(DataError::FetchError(format!(
                    "Yahoo Finance API 오류 ({}): {}",
                    symbol, e
                )))
            }
        };

        let quotes = match response.quotes() {
            Ok(q) => q,
            Err(e) if is_no_data_message(&e.to_string()) => return Ok(Vec::new()),
            Err(e) => return Err(DataError::ParseError(format!("Quote 파싱 오류: {}", e))),
        };

        Ok(collect_bars(quotes.iter().map(|q| {
            (
                q.timestamp as i64,
                q.open,
                q.high,
                q.low,
                q.close,
                q.volume,
            )
        })))
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<Option<SymbolProfile>> {
        let summary = {
            let mut connector = self.info_connectors.acquire().await;
            connector.get_ticker_info(symbol).await
        };

        let summary = match summary {
            Ok(s) => s,
            Err(e) if is_no_data_message(&e.to_string()) => {
                debug!(symbol = symbol, error = %e, "Yahoo ticker info 없음");
                return Ok(None);
            }
            Err(e) => {
                return Err(DataError::FetchError(format!(
                    "Yahoo ticker info 조회 실패 ({}): {}",
                    symbol, e
                )))
            }
        };

        let Some(result_data) = summary
            .quote_summary
            .and_then(|qs| qs.result)
            .and_then(|r| r.into_iter().next())
        else {
            return Ok(None);
        };

        let asset_profile = result_data.asset_profile.as_ref();
        let shares_outstanding = result_data
            .default_key_statistics
            .as_ref()
            .and_then(|ks| ks.shares_outstanding)
            .map(|v| v as u64);

        Ok(Some(SymbolProfile {
            sector: asset_profile.and_then(|p| p.sector.clone()),
            industry: asset_profile.and_then(|p| p.industry.clone()),
            shares_outstanding,
        }))
    }
}

/// NaiveDate(IST 자정)를 OffsetDateTime으로 변환.
fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime> {
    let timestamp = ist_midnight_timestamp(date)
        .ok_or_else(|| DataError::ParseError(format!("날짜 변환 실패: {}", date)))?;
    OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|e| DataError::ParseError(format!("날짜 변환 실패 ({}): {}", date, e)))
}

/// Provider 에러 메시지가 "데이터 없음"을 뜻하는지 확인.
fn is_no_data_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    NO_DATA_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// `(timestamp, open, high, low, close, volume)` 행을 날짜순 일봉으로 변환.
///
/// 자리표시 행은 버리고, 같은 날짜가 반복되면 마지막 행을 사용합니다.
fn collect_bars<I>(rows: I) -> Vec<RawBar>
where
    I: IntoIterator<Item = (i64, f64, f64, f64, f64, u64)>,
{
    let mut bars: Vec<RawBar> = rows
        .into_iter()
        .filter_map(|(timestamp, open, high, low, close, volume)| {
            let date = ist_date_from_timestamp(timestamp)?;
            Some(RawBar {
                date,
                open,
                high,
                low,
                close,
                volume,
            })
        })
        .filter(|bar| !bar.is_placeholder())
        .collect();

    bars.sort_by_key(|b| b.date);

    let mut deduped: Vec<RawBar> = Vec::with_capacity(bars.len());
    for bar in bars {
        match deduped.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => deduped.push(bar),
        }
    }
    deduped
}
