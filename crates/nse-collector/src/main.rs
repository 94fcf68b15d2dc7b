//! NSE 종목 데이터 수집 CLI.

use chrono::{Duration, NaiveDate};
use clap::Parser;
use nse_collector::config::LoggingConfig;
use nse_collector::logging::{init_logging, LogConfig};
use nse_collector::{modules, CollectorConfig, CollectorContext, CollectorError};
use nse_core::{ist_today, parse_date, FetchWindow, LookbackPeriod};
use nse_data::{dedup_tickers, TickerSource};

#[derive(Parser)]
#[command(name = "nse-collector")]
#[command(about = "NSE equity OHLCV / metadata collector", long_about = None)]
#[command(version)]
struct Cli {
    /// 종목 메타데이터 동기화 (섹터, 산업, 발행 주식 수)
    #[arg(long)]
    metadata: bool,

    /// OHLCV 일봉 수집
    #[arg(long)]
    ohlcv: bool,

    /// 앞에서부터 N개 종목만 처리
    #[arg(long)]
    limit: Option<usize>,

    /// 과거 기간 일괄 수집 (1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max)
    #[arg(long, conflicts_with_all = ["start", "end"])]
    period: Option<LookbackPeriod>,

    /// 세션 구간 시작일 (YYYY-MM-DD, 기본: 전일)
    #[arg(long, value_parser = parse_date)]
    start: Option<NaiveDate>,

    /// 세션 구간 종료일 (YYYY-MM-DD, 미포함, 기본: 오늘)
    #[arg(long, value_parser = parse_date)]
    end: Option<NaiveDate>,

    /// 특정 종목만 수집 (쉼표로 구분, 예: "RELIANCE,TCS")
    #[arg(long, value_delimiter = ',')]
    symbols: Option<Vec<String>>,

    /// 종목 목록 CSV 경로 또는 URL (TICKER_SOURCE 대신 사용)
    #[arg(long)]
    source: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    let log_settings = LoggingConfig::from_env();
    init_logging(
        LogConfig::new(format!(
            "nse_collector={0},nse_data={0}",
            cli.log_level
        ))
        .with_format(log_settings.format)
        .with_file(log_settings.log_file),
    )?;

    tracing::info!("NSE Data Collector 시작");

    // 설정 로드
    let config = CollectorConfig::from_env()?;
    tracing::debug!(supabase_url = %config.supabase.url, "설정 로드 완료");

    if !cli.ohlcv && !cli.metadata {
        tracing::warn!("수행할 작업이 없습니다 (--ohlcv 또는 --metadata를 지정하세요)");
        return Ok(());
    }

    let window = resolve_window(cli.period, cli.start, cli.end, ist_today())?;
    let ctx = CollectorContext::from_config(&config).await?;
    let tickers = load_tickers(&cli, &config).await?;

    if cli.metadata {
        let stats = modules::sync_metadata(&ctx, &tickers).await;
        stats.log_summary("메타데이터 동기화");
    }

    if cli.ohlcv {
        let stats = modules::collect_ohlcv(&ctx, &tickers, window).await;
        stats.log_summary("OHLCV 수집");
    }

    tracing::info!("NSE Data Collector 종료");

    Ok(())
}

/// 수집 대상 종목 결정 (`--symbols`가 있으면 목록 파일을 읽지 않음)
async fn load_tickers(cli: &Cli, config: &CollectorConfig) -> Result<Vec<String>, CollectorError> {
    if let Some(symbols) = &cli.symbols {
        let tickers = dedup_tickers(symbols.iter().cloned(), cli.limit);
        if tickers.is_empty() {
            return Err(CollectorError::Config(
                "--symbols 목록이 비어 있습니다".to_string(),
            ));
        }
        tracing::info!(count = tickers.len(), "지정 종목 수집");
        return Ok(tickers);
    }

    let location = cli
        .source
        .as_deref()
        .unwrap_or(config.source.ticker_source.as_str());
    let tickers = TickerSource::parse(location)
        .load(cli.limit, config.source.http_timeout())
        .await?;
    Ok(tickers)
}

/// CLI 인자로 가격 봉 조회 구간을 정합니다.
///
/// 잘못된 날짜 범위는 설정 에러로 실행을 중단시킵니다.
fn resolve_window(
    period: Option<LookbackPeriod>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> nse_collector::Result<FetchWindow> {
    if let Some(period) = period {
        return Ok(FetchWindow::Lookback(period));
    }

    let window = match (start, end) {
        (None, None) => FetchWindow::latest_session(today),
        (Some(start), None) => FetchWindow::session(start, today.max(start + Duration::days(1)))?,
        (None, Some(end)) => FetchWindow::session(end - Duration::days(1), end)?,
        (Some(start), Some(end)) => FetchWindow::session(start, end)?,
    };
    Ok(window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "nse-collector",
            "--ohlcv",
            "--metadata",
            "--limit",
            "5",
            "--period",
            "10y",
            "--symbols",
            "RELIANCE,TCS",
        ])
        .unwrap();

        assert!(cli.ohlcv && cli.metadata);
        assert_eq!(cli.limit, Some(5));
        assert_eq!(cli.period, Some(LookbackPeriod::Y10));
        assert_eq!(
            cli.symbols,
            Some(vec!["RELIANCE".to_string(), "TCS".to_string()])
        );
    }

    #[test]
    fn test_cli_period_conflicts_with_dates() {
        let result = Cli::try_parse_from([
            "nse-collector",
            "--ohlcv",
            "--period",
            "1y",
            "--start",
            "2024-01-01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_window() {
        let today = date(2024, 6, 12);

        assert_eq!(
            resolve_window(None, None, None, today).unwrap(),
            FetchWindow::Session {
                start: date(2024, 6, 11),
                end: today
            }
        );
        assert_eq!(
            resolve_window(Some(LookbackPeriod::Max), None, None, today).unwrap(),
            FetchWindow::Lookback(LookbackPeriod::Max)
        );
        assert_eq!(
            resolve_window(None, Some(date(2024, 6, 3)), None, today).unwrap(),
            FetchWindow::Session {
                start: date(2024, 6, 3),
                end: today
            }
        );
        assert_eq!(
            resolve_window(None, None, Some(date(2024, 6, 5)), today).unwrap(),
            FetchWindow::Session {
                start: date(2024, 6, 4),
                end: date(2024, 6, 5)
            }
        );
    }

    #[test]
    fn test_resolve_window_rejects_inverted_range_as_config_error() {
        let today = date(2024, 6, 12);

        let err = resolve_window(None, Some(date(2024, 6, 5)), Some(date(2024, 6, 5)), today)
            .unwrap_err();
        assert!(matches!(err, CollectorError::Config(_)));

        let err = resolve_window(None, Some(date(2024, 6, 8)), Some(date(2024, 6, 3)), today)
            .unwrap_err();
        assert!(matches!(err, CollectorError::Config(_)));
    }
}
