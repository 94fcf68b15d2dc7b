//! 종목 목록 로더.
//!
//! NSE `EQUITY_L.csv` 형식(헤더에 `SYMBOL` 또는 `Symbol` 컬럼)의 CSV를
//! 로컬 파일 또는 URL에서 읽어 중복 없는 티커 목록을 만듭니다.
//! 목록이 불완전하면 배치 구성이 어긋나므로 모든 실패는 에러로 반환합니다.

use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{DataError, Result};

/// NSE 전체 상장 종목 CSV.
pub const NSE_EQUITY_LIST_URL: &str =
    "https://nsearchives.nseindia.com/content/equities/EQUITY_L.csv";

/// NSE는 User-Agent 없는 요청을 거부합니다.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// 종목 목록 위치.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickerSource {
    /// 로컬 CSV 파일
    File(PathBuf),
    /// 원격 CSV URL
    Url(String),
}

impl TickerSource {
    /// `http://`, `https://`로 시작하면 URL, 그 외에는 파일 경로.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            Self::Url(location.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }

    /// 종목 목록을 로드합니다.
    ///
    /// `limit`이 주어지면 앞에서부터 최대 `limit`개만 반환합니다.
    pub async fn load(&self, limit: Option<usize>, timeout: Duration) -> Result<Vec<String>> {
        let bytes = match self {
            Self::File(path) => tokio::fs::read(path).await.map_err(|e| {
                DataError::TickerSource(format!("{} 읽기 실패: {}", path.display(), e))
            })?,
            Self::Url(url) => download(url, timeout).await?,
        };

        let tickers = parse_ticker_csv(bytes.as_slice())?;
        let tickers = dedup_tickers(tickers, limit);
        if tickers.is_empty() {
            return Err(DataError::TickerSource(format!("{}: 종목이 없습니다", self)));
        }

        info!(source = %self, count = tickers.len(), "종목 목록 로드 완료");
        Ok(tickers)
    }
}

impl fmt::Display for TickerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

async fn download(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    debug!(url = url, "종목 목록 다운로드");

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(BROWSER_USER_AGENT)
        .build()
        .map_err(|e| DataError::TickerSource(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DataError::TickerSource(format!("{} 요청 실패: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DataError::TickerSource(format!(
            "{} 응답 오류: HTTP {}",
            url, status
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| DataError::TickerSource(format!("{} 본문 읽기 실패: {}", url, e)))?;
    Ok(body.to_vec())
}

/// CSV에서 `SYMBOL`/`Symbol` 컬럼 값을 순서대로 읽습니다.
///
/// 헤더와 값의 앞뒤 공백은 제거하고, 빈 값은 건너뜁니다.
pub fn parse_ticker_csv<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| DataError::TickerSource(format!("CSV 헤더 파싱 실패: {}", e)))?
        .clone();

    let column = headers
        .iter()
        .position(|h| h == "SYMBOL" || h == "Symbol")
        .ok_or_else(|| {
            DataError::TickerSource(format!(
                "SYMBOL 컬럼이 없습니다 (헤더: {})",
                headers.iter().collect::<Vec<_>>().join(",")
            ))
        })?;

    let mut tickers = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| {
            DataError::TickerSource(format!("CSV {}행 파싱 실패: {}", line + 2, e))
        })?;
        if let Some(symbol) = record.get(column).filter(|s| !s.is_empty()) {
            tickers.push(symbol.to_string());
        }
    }

    Ok(tickers)
}

/// 순서를 유지하며 중복/빈 값을 제거하고 `limit`개로 자릅니다.
pub fn dedup_tickers<I>(tickers: I, limit: Option<usize>) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let unique = tickers
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()));

    match limit {
        Some(n) => unique.take(n).collect(),
        None => unique.collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EQUITY_L: &str = "\
SYMBOL,NAME OF COMPANY, SERIES, DATE OF LISTING, PAID UP VALUE, MARKET LOT, ISIN NUMBER, FACE VALUE
20MICRONS,20 Microns Limited,EQ,06-OCT-2008,5,1,INE144J01027,5
RELIANCE,Reliance Industries Limited,EQ,29-NOV-1995,10,1,INE002A01018,10
,Blank Row Limited,EQ,01-JAN-2000,10,1,INE000000000,10
TCS,Tata Consultancy Services Limited,EQ,25-AUG-2004,1,1,INE467B01029,1
RELIANCE,Reliance Industries Limited,BE,29-NOV-1995,10,1,INE002A01018,10
";

    #[test]
    fn test_parse_source_location() {
        assert_eq!(
            TickerSource::parse(NSE_EQUITY_LIST_URL),
            TickerSource::Url(NSE_EQUITY_LIST_URL.to_string())
        );
        assert_eq!(
            TickerSource::parse("data/EQUITY_L.csv"),
            TickerSource::File(PathBuf::from("data/EQUITY_L.csv"))
        );
    }

    #[test]
    fn test_parse_ticker_csv_skips_blank_values() {
        let tickers = parse_ticker_csv(EQUITY_L.as_bytes()).unwrap();
        assert_eq!(tickers, vec!["20MICRONS", "RELIANCE", "TCS", "RELIANCE"]);
    }

    #[test]
    fn test_parse_ticker_csv_accepts_title_case_header() {
        let csv = "Company Name,Industry,Symbol,Series\nInfosys Ltd.,IT,INFY,EQ\n";
        assert_eq!(parse_ticker_csv(csv.as_bytes()).unwrap(), vec!["INFY"]);
    }

    #[test]
    fn test_parse_ticker_csv_missing_column() {
        let err = parse_ticker_csv("TICKER,NAME\nAAA,Aaa\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::TickerSource(_)));
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_and_limit() {
        let input = ["B", "A", "B", " C ", "A", "D"].map(String::from);
        assert_eq!(dedup_tickers(input.clone(), None), vec!["B", "A", "C", "D"]);
        assert_eq!(dedup_tickers(input, Some(2)), vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_load_from_file_with_limit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EQUITY_L.as_bytes()).unwrap();

        let source = TickerSource::File(file.path().to_path_buf());
        let tickers = source
            .load(Some(2), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(tickers, vec!["20MICRONS", "RELIANCE"]);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_error() {
        let source = TickerSource::File(PathBuf::from("/nonexistent/EQUITY_L.csv"));
        let err = source.load(None, Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, DataError::TickerSource(_)));
    }

    #[tokio::test]
    async fn test_load_from_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/content/equities/EQUITY_L.csv")
            .with_status(200)
            .with_header("content-type", "text/csv")
            .with_body(EQUITY_L)
            .create_async()
            .await;

        let source = TickerSource::parse(&format!(
            "{}/content/equities/EQUITY_L.csv",
            server.url()
        ));
        let tickers = source.load(None, Duration::from_secs(5)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(tickers, vec!["20MICRONS", "RELIANCE", "TCS"]);
    }

    #[tokio::test]
    async fn test_load_from_url_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/EQUITY_L.csv")
            .with_status(403)
            .create_async()
            .await;

        let source = TickerSource::parse(&format!("{}/EQUITY_L.csv", server.url()));
        let err = source.load(None, Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, DataError::TickerSource(_)));
    }

    #[tokio::test]
    async fn test_load_header_only_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"SYMBOL,NAME OF COMPANY\n").unwrap();

        let source = TickerSource::File(file.path().to_path_buf());
        assert!(source.load(None, Duration::from_secs(5)).await.is_err());
    }
}
