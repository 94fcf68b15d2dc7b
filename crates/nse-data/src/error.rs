//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// Provider 연결 오류
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// 데이터 가져오기 오류 (외부 소스)
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// 파싱 오류
    #[error("Parse error: {0}")]
    ParseError(String),

    /// HTTP 요청 실패
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// 저장소가 쓰기를 거부함
    #[error("Sink rejected write ({status}): {body}")]
    SinkError { status: u16, body: String },

    /// 종목 목록 조회/파싱 오류
    #[error("Ticker source error: {0}")]
    TickerSource(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, DataError>;
