//! 에러 타입 정의.

use std::fmt;

use nse_core::CoreError;
use nse_data::DataError;

/// Collector 에러 타입
///
/// 실행 전체를 중단시키는 에러만 표현합니다. 종목 단위 실패는
/// `SymbolReport`로 기록되고 여기까지 올라오지 않습니다.
#[derive(Debug)]
pub enum CollectorError {
    /// 설정 에러 (필수 환경변수 누락, 잘못된 CLI 인자 등)
    Config(String),
    /// 데이터 소스 에러 (종목 목록, Provider/저장소 초기화)
    DataSource(DataError),
    /// 파일 입출력 에러 (로그 파일)
    Io(std::io::Error),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::DataSource(e) => write!(f, "Data source error: {}", e),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DataSource(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

impl From<DataError> for CollectorError {
    fn from(err: DataError) -> Self {
        Self::DataSource(err)
    }
}

impl From<CoreError> for CollectorError {
    fn from(err: CoreError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CollectorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_core_error_is_config_error() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let err: CollectorError = CoreError::InvalidRange { start: day, end: day }.into();

        assert!(matches!(err, CollectorError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_data_error_keeps_source() {
        use std::error::Error;

        let err: CollectorError = DataError::TickerSource("빈 목록".to_string()).into();
        assert!(matches!(err, CollectorError::DataSource(_)));
        assert!(err.source().is_some());
    }
}
