//! 수집 데이터 종류.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 수집 데이터 종류. 실패 로그의 접두어로도 사용됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    /// 일봉 가격 데이터
    Ohlcv,
    /// 종목 메타데이터
    Metadata,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKind::Ohlcv => write!(f, "OHLCV"),
            DataKind::Metadata => write!(f, "Metadata"),
        }
    }
}
