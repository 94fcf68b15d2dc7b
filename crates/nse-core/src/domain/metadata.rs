//! 종목 메타데이터 타입.

use serde::{Deserialize, Serialize};

/// 분류 정보가 없을 때 사용하는 기본값.
pub const UNKNOWN_CLASSIFICATION: &str = "Unknown";

/// Provider가 반환한 종목 프로필 (모든 필드 선택).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolProfile {
    /// 섹터
    pub sector: Option<String>,
    /// 산업
    pub industry: Option<String>,
    /// 상장주식수
    pub shares_outstanding: Option<u64>,
}

/// 저장용 종목 메타데이터 (`ticker` 기준 유일).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerMetadata {
    pub ticker: String,
    pub sector: String,
    pub industry: String,
    pub shares_outstanding: u64,
}

impl TickerMetadata {
    /// 프로필을 저장용 레코드로 변환합니다.
    ///
    /// 비어 있거나 없는 분류는 `"Unknown"`, 주식수는 `0`으로 채웁니다.
    pub fn from_profile(ticker: impl Into<String>, profile: SymbolProfile) -> Self {
        Self {
            ticker: ticker.into(),
            sector: or_unknown(profile.sector),
            industry: or_unknown(profile.industry),
            shares_outstanding: profile.shares_outstanding.unwrap_or(0),
        }
    }
}

fn or_unknown(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN_CLASSIFICATION.to_string())
}
