//! 시장 접미사 처리.
//!
//! Provider 조회 시에는 거래소 접미사가 붙은 심볼(`RELIANCE.NS`)을 사용하고,
//! 저장소에는 접미사 없는 티커(`RELIANCE`)를 기록합니다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// NSE 기본 접미사.
pub const NSE_SUFFIX: &str = ".NS";

/// 시장 접미사.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketSuffix(String);

impl MarketSuffix {
    /// 새 접미사를 생성합니다. 앞의 `.`이 없으면 붙입니다.
    pub fn new(suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        let trimmed = suffix.trim();
        if trimmed.is_empty() || trimmed.starts_with('.') {
            Self(trimmed.to_string())
        } else {
            Self(format!(".{}", trimmed))
        }
    }

    /// 접미사 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 티커에 접미사를 붙입니다 (`RELIANCE` → `RELIANCE.NS`).
    ///
    /// 이미 접미사가 붙어 있으면 그대로 반환합니다.
    pub fn qualify(&self, ticker: &str) -> String {
        let ticker = ticker.trim();
        if self.0.is_empty() || ticker.ends_with(&self.0) {
            ticker.to_string()
        } else {
            format!("{}{}", ticker, self.0)
        }
    }
}

impl Default for MarketSuffix {
    fn default() -> Self {
        Self(NSE_SUFFIX.to_string())
    }
}

impl fmt::Display for MarketSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
