//! 상대 조회 기간 정의.
//!
//! Yahoo Finance `range` 파라미터와 동일한 문자열 표현을 사용합니다.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 오늘 기준 상대 조회 기간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LookbackPeriod {
    /// 1일
    D1,
    /// 5일
    D5,
    /// 1개월
    M1,
    /// 3개월
    M3,
    /// 6개월
    M6,
    /// 1년
    Y1,
    /// 2년
    Y2,
    /// 5년
    Y5,
    /// 10년
    Y10,
    /// 연초부터
    Ytd,
    /// 전체
    Max,
}

impl LookbackPeriod {
    /// 지원하는 모든 기간.
    pub const ALL: [LookbackPeriod; 11] = [
        LookbackPeriod::D1,
        LookbackPeriod::D5,
        LookbackPeriod::M1,
        LookbackPeriod::M3,
        LookbackPeriod::M6,
        LookbackPeriod::Y1,
        LookbackPeriod::Y2,
        LookbackPeriod::Y5,
        LookbackPeriod::Y10,
        LookbackPeriod::Ytd,
        LookbackPeriod::Max,
    ];

    /// Yahoo Finance range 문자열로 변환합니다.
    pub fn as_range_str(&self) -> &'static str {
        match self {
            LookbackPeriod::D1 => "1d",
            LookbackPeriod::D5 => "5d",
            LookbackPeriod::M1 => "1mo",
            LookbackPeriod::M3 => "3mo",
            LookbackPeriod::M6 => "6mo",
            LookbackPeriod::Y1 => "1y",
            LookbackPeriod::Y2 => "2y",
            LookbackPeriod::Y5 => "5y",
            LookbackPeriod::Y10 => "10y",
            LookbackPeriod::Ytd => "ytd",
            LookbackPeriod::Max => "max",
        }
    }
}

impl fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_range_str())
    }
}

impl FromStr for LookbackPeriod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_range_str() == normalized)
            .ok_or_else(|| CoreError::InvalidPeriod(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period() {
        assert_eq!("10y".parse::<LookbackPeriod>(), Ok(LookbackPeriod::Y10));
        assert_eq!("5D".parse::<LookbackPeriod>(), Ok(LookbackPeriod::D5));
        assert_eq!(" max ".parse::<LookbackPeriod>(), Ok(LookbackPeriod::Max));
    }

    #[test]
    fn test_parse_invalid_period() {
        assert_eq!(
            "7w".parse::<LookbackPeriod>(),
            Err(CoreError::InvalidPeriod("7w".to_string()))
        );
    }
}
