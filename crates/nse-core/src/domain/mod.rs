//! 수집 파이프라인의 도메인 레코드.
//!
//! 이 모듈은 다음을 포함합니다:
//! - `market_data` - Provider 원본 봉(`RawBar`)과 저장용 가격 봉(`PriceBar`)
//! - `metadata` - Provider 종목 프로필(`SymbolProfile`)과 저장용 메타데이터
//! - `kind` - 데이터 종류 구분(`DataKind`)

pub mod kind;
pub mod market_data;
pub mod metadata;

pub use kind::*;
pub use market_data::*;
pub use metadata::*;
