//! # NSE Core
//!
//! NSE 종목 수집기의 핵심 도메인 레코드 및 타입을 제공합니다.
//!
//! 이 크레이트는 I/O 없이 다음을 정의합니다:
//! - 가격 봉(`PriceBar`) 및 종목 메타데이터(`TickerMetadata`) 레코드
//! - Provider 원본 응답 타입(`RawBar`, `SymbolProfile`)과 변환
//! - 시장 접미사가 붙은 심볼 처리
//! - 조회 구간(`FetchWindow`, `LookbackPeriod`)과 IST 기준 날짜 계산

pub mod domain;
pub mod error;
pub mod types;

pub use domain::*;
pub use error::*;
pub use types::*;
