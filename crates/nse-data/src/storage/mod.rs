//! 저장소 모듈.
//!
//! 수집된 레코드를 외부 테이블 저장소에 upsert합니다.
//! 유일성 보장은 저장소의 충돌 키에 위임합니다:
//! - 가격 봉: `(ticker, date)`
//! - 메타데이터: `(ticker)`

pub mod supabase;

use async_trait::async_trait;
use nse_core::{PriceBar, TickerMetadata};

use crate::error::Result;

pub use supabase::{SupabaseConfig, SupabaseSink};

/// 레코드 upsert 대상.
///
/// 같은 키로 여러 번 쓰면 마지막 값만 남아야 합니다 (멱등).
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// 가격 봉을 한 번의 요청으로 upsert합니다.
    async fn upsert_price_bars(&self, bars: &[PriceBar]) -> Result<()>;

    /// 메타데이터 한 건을 upsert합니다.
    async fn upsert_metadata(&self, record: &TickerMetadata) -> Result<()>;
}
