//! 수집 실행 컨텍스트.
//!
//! 시작 시점에 Provider, 저장소, 실패 로그를 한 번 만들고 모든 종목 작업이
//! 공유합니다. 생성에 실패하면 실행 전체가 중단됩니다.

use std::sync::Arc;

use nse_core::MarketSuffix;
use nse_data::{MarketDataProvider, RecordSink, SupabaseSink, YahooMarketData};
use tracing::{error, info};

use crate::config::{CollectorConfig, PipelineConfig};
use crate::failure_log::FailureLog;
use crate::modules::{BatchPlan, RetryPolicy, SymbolReport};
use crate::Result;

/// 종목 작업이 공유하는 의존성과 설정.
pub struct CollectorContext {
    pub provider: Arc<dyn MarketDataProvider>,
    pub sink: Arc<dyn RecordSink>,
    pub failure_log: Arc<FailureLog>,
    pub suffix: MarketSuffix,
    pub retry: RetryPolicy,
    pub batch: BatchPlan,
    pub upsert_batch_size: usize,
}

impl CollectorContext {
    /// 주입된 Provider/저장소로 컨텍스트를 만듭니다.
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        sink: Arc<dyn RecordSink>,
        failure_log: Arc<FailureLog>,
        pipeline: &PipelineConfig,
    ) -> Self {
        Self {
            provider,
            sink,
            failure_log,
            suffix: pipeline.suffix(),
            retry: pipeline.retry_policy(),
            batch: pipeline.batch_plan(),
            upsert_batch_size: pipeline.upsert_batch_size.max(1),
        }
    }

    /// 설정으로부터 Yahoo Provider와 Supabase 저장소를 연결합니다.
    pub async fn from_config(config: &CollectorConfig) -> Result<Self> {
        let provider = YahooMarketData::with_profile_pool(config.pipeline.batch_size)?;
        let sink = SupabaseSink::new(config.supabase.sink_config(config.source.http_timeout()))?;
        let failure_log = FailureLog::open(&config.logging.failure_log).await?;

        info!(
            provider = provider.name(),
            profile_connectors = provider.profile_pool_size(),
            failure_log = %failure_log.path().display(),
            batch_size = config.pipeline.batch_size,
            retries = config.pipeline.fetch_retries,
            "수집 컨텍스트 준비 완료"
        );

        Ok(Self::new(
            Arc::new(provider),
            Arc::new(sink),
            Arc::new(failure_log),
            &config.pipeline,
        ))
    }

    /// 실패 보고를 실패 로그에 남깁니다. 기록 실패는 실행을 멈추지 않습니다.
    pub(crate) async fn note_failure(&self, report: &SymbolReport) {
        let Some(reason) = report.failure_reason() else {
            return;
        };
        if let Err(e) = self
            .failure_log
            .record(report.kind, &report.ticker, reason)
            .await
        {
            error!(
                ticker = %report.ticker,
                path = %self.failure_log.path().display(),
                error = %e,
                "실패 로그 기록 실패"
            );
        }
    }
}
