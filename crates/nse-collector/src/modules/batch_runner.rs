//! 배치 실행기.
//!
//! 작업 목록을 `batch_size`개씩 연속된 배치로 나눕니다. 배치 안에서는 최대
//! `batch_size`개를 동시에 실행하고, 배치가 모두 끝나야 다음 배치로 넘어갑니다.
//! 배치 사이에는 `batch_delay`만큼 쉬며, 마지막 배치 뒤에는 쉬지 않습니다.

use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

/// 배치 실행 계획.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    /// 배치 크기 및 배치 내 동시 실행 상한 (최소 1)
    pub batch_size: usize,
    /// 배치 사이 대기
    pub batch_delay: Duration,
}

impl BatchPlan {
    /// 새 계획. `batch_size`가 0이면 1로 올립니다.
    pub fn new(batch_size: usize, batch_delay: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }

    /// `total`개 작업의 배치 수.
    pub fn batch_count(&self, total: usize) -> usize {
        total.div_ceil(self.batch_size.max(1))
    }

    /// 작업 목록을 배치로 나눕니다.
    pub fn partition<'a, T>(&self, items: &'a [T]) -> std::slice::Chunks<'a, T> {
        items.chunks(self.batch_size.max(1))
    }
}

/// 모든 작업을 배치 단위로 실행하고 결과를 입력 순서대로 반환합니다.
pub async fn run_batches<'a, T, R, F, Fut>(items: &'a [T], plan: &BatchPlan, mut unit: F) -> Vec<R>
where
    F: FnMut(&'a T) -> Fut,
    Fut: Future<Output = R>,
{
    let total_batches = plan.batch_count(items.len());
    let mut results = Vec::with_capacity(items.len());

    for (batch_idx, batch) in plan.partition(items).enumerate() {
        info!(
            batch = format!("{}/{}", batch_idx + 1, total_batches),
            size = batch.len(),
            "배치 시작"
        );

        let mut batch_results: Vec<(usize, R)> = stream::iter(batch.iter().enumerate())
            .map(|(idx, item)| {
                let fut = unit(item);
                async move { (idx, fut.await) }
            })
            .buffer_unordered(plan.batch_size)
            .collect()
            .await;

        batch_results.sort_by_key(|(idx, _)| *idx);
        results.extend(batch_results.into_iter().map(|(_, r)| r));

        if batch_idx + 1 < total_batches && !plan.batch_delay.is_zero() {
            debug!(
                delay_secs = plan.batch_delay.as_secs_f64(),
                "다음 배치까지 대기"
            );
            tokio::time::sleep(plan.batch_delay).await;
        }
    }

    results
}
