//! 수집 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::modules::{FailureStage, SymbolOutcome, SymbolReport};

/// 수집 작업 통계
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionStats {
    /// 총 시도 횟수
    pub total: usize,
    /// 성공 횟수
    pub success: usize,
    /// 에러 횟수
    pub errors: usize,
    /// 그중 조회 단계 실패
    pub fetch_errors: usize,
    /// 그중 저장 단계 실패
    pub sink_errors: usize,
    /// 빈 데이터 (조회 성공, 데이터 없음)
    pub empty: usize,
    /// 저장된 총 행 수
    pub total_rows: usize,
    /// 실패한 티커 (입력 순서)
    pub failed_tickers: Vec<String>,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 종목 보고 목록으로 통계를 집계합니다.
    pub fn from_reports<'a, I>(reports: I) -> Self
    where
        I: IntoIterator<Item = &'a SymbolReport>,
    {
        let mut stats = Self::new();
        for report in reports {
            stats.record(report);
        }
        stats
    }

    /// 종목 보고 하나를 반영합니다.
    pub fn record(&mut self, report: &SymbolReport) {
        self.total += 1;
        self.total_rows += report.rows_written();

        match &report.outcome {
            SymbolOutcome::Upserted { .. } => self.success += 1,
            SymbolOutcome::Empty => self.empty += 1,
            SymbolOutcome::Failed { stage, .. } => {
                self.errors += 1;
                match stage {
                    FailureStage::Fetch { .. } => self.fetch_errors += 1,
                    FailureStage::Sink { .. } => self.sink_errors += 1,
                }
                self.failed_tickers.push(report.ticker.clone());
            }
        }
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            errors = self.errors,
            fetch_errors = self.fetch_errors,
            sink_errors = self.sink_errors,
            empty = self.empty,
            total_rows = self.total_rows,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );

        if !self.failed_tickers.is_empty() {
            tracing::warn!(
                operation = operation,
                count = self.failed_tickers.len(),
                tickers = %self.failed_tickers.join(","),
                "실패 종목"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nse_core::DataKind;

    #[test]
    fn test_from_reports() {
        let reports = vec![
            SymbolReport::new("AAA", DataKind::Ohlcv, SymbolOutcome::Upserted { rows: 250 }),
            SymbolReport::new("BBB", DataKind::Ohlcv, SymbolOutcome::Empty),
            SymbolReport::new(
                "CCC",
                DataKind::Ohlcv,
                SymbolOutcome::Failed {
                    stage: FailureStage::Fetch { attempts: 3 },
                    reason: "timeout".into(),
                },
            ),
            SymbolReport::new(
                "DDD",
                DataKind::Ohlcv,
                SymbolOutcome::Failed {
                    stage: FailureStage::Sink { rows_written: 100 },
                    reason: "HTTP 500".into(),
                },
            ),
        ];

        let stats = CollectionStats::from_reports(&reports);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.success, 1);
        assert_eq!(stats.empty, 1);
        assert_eq!(stats.errors, 2);
        assert_eq!(stats.fetch_errors, 1);
        assert_eq!(stats.sink_errors, 1);
        assert_eq!(stats.total_rows, 350);
        assert_eq!(stats.failed_tickers, vec!["CCC", "DDD"]);
        assert_eq!(stats.success_rate(), 25.0);
    }

    #[test]
    fn test_success_rate_empty_run() {
        assert_eq!(CollectionStats::new().success_rate(), 0.0);
    }
}
