//! 종목 단위 처리 결과.

use nse_core::DataKind;
use serde::Serialize;

/// 실패 단계.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum FailureStage {
    /// Provider 조회가 재시도 끝에 실패
    Fetch { attempts: u32 },
    /// 저장소 쓰기 실패 (재시도하지 않음). 그 전까지 쓴 행 수를 함께 기록.
    Sink { rows_written: usize },
}

/// 종목 하나의 처리 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SymbolOutcome {
    /// 저장 완료
    Upserted { rows: usize },
    /// 조회는 성공했지만 데이터 없음
    Empty,
    /// 실패 (다음 종목으로 계속 진행)
    Failed { stage: FailureStage, reason: String },
}

/// 종목 처리 보고.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolReport {
    pub ticker: String,
    pub kind: DataKind,
    pub outcome: SymbolOutcome,
}

impl SymbolReport {
    pub fn new(ticker: impl Into<String>, kind: DataKind, outcome: SymbolOutcome) -> Self {
        Self {
            ticker: ticker.into(),
            kind,
            outcome,
        }
    }

    /// 실패 사유 (실패가 아니면 None).
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            SymbolOutcome::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// 저장된 행 수. 저장소 단계에서 실패했다면 실패 전까지 쓴 행 수.
    pub fn rows_written(&self) -> usize {
        match &self.outcome {
            SymbolOutcome::Upserted { rows } => *rows,
            SymbolOutcome::Failed {
                stage: FailureStage::Sink { rows_written },
                ..
            } => *rows_written,
            _ => 0,
        }
    }
}
