//! 실패 로그.
//!
//! 최종 실패한 종목을 한 줄씩 덧붙입니다: `<DataKind>: <ticker> - <reason>`.
//! 다음 실행에서 실패 종목만 다시 돌릴 때 `--symbols`에 넘길 목록의 원본입니다.

use std::path::{Path, PathBuf};

use nse_core::DataKind;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// 덧붙이기 전용 실패 로그 파일.
#[derive(Debug)]
pub struct FailureLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FailureLog {
    /// 파일을 열거나 생성합니다. 상위 디렉터리가 없으면 만듭니다.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// 파일 경로.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 실패 한 건을 기록합니다.
    pub async fn record(&self, kind: DataKind, ticker: &str, reason: &str) -> std::io::Result<()> {
        let line = format_line(kind, ticker, reason);
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}

/// 개행이 섞인 사유는 한 줄로 접습니다.
fn format_line(kind: DataKind, ticker: &str, reason: &str) -> String {
    let reason = reason.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("{}: {} - {}\n", kind, ticker, reason)
}
