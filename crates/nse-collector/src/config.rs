//! 환경변수 기반 설정 모듈.
//!
//! `.env` 파일을 먼저 읽고(`dotenvy`), 필수 값(`SUPABASE_URL`, `SUPABASE_KEY`)이
//! 없으면 시작 단계에서 실패합니다. 나머지 값은 파싱에 실패하면 기본값을 씁니다.

use std::path::PathBuf;
use std::time::Duration;

use nse_core::{MarketSuffix, NSE_SUFFIX};
use nse_data::storage::supabase::{DEFAULT_METADATA_TABLE, DEFAULT_OHLCV_TABLE};
use nse_data::{SupabaseConfig, NSE_EQUITY_LIST_URL};
use secrecy::{ExposeSecret, SecretString};

use crate::error::CollectorError;
use crate::logging::LogFormat;
use crate::modules::{BatchPlan, RetryPolicy};
use crate::Result;

/// Collector 전체 설정
#[derive(Debug)]
pub struct CollectorConfig {
    /// Supabase 저장소 설정
    pub supabase: SupabaseSettings,
    /// 종목 목록 설정
    pub source: SourceConfig,
    /// 배치/재시도 설정
    pub pipeline: PipelineConfig,
    /// 로그 파일 설정
    pub logging: LoggingConfig,
}

/// Supabase 저장소 설정
#[derive(Debug)]
pub struct SupabaseSettings {
    /// 프로젝트 URL
    pub url: String,
    /// API 키
    pub api_key: SecretString,
    /// 가격 봉 테이블
    pub ohlcv_table: String,
    /// 메타데이터 테이블
    pub metadata_table: String,
}

/// 종목 목록 설정
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// CSV 파일 경로 또는 URL
    pub ticker_source: String,
    /// HTTP 요청 타임아웃 (초)
    pub http_timeout_secs: u64,
}

/// 배치/재시도 설정
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 시장 접미사 (기본: `.NS`)
    pub symbol_suffix: String,
    /// 배치당 종목 수 (동시 실행 상한)
    pub batch_size: usize,
    /// 배치 간 대기 (초)
    pub batch_delay_secs: u64,
    /// 종목당 최대 시도 횟수
    pub fetch_retries: u32,
    /// 재시도 기본 대기 (초, 시도 횟수만큼 선형 증가)
    pub retry_delay_secs: u64,
    /// 과거 데이터 upsert 요청당 행 수
    pub upsert_batch_size: usize,
}

/// 로그 파일 설정
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 콘솔 출력 형식
    pub format: LogFormat,
    /// 전체 로그 파일 (None이면 콘솔만)
    pub log_file: Option<PathBuf>,
    /// 실패 로그 파일
    pub failure_log: PathBuf,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 주어진 조회 함수로 설정을 구성합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, "SUPABASE_URL")?;
        let api_key = required(&lookup, "SUPABASE_KEY")?;

        Ok(Self {
            supabase: SupabaseSettings {
                url,
                api_key: SecretString::from(api_key),
                ohlcv_table: env_var_string(&lookup, "OHLCV_TABLE", DEFAULT_OHLCV_TABLE),
                metadata_table: env_var_string(&lookup, "METADATA_TABLE", DEFAULT_METADATA_TABLE),
            },
            source: SourceConfig {
                ticker_source: env_var_string(&lookup, "TICKER_SOURCE", NSE_EQUITY_LIST_URL),
                http_timeout_secs: env_var_parse(&lookup, "HTTP_TIMEOUT_SECS", 30),
            },
            pipeline: PipelineConfig {
                symbol_suffix: env_var_string(&lookup, "SYMBOL_SUFFIX", NSE_SUFFIX),
                batch_size: env_var_parse(&lookup, "BATCH_SIZE", 10),
                batch_delay_secs: env_var_parse(&lookup, "BATCH_DELAY_SECS", 5),
                fetch_retries: env_var_parse(&lookup, "FETCH_RETRIES", 3),
                retry_delay_secs: env_var_parse(&lookup, "RETRY_DELAY_SECS", 2),
                upsert_batch_size: env_var_parse(&lookup, "UPSERT_BATCH_SIZE", 100),
            },
            logging: LoggingConfig::from_lookup(&lookup),
        })
    }
}

impl SupabaseSettings {
    /// 저장소 클라이언트 설정으로 변환
    pub fn sink_config(&self, timeout: Duration) -> SupabaseConfig {
        let mut config = SupabaseConfig::new(
            self.url.clone(),
            SecretString::from(self.api_key.expose_secret().to_string()),
        );
        config.ohlcv_table = self.ohlcv_table.clone();
        config.metadata_table = self.metadata_table.clone();
        config.timeout = timeout;
        config
    }
}

impl SourceConfig {
    /// HTTP 타임아웃을 Duration으로 반환
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            symbol_suffix: NSE_SUFFIX.to_string(),
            batch_size: 10,
            batch_delay_secs: 5,
            fetch_retries: 3,
            retry_delay_secs: 2,
            upsert_batch_size: 100,
        }
    }
}

impl PipelineConfig {
    /// 시장 접미사
    pub fn suffix(&self) -> MarketSuffix {
        MarketSuffix::new(self.symbol_suffix.as_str())
    }

    /// 배치 간 대기를 Duration으로 반환
    pub fn batch_delay(&self) -> Duration {
        Duration::from_secs(self.batch_delay_secs)
    }

    /// 재시도 기본 대기를 Duration으로 반환
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    /// 배치 실행 계획
    pub fn batch_plan(&self) -> BatchPlan {
        BatchPlan::new(self.batch_size, self.batch_delay())
    }

    /// 재시도 정책
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.fetch_retries, self.retry_delay())
    }
}

impl LoggingConfig {
    /// 환경변수에서 로그 설정 로드 (설정 전체보다 먼저 필요)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_file = match lookup("LOG_FILE") {
            Some(path) if path.trim().is_empty() => None,
            Some(path) => Some(PathBuf::from(path.trim())),
            None => Some(PathBuf::from("logs/collector.log")),
        };

        Self {
            format: env_var_parse(&lookup, "LOG_FORMAT", LogFormat::Pretty),
            log_file,
            failure_log: PathBuf::from(env_var_string(&lookup, "FAILURE_LOG", "logs/failures.log")),
        }
    }
}

/// 필수 환경변수 (없거나 비어 있으면 설정 에러)
fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CollectorError::Config(format!("{} 환경변수가 설정되지 않았습니다", key)))
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// 환경변수 문자열 (비어 있으면 기본값)
fn env_var_string<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
