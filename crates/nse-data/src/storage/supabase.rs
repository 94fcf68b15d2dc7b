//! Supabase(PostgREST) 테이블 저장소.
//!
//! `POST {base_url}/rest/v1/{table}?on_conflict={keys}` 요청에
//! `Prefer: resolution=merge-duplicates`를 붙여 upsert합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use nse_data::{RecordSink, SupabaseConfig, SupabaseSink};
//!
//! let sink = SupabaseSink::new(SupabaseConfig::new(url, key))?;
//! sink.upsert_price_bars(&bars).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use nse_core::{PriceBar, TickerMetadata};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, instrument};

use super::RecordSink;
use crate::error::{DataError, Result};

/// 가격 봉 테이블 기본 이름.
pub const DEFAULT_OHLCV_TABLE: &str = "stock_ohlcv";
/// 메타데이터 테이블 기본 이름.
pub const DEFAULT_METADATA_TABLE: &str = "stock_metadata";

const OHLCV_CONFLICT_KEYS: &str = "ticker,date";
const METADATA_CONFLICT_KEYS: &str = "ticker";
const UPSERT_PREFER: &str = "resolution=merge-duplicates,return=minimal";

/// Supabase 연결 설정.
#[derive(Debug)]
pub struct SupabaseConfig {
    /// 프로젝트 URL (예: `https://xyz.supabase.co`)
    pub base_url: String,
    /// API 키 (service role 또는 anon)
    pub api_key: SecretString,
    /// 가격 봉 테이블
    pub ohlcv_table: String,
    /// 메타데이터 테이블
    pub metadata_table: String,
    /// 요청 타임아웃
    pub timeout: Duration,
}

impl SupabaseConfig {
    /// 기본 테이블 이름과 30초 타임아웃으로 설정을 생성합니다.
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            ohlcv_table: DEFAULT_OHLCV_TABLE.to_string(),
            metadata_table: DEFAULT_METADATA_TABLE.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Supabase REST upsert 클라이언트.
///
/// 내부 `reqwest::Client`는 커넥션 풀을 공유하므로 동시 사용해도 안전합니다.
pub struct SupabaseSink {
    client: reqwest::Client,
    rest_url: String,
    api_key: SecretString,
    ohlcv_table: String,
    metadata_table: String,
}

impl SupabaseSink {
    /// 새 클라이언트 생성.
    pub fn new(config: SupabaseConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(DataError::ConfigError("Supabase URL이 비어 있습니다".to_string()));
        }
        if config.api_key.expose_secret().is_empty() {
            return Err(DataError::ConfigError("Supabase API 키가 비어 있습니다".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DataError::ConnectionError(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", config.base_url.trim().trim_end_matches('/')),
            api_key: config.api_key,
            ohlcv_table: config.ohlcv_table,
            metadata_table: config.metadata_table,
        })
    }

    /// 테이블에 JSON 본문을 upsert합니다.
    async fn upsert<T>(&self, table: &str, on_conflict: &str, body: &T) -> Result<()>
    where
        T: Serialize + ?Sized + Sync,
    {
        let url = format!("{}/{}", self.rest_url, table);
        let key = self.api_key.expose_secret();

        let response = self
            .client
            .post(&url)
            .query(&[("on_conflict", on_conflict)])
            .header("apikey", key)
            .bearer_auth(key)
            .header("Prefer", UPSERT_PREFER)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::SinkError {
                status: status.as_u16(),
                body,
            });
        }

        debug!(table = table, status = status.as_u16(), "upsert 완료");
        Ok(())
    }
}

#[async_trait]
impl RecordSink for SupabaseSink {
    #[instrument(skip(self, bars), fields(table = %self.ohlcv_table, count = bars.len()))]
    async fn upsert_price_bars(&self, bars: &[PriceBar]) -> Result<()> {
        if bars.is_empty() {
            return Ok(());
        }
        self.upsert(&self.ohlcv_table, OHLCV_CONFLICT_KEYS, bars)
            .await
    }

    #[instrument(skip(self, record), fields(table = %self.metadata_table, ticker = %record.ticker))]
    async fn upsert_metadata(&self, record: &TickerMetadata) -> Result<()> {
        self.upsert(&self.metadata_table, METADATA_CONFLICT_KEYS, record)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mockito::Matcher;
    use serde_json::json;

    fn sink_for(server: &mockito::ServerGuard) -> SupabaseSink {
        let config = SupabaseConfig::new(
            format!("{}/", server.url()),
            SecretString::from("test-key".to_string()),
        );
        SupabaseSink::new(config).unwrap()
    }

    fn bar(ticker: &str, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            ticker: ticker.to_string(),
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close,
            volume: 5_000,
        }
    }

    #[tokio::test]
    async fn test_upsert_price_bars_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/stock_ohlcv")
            .match_query(Matcher::UrlEncoded(
                "on_conflict".into(),
                "ticker,date".into(),
            ))
            .match_header("apikey", "test-key")
            .match_header("authorization", "Bearer test-key")
            .match_header("prefer", UPSERT_PREFER)
            .match_body(Matcher::Json(json!([{
                "date": "2024-05-10",
                "ticker": "AAA",
                "open": 100.0,
                "high": 101.0,
                "low": 99.0,
                "close": 100.5,
                "volume": 5000
            }])))
            .with_status(201)
            .create_async()
            .await;

        sink_for(&server)
            .upsert_price_bars(&[bar("AAA", 100.5)])
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upsert_metadata_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/stock_metadata")
            .match_query(Matcher::UrlEncoded("on_conflict".into(), "ticker".into()))
            .match_body(Matcher::Json(json!({
                "ticker": "AAA",
                "sector": "Unknown",
                "industry": "Unknown",
                "shares_outstanding": 0
            })))
            .with_status(201)
            .create_async()
            .await;

        let record = TickerMetadata::from_profile("AAA", Default::default());
        sink_for(&server).upsert_metadata(&record).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejected_write_returns_sink_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/rest/v1/stock_ohlcv")
            .match_query(Matcher::Any)
            .with_status(409)
            .with_body(r#"{"code":"23505","message":"duplicate key"}"#)
            .create_async()
            .await;

        let err = sink_for(&server)
            .upsert_price_bars(&[bar("AAA", 1.0)])
            .await
            .unwrap_err();

        match err {
            DataError::SinkError { status, body } => {
                assert_eq!(status, 409);
                assert!(body.contains("duplicate key"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_batch_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        sink_for(&server).upsert_price_bars(&[]).await.unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn test_new_rejects_empty_key() {
        let config = SupabaseConfig::new(
            "https://example.supabase.co",
            SecretString::from(String::new()),
        );
        assert!(matches!(
            SupabaseSink::new(config),
            Err(DataError::ConfigError(_))
        ));
    }
}
