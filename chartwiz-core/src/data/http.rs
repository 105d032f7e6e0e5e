//! HTTP client for the report backend.
//!
//! One blocking `reqwest` client serves the indicator query, the
//! per-indicator config endpoint and block updates. Every call goes through
//! the shared circuit breaker and retries transient failures (connect,
//! timeout, 429, 5xx) with exponential backoff plus random jitter.

use rand::Rng;
use reqwest::blocking::{RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::circuit_breaker::CircuitBreaker;
use super::provider::{
    IndicatorConfigRecord, IndicatorConfigStore, IndicatorPage, IndicatorSource, PageRequest,
    ReportBlocks, SourceError,
};
use super::wire;
use crate::domain::{Category, ChartPosition, DateWindow};

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".into(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            base_delay: Duration::from_millis(250),
        }
    }
}

/// Config endpoint responses come either bare or wrapped in `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConfigBody {
    Wrapped { data: Option<IndicatorConfigRecord> },
    Bare(IndicatorConfigRecord),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BlockChartConfig<'a> {
    position: ChartPosition,
    config: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BlockContent<'a> {
    chart_config: BlockChartConfig<'a>,
}

#[derive(Debug, Serialize)]
struct BlockUpdate<'a> {
    content: BlockContent<'a>,
}

pub struct HttpBackend {
    client: reqwest::blocking::Client,
    base_url: Url,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
}

impl HttpBackend {
    pub fn new(config: &HttpConfig, circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("chartwiz/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SourceError::Other(format!("failed to build HTTP client: {e}")))?;
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| SourceError::Other(format!("invalid base url '{}': {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::Other(format!(
                "base url '{}' cannot carry a path",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            circuit_breaker,
            max_retries: config.max_retries,
            base_delay: config.base_delay,
        })
    }

    pub fn circuit_breaker(&self) -> &Arc<CircuitBreaker> {
        &self.circuit_breaker
    }

    /// Base URL with the given path segments appended (each one escaped).
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn breaker_open(&self) -> SourceError {
        SourceError::CircuitBreakerOpen {
            remaining_secs: self.circuit_breaker.remaining_cooldown().as_secs(),
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let exp = self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1));
        let jitter_cap = u64::try_from(self.base_delay.as_millis() / 2).unwrap_or(0);
        let jitter = if jitter_cap > 0 {
            rand::thread_rng().gen_range(0..=jitter_cap)
        } else {
            0
        };
        exp + Duration::from_millis(jitter)
    }

    /// Execute a request with retry and circuit breaker logic. `build` is
    /// called once per attempt. 404 is returned as `NotFound` without
    /// counting against the breaker.
    fn send_with_retry<F>(&self, context: &str, build: F) -> Result<Response, SourceError>
    where
        F: Fn() -> RequestBuilder,
    {
        if !self.circuit_breaker.is_allowed() {
            return Err(self.breaker_open());
        }

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.backoff(attempt);
                debug!(context, attempt, delay_ms = delay.as_millis() as u64, "retrying request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(self.breaker_open());
            }

            match build().send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == StatusCode::FORBIDDEN {
                        self.circuit_breaker.trip();
                        return Err(self.breaker_open());
                    }

                    if status == StatusCode::NOT_FOUND {
                        return Err(SourceError::NotFound(context.to_string()));
                    }

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        self.circuit_breaker.record_failure();
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(SourceError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if status.is_server_error() {
                        self.circuit_breaker.record_failure();
                        last_error = Some(SourceError::HttpStatus {
                            status: status.as_u16(),
                            context: context.to_string(),
                        });
                        continue;
                    }

                    if !status.is_success() {
                        self.circuit_breaker.record_failure();
                        return Err(SourceError::HttpStatus {
                            status: status.as_u16(),
                            context: context.to_string(),
                        });
                    }

                    self.circuit_breaker.record_success();
                    return Ok(resp);
                }
                Err(e) => {
                    self.circuit_breaker.record_failure();
                    if e.is_timeout() {
                        last_error = Some(SourceError::Timeout(format!("{context}: {e}")));
                        continue;
                    }
                    if e.is_connect() {
                        last_error = Some(SourceError::NetworkUnreachable(format!("{context}: {e}")));
                        continue;
                    }
                    return Err(SourceError::NetworkUnreachable(format!("{context}: {e}")));
                }
            }
        }

        let err = last_error.unwrap_or_else(|| SourceError::Other("max retries exceeded".into()));
        warn!(context, error = %err, "request failed after retries");
        Err(err)
    }

    fn read_body(resp: Response, context: &str) -> Result<String, SourceError> {
        resp.text()
            .map_err(|e| SourceError::ResponseFormatChanged(format!("{context}: unreadable body: {e}")))
    }
}

impl IndicatorSource for HttpBackend {
    fn name(&self) -> &str {
        "report_backend"
    }

    fn fetch_page(
        &self,
        category: Category,
        window: &DateWindow,
        page: &PageRequest,
    ) -> Result<IndicatorPage, SourceError> {
        let category_id = category.backend_id().to_string();
        let url = self.endpoint(&["reports", "categories", &category_id, "indicators"]);
        let mut query = vec![
            ("dateRangeStart", window.start_param()),
            ("dateRangeEnd", window.end_param()),
            ("limit", page.limit.to_string()),
            ("offset", page.offset.to_string()),
        ];
        if let Some(report_type) = page.report_type_id {
            query.push(("reportTypeId", report_type.to_string()));
        }
        let context = format!("indicators for {category}");

        let resp = self.send_with_retry(&context, || self.client.get(url.clone()).query(&query))?;
        let body = Self::read_body(resp, &context)?;
        wire::parse_page(&body, page)
    }
}

impl IndicatorConfigStore for HttpBackend {
    fn get(
        &self,
        indicator_id: &str,
        block_id: Option<&str>,
    ) -> Result<Option<IndicatorConfigRecord>, SourceError> {
        let url = self.endpoint(&["reports", "indicators", indicator_id, "config"]);
        let context = format!("config for {indicator_id}");
        let resp = match self.send_with_retry(&context, || {
            let req = self.client.get(url.clone());
            match block_id {
                Some(b) => req.query(&[("blockId", b)]),
                None => req,
            }
        }) {
            Ok(resp) => resp,
            Err(SourceError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        let body = Self::read_body(resp, &context)?;
        let parsed: ConfigBody = serde_json::from_str(&body)
            .map_err(|e| SourceError::ResponseFormatChanged(format!("{context}: {e}")))?;
        Ok(match parsed {
            ConfigBody::Wrapped { data } => data,
            ConfigBody::Bare(record) => Some(record),
        })
    }

    fn put(
        &self,
        indicator_id: &str,
        record: &IndicatorConfigRecord,
        block_id: Option<&str>,
    ) -> Result<(), SourceError> {
        let url = self.endpoint(&["reports", "indicators", indicator_id, "config"]);
        let context = format!("save config for {indicator_id}");
        self.send_with_retry(&context, || {
            let req = self.client.put(url.clone()).json(record);
            match block_id {
                Some(b) => req.query(&[("blockId", b)]),
                None => req,
            }
        })?;
        Ok(())
    }
}

impl ReportBlocks for HttpBackend {
    fn update_chart_config(
        &self,
        block_id: &str,
        position: ChartPosition,
        customization_json: &str,
    ) -> Result<(), SourceError> {
        let url = self.endpoint(&["blocks", block_id]);
        let body = BlockUpdate {
            content: BlockContent {
                chart_config: BlockChartConfig {
                    position,
                    config: customization_json,
                },
            },
        };
        let context = format!("update block {block_id}");
        self.send_with_retry(&context, || self.client.put(url.clone()).json(&body))?;
        Ok(())
    }
}
