// HTTP transport: reqwest client construction and the retry loop.
//
// Every request the client makes goes through `Transport::execute`, which
// rebuilds the request per attempt and retries transient failures
// (connection errors, timeouts, 429, 5xx except 501) with capped
// exponential backoff. TLS handshake failures are permanent and surface
// on the first attempt.

use std::error::Error as _;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderValue, RETRY_AFTER};
use reqwest::{Method, Response, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_RETRY_MAX: u32 = 3;
pub const DEFAULT_RETRY_WAIT_MIN: Duration = Duration::from_secs(2);
pub const DEFAULT_RETRY_WAIT_MAX: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("pihole-rs/", env!("CARGO_PKG_VERSION"));
const SID_HEADER: &str = "sid";

// ── Retry policy ─────────────────────────────────────────────────────

/// How many times, and how patiently, transient failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub wait_min: Duration,
    pub wait_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_RETRY_MAX,
            wait_min: DEFAULT_RETRY_WAIT_MIN,
            wait_max: DEFAULT_RETRY_WAIT_MAX,
        }
    }
}

impl RetryPolicy {
    /// Build a policy from optional user settings.
    ///
    /// `None` picks the default; a negative `retry_max` disables retries.
    /// `wait_max` is raised to `wait_min` if configured below it.
    pub fn from_settings(
        retry_max: Option<i32>,
        wait_min: Option<Duration>,
        wait_max: Option<Duration>,
    ) -> Self {
        let max_retries = retry_max.map_or(DEFAULT_RETRY_MAX, |n| u32::try_from(n).unwrap_or(0));
        let wait_min = wait_min.unwrap_or(DEFAULT_RETRY_WAIT_MIN);
        let wait_max = wait_max.unwrap_or(DEFAULT_RETRY_WAIT_MAX).max(wait_min);
        Self {
            max_retries,
            wait_min,
            wait_max,
        }
    }

    /// Total attempts, counting the first one.
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (0-based).
    ///
    /// A server-provided `Retry-After` wins over the exponential schedule,
    /// but neither ever exceeds `wait_max`.
    pub fn backoff(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(hint) = retry_after {
            return hint.min(self.wait_max);
        }
        let factor = 1_u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.wait_min.saturating_mul(factor).min(self.wait_max)
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
}

/// Timeouts and connection failures are retried; a failed TLS handshake
/// (bad certificate, plain HTTP on an HTTPS port) is not.
pub(crate) fn is_retryable_error(err: &reqwest::Error) -> bool {
    (err.is_timeout() || err.is_connect()) && !is_tls_failure(err)
}

/// The TLS layer reports handshake and certificate errors as
/// `io::ErrorKind::InvalidData` somewhere down the source chain.
fn is_tls_failure(err: &reqwest::Error) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if cause
            .downcast_ref::<std::io::Error>()
            .is_some_and(|io| io.kind() == std::io::ErrorKind::InvalidData)
        {
            return true;
        }
        source = cause.source();
    }
    false
}

fn retry_after(resp: &Response) -> Option<Duration> {
    if !matches!(
        resp.status(),
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
    ) {
        return None;
    }
    resp.headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// First `max` characters of `body`, cut on a char boundary.
pub(crate) fn preview(body: &str, max: usize) -> &str {
    match body.char_indices().nth(max) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

// ── Transport config ─────────────────────────────────────────────────

/// Settings needed to build a [`Transport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
    pub retry: RetryPolicy,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
            retry: RetryPolicy::default(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }

    pub(crate) fn build(&self) -> Result<Transport, Error> {
        Ok(Transport {
            http: self.build_client()?,
            retry: self.retry,
        })
    }
}

// ── Transport ────────────────────────────────────────────────────────

pub(crate) struct Transport {
    http: reqwest::Client,
    retry: RetryPolicy,
}

impl Transport {
    pub(crate) fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Send a request, retrying transient failures.
    ///
    /// Returns the first response that is not retryable, whatever its
    /// status. Dropping the future cancels both in-flight I/O and any
    /// pending backoff sleep.
    pub(crate) async fn execute(
        &self,
        method: &Method,
        url: &Url,
        sid: Option<&HeaderValue>,
        body: Option<&Bytes>,
    ) -> Result<Response, Error> {
        let attempts = self.retry.attempts();
        let mut last = String::new();

        for attempt in 0..attempts {
            let mut req = self.http.request(method.clone(), url.clone());
            if let Some(sid) = sid {
                req = req.header(SID_HEADER, sid.clone());
            }
            if let Some(body) = body {
                req = req
                    .header(CONTENT_TYPE, "application/json")
                    .body(body.clone());
            }

            debug!(%method, %url, attempt = attempt + 1, "sending request");

            let hint = match req.send().await {
                Ok(resp) if is_retryable_status(resp.status()) => {
                    let status = resp.status();
                    let hint = retry_after(&resp);
                    let text = resp.text().await.unwrap_or_default();
                    last = format!("HTTP {status}: {}", preview(&text, 200));
                    hint
                }
                Ok(resp) => return Ok(resp),
                Err(e) if is_retryable_error(&e) => {
                    last = e.to_string();
                    None
                }
                Err(e) => return Err(Error::Transport(e)),
            };

            if attempt + 1 < attempts {
                let delay = self.retry.backoff(attempt, hint);
                warn!(
                    %method,
                    %url,
                    attempt = attempt + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %last,
                    "transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(Error::RetriesExhausted {
            method: method.to_string(),
            url: url.to_string(),
            attempts,
            last,
        })
    }
}
