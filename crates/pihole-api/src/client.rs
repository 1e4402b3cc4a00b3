// Pi-hole API client
//
// Owns the base URL, the retrying transport and the session. Every
// resource module (groups, domains, config, ...) is implemented as
// inherent methods in its own file on top of the `request` primitive
// defined here.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::HeaderValue;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::session::Session;
use crate::transport::{
    DEFAULT_TIMEOUT, RetryPolicy, Transport, TransportConfig, preview,
};

// ── Client configuration ─────────────────────────────────────────────

/// Connection settings for a [`PiholeClient`].
///
/// Everything except `url` is optional; unset durations and retry counts
/// fall back to the crate defaults.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub url: Option<String>,
    pub password: Option<SecretString>,
    pub tls_insecure_skip_verify: bool,
    pub timeout: Option<Duration>,
    pub retry_max: Option<i32>,
    pub retry_wait_min: Option<Duration>,
    pub retry_wait_max: Option<Duration>,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    #[must_use]
    pub fn with_insecure_tls(mut self, insecure: bool) -> Self {
        self.tls_insecure_skip_verify = insecure;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry_max: i32, wait_min: Duration, wait_max: Duration) -> Self {
        self.retry_max = Some(retry_max);
        self.retry_wait_min = Some(wait_min);
        self.retry_wait_max = Some(wait_max);
        self
    }

    fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            accept_invalid_certs: self.tls_insecure_skip_verify,
            retry: RetryPolicy::from_settings(
                self.retry_max,
                self.retry_wait_min,
                self.retry_wait_max,
            ),
        }
    }
}

// ── Error envelope ───────────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    key: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    hint: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Pi-hole v6 REST API.
///
/// Cheap to share behind an `Arc`: the only mutable state is the session,
/// which sits behind an async read/write lock.
pub struct PiholeClient {
    base_url: Url,
    transport: Transport,
    password: Option<SecretString>,
    session: Session,
}

impl fmt::Debug for PiholeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PiholeClient")
            .field("base_url", &self.base_url.as_str())
            .field("retry", self.transport.retry_policy())
            .field("has_password", &self.password.is_some())
            .finish_non_exhaustive()
    }
}

impl PiholeClient {
    /// Validate the configuration and build a client. No network I/O
    /// happens until the first request.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let raw = config
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(Error::MissingUrl)?;
        let base_url = Self::normalize_base_url(raw)?;
        let transport = config.transport_config().build()?;
        let password = config
            .password
            .filter(|p| !p.expose_secret().is_empty());

        debug!(base_url = %base_url, "pi-hole client configured");

        Ok(Self {
            base_url,
            transport,
            password,
            session: Session::default(),
        })
    }

    /// Resolve the API root from a user-supplied URL.
    ///
    /// `https://pi.hole` and `https://pi.hole/` become `https://pi.hole/api/`;
    /// `https://host/admin` becomes `https://host/admin/api/`; a path that
    /// already ends in `/api` or `/` is kept. The result always ends in `/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Validation(format!(
                "unsupported URL scheme {:?}, expected http or https",
                url.scheme()
            )));
        }

        let path = url.path().to_owned();
        let normalized = if path.is_empty() || path == "/" {
            "/api/".to_owned()
        } else if path.ends_with("/api") {
            format!("{path}/")
        } else if path.ends_with('/') {
            path
        } else {
            format!("{path}/api/")
        };
        url.set_path(&normalized);
        url.set_query(None);
        url.set_fragment(None);

        Ok(url)
    }

    /// The normalized API root, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }

    pub(crate) fn password(&self) -> Option<&SecretString> {
        self.password.as_ref()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join an API-relative path, which may carry a `?query`, onto the base.
    ///
    /// A segment that URL resolution would collapse (`.`, `..` or their
    /// percent-encoded forms) is refused, since the request would land on
    /// a different resource.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path, None),
        };
        if let Some(segment) = path.split('/').find(|s| is_dot_segment(s)) {
            return Err(Error::Validation(format!(
                "{segment:?} cannot be used as a path segment"
            )));
        }
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        url.set_query(query.filter(|q| !q.is_empty()));
        Ok(url)
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Make sure a fresh session exists, logging in if needed.
    ///
    /// Concurrent and repeated calls share a single login while the
    /// current token is fresh.
    pub async fn authenticate(&self) -> Result<(), Error> {
        self.ensure_session().await.map(|_| ())
    }

    async fn ensure_session(&self) -> Result<SecretString, Error> {
        if let Some(sid) = self.session.fresh_sid().await {
            return Ok(sid);
        }
        self.session.renew_with(|| self.login()).await
    }

    // ── Request primitive ────────────────────────────────────────────

    /// Send an authenticated request and return the raw success body.
    ///
    /// `path` is relative to the API root and may include a query string.
    /// Non-success statuses are decoded into [`Error::Api`] when the body
    /// carries an error envelope, [`Error::Status`] otherwise. A 401 drops
    /// the session so the next call logs in again.
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Bytes, Error> {
        let url = self.url(path)?;
        let sid = self.ensure_session().await?;
        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(Error::Serialization)?
            .map(Bytes::from);
        let sid_header = sid_header(&sid)?;

        let resp = self
            .transport
            .execute(&method, &url, sid_header.as_ref(), body.as_ref())
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if status.is_success() {
            return Ok(bytes);
        }

        if status == StatusCode::UNAUTHORIZED {
            self.session.invalidate(&sid).await;
        }
        Err(parse_error(status, &bytes))
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let bytes = self.request::<()>(Method::GET, path, None).await?;
        decode(&bytes)
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let bytes = self.request(Method::POST, path, Some(body)).await?;
        decode(&bytes)
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let bytes = self.request(Method::PUT, path, Some(body)).await?;
        decode(&bytes)
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let bytes = self.request(Method::PATCH, path, Some(body)).await?;
        decode(&bytes)
    }

    /// PUT with no request body; the response body is ignored.
    pub(crate) async fn put_empty(&self, path: &str) -> Result<(), Error> {
        self.request::<()>(Method::PUT, path, None).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        self.request::<()>(Method::DELETE, path, None).await?;
        Ok(())
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        "." | ".." | "%2e" | ".%2e" | "%2e." | "%2e%2e"
    )
}

fn sid_header(sid: &SecretString) -> Result<Option<HeaderValue>, Error> {
    let raw = sid.expose_secret();
    if raw.is_empty() {
        return Ok(None);
    }
    let mut value = HeaderValue::from_str(raw).map_err(|e| Error::Authentication {
        message: format!("invalid session id header value: {e}"),
    })?;
    value.set_sensitive(true);
    Ok(Some(value))
}

fn parse_error(status: StatusCode, body: &[u8]) -> Error {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        let ErrorBody { key, message, hint } = envelope.error;
        return Error::Api {
            status: status.as_u16(),
            key,
            message,
            hint: hint.filter(|h| !h.is_empty()),
        };
    }
    Error::Status {
        status: status.as_u16(),
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(bytes).map_err(|e| {
        let body = String::from_utf8_lossy(bytes).into_owned();
        Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body, 200)),
            body,
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn normalized(raw: &str) -> String {
        PiholeClient::normalize_base_url(raw).unwrap().to_string()
    }

    #[test]
    fn bare_host_gets_api_root() {
        assert_eq!(normalized("http://pi.hole"), "http://pi.hole/api/");
        assert_eq!(normalized("http://pi.hole/"), "http://pi.hole/api/");
        assert_eq!(normalized("https://10.0.0.2:8443"), "https://10.0.0.2:8443/api/");
    }

    #[test]
    fn sub_path_gets_api_appended() {
        assert_eq!(normalized("http://host/admin"), "http://host/admin/api/");
    }

    #[test]
    fn existing_api_root_is_kept() {
        assert_eq!(normalized("http://host/api"), "http://host/api/");
        assert_eq!(normalized("http://host/api/"), "http://host/api/");
        assert_eq!(normalized("http://host/custom/"), "http://host/custom/");
    }

    #[test]
    fn non_http_scheme_rejected() {
        let err = PiholeClient::normalize_base_url("ftp://host").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn missing_url_rejected() {
        let err = PiholeClient::new(ClientConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MissingUrl));

        let err = PiholeClient::new(ClientConfig::new("   ")).unwrap_err();
        assert!(matches!(err, Error::MissingUrl));
    }

    #[test]
    fn unparseable_url_rejected() {
        let err = PiholeClient::new(ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn url_splits_query() {
        let client = PiholeClient::new(ClientConfig::new("http://pi.hole")).unwrap();
        let url = client.url("lists/https%3A%2F%2Fx?type=block").unwrap();
        assert_eq!(url.path(), "/api/lists/https%3A%2F%2Fx");
        assert_eq!(url.query(), Some("type=block"));

        let url = client.url("groups").unwrap();
        assert_eq!(url.as_str(), "http://pi.hole/api/groups");
    }

    #[test]
    fn dot_segments_rejected() {
        let client = PiholeClient::new(ClientConfig::new("http://pi.hole")).unwrap();
        for path in ["domains/deny/exact/..", "config/dns/upstreams/.", "groups/%2E%2e"] {
            let err = client.url(path).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{path}");
        }
        assert!(client.url("domains/deny/exact/..example.com").is_ok());
    }

    #[test]
    fn empty_password_treated_as_none() {
        let client =
            PiholeClient::new(ClientConfig::new("http://pi.hole").with_password("")).unwrap();
        assert!(client.password().is_none());
    }

    #[test]
    fn error_envelope_becomes_api_error() {
        let body = br#"{"error":{"key":"bad_request","message":"Invalid","hint":null},"took":0.1}"#;
        let err = parse_error(StatusCode::BAD_REQUEST, body);
        assert!(matches!(
            err,
            Error::Api { status: 400, ref key, hint: None, .. } if key == "bad_request"
        ));
    }

    #[test]
    fn plain_body_becomes_status_error() {
        let err = parse_error(StatusCode::BAD_GATEWAY, b"upstream down");
        assert_eq!(
            err.to_string(),
            "API request failed with status 502: upstream down"
        );
    }

    #[test]
    fn decode_failure_keeps_body() {
        let err = decode::<Vec<u32>>(b"{oops").unwrap_err();
        assert!(matches!(err, Error::Deserialization { ref body, .. } if body == "{oops"));
    }
}
