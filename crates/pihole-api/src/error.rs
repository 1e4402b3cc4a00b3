use std::fmt;

use thiserror::Error;

/// Top-level error type for the `pihole-api` crate.
///
/// Covers every failure mode of the client: construction, authentication,
/// transport, remote rejections, payload decoding, and local invariant
/// violations. Operation-level context is attached with [`Error::Context`];
/// use [`Error::root`] to classify the underlying cause.
#[derive(Debug, Error)]
pub enum Error {
    // ── Construction ────────────────────────────────────────────────
    /// No base URL was configured.
    #[error("Pi-hole URL is required")]
    MissingUrl,

    /// The base URL (or a URL derived from it) could not be parsed.
    #[error("Invalid Pi-hole URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Authentication ──────────────────────────────────────────────
    /// The appliance requires a password but none was configured.
    #[error("Authentication required but no password provided")]
    AuthenticationRequired,

    /// The appliance rejected the credential or returned an unusable session.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// Non-retryable HTTP transport error.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Transient failures persisted through every allowed attempt.
    #[error("{method} {url} giving up after {attempts} attempt(s): {last}")]
    RetriesExhausted {
        method: String,
        url: String,
        attempts: u32,
        last: String,
    },

    // ── Remote application errors ───────────────────────────────────
    /// Structured error envelope returned by the API (`{"error": {...}}`).
    #[error("API error [{key}]: {message}{}", hint_suffix(.hint.as_deref()))]
    Api {
        status: u16,
        key: String,
        message: String,
        hint: Option<String>,
    },

    /// Non-success status without a decodable error envelope.
    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A request body could not be encoded.
    #[error("Failed to encode request body: {0}")]
    Serialization(serde_json::Error),

    // ── Local invariants ────────────────────────────────────────────
    /// Input rejected before any request was made.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A successful create/update echoed no record.
    #[error("no {entity} returned in response")]
    EmptyResponse { entity: &'static str },

    /// An entity that had to exist could not be located.
    #[error("{entity} not found: {identity}")]
    NotFound {
        entity: &'static str,
        identity: String,
    },

    // ── Context ─────────────────────────────────────────────────────
    /// Wraps another error with the operation and target it came from.
    #[error("{operation} {target}: {source}")]
    Context {
        operation: &'static str,
        target: String,
        #[source]
        source: Box<Error>,
    },
}

fn hint_suffix(hint: Option<&str>) -> String {
    hint.map(|h| format!(" (hint: {h})")).unwrap_or_default()
}

impl Error {
    /// Attach operation context, e.g. `("update group", "\"family\"")`.
    pub fn context(self, operation: &'static str, target: impl Into<String>) -> Self {
        Self::Context {
            operation,
            target: target.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all [`Error::Context`] layers stripped.
    pub fn root(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns `true` if the remote was unreachable or kept failing
    /// transiently (as opposed to rejecting the request).
    pub fn is_transient(&self) -> bool {
        match self.root() {
            Self::Transport(e) => crate::transport::is_retryable_error(e),
            Self::RetriesExhausted { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" condition, local or remote.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.root(),
            Self::NotFound { .. }
                | Self::Api { status: 404, .. }
                | Self::Status { status: 404, .. }
        )
    }

    /// Returns `true` if this error indicates the session or credential
    /// is unusable and re-authentication is needed.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self.root(),
            Self::AuthenticationRequired
                | Self::Authentication { .. }
                | Self::Api { status: 401, .. }
                | Self::Status { status: 401, .. }
        )
    }

    /// The remote error key (e.g. `"bad_request"`), if available.
    pub fn api_error_key(&self) -> Option<&str> {
        match self.root() {
            Self::Api { key, .. } => Some(key),
            _ => None,
        }
    }

    /// The HTTP status of a remote rejection, if any.
    pub fn status(&self) -> Option<u16> {
        match self.root() {
            Self::Api { status, .. } | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Extension for attaching operation context to results.
pub trait ResultExt<T> {
    fn context(self, operation: &'static str, target: impl fmt::Display) -> Result<T, Error>;
}

impl<T> ResultExt<T> for Result<T, Error> {
    fn context(self, operation: &'static str, target: impl fmt::Display) -> Result<T, Error> {
        self.map_err(|e| e.context(operation, target.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_includes_hint() {
        let err = Error::Api {
            status: 400,
            key: "bad_request".into(),
            message: "Invalid domain".into(),
            hint: Some("check the regex".into()),
        };
        assert_eq!(
            err.to_string(),
            "API error [bad_request]: Invalid domain (hint: check the regex)"
        );
    }

    #[test]
    fn api_error_display_without_hint() {
        let err = Error::Api {
            status: 404,
            key: "not_found".into(),
            message: "Item not found".into(),
            hint: None,
        };
        assert_eq!(err.to_string(), "API error [not_found]: Item not found");
    }

    #[test]
    fn context_prepends_operation_and_keeps_root() {
        let err = Error::Status {
            status: 404,
            body: "gone".into(),
        }
        .context("delete group", "\"family\"");

        assert_eq!(
            err.to_string(),
            "delete group \"family\": API request failed with status 404: gone"
        );
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
        assert!(matches!(err.root(), Error::Status { status: 404, .. }));
    }

    #[test]
    fn retries_exhausted_is_transient() {
        let err = Error::RetriesExhausted {
            method: "GET".into(),
            url: "http://pi.hole/api/groups".into(),
            attempts: 4,
            last: "HTTP 503".into(),
        };
        assert!(err.is_transient());
        assert!(err.to_string().contains("giving up after 4 attempt(s)"));
    }

    #[test]
    fn remote_rejection_is_not_transient() {
        let err = Error::Api {
            status: 400,
            key: "bad_request".into(),
            message: "nope".into(),
            hint: None,
        };
        assert!(!err.is_transient());
        assert_eq!(err.api_error_key(), Some("bad_request"));
    }
}
