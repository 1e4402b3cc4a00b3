// Session authentication
//
// Pi-hole v6 hands out a session id (`sid`) from `POST auth`. Appliances
// without a password report an already-valid session on `GET auth`, so
// the probe comes first and the password is only sent when needed.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::client::{PiholeClient, decode};
use crate::error::Error;
use crate::session::SessionGrant;

/// Upper bound on a server-reported session validity.
const MAX_VALIDITY: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Deserialize)]
struct AuthEnvelope {
    session: SessionInfo,
}

/// The `session` object of an auth response.
#[derive(Debug, Deserialize)]
struct SessionInfo {
    valid: bool,
    #[serde(default)]
    totp: bool,
    #[serde(default)]
    sid: Option<String>,
    #[serde(default)]
    validity: i64,
    #[serde(default)]
    message: Option<String>,
}

impl SessionInfo {
    fn into_grant(self) -> SessionGrant {
        let secs = u64::try_from(self.validity).unwrap_or(0);
        SessionGrant {
            sid: SecretString::from(self.sid.unwrap_or_default()),
            validity: Duration::from_secs(secs).min(MAX_VALIDITY),
        }
    }

    /// A passwordless appliance reports `validity: -1`; its session never
    /// expires, so it is kept until the server rejects it with a 401.
    fn into_passwordless_grant(self) -> SessionGrant {
        if self.validity > 0 {
            return self.into_grant();
        }
        SessionGrant {
            sid: SecretString::from(self.sid.unwrap_or_default()),
            validity: MAX_VALIDITY,
        }
    }
}

#[derive(Deserialize)]
struct LoginError {
    error: LoginErrorBody,
}

#[derive(Deserialize)]
struct LoginErrorBody {
    #[serde(default)]
    message: String,
}

impl PiholeClient {
    /// Run the authentication exchange and return the new session.
    ///
    /// Callers go through `Session::renew_with`, which serializes logins.
    pub(crate) async fn login(&self) -> Result<SessionGrant, Error> {
        let url = self.url("auth")?;
        debug!(%url, "probing session state");

        let resp = self
            .transport()
            .execute(&Method::GET, &url, None, None)
            .await?;
        let probe: AuthEnvelope = decode(&resp.bytes().await?)?;

        if probe.session.valid {
            debug!("no password required, adopting probe session");
            return Ok(probe.session.into_passwordless_grant());
        }

        let password = self.password().ok_or(Error::AuthenticationRequired)?;

        let body = serde_json::to_vec(&json!({ "password": password.expose_secret() }))
            .map(Bytes::from)
            .map_err(Error::Serialization)?;
        let resp = self
            .transport()
            .execute(&Method::POST, &url, None, Some(&body))
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<LoginError>(&bytes)
                .ok()
                .map(|e| e.error.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    format!(
                        "status {}: {}",
                        status.as_u16(),
                        String::from_utf8_lossy(&bytes)
                    )
                });
            return Err(Error::Authentication { message });
        }

        let login: AuthEnvelope = decode(&bytes)?;
        if !login.session.valid {
            let message = match (login.session.totp, login.session.message) {
                (true, _) => "two-factor authentication is not supported".to_owned(),
                (false, Some(m)) if !m.is_empty() => m,
                _ => "invalid session".to_owned(),
            };
            return Err(Error::Authentication { message });
        }

        info!(validity_secs = login.session.validity, "logged in to pi-hole");
        Ok(login.session.into_grant())
    }
}
