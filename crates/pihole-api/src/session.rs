// Session token lifecycle.
//
// A `Session` holds the current `sid` and the instant it stops being
// usable. Readers take the shared lock to grab a fresh token; renewal
// takes the exclusive lock and re-checks freshness first, so concurrent
// callers that all saw a stale token share one login.

use std::future::Future;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::error::Error;

/// Tokens within this margin of expiry are treated as already expired.
pub const RENEWAL_BUFFER: Duration = Duration::from_secs(5 * 60);

/// Outcome of a successful authentication exchange.
#[derive(Debug, Clone)]
pub struct SessionGrant {
    pub sid: SecretString,
    pub validity: Duration,
}

#[derive(Default)]
enum SessionState {
    #[default]
    Unauthenticated,
    Active {
        sid: SecretString,
        expires_at: Instant,
    },
}

impl SessionState {
    fn fresh_sid(&self, now: Instant) -> Option<&SecretString> {
        match self {
            Self::Active { sid, expires_at } if now + RENEWAL_BUFFER < *expires_at => Some(sid),
            _ => None,
        }
    }
}

#[derive(Default)]
pub(crate) struct Session {
    state: RwLock<SessionState>,
}

impl Session {
    /// Fast path: the current token, if it is not close to expiry.
    pub(crate) async fn fresh_sid(&self) -> Option<SecretString> {
        let state = self.state.read().await;
        let sid = state.fresh_sid(Instant::now()).cloned();
        if sid.is_some() {
            trace!("reusing session token");
        }
        sid
    }

    /// Slow path: take the exclusive lock, re-check, and only then run
    /// `login`. The grant is stored with expiry `now + validity`.
    pub(crate) async fn renew_with<F, Fut>(&self, login: F) -> Result<SecretString, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SessionGrant, Error>>,
    {
        let mut state = self.state.write().await;
        if let Some(sid) = state.fresh_sid(Instant::now()) {
            trace!("session renewed by a concurrent caller");
            return Ok(sid.clone());
        }

        let grant = login().await?;
        let expires_at = Instant::now() + grant.validity;
        debug!(validity_secs = grant.validity.as_secs(), "session stored");
        *state = SessionState::Active {
            sid: grant.sid.clone(),
            expires_at,
        };
        Ok(grant.sid)
    }

    /// Drop the stored token if it is still `sid`. A token that was already
    /// replaced by a newer login is left alone.
    pub(crate) async fn invalidate(&self, sid: &SecretString) {
        let mut state = self.state.write().await;
        let matches = match &*state {
            SessionState::Active { sid: current, .. } => {
                current.expose_secret() == sid.expose_secret()
            }
            SessionState::Unauthenticated => false,
        };
        if matches {
            debug!("session rejected by server, forcing renewal");
            *state = SessionState::Unauthenticated;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn grant(sid: &str, secs: u64) -> SessionGrant {
        SessionGrant {
            sid: SecretString::from(sid),
            validity: Duration::from_secs(secs),
        }
    }

    #[tokio::test]
    async fn starts_without_token() {
        let session = Session::default();
        assert!(session.fresh_sid().await.is_none());
    }

    #[tokio::test]
    async fn renewal_skipped_when_token_fresh() {
        let session = Session::default();
        let logins = AtomicUsize::new(0);

        for _ in 0..2 {
            let sid = session
                .renew_with(|| async {
                    logins.fetch_add(1, Ordering::SeqCst);
                    Ok(grant("abc", 1800))
                })
                .await
                .unwrap();
            assert_eq!(sid.expose_secret(), "abc");
        }

        assert_eq!(logins.load(Ordering::SeqCst), 1);
        assert!(session.fresh_sid().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn token_goes_stale_inside_buffer() {
        let session = Session::default();
        session
            .renew_with(|| async { Ok(grant("abc", 1800)) })
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(1800) - RENEWAL_BUFFER - Duration::from_secs(1))
            .await;
        assert!(session.fresh_sid().await.is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(session.fresh_sid().await.is_none());
    }

    #[tokio::test]
    async fn short_validity_is_never_fresh() {
        let session = Session::default();
        session
            .renew_with(|| async { Ok(grant("abc", 60)) })
            .await
            .unwrap();
        assert!(session.fresh_sid().await.is_none());
    }

    #[tokio::test]
    async fn failed_login_leaves_state_untouched() {
        let session = Session::default();
        let err = session
            .renew_with(|| async { Err(Error::AuthenticationRequired) })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AuthenticationRequired));
        assert!(session.fresh_sid().await.is_none());
    }

    #[tokio::test]
    async fn invalidate_only_drops_matching_token() {
        let session = Session::default();
        session
            .renew_with(|| async { Ok(grant("new", 1800)) })
            .await
            .unwrap();

        session.invalidate(&SecretString::from("old")).await;
        assert!(session.fresh_sid().await.is_some());

        session.invalidate(&SecretString::from("new")).await;
        assert!(session.fresh_sid().await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_renewals_collapse() {
        let session = Arc::new(Session::default());
        let logins = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let session = Arc::clone(&session);
                let logins = Arc::clone(&logins);
                tokio::spawn(async move {
                    session
                        .renew_with(|| async {
                            logins.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Ok(grant("shared", 1800))
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            let sid = task.await.unwrap().unwrap();
            assert_eq!(sid.expose_secret(), "shared");
        }
        assert_eq!(logins.load(Ordering::SeqCst), 1);
    }
}
