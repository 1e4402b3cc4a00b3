// DNS blocking switch: `dns/blocking`

use serde::Serialize;
use tracing::info;

use crate::client::PiholeClient;
use crate::error::{Error, ResultExt};
use crate::models::Blocking;

#[derive(Serialize)]
struct SetBlockingBody {
    blocking: bool,
    timer: Option<f64>,
}

impl PiholeClient {
    pub async fn get_blocking(&self) -> Result<Blocking, Error> {
        self.get("dns/blocking")
            .await
            .context("get blocking", "dns/blocking")
    }

    /// Turn blocking on or off. With a `timer` (seconds) the appliance
    /// flips back to the opposite state when it runs out; without one the
    /// change is permanent.
    pub async fn set_blocking(&self, enabled: bool, timer: Option<f64>) -> Result<Blocking, Error> {
        if let Some(t) = timer.filter(|t| !(t.is_finite() && *t >= 0.0)) {
            return Err(Error::Validation(format!(
                "blocking timer must be a non-negative number of seconds, got {t}"
            )))
            .context("set blocking", "dns/blocking");
        }

        info!(enabled, ?timer, "setting dns blocking");
        self.post("dns/blocking", &SetBlockingBody {
            blocking: enabled,
            timer,
        })
        .await
        .context("set blocking", "dns/blocking")
    }
}
