// DNS blocking singleton
//
// The remote timer counts down in real time. Stored state keeps the timer
// as it was configured so refreshes do not drift, and only drops it once
// the appliance reports none.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use pihole_api::{Blocking, PiholeClient};

use crate::error::{ProviderError, Result};
use crate::resource::Resource;

/// Import id and state id of the singleton.
pub const BLOCKING_ID: &str = "blocking";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockingState {
    pub enabled: bool,
    /// Seconds until the switch flips back, as configured.
    pub timer: Option<f64>,
}

impl BlockingState {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            timer: None,
        }
    }

    pub fn disabled_for(seconds: f64) -> Self {
        Self {
            enabled: false,
            timer: Some(seconds),
        }
    }
}

impl From<Blocking> for BlockingState {
    fn from(remote: Blocking) -> Self {
        Self {
            enabled: remote.is_enabled(),
            timer: remote.timer,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlockingResource {
    client: Arc<PiholeClient>,
}

impl BlockingResource {
    pub fn new(client: Arc<PiholeClient>) -> Self {
        Self { client }
    }

    async fn apply(&self, desired: &BlockingState) -> Result<BlockingState> {
        self.client
            .set_blocking(desired.enabled, desired.timer)
            .await
            .map(BlockingState::from)
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }
}

#[async_trait]
impl Resource for BlockingResource {
    type State = BlockingState;
    const TYPE_NAME: &'static str = "pihole_dns_blocking";

    async fn create(&self, desired: &BlockingState) -> Result<BlockingState> {
        self.apply(desired).await
    }

    async fn read(&self, current: &BlockingState) -> Result<Option<BlockingState>> {
        let remote = self
            .client
            .get_blocking()
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))?;
        Ok(Some(BlockingState {
            enabled: remote.is_enabled(),
            timer: remote.timer_transition_from(current.timer),
        }))
    }

    async fn update(&self, _prior: &BlockingState, desired: &BlockingState) -> Result<BlockingState> {
        self.apply(desired).await
    }

    /// Releasing the singleton turns blocking back on permanently.
    async fn delete(&self, _current: &BlockingState) -> Result<()> {
        info!("releasing dns blocking, re-enabling permanently");
        self.client
            .set_blocking(true, None)
            .await
            .map(drop)
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    /// The id is ignored; there is only one switch.
    async fn import(&self, _id: &str) -> Result<BlockingState> {
        self.client
            .get_blocking()
            .await
            .map(BlockingState::from)
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }
}
