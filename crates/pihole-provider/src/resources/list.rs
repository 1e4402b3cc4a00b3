// List subscription handler
//
// Lists are addressed by address plus type, so a type change is an update
// keyed by the prior type.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use pihole_api::{List, ListKey, PiholeClient};

use super::absent_if_not_found;
use crate::error::{ProviderError, Result};
use crate::resource::Resource;

/// Blocklist/allowlist subscriptions. Import id: `type/address`; the
/// address may itself contain slashes.
#[derive(Debug, Clone)]
pub struct ListResource {
    client: Arc<PiholeClient>,
}

impl ListResource {
    pub fn new(client: Arc<PiholeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ListResource {
    type State = List;
    const TYPE_NAME: &'static str = "pihole_list";

    async fn create(&self, desired: &List) -> Result<List> {
        debug!(key = %desired.key(), "creating list");
        self.client
            .create_list(desired)
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn read(&self, current: &List) -> Result<Option<List>> {
        absent_if_not_found(self.client.get_list(&current.key()).await)
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn update(&self, prior: &List, desired: &List) -> Result<List> {
        self.client
            .update_list(&prior.key(), desired)
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn delete(&self, current: &List) -> Result<()> {
        self.client
            .delete_list(&current.key())
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn import(&self, id: &str) -> Result<List> {
        let key: ListKey = id.parse().map_err(|_| ProviderError::InvalidImportId {
            resource: Self::TYPE_NAME,
            id: id.to_owned(),
            expected: "type/address",
        })?;
        self.client
            .get_list(&key)
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))?
            .ok_or_else(|| ProviderError::not_found(Self::TYPE_NAME, id))
    }
}
