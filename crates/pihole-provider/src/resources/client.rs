// Client handler

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use pihole_api::{ClientEntry, PiholeClient};

use super::absent_if_not_found;
use crate::error::{ProviderError, Result};
use crate::resource::Resource;

/// Client entries, identified and imported by their `client` string
/// (IP, MAC, hostname, subnet or `:interface`).
#[derive(Debug, Clone)]
pub struct ClientResource {
    client: Arc<PiholeClient>,
}

impl ClientResource {
    pub fn new(client: Arc<PiholeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for ClientResource {
    type State = ClientEntry;
    const TYPE_NAME: &'static str = "pihole_client";

    async fn create(&self, desired: &ClientEntry) -> Result<ClientEntry> {
        debug!(client = %desired.client, "creating client entry");
        self.client
            .create_client(desired)
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn read(&self, current: &ClientEntry) -> Result<Option<ClientEntry>> {
        absent_if_not_found(self.client.get_client(&current.client).await)
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn update(&self, prior: &ClientEntry, desired: &ClientEntry) -> Result<ClientEntry> {
        self.client
            .update_client(&prior.client, desired)
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn delete(&self, current: &ClientEntry) -> Result<()> {
        self.client
            .delete_client(&current.client)
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn import(&self, id: &str) -> Result<ClientEntry> {
        if id.is_empty() {
            return Err(ProviderError::InvalidImportId {
                resource: Self::TYPE_NAME,
                id: id.to_owned(),
                expected: "an IP, MAC, hostname, subnet or interface",
            });
        }
        self.client
            .get_client(id)
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))?
            .ok_or_else(|| ProviderError::not_found(Self::TYPE_NAME, id))
    }
}
