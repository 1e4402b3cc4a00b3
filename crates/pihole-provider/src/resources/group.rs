// Group handler
//
// Renames go through the prior name; a group gone on the appliance reads
// as absent.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use pihole_api::{Group, PiholeClient};

use super::absent_if_not_found;
use crate::error::{ProviderError, Result};
use crate::resource::Resource;

/// Groups, identified and imported by name.
#[derive(Debug, Clone)]
pub struct GroupResource {
    client: Arc<PiholeClient>,
}

impl GroupResource {
    pub fn new(client: Arc<PiholeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for GroupResource {
    type State = Group;
    const TYPE_NAME: &'static str = "pihole_group";

    async fn create(&self, desired: &Group) -> Result<Group> {
        debug!(name = %desired.name, "creating group");
        self.client
            .create_group(desired)
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn read(&self, current: &Group) -> Result<Option<Group>> {
        absent_if_not_found(self.client.get_group(&current.name).await)
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn update(&self, prior: &Group, desired: &Group) -> Result<Group> {
        self.client
            .update_group(&prior.name, desired)
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn delete(&self, current: &Group) -> Result<()> {
        self.client
            .delete_group(&current.name)
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn import(&self, id: &str) -> Result<Group> {
        if id.is_empty() {
            return Err(ProviderError::InvalidImportId {
                resource: Self::TYPE_NAME,
                id: id.to_owned(),
                expected: "a group name",
            });
        }
        self.client
            .get_group(id)
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))?
            .ok_or_else(|| ProviderError::not_found(Self::TYPE_NAME, id))
    }
}
