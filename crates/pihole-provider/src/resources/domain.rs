// Domain handler
//
// Identity is the `(type, kind, domain)` triple. Changing type or kind
// moves the entry in place rather than recreating it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use pihole_api::{Domain, DomainKey, PiholeClient};

use super::absent_if_not_found;
use crate::error::{ProviderError, Result};
use crate::resource::Resource;

/// Allow/deny domain entries. Import id: `type/kind/domain`, e.g.
/// `deny/regex/(^|\.)ads\.example$`.
#[derive(Debug, Clone)]
pub struct DomainResource {
    client: Arc<PiholeClient>,
}

impl DomainResource {
    pub fn new(client: Arc<PiholeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for DomainResource {
    type State = Domain;
    const TYPE_NAME: &'static str = "pihole_domain";

    async fn create(&self, desired: &Domain) -> Result<Domain> {
        debug!(key = %desired.key(), "creating domain");
        self.client
            .create_domain(desired)
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn read(&self, current: &Domain) -> Result<Option<Domain>> {
        absent_if_not_found(self.client.get_domain(&current.key()).await)
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn update(&self, prior: &Domain, desired: &Domain) -> Result<Domain> {
        self.client
            .update_domain(&prior.key(), desired)
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn delete(&self, current: &Domain) -> Result<()> {
        self.client
            .delete_domain(&current.key())
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    async fn import(&self, id: &str) -> Result<Domain> {
        let key: DomainKey = id.parse().map_err(|_| ProviderError::InvalidImportId {
            resource: Self::TYPE_NAME,
            id: id.to_owned(),
            expected: "type/kind/domain",
        })?;
        self.client
            .get_domain(&key)
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))?
            .ok_or_else(|| ProviderError::not_found(Self::TYPE_NAME, id))
    }
}
