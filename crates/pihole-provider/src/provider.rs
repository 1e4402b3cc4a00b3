// Provider: shared client plus handler constructors
//
// There is no process-wide client. The provider owns one `Arc` and hands
// clones to every handler it builds.

use std::sync::Arc;

use tracing::debug;

use pihole_api::config::ConfigSection;
use pihole_api::{ClientConfig, CnameRecord, LocalDnsHost, PiholeClient, StaticLease, Upstream};

use crate::error::{ProviderError, Result};
use crate::resources::{
    ArrayItemResource, BlockingResource, ClientResource, ConfigSectionResource, DomainResource,
    GroupResource, ListResource,
};

#[derive(Debug, Clone)]
pub struct Provider {
    client: Arc<PiholeClient>,
}

impl Provider {
    pub fn new(client: Arc<PiholeClient>) -> Self {
        Self { client }
    }

    /// Build the client from `config` and wrap it.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let client = PiholeClient::new(config).map_err(ProviderError::api("provider"))?;
        debug!(base_url = %client.base_url(), "provider configured");
        Ok(Self::new(Arc::new(client)))
    }

    pub fn client(&self) -> &Arc<PiholeClient> {
        &self.client
    }

    // ── Handlers ─────────────────────────────────────────────────────

    pub fn group_resource(&self) -> GroupResource {
        GroupResource::new(Arc::clone(&self.client))
    }

    pub fn client_resource(&self) -> ClientResource {
        ClientResource::new(Arc::clone(&self.client))
    }

    pub fn domain_resource(&self) -> DomainResource {
        DomainResource::new(Arc::clone(&self.client))
    }

    pub fn list_resource(&self) -> ListResource {
        ListResource::new(Arc::clone(&self.client))
    }

    pub fn blocking_resource(&self) -> BlockingResource {
        BlockingResource::new(Arc::clone(&self.client))
    }

    pub fn upstream_resource(&self) -> ArrayItemResource<Upstream> {
        ArrayItemResource::new(Arc::clone(&self.client))
    }

    pub fn static_lease_resource(&self) -> ArrayItemResource<StaticLease> {
        ArrayItemResource::new(Arc::clone(&self.client))
    }

    pub fn cname_record_resource(&self) -> ArrayItemResource<CnameRecord> {
        ArrayItemResource::new(Arc::clone(&self.client))
    }

    pub fn local_dns_resource(&self) -> ArrayItemResource<LocalDnsHost> {
        ArrayItemResource::new(Arc::clone(&self.client))
    }

    /// Handler for one configuration section, e.g.
    /// `provider.config_resource::<MiscConfig>()`.
    pub fn config_resource<S: ConfigSection>(&self) -> ConfigSectionResource<S> {
        ConfigSectionResource::new(Arc::clone(&self.client))
    }
}
