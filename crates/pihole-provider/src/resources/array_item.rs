// Config array items as standalone objects
//
// Upstreams, static leases, CNAME records and local DNS hosts are single
// strings inside a config array. Their whole value is their identity, so an
// update removes the old element and adds the new one.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use pihole_api::{
    CnameRecord, ConfigArrayItem, LocalDnsHost, PiholeClient, StaticLease, Upstream,
};

use crate::error::{ProviderError, Result};
use crate::resource::Resource;

pub type UpstreamResource = ArrayItemResource<Upstream>;
pub type StaticLeaseResource = ArrayItemResource<StaticLease>;
pub type CnameRecordResource = ArrayItemResource<CnameRecord>;
pub type LocalDnsResource = ArrayItemResource<LocalDnsHost>;

/// Handler for any [`ConfigArrayItem`]. The import id is the item's wire
/// string, e.g. `aa:bb:cc:dd:ee:ff,192.168.1.50,nas` for a static lease.
#[derive(Debug)]
pub struct ArrayItemResource<T> {
    client: Arc<PiholeClient>,
    _item: PhantomData<fn() -> T>,
}

impl<T> Clone for ArrayItemResource<T> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.client))
    }
}

impl<T> ArrayItemResource<T> {
    pub fn new(client: Arc<PiholeClient>) -> Self {
        Self {
            client,
            _item: PhantomData,
        }
    }
}

/// Resource type name of each config array item.
pub trait NamedItem: ConfigArrayItem {
    const TYPE_NAME: &'static str;
}

impl NamedItem for Upstream {
    const TYPE_NAME: &'static str = "pihole_dns_upstream";
}

impl NamedItem for StaticLease {
    const TYPE_NAME: &'static str = "pihole_dhcp_static_lease";
}

impl NamedItem for CnameRecord {
    const TYPE_NAME: &'static str = "pihole_cname_record";
}

impl NamedItem for LocalDnsHost {
    const TYPE_NAME: &'static str = "pihole_local_dns";
}

impl<T: NamedItem> ArrayItemResource<T> {
    async fn exists(&self, item: &T) -> Result<bool> {
        self.client
            .item_exists(item)
            .await
            .map_err(ProviderError::api(T::TYPE_NAME))
    }
}

#[async_trait]
impl<T: NamedItem> Resource for ArrayItemResource<T> {
    type State = T;
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    async fn create(&self, desired: &T) -> Result<T> {
        self.client
            .add_item(desired)
            .await
            .map_err(ProviderError::api(T::TYPE_NAME))?;
        Ok(desired.clone())
    }

    async fn read(&self, current: &T) -> Result<Option<T>> {
        Ok(self.exists(current).await?.then(|| current.clone()))
    }

    async fn update(&self, prior: &T, desired: &T) -> Result<T> {
        if prior == desired {
            return Ok(desired.clone());
        }
        debug!(path = T::PATH, from = %prior, to = %desired, "replacing config item");
        self.client
            .remove_item(prior)
            .await
            .map_err(ProviderError::api(T::TYPE_NAME))?;
        self.create(desired).await
    }

    async fn delete(&self, current: &T) -> Result<()> {
        self.client
            .remove_item(current)
            .await
            .map_err(ProviderError::api(T::TYPE_NAME))
    }

    /// Parses the id and checks that the appliance really has the item.
    async fn import(&self, id: &str) -> Result<T> {
        let item: T = id.parse().map_err(|_| ProviderError::InvalidImportId {
            resource: T::TYPE_NAME,
            id: id.to_owned(),
            expected: "the item's config string",
        })?;
        if !self.exists(&item).await? {
            return Err(ProviderError::not_found(T::TYPE_NAME, id));
        }
        Ok(item)
    }
}
