// Configuration sections as singleton objects
//
// A section always exists on the appliance, so it can be patched and read
// but never removed. Deleting only forgets it.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use pihole_api::PiholeClient;
use pihole_api::config::ConfigSection;

use crate::error::{ProviderError, Result};
use crate::resource::Resource;

#[derive(Debug)]
pub struct ConfigSectionResource<S> {
    client: Arc<PiholeClient>,
    _section: PhantomData<fn() -> S>,
}

impl<S> Clone for ConfigSectionResource<S> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.client))
    }
}

impl<S> ConfigSectionResource<S> {
    pub fn new(client: Arc<PiholeClient>) -> Self {
        Self {
            client,
            _section: PhantomData,
        }
    }
}

impl<S: ConfigSection> ConfigSectionResource<S> {
    async fn fetch(&self) -> Result<Option<S>> {
        self.client
            .get_config_section::<S>()
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))
    }

    /// Send the set fields of `desired`, then return the section as the
    /// appliance now reports it.
    async fn apply(&self, desired: &S) -> Result<S> {
        self.client
            .update_config(desired)
            .await
            .map_err(ProviderError::api(Self::TYPE_NAME))?;
        self.fetch()
            .await?
            .ok_or_else(|| ProviderError::not_found(Self::TYPE_NAME, S::NAME))
    }
}

#[async_trait]
impl<S: ConfigSection> Resource for ConfigSectionResource<S> {
    type State = S;
    const TYPE_NAME: &'static str = "pihole_config";

    async fn create(&self, desired: &S) -> Result<S> {
        self.apply(desired).await
    }

    async fn read(&self, _current: &S) -> Result<Option<S>> {
        self.fetch().await
    }

    async fn update(&self, _prior: &S, desired: &S) -> Result<S> {
        self.apply(desired).await
    }

    async fn delete(&self, _current: &S) -> Result<()> {
        info!(
            section = S::NAME,
            "config sections cannot be deleted, leaving remote values in place"
        );
        Ok(())
    }

    /// The id is ignored; the section is addressed by type.
    async fn import(&self, _id: &str) -> Result<S> {
        self.fetch()
            .await?
            .ok_or_else(|| ProviderError::not_found(Self::TYPE_NAME, S::NAME))
    }
}
