// Read-only collection lookups
//
// Domain filters address positional path segments, so a `kind` without a
// `type` cannot be expressed remotely. Results are filtered again here so
// every set field is honored.

use tracing::debug;

use pihole_api::{ClientEntry, Domain, DomainFilter, Group, List, ListFilter};

use crate::error::{ProviderError, Result};
use crate::provider::Provider;

impl Provider {
    pub async fn groups(&self) -> Result<Vec<Group>> {
        self.client()
            .list_groups(None)
            .await
            .map_err(ProviderError::api("pihole_groups"))
    }

    pub async fn clients(&self) -> Result<Vec<ClientEntry>> {
        self.client()
            .list_clients(None)
            .await
            .map_err(ProviderError::api("pihole_clients"))
    }

    pub async fn domains(&self, filter: &DomainFilter) -> Result<Vec<Domain>> {
        let mut domains = self
            .client()
            .list_domains(filter)
            .await
            .map_err(ProviderError::api("pihole_domains"))?;
        domains.retain(|d| {
            filter.domain_type.is_none_or(|t| d.domain_type == t)
                && filter.kind.is_none_or(|k| d.kind == k)
                && filter
                    .domain
                    .as_deref()
                    .filter(|name| !name.is_empty())
                    .is_none_or(|name| d.domain == name)
        });
        debug!(count = domains.len(), ?filter, "domains matched");
        Ok(domains)
    }

    pub async fn lists(&self, filter: &ListFilter) -> Result<Vec<List>> {
        let mut lists = self
            .client()
            .list_lists(filter)
            .await
            .map_err(ProviderError::api("pihole_lists"))?;
        lists.retain(|l| filter.list_type.is_none_or(|t| l.list_type == t));
        debug!(count = lists.len(), ?filter, "lists matched");
        Ok(lists)
    }
}
