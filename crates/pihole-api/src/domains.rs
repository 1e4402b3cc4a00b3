// Domain endpoints
//
// Entries live under `domains/{type}/{kind}/{domain}`. Listing may stop
// at any prefix of that path; creating posts to `domains/{type}/{kind}`.

use serde::Serialize;
use tracing::debug;

use crate::client::PiholeClient;
use crate::error::{Error, ResultExt};
use crate::models::{Domain, DomainKey, DomainKind, DomainType, DomainsResponse, non_empty};

/// Optional narrowing for [`PiholeClient::list_domains`]. Empty means the
/// whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainFilter {
    pub domain_type: Option<DomainType>,
    pub kind: Option<DomainKind>,
    pub domain: Option<String>,
}

impl DomainFilter {
    /// Path below the API root. Segments are positional, so `kind` is only
    /// used when `domain_type` is set and `domain` only when `kind` is.
    fn path(&self) -> String {
        let mut path = String::from("domains");
        let Some(domain_type) = self.domain_type else {
            return path;
        };
        path.push('/');
        path.push_str(domain_type.as_ref());

        let Some(kind) = self.kind else {
            return path;
        };
        path.push('/');
        path.push_str(kind.as_ref());

        if let Some(domain) = non_empty(self.domain.as_deref()) {
            path.push('/');
            path.push_str(&urlencoding::encode(domain));
        }
        path
    }
}

impl From<&DomainKey> for DomainFilter {
    fn from(key: &DomainKey) -> Self {
        Self {
            domain_type: Some(key.domain_type),
            kind: Some(key.kind),
            domain: Some(key.domain.clone()),
        }
    }
}

#[derive(Serialize)]
struct CreateDomainBody<'a> {
    domain: &'a str,
    enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    #[serde(skip_serializing_if = "<[i64]>::is_empty")]
    groups: &'a [i64],
}

#[derive(Serialize)]
struct UpdateDomainBody<'a> {
    domain: &'a str,
    enabled: bool,
    comment: &'a str,
    groups: &'a [i64],
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    domain_type: Option<DomainType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<DomainKind>,
}

fn domain_path(key: &DomainKey) -> String {
    format!(
        "domains/{}/{}/{}",
        key.domain_type,
        key.kind,
        urlencoding::encode(&key.domain)
    )
}

fn require_domain(domain: &Domain) -> Result<(), Error> {
    if domain.domain.is_empty() {
        return Err(Error::Validation("domain is required".into()));
    }
    Ok(())
}

impl PiholeClient {
    async fn fetch_domains(&self, filter: &DomainFilter) -> Result<Vec<Domain>, Error> {
        let resp: DomainsResponse = self.get(&filter.path()).await?;
        Ok(resp.domains)
    }

    async fn find_domain(&self, key: &DomainKey) -> Result<Option<Domain>, Error> {
        if key.domain.is_empty() {
            return Ok(None);
        }
        let domains = self.fetch_domains(&DomainFilter::from(key)).await?;
        Ok(domains.into_iter().find(|d| {
            d.domain == key.domain && d.domain_type == key.domain_type && d.kind == key.kind
        }))
    }

    pub async fn list_domains(&self, filter: &DomainFilter) -> Result<Vec<Domain>, Error> {
        self.fetch_domains(filter)
            .await
            .context("list domains", filter.path())
    }

    /// Fetch a domain entry by its full `(type, kind, domain)` identity.
    pub async fn get_domain(&self, key: &DomainKey) -> Result<Option<Domain>, Error> {
        self.find_domain(key).await.context("get domain", key)
    }

    pub async fn create_domain(&self, domain: &Domain) -> Result<Domain, Error> {
        let key = domain.key();
        require_domain(domain).context("create domain", &key)?;

        let body = CreateDomainBody {
            domain: &domain.domain,
            enabled: domain.enabled,
            comment: non_empty(domain.comment.as_deref()),
            groups: &domain.groups,
        };
        let path = format!("domains/{}/{}", domain.domain_type, domain.kind);
        let resp: DomainsResponse = self
            .post(&path, &body)
            .await
            .context("create domain", &key)?;

        resp.domains
            .into_iter()
            .next()
            .ok_or(Error::EmptyResponse { entity: "domain" })
            .context("create domain", &key)
    }

    /// Update the entry addressed by `original`. `type` and `kind` are only
    /// sent when they differ from it, which moves the entry.
    pub async fn update_domain(&self, original: &DomainKey, domain: &Domain) -> Result<Domain, Error> {
        require_domain(domain).context("update domain", original)?;

        let moved =
            domain.domain_type != original.domain_type || domain.kind != original.kind;
        let body = UpdateDomainBody {
            domain: &domain.domain,
            enabled: domain.enabled,
            comment: domain.comment.as_deref().unwrap_or_default(),
            groups: &domain.groups,
            domain_type: moved.then_some(domain.domain_type),
            kind: moved.then_some(domain.kind),
        };
        let resp: DomainsResponse = self
            .put(&domain_path(original), &body)
            .await
            .context("update domain", original)?;

        if let Some(updated) = resp.domains.into_iter().next() {
            return Ok(updated);
        }

        let key = domain.key();
        debug!(from = %original, to = %key, "empty update echo, re-fetching domain");
        self.find_domain(&key)
            .await
            .context("update domain", original)?
            .ok_or_else(|| Error::NotFound {
                entity: "domain",
                identity: key.to_string(),
            })
            .context("update domain", original)
    }

    pub async fn delete_domain(&self, key: &DomainKey) -> Result<(), Error> {
        self.delete(&domain_path(key))
            .await
            .context("delete domain", key)
    }
}
