// Config array items
//
// Some settings are string arrays inside a config section (upstream
// servers, static DHCP leases, CNAME records, local DNS hosts). The API
// lets single elements be added with `PUT config/<path>/<value>` and
// removed with `DELETE` on the same path, so each element can be managed
// on its own. The string format of each element is fixed per array.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::client::PiholeClient;
use crate::config::{ConfigSection, DhcpConfig, DnsConfig};
use crate::error::{Error, ResultExt};

fn item_path(path: &str, value: &str) -> String {
    format!(
        "config/{}/{}",
        path.trim_matches('/'),
        urlencoding::encode(value)
    )
}

/// A typed element of a config string array.
pub trait ConfigArrayItem:
    FromStr<Err = Error> + fmt::Display + Clone + PartialEq + Send + Sync + 'static
{
    /// Section that owns the array.
    type Section: ConfigSection;

    /// Path of the array below `config/`, e.g. `"dns/upstreams"`.
    const PATH: &'static str;

    /// The raw array inside a fetched section.
    fn entries(section: &Self::Section) -> &[String];
}

// ── Upstream ───────────────────────────────────────────────────────

/// An upstream DNS server, e.g. `1.1.1.1` or `9.9.9.9#5353`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Upstream(pub String);

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Upstream {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::Validation("upstream must not be empty".into()));
        }
        Ok(Self(s.to_owned()))
    }
}

impl ConfigArrayItem for Upstream {
    type Section = DnsConfig;
    const PATH: &'static str = "dns/upstreams";

    fn entries(section: &DnsConfig) -> &[String] {
        section.upstreams.as_deref().unwrap_or_default()
    }
}

// ── Static DHCP lease ──────────────────────────────────────────────

/// A static DHCP lease, `MAC,IP,hostname` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StaticLease {
    pub mac: String,
    pub ip: String,
    pub hostname: String,
}

impl StaticLease {
    pub fn new(mac: impl Into<String>, ip: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            ip: ip.into(),
            hostname: hostname.into(),
        }
    }
}

impl fmt::Display for StaticLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.mac, self.ip, self.hostname)
    }
}

impl FromStr for StaticLease {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(mac), Some(ip), Some(hostname)) => Ok(Self::new(mac, ip, hostname)),
            _ => Err(Error::Validation(format!(
                "expected MAC,IP,hostname, got {s:?}"
            ))),
        }
    }
}

impl ConfigArrayItem for StaticLease {
    type Section = DhcpConfig;
    const PATH: &'static str = "dhcp/hosts";

    fn entries(section: &DhcpConfig) -> &[String] {
        section.hosts.as_deref().unwrap_or_default()
    }
}

// ── CNAME record ───────────────────────────────────────────────────

/// A local CNAME, `domain,target[,ttl]` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CnameRecord {
    pub domain: String,
    pub target: String,
    pub ttl: Option<u32>,
}

impl CnameRecord {
    pub fn new(domain: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            target: target.into(),
            ttl: None,
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

impl fmt::Display for CnameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.domain, self.target)?;
        if let Some(ttl) = self.ttl {
            write!(f, ",{ttl}")?;
        }
        Ok(())
    }
}

impl FromStr for CnameRecord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ',');
        let (Some(domain), Some(target)) = (parts.next(), parts.next()) else {
            return Err(Error::Validation(format!(
                "expected domain,target[,ttl], got {s:?}"
            )));
        };
        let ttl = parts
            .next()
            .map(|ttl| {
                ttl.trim()
                    .parse::<u32>()
                    .map_err(|e| Error::Validation(format!("invalid CNAME ttl {ttl:?}: {e}")))
            })
            .transpose()?;
        Ok(Self {
            domain: domain.to_owned(),
            target: target.to_owned(),
            ttl,
        })
    }
}

impl ConfigArrayItem for CnameRecord {
    type Section = DnsConfig;
    const PATH: &'static str = "dns/cnameRecords";

    fn entries(section: &DnsConfig) -> &[String] {
        section.cname_records.as_deref().unwrap_or_default()
    }
}

// ── Local DNS host ─────────────────────────────────────────────────

/// A hosts-file style record, `IP hostname` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalDnsHost {
    pub ip: String,
    pub hostname: String,
}

impl LocalDnsHost {
    pub fn new(ip: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            hostname: hostname.into(),
        }
    }
}

impl fmt::Display for LocalDnsHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ip, self.hostname)
    }
}

impl FromStr for LocalDnsHost {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(' ') {
            Some((ip, hostname)) => Ok(Self::new(ip, hostname)),
            None => Err(Error::Validation(format!("expected \"IP hostname\", got {s:?}"))),
        }
    }
}

impl ConfigArrayItem for LocalDnsHost {
    type Section = DnsConfig;
    const PATH: &'static str = "dns/hosts";

    fn entries(section: &DnsConfig) -> &[String] {
        section.hosts.as_deref().unwrap_or_default()
    }
}

// ── Client operations ──────────────────────────────────────────────

impl PiholeClient {
    /// Append `value` to the config array at `path` (e.g. `dns/upstreams`).
    pub async fn add_config_array_item(&self, path: &str, value: &str) -> Result<(), Error> {
        if value.is_empty() {
            return Err(Error::Validation("array item must not be empty".into()))
                .context("add config item", path);
        }
        debug!(path, value, "adding config array item");
        self.put_empty(&item_path(path, value))
            .await
            .context("add config item", format!("{path} {value:?}"))
    }

    /// Remove `value` from the config array at `path`.
    pub async fn delete_config_array_item(&self, path: &str, value: &str) -> Result<(), Error> {
        debug!(path, value, "removing config array item");
        self.delete(&item_path(path, value))
            .await
            .context("delete config item", format!("{path} {value:?}"))
    }

    pub async fn add_item<T: ConfigArrayItem>(&self, item: &T) -> Result<(), Error> {
        self.add_config_array_item(T::PATH, &item.to_string()).await
    }

    pub async fn remove_item<T: ConfigArrayItem>(&self, item: &T) -> Result<(), Error> {
        self.delete_config_array_item(T::PATH, &item.to_string())
            .await
    }

    /// Whether the owning section's array contains exactly this item's
    /// wire string.
    pub async fn item_exists<T: ConfigArrayItem>(&self, item: &T) -> Result<bool, Error> {
        let value = item.to_string();
        let section = self.get_config_section::<T::Section>().await?;
        Ok(section.is_some_and(|s| T::entries(&s).iter().any(|entry| *entry == value)))
    }

    /// All items of the array. Entries that do not parse are skipped.
    pub async fn list_items<T: ConfigArrayItem>(&self) -> Result<Vec<T>, Error> {
        let Some(section) = self.get_config_section::<T::Section>().await? else {
            return Ok(Vec::new());
        };
        Ok(T::entries(&section)
            .iter()
            .filter_map(|entry| match entry.parse::<T>() {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(path = T::PATH, entry, error = %e, "skipping unparseable config entry");
                    None
                }
            })
            .collect())
    }
}
