// Configuration document: `config`
//
// Reads always fetch the whole document and narrow to one section.
// Writes are section-scoped partial patches of the form
// `{"config": {"<section>": {...}}}`, sent with PATCH.

mod sections;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::client::PiholeClient;
use crate::error::{Error, ResultExt};

pub use sections::*;

/// The configuration document, as far as it is modelled here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PiholeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp: Option<DhcpConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntp: Option<NtpConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<ResolverConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webserver: Option<WebserverConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<FilesConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub misc: Option<MiscConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugConfig>,
}

#[derive(Deserialize)]
struct ConfigResponse {
    config: PiholeConfig,
}

/// A top-level section of the configuration document.
///
/// Implementors double as partial patches: unset fields are not sent.
pub trait ConfigSection:
    Serialize + DeserializeOwned + Clone + Default + PartialEq + Send + Sync + 'static
{
    /// Key of the section in the document, e.g. `"misc"`.
    const NAME: &'static str;

    /// Narrow a fetched document to this section.
    fn extract(config: PiholeConfig) -> Option<Self>;
}

impl ConfigSection for DnsConfig {
    const NAME: &'static str = "dns";
    fn extract(config: PiholeConfig) -> Option<Self> {
        config.dns
    }
}

impl ConfigSection for DhcpConfig {
    const NAME: &'static str = "dhcp";
    fn extract(config: PiholeConfig) -> Option<Self> {
        config.dhcp
    }
}

impl ConfigSection for NtpConfig {
    const NAME: &'static str = "ntp";
    fn extract(config: PiholeConfig) -> Option<Self> {
        config.ntp
    }
}

impl ConfigSection for ResolverConfig {
    const NAME: &'static str = "resolver";
    fn extract(config: PiholeConfig) -> Option<Self> {
        config.resolver
    }
}

impl ConfigSection for DatabaseConfig {
    const NAME: &'static str = "database";
    fn extract(config: PiholeConfig) -> Option<Self> {
        config.database
    }
}

impl ConfigSection for WebserverConfig {
    const NAME: &'static str = "webserver";
    fn extract(config: PiholeConfig) -> Option<Self> {
        config.webserver
    }
}

impl ConfigSection for FilesConfig {
    const NAME: &'static str = "files";
    fn extract(config: PiholeConfig) -> Option<Self> {
        config.files
    }
}

impl ConfigSection for MiscConfig {
    const NAME: &'static str = "misc";
    fn extract(config: PiholeConfig) -> Option<Self> {
        config.misc
    }
}

impl ConfigSection for DebugConfig {
    const NAME: &'static str = "debug";
    fn extract(config: PiholeConfig) -> Option<Self> {
        config.debug
    }
}

impl PiholeClient {
    // ── Reads ────────────────────────────────────────────────────────

    pub async fn get_config(&self) -> Result<PiholeConfig, Error> {
        let resp: ConfigResponse = self.get("config").await.context("get config", "config")?;
        Ok(resp.config)
    }

    /// Fetch the document and narrow it to `S`. `Ok(None)` when the
    /// appliance omits the section.
    pub async fn get_config_section<S: ConfigSection>(&self) -> Result<Option<S>, Error> {
        let resp: ConfigResponse = self
            .get("config")
            .await
            .context("get config section", S::NAME)?;
        Ok(S::extract(resp.config))
    }

    pub async fn get_dns_config(&self) -> Result<Option<DnsConfig>, Error> {
        self.get_config_section().await
    }

    pub async fn get_dhcp_config(&self) -> Result<Option<DhcpConfig>, Error> {
        self.get_config_section().await
    }

    pub async fn get_ntp_config(&self) -> Result<Option<NtpConfig>, Error> {
        self.get_config_section().await
    }

    pub async fn get_resolver_config(&self) -> Result<Option<ResolverConfig>, Error> {
        self.get_config_section().await
    }

    pub async fn get_database_config(&self) -> Result<Option<DatabaseConfig>, Error> {
        self.get_config_section().await
    }

    pub async fn get_webserver_config(&self) -> Result<Option<WebserverConfig>, Error> {
        self.get_config_section().await
    }

    pub async fn get_files_config(&self) -> Result<Option<FilesConfig>, Error> {
        self.get_config_section().await
    }

    pub async fn get_misc_config(&self) -> Result<Option<MiscConfig>, Error> {
        self.get_config_section().await
    }

    pub async fn get_debug_config(&self) -> Result<Option<DebugConfig>, Error> {
        self.get_config_section().await
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Send the set fields of `patch` as a partial update of section `S`.
    /// A patch with nothing set is not sent.
    pub async fn update_config<S: ConfigSection>(&self, patch: &S) -> Result<(), Error> {
        let values = serde_json::to_value(patch)
            .map_err(Error::Serialization)
            .context("update config", S::NAME)?;
        if values.as_object().is_some_and(Map::is_empty) {
            debug!(section = S::NAME, "empty config patch, nothing to send");
            return Ok(());
        }
        self.update_config_section(S::NAME, values).await
    }

    /// Patch an arbitrary section with raw values.
    pub async fn update_config_section(&self, section: &str, values: Value) -> Result<(), Error> {
        if section.is_empty() {
            return Err(Error::Validation("config section name is required".into()))
                .context("update config", section);
        }

        let body = json!({ "config": { section: values } });
        debug!(section, "patching config");
        self.request(Method::PATCH, "config", Some(&body))
            .await
            .context("update config", section)?;
        Ok(())
    }

    /// Patch a single top-level key of a section.
    pub async fn update_config_value<V: Serialize + ?Sized>(
        &self,
        section: &str,
        key: &str,
        value: &V,
    ) -> Result<(), Error> {
        let value = serde_json::to_value(value)
            .map_err(Error::Serialization)
            .context("update config", format!("{section}.{key}"))?;
        let mut values = Map::new();
        values.insert(key.to_owned(), value);
        self.update_config_section(section, Value::Object(values))
            .await
    }
}
