// ── Pi-hole domain types ──
//
// Wire shapes for the group/client/domain/list collections and the
// blocking switch, plus the composite identities used to address them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::Error;

// ── Enumerations ───────────────────────────────────────────────────

/// Whether a domain entry allows or denies matching queries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DomainType {
    Allow,
    Deny,
}

/// How a domain entry is matched.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DomainKind {
    Exact,
    Regex,
}

/// Whether a subscribed list feeds the allow- or the blocklist.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ListType {
    Allow,
    Block,
}

// ── Entities ───────────────────────────────────────────────────────

/// A client group. Identity: `name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub date_added: i64,
    #[serde(default)]
    pub date_modified: i64,
}

/// A client entry: an IP, MAC, hostname, subnet or interface that is
/// assigned to groups. Identity: `client`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientEntry {
    #[serde(default)]
    pub id: i64,
    pub client: String,
    /// Hostname resolved by the appliance, when known.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub groups: Vec<i64>,
    #[serde(default)]
    pub date_added: i64,
    #[serde(default)]
    pub date_modified: i64,
}

/// An allow/deny domain entry. Identity: `(type, kind, domain)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    #[serde(default)]
    pub id: i64,
    pub domain: String,
    #[serde(rename = "type")]
    pub domain_type: DomainType,
    pub kind: DomainKind,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub groups: Vec<i64>,
    #[serde(default)]
    pub date_added: i64,
    #[serde(default)]
    pub date_modified: i64,
}

impl Domain {
    /// A new, enabled entry with no comment or groups.
    pub fn new(domain: impl Into<String>, domain_type: DomainType, kind: DomainKind) -> Self {
        Self {
            id: 0,
            domain: domain.into(),
            domain_type,
            kind,
            enabled: true,
            comment: None,
            groups: Vec::new(),
            date_added: 0,
            date_modified: 0,
        }
    }

    pub fn key(&self) -> DomainKey {
        DomainKey {
            domain_type: self.domain_type,
            kind: self.kind,
            domain: self.domain.clone(),
        }
    }
}

/// A subscribed adlist or allowlist. Identity: `(type, address)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    #[serde(default)]
    pub id: i64,
    pub address: String,
    #[serde(rename = "type")]
    pub list_type: ListType,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub groups: Vec<i64>,
    #[serde(default)]
    pub date_added: i64,
    #[serde(default)]
    pub date_modified: i64,
    /// Number of domains parsed from the list on the last gravity run.
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub invalid_domains: i64,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub abp_entries: i64,
}

impl List {
    pub fn new(address: impl Into<String>, list_type: ListType) -> Self {
        Self {
            id: 0,
            address: address.into(),
            list_type,
            enabled: true,
            comment: None,
            groups: Vec::new(),
            date_added: 0,
            date_modified: 0,
            number: 0,
            invalid_domains: 0,
            status: 0,
            abp_entries: 0,
        }
    }

    pub fn key(&self) -> ListKey {
        ListKey {
            list_type: self.list_type,
            address: self.address.clone(),
        }
    }
}

// ── Composite identities ───────────────────────────────────────────

/// Full identity of a domain entry, formatted as `type/kind/domain`.
///
/// The domain part may itself contain `/` (regex entries), so parsing
/// splits on the first two separators only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainKey {
    pub domain_type: DomainType,
    pub kind: DomainKind,
    pub domain: String,
}

impl DomainKey {
    pub fn new(domain_type: DomainType, kind: DomainKind, domain: impl Into<String>) -> Self {
        Self {
            domain_type,
            kind,
            domain: domain.into(),
        }
    }
}

impl fmt::Display for DomainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.domain_type, self.kind, self.domain)
    }
}

impl FromStr for DomainKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '/');
        let (Some(domain_type), Some(kind), Some(domain)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::Validation(format!(
                "expected type/kind/domain, got {s:?}"
            )));
        };
        if domain.is_empty() {
            return Err(Error::Validation(format!("empty domain in {s:?}")));
        }
        Ok(Self {
            domain_type: domain_type
                .parse()
                .map_err(|_| Error::Validation(format!("unknown domain type {domain_type:?}")))?,
            kind: kind
                .parse()
                .map_err(|_| Error::Validation(format!("unknown domain kind {kind:?}")))?,
            domain: domain.to_owned(),
        })
    }
}

/// Full identity of a list, formatted as `type/address`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListKey {
    pub list_type: ListType,
    pub address: String,
}

impl ListKey {
    pub fn new(list_type: ListType, address: impl Into<String>) -> Self {
        Self {
            list_type,
            address: address.into(),
        }
    }
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.list_type, self.address)
    }
}

impl FromStr for ListKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((list_type, address)) = s.split_once('/') else {
            return Err(Error::Validation(format!("expected type/address, got {s:?}")));
        };
        if address.is_empty() {
            return Err(Error::Validation(format!("empty address in {s:?}")));
        }
        Ok(Self {
            list_type: list_type
                .parse()
                .map_err(|_| Error::Validation(format!("unknown list type {list_type:?}")))?,
            address: address.to_owned(),
        })
    }
}

// ── Blocking ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BlockingStatus {
    Enabled,
    Disabled,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Current state of the DNS blocking switch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Blocking {
    pub blocking: BlockingStatus,
    /// Seconds until the current state flips back, if a timer is running.
    #[serde(default)]
    pub timer: Option<f64>,
}

impl Blocking {
    pub fn is_enabled(&self) -> bool {
        self.blocking == BlockingStatus::Enabled
    }

    /// Timer value to record after reading this state, given the one
    /// recorded before.
    ///
    /// A running timer counts down on every read, so only its presence is
    /// treated as a change: an unchanged presence keeps `prior`.
    pub fn timer_transition_from(&self, prior: Option<f64>) -> Option<f64> {
        match (prior, self.timer) {
            (_, None) => None,
            (Some(prior), Some(_)) => Some(prior),
            (None, Some(remaining)) => Some(remaining),
        }
    }
}

// ── Response envelopes ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct GroupsResponse {
    #[serde(default)]
    pub groups: Vec<Group>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClientsResponse {
    #[serde(default)]
    pub clients: Vec<ClientEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DomainsResponse {
    #[serde(default)]
    pub domains: Vec<Domain>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListsResponse {
    #[serde(default)]
    pub lists: Vec<List>,
}

pub(crate) fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
