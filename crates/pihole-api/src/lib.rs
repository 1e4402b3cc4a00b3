// pihole-api: Async Rust client for the Pi-hole v6 REST API
//
// `PiholeClient` manages the session and retries; the entity modules add
// typed operations for groups, clients, domains, lists, blocking and the
// configuration document.

mod auth;
pub mod blocking;
pub mod client;
pub mod clients;
pub mod config;
pub mod config_items;
pub mod domains;
pub mod error;
pub mod groups;
pub mod lists;
pub mod models;
pub mod session;
pub mod transport;

pub use client::{ClientConfig, PiholeClient};
pub use config::{ConfigSection, PiholeConfig};
pub use config_items::{CnameRecord, ConfigArrayItem, LocalDnsHost, StaticLease, Upstream};
pub use domains::DomainFilter;
pub use error::{Error, ResultExt};
pub use lists::ListFilter;
pub use models::{
    Blocking, BlockingStatus, ClientEntry, Domain, DomainKey, DomainKind, DomainType, Group, List,
    ListKey, ListType,
};
pub use session::{RENEWAL_BUFFER, SessionGrant};
pub use transport::{RetryPolicy, TransportConfig};
