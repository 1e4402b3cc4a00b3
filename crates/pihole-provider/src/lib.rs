// pihole-provider: Resource handlers over the Pi-hole API client
//
// Each handler maps one managed object type (group, domain, config
// section, ...) onto create/read/update/delete/import calls against a
// shared `PiholeClient`, including the policies a declarative engine
// needs on top of the raw API.

mod data_sources;
pub mod error;
pub mod provider;
pub mod resource;
pub mod resources;

pub use error::{ProviderError, Result};
pub use provider::Provider;
pub use resource::Resource;
pub use resources::{
    ArrayItemResource, BlockingResource, BlockingState, ClientResource, CnameRecordResource,
    ConfigSectionResource, DomainResource, GroupResource, ListResource, LocalDnsResource,
    NamedItem, StaticLeaseResource, UpstreamResource,
};
