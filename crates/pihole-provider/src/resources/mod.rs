// Resource handlers, one module per managed object type

mod array_item;
mod blocking;
mod client;
mod config_section;
mod domain;
mod group;
mod list;

pub use array_item::{
    ArrayItemResource, CnameRecordResource, LocalDnsResource, NamedItem, StaticLeaseResource,
    UpstreamResource,
};
pub use blocking::{BlockingResource, BlockingState};
pub use client::ClientResource;
pub use config_section::ConfigSectionResource;
pub use domain::DomainResource;
pub use group::GroupResource;
pub use list::ListResource;

/// Treat a remote "not found" as absence rather than failure.
fn absent_if_not_found<T>(
    result: Result<Option<T>, pihole_api::Error>,
) -> Result<Option<T>, pihole_api::Error> {
    match result {
        Err(e) if e.is_not_found() => Ok(None),
        other => other,
    }
}
