// Resource handler contract
//
// One handler per remote object type. The reconciliation engine that
// drives these (plans, diffs, stored state) lives elsewhere; a handler only
// knows how to move one object between its desired and remote state.

use async_trait::async_trait;

use crate::error::Result;

/// CRUD-plus-import contract for a managed object type.
///
/// `State` is both the desired configuration passed in and the observed
/// configuration handed back, so what `create` returns can be fed to a
/// later `read` unchanged.
#[async_trait]
pub trait Resource: Send + Sync {
    type State: Clone + Send + Sync + 'static;

    /// Type name used in errors and logs, e.g. `"pihole_group"`.
    const TYPE_NAME: &'static str;

    /// Create the object and return it as the appliance stored it.
    async fn create(&self, desired: &Self::State) -> Result<Self::State>;

    /// Refresh `current` from the appliance. `Ok(None)` means the object
    /// is gone and should be dropped from state.
    async fn read(&self, current: &Self::State) -> Result<Option<Self::State>>;

    /// Move the object from `prior` to `desired`. Identity changes are
    /// allowed where the API supports them.
    async fn update(&self, prior: &Self::State, desired: &Self::State) -> Result<Self::State>;

    async fn delete(&self, current: &Self::State) -> Result<()>;

    /// Adopt an existing object by its import id.
    async fn import(&self, id: &str) -> Result<Self::State>;
}
