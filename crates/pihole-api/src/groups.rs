// Group endpoints
//
// Collection: `groups`, item: `groups/{name}`.

use serde::Serialize;
use tracing::debug;

use crate::client::PiholeClient;
use crate::error::{Error, ResultExt};
use crate::models::{Group, GroupsResponse, non_empty};

#[derive(Serialize)]
struct CreateGroupBody<'a> {
    name: &'a str,
    enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
}

#[derive(Serialize)]
struct UpdateGroupBody<'a> {
    name: &'a str,
    enabled: bool,
    comment: &'a str,
}

fn group_path(name: &str) -> String {
    format!("groups/{}", urlencoding::encode(name))
}

fn require_name(group: &Group) -> Result<(), Error> {
    if group.name.is_empty() {
        return Err(Error::Validation("group name is required".into()));
    }
    Ok(())
}

impl PiholeClient {
    async fn fetch_groups(&self, name: Option<&str>) -> Result<Vec<Group>, Error> {
        let path = non_empty(name).map_or_else(|| "groups".to_owned(), group_path);
        let resp: GroupsResponse = self.get(&path).await?;
        Ok(resp.groups)
    }

    async fn find_group(&self, name: &str) -> Result<Option<Group>, Error> {
        if name.is_empty() {
            return Ok(None);
        }
        let groups = self.fetch_groups(Some(name)).await?;
        Ok(groups.into_iter().find(|g| g.name == name))
    }

    /// List groups, optionally narrowed to one name.
    pub async fn list_groups(&self, name: Option<&str>) -> Result<Vec<Group>, Error> {
        self.fetch_groups(name)
            .await
            .context("list groups", name.unwrap_or("*"))
    }

    /// Fetch a group by exact name. `Ok(None)` if it does not exist.
    pub async fn get_group(&self, name: &str) -> Result<Option<Group>, Error> {
        self.find_group(name).await.context("get group", name)
    }

    pub async fn create_group(&self, group: &Group) -> Result<Group, Error> {
        require_name(group).context("create group", &group.name)?;

        let body = CreateGroupBody {
            name: &group.name,
            enabled: group.enabled,
            comment: non_empty(group.comment.as_deref()),
        };
        let resp: GroupsResponse = self
            .post("groups", &body)
            .await
            .context("create group", &group.name)?;

        resp.groups
            .into_iter()
            .next()
            .ok_or(Error::EmptyResponse { entity: "group" })
            .context("create group", &group.name)
    }

    /// Update the group currently called `name`. Renames go through
    /// `group.name`.
    pub async fn update_group(&self, name: &str, group: &Group) -> Result<Group, Error> {
        require_name(group).context("update group", name)?;

        let body = UpdateGroupBody {
            name: &group.name,
            enabled: group.enabled,
            comment: group.comment.as_deref().unwrap_or_default(),
        };
        let resp: GroupsResponse = self
            .put(&group_path(name), &body)
            .await
            .context("update group", name)?;

        if let Some(updated) = resp.groups.into_iter().next() {
            return Ok(updated);
        }

        debug!(from = name, to = %group.name, "empty update echo, re-fetching group");
        self.find_group(&group.name)
            .await
            .context("update group", name)?
            .ok_or_else(|| Error::NotFound {
                entity: "group",
                identity: group.name.clone(),
            })
            .context("update group", name)
    }

    pub async fn delete_group(&self, name: &str) -> Result<(), Error> {
        self.delete(&group_path(name))
            .await
            .context("delete group", name)
    }
}
