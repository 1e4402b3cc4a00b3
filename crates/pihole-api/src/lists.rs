// List (adlist / allowlist subscription) endpoints
//
// Items live at `lists/{address}?type={type}`. The address is usually a
// URL and must be percent-encoded as a single segment.

use serde::Serialize;
use tracing::debug;

use crate::client::PiholeClient;
use crate::error::{Error, ResultExt};
use crate::models::{List, ListKey, ListType, ListsResponse, non_empty};

/// Optional narrowing for [`PiholeClient::list_lists`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub list_type: Option<ListType>,
    pub address: Option<String>,
}

impl ListFilter {
    fn path(&self) -> String {
        let mut path = match non_empty(self.address.as_deref()) {
            Some(address) => format!("lists/{}", urlencoding::encode(address)),
            None => "lists".to_owned(),
        };
        if let Some(list_type) = self.list_type {
            path.push_str("?type=");
            path.push_str(list_type.as_ref());
        }
        path
    }
}

impl From<&ListKey> for ListFilter {
    fn from(key: &ListKey) -> Self {
        Self {
            list_type: Some(key.list_type),
            address: Some(key.address.clone()),
        }
    }
}

#[derive(Serialize)]
struct CreateListBody<'a> {
    address: &'a str,
    enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    #[serde(skip_serializing_if = "<[i64]>::is_empty")]
    groups: &'a [i64],
}

#[derive(Serialize)]
struct UpdateListBody<'a> {
    address: &'a str,
    enabled: bool,
    comment: &'a str,
    groups: &'a [i64],
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    list_type: Option<ListType>,
}

fn list_path(key: &ListKey) -> String {
    format!(
        "lists/{}?type={}",
        urlencoding::encode(&key.address),
        key.list_type
    )
}

fn require_address(list: &List) -> Result<(), Error> {
    if list.address.is_empty() {
        return Err(Error::Validation("list address is required".into()));
    }
    Ok(())
}

impl PiholeClient {
    async fn fetch_lists(&self, filter: &ListFilter) -> Result<Vec<List>, Error> {
        let resp: ListsResponse = self.get(&filter.path()).await?;
        Ok(resp.lists)
    }

    async fn find_list(&self, key: &ListKey) -> Result<Option<List>, Error> {
        if key.address.is_empty() {
            return Ok(None);
        }
        let lists = self.fetch_lists(&ListFilter::from(key)).await?;
        Ok(lists
            .into_iter()
            .find(|l| l.address == key.address && l.list_type == key.list_type))
    }

    pub async fn list_lists(&self, filter: &ListFilter) -> Result<Vec<List>, Error> {
        self.fetch_lists(filter)
            .await
            .context("list lists", filter.path())
    }

    pub async fn get_list(&self, key: &ListKey) -> Result<Option<List>, Error> {
        self.find_list(key).await.context("get list", key)
    }

    pub async fn create_list(&self, list: &List) -> Result<List, Error> {
        let key = list.key();
        require_address(list).context("create list", &key)?;

        let body = CreateListBody {
            address: &list.address,
            enabled: list.enabled,
            comment: non_empty(list.comment.as_deref()),
            groups: &list.groups,
        };
        let path = format!("lists?type={}", list.list_type);
        let resp: ListsResponse = self
            .post(&path, &body)
            .await
            .context("create list", &key)?;

        resp.lists
            .into_iter()
            .next()
            .ok_or(Error::EmptyResponse { entity: "list" })
            .context("create list", &key)
    }

    /// Update the list addressed by `original`; a type change is sent in
    /// the body.
    pub async fn update_list(&self, original: &ListKey, list: &List) -> Result<List, Error> {
        require_address(list).context("update list", original)?;

        let body = UpdateListBody {
            address: &list.address,
            enabled: list.enabled,
            comment: list.comment.as_deref().unwrap_or_default(),
            groups: &list.groups,
            list_type: (list.list_type != original.list_type).then_some(list.list_type),
        };
        let resp: ListsResponse = self
            .put(&list_path(original), &body)
            .await
            .context("update list", original)?;

        if let Some(updated) = resp.lists.into_iter().next() {
            return Ok(updated);
        }

        let key = list.key();
        debug!(from = %original, to = %key, "empty update echo, re-fetching list");
        self.find_list(&key)
            .await
            .context("update list", original)?
            .ok_or_else(|| Error::NotFound {
                entity: "list",
                identity: key.to_string(),
            })
            .context("update list", original)
    }

    pub async fn delete_list(&self, key: &ListKey) -> Result<(), Error> {
        self.delete(&list_path(key))
            .await
            .context("delete list", key)
    }
}
