// Client endpoints
//
// Collection: `clients`, item: `clients/{client}`. The identifier may be
// an IP, MAC, hostname, CIDR subnet or `:interface`, so it is always
// percent-encoded before it becomes a path segment.

use serde::Serialize;
use tracing::debug;

use crate::client::PiholeClient;
use crate::error::{Error, ResultExt};
use crate::models::{ClientEntry, ClientsResponse, non_empty};

#[derive(Serialize)]
struct CreateClientBody<'a> {
    client: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    #[serde(skip_serializing_if = "<[i64]>::is_empty")]
    groups: &'a [i64],
}

#[derive(Serialize)]
struct UpdateClientBody<'a> {
    client: &'a str,
    comment: &'a str,
    groups: &'a [i64],
}

fn client_path(client: &str) -> String {
    format!("clients/{}", urlencoding::encode(client))
}

fn require_client(entry: &ClientEntry) -> Result<(), Error> {
    if entry.client.is_empty() {
        return Err(Error::Validation("client identifier is required".into()));
    }
    Ok(())
}

impl PiholeClient {
    async fn fetch_clients(&self, client: Option<&str>) -> Result<Vec<ClientEntry>, Error> {
        let path = non_empty(client).map_or_else(|| "clients".to_owned(), client_path);
        let resp: ClientsResponse = self.get(&path).await?;
        Ok(resp.clients)
    }

    async fn find_client(&self, client: &str) -> Result<Option<ClientEntry>, Error> {
        if client.is_empty() {
            return Ok(None);
        }
        let clients = self.fetch_clients(Some(client)).await?;
        Ok(clients.into_iter().find(|c| c.client == client))
    }

    pub async fn list_clients(&self, client: Option<&str>) -> Result<Vec<ClientEntry>, Error> {
        self.fetch_clients(client)
            .await
            .context("list clients", client.unwrap_or("*"))
    }

    pub async fn get_client(&self, client: &str) -> Result<Option<ClientEntry>, Error> {
        self.find_client(client).await.context("get client", client)
    }

    pub async fn create_client(&self, entry: &ClientEntry) -> Result<ClientEntry, Error> {
        require_client(entry).context("create client", &entry.client)?;

        let body = CreateClientBody {
            client: &entry.client,
            comment: non_empty(entry.comment.as_deref()),
            groups: &entry.groups,
        };
        let resp: ClientsResponse = self
            .post("clients", &body)
            .await
            .context("create client", &entry.client)?;

        resp.clients
            .into_iter()
            .next()
            .ok_or(Error::EmptyResponse { entity: "client" })
            .context("create client", &entry.client)
    }

    pub async fn update_client(
        &self,
        client: &str,
        entry: &ClientEntry,
    ) -> Result<ClientEntry, Error> {
        require_client(entry).context("update client", client)?;

        let body = UpdateClientBody {
            client: &entry.client,
            comment: entry.comment.as_deref().unwrap_or_default(),
            groups: &entry.groups,
        };
        let resp: ClientsResponse = self
            .put(&client_path(client), &body)
            .await
            .context("update client", client)?;

        if let Some(updated) = resp.clients.into_iter().next() {
            return Ok(updated);
        }

        debug!(from = client, to = %entry.client, "empty update echo, re-fetching client");
        self.find_client(&entry.client)
            .await
            .context("update client", client)?
            .ok_or_else(|| Error::NotFound {
                entity: "client",
                identity: entry.client.clone(),
            })
            .context("update client", client)
    }

    pub async fn delete_client(&self, client: &str) -> Result<(), Error> {
        self.delete(&client_path(client))
            .await
            .context("delete client", client)
    }
}
