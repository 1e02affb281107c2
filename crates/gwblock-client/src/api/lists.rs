//! Gateway domain list endpoints.

use crate::GatewayClient;
use gwblock_core::{
    ApiResponse, CreateListRequest, ListItem, PatchListRequest, RemoteList, Result,
};

/// Gateway domain list endpoints
pub struct ListsApi<'a> {
    client: &'a GatewayClient,
}

impl<'a> ListsApi<'a> {
    pub(crate) fn new(client: &'a GatewayClient) -> Self {
        Self { client }
    }

    /// Fetch all lists whose name starts with the owned prefix.
    ///
    /// Lists without the prefix belong to someone else and are dropped here
    /// so no downstream code can touch them.
    pub async fn all(&self, prefix: &str) -> Result<Vec<RemoteList>> {
        let response: ApiResponse<Vec<RemoteList>> = self.client.get("/lists").await?;
        Ok(response
            .into_collection()
            .into_iter()
            .filter(|list| list.is_owned_by(prefix))
            .collect())
    }

    /// Create a DOMAIN-type list from a chunk of domains
    pub async fn create(&self, name: &str, domains: &[String]) -> Result<RemoteList> {
        let request = CreateListRequest::domains(name, domains.iter().cloned());
        let response: ApiResponse<RemoteList> = self.client.post("/lists", &request).await?;
        response.into_result("/lists")
    }

    /// Append to / remove from an existing list's items
    pub async fn update_items(&self, id: &str, patch: &PatchListRequest) -> Result<RemoteList> {
        let path = format!("/lists/{id}");
        let response: ApiResponse<RemoteList> = self.client.patch(&path, patch).await?;
        response.into_result(&path)
    }

    /// Delete a list
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("/lists/{id}")).await
    }

    /// Fetch the items of a list
    pub async fn items(&self, id: &str, limit: usize) -> Result<Vec<ListItem>> {
        let response: ApiResponse<Vec<ListItem>> = self
            .client
            .get(&format!("/lists/{id}/items?limit={limit}"))
            .await?;
        Ok(response.into_collection())
    }
}
