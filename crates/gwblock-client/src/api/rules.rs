//! Gateway firewall policy endpoints.

use crate::GatewayClient;
use gwblock_core::{ApiResponse, GatewayPolicy, PolicyRequest, Result};

/// Gateway firewall policy endpoints
pub struct PoliciesApi<'a> {
    client: &'a GatewayClient,
}

impl<'a> PoliciesApi<'a> {
    pub(crate) fn new(client: &'a GatewayClient) -> Self {
        Self { client }
    }

    /// Fetch all policies whose name starts with the owned prefix
    pub async fn all(&self, prefix: &str) -> Result<Vec<GatewayPolicy>> {
        let response: ApiResponse<Vec<GatewayPolicy>> = self.client.get("/rules").await?;
        Ok(response
            .into_collection()
            .into_iter()
            .filter(|policy| policy.is_owned_by(prefix))
            .collect())
    }

    /// Create a DNS block policy over the given list IDs
    pub async fn create(&self, name: &str, list_ids: &[String]) -> Result<GatewayPolicy> {
        let request = PolicyRequest::block_dns(name, list_ids);
        let response: ApiResponse<GatewayPolicy> = self.client.post("/rules", &request).await?;
        response.into_result("/rules")
    }

    /// Replace an existing policy with a new list ID set
    pub async fn update(
        &self,
        id: &str,
        name: &str,
        list_ids: &[String],
    ) -> Result<GatewayPolicy> {
        let request = PolicyRequest::block_dns(name, list_ids);
        let path = format!("/rules/{id}");
        let response: ApiResponse<GatewayPolicy> = self.client.put(&path, &request).await?;
        response.into_result(&path)
    }

    /// Delete a policy
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("/rules/{id}")).await
    }
}
