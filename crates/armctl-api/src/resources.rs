// Microsoft.Resources endpoints
//
// Resource groups (create/read/delete/HEAD) and subscription-level
// resource provider registration.

use tracing::debug;

use crate::client::ArmClient;
use crate::error::Error;
use crate::models::{Provider, ResourceGroup};
use crate::response::OperationResponse;

impl ArmClient {
    fn resource_group_url(&self, name: &str) -> url::Url {
        self.subscription_url(&["resourcegroups", name], &self.profile().resources)
    }

    // ── Resource groups ──────────────────────────────────────────────

    /// Create or update a resource group.
    ///
    /// `PUT /subscriptions/{sub}/resourcegroups/{name}`
    pub async fn put_resource_group(
        &self,
        name: &str,
        group: &ResourceGroup,
    ) -> Result<OperationResponse<ResourceGroup>, Error> {
        debug!(name, location = %group.location, "creating resource group");
        self.put(self.resource_group_url(name), group).await
    }

    /// `GET /subscriptions/{sub}/resourcegroups/{name}`
    pub async fn get_resource_group(
        &self,
        name: &str,
    ) -> Result<OperationResponse<ResourceGroup>, Error> {
        self.get(self.resource_group_url(name)).await
    }

    /// Start deleting a resource group (ARM answers 202 and finishes async).
    ///
    /// `DELETE /subscriptions/{sub}/resourcegroups/{name}`
    pub async fn delete_resource_group(&self, name: &str) -> Result<OperationResponse<()>, Error> {
        debug!(name, "deleting resource group");
        self.delete(self.resource_group_url(name)).await
    }

    /// Whether the group exists; the body is `Some(true)` or `Some(false)`.
    ///
    /// `HEAD /subscriptions/{sub}/resourcegroups/{name}`
    pub async fn check_resource_group_exists(
        &self,
        name: &str,
    ) -> Result<OperationResponse<bool>, Error> {
        self.head_exists(self.resource_group_url(name)).await
    }

    // ── Providers ────────────────────────────────────────────────────

    /// Ask the subscription to register a resource provider namespace.
    ///
    /// `POST /subscriptions/{sub}/providers/{namespace}/register`
    pub async fn register_provider(
        &self,
        namespace: &str,
    ) -> Result<OperationResponse<Provider>, Error> {
        debug!(namespace, "registering resource provider");
        let url = self.subscription_url(
            &["providers", namespace, "register"],
            &self.profile().resources,
        );
        self.post_action(url).await
    }

    /// `GET /subscriptions/{sub}/providers/{namespace}`
    pub async fn get_provider(&self, namespace: &str) -> Result<OperationResponse<Provider>, Error> {
        let url = self.subscription_url(&["providers", namespace], &self.profile().resources);
        self.get(url).await
    }
}
