// ── Management client seams ──
//
// Controllers talk to the management API through these traits so they can
// be exercised against in-memory fakes. `ArmClient` is the production
// implementation.

use std::future::Future;

use armctl_api::models::{
    NetworkInterface, Provider, PublicIpAddress, ResourceGroup, Subnet, VirtualNetwork,
};
use armctl_api::{ArmClient, Error, OperationResponse};

type ApiResult<T> = Result<OperationResponse<T>, Error>;

/// Network operations used by `NetworkController`.
pub trait NetworkApi: Send + Sync {
    fn put_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        vnet: &VirtualNetwork,
    ) -> impl Future<Output = ApiResult<VirtualNetwork>> + Send;

    fn get_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
    ) -> impl Future<Output = ApiResult<VirtualNetwork>> + Send;

    fn put_subnet(
        &self,
        resource_group: &str,
        vnet_name: &str,
        name: &str,
        subnet: &Subnet,
    ) -> impl Future<Output = ApiResult<Subnet>> + Send;

    fn get_subnet(
        &self,
        resource_group: &str,
        vnet_name: &str,
        name: &str,
    ) -> impl Future<Output = ApiResult<Subnet>> + Send;

    fn put_public_ip_address(
        &self,
        resource_group: &str,
        name: &str,
        address: &PublicIpAddress,
    ) -> impl Future<Output = ApiResult<PublicIpAddress>> + Send;

    fn get_public_ip_address(
        &self,
        resource_group: &str,
        name: &str,
    ) -> impl Future<Output = ApiResult<PublicIpAddress>> + Send;

    fn put_network_interface(
        &self,
        resource_group: &str,
        name: &str,
        nic: &NetworkInterface,
    ) -> impl Future<Output = ApiResult<NetworkInterface>> + Send;

    fn get_network_interface(
        &self,
        resource_group: &str,
        name: &str,
    ) -> impl Future<Output = ApiResult<NetworkInterface>> + Send;
}

/// Resource group and provider operations used by `ResourcesController`.
pub trait ResourcesApi: Send + Sync {
    fn put_resource_group(
        &self,
        name: &str,
        group: &ResourceGroup,
    ) -> impl Future<Output = ApiResult<ResourceGroup>> + Send;

    fn get_resource_group(&self, name: &str) -> impl Future<Output = ApiResult<ResourceGroup>> + Send;

    fn delete_resource_group(&self, name: &str) -> impl Future<Output = ApiResult<()>> + Send;

    fn check_resource_group_exists(
        &self,
        name: &str,
    ) -> impl Future<Output = ApiResult<bool>> + Send;

    fn register_provider(&self, namespace: &str) -> impl Future<Output = ApiResult<Provider>> + Send;

    fn get_provider(&self, namespace: &str) -> impl Future<Output = ApiResult<Provider>> + Send;
}

// Each impl forwards to the inherent method of the same name.

impl NetworkApi for ArmClient {
    async fn put_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        vnet: &VirtualNetwork,
    ) -> ApiResult<VirtualNetwork> {
        ArmClient::put_virtual_network(self, resource_group, name, vnet).await
    }

    async fn get_virtual_network(&self, resource_group: &str, name: &str) -> ApiResult<VirtualNetwork> {
        ArmClient::get_virtual_network(self, resource_group, name).await
    }

    async fn put_subnet(
        &self,
        resource_group: &str,
        vnet_name: &str,
        name: &str,
        subnet: &Subnet,
    ) -> ApiResult<Subnet> {
        ArmClient::put_subnet(self, resource_group, vnet_name, name, subnet).await
    }

    async fn get_subnet(&self, resource_group: &str, vnet_name: &str, name: &str) -> ApiResult<Subnet> {
        ArmClient::get_subnet(self, resource_group, vnet_name, name).await
    }

    async fn put_public_ip_address(
        &self,
        resource_group: &str,
        name: &str,
        address: &PublicIpAddress,
    ) -> ApiResult<PublicIpAddress> {
        ArmClient::put_public_ip_address(self, resource_group, name, address).await
    }

    async fn get_public_ip_address(
        &self,
        resource_group: &str,
        name: &str,
    ) -> ApiResult<PublicIpAddress> {
        ArmClient::get_public_ip_address(self, resource_group, name).await
    }

    async fn put_network_interface(
        &self,
        resource_group: &str,
        name: &str,
        nic: &NetworkInterface,
    ) -> ApiResult<NetworkInterface> {
        ArmClient::put_network_interface(self, resource_group, name, nic).await
    }

    async fn get_network_interface(
        &self,
        resource_group: &str,
        name: &str,
    ) -> ApiResult<NetworkInterface> {
        ArmClient::get_network_interface(self, resource_group, name).await
    }
}

impl ResourcesApi for ArmClient {
    async fn put_resource_group(&self, name: &str, group: &ResourceGroup) -> ApiResult<ResourceGroup> {
        ArmClient::put_resource_group(self, name, group).await
    }

    async fn get_resource_group(&self, name: &str) -> ApiResult<ResourceGroup> {
        ArmClient::get_resource_group(self, name).await
    }

    async fn delete_resource_group(&self, name: &str) -> ApiResult<()> {
        ArmClient::delete_resource_group(self, name).await
    }

    async fn check_resource_group_exists(&self, name: &str) -> ApiResult<bool> {
        ArmClient::check_resource_group_exists(self, name).await
    }

    async fn register_provider(&self, namespace: &str) -> ApiResult<Provider> {
        ArmClient::register_provider(self, namespace).await
    }

    async fn get_provider(&self, namespace: &str) -> ApiResult<Provider> {
        ArmClient::get_provider(self, namespace).await
    }
}
