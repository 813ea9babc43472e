// Microsoft.Network endpoints
//
// Virtual networks, subnets, public IP addresses, and network interfaces.
// Creates are single PUTs; the returned body reflects the service's initial
// provisioning state and is not polled to completion.

use tracing::debug;

use crate::client::ArmClient;
use crate::error::Error;
use crate::models::{NetworkInterface, PublicIpAddress, Subnet, VirtualNetwork};
use crate::response::OperationResponse;

const PROVIDER: &str = "Microsoft.Network";

impl ArmClient {
    fn network_url(&self, resource_group: &str, segments: &[&str]) -> url::Url {
        self.resource_url(
            resource_group,
            PROVIDER,
            segments,
            &self.profile().network,
        )
    }

    // ── Virtual networks ─────────────────────────────────────────────

    /// `PUT .../virtualNetworks/{name}`
    pub async fn put_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
        vnet: &VirtualNetwork,
    ) -> Result<OperationResponse<VirtualNetwork>, Error> {
        debug!(resource_group, name, "creating virtual network");
        let url = self.network_url(resource_group, &["virtualNetworks", name]);
        self.put(url, vnet).await
    }

    /// `GET .../virtualNetworks/{name}`
    pub async fn get_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<OperationResponse<VirtualNetwork>, Error> {
        let url = self.network_url(resource_group, &["virtualNetworks", name]);
        self.get(url).await
    }

    // ── Subnets ──────────────────────────────────────────────────────

    /// `PUT .../virtualNetworks/{vnet}/subnets/{name}`
    pub async fn put_subnet(
        &self,
        resource_group: &str,
        vnet_name: &str,
        name: &str,
        subnet: &Subnet,
    ) -> Result<OperationResponse<Subnet>, Error> {
        debug!(resource_group, vnet_name, name, "creating subnet");
        let url = self.network_url(
            resource_group,
            &["virtualNetworks", vnet_name, "subnets", name],
        );
        self.put(url, subnet).await
    }

    /// `GET .../virtualNetworks/{vnet}/subnets/{name}`
    pub async fn get_subnet(
        &self,
        resource_group: &str,
        vnet_name: &str,
        name: &str,
    ) -> Result<OperationResponse<Subnet>, Error> {
        let url = self.network_url(
            resource_group,
            &["virtualNetworks", vnet_name, "subnets", name],
        );
        self.get(url).await
    }

    // ── Public IP addresses ──────────────────────────────────────────

    /// `PUT .../publicIPAddresses/{name}`
    pub async fn put_public_ip_address(
        &self,
        resource_group: &str,
        name: &str,
        address: &PublicIpAddress,
    ) -> Result<OperationResponse<PublicIpAddress>, Error> {
        debug!(resource_group, name, "creating public IP address");
        let url = self.network_url(resource_group, &["publicIPAddresses", name]);
        self.put(url, address).await
    }

    /// `GET .../publicIPAddresses/{name}`
    pub async fn get_public_ip_address(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<OperationResponse<PublicIpAddress>, Error> {
        let url = self.network_url(resource_group, &["publicIPAddresses", name]);
        self.get(url).await
    }

    // ── Network interfaces ───────────────────────────────────────────

    /// `PUT .../networkInterfaces/{name}`
    pub async fn put_network_interface(
        &self,
        resource_group: &str,
        name: &str,
        nic: &NetworkInterface,
    ) -> Result<OperationResponse<NetworkInterface>, Error> {
        debug!(resource_group, name, "creating network interface");
        let url = self.network_url(resource_group, &["networkInterfaces", name]);
        self.put(url, nic).await
    }

    /// `GET .../networkInterfaces/{name}`
    pub async fn get_network_interface(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<OperationResponse<NetworkInterface>, Error> {
        let url = self.network_url(resource_group, &["networkInterfaces", name]);
        self.get(url).await
    }
}
