// ── Network controller ──
//
// Create/get for virtual networks, subnets, public IP addresses and network
// interfaces. Dependent creates look up their prerequisites first and stop
// at the first failed lookup.

use std::sync::Arc;

use armctl_api::models::{NetworkInterface, PublicIpAddress, Subnet, VirtualNetwork};
use armctl_api::{ArmClient, OperationResponse};
use tracing::info;

use crate::api::NetworkApi;
use crate::config::ArmConfig;
use crate::error::CoreError;
use crate::registry::{self, ClientRegistry, NETWORK_CLIENT};
use crate::requests::{NetworkInterfaceRequest, PublicIpRequest, SubnetRequest, VirtualNetworkRequest};
use crate::CoreResult;

/// `User-Agent` of the shared network client.
pub const NETWORK_USER_AGENT: &str =
    concat!("armctl-network-controller/", env!("CARGO_PKG_VERSION"));

pub struct NetworkController<C = ArmClient> {
    client: Option<Arc<C>>,
}

impl NetworkController<ArmClient> {
    /// Controller backed by the process-wide network client.
    ///
    /// The first call with a usable credential creates the client; later
    /// calls reuse it regardless of the config they pass.
    pub fn new(config: &ArmConfig) -> Self {
        Self::from_registry(&NETWORK_CLIENT, config)
    }

    pub fn from_registry(registry: &ClientRegistry<ArmClient>, config: &ArmConfig) -> Self {
        Self {
            client: registry::acquire(registry, config, NETWORK_USER_AGENT),
        }
    }
}

impl<C: NetworkApi> NetworkController<C> {
    pub fn with_client(client: Arc<C>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// A controller whose every operation fails with `ClientNotInstantiated`.
    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&C, CoreError> {
        self.client.as_deref().ok_or(CoreError::ClientNotInstantiated)
    }

    // ── Virtual networks ─────────────────────────────────────────────

    pub async fn create_virtual_network(
        &self,
        request: &VirtualNetworkRequest,
    ) -> CoreResult<VirtualNetwork> {
        let client = self.client()?;
        let vnet = request.to_model()?;
        info!(
            resource_group = %request.resource_group,
            name = %request.name,
            subnets = request.subnets.len(),
            "creating virtual network"
        );
        Ok(client
            .put_virtual_network(&request.resource_group, &request.name, &vnet)
            .await?)
    }

    pub async fn get_virtual_network(
        &self,
        resource_group: &str,
        name: &str,
    ) -> CoreResult<VirtualNetwork> {
        let client = self.client()?;
        Ok(client.get_virtual_network(resource_group, name).await?)
    }

    // ── Subnets ──────────────────────────────────────────────────────

    /// Add a subnet to an existing virtual network.
    pub async fn add_subnet(&self, request: &SubnetRequest) -> CoreResult<Subnet> {
        let client = self.client()?;
        let subnet = request.to_model()?;

        self.get_virtual_network(&request.resource_group, &request.vnet_name)
            .await
            .map_err(|e| CoreError::dependency("virtual network", &request.vnet_name, e))?;

        info!(
            resource_group = %request.resource_group,
            vnet = %request.vnet_name,
            name = %request.name,
            "adding subnet"
        );
        Ok(client
            .put_subnet(
                &request.resource_group,
                &request.vnet_name,
                &request.name,
                &subnet,
            )
            .await?)
    }

    pub async fn get_subnet(
        &self,
        resource_group: &str,
        vnet_name: &str,
        name: &str,
    ) -> CoreResult<Subnet> {
        let client = self.client()?;
        Ok(client.get_subnet(resource_group, vnet_name, name).await?)
    }

    // ── Public IP addresses ──────────────────────────────────────────

    pub async fn create_public_ip_address(
        &self,
        request: &PublicIpRequest,
    ) -> CoreResult<PublicIpAddress> {
        let client = self.client()?;
        let address = request.to_model();
        info!(
            resource_group = %request.resource_group,
            name = %request.name,
            allocation = %request.allocation,
            "creating public IP address"
        );
        Ok(client
            .put_public_ip_address(&request.resource_group, &request.name, &address)
            .await?)
    }

    pub async fn get_public_ip_address(
        &self,
        resource_group: &str,
        name: &str,
    ) -> CoreResult<PublicIpAddress> {
        let client = self.client()?;
        Ok(client.get_public_ip_address(resource_group, name).await?)
    }

    // ── Network interfaces ───────────────────────────────────────────

    /// Create a NIC whose single IP configuration references an existing
    /// subnet and public IP address.
    pub async fn create_network_interface(
        &self,
        request: &NetworkInterfaceRequest,
    ) -> CoreResult<NetworkInterface> {
        let client = self.client()?;

        let subnet = self
            .get_subnet(
                &request.resource_group,
                &request.vnet_name,
                &request.subnet_name,
            )
            .await
            .and_then(|r| require_body("subnet", &request.subnet_name, r))
            .map_err(|e| CoreError::dependency("subnet", &request.subnet_name, e))?;

        let public_ip = self
            .get_public_ip_address(&request.resource_group, &request.public_ip_name)
            .await
            .and_then(|r| require_body("public IP address", &request.public_ip_name, r))
            .map_err(|e| CoreError::dependency("public IP address", &request.public_ip_name, e))?;

        let nic = request.to_model(subnet, public_ip);
        info!(
            resource_group = %request.resource_group,
            name = %request.name,
            subnet = %request.subnet_name,
            public_ip = %request.public_ip_name,
            "creating network interface"
        );
        Ok(client
            .put_network_interface(&request.resource_group, &request.name, &nic)
            .await?)
    }

    pub async fn get_network_interface(
        &self,
        resource_group: &str,
        name: &str,
    ) -> CoreResult<NetworkInterface> {
        let client = self.client()?;
        Ok(client.get_network_interface(resource_group, name).await?)
    }
}

/// A lookup that succeeded but came back without a body is unusable as a reference.
///
/// The error carries no remote status: the service did not fail, its answer
/// was just empty.
fn require_body<T>(
    resource: &str,
    name: &str,
    response: OperationResponse<T>,
) -> Result<T, CoreError> {
    response.body.ok_or_else(|| CoreError::Remote {
        status: None,
        code: None,
        message: format!(
            "{resource} '{name}' lookup answered {} without a body",
            response.status.as_u16()
        ),
        request_id: response.request_id,
    })
}
