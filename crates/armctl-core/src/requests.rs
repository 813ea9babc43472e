// ── Controller request types ──
//
// Caller-facing inputs for the create operations. Each knows how to turn
// itself into the wire model, validating fields on the way.

use std::collections::HashMap;

use armctl_api::models::{
    AddressSpace, IpAllocationMethod, IpConfigurationProperties, NetworkInterface,
    NetworkInterfaceIpConfiguration, NetworkInterfaceProperties, PublicIpAddress,
    PublicIpAddressProperties, ResourceGroup, Subnet, SubnetProperties, VirtualNetwork,
    VirtualNetworkProperties,
};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Ordered `(key, value)` tag pairs as supplied by the caller.
pub type Tags = Vec<(String, String)>;

/// Copy tags in input order; a repeated key keeps its last value.
pub fn apply_tags(tags: &[(String, String)]) -> HashMap<String, String> {
    let mut map = HashMap::with_capacity(tags.len());
    for (key, value) in tags {
        map.insert(key.clone(), value.clone());
    }
    map
}

fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(field, format!("{field} must not be empty")));
    }
    Ok(())
}

// ── Public IP addresses ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicIpRequest {
    pub resource_group: String,
    pub name: String,
    pub location: String,
    pub allocation: IpAllocationMethod,
    /// Literal address; only used with static allocation.
    pub ip_address: Option<String>,
    pub tags: Tags,
}

impl PublicIpRequest {
    pub fn to_model(&self) -> PublicIpAddress {
        let ip_address = match self.allocation {
            IpAllocationMethod::Dynamic => None,
            IpAllocationMethod::Static => self.ip_address.clone().filter(|ip| !ip.is_empty()),
        };

        PublicIpAddress {
            location: Some(self.location.clone()),
            tags: apply_tags(&self.tags),
            properties: PublicIpAddressProperties {
                allocation_method: Some(self.allocation),
                ip_address,
                ..PublicIpAddressProperties::default()
            },
            ..PublicIpAddress::default()
        }
    }
}

// ── Virtual networks & subnets ──────────────────────────────────────

/// A subnet declared inline with its virtual network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetSpec {
    pub name: String,
    pub address_prefix: Option<String>,
}

impl SubnetSpec {
    pub fn new(name: impl Into<String>, address_prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address_prefix: Some(address_prefix.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VirtualNetworkRequest {
    pub resource_group: String,
    pub name: String,
    pub location: String,
    pub address_prefixes: Vec<String>,
    pub subnets: Vec<SubnetSpec>,
    pub tags: Tags,
}

impl VirtualNetworkRequest {
    /// Build the wire model; any subnet without a prefix rejects the whole request.
    pub fn to_model(&self) -> Result<VirtualNetwork, CoreError> {
        let mut subnets = Vec::with_capacity(self.subnets.len());
        for spec in &self.subnets {
            let prefix = match spec.address_prefix.as_deref() {
                Some(p) if !p.trim().is_empty() => p.to_owned(),
                _ => {
                    return Err(CoreError::validation(
                        "subnets",
                        format!("Subnet address space is not valid. Subnet: {}", spec.name),
                    ));
                }
            };
            subnets.push(Subnet {
                name: Some(spec.name.clone()),
                properties: SubnetProperties {
                    address_prefix: Some(prefix),
                    ..SubnetProperties::default()
                },
                ..Subnet::default()
            });
        }

        Ok(VirtualNetwork {
            location: Some(self.location.clone()),
            tags: apply_tags(&self.tags),
            properties: VirtualNetworkProperties {
                address_space: Some(AddressSpace {
                    address_prefixes: self.address_prefixes.clone(),
                }),
                subnets,
                provisioning_state: None,
            },
            ..VirtualNetwork::default()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetRequest {
    pub resource_group: String,
    pub vnet_name: String,
    pub name: String,
    pub address_prefix: String,
}

impl SubnetRequest {
    pub fn to_model(&self) -> Result<Subnet, CoreError> {
        if self.address_prefix.trim().is_empty() {
            return Err(CoreError::validation(
                "address_prefix",
                format!("Subnet address space is not valid. Subnet: {}", self.name),
            ));
        }
        Ok(Subnet {
            properties: SubnetProperties {
                address_prefix: Some(self.address_prefix.clone()),
                ..SubnetProperties::default()
            },
            ..Subnet::default()
        })
    }
}

// ── Network interfaces ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterfaceRequest {
    pub resource_group: String,
    pub name: String,
    pub location: String,
    pub vnet_name: String,
    pub subnet_name: String,
    pub public_ip_name: String,
    /// Private address allocation for the single IP configuration.
    pub private_allocation: IpAllocationMethod,
    pub tags: Tags,
}

impl NetworkInterfaceRequest {
    /// Name given to the interface's only IP configuration.
    pub fn ip_configuration_name(&self) -> String {
        format!("{}-ipconfig", self.name)
    }

    /// Build the wire model around the already-fetched subnet and address.
    pub fn to_model(&self, subnet: Subnet, public_ip: PublicIpAddress) -> NetworkInterface {
        NetworkInterface {
            location: Some(self.location.clone()),
            tags: apply_tags(&self.tags),
            properties: NetworkInterfaceProperties {
                ip_configurations: vec![NetworkInterfaceIpConfiguration {
                    name: Some(self.ip_configuration_name()),
                    properties: IpConfigurationProperties {
                        private_allocation_method: Some(self.private_allocation),
                        public_ip_address: Some(public_ip),
                        subnet: Some(subnet),
                        ..IpConfigurationProperties::default()
                    },
                    ..NetworkInterfaceIpConfiguration::default()
                }],
                ..NetworkInterfaceProperties::default()
            },
            ..NetworkInterface::default()
        }
    }
}

// ── Resource groups ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroupRequest {
    pub name: String,
    pub location: String,
    pub tags: Tags,
}

impl ResourceGroupRequest {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            tags: Tags::new(),
        }
    }

    pub fn to_model(&self) -> Result<ResourceGroup, CoreError> {
        require_non_empty("location", &self.location)?;
        Ok(ResourceGroup {
            location: self.location.clone(),
            tags: apply_tags(&self.tags),
            ..ResourceGroup::default()
        })
    }
}
