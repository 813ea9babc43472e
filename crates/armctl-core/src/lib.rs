// armctl-core: Network and resources controllers over the management API.

pub mod api;
pub mod config;
pub mod error;
pub mod network;
pub mod poll;
pub mod registry;
pub mod requests;
pub mod resources;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::{NetworkApi, ResourcesApi};
pub use config::{ArmConfig, TlsVerification};
pub use error::CoreError;
pub use network::{NETWORK_USER_AGENT, NetworkController};
pub use poll::{PollPolicy, Sleeper, TokioSleeper};
pub use registry::{ClientRegistry, NETWORK_CLIENT, RESOURCES_CLIENT};
pub use requests::{
    NetworkInterfaceRequest, PublicIpRequest, ResourceGroupRequest, SubnetRequest, SubnetSpec,
    Tags, VirtualNetworkRequest,
};
pub use resources::{RESOURCES_USER_AGENT, ResourcesController};

// Model and client types callers need alongside the controllers.
pub use armctl_api::models;
pub use armctl_api::models::{
    IpAllocationMethod, NetworkInterface, Provider, PublicIpAddress, ResourceGroup, Subnet,
    VirtualNetwork,
};
pub use armctl_api::{
    ApiProfile, AuthStrategy, Credentials, OperationResponse, ServicePrincipal, StatusCode,
};

/// Outcome of every controller operation.
pub type CoreResult<T> = Result<OperationResponse<T>, CoreError>;
