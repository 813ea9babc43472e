// ── Resources controller ──
//
// Resource group lifecycle and resource provider registration.

use std::sync::Arc;

use armctl_api::models::{Provider, ResourceGroup};
use armctl_api::{ArmClient, OperationResponse};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::ResourcesApi;
use crate::config::ArmConfig;
use crate::error::CoreError;
use crate::poll::{PollError, PollPolicy, PollStep, Sleeper, TokioSleeper, poll_until};
use crate::registry::{self, ClientRegistry, RESOURCES_CLIENT};
use crate::requests::ResourceGroupRequest;
use crate::CoreResult;

/// `User-Agent` of the shared resources client.
pub const RESOURCES_USER_AGENT: &str =
    concat!("armctl-resources-controller/", env!("CARGO_PKG_VERSION"));

pub struct ResourcesController<C = ArmClient> {
    client: Option<Arc<C>>,
}

impl ResourcesController<ArmClient> {
    /// Controller backed by the process-wide resources client.
    pub fn new(config: &ArmConfig) -> Self {
        Self::from_registry(&RESOURCES_CLIENT, config)
    }

    pub fn from_registry(registry: &ClientRegistry<ArmClient>, config: &ArmConfig) -> Self {
        Self {
            client: registry::acquire(registry, config, RESOURCES_USER_AGENT),
        }
    }
}

impl<C: ResourcesApi> ResourcesController<C> {
    pub fn with_client(client: Arc<C>) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&C, CoreError> {
        self.client.as_deref().ok_or(CoreError::ClientNotInstantiated)
    }

    // ── Resource groups ──────────────────────────────────────────────

    pub async fn create_resource_group(
        &self,
        request: &ResourceGroupRequest,
    ) -> CoreResult<ResourceGroup> {
        let client = self.client()?;
        let group = request.to_model()?;
        info!(name = %request.name, location = %request.location, "creating resource group");
        Ok(client.put_resource_group(&request.name, &group).await?)
    }

    pub async fn get_resource_group(&self, name: &str) -> CoreResult<ResourceGroup> {
        let client = self.client()?;
        Ok(client.get_resource_group(name).await?)
    }

    /// Request deletion; the service usually answers 202 and finishes later.
    pub async fn delete_resource_group(&self, name: &str) -> CoreResult<()> {
        let client = self.client()?;
        info!(name, "deleting resource group");
        Ok(client.delete_resource_group(name).await?)
    }

    /// Body is `true` when the group exists, `false` when the service says 404.
    pub async fn check_resource_group_exists(&self, name: &str) -> CoreResult<bool> {
        let client = self.client()?;
        Ok(client.check_resource_group_exists(name).await?)
    }

    // ── Providers ────────────────────────────────────────────────────

    /// Read a provider's registration state without registering it.
    pub async fn get_provider(&self, namespace: &str) -> CoreResult<Provider> {
        let client = self.client()?;
        Ok(client.get_provider(namespace).await?)
    }

    /// Register `namespace` and wait until the service reports it registered.
    pub async fn register_resource_provider(
        &self,
        namespace: &str,
        policy: PollPolicy,
    ) -> CoreResult<Provider> {
        self.register_resource_provider_with(
            namespace,
            policy,
            &TokioSleeper,
            &CancellationToken::new(),
        )
        .await
    }

    /// [`register_resource_provider`](Self::register_resource_provider) with
    /// an explicit sleeper and cancellation token.
    pub async fn register_resource_provider_with<S: Sleeper>(
        &self,
        namespace: &str,
        policy: PollPolicy,
        sleeper: &S,
        cancel: &CancellationToken,
    ) -> CoreResult<Provider> {
        let client = self.client()?;
        if policy.interval.is_zero() {
            return Err(CoreError::validation(
                "sleep_duration",
                "sleep duration must be greater than zero",
            ));
        }

        info!(
            namespace,
            max_secs = policy.max_duration.as_secs(),
            interval_secs = policy.interval.as_secs(),
            "registering resource provider"
        );

        let outcome = poll_until(policy, sleeper, cancel, move || async move {
            let response = client
                .register_provider(namespace)
                .await
                .map_err(|e| registration_error(namespace, e))?;
            Ok(registration_step(response))
        })
        .await;

        match outcome {
            Ok(response) => {
                info!(namespace, "resource provider registered");
                Ok(response)
            }
            Err(PollError::Failed(e)) => Err(e),
            Err(PollError::TimedOut { waited, last_state }) => {
                warn!(namespace, waited_secs = waited.as_secs(), ?last_state, "registration timed out");
                Err(CoreError::RegistrationTimedOut {
                    provider: namespace.to_owned(),
                    waited,
                    last_state,
                })
            }
            Err(PollError::Cancelled) => Err(CoreError::Cancelled {
                operation: format!("Registration of provider {namespace}"),
            }),
        }
    }
}

fn registration_step(response: OperationResponse<Provider>) -> PollStep<OperationResponse<Provider>> {
    if response.body.as_ref().is_some_and(Provider::is_registered) {
        return PollStep::Ready(response);
    }
    PollStep::Pending {
        state: response.body.and_then(|p| p.registration_state),
    }
}

/// An ARM error answer from the register call ends polling as
/// `RegistrationFailed`; transport and token (401) failures stay `Remote`.
fn registration_error(namespace: &str, err: armctl_api::Error) -> CoreError {
    match err {
        armctl_api::Error::Arm {
            status, message, ..
        } => CoreError::RegistrationFailed {
            provider: namespace.to_owned(),
            status,
            message,
        },
        other => CoreError::from(other),
    }
}
