//! Command dispatch: bridges CLI args -> controllers -> output formatting.

pub mod config_cmd;
pub mod group;
pub mod nic;
pub mod provider;
pub mod public_ip;
pub mod subnet;
pub mod util;
pub mod vnet;

use armctl_core::{ArmConfig, NetworkController, ResourcesController};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an endpoint-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, arm: &ArmConfig, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Vnet(args) => vnet::handle(&NetworkController::new(arm), args, global).await,
        Command::Subnet(args) => subnet::handle(&NetworkController::new(arm), args, global).await,
        Command::PublicIp(args) => {
            public_ip::handle(&NetworkController::new(arm), args, global).await
        }
        Command::Nic(args) => nic::handle(&NetworkController::new(arm), args, global).await,
        Command::Group(args) => group::handle(&ResourcesController::new(arm), args, global).await,
        Command::Provider(args) => {
            provider::handle(&ResourcesController::new(arm), args, global).await
        }
        // Handled before an endpoint config is built.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
