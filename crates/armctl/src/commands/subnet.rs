//! Subnet command handlers.

use armctl_core::{NetworkController, Subnet, SubnetRequest};

use crate::cli::{GlobalOpts, SubnetArgs, SubnetCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(s: &Subnet, color: bool) -> String {
    let nsg = s
        .properties
        .network_security_group
        .as_ref()
        .and_then(|r| r.id.as_deref());
    [
        format!("Name:       {}", util::or_dash(s.name.as_deref())),
        format!("ID:         {}", util::or_dash(s.id.as_deref())),
        format!("Prefix:     {}", util::or_dash(s.properties.address_prefix.as_deref())),
        format!("NSG:        {}", util::short_id(nsg)),
        format!(
            "State:      {}",
            output::paint_state(s.properties.provisioning_state.as_deref(), color)
        ),
    ]
    .join("\n")
}

pub async fn handle(
    controller: &NetworkController,
    args: SubnetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let resp = match args.command {
        SubnetCommand::Add {
            name,
            scope,
            vnet,
            address_prefix,
        } => {
            let request = SubnetRequest {
                resource_group: scope.resource_group,
                vnet_name: vnet,
                name,
                address_prefix,
            };
            controller.add_subnet(&request).await?
        }

        SubnetCommand::Get { name, scope, vnet } => {
            controller
                .get_subnet(&scope.resource_group, &vnet, &name)
                .await?
        }
    };

    let out = output::render_response(
        global.output,
        &resp,
        |s| detail(s, color),
        |s| s.id.clone().unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
