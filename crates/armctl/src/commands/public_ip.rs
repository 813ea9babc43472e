//! Public IP address command handlers.

use armctl_core::{NetworkController, PublicIpAddress, PublicIpRequest};

use crate::cli::{GlobalOpts, PublicIpArgs, PublicIpCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(p: &PublicIpAddress, color: bool) -> String {
    let props = &p.properties;
    [
        format!("Name:       {}", util::or_dash(p.name.as_deref())),
        format!("ID:         {}", util::or_dash(p.id.as_deref())),
        format!("Location:   {}", util::or_dash(p.location.as_deref())),
        format!(
            "Allocation: {}",
            props
                .allocation_method
                .map_or_else(|| "-".into(), |m| m.to_string())
        ),
        format!("Address:    {}", util::or_dash(props.ip_address.as_deref())),
        format!("Version:    {}", util::or_dash(props.address_version.as_deref())),
        format!(
            "Idle:       {}",
            props
                .idle_timeout_in_minutes
                .map_or_else(|| "-".into(), |m| format!("{m} min"))
        ),
        format!(
            "State:      {}",
            output::paint_state(props.provisioning_state.as_deref(), color)
        ),
        format!("Tags:       {}", util::format_tags(&p.tags)),
    ]
    .join("\n")
}

pub async fn handle(
    controller: &NetworkController,
    args: PublicIpArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let resp = match args.command {
        PublicIpCommand::Create {
            name,
            scope,
            location,
            allocation,
            ip_address,
            tags,
        } => {
            let request = PublicIpRequest {
                resource_group: scope.resource_group,
                name,
                location,
                allocation,
                ip_address,
                tags,
            };
            controller.create_public_ip_address(&request).await?
        }

        PublicIpCommand::Get { name, scope } => {
            controller
                .get_public_ip_address(&scope.resource_group, &name)
                .await?
        }
    };

    let out = output::render_response(
        global.output,
        &resp,
        |p| detail(p, color),
        |p| p.id.clone().unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
