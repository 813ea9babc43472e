//! Resource group command handlers.

use armctl_core::{OperationResponse, ResourceGroup, ResourceGroupRequest, ResourcesController};

use crate::cli::{GlobalOpts, GroupArgs, GroupCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(g: &ResourceGroup, color: bool) -> String {
    let state = g
        .properties
        .as_ref()
        .and_then(|p| p.provisioning_state.as_deref());
    [
        format!("Name:       {}", util::or_dash(g.name.as_deref())),
        format!("ID:         {}", util::or_dash(g.id.as_deref())),
        format!("Location:   {}", g.location),
        format!("Managed by: {}", util::or_dash(g.managed_by.as_deref())),
        format!("State:      {}", output::paint_state(state, color)),
        format!("Tags:       {}", util::format_tags(&g.tags)),
    ]
    .join("\n")
}

fn render_group(
    resp: &OperationResponse<ResourceGroup>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let out = output::render_response(
        global.output,
        resp,
        |g| detail(g, color),
        |g| g.id.clone().unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(
    controller: &ResourcesController,
    args: GroupArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        GroupCommand::Create {
            name,
            location,
            tags,
        } => {
            let request = ResourceGroupRequest {
                tags,
                ..ResourceGroupRequest::new(name, location)
            };
            let resp = controller.create_resource_group(&request).await?;
            render_group(&resp, global)
        }

        GroupCommand::Get { name } => {
            let resp = controller.get_resource_group(&name).await?;
            render_group(&resp, global)
        }

        GroupCommand::Delete { name } => {
            let prompt = format!("Delete resource group '{name}' and every resource in it?");
            if !util::confirm(&prompt, "group delete", global.yes)? {
                return Ok(());
            }
            let resp = controller.delete_resource_group(&name).await?;
            let out = output::render_response(
                global.output,
                &resp,
                |_| String::new(),
                |_| String::new(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupCommand::Exists { name } => {
            let resp = controller.check_resource_group_exists(&name).await?;
            let out = output::render_response(
                global.output,
                &resp,
                |exists| {
                    let verdict = if *exists { "exists" } else { "does not exist" };
                    format!("Resource group '{name}' {verdict}")
                },
                ToString::to_string,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
