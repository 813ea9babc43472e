//! Virtual network command handlers.

use tabled::Tabled;

use armctl_core::{NetworkController, Subnet, VirtualNetwork, VirtualNetworkRequest};

use crate::cli::{GlobalOpts, VnetArgs, VnetCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SubnetRow {
    #[tabled(rename = "Subnet")]
    name: String,
    #[tabled(rename = "Prefix")]
    prefix: String,
    #[tabled(rename = "State")]
    state: String,
}

impl From<&Subnet> for SubnetRow {
    fn from(s: &Subnet) -> Self {
        Self {
            name: util::or_dash(s.name.as_deref()).to_owned(),
            prefix: util::or_dash(s.properties.address_prefix.as_deref()).to_owned(),
            state: util::or_dash(s.properties.provisioning_state.as_deref()).to_owned(),
        }
    }
}

fn detail(v: &VirtualNetwork, color: bool) -> String {
    let prefixes = v
        .properties
        .address_space
        .as_ref()
        .map(|a| a.address_prefixes.join(", "))
        .unwrap_or_default();
    let mut lines = vec![
        format!("Name:       {}", util::or_dash(v.name.as_deref())),
        format!("ID:         {}", util::or_dash(v.id.as_deref())),
        format!("Location:   {}", util::or_dash(v.location.as_deref())),
        format!("Addresses:  {}", if prefixes.is_empty() { "-" } else { &prefixes }),
        format!(
            "State:      {}",
            output::paint_state(v.properties.provisioning_state.as_deref(), color)
        ),
        format!("Tags:       {}", util::format_tags(&v.tags)),
    ];
    if !v.properties.subnets.is_empty() {
        let rows: Vec<SubnetRow> = v.properties.subnets.iter().map(SubnetRow::from).collect();
        lines.push(output::render_table(&rows));
    }
    lines.join("\n")
}

fn resource_id(v: &VirtualNetwork) -> String {
    v.id.clone().unwrap_or_default()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &NetworkController,
    args: VnetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let resp = match args.command {
        VnetCommand::Create {
            name,
            scope,
            location,
            address_prefixes,
            subnets,
            tags,
        } => {
            let request = VirtualNetworkRequest {
                resource_group: scope.resource_group,
                name,
                location,
                address_prefixes,
                subnets,
                tags,
            };
            controller.create_virtual_network(&request).await?
        }

        VnetCommand::Get { name, scope } => {
            controller
                .get_virtual_network(&scope.resource_group, &name)
                .await?
        }
    };

    let out = output::render_response(global.output, &resp, |v| detail(v, color), resource_id)?;
    output::print_output(&out, global.quiet);
    Ok(())
}
