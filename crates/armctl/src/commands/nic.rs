//! Network interface command handlers.

use tabled::Tabled;

use armctl_core::models::NetworkInterfaceIpConfiguration;
use armctl_core::{NetworkController, NetworkInterface, NetworkInterfaceRequest};

use crate::cli::{GlobalOpts, NicArgs, NicCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct IpConfigRow {
    #[tabled(rename = "IP config")]
    name: String,
    #[tabled(rename = "Private IP")]
    private_ip: String,
    #[tabled(rename = "Allocation")]
    allocation: String,
    #[tabled(rename = "Subnet")]
    subnet: String,
    #[tabled(rename = "Public IP")]
    public_ip: String,
}

impl From<&NetworkInterfaceIpConfiguration> for IpConfigRow {
    fn from(c: &NetworkInterfaceIpConfiguration) -> Self {
        let props = &c.properties;
        Self {
            name: util::or_dash(c.name.as_deref()).to_owned(),
            private_ip: util::or_dash(props.private_ip_address.as_deref()).to_owned(),
            allocation: props
                .private_allocation_method
                .map_or_else(|| "-".into(), |m| m.to_string()),
            subnet: util::short_id(props.subnet.as_ref().and_then(|s| s.id.as_deref())).to_owned(),
            public_ip: util::short_id(
                props
                    .public_ip_address
                    .as_ref()
                    .and_then(|p| p.id.as_deref()),
            )
            .to_owned(),
        }
    }
}

fn detail(n: &NetworkInterface, color: bool) -> String {
    let props = &n.properties;
    let mut lines = vec![
        format!("Name:       {}", util::or_dash(n.name.as_deref())),
        format!("ID:         {}", util::or_dash(n.id.as_deref())),
        format!("Location:   {}", util::or_dash(n.location.as_deref())),
        format!("MAC:        {}", util::or_dash(props.mac_address.as_deref())),
        format!(
            "Primary:    {}",
            props.primary.map_or_else(|| "-".into(), |p| p.to_string())
        ),
        format!(
            "State:      {}",
            output::paint_state(props.provisioning_state.as_deref(), color)
        ),
        format!("Tags:       {}", util::format_tags(&n.tags)),
    ];
    if !props.ip_configurations.is_empty() {
        let rows: Vec<IpConfigRow> = props.ip_configurations.iter().map(IpConfigRow::from).collect();
        lines.push(output::render_table(&rows));
    }
    lines.join("\n")
}

pub async fn handle(
    controller: &NetworkController,
    args: NicArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let resp = match args.command {
        NicCommand::Create {
            name,
            scope,
            location,
            vnet,
            subnet,
            public_ip,
            private_allocation,
            tags,
        } => {
            let request = NetworkInterfaceRequest {
                resource_group: scope.resource_group,
                name,
                location,
                vnet_name: vnet,
                subnet_name: subnet,
                public_ip_name: public_ip,
                private_allocation,
                tags,
            };
            controller.create_network_interface(&request).await?
        }

        NicCommand::Get { name, scope } => {
            controller
                .get_network_interface(&scope.resource_group, &name)
                .await?
        }
    };

    let out = output::render_response(
        global.output,
        &resp,
        |n| detail(n, color),
        |n| n.id.clone().unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
