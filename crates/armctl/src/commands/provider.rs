//! Resource provider command handlers.

use tabled::Tabled;
use tokio_util::sync::CancellationToken;

use armctl_core::models::ProviderResourceType;
use armctl_core::{PollPolicy, Provider, ResourcesController, TokioSleeper};

use crate::cli::{GlobalOpts, ProviderArgs, ProviderCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResourceTypeRow {
    #[tabled(rename = "Resource type")]
    resource_type: String,
    #[tabled(rename = "Locations")]
    locations: String,
    #[tabled(rename = "Newest API")]
    newest_api: String,
}

impl From<&ProviderResourceType> for ResourceTypeRow {
    fn from(t: &ProviderResourceType) -> Self {
        Self {
            resource_type: util::or_dash(t.resource_type.as_deref()).to_owned(),
            locations: t.locations.len().to_string(),
            newest_api: t
                .api_versions
                .iter()
                .max()
                .cloned()
                .unwrap_or_else(|| "-".into()),
        }
    }
}

fn detail(p: &Provider, color: bool) -> String {
    let mut lines = vec![
        format!("Namespace:  {}", util::or_dash(p.namespace.as_deref())),
        format!("ID:         {}", util::or_dash(p.id.as_deref())),
        format!(
            "State:      {}",
            output::paint_state(p.registration_state.as_deref(), color)
        ),
    ];
    if !p.resource_types.is_empty() {
        let rows: Vec<ResourceTypeRow> = p.resource_types.iter().map(ResourceTypeRow::from).collect();
        lines.push(output::render_table(&rows));
    }
    lines.join("\n")
}

pub async fn handle(
    controller: &ResourcesController,
    args: ProviderArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(global.color);
    let resp = match args.command {
        ProviderCommand::Register {
            namespace,
            max_wait,
            interval,
        } => {
            let policy = PollPolicy::from_secs(max_wait, interval)?;

            // Ctrl-C stops polling instead of killing the process mid-request.
            let cancel = CancellationToken::new();
            let watcher = {
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        cancel.cancel();
                    }
                })
            };

            let bar = util::spinner(format!("Registering {namespace}"), global.quiet);
            let result = controller
                .register_resource_provider_with(&namespace, policy, &TokioSleeper, &cancel)
                .await;
            watcher.abort();
            bar.finish_and_clear();
            result?
        }

        ProviderCommand::Show { namespace } => controller.get_provider(&namespace).await?,
    };

    let out = output::render_response(
        global.output,
        &resp,
        |p| detail(p, color),
        |p| p.registration_state.clone().unwrap_or_default(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
