//! Output formatting: detail view, JSON, YAML, plain.
//!
//! Every operation answers with an `OperationResponse`. Structured formats
//! serialize the whole envelope (status, reason, request id, body); the
//! detail view prints the status line followed by the resource; plain emits
//! the resource ID for scripting.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use armctl_core::OperationResponse;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Provisioning or registration state, colored by outcome.
pub fn paint_state(state: Option<&str>, color: bool) -> String {
    let Some(state) = state else {
        return "-".into();
    };
    if !color {
        return state.to_owned();
    }
    match state.to_ascii_lowercase().as_str() {
        "succeeded" | "registered" => state.green().to_string(),
        "failed" | "unregistered" | "notregistered" => state.red().to_string(),
        _ => state.yellow().to_string(),
    }
}

// ── Envelope ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Envelope<'a, T> {
    status: u16,
    reason: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<&'a str>,
    body: Option<&'a T>,
}

impl<'a, T> From<&'a OperationResponse<T>> for Envelope<'a, T> {
    fn from(resp: &'a OperationResponse<T>) -> Self {
        Self {
            status: resp.status.as_u16(),
            reason: &resp.reason,
            request_id: resp.request_id.as_deref(),
            body: resp.body.as_ref(),
        }
    }
}

fn status_line<T>(resp: &OperationResponse<T>) -> String {
    format!("Status:     {} {}", resp.status.as_u16(), resp.reason)
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render an operation response in the chosen format.
///
/// `detail_fn` builds the human-readable body view; `id_fn` yields the
/// value printed in plain mode. A response without a body renders as its
/// status alone.
pub fn render_response<T: Serialize>(
    format: OutputFormat,
    resp: &OperationResponse<T>,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError> {
    let envelope = Envelope::from(resp);
    Ok(match format {
        OutputFormat::Table => match &resp.body {
            Some(body) => format!("{}\n{}", status_line(resp), detail_fn(body)),
            None => status_line(resp),
        },
        OutputFormat::Json => serde_json::to_string_pretty(&envelope)?,
        OutputFormat::JsonCompact => serde_json::to_string(&envelope)?,
        OutputFormat::Yaml => serde_yaml::to_string(&envelope)?,
        OutputFormat::Plain => resp
            .body
            .as_ref()
            .map_or_else(|| resp.status.as_u16().to_string(), id_fn),
    })
}

/// Render a list of serializable items; `table` goes through `Tabled` rows.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render a single serializable value outside the response envelope.
pub fn render_single<T: Serialize>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}
