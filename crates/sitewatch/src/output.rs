//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use sitewatch_core::{Site, SiteRow, SiteStatus, ViewBody, ViewFrame};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Whether color output should be enabled on the given stream.
pub fn should_color(mode: &ColorMode, stream_is_terminal: bool) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => stream_is_terminal && std::env::var_os("NO_COLOR").is_none(),
    }
}

pub fn stdout_color(mode: &ColorMode) -> bool {
    should_color(mode, io::stdout().is_terminal())
}

pub fn stderr_color(mode: &ColorMode) -> bool {
    should_color(mode, io::stderr().is_terminal())
}

// ── Site rows ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct SiteTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Actions")]
    actions: String,
}

impl From<&SiteRow> for SiteTableRow {
    fn from(row: &SiteRow) -> Self {
        let actions = if row.busy {
            "(working…)"
        } else if row.can_associate {
            "associate"
        } else if row.can_delete {
            "delete"
        } else {
            ""
        };
        Self {
            id: row.site.id.to_string(),
            name: row.site.name.clone(),
            address: row.site.address.clone(),
            status: row.site.status.label().into(),
            actions: actions.into(),
        }
    }
}

fn status_badge(status: SiteStatus, color: bool) -> String {
    let label = status.label();
    if !color {
        return label.to_owned();
    }
    match status {
        SiteStatus::Online => label.green().to_string(),
        SiteStatus::Offline => label.red().to_string(),
        SiteStatus::Warning => label.yellow().to_string(),
        SiteStatus::Pending => label.cyan().to_string(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a view frame's body in the chosen format.
///
/// Error and refresh indicators are not part of the body; see
/// [`frame_status_line`].
pub fn render_frame(format: &OutputFormat, frame: &ViewFrame) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(match &frame.body {
            ViewBody::Loading { placeholders } => {
                let mut out = String::from("Loading sites…");
                for _ in 0..*placeholders {
                    out.push_str("\n  ░░░░░░░░░░░░  ░░░░░░░░░░░░░░░░  ░░░░░░");
                }
                out
            }
            ViewBody::Empty => "No sites match the current filters.".into(),
            ViewBody::Rows(rows) => {
                let table_rows: Vec<SiteTableRow> = rows.iter().map(SiteTableRow::from).collect();
                Table::new(table_rows).with(Style::rounded()).to_string()
            }
        }),
        OutputFormat::Json => render_json(frame.rows(), false),
        OutputFormat::JsonCompact => render_json(frame.rows(), true),
        OutputFormat::Yaml => render_yaml(frame.rows()),
        OutputFormat::Plain => Ok(frame
            .rows()
            .iter()
            .map(|r| r.site.id.to_string())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// One-line summary of a frame's error/refresh indicators, if any.
pub fn frame_status_line(frame: &ViewFrame, color: bool) -> Option<String> {
    match (&frame.error, frame.refreshing) {
        (Some(err), _) => {
            let line = format!("⚠ {err} (showing last known data)");
            Some(if color { line.yellow().to_string() } else { line })
        }
        (None, true) => Some("↻ refreshing…".into()),
        (None, false) => None,
    }
}

/// Render a single site in the chosen format.
pub fn render_site(format: &OutputFormat, site: &Site, color: bool) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(format!(
            "ID:      {}\nName:    {}\nAddress: {}\nStatus:  {}",
            site.id,
            site.name,
            site.address,
            status_badge(site.status, color)
        )),
        OutputFormat::Json => render_json(site, false),
        OutputFormat::JsonCompact => render_json(site, true),
        OutputFormat::Yaml => render_yaml(site),
        OutputFormat::Plain => Ok(site.id.to_string()),
    }
}

/// Render any serializable value, with caller-supplied table and plain forms.
pub fn render_single<T: serde::Serialize>(
    format: &OutputFormat,
    data: &T,
    table: impl FnOnce(&T) -> String,
    plain: impl FnOnce(&T) -> String,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(table(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(plain(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let out = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(out)
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}
