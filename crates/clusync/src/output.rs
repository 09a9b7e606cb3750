//! End-of-run summaries rendered with `tabled`.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use clusync_core::{Action, DumpEntry, OutcomeLog};

use crate::cli::ColorMode;

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

#[derive(Tabled)]
struct OutcomeRow {
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Item")]
    key: String,
    #[tabled(rename = "Result")]
    action: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

#[derive(Tabled)]
struct DumpRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Items")]
    items: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn paint_action(action: Action, color: bool) -> String {
    let text = action.to_string();
    if !color {
        return text;
    }
    match action {
        Action::Created | Action::Updated | Action::DirectoryCreated => text.green().to_string(),
        Action::Declined => text.dimmed().to_string(),
        Action::Skipped => text.yellow().to_string(),
        Action::Failed => text.red().bold().to_string(),
    }
}

/// One row per recorded outcome, then a one-line tally.
pub fn render_outcomes(log: &OutcomeLog, color: bool) -> String {
    if log.is_empty() {
        return "nothing to apply".into();
    }

    let rows: Vec<OutcomeRow> = log
        .entries()
        .iter()
        .map(|o| OutcomeRow {
            kind: o.kind,
            key: o.key.clone(),
            action: paint_action(o.action, color),
            detail: o.detail.clone().unwrap_or_default(),
        })
        .collect();

    let tally = [
        Action::Created,
        Action::Updated,
        Action::DirectoryCreated,
        Action::Declined,
        Action::Skipped,
        Action::Failed,
    ]
    .into_iter()
    .filter_map(|action| match log.count(action) {
        0 => None,
        n => Some(format!("{n} {action}")),
    })
    .collect::<Vec<_>>()
    .join(", ");

    format!("{}\n{tally}", Table::new(rows).with(Style::rounded()))
}

pub fn render_dump(entries: &[DumpEntry], color: bool) -> String {
    let rows: Vec<DumpRow> = entries
        .iter()
        .map(|entry| match &entry.result {
            Ok(count) => DumpRow {
                file: entry.file.to_string(),
                items: count.to_string(),
                status: if color {
                    "written".green().to_string()
                } else {
                    "written".into()
                },
            },
            Err(e) => DumpRow {
                file: entry.file.to_string(),
                items: "-".into(),
                status: if color {
                    e.to_string().red().to_string()
                } else {
                    e.to_string()
                },
            },
        })
        .collect();
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
