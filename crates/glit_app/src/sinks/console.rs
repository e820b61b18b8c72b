use std::path::PathBuf;

use ::console::style;
use figlet_rs::FIGfont;
use glit_core::{ReportRowView, ReportView};
use glit_engine::{ExportError, HarvestEvent, ProgressSink};
use indicatif::{ProgressBar, ProgressStyle};
use tabled::settings::Style;
use tabled::{Table, Tabled};

const BANNER_TEXT: &str = "OSINT glit";

#[derive(Debug, Tabled)]
struct TableRow {
    #[tabled(rename = "(index)")]
    index: usize,
    #[tabled(rename = "repository")]
    repository: String,
    #[tabled(rename = "emails")]
    emails: String,
}

impl TableRow {
    fn from_view(index: usize, row: &ReportRowView) -> Self {
        Self {
            index,
            repository: row.repository.clone(),
            emails: row.joined_emails(", "),
        }
    }
}

/// Renders the report as a table, one row per repository in report order.
pub fn render_table(view: &ReportView) -> String {
    let rows: Vec<TableRow> = view
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| TableRow::from_view(index, row))
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// ASCII-art banner; falls back to the plain text if the font cannot render it.
pub fn banner_text() -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert(BANNER_TEXT).map(|figure| figure.to_string()))
        .unwrap_or_else(|| BANNER_TEXT.to_string())
}

pub fn print_banner() {
    println!("{}", style(banner_text()).bold().cyan());
}

pub fn print_report(view: &ReportView) {
    if view.rows.is_empty() {
        println!("{}", style("No repositories found.").yellow());
        return;
    }
    println!("{}", render_table(view));
    println!(
        "{} addresses across {} repositories",
        view.email_count, view.repository_count
    );
}

pub fn print_export(export: &Option<Result<PathBuf, ExportError>>) {
    match export {
        Some(Ok(path)) => println!("{} {}", style("Saved to").green(), path.display()),
        Some(Err(err)) => eprintln!("{} {err}", style("Export failed:").red()),
        None => {}
    }
}

/// Progress bar over the repositories while the harvest runs.
pub struct ConsoleProgressSink {
    bar: ProgressBar,
}

impl ConsoleProgressSink {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
        );
        Self::with_bar(bar)
    }

    pub fn with_bar(bar: ProgressBar) -> Self {
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ConsoleProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ConsoleProgressSink {
    fn emit(&self, event: HarvestEvent) {
        match event {
            HarvestEvent::RepositoriesListed { count } => {
                self.bar.set_length(count as u64);
            }
            HarvestEvent::RepositoryStarted { name, .. } => {
                self.bar.set_message(name);
            }
            HarvestEvent::RepositoryFinished { .. } => {
                self.bar.inc(1);
            }
            HarvestEvent::RepositoryFailed { name, error, .. } => {
                self.bar.println(format!(
                    "{} {name}: {}",
                    style("skipped").yellow(),
                    error.kind
                ));
                self.bar.inc(1);
            }
        }
    }
}
