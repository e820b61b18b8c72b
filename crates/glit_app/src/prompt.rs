//! Terminal front-ends: the interactive prompt flow and the one-shot `harvest` command.

use std::path::PathBuf;

use anyhow::Context;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use glit_core::{HarvestRequest, ReportView};
use glit_engine::HarvestPipeline;
use glit_logging::glit_error;

use crate::sinks::console::{self, ConsoleProgressSink};

/// Asks the four questions, then harvests and prints.
pub async fn run_interactive(pipeline: &HarvestPipeline) -> anyhow::Result<()> {
    console::print_banner();
    let request = tokio::task::spawn_blocking(ask_request)
        .await
        .context("prompt task panicked")??;
    run_request(pipeline, request).await;
    Ok(())
}

fn ask_request() -> anyhow::Result<HarvestRequest> {
    let theme = ColorfulTheme::default();
    let profile_url: String = Input::with_theme(&theme)
        .with_prompt("Enter the profile URL of the user (API form, e.g. https://api.github.com/users/octocat)")
        .validate_with(|input: &String| -> Result<(), &'static str> {
            if input.trim().is_empty() {
                Err("a URL is required")
            } else {
                Ok(())
            }
        })
        .interact_text()?;
    let all_branches = Confirm::with_theme(&theme)
        .with_prompt("Do you want to get all branches of the repositories?")
        .default(false)
        .interact()?;
    let save = Confirm::with_theme(&theme)
        .with_prompt("Do you want to save the results to a JSON file?")
        .default(false)
        .interact()?;

    let request = HarvestRequest::new(profile_url).all_branches(all_branches);
    if !save {
        return Ok(request);
    }
    let path: String = Input::with_theme(&theme)
        .with_prompt("Enter the output file path")
        .default("results.json".to_string())
        .interact_text()?;
    Ok(request.export_to(PathBuf::from(path.trim())))
}

/// Runs one harvest and prints the table. Enumeration failure is reported, not returned.
pub async fn run_request(pipeline: &HarvestPipeline, request: HarvestRequest) {
    let sink = ConsoleProgressSink::new();
    let result = pipeline.run(&request, &sink).await;
    sink.finish();
    match result {
        Ok(outcome) => {
            console::print_report(&ReportView::from_report(&outcome.report));
            console::print_export(&outcome.export);
        }
        Err(err) => {
            glit_error!("Harvest of {} failed: {}", request.profile_url, err);
            eprintln!("Error extracting emails: {err}");
        }
    }
}
