mod config;
mod logging;
mod prompt;
mod sinks;
mod web;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glit_core::HarvestRequest;
use log::LevelFilter;

use crate::config::{AppConfig, Overrides};

#[derive(Debug, Parser)]
#[command(
    name = "glit",
    version,
    about = "Collect email addresses shown on a user's repository pages"
)]
struct Cli {
    /// RON configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Repository pages fetched at once.
    #[arg(long, global = true)]
    concurrency: Option<usize>,
    /// Per-request timeout in seconds.
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask for the user URL and options interactively (default).
    Prompt,
    /// Harvest one user without prompting.
    Harvest {
        /// Profile URL; `/repos` is appended to list repositories.
        url: String,
        /// Accepted for parity with the prompt; only default branches are scanned.
        #[arg(long)]
        all_branches: bool,
        /// Write the report as JSON to this path.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Serve the search form over HTTP.
    Serve {
        #[arg(long)]
        addr: Option<String>,
        /// Directory for exports requested through the form.
        #[arg(long, value_name = "DIR")]
        export_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Prompt);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    let mut overrides = Overrides {
        concurrency: cli.concurrency,
        timeout_secs: cli.timeout,
        log_file: cli.log_file,
        ..Overrides::default()
    };
    if let Command::Serve { addr, export_dir } = &command {
        overrides.listen_addr = addr.clone();
        overrides.export_dir = export_dir.clone();
    }
    config.apply(overrides);

    let minimum = match command {
        Command::Serve { .. } => LevelFilter::Info,
        _ => LevelFilter::Error,
    };
    logging::initialize(&config.log, cli.verbose, minimum);

    let pipeline = glit_engine::build_pipeline(config.fetch_settings(), config.pipeline_settings())
        .context("building HTTP client")?;

    match command {
        Command::Prompt => prompt::run_interactive(&pipeline).await,
        Command::Harvest {
            url,
            all_branches,
            output,
        } => {
            let mut request = HarvestRequest::new(url).all_branches(all_branches);
            request.export_path = output;
            prompt::run_request(&pipeline, request).await;
            Ok(())
        }
        Command::Serve { .. } => {
            let state = web::WebState {
                pipeline: Arc::new(pipeline),
                export_dir: config.export_dir.clone(),
            };
            web::serve(state, &config.listen_addr).await
        }
    }
}
