//! Logger initialization for the `glit` binary.
//!
//! Logs go to stderr, so stdout stays reserved for the report table, and
//! optionally to a file.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::config::LogConfig;

/// Initialize the global logger. `minimum` raises the configured level when
/// a mode needs more output (the web server logs requests at info).
pub fn initialize(config: &LogConfig, verbose: bool, minimum: LevelFilter) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        glit_logging::parse_level(&config.level).max(minimum)
    };
    let log_config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        log_config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if let Some(path) = config.file.as_deref() {
        if let Some(file_logger) = create_file_logger(path, level, log_config) {
            loggers.push(file_logger);
        }
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn create_file_logger(
    path: &Path,
    level: LevelFilter,
    config: Config,
) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            None
        }
    }
}
