//! Application configuration.
//!
//! Values come from an optional RON file; every field has a default, and
//! command-line flags override whatever the file says.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use glit_engine::{FetchSettings, PipelineSettings, DEFAULT_USER_AGENT};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    /// Repository pages fetched at once; 1 is strictly sequential.
    pub concurrency: usize,
    pub listen_addr: String,
    /// Where the web form writes exports.
    pub export_dir: PathBuf,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub listen_addr: Option<String>,
    pub export_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            concurrency: 1,
            listen_addr: "127.0.0.1:8000".to_string(),
            export_dir: PathBuf::from("exports"),
            log: LogConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        let defaults = FetchSettings::default();
        Self {
            connect_timeout_secs: defaults.connect_timeout.as_secs(),
            request_timeout_secs: defaults.request_timeout.as_secs(),
            redirect_limit: defaults.redirect_limit,
            max_bytes: defaults.max_bytes,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_ron(&content).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_ron(content: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(content)?)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(concurrency) = overrides.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.fetch.request_timeout_secs = secs;
        }
        if let Some(file) = overrides.log_file {
            self.log.file = Some(file);
        }
        if let Some(addr) = overrides.listen_addr {
            self.listen_addr = addr;
        }
        if let Some(dir) = overrides.export_dir {
            self.export_dir = dir;
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.fetch.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.fetch.request_timeout_secs.max(1)),
            redirect_limit: self.fetch.redirect_limit,
            max_bytes: self.fetch.max_bytes,
            user_agent: self.fetch.user_agent.clone(),
            ..FetchSettings::default()
        }
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            concurrency: self.concurrency.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_path_gives_defaults() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.pipeline_settings().concurrency, 1);
        assert_eq!(config.fetch_settings().request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn partial_ron_keeps_other_defaults() {
        let config = AppConfig::from_ron(
            r#"(concurrency: 4, fetch: (request_timeout_secs: 5), log: (level: "debug"))"#,
        )
        .unwrap();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.fetch.request_timeout_secs, 5);
        assert_eq!(config.fetch.redirect_limit, 5);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.listen_addr, "127.0.0.1:8000");
    }

    #[test]
    fn overrides_win_over_file() {
        let mut config = AppConfig::from_ron("(concurrency: 4)").unwrap();
        config.apply(Overrides {
            concurrency: Some(0),
            timeout_secs: Some(7),
            listen_addr: Some("0.0.0.0:9000".to_string()),
            ..Overrides::default()
        });
        assert_eq!(config.concurrency, 0);
        assert_eq!(config.pipeline_settings().concurrency, 1);
        assert_eq!(config.fetch_settings().request_timeout, Duration::from_secs(7));
        assert_eq!(config.listen_addr, "0.0.0.0:9000");
    }

    #[test]
    fn load_reads_file_and_reports_bad_syntax() {
        let dir = tempfile::TempDir::new().unwrap();
        let good = dir.path().join("glit.ron");
        std::fs::write(&good, "(export_dir: \"out\")").unwrap();
        assert_eq!(AppConfig::load(Some(&good)).unwrap().export_dir, PathBuf::from("out"));

        let bad = dir.path().join("bad.ron");
        std::fs::write(&bad, "(concurrency: \"many\")").unwrap();
        let err = AppConfig::load(Some(&bad)).unwrap_err();
        assert!(err.to_string().contains("bad.ron"));
    }
}
