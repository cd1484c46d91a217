use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use scan_core::SubmitPolicy;
use scan_engine::ClientSettings;
use scan_logging::scan_info;
use serde::Deserialize;

use crate::cli::Cli;

const DEFAULT_CONFIG_FILE: &str = "scan.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SubmitMode {
    #[default]
    Reject,
    Supersede,
}

impl From<SubmitMode> for SubmitPolicy {
    fn from(mode: SubmitMode) -> Self {
        match mode {
            SubmitMode::Reject => SubmitPolicy::Reject,
            SubmitMode::Supersede => SubmitPolicy::Supersede,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server_url: String,
    pub output_dir: PathBuf,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub max_analysis_bytes: u64,
    pub max_report_bytes: u64,
    pub submit_policy: SubmitMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            server_url: client.base_url,
            output_dir: PathBuf::from("output"),
            connect_timeout_secs: client.connect_timeout.as_secs(),
            request_timeout_secs: client.request_timeout.as_secs(),
            max_analysis_bytes: client.max_analysis_bytes,
            max_report_bytes: client.max_report_bytes,
            submit_policy: SubmitMode::default(),
        }
    }
}

impl AppConfig {
    /// Loads `explicit` (which must exist), else `./scan.ron` when present, else defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))?;
        scan_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(server) = &cli.server {
            self.server_url = server.clone();
        }
        if let Some(output) = &cli.output {
            self.output_dir = output.clone();
        }
        if let Some(timeout) = cli.timeout {
            self.request_timeout_secs = timeout;
        }
        if cli.supersede {
            self.submit_policy = SubmitMode::Supersede;
        }
        self
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.server_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_analysis_bytes: self.max_analysis_bytes,
            max_report_bytes: self.max_report_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::parse(
            r#"(server_url: "https://scan.example.com", submit_policy: Supersede)"#,
        )
        .unwrap();
        assert_eq!(config.server_url, "https://scan.example.com");
        assert_eq!(config.submit_policy, SubmitMode::Supersede);
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[test]
    fn unknown_field_is_an_error() {
        assert!(AppConfig::parse("(server: \"x\")").is_err());
    }

    #[test]
    fn cli_overrides_file_values() {
        let cli = Cli::parse_from([
            "scan_app",
            "--server",
            "http://localhost:8080",
            "--output",
            "reports",
            "--timeout",
            "5",
            "--supersede",
        ]);
        let config = AppConfig::default().with_overrides(&cli);
        assert_eq!(config.server_url, "http://localhost:8080");
        assert_eq!(config.output_dir, PathBuf::from("reports"));
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(SubmitPolicy::from(config.submit_policy), SubmitPolicy::Supersede);

        let settings = config.client_settings();
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn explicit_missing_file_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&temp.path().join("nope.ron"))).is_err());
    }

    #[test]
    fn loads_from_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("scan.ron");
        fs::write(&path, "(output_dir: \"out\", max_report_bytes: 1024)").unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.max_report_bytes, 1024);
        assert_eq!(
            config.client_settings().max_analysis_bytes,
            ClientSettings::default().max_analysis_bytes
        );
    }
}
