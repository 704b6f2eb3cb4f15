use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context};
use client_core::{OverlapPolicy, DEFAULT_REQUEST_TIMEOUT};
use serde::Deserialize;
use shared::protocol::DEFAULT_PREDICT_ENDPOINT;
use tracing::warn;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "desktop.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub overlap_policy: OverlapPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PREDICT_ENDPOINT.into(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            overlap_policy: OverlapPolicy::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
    overlap_policy: Option<String>,
}

/// Defaults, then the config file, then environment variables. An explicit
/// `path` must exist; the default `desktop.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?;
            settings.apply_file(&raw).with_context(|| {
                format!("failed to apply config file '{}'", path.display())
            })?;
        }
        None => {
            if let Ok(raw) = fs::read_to_string(DEFAULT_CONFIG_FILE) {
                if let Err(err) = settings.apply_file(&raw) {
                    warn!(file = DEFAULT_CONFIG_FILE, "ignoring config file: {err:#}");
                }
            }
        }
    }

    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}

impl Settings {
    fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file_cfg: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file_cfg.endpoint {
            self.endpoint = v;
        }
        if let Some(v) = file_cfg.timeout_secs {
            self.timeout_secs = v;
        }
        if let Some(v) = file_cfg.overlap_policy {
            self.overlap_policy = v.parse()?;
        }
        Ok(())
    }

    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("PREDICT_ENDPOINT") {
            self.endpoint = v;
        }
        if let Some(v) = var("APP__ENDPOINT") {
            self.endpoint = v;
        }

        if let Some(v) = var("APP__TIMEOUT_SECS") {
            match v.parse::<u64>() {
                Ok(parsed) => self.timeout_secs = parsed,
                Err(err) => warn!(value = %v, "ignoring APP__TIMEOUT_SECS: {err}"),
            }
        }

        if let Some(v) = var("APP__OVERLAP_POLICY") {
            match v.parse::<OverlapPolicy>() {
                Ok(parsed) => self.overlap_policy = parsed,
                Err(err) => warn!("ignoring APP__OVERLAP_POLICY: {err}"),
            }
        }
    }

    pub fn apply_cli(
        &mut self,
        endpoint: Option<String>,
        timeout_secs: Option<u64>,
        allow_overlap: bool,
    ) {
        if let Some(v) = endpoint {
            self.endpoint = v;
        }
        if let Some(v) = timeout_secs {
            self.timeout_secs = v;
        }
        if allow_overlap {
            self.overlap_policy = OverlapPolicy::LastWriteWins;
        }
    }

    pub fn endpoint_url(&self) -> anyhow::Result<Url> {
        let url = Url::parse(self.endpoint.trim())
            .with_context(|| format!("invalid classifier endpoint '{}'", self.endpoint))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "classifier endpoint '{}' must use http or https",
                self.endpoint
            );
        }
        Ok(url)
    }

    pub fn timeout(&self) -> anyhow::Result<Duration> {
        if self.timeout_secs == 0 {
            bail!("request timeout must be at least one second");
        }
        Ok(Duration::from_secs(self.timeout_secs))
    }
}
