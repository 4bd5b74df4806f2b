use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use serde::Deserialize;
use tracing::warn;
use url::Url;

pub const SETTINGS_FILE: &str = "investimate.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub service_url: String,
    pub request_timeout_secs: Option<u64>,
    pub export_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:5000".into(),
            request_timeout_secs: None,
            export_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Values passed on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub service_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    service_url: Option<String>,
    request_timeout_secs: Option<u64>,
    export_dir: Option<PathBuf>,
}

pub fn load_settings(overrides: SettingsOverrides) -> anyhow::Result<Settings> {
    resolve_settings(
        Path::new(SETTINGS_FILE),
        |key| std::env::var(key).ok(),
        overrides,
    )
}

/// Defaults, then `path` when it exists, then environment, then `overrides`.
pub fn resolve_settings(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
    overrides: SettingsOverrides,
) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if path.exists() {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        let file_cfg: FileSettings = toml::from_str(&raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?;
        if let Some(v) = file_cfg.service_url {
            settings.service_url = v;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            settings.request_timeout_secs = Some(v);
        }
        if let Some(v) = file_cfg.export_dir {
            settings.export_dir = v;
        }
    }

    if let Some(v) = env("INVESTIMATE_SERVICE_URL") {
        settings.service_url = v;
    }
    if let Some(v) = env("APP__SERVICE_URL") {
        settings.service_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = Some(parsed),
            Err(_) => warn!(value = %v, "ignoring non-numeric APP__REQUEST_TIMEOUT_SECS"),
        }
    }

    if let Some(v) = env("APP__EXPORT_DIR") {
        settings.export_dir = PathBuf::from(v);
    }

    if let Some(v) = overrides.service_url {
        settings.service_url = v;
    }
    if let Some(v) = overrides.request_timeout_secs {
        settings.request_timeout_secs = Some(v);
    }
    if let Some(v) = overrides.export_dir {
        settings.export_dir = v;
    }

    settings.service_url = normalize_service_url(&settings.service_url)?;
    Ok(settings)
}

/// Accepts absolute http(s) URLs and drops any trailing slash.
pub fn normalize_service_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed)
        .with_context(|| format!("service url '{trimmed}' is not a valid absolute url"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "service url '{trimmed}' must use http or https, not '{}'",
            url.scheme()
        );
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
