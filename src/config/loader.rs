//! Config file loading

use crate::error::Result as CloneResult;
use crate::fetch::transport::{
    default_user_agent, HttpTransport, DEFAULT_DOWNLOAD_TIMEOUT, DEFAULT_PROBE_TIMEOUT,
};
use crate::resolve::SiteTable;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Section name accepted when the settings are nested in a shared file.
const SECTION: &str = "clone";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub probe_timeout_secs: u64,
    pub download_timeout_secs: u64,
    pub user_agent: String,
    /// Additional site templates, keyed by site name.
    pub sites: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT.as_secs(),
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT.as_secs(),
            user_agent: default_user_agent(),
            sites: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn site_table(&self) -> SiteTable {
        SiteTable::with_extra(&self.sites)
    }

    pub fn transport(&self) -> CloneResult<HttpTransport> {
        HttpTransport::new(
            Duration::from_secs(self.probe_timeout_secs.max(1)),
            Duration::from_secs(self.download_timeout_secs.max(1)),
            &self.user_agent,
        )
    }
}

/// `<config dir>/clone`, where auto-discovered config files live.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SECTION))
}

/// Load settings from `config_path`, or from the first config file found in
/// `search_dir` when no path is given.
///
/// An explicit file that cannot be read or parsed is an error. A broken
/// auto-discovered file only produces a warning and the defaults.
pub fn load_config(search_dir: Option<&Path>, config_path: Option<&Path>) -> Result<Config> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => search_dir.and_then(discover_config),
    };

    let Some(config_file) = discovered else {
        return Ok(Config::default());
    };

    let parsed = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))
        .and_then(|content| parse_config(&content, &config_file));

    match parsed {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_file.display());
            Ok(config)
        }
        Err(err) if !config_path_provided => {
            tracing::warn!(
                "Ignoring auto-discovered config {}: {:#}",
                config_file.display(),
                err
            );
            Ok(Config::default())
        }
        Err(err) => Err(err),
    }
}

fn parse_config(content: &str, config_file: &Path) -> Result<Config> {
    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "toml" => parse_toml_config(content, config_file),
        "yaml" | "yml" => parse_yaml_config(content, config_file),
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        ),
    }
}

/// Parse TOML config, accepting the settings at top level or under `[clone]`.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, accepting the settings at top level or under `clone:`.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    // An empty document parses to null.
    if raw.is_null() {
        return Ok(Config::default());
    }

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(search_dir: &Path) -> Option<PathBuf> {
    ["config.toml", "config.yaml", "config.yml"]
        .into_iter()
        .map(|candidate| search_dir.join(candidate))
        .find(|path| path.is_file())
}
