use anyhow::{Context, anyhow, ensure};
use haystack_core::ListSettings;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::debug;

pub const CONFIG_PATH_ENV: &str = "HAYSTACK_CONFIG_PATH";
pub const CONFIG_JSON_ENV: &str = "HAYSTACK_CONFIG_JSON";

/// Source that produced the list configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// Host-level list configuration: the persisted user settings plus how often
/// the master collection is re-fetched.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ListConfig {
    /// Milliseconds between periodic refresh passes. Lower values pick up
    /// renames and new entities sooner at the cost of more provider calls.
    pub refresh_interval_ms: u64,
    /// Filter, sort and grouping state handed to the engine builder.
    pub settings: ListSettings,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 5_000,
            settings: ListSettings::default(),
        }
    }
}

impl ListConfig {
    /// Load list configuration using environment variables.
    /// Evaluation order:
    /// 1) `$HAYSTACK_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$HAYSTACK_CONFIG_JSON` (inline JSON),
    /// 3) the first default candidate file that exists,
    /// 4) defaults.
    pub fn load_from_env() -> anyhow::Result<(Self, ConfigSource)> {
        if let Ok(path_str) = env::var(CONFIG_PATH_ENV)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Ok(raw) = env::var(CONFIG_JSON_ENV)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_ENV}"))?;
            return Ok((parsed, ConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file() {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        debug!("no list config found, using defaults");
        Ok((Self::default(), ConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read list config from {}", path.display())
        })?;

        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid list config {}", path.display())
            })?,
            Some("toml") | Some("tml") => {
                toml::from_str(&contents).map_err(|err| {
                    anyhow!("invalid list config {}: {}", path.display(), err)
                })?
            }
            _ => Self::parse_from_str(&contents, &path.display().to_string())?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse list config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid list config json: {err}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.refresh_interval_ms > 0,
            "refresh_interval_ms must be greater than zero"
        );
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Serialize for the host's persistence layer
    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        toml::to_string(self).context("failed to serialize list config")
    }

    fn find_default_file() -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &[
            "haystack.toml",
            "haystack.json",
            "config/haystack.toml",
            "config/haystack.json",
        ];

        CANDIDATES
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(|path| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_refresh_every_five_seconds() {
        let config = ListConfig::default();
        assert_eq!(config.refresh_interval(), Duration::from_secs(5));
        assert!(config.settings.search_term.is_empty());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = ListConfig::parse_json(r#"{"refresh_interval_ms": 0}"#)
            .unwrap_err();
        assert!(err.to_string().contains("refresh_interval_ms"));
    }

    #[test]
    fn parse_from_str_accepts_json_fallback() {
        let config = ListConfig::parse_from_str(
            r#"{"settings": {"search_term": "mun"}}"#,
            "inline",
        )
        .unwrap();
        assert_eq!(config.settings.search_term, "mun");
        assert_eq!(config.refresh_interval_ms, 5_000);
    }
}
