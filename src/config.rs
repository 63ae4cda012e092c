use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

use crate::report::WontFixPolicy;

/// Tracker base URL baked in at build time (see build.rs).
const DEFAULT_BASE_URL: &str = std::env!("EPICPOINTS_BASE_URL");

/// Configuration keys enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    BaseUrl,
    StoryPointsField,
    CycleField,
    EpicSummaryField,
    MaxResults,
    TimeoutSecs,
    WontfixPolicy,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "base_url",
            ConfigKey::StoryPointsField => "story_points_field",
            ConfigKey::CycleField => "cycle_field",
            ConfigKey::EpicSummaryField => "epic_summary_field",
            ConfigKey::MaxResults => "max_results",
            ConfigKey::TimeoutSecs => "timeout_secs",
            ConfigKey::WontfixPolicy => "wontfix_policy",
        }
    }

    /// Get all config keys
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::BaseUrl,
            ConfigKey::StoryPointsField,
            ConfigKey::CycleField,
            ConfigKey::EpicSummaryField,
            ConfigKey::MaxResults,
            ConfigKey::TimeoutSecs,
            ConfigKey::WontfixPolicy,
        ]
    }
}

/// Filename for the project-specific configuration within the .epicpoints directory.
pub const PROJECT_CONFIG_FILENAME: &str = "config.json";
/// Directory name for project-specific configuration.
pub const PROJECT_CONFIG_DIR: &str = ".epicpoints";

/// Parses a JSON configuration file content into a map of configuration values.
///
/// Expects `content` to be a byte slice representing a JSON object with
/// configuration keys (e.g., {"base_url": "...", "max_results": 500}).
///
/// - Returns `Ok(HashMap<ConfigKey, Value>)` containing all recognized values;
///   unknown keys are skipped.
/// - Returns an empty HashMap if the input `content` is empty or contains only whitespace.
/// - Returns an `Err` if the JSON parsing fails or the document is not an object.
pub fn parse_config(content: &[u8]) -> Result<HashMap<ConfigKey, Value>> {
    if content.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(HashMap::new());
    }

    let value: Value = serde_json::from_slice(content).context("Failed to parse config JSON")?;

    let mut config_map = HashMap::new();

    if let Value::Object(map) = &value {
        for key in ConfigKey::all() {
            if let Some(val) = map.get(key.as_str()) {
                config_map.insert(*key, val.clone());
            }
        }
        return Ok(config_map);
    }

    Err(anyhow::anyhow!("Config must be a JSON object"))
}

/// Resolved settings, passed by reference to every component.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub base_url: String,
    pub story_points_field: String,
    pub cycle_field: String,
    pub epic_summary_field: String,
    pub max_results: u32,
    pub timeout_secs: u64,
    pub wontfix_policy: WontFixPolicy,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            story_points_field: "customfield_10202".to_string(),
            cycle_field: "customfield_10900".to_string(),
            epic_summary_field: "customfield_10207".to_string(),
            max_results: 10000,
            timeout_secs: 30,
            wontfix_policy: WontFixPolicy::Exclude,
        }
    }
}

impl ReportConfig {
    /// Apply overrides from a parsed config map on top of the defaults.
    pub fn from_map(map: &HashMap<ConfigKey, Value>) -> Result<Self> {
        let mut config = ReportConfig::default();
        for (key, value) in map {
            match key {
                ConfigKey::BaseUrl => config.base_url = expect_string(*key, value)?,
                ConfigKey::StoryPointsField => {
                    config.story_points_field = expect_string(*key, value)?;
                }
                ConfigKey::CycleField => config.cycle_field = expect_string(*key, value)?,
                ConfigKey::EpicSummaryField => {
                    config.epic_summary_field = expect_string(*key, value)?;
                }
                ConfigKey::MaxResults => {
                    config.max_results = u32::try_from(expect_u64(*key, value)?)
                        .context("max_results is too large")?;
                }
                ConfigKey::TimeoutSecs => config.timeout_secs = expect_u64(*key, value)?,
                ConfigKey::WontfixPolicy => {
                    let raw = expect_string(*key, value)?;
                    config.wontfix_policy = WontFixPolicy::parse(&raw).ok_or_else(|| {
                        anyhow::anyhow!(
                            "wontfix_policy must be one of exclude, count-as-done, count-as-not-done"
                        )
                    })?;
                }
            }
        }
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Ok(config)
    }

    /// Load the project config from `dir`, falling back to the defaults
    /// when no config file exists there.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(PROJECT_CONFIG_DIR).join(PROJECT_CONFIG_FILENAME);
        if !path.exists() {
            return Ok(ReportConfig::default());
        }
        let content = std::fs::read(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let map = parse_config(&content)?;
        ReportConfig::from_map(&map)
    }

    /// Load the project config from the current directory.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }
}

fn expect_string(key: ConfigKey, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("{} must be a string", key.as_str()))
}

fn expect_u64(key: ConfigKey, value: &Value) -> Result<u64> {
    value
        .as_u64()
        .ok_or_else(|| anyhow::anyhow!("{} must be a non-negative integer", key.as_str()))
}
