//! # Client Settings
//!
//! [`ScaleConfig`] holds everything a command needs to reach the platform: the
//! API base URL, the image registry and tag used by `jobs deploy`, the template
//! search path and the HTTP timeout.
//!
//! Settings are layered, lowest priority first:
//! 1. Compiled defaults
//! 2. `config.json` in the user config directory (`scale config set ...`)
//! 3. Environment variables (`SCALE_URL`, `DOCKER_REGISTRY`, `DOCKER_TAG`,
//!    `SCALE_TEMPLATE_PATH`), read by clap
//! 4. Command-line flags

use crate::error::{Result, ScaleError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Keys accepted by [`ScaleConfig::get`] and [`ScaleConfig::set`].
pub const KEYS: &[&str] = &["url", "registry", "tag", "template-path", "timeout"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScaleConfig {
    /// Base URL of the Scale REST API (e.g. `http://scale.local/api/v5`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Registry prefix for job type images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,

    /// Image tag; the job type version is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Template search path, entries separated like `PATH`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_path: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// `<user config dir>/scale`, e.g. `~/.config/scale` on Linux.
pub fn default_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("org", "ngageoint", "scale").map(|dirs| dirs.config_dir().to_path_buf())
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            url: None,
            registry: None,
            tag: None,
            template_path: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub registry: Option<String>,
    pub tag: Option<String>,
    pub template_path: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl ScaleConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: ScaleConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Applies command-line and environment values on top of the file settings.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if overrides.url.is_some() {
            self.url = overrides.url;
        }
        if overrides.registry.is_some() {
            self.registry = overrides.registry;
        }
        if overrides.tag.is_some() {
            self.tag = overrides.tag;
        }
        if overrides.template_path.is_some() {
            self.template_path = overrides.template_path;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.timeout_secs = timeout;
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "url" => self.url.clone(),
            "registry" => self.registry.clone(),
            "tag" => self.tag.clone(),
            "template-path" => self.template_path.clone(),
            "timeout" => Some(self.timeout_secs.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let optional = || {
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };
        match key {
            "url" => self.url = optional().map(|u| u.trim_end_matches('/').to_string()),
            "registry" => self.registry = optional(),
            "tag" => self.tag = optional(),
            "template-path" => self.template_path = optional(),
            "timeout" => {
                self.timeout_secs = value.parse().map_err(|_| {
                    ScaleError::InvalidInput(format!("timeout must be a number of seconds: {}", value))
                })?
            }
            other => return Err(ScaleError::Config(format!("Unknown config key: {}", other))),
        }
        Ok(())
    }

    /// All keys with their current values; unset keys show as empty.
    pub fn list_all(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .map(|key| (*key, self.get(key).unwrap_or_default()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ScaleConfig::default();
        assert_eq!(config.url, None);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();
        let config = ScaleConfig::load(temp.path().join("nope")).unwrap();
        assert_eq!(config, ScaleConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();

        let mut config = ScaleConfig::default();
        config.set("url", "http://scale.local/api/v5/").unwrap();
        config.set("registry", "registry.local:5000").unwrap();
        config.save(temp.path()).unwrap();

        let loaded = ScaleConfig::load(temp.path()).unwrap();
        assert_eq!(loaded.url.as_deref(), Some("http://scale.local/api/v5"));
        assert_eq!(loaded.registry.as_deref(), Some("registry.local:5000"));
        assert_eq!(loaded.timeout_secs, 30);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = ScaleConfig {
            url: Some("http://file".into()),
            registry: Some("file-registry".into()),
            ..ScaleConfig::default()
        };
        let merged = config.with_overrides(Overrides {
            url: Some("http://flag".into()),
            timeout_secs: Some(5),
            ..Overrides::default()
        });
        assert_eq!(merged.url.as_deref(), Some("http://flag"));
        assert_eq!(merged.registry.as_deref(), Some("file-registry"));
        assert_eq!(merged.timeout_secs, 5);
    }

    #[test]
    fn test_set_rejects_unknown_and_bad_values() {
        let mut config = ScaleConfig::default();
        assert!(matches!(config.set("colour", "x"), Err(ScaleError::Config(_))));
        assert!(matches!(
            config.set("timeout", "soon"),
            Err(ScaleError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_set_empty_clears() {
        let mut config = ScaleConfig::default();
        config.set("tag", "1.0").unwrap();
        config.set("tag", "").unwrap();
        assert_eq!(config.tag, None);
    }

    #[test]
    fn test_list_all() {
        let mut config = ScaleConfig::default();
        config.set("tag", "latest").unwrap();
        let all = config.list_all();
        assert_eq!(all.len(), KEYS.len());
        assert!(all.contains(&("tag", "latest".to_string())));
        assert!(all.contains(&("url", String::new())));
    }
}
