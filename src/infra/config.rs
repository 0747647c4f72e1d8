use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "kronos.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    runtime: RuntimeSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RuntimeSection {
    plugin: Option<String>,
    warmup_count: Option<u64>,
    log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub plugin: String,
    pub warmup_count: u64,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            plugin: "stub".into(),
            warmup_count: 1,
            log_level: "info".into(),
        }
    }
}

impl AppConfig {
    /// Defaults, then the TOML file (`KRONOS_CONFIG` or `./kronos.toml`), then env.
    pub fn from_env_and_toml() -> Result<Self, ConfigError> {
        let explicit = std::env::var("KRONOS_CONFIG").ok().filter(|s| !s.trim().is_empty());
        let mut cfg = match explicit {
            Some(path) => Self::from_toml_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let file: FileConfig = toml::from_str(text)?;
        let mut cfg = Self::default();
        let rt = file.runtime;
        if let Some(p) = rt.plugin {
            cfg.plugin = p;
        }
        if let Some(w) = rt.warmup_count {
            cfg.warmup_count = w;
        }
        if let Some(l) = rt.log_level {
            cfg.log_level = l;
        }
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(p) = std::env::var("KRONOS_PLUGIN") {
            if !p.trim().is_empty() {
                self.plugin = p;
            }
        }
        if let Some(w) = std::env::var("KRONOS_WARMUP_COUNT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.warmup_count = w;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plugin.trim().is_empty() {
            return Err(ConfigError::Invalid("plugin cannot be empty".into()));
        }
        if self.warmup_count == 0 {
            return Err(ConfigError::Invalid("warmup_count must be at least 1".into()));
        }
        Ok(())
    }

    /// JSON config handed to plugin factories.
    pub fn plugin_config(&self) -> serde_json::Value {
        serde_json::json!({ "warmup_count": self.warmup_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn clear_env() {
        std::env::remove_var("KRONOS_CONFIG");
        std::env::remove_var("KRONOS_PLUGIN");
        std::env::remove_var("KRONOS_WARMUP_COUNT");
    }

    #[test]
    #[serial]
    fn defaults_to_stub_with_single_warmup() {
        clear_env();
        let cfg = AppConfig::from_env_and_toml().unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.plugin, "stub");
        assert_eq!(cfg.warmup_count, 1);
    }

    #[test]
    fn parses_runtime_table() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [runtime]
            plugin = "garch"
            warmup_count = 5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.plugin, "garch");
        assert_eq!(cfg.warmup_count, 5);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    #[serial]
    fn env_overrides_file() {
        clear_env();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[runtime]\nplugin = \"garch\"\nwarmup_count = 5").unwrap();
        std::env::set_var("KRONOS_CONFIG", file.path());
        std::env::set_var("KRONOS_WARMUP_COUNT", "9");
        let cfg = AppConfig::from_env_and_toml().unwrap();
        assert_eq!(cfg.plugin, "garch");
        assert_eq!(cfg.warmup_count, 9);
        clear_env();
    }

    #[test]
    #[serial]
    fn missing_explicit_file_is_an_error() {
        clear_env();
        std::env::set_var("KRONOS_CONFIG", "/nonexistent/kronos.toml");
        let err = AppConfig::from_env_and_toml().unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        clear_env();
    }

    #[test]
    fn validate_rejects_zero_warmup() {
        let cfg = AppConfig {
            warmup_count: 0,
            ..AppConfig::default()
        };
        assert!(cfg.validate().unwrap_err().to_string().contains("warmup_count"));
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn plugin_config_carries_warmup() {
        let cfg = AppConfig {
            warmup_count: 3,
            ..AppConfig::default()
        };
        assert_eq!(cfg.plugin_config()["warmup_count"], 3);
    }
}
