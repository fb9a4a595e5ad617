//! Configuration file support
//!
//! Loads `.phpmend.toml` from the scanned root or a parent directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rules: RulesConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Default posture for every rule: "enabled" or "disabled"
    pub default: Option<String>,
    /// Rules with the opposite of the default posture
    pub exceptions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Glob patterns selecting the files to scan (empty means everything)
    pub include: Vec<String>,
    /// Glob patterns removing files from the scan
    pub exclude: Vec<String>,
}

impl Config {
    /// Load config searching from the given directory upward
    pub fn load_from(start_dir: &Path) -> Result<Option<(Config, PathBuf)>> {
        let mut current = Some(start_dir);

        while let Some(dir) = current {
            let config_path = dir.join(".phpmend.toml");
            if config_path.exists() {
                let config = Self::load_path(&config_path)?;
                return Ok(Some((config, config_path)));
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Load config from a specific path
    pub fn load_path(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_config(dir: &Path, content: &str) {
        std::fs::write(dir.join(".phpmend.toml"), content).unwrap();
    }

    #[test]
    fn test_load_basic_config() {
        let temp = TempDir::new().unwrap();
        create_config(
            temp.path(),
            r#"
[rules]
default = "enabled"
exceptions = ["phpmend:weak-hash"]

[paths]
include = ["src/**"]
exclude = ["src/legacy/**"]
"#,
        );

        let (config, path) = Config::load_from(temp.path()).unwrap().unwrap();

        assert_eq!(path, temp.path().join(".phpmend.toml"));
        assert_eq!(config.rules.default, Some("enabled".to_string()));
        assert_eq!(config.rules.exceptions, vec!["phpmend:weak-hash".to_string()]);
        assert_eq!(config.paths.include, vec!["src/**".to_string()]);
        assert_eq!(config.paths.exclude, vec!["src/legacy/**".to_string()]);
    }

    #[test]
    fn test_load_empty_config() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "");

        let (config, _) = Config::load_from(temp.path()).unwrap().unwrap();

        assert!(config.rules.default.is_none());
        assert!(config.rules.exceptions.is_empty());
        assert!(config.paths.include.is_empty());
        assert!(config.paths.exclude.is_empty());
    }

    #[test]
    fn test_found_in_parent_directory() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "[rules]\ndefault = \"disabled\"\n");
        let nested = temp.path().join("src/app");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, _) = Config::load_from(&nested).unwrap().unwrap();
        assert_eq!(config.rules.default, Some("disabled".to_string()));
    }

    #[test]
    fn test_no_config_found() {
        let temp = TempDir::new().unwrap();
        let result = Config::load_from(temp.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "rules = not toml [");
        assert!(Config::load_from(temp.path()).is_err());
    }
}
