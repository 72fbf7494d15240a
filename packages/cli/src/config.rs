use anyhow::anyhow;
use blockpress_fields::ContentFieldConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "blockpress.config.json";

/// Blockpress configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Content fields, each with its own block set
    #[serde(default = "default_fields")]
    pub fields: Vec<ContentFieldConfig>,
}

fn default_fields() -> Vec<ContentFieldConfig> {
    vec![ContentFieldConfig::default()]
}

impl Config {
    /// Load config from a directory, or from an explicit file
    pub fn load(cwd: &str, explicit: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), fields = config.fields.len(), "Loaded config");
            Ok(config)
        } else if explicit.is_some() {
            Err(anyhow!("Config file does not exist: {}", config_path.display()))
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Field by path, or the first configured field
    pub fn field(&self, path: Option<&str>) -> anyhow::Result<&ContentFieldConfig> {
        match path {
            Some(path) => self
                .fields
                .iter()
                .find(|field| field.path == path)
                .ok_or_else(|| anyhow!("No Content field named '{}' in config", path)),
            None => self
                .fields
                .first()
                .ok_or_else(|| anyhow!("Config has no Content fields")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fields: default_fields(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "fields": [
                { "path": "body", "blockTypes": ["cloudinaryImage"] },
                { "path": "summary", "blockTypes": ["relationshipTag"], "blockOptions": { "relationshipTag": { "max": 3 } } }
            ]
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.fields.len(), 2);
        assert_eq!(config.field(None).unwrap().path, "body");
        assert_eq!(config.field(Some("summary")).unwrap().block_types, vec!["relationshipTag"]);
        assert!(config.field(Some("missing")).is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fields.len(), 1);
        assert_eq!(config.fields[0].path, "content");
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        assert_eq!(Config::load(&cwd, None).unwrap().fields[0].path, "content");

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "fields": [{ "path": "body" }] }"#,
        )
        .unwrap();
        assert_eq!(Config::load(&cwd, None).unwrap().fields[0].path, "body");

        let missing = dir.path().join("nope.json");
        assert!(Config::load(&cwd, Some(&missing)).is_err());
    }
}
