//! Settings loader

use crate::config::TranslateConfig;
use crate::error::{Error, Result};
use std::path::Path;

/// Settings loader for TOML and JSON files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load settings from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<TranslateConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config = match ext {
            "json" => Self::from_json(&content)?,
            "toml" => Self::from_toml(&content)?,
            _ => return Err(Error::Config(format!("Unknown settings format: {}", ext))),
        };
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Parse JSON settings
    pub fn from_json(content: &str) -> Result<TranslateConfig> {
        serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid JSON: {}", e)))
    }

    /// Parse TOML settings
    pub fn from_toml(content: &str) -> Result<TranslateConfig> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Family, OutputFormat};
    use std::io::Write;

    #[test]
    fn test_json_loading() {
        let json = r#"{"family": "v6", "output": {"format": "json"}}"#;
        let config = ConfigLoader::from_json(json).unwrap();
        assert_eq!(config.family, Family::V6);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.include_skipped);
        assert!(config.resolver.system);
    }

    #[test]
    fn test_toml_loading() {
        let toml = r#"
            family = "v4"

            [resolver]
            system = false

            [resolver.hosts]
            "ns1.example.com" = ["192.0.2.1"]
        "#;
        let config = ConfigLoader::from_toml(toml).unwrap();
        assert!(!config.resolver.system);
        assert_eq!(
            config.resolver.hosts["ns1.example.com"],
            vec!["192.0.2.1".parse::<std::net::Ipv4Addr>().unwrap()]
        );
    }

    #[test]
    fn test_load_dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "family = \"v6\"").unwrap();
        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.family, Family::V6);

        let other = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(ConfigLoader::load(other.path()), Err(Error::Config(_))));
    }

    #[test]
    fn test_unreadable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("keaconv.toml");
        assert!(matches!(ConfigLoader::load(&missing), Err(Error::Io(_))));
    }
}
