//! ISC DHCP to Kea configuration translator
//!
//! This crate parses `dhcpd.conf` sources and produces the equivalent Kea
//! element tree, annotated with comments on constructs that have no direct
//! Kea counterpart.
//!
//! # Example
//!
//! ```rust,ignore
//! use keaconv_config::translate;
//! use keaconv_core::config::TranslateConfig;
//!
//! let source = r#"
//!     default-lease-time 600;
//!     subnet 10.0.0.0 netmask 255.255.255.0 {
//!         range 10.0.0.10 10.0.0.100;
//!     }
//! "#;
//!
//! let translation = translate(source, &TranslateConfig::default()).unwrap();
//! println!("{}", translation.root);
//! ```

pub mod adapter;
pub mod diagnostics;
pub mod parser;
pub mod resolver;
pub mod session;

pub use diagnostics::Diagnostic;
pub use parser::{ParseError, Token, Translation, tokenize, LexError};

use keaconv_core::config::{ConfigLoader, OutputConfig, OutputFormat, TranslateConfig};
use std::path::Path;

/// Translate a configuration source string
pub fn translate(source: &str, config: &TranslateConfig) -> Result<Translation, ParseError> {
    parser::parse(source, config)
}

/// Load and translate a configuration file
pub fn translate_file(
    path: impl AsRef<Path>,
    config: &TranslateConfig,
) -> Result<Translation, TranslateError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    tracing::debug!("Read {} bytes from {}", source.len(), path.display());
    Ok(translate(&source, config)?)
}

/// Load translator settings, defaults when no file is given
pub fn load_settings(path: Option<&Path>) -> Result<TranslateConfig, TranslateError> {
    match path {
        Some(path) => Ok(ConfigLoader::load(path)?),
        None => Ok(TranslateConfig::default()),
    }
}

/// Render a translation in the configured output format
pub fn render_output(
    translation: &Translation,
    output: &OutputConfig,
) -> keaconv_core::Result<String> {
    match output.format {
        OutputFormat::Annotated => Ok(adapter::render(&translation.root)),
        OutputFormat::Json => adapter::json::serialize(&translation.root, output.include_skipped),
    }
}

/// Full translation error
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Config(#[from] keaconv_core::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use keaconv_core::config::Family;
    use std::io::Write;

    #[test]
    fn test_full_translate() {
        let source = r#"
            default-lease-time 600;
            option domain-name "example.org";

            subnet 10.0.0.0 netmask 255.255.255.0 {
                range 10.0.0.10 10.0.0.100;
                option routers 10.0.0.1;
            }
        "#;

        let translation = translate(source, &TranslateConfig::default()).unwrap();
        let dhcp4 = translation.root.as_map().unwrap().get("Dhcp4").unwrap();
        let dhcp4 = dhcp4.as_map().unwrap();
        assert_eq!(dhcp4.get("valid-lifetime").unwrap().as_integer(), Some(600));
        assert!(dhcp4.contains("option-data"));
        let subnets = dhcp4.get("subnet4").unwrap().as_list().unwrap();
        assert_eq!(subnets.len(), 1);
        let subnet = subnets[0].as_map().unwrap();
        assert_eq!(subnet.get("subnet").unwrap().as_str(), Some("10.0.0.0/24"));
    }

    #[test]
    fn test_translate_v6() {
        let config = TranslateConfig {
            family: Family::V6,
            ..Default::default()
        };
        let source = "subnet6 2001:db8::/64 { range6 2001:db8::10 2001:db8::ff; }";
        let translation = translate(source, &config).unwrap();
        let root = translation.root.as_map().unwrap();
        assert!(root.contains("Dhcp6"));
        assert_eq!(translation.issues, 0);
    }

    #[test]
    fn test_translate_error() {
        let err = translate("subnet 10.0.0.0 netmask 255.0.255.0 { }", &TranslateConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("not a valid netmask"));
    }

    #[test]
    fn test_translate_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max-lease-time 7200;").unwrap();
        let translation = translate_file(file.path(), &TranslateConfig::default()).unwrap();
        assert!(translation.root.to_string().contains("max-lease-time"));

        let err = translate_file("/nonexistent/dhcpd.conf", &TranslateConfig::default());
        assert!(matches!(err, Err(TranslateError::Io(_))));
    }

    #[test]
    fn test_render_output() {
        let translation = translate(
            "ping-check true; default-lease-time 60;",
            &TranslateConfig::default(),
        )
        .unwrap();
        let mut output = OutputConfig::default();
        let annotated = render_output(&translation, &output).unwrap();
        assert!(annotated.contains("//"));
        assert!(annotated.contains("\"valid-lifetime\": 60"));

        output.format = OutputFormat::Json;
        output.include_skipped = false;
        let json = render_output(&translation, &output).unwrap();
        assert!(!json.contains("ping-check"));
        assert!(json.contains("\"valid-lifetime\": 60"));
    }

    #[test]
    fn test_load_settings_default() {
        let config = load_settings(None).unwrap();
        assert_eq!(config.family, Family::V4);
    }
}
