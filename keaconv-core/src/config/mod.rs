//! Translator settings

mod loader;

pub use loader::ConfigLoader;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::Ipv4Addr;

/// Settings of one translation run
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TranslateConfig {
    /// Address family of the source configuration
    #[serde(default)]
    pub family: Family,

    /// Host name resolution
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Output rendering
    #[serde(default)]
    pub output: OutputConfig,
}

/// DHCP address family
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    #[default]
    V4,
    V6,
}

impl Family {
    /// ISC name of the default option space
    pub fn default_space(self) -> &'static str {
        match self {
            Family::V4 => "dhcp",
            Family::V6 => "dhcp6",
        }
    }

    /// Top level key of the Kea configuration
    pub fn root_key(self) -> &'static str {
        match self {
            Family::V4 => "Dhcp4",
            Family::V6 => "Dhcp6",
        }
    }
}

/// Host name resolution settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolverConfig {
    /// Fall back to the system resolver for names missing from `hosts`
    #[serde(default = "default_true")]
    pub system: bool,

    /// Static host table
    #[serde(default)]
    pub hosts: BTreeMap<String, Vec<Ipv4Addr>>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            system: true,
            hosts: BTreeMap::new(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Keep skipped entries in plain JSON output
    #[serde(default = "default_true")]
    pub include_skipped: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            include_skipped: true,
        }
    }
}

/// Output rendering
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Kea JSON with `//` comments, skipped entries commented out
    #[default]
    Annotated,
    /// Plain JSON
    Json,
}

fn default_true() -> bool {
    true
}
