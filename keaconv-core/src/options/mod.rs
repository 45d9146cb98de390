//! Option and option space registry
//!
//! Options are identified by name or by code inside a space. Spaces carry
//! both their ISC DHCP name (used when parsing) and their Kea name (used in
//! the output).

mod builtin;

use crate::error::{Error, Result};
use smartstring::alias::String as Name;
use std::collections::HashMap;

/// How an option is handled by the translator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionStatus {
    /// Both ISC DHCP and Kea know the option
    Known,
    /// Kea has no equivalent: occurrences are kept but flagged
    Unknown,
    /// Needs a dedicated rewrite (server parameters)
    Special,
    /// Created while translating: `unknown-N` references and definitions
    Dynamic,
}

/// Metadata of an option
#[derive(Debug, Clone, PartialEq)]
pub struct OptionDescriptor {
    pub name: Name,
    pub code: u32,
    /// ISC name of the owning space
    pub space: Name,
    /// ISC DHCP format string, first letter drives value parsing
    pub format: Name,
    pub status: OptionStatus,
}

impl OptionDescriptor {
    pub fn new(
        name: &str,
        code: u32,
        space: &str,
        format: &str,
        status: OptionStatus,
    ) -> Self {
        Self {
            name: name.into(),
            code,
            space: space.into(),
            format: format.into(),
            status,
        }
    }

    /// First letter of the format string
    pub fn format_letter(&self) -> Option<char> {
        self.format.chars().next()
    }
}

/// An option space
#[derive(Debug, Clone, PartialEq)]
pub struct Space {
    /// Kea name
    pub name: Name,
    /// ISC DHCP name
    pub old: Name,
}

impl Space {
    pub fn new(old: &str, name: &str) -> Self {
        Self {
            name: name.into(),
            old: old.into(),
        }
    }
}

#[derive(Debug, Default)]
struct SpaceTable {
    by_name: HashMap<Name, usize>,
    by_code: HashMap<u32, usize>,
}

/// Registry of spaces and option descriptors
#[derive(Debug, Default)]
pub struct OptionRegistry {
    spaces: Vec<Space>,
    options: Vec<OptionDescriptor>,
    tables: HashMap<Name, SpaceTable>,
}

impl OptionRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the DHCPv4, DHCPv6, relay agent and server
    /// parameter tables
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        builtin::load(&mut registry);
        registry
    }

    /// Find a space by ISC name, then by Kea name
    pub fn lookup_space(&self, name: &str) -> Option<&Space> {
        self.spaces
            .iter()
            .find(|s| s.old == name)
            .or_else(|| self.spaces.iter().find(|s| s.name == name))
    }

    /// Add a space, replacing an existing one with the same ISC name
    pub fn register_space(&mut self, space: Space) {
        self.tables.entry(space.old.clone()).or_default();
        match self.spaces.iter_mut().find(|s| s.old == space.old) {
            Some(existing) => *existing = space,
            None => self.spaces.push(space),
        }
    }

    pub fn lookup_by_name(&self, space: &str, name: &str) -> Option<&OptionDescriptor> {
        let index = self.tables.get(space)?.by_name.get(name)?;
        self.options.get(*index)
    }

    pub fn lookup_by_code(&self, space: &str, code: u32) -> Option<&OptionDescriptor> {
        let index = self.tables.get(space)?.by_code.get(&code)?;
        self.options.get(*index)
    }

    /// Add a descriptor. A later registration shadows an earlier one with
    /// the same name or code. Code 0 means "not assigned yet".
    pub fn register(&mut self, option: OptionDescriptor) -> &OptionDescriptor {
        let index = self.options.len();
        let table = self.tables.entry(option.space.clone()).or_default();
        table.by_name.insert(option.name.clone(), index);
        if option.code != 0 {
            table.by_code.insert(option.code, index);
        }
        self.options.push(option);
        &self.options[index]
    }

    /// Give a code to a descriptor registered without one
    pub fn assign_code(&mut self, space: &str, name: &str, code: u32) -> Result<()> {
        let table = self
            .tables
            .get_mut(space)
            .ok_or_else(|| Error::Registry(format!("no option space named {}", space)))?;
        let index = *table
            .by_name
            .get(name)
            .ok_or_else(|| Error::Registry(format!("no option named {} in space {}", name, space)))?;
        table.by_code.insert(code, index);
        self.options[index].code = code;
        Ok(())
    }

    /// Number of registered descriptors
    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}
