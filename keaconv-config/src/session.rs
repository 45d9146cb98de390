//! Translation session
//!
//! State shared by every parser entry point during one translation: the
//! option registry, the resolver, the issue counter, comments waiting for
//! the next element and soft diagnostics.

use crate::diagnostics::Diagnostic;
use crate::resolver::{HostResolver, StaticResolver};
use keaconv_core::config::{Family, TranslateConfig};
use keaconv_core::{Element, OptionRegistry};
use std::net::Ipv4Addr;

pub struct Session {
    pub family: Family,
    pub registry: OptionRegistry,
    resolver: Box<dyn HostResolver>,
    issues: usize,
    pending: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Session {
    pub fn new(family: Family, registry: OptionRegistry, resolver: Box<dyn HostResolver>) -> Self {
        Self {
            family,
            registry,
            resolver,
            issues: 0,
            pending: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Session with the built-in option tables and the configured resolver
    pub fn from_config(config: &TranslateConfig) -> Self {
        Self::new(
            config.family,
            OptionRegistry::builtin(),
            Box::new(StaticResolver::from_config(&config.resolver)),
        )
    }

    pub fn is_v4(&self) -> bool {
        self.family == Family::V4
    }

    /// Count one construct Kea cannot express
    pub fn issue(&mut self) {
        self.issues += 1;
        tracing::debug!("Unsupported construct #{}", self.issues);
    }

    /// Mark `element` unsupported and count it
    pub fn flag(&mut self, element: &mut Element) {
        element.set_skip();
        self.issue();
    }

    /// Like [`Session::flag`], for elements that may already be marked
    pub fn flag_once(&mut self, element: &mut Element) {
        if !element.skip {
            self.flag(element);
        }
    }

    /// Queue a comment for the next element taking comments
    pub fn comment(&mut self, comment: impl Into<String>) {
        self.pending.push(comment.into());
    }

    /// Attach the queued comments to `element`
    pub fn take_comments(&mut self, element: &mut Element) {
        element.take_comments(&mut self.pending);
    }

    /// Record a soft diagnostic
    pub fn warn(&mut self, position: usize, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{} (at offset {})", message, position);
        self.diagnostics.push(Diagnostic { position, message });
    }

    pub fn resolve(&self, name: &str) -> Vec<Ipv4Addr> {
        let addrs = self.resolver.resolve(name);
        tracing::debug!("{} resolves to {:?}", name, addrs);
        addrs
    }

    pub fn issues(&self) -> usize {
        self.issues
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
