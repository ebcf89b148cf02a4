//! Namespace prefix bindings for a client session.
//!
//! Responses only declare the prefixes relevant to that exchange, so the
//! registry keeps every binding it has ever seen and resupplies the full set
//! as a prologue before each response is parsed.

use crate::ns::Namespace;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::debug;

/// Prefix name bound to the server's own addressing root.
pub const SERVER_PREFIX: &str = "server";

fn declaration() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"@prefix\s+([^:\s]*):\s*<([^>]*)>\s*\.")
            .expect("prefix declaration pattern is valid")
    })
}

/// Name to namespace bindings, last write wins, never shrinks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixRegistry {
    bindings: BTreeMap<String, String>,
}

impl PrefixRegistry {
    /// Registry seeded with `namespaces` and a `server` binding for `server_base`.
    pub fn new(namespaces: &[Namespace], server_base: &str) -> Self {
        let mut registry = Self::default();
        registry.bind(SERVER_PREFIX, server_base);
        for ns in namespaces {
            registry.bind(ns.prefix(), ns.uri());
        }
        registry
    }

    /// Registry seeded with every well-known namespace.
    pub fn with_defaults(server_base: &str) -> Self {
        Self::new(&Namespace::ALL, server_base)
    }

    pub fn bind(&mut self, name: impl Into<String>, uri: impl Into<String>) {
        self.bindings.insert(name.into(), uri.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Every binding as a Turtle `@prefix` line.
    pub fn prologue(&self) -> String {
        self.iter()
            .map(|(name, uri)| format!("@prefix {}: <{}> .\n", name, uri))
            .collect()
    }

    /// Bind every `@prefix` declaration line found in `text`.
    ///
    /// Returns the number of declarations bound.
    pub fn learn(&mut self, text: &str) -> usize {
        let mut count = 0;
        for line in text.lines().filter(|l| l.starts_with("@prefix")) {
            if let Some(caps) = declaration().captures(line) {
                let (name, uri) = (&caps[1], &caps[2]);
                if self.get(name) != Some(uri) {
                    debug!(prefix = name, uri, "learned prefix");
                }
                self.bind(name, uri);
                count += 1;
            }
        }
        count
    }

    /// Expand `name:local` into a full IRI.
    pub fn expand(&self, curie: &str) -> Option<String> {
        let (name, local) = curie.split_once(':')?;
        self.get(name).map(|uri| format!("{}{}", uri, local))
    }

    /// Shorten `iri` with the longest matching namespace.
    pub fn abbreviate(&self, iri: &str) -> Option<String> {
        self.iter()
            .filter(|(_, uri)| iri.starts_with(uri))
            .max_by_key(|(_, uri)| uri.len())
            .map(|(name, uri)| format!("{}:{}", name, &iri[uri.len()..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> PrefixRegistry {
        PrefixRegistry::with_defaults("unix:///tmp/ingen.sock/")
    }

    #[test]
    fn test_seeded_bindings() {
        let reg = registry();
        assert_eq!(reg.len(), Namespace::ALL.len() + 1);
        assert_eq!(reg.get("patch"), Some("http://lv2plug.in/ns/ext/patch#"));
        assert_eq!(reg.get(SERVER_PREFIX), Some("unix:///tmp/ingen.sock/"));
    }

    #[test]
    fn test_bind_overwrites() {
        let mut reg = registry();
        reg.bind("patch", "http://example.org/patch#");
        assert_eq!(reg.get("patch"), Some("http://example.org/patch#"));
        assert_eq!(reg.len(), Namespace::ALL.len() + 1);
    }

    #[test]
    fn test_prologue_lists_every_binding() {
        let reg = PrefixRegistry::new(&[Namespace::Rdf], "tcp://localhost:16180/");
        assert_eq!(
            reg.prologue(),
            "@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .\n\
             @prefix server: <tcp://localhost:16180/> .\n"
        );
    }

    #[test]
    fn test_learn_from_response_text() {
        let mut reg = registry();
        let text = "@prefix midi: <http://lv2plug.in/ns/ext/midi#> .\n\
                    @prefix lv2:   <http://lv2plug.in/ns/lv2core#>  .\n\
                    [] a <http://lv2plug.in/ns/ext/patch#Response> .\n\
                    # @prefix ignored: <http://example.org/> .\n";
        assert_eq!(reg.learn(text), 2);
        assert_eq!(reg.get("midi"), Some("http://lv2plug.in/ns/ext/midi#"));
        assert_eq!(reg.get("ignored"), None);
    }

    #[test]
    fn test_expand_and_abbreviate() {
        let reg = registry();
        assert_eq!(
            reg.expand("ingen:Graph").as_deref(),
            Some("http://drobilla.net/ns/ingen#Graph")
        );
        assert_eq!(reg.expand("nope:Graph"), None);
        assert_eq!(
            reg.abbreviate("http://lv2plug.in/ns/ext/patch#Put").as_deref(),
            Some("patch:Put")
        );
        assert_eq!(reg.abbreviate("http://example.org/x"), None);
    }
}
