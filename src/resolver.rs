//! Turns numeric response codes into readable errors.
//!
//! Descriptions come from the `errors.ttl` ontology shipped in the Ingen
//! bundle. Without it every failure is reported by its raw code.

use crate::model::{Graph, Term};
use crate::ns::vocab;
use crate::{turtle, Error};
use std::path::Path;
use tracing::{debug, warn};

/// File inside the bundle that declares the error classes.
pub const ERRORS_FILE: &str = "errors.ttl";

#[derive(Debug, Clone, Default)]
pub struct ErrorResolver {
    ontology: Option<Graph>,
}

impl ErrorResolver {
    /// A resolver with no ontology; every code resolves to `unknown error`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_graph(ontology: Graph) -> Self {
        Self {
            ontology: Some(ontology),
        }
    }

    /// Load `errors.ttl` from `bundle`.
    ///
    /// A missing bundle or an unreadable file is logged and yields an empty
    /// resolver.
    pub fn load(bundle: Option<&Path>) -> Self {
        let Some(bundle) = bundle else {
            debug!("no Ingen bundle found, error descriptions disabled");
            return Self::empty();
        };

        let path = bundle.join(ERRORS_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read error descriptions");
                return Self::empty();
            }
        };

        match turtle::parse(&text, "ingen:/") {
            Ok(graph) => {
                debug!(path = %path.display(), triples = graph.len(), "loaded error descriptions");
                Self::from_graph(graph)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse error descriptions");
                Self::empty()
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.ontology.is_some()
    }

    /// The error for status `code`, with `cause` attached.
    pub fn resolve(&self, code: i64, cause: &str) -> Error {
        Error::Application {
            code,
            description: self.describe(code),
            cause: cause.to_string(),
        }
    }

    fn describe(&self, code: i64) -> String {
        let Some(ontology) = &self.ontology else {
            return format!("unknown error {}", code);
        };

        let class = ontology
            .matching(None, Some(vocab::INGERR_ERROR_CODE), None)
            .find(|t| t.object.as_integer() == Some(code))
            .map(|t| &t.subject);

        match class {
            None => format!("unknown error {}", code),
            Some(class) => match ontology.value(class, vocab::INGERR_FORMAT_STRING) {
                Some(Term::Literal { value, .. }) => value.clone(),
                _ => match class {
                    Term::Iri(iri) => iri.clone(),
                    other => other.to_string(),
                },
            },
        }
    }
}
