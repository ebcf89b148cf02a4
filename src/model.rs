//! Terms, triples and graphs.
//!
//! A [`Graph`] is a set of [`Triple`]s: inserting a duplicate is a no-op and
//! iteration follows the total order of the triples, so output is stable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A node or value in a triple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    /// Absolute IRI.
    Iri(String),

    /// Blank node label, only meaningful inside the response it came from.
    Blank(String),

    /// Literal with an optional datatype IRI or language tag.
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Term::Blank(id.into())
    }

    /// Plain string literal.
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Term::Literal {
            value: value.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    /// Copy of this term with a blank node label prefixed by `scope`.
    pub fn scoped(&self, scope: &str) -> Term {
        match self {
            Term::Blank(id) => Term::Blank(format!("{}{}", scope, id)),
            other => other.clone(),
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Integer value of a literal, ignoring its datatype.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Term::Literal { value, .. } => value.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Blank(id) => write!(f, "_:{}", id),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                f.write_str("\"")?;
                for c in value.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")?;
                if let Some(lang) = language {
                    write!(f, "@{}", lang)
                } else if let Some(dt) = datatype {
                    write!(f, "^^<{}>", dt)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// A (subject, predicate, object) statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

/// A set of triples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    triples: BTreeSet<Triple>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple, returning `false` if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Triples matching a pattern; `None` matches anything.
    pub fn matching<'a>(
        &'a self,
        subject: Option<&'a Term>,
        predicate: Option<&'a str>,
        object: Option<&'a Term>,
    ) -> impl Iterator<Item = &'a Triple> + 'a {
        self.triples.iter().filter(move |t| {
            subject.map_or(true, |s| &t.subject == s)
                && predicate.map_or(true, |p| t.predicate == p)
                && object.map_or(true, |o| &t.object == o)
        })
    }

    /// First object of `(subject, predicate, ?)`.
    pub fn value(&self, subject: &Term, predicate: &str) -> Option<&Term> {
        self.triples
            .iter()
            .find(|t| &t.subject == subject && t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Subjects of `(?, predicate, object)`.
    pub fn subjects<'a>(
        &'a self,
        predicate: &'a str,
        object: &'a Term,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.matching(None, Some(predicate), Some(object))
            .map(|t| &t.subject)
    }

    pub fn retain(&mut self, f: impl FnMut(&Triple) -> bool) {
        self.triples.retain(f);
    }
}

impl Extend<Triple> for Graph {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.triples.extend(iter);
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Graph {
    type Item = Triple;
    type IntoIter = std::collections::btree_set::IntoIter<Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = std::collections::btree_set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ns::vocab;

    fn main_is_graph() -> Triple {
        Triple::new(
            Term::iri("ingen:/root/main"),
            vocab::RDF_TYPE,
            Term::iri(vocab::INGEN_GRAPH),
        )
    }

    #[test]
    fn test_duplicates_are_suppressed() {
        let mut g = Graph::new();
        assert!(g.insert(main_is_graph()));
        assert!(!g.insert(main_is_graph()));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn test_matching_and_value() {
        let mut g = Graph::new();
        g.insert(main_is_graph());
        g.insert(Triple::new(
            Term::iri("ingen:/root/main"),
            vocab::PATCH_BODY,
            Term::typed("0", "http://www.w3.org/2001/XMLSchema#integer"),
        ));

        let main = Term::iri("ingen:/root/main");
        assert_eq!(g.matching(Some(&main), None, None).count(), 2);
        assert_eq!(g.value(&main, vocab::PATCH_BODY).and_then(Term::as_integer), Some(0));
        let graph_type = Term::iri(vocab::INGEN_GRAPH);
        assert_eq!(
            g.subjects(vocab::RDF_TYPE, &graph_type).collect::<Vec<_>>(),
            vec![&main]
        );
        assert!(g.value(&Term::blank("b0"), vocab::PATCH_BODY).is_none());
    }

    #[test]
    fn test_scoped_only_relabels_blank_nodes() {
        assert_eq!(Term::blank("b0").scoped("r3_"), Term::blank("r3_b0"));
        assert_eq!(
            Term::iri("ingen:/root").scoped("r3_"),
            Term::iri("ingen:/root")
        );
        assert_eq!(Term::literal("b0").scoped("r3_"), Term::literal("b0"));
    }

    #[test]
    fn test_literal_display_escapes() {
        let t = Term::literal("say \"hi\"\n");
        assert_eq!(t.to_string(), r#""say \"hi\"\n""#);

        let lang = Term::Literal {
            value: "gain".into(),
            datatype: None,
            language: Some("en".into()),
        };
        assert_eq!(lang.to_string(), "\"gain\"@en");
        assert_eq!(Term::blank("b1").to_string(), "_:b1");
    }
}
