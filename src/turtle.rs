//! Turtle reading and writing.
//!
//! Parsing and formatting are delegated to Rio; this module only converts
//! between Rio's borrowed model and the owned [`Graph`].

use crate::model::{Graph, Term, Triple};
use crate::{Error, Result};
use oxiri::Iri;
use rio_api::formatter::TriplesFormatter;
use rio_api::model::{BlankNode, Literal, NamedNode, Subject};
use rio_api::parser::TriplesParser;
use rio_turtle::{TurtleFormatter, TurtleParser};

/// Parse Turtle text into a fresh graph.
///
/// Relative IRIs resolve against `base`.
pub fn parse(text: &str, base: &str) -> Result<Graph> {
    let base = Iri::parse(base.to_string())
        .map_err(|e| Error::Protocol(format!("invalid base IRI `{}`: {}", base, e)))?;

    let mut parser = TurtleParser::new(text.as_bytes(), Some(base));
    let mut graph = Graph::new();

    parser.parse_all(&mut |t| -> Result<()> {
        let subject = match t.subject {
            Subject::NamedNode(n) => Term::iri(n.iri),
            Subject::BlankNode(n) => Term::blank(n.id),
            other => return Err(Error::Protocol(format!("unsupported subject {}", other))),
        };
        let object = match t.object {
            rio_api::model::Term::NamedNode(n) => Term::iri(n.iri),
            rio_api::model::Term::BlankNode(n) => Term::blank(n.id),
            rio_api::model::Term::Literal(l) => literal(l),
            other => return Err(Error::Protocol(format!("unsupported object {}", other))),
        };
        graph.insert(Triple::new(subject, t.predicate.iri, object));
        Ok(())
    })?;

    Ok(graph)
}

fn literal(l: Literal<'_>) -> Term {
    match l {
        Literal::Simple { value } => Term::literal(value),
        Literal::LanguageTaggedString { value, language } => Term::Literal {
            value: value.to_string(),
            datatype: None,
            language: Some(language.to_string()),
        },
        Literal::Typed { value, datatype } => Term::typed(value, datatype.iri),
    }
}

/// Serialize a graph as Turtle.
pub fn to_string(graph: &Graph) -> Result<String> {
    let mut formatter = TurtleFormatter::new(Vec::new());

    for triple in graph {
        let subject = match &triple.subject {
            Term::Iri(iri) => Subject::NamedNode(NamedNode { iri }),
            Term::Blank(id) => Subject::BlankNode(BlankNode { id }),
            Term::Literal { .. } => {
                return Err(Error::Protocol(format!(
                    "literal in subject position: {}",
                    triple
                )))
            }
        };
        let object = match &triple.object {
            Term::Iri(iri) => rio_api::model::Term::NamedNode(NamedNode { iri }),
            Term::Blank(id) => rio_api::model::Term::BlankNode(BlankNode { id }),
            Term::Literal {
                value,
                datatype,
                language,
            } => rio_api::model::Term::Literal(match (language, datatype) {
                (Some(language), _) => Literal::LanguageTaggedString { value, language },
                (None, Some(iri)) => Literal::Typed {
                    value,
                    datatype: NamedNode { iri },
                },
                (None, None) => Literal::Simple { value },
            }),
        };

        formatter
            .format(&rio_api::model::Triple {
                subject,
                predicate: NamedNode {
                    iri: &triple.predicate,
                },
                object,
            })
            .map_err(|e| Error::Protocol(format!("failed to format triple: {}", e)))?;
    }

    let buf = formatter
        .finish()
        .map_err(|e| Error::Protocol(format!("failed to finish Turtle output: {}", e)))?;
    String::from_utf8(buf).map_err(|e| Error::Protocol(e.to_string()))
}
