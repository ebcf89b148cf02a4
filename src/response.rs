//! Response handling.
//!
//! A reply is parsed with the full set of known prefixes, checked for a
//! failing status, stripped of its `patch:Response` envelopes and merged into
//! the local model. The status check runs before anything is merged, so a
//! failed call never touches the model.

use crate::model::{Graph, Term};
use crate::ns::vocab;
use crate::prefix::PrefixRegistry;
use crate::resolver::ErrorResolver;
use crate::store::LocalModel;
use crate::{turtle, Error, Result};
use std::collections::BTreeSet;
use tracing::debug;

/// Base IRI responses are parsed against.
///
/// Identifiers that matter are always absolute, so this only has to be a
/// valid IRI; the server's own compound address does not resolve reliably.
pub const PARSE_BASE: &str = "ingen:/";

/// Parse `text` with every known prefix, then learn any prefixes it declares.
pub fn parse(text: &str, prefixes: &mut PrefixRegistry) -> Result<Graph> {
    let mut full = prefixes.prologue();
    full.push_str(text);
    let graph = turtle::parse(&full, PARSE_BASE)?;
    prefixes.learn(text);
    Ok(graph)
}

/// Response nodes in `graph`, failing on the first non-zero status.
pub fn check(graph: &Graph, resolver: &ErrorResolver, request: &str) -> Result<Vec<Term>> {
    let response_type = Term::iri(vocab::PATCH_RESPONSE);
    let mut responses = Vec::new();

    for node in graph.subjects(vocab::RDF_TYPE, &response_type) {
        let code = graph
            .value(node, vocab::PATCH_BODY)
            .and_then(Term::as_integer)
            .ok_or_else(|| {
                Error::Protocol(format!("response {} has no integer status body", node))
            })?;
        if code != 0 {
            return Err(resolver.resolve(code, request));
        }
        responses.push(node.clone());
    }

    if responses.is_empty() {
        return Err(Error::Protocol("reply contains no patch:Response".into()));
    }
    Ok(responses)
}

/// `seed` and every blank node reachable from it through object positions.
pub fn blank_closure(graph: &Graph, seed: &Term) -> BTreeSet<Term> {
    let mut closure = BTreeSet::from([seed.clone()]);
    let mut stack = vec![seed.clone()];

    while let Some(node) = stack.pop() {
        for t in graph.matching(Some(&node), None, None) {
            if t.object.is_blank() && closure.insert(t.object.clone()) {
                stack.push(t.object.clone());
            }
        }
    }
    closure
}

/// Remove the response envelopes and everything hanging off them.
pub fn prune(mut graph: Graph, responses: &[Term]) -> Graph {
    let closure: BTreeSet<Term> = responses
        .iter()
        .flat_map(|r| blank_closure(&graph, r))
        .collect();

    let response_type = Term::iri(vocab::PATCH_RESPONSE);
    graph.retain(|t| {
        !closure.contains(&t.subject)
            && !(t.predicate == vocab::RDF_TYPE && t.object == response_type)
    });
    graph
}

/// Apply every `patch:Put` in `payload` to `model`.
///
/// Blank nodes from this payload never match those of an earlier one.
pub fn merge(payload: &Graph, model: &mut LocalModel) -> usize {
    let put_type = Term::iri(vocab::PATCH_PUT);
    let scope = model.next_scope();
    let mut added = 0;
    for put in payload.subjects(vocab::RDF_TYPE, &put_type) {
        let subject = payload.value(put, vocab::PATCH_SUBJECT);
        let body = payload.value(put, vocab::PATCH_BODY);
        if let (Some(subject), Some(body)) = (subject, body) {
            added += model.merge_body(payload, subject, body, &scope);
        }
    }
    added
}

/// Handle one reply to `request` end to end, returning the pruned payload.
pub fn process(
    text: &str,
    request: &str,
    prefixes: &mut PrefixRegistry,
    resolver: &ErrorResolver,
    model: &mut LocalModel,
) -> Result<Graph> {
    let graph = parse(text, prefixes)?;
    let responses = check(&graph, resolver, request)?;
    let payload = prune(graph, &responses);
    let added = merge(&payload, model);
    debug!(payload = payload.len(), added, "applied response");
    Ok(payload)
}
