use crate::model::{Graph, Term, Triple};

/// The client's mirror of the server's object graph.
///
/// Readers get a shared view; only response handling writes to it.
///
/// Blank nodes are only meaningful inside the reply that produced them, so
/// every merge relabels them under a fresh `r<n>_` scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalModel {
    graph: Graph,
    merges: u64,
}

impl LocalModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Everything known about `subject`.
    pub fn describe<'a>(&'a self, subject: &'a Term) -> impl Iterator<Item = &'a Triple> + 'a {
        self.graph.matching(Some(subject), None, None)
    }

    /// Blank node prefix for the next reply's triples.
    pub(crate) fn next_scope(&mut self) -> String {
        self.merges += 1;
        format!("r{}_", self.merges)
    }

    /// Copy every `(body, p, o)` of `update` onto `subject`, relabelling
    /// blank nodes under `scope`.
    ///
    /// Returns the number of triples that were not already present.
    pub(crate) fn merge_body(
        &mut self,
        update: &Graph,
        subject: &Term,
        body: &Term,
        scope: &str,
    ) -> usize {
        let mut added = 0;
        for t in update.matching(Some(body), None, None) {
            let triple = Triple::new(
                subject.scoped(scope),
                t.predicate.clone(),
                t.object.scoped(scope),
            );
            if self.graph.insert(triple) {
                added += 1;
            }
        }
        added
    }
}
