/// Well-known namespaces the client binds at startup
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    Atom,
    Ingen,
    Ingerr,
    Lv2,
    Patch,
    Rdf,
    Rsz,
    Xsd,
}

impl Namespace {
    pub const ALL: [Namespace; 8] = [
        Namespace::Atom,
        Namespace::Ingen,
        Namespace::Ingerr,
        Namespace::Lv2,
        Namespace::Patch,
        Namespace::Rdf,
        Namespace::Rsz,
        Namespace::Xsd,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            Namespace::Atom => "atom",
            Namespace::Ingen => "ingen",
            Namespace::Ingerr => "ingerr",
            Namespace::Lv2 => "lv2",
            Namespace::Patch => "patch",
            Namespace::Rdf => "rdf",
            Namespace::Rsz => "rsz",
            Namespace::Xsd => "xsd",
        }
    }

    pub fn uri(self) -> &'static str {
        match self {
            Namespace::Atom => "http://lv2plug.in/ns/ext/atom#",
            Namespace::Ingen => "http://drobilla.net/ns/ingen#",
            Namespace::Ingerr => "http://drobilla.net/ns/ingen/errors#",
            Namespace::Lv2 => "http://lv2plug.in/ns/lv2core#",
            Namespace::Patch => "http://lv2plug.in/ns/ext/patch#",
            Namespace::Rdf => "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
            Namespace::Rsz => "http://lv2plug.in/ns/ext/resize-port#",
            Namespace::Xsd => "http://www.w3.org/2001/XMLSchema#",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| ns.prefix() == prefix)
    }

    /// Full IRI of `local` in this namespace.
    pub fn term(self, local: &str) -> String {
        format!("{}{}", self.uri(), local)
    }
}

/// Vocabulary terms used by the patch protocol, as full IRIs.
pub mod vocab {
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    pub const PATCH_GET: &str = "http://lv2plug.in/ns/ext/patch#Get";
    pub const PATCH_PUT: &str = "http://lv2plug.in/ns/ext/patch#Put";
    pub const PATCH_PATCH: &str = "http://lv2plug.in/ns/ext/patch#Patch";
    pub const PATCH_SET: &str = "http://lv2plug.in/ns/ext/patch#Set";
    pub const PATCH_DELETE: &str = "http://lv2plug.in/ns/ext/patch#Delete";
    pub const PATCH_RESPONSE: &str = "http://lv2plug.in/ns/ext/patch#Response";

    pub const PATCH_SUBJECT: &str = "http://lv2plug.in/ns/ext/patch#subject";
    pub const PATCH_BODY: &str = "http://lv2plug.in/ns/ext/patch#body";
    pub const PATCH_REMOVE: &str = "http://lv2plug.in/ns/ext/patch#remove";
    pub const PATCH_ADD: &str = "http://lv2plug.in/ns/ext/patch#add";
    pub const PATCH_PROPERTY: &str = "http://lv2plug.in/ns/ext/patch#property";
    pub const PATCH_VALUE: &str = "http://lv2plug.in/ns/ext/patch#value";

    pub const INGEN_ARC: &str = "http://drobilla.net/ns/ingen#Arc";
    pub const INGEN_GRAPH: &str = "http://drobilla.net/ns/ingen#Graph";
    pub const INGEN_TAIL: &str = "http://drobilla.net/ns/ingen#tail";
    pub const INGEN_HEAD: &str = "http://drobilla.net/ns/ingen#head";

    pub const INGERR_ERROR_CODE: &str = "http://drobilla.net/ns/ingen/errors#errorCode";
    pub const INGERR_FORMAT_STRING: &str = "http://drobilla.net/ns/ingen/errors#formatString";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_is_well_formed() {
        let prefixes: HashSet<_> = Namespace::ALL.iter().map(|ns| ns.prefix()).collect();
        let uris: HashSet<_> = Namespace::ALL.iter().map(|ns| ns.uri()).collect();
        assert_eq!(prefixes.len(), Namespace::ALL.len());
        assert_eq!(uris.len(), Namespace::ALL.len());

        for ns in Namespace::ALL {
            assert!(ns.uri().ends_with('#'), "{} must end with '#'", ns.uri());
            assert!(oxiri::Iri::parse(ns.uri()).is_ok());
            assert_eq!(Namespace::from_prefix(ns.prefix()), Some(ns));
        }
        assert_eq!(Namespace::from_prefix("server"), None);
    }

    #[test]
    fn test_vocab_matches_namespaces() {
        assert_eq!(Namespace::Rdf.term("type"), vocab::RDF_TYPE);
        assert_eq!(Namespace::Patch.term("Response"), vocab::PATCH_RESPONSE);
        assert_eq!(Namespace::Patch.term("body"), vocab::PATCH_BODY);
        assert_eq!(Namespace::Ingen.term("Arc"), vocab::INGEN_ARC);
        assert_eq!(Namespace::Ingerr.term("errorCode"), vocab::INGERR_ERROR_CODE);
    }
}
