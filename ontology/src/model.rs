//! Core RDF model types.
//!
//! A loaded ontology is a flat set of [`Statement`]s. Terms own their strings
//! so a [`TripleStore`](crate::TripleStore) can outlive the documents it was
//! parsed from.

use std::fmt;

/// An RDF literal: lexical form plus optional datatype IRI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    /// The lexical form, e.g. `"1"` or `"Tag"`.
    pub lexical: String,
    /// Full IRI of the datatype, or `None` for a plain literal.
    pub datatype: Option<String>,
}

/// A node in a statement position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    /// An absolute IRI.
    Iri(String),
    /// A blank node, identified by its document-local label.
    Blank(String),
    /// A literal value.
    Literal(Literal),
}

impl Term {
    /// Builds an IRI term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Builds a literal term with an optional datatype.
    pub fn literal(lexical: impl Into<String>, datatype: Option<&str>) -> Self {
        Term::Literal(Literal {
            lexical: lexical.into(),
            datatype: datatype.map(str::to_string),
        })
    }

    /// Returns the IRI if this term is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Returns the lexical form if this term is a literal.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Term::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns the IRI or the literal's lexical form; `None` for blank nodes.
    #[must_use]
    pub fn value_str(&self) -> Option<&str> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal(lit) => Some(&lit.lexical),
            Term::Blank(_) => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Blank(label) => write!(f, "_:{label}"),
            Term::Literal(Literal {
                lexical,
                datatype: Some(dt),
            }) => write!(f, "{lexical:?}^^<{dt}>"),
            Term::Literal(Literal {
                lexical,
                datatype: None,
            }) => write!(f, "{lexical:?}"),
        }
    }
}

/// A single (subject, predicate, object) fact, optionally inside a named graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Statement {
    /// Subject: an IRI or blank node.
    pub subject: Term,
    /// Predicate IRI.
    pub predicate: Term,
    /// Object: any term.
    pub object: Term,
    /// Named graph the statement was read from (TriG / N-Quads only).
    pub graph: Option<Term>,
}

impl Statement {
    /// Builds a statement in the default graph.
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph: None,
        }
    }

    /// Returns a copy of this statement placed in `graph`.
    #[must_use]
    pub fn in_graph(mut self, graph: Term) -> Self {
        self.graph = Some(graph);
        self
    }
}

/// Extracts the local name of an IRI: the part after the last `#`, `/` or `:`.
///
/// E.g. `"http://www.semanticdesktop.org/ontologies/2007/08/15/nao#Tag"` → `"Tag"`.
#[must_use]
pub fn local_name(iri: &str) -> &str {
    match iri.rfind(['#', '/', ':']) {
        Some(pos) => &iri[pos + 1..],
        None => iri,
    }
}

/// Returns the namespace part of an IRI, up to and including the last `#` or `/`.
#[must_use]
pub fn namespace_of(iri: &str) -> &str {
    match iri.rfind(['#', '/']) {
        Some(pos) => &iri[..=pos],
        None => iri,
    }
}

/// Returns the IRI section that precedes the local name, which by convention
/// names the ontology (`.../15/nao#Tag` → `"nao"`).
#[must_use]
pub fn ontology_section(iri: &str) -> &str {
    let sections: Vec<&str> = iri.split(['#', '/', ':']).collect();
    if sections.len() >= 2 {
        sections[sections.len() - 2]
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAO_TAG: &str = "http://www.semanticdesktop.org/ontologies/2007/08/15/nao#Tag";

    #[test]
    fn local_name_extraction() {
        assert_eq!(local_name(NAO_TAG), "Tag");
        assert_eq!(local_name("http://example.org/onto/Person"), "Person");
        assert_eq!(local_name("urn:x:thing"), "thing");
        assert_eq!(local_name("plain"), "plain");
    }

    #[test]
    fn namespace_and_ontology_section() {
        assert_eq!(
            namespace_of(NAO_TAG),
            "http://www.semanticdesktop.org/ontologies/2007/08/15/nao#"
        );
        assert_eq!(ontology_section(NAO_TAG), "nao");
        assert_eq!(ontology_section("http://example.org/onto/Person"), "onto");
    }

    #[test]
    fn display_uses_ntriples_shapes() {
        assert_eq!(Term::iri("http://x/a").to_string(), "<http://x/a>");
        assert_eq!(Term::Blank("b0".into()).to_string(), "_:b0");
        assert_eq!(
            Term::literal("1", Some("http://www.w3.org/2001/XMLSchema#integer")).to_string(),
            "\"1\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }
}
