//! Class and property index, built once from a [`TripleStore`].
//!
//! Everything downstream (hierarchy resolution, property collection, naming)
//! reads this index instead of querying the store, so the store is consulted
//! exactly once per run.

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroU32;

use tracing::{debug, warn};

use crate::model::{local_name, namespace_of, ontology_section, Term};
use crate::store::{Pattern, Slot, TripleStore};
use crate::vocab::{
    is_root_type, CLASS_TYPES, NAO_HAS_DEFAULT_NAMESPACE_ABBREVIATION, NRL_CARDINALITY,
    NRL_MAX_CARDINALITY, OWL_FUNCTIONAL_PROPERTY, PROPERTY_TYPES, RDFS_COMMENT, RDFS_DOMAIN,
    RDFS_LABEL, RDFS_RANGE, RDFS_SUBCLASS_OF, RDF_TYPE,
};

/// Maximum number of values a property may hold on one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cardinality {
    /// At most this many values.
    Bounded(NonZeroU32),
    /// No declared limit.
    Unbounded,
}

impl Cardinality {
    /// Exactly one value.
    pub const ONE: Cardinality = Cardinality::Bounded(NonZeroU32::MIN);

    /// Parses an `nrl:cardinality` literal. Zero or garbage means unbounded.
    #[must_use]
    pub fn from_lexical(lexical: &str) -> Self {
        lexical
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new)
            .map_or(Cardinality::Unbounded, Cardinality::Bounded)
    }

    /// True for cardinality 1, which produces singular accessors.
    #[must_use]
    pub fn is_single(self) -> bool {
        self == Self::ONE
    }
}

/// An ontology class as seen by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologyClass {
    /// Full IRI; the unique key.
    pub uri: String,
    /// `rdfs:label`, or the IRI local name when absent.
    pub label: String,
    /// `rdfs:comment`, if any.
    pub comment: Option<String>,
    /// Lower-case namespace abbreviation of the declaring ontology.
    pub namespace: String,
    /// Direct parent IRIs that are themselves declared classes, sorted.
    /// Root types and the class itself are never listed.
    pub parents: Vec<String>,
}

impl OntologyClass {
    /// True if the class declares no parent and hangs directly off the root type.
    #[must_use]
    pub fn is_root_level(&self) -> bool {
        self.parents.is_empty()
    }
}

/// An ontology property as seen by the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Full IRI; the unique key.
    pub uri: String,
    /// Domain class IRIs (root type for domain-less properties), sorted.
    pub domains: Vec<String>,
    /// Range IRI: an XSD datatype, `rdfs:Literal`, or a class.
    pub range: String,
    /// Declared cardinality.
    pub cardinality: Cardinality,
    /// `rdfs:comment`, if any.
    pub comment: Option<String>,
    /// Lower-case namespace abbreviation of the declaring ontology.
    pub namespace: String,
}

/// Read-only view of the classes and properties in a store.
#[derive(Debug, Default)]
pub struct OntologyIndex {
    classes: BTreeMap<String, OntologyClass>,
    properties: BTreeMap<String, Property>,
    by_domain: BTreeMap<String, Vec<String>>,
}

impl OntologyIndex {
    /// Indexes every declared class and property of `store`.
    #[must_use]
    pub fn build(store: &TripleStore) -> Self {
        let abbreviations = Abbreviations::collect(store);

        let mut class_uris: BTreeSet<&str> = BTreeSet::new();
        for ty in CLASS_TYPES {
            class_uris.extend(store.subjects(RDF_TYPE, &Term::iri(ty)));
        }
        class_uris.retain(|uri| !is_root_type(uri));

        let mut classes = BTreeMap::new();
        for &uri in &class_uris {
            let mut parents = Vec::new();
            for parent in store.objects(uri, RDFS_SUBCLASS_OF) {
                let Some(parent) = parent.as_iri() else {
                    continue;
                };
                if parent == uri {
                    debug!(class = uri, "ignoring reflexive rdfs:subClassOf");
                } else if class_uris.contains(parent) {
                    parents.push(parent.to_string());
                }
            }
            let class = OntologyClass {
                uri: uri.to_string(),
                label: first_literal(store, uri, RDFS_LABEL)
                    .unwrap_or_else(|| local_name(uri).to_string()),
                comment: first_literal(store, uri, RDFS_COMMENT),
                namespace: abbreviations.for_uri(uri),
                parents,
            };
            classes.insert(uri.to_string(), class);
        }

        let mut property_uris: BTreeSet<&str> = BTreeSet::new();
        for ty in PROPERTY_TYPES {
            property_uris.extend(store.subjects(RDF_TYPE, &Term::iri(ty)));
        }

        let mut properties = BTreeMap::new();
        let mut by_domain: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for &uri in &property_uris {
            let ranges: Vec<&str> = store
                .objects(uri, RDFS_RANGE)
                .into_iter()
                .filter_map(Term::as_iri)
                .collect();
            let Some(&range) = ranges.first() else {
                warn!(property = uri, "property has no rdfs:range; skipped");
                continue;
            };
            if ranges.len() > 1 {
                warn!(property = uri, range, "property has several ranges; using the first");
            }

            let domains: Vec<String> = store
                .objects(uri, RDFS_DOMAIN)
                .into_iter()
                .filter_map(Term::as_iri)
                .map(str::to_string)
                .collect();
            for domain in &domains {
                by_domain
                    .entry(domain.clone())
                    .or_default()
                    .push(uri.to_string());
            }

            let property = Property {
                uri: uri.to_string(),
                domains,
                range: range.to_string(),
                cardinality: cardinality_of(store, uri),
                comment: first_literal(store, uri, RDFS_COMMENT),
                namespace: abbreviations.for_uri(uri),
            };
            properties.insert(uri.to_string(), property);
        }

        debug!(
            classes = classes.len(),
            properties = properties.len(),
            "ontology index built"
        );
        Self {
            classes,
            properties,
            by_domain,
        }
    }

    /// Looks up a class by IRI.
    #[must_use]
    pub fn class(&self, uri: &str) -> Option<&OntologyClass> {
        self.classes.get(uri)
    }

    /// Iterates over every class, ordered by IRI.
    pub fn classes(&self) -> impl Iterator<Item = &OntologyClass> {
        self.classes.values()
    }

    /// Number of indexed classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Looks up a property by IRI.
    #[must_use]
    pub fn property(&self, uri: &str) -> Option<&Property> {
        self.properties.get(uri)
    }

    /// Number of indexed properties.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Properties whose domain is exactly `class_uri`, ordered by IRI.
    pub fn properties_with_domain(&self, class_uri: &str) -> impl Iterator<Item = &Property> {
        self.by_domain
            .get(class_uri)
            .into_iter()
            .flatten()
            .filter_map(|uri| self.properties.get(uri))
    }
}

/// Namespace abbreviation sources found in the store.
struct Abbreviations<'a> {
    /// Graph or namespace IRI → declared abbreviation.
    declared: BTreeMap<&'a str, String>,
    /// Subject IRI → named graphs it is described in.
    graphs_of: BTreeMap<&'a str, BTreeSet<&'a str>>,
}

impl<'a> Abbreviations<'a> {
    fn collect(store: &'a TripleStore) -> Self {
        let mut declared = BTreeMap::new();
        let rows = store.query(&Pattern::new(
            Slot::Var("g"),
            Slot::iri(NAO_HAS_DEFAULT_NAMESPACE_ABBREVIATION),
            Slot::Var("ns"),
        ));
        for row in rows {
            if let (Some(g), Some(ns)) = (row["g"].as_iri(), row["ns"].value_str()) {
                declared
                    .entry(g)
                    .or_insert_with(|| ns.to_lowercase());
            }
        }

        let mut graphs_of: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for st in store.iter() {
            if let (Some(subject), Some(graph)) = (
                st.subject.as_iri(),
                st.graph.as_ref().and_then(Term::as_iri),
            ) {
                graphs_of.entry(subject).or_default().insert(graph);
            }
        }

        Self {
            declared,
            graphs_of,
        }
    }

    /// Abbreviation for an entity: the abbreviation of a named graph that
    /// describes it, else one declared on its namespace IRI, else the IRI
    /// section preceding the local name.
    fn for_uri(&self, uri: &str) -> String {
        let from_graph = self
            .graphs_of
            .get(uri)
            .into_iter()
            .flatten()
            .find_map(|g| self.declared.get(g));
        if let Some(abbr) = from_graph {
            return abbr.clone();
        }

        let ns = namespace_of(uri);
        let trimmed = ns.trim_end_matches(['#', '/']);
        if let Some(abbr) = self
            .declared
            .get(ns)
            .or_else(|| self.declared.get(trimmed))
        {
            return abbr.clone();
        }

        ontology_section(uri).to_lowercase()
    }
}

fn first_literal(store: &TripleStore, subject: &str, predicate: &str) -> Option<String> {
    store
        .objects(subject, predicate)
        .into_iter()
        .find_map(|t| t.as_literal())
        .map(|lit| lit.lexical.clone())
}

/// `nrl:cardinality`, else `nrl:maxCardinality`, else 1 for
/// `owl:FunctionalProperty`, else unbounded.
fn cardinality_of(store: &TripleStore, property: &str) -> Cardinality {
    for predicate in [NRL_CARDINALITY, NRL_MAX_CARDINALITY] {
        if let Some(value) = store.objects(property, predicate).first().and_then(|t| t.value_str()) {
            return Cardinality::from_lexical(value);
        }
    }
    if store.contains(property, RDF_TYPE, &Term::iri(OWL_FUNCTIONAL_PROPERTY)) {
        return Cardinality::ONE;
    }
    Cardinality::Unbounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{Format, OntologyLoader};
    use crate::vocab::{RDFS_RESOURCE, XSD_STRING};

    fn index(text: &str, format: Format) -> OntologyIndex {
        let mut loader = OntologyLoader::new();
        loader.add_str(text, format, "test").unwrap();
        OntologyIndex::build(&loader.finish())
    }

    const ONTO: &str = r#"
@prefix rdf:  <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .
@prefix owl:  <http://www.w3.org/2002/07/owl#> .
@prefix nrl:  <http://www.semanticdesktop.org/ontologies/2007/08/15/nrl#> .
@prefix ex:   <http://example.org/people#> .

ex:Agent a rdfs:Class ; rdfs:subClassOf rdfs:Resource .
ex:Person a owl:Class ; rdfs:label "Person" ; rdfs:comment "A human." ;
    rdfs:subClassOf ex:Agent , ex:Person , ex:Undeclared .
ex:name a rdf:Property ; rdfs:domain ex:Person ; rdfs:range xsd:string ; nrl:maxCardinality 1 .
ex:nick a owl:DatatypeProperty, owl:FunctionalProperty ; rdfs:domain ex:Person ; rdfs:range xsd:string .
ex:knows a rdf:Property ; rdfs:domain ex:Person ; rdfs:range ex:Person .
ex:seeAlso a rdf:Property ; rdfs:range rdfs:Resource .
ex:orphan a rdf:Property ; rdfs:domain ex:Person .
"#;

    #[test]
    fn classes_and_parents() {
        let idx = index(ONTO, Format::Turtle);
        assert_eq!(idx.class_count(), 2);
        let person = idx.class("http://example.org/people#Person");
        let person = person.map(|c| (c.label.as_str(), c.comment.as_deref(), c.parents.clone()));
        assert_eq!(
            person,
            Some((
                "Person",
                Some("A human."),
                vec!["http://example.org/people#Agent".to_string()]
            ))
        );
        let agent = idx.class("http://example.org/people#Agent");
        assert!(agent.is_some_and(OntologyClass::is_root_level));
        assert_eq!(agent.map(|c| c.label.as_str()), Some("Agent"));
    }

    #[test]
    fn property_facts() {
        let idx = index(ONTO, Format::Turtle);
        let name = idx.property("http://example.org/people#name");
        assert_eq!(name.map(|p| p.cardinality), Some(Cardinality::ONE));
        assert_eq!(name.map(|p| p.range.as_str()), Some(XSD_STRING));
        let nick = idx.property("http://example.org/people#nick");
        assert_eq!(nick.map(|p| p.cardinality), Some(Cardinality::ONE));
        let knows = idx.property("http://example.org/people#knows");
        assert_eq!(knows.map(|p| p.cardinality), Some(Cardinality::Unbounded));
        assert!(idx.property("http://example.org/people#orphan").is_none());
    }

    #[test]
    fn domain_lookup_includes_normalized_root() {
        let idx = index(ONTO, Format::Turtle);
        let on_person: Vec<&str> = idx
            .properties_with_domain("http://example.org/people#Person")
            .map(|p| p.uri.as_str())
            .collect();
        assert_eq!(
            on_person,
            vec![
                "http://example.org/people#knows",
                "http://example.org/people#name",
                "http://example.org/people#nick",
            ]
        );
        let on_root: Vec<&str> = idx
            .properties_with_domain(RDFS_RESOURCE)
            .map(|p| p.uri.as_str())
            .collect();
        assert_eq!(on_root, vec!["http://example.org/people#seeAlso"]);
    }

    #[test]
    fn abbreviation_falls_back_to_uri_section() {
        let idx = index(ONTO, Format::Turtle);
        assert_eq!(
            idx.class("http://example.org/people#Person").map(|c| c.namespace.as_str()),
            Some("people")
        );
    }

    #[test]
    fn abbreviation_from_named_graph() {
        let trig = r#"
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix nao:  <http://www.semanticdesktop.org/ontologies/2007/08/15/nao#> .
<http://example.org/graphs/tags> {
    <http://example.org/2011/annotations#Tag> a rdfs:Class .
}
<http://example.org/graphs/tags-meta> {
    <http://example.org/graphs/tags> nao:hasDefaultNamespaceAbbreviation "TAGS" .
}
"#;
        let idx = index(trig, Format::TriG);
        assert_eq!(
            idx.class("http://example.org/2011/annotations#Tag").map(|c| c.namespace.as_str()),
            Some("tags")
        );
    }

    #[test]
    fn abbreviation_declared_on_namespace() {
        let ttl = r#"
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix nao:  <http://www.semanticdesktop.org/ontologies/2007/08/15/nao#> .
<http://example.org/v1/contacts#> nao:hasDefaultNamespaceAbbreviation "nco" .
<http://example.org/v1/contacts#Contact> a rdfs:Class .
"#;
        let idx = index(ttl, Format::Turtle);
        assert_eq!(
            idx.class("http://example.org/v1/contacts#Contact").map(|c| c.namespace.as_str()),
            Some("nco")
        );
    }

    #[test]
    fn cardinality_parsing() {
        assert_eq!(Cardinality::from_lexical("1"), Cardinality::ONE);
        assert!(!Cardinality::from_lexical("3").is_single());
        assert_eq!(Cardinality::from_lexical("0"), Cardinality::Unbounded);
        assert_eq!(Cardinality::from_lexical("many"), Cardinality::Unbounded);
    }
}
