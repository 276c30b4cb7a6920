//! Effective property sets.

use std::collections::BTreeMap;

use resgen_ontology::vocab::ROOT_TYPES;
use resgen_ontology::{OntologyClass, OntologyIndex, Property};

/// Properties that get accessors on one class, keyed and ordered by IRI.
#[derive(Debug, Clone, Default)]
pub struct EffectivePropertySet<'a> {
    properties: BTreeMap<&'a str, &'a Property>,
}

impl<'a> EffectivePropertySet<'a> {
    /// Iterates in IRI order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Property> + '_ {
        self.properties.values().copied()
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// True if the class gets no accessors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// True if `uri` is in the set.
    #[must_use]
    pub fn contains(&self, uri: &str) -> bool {
        self.properties.contains_key(uri)
    }
}

/// Collects effective properties from an [`OntologyIndex`].
///
/// Properties are not inherited from declared parents; only root-level
/// classes receive the universal set declared on the root type.
#[derive(Debug, Clone)]
pub struct PropertyCollector<'a> {
    index: &'a OntologyIndex,
    universal: Vec<&'a Property>,
}

impl<'a> PropertyCollector<'a> {
    /// Creates a collector and caches the universal property set.
    #[must_use]
    pub fn new(index: &'a OntologyIndex) -> Self {
        let universal = ROOT_TYPES
            .iter()
            .flat_map(|root| index.properties_with_domain(root))
            .collect();
        Self { index, universal }
    }

    /// Properties declared on the root type.
    pub fn universal(&self) -> impl Iterator<Item = &'a Property> + '_ {
        self.universal.iter().copied()
    }

    /// Effective properties of `class`.
    #[must_use]
    pub fn properties_for(&self, class: &OntologyClass) -> EffectivePropertySet<'a> {
        let mut properties = BTreeMap::new();
        for p in self.index.properties_with_domain(&class.uri) {
            properties.insert(p.uri.as_str(), p);
        }
        if class.is_root_level() {
            for &p in &self.universal {
                properties.insert(p.uri.as_str(), p);
            }
        }
        EffectivePropertySet { properties }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resgen_ontology::{Format, OntologyLoader};

    const ONTO: &str = r#"
@prefix rdf:  <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix owl:  <http://www.w3.org/2002/07/owl#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .
@prefix ex:   <http://example.org/ex#> .

ex:Base a rdfs:Class .
ex:Derived a rdfs:Class ; rdfs:subClassOf ex:Base .
ex:name a rdf:Property ; rdfs:domain ex:Base ; rdfs:range xsd:string .
ex:size a rdf:Property ; rdfs:domain ex:Derived ; rdfs:range xsd:int .
ex:url a rdf:Property ; rdfs:range rdfs:Resource .
ex:sameAs a owl:ObjectProperty ; rdfs:domain owl:Thing ; rdfs:range owl:Thing .
"#;

    fn index() -> OntologyIndex {
        let mut loader = OntologyLoader::new();
        loader.add_str(ONTO, Format::Turtle, "test").unwrap();
        OntologyIndex::build(&loader.finish())
    }

    fn uris(set: &EffectivePropertySet<'_>) -> Vec<String> {
        set.iter()
            .map(|p| p.uri.trim_start_matches("http://example.org/ex#").to_string())
            .collect()
    }

    #[test]
    fn root_level_class_gets_universal_properties() {
        let idx = index();
        let collector = PropertyCollector::new(&idx);
        let set = collector.properties_for(idx.class("http://example.org/ex#Base").unwrap());
        assert_eq!(uris(&set), vec!["name", "sameAs", "url"]);
    }

    #[test]
    fn derived_class_gets_only_its_own() {
        let idx = index();
        let collector = PropertyCollector::new(&idx);
        let set = collector.properties_for(idx.class("http://example.org/ex#Derived").unwrap());
        assert_eq!(uris(&set), vec!["size"]);
        assert!(!set.contains("http://example.org/ex#url"));
    }
}
