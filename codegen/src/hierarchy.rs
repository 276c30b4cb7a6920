//! Ancestor chain resolution over `rdfs:subClassOf`.

use std::collections::BTreeSet;

use resgen_ontology::{OntologyClass, OntologyIndex};

use crate::error::GenerateError;

/// Every transitive ancestor of a class, each exactly once.
///
/// Ordered deepest-first along the leftmost branch: an ancestor always comes
/// after all of its own ancestors, and direct parents are explored in IRI
/// order. The class itself and the implicit root type are never included.
#[derive(Debug, Clone, Default)]
pub struct AncestorChain<'a> {
    classes: Vec<&'a OntologyClass>,
}

impl<'a> AncestorChain<'a> {
    /// Ancestors in initialization order.
    pub fn iter(&self) -> impl Iterator<Item = &'a OntologyClass> + '_ {
        self.classes.iter().copied()
    }

    /// Number of ancestors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True for root-level classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// True if `uri` is an ancestor.
    #[must_use]
    pub fn contains(&self, uri: &str) -> bool {
        self.classes.iter().any(|c| c.uri == uri)
    }

    /// Ancestor IRIs in order.
    pub fn uris(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.classes.iter().map(|c| c.uri.as_str())
    }
}

/// Computes ancestor chains from an [`OntologyIndex`].
#[derive(Debug, Clone, Copy)]
pub struct ClassHierarchyResolver<'a> {
    index: &'a OntologyIndex,
}

impl<'a> ClassHierarchyResolver<'a> {
    /// Creates a resolver over `index`.
    #[must_use]
    pub fn new(index: &'a OntologyIndex) -> Self {
        Self { index }
    }

    /// Declared direct parents of `class`, ordered by IRI.
    pub fn direct_parents(&self, class: &'a OntologyClass) -> Vec<&'a OntologyClass> {
        class
            .parents
            .iter()
            .filter_map(|uri| self.index.class(uri))
            .collect()
    }

    /// Resolves the ancestor chain of `class`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::CyclicHierarchy`] if an ancestor reaches a
    /// class already on the current path.
    pub fn ancestor_chain(&self, class: &'a OntologyClass) -> Result<AncestorChain<'a>, GenerateError> {
        let mut path = vec![class.uri.as_str()];
        let mut visited = BTreeSet::from([class.uri.as_str()]);
        let mut classes = Vec::new();
        self.visit(class, &class.uri, &mut path, &mut visited, &mut classes)?;
        Ok(AncestorChain { classes })
    }

    fn visit(
        &self,
        current: &'a OntologyClass,
        origin: &str,
        path: &mut Vec<&'a str>,
        visited: &mut BTreeSet<&'a str>,
        out: &mut Vec<&'a OntologyClass>,
    ) -> Result<(), GenerateError> {
        for parent_uri in &current.parents {
            if path.contains(&parent_uri.as_str()) {
                let mut cycle: Vec<String> = path.iter().map(|s| (*s).to_string()).collect();
                cycle.push(parent_uri.clone());
                return Err(GenerateError::CyclicHierarchy {
                    class: origin.to_string(),
                    path: cycle,
                });
            }
            if !visited.insert(parent_uri.as_str()) {
                continue;
            }
            let parent = self
                .index
                .class(parent_uri)
                .ok_or_else(|| GenerateError::UnknownClass(parent_uri.clone()))?;
            path.push(parent.uri.as_str());
            self.visit(parent, origin, path, visited, out)?;
            path.pop();
            out.push(parent);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resgen_ontology::{Format, OntologyLoader};

    fn index(body: &str) -> OntologyIndex {
        let text = format!(
            "@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .\n\
             @prefix ex: <http://example.org/ex#> .\n{body}"
        );
        let mut loader = OntologyLoader::new();
        loader.add_str(&text, Format::Turtle, "test").unwrap();
        OntologyIndex::build(&loader.finish())
    }

    fn chain(idx: &OntologyIndex, local: &str) -> Result<Vec<String>, GenerateError> {
        let uri = format!("http://example.org/ex#{local}");
        let class = idx
            .class(&uri)
            .ok_or_else(|| GenerateError::UnknownClass(uri.clone()))?;
        let resolved = ClassHierarchyResolver::new(idx).ancestor_chain(class)?;
        Ok(resolved
            .uris()
            .map(|u| u.trim_start_matches("http://example.org/ex#").to_string())
            .collect())
    }

    #[test]
    fn root_level_class_has_empty_chain() {
        let idx = index("ex:A a rdfs:Class ; rdfs:subClassOf rdfs:Resource .");
        assert!(chain(&idx, "A").unwrap().is_empty());
    }

    #[test]
    fn deepest_ancestor_first() {
        let idx = index(
            "ex:A a rdfs:Class . ex:B a rdfs:Class ; rdfs:subClassOf ex:A .\n\
             ex:C a rdfs:Class ; rdfs:subClassOf ex:B .",
        );
        assert_eq!(chain(&idx, "C").unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn diamond_lists_shared_ancestor_once() {
        let idx = index(
            "ex:D a rdfs:Class .\n\
             ex:B a rdfs:Class ; rdfs:subClassOf ex:D .\n\
             ex:C a rdfs:Class ; rdfs:subClassOf ex:D .\n\
             ex:A a rdfs:Class ; rdfs:subClassOf ex:B , ex:C .",
        );
        assert_eq!(chain(&idx, "A").unwrap(), vec!["D", "B", "C"]);
    }

    #[test]
    fn every_ancestor_follows_its_own_ancestors() {
        let idx = index(
            "ex:R a rdfs:Class . ex:S a rdfs:Class .\n\
             ex:P a rdfs:Class ; rdfs:subClassOf ex:S .\n\
             ex:Q a rdfs:Class ; rdfs:subClassOf ex:R , ex:P .\n\
             ex:X a rdfs:Class ; rdfs:subClassOf ex:Q , ex:P .",
        );
        let order = chain(&idx, "X").unwrap();
        assert_eq!(order, vec!["S", "P", "R", "Q"]);
        let pos = |n: &str| order.iter().position(|c| c == n);
        assert!(pos("S") < pos("P"));
        assert!(pos("R") < pos("Q") && pos("P") < pos("Q"));
    }

    #[test]
    fn cycle_is_reported() {
        let idx = index(
            "ex:A a rdfs:Class ; rdfs:subClassOf ex:B .\n\
             ex:B a rdfs:Class ; rdfs:subClassOf ex:A .",
        );
        match chain(&idx, "A").unwrap_err() {
            GenerateError::CyclicHierarchy { class, path } => {
                assert_eq!(class, "http://example.org/ex#A");
                assert_eq!(
                    path,
                    vec![
                        "http://example.org/ex#A",
                        "http://example.org/ex#B",
                        "http://example.org/ex#A",
                    ]
                );
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn self_loop_is_ignored() {
        let idx = index("ex:A a rdfs:Class ; rdfs:subClassOf ex:A .");
        assert!(chain(&idx, "A").unwrap().is_empty());
    }
}
