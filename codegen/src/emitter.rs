//! Per-class planning and rendering.

use std::path::PathBuf;

use resgen_ontology::{Cardinality, OntologyClass, OntologyIndex};
use tracing::debug;

use crate::emit::normalize_comment;
use crate::error::GenerateError;
use crate::hierarchy::ClassHierarchyResolver;
use crate::names::{self, PropertyNames};
use crate::properties::PropertyCollector;
use crate::render::Renderer;
use crate::types::{self, TargetType};

/// A class as referenced from generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRef {
    /// Full IRI.
    pub uri: String,
    /// Type identifier derived from the IRI.
    pub name: String,
    /// Namespace abbreviation as an identifier; names the output directory.
    /// Renderers escape it where it collides with a target keyword.
    pub namespace: String,
    /// True if the class has no declared parents.
    pub root_level: bool,
}

impl ClassRef {
    fn of(class: &OntologyClass) -> Self {
        Self {
            uri: class.uri.clone(),
            name: names::identifier_for(&class.uri),
            namespace: names::namespace_ident(&class.namespace),
            root_level: class.is_root_level(),
        }
    }
}

/// Getter, setter and adder for one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    /// Property IRI.
    pub property_uri: String,
    /// Collision-free names.
    pub names: PropertyNames,
    /// Getter return / setter argument type.
    pub value_type: TargetType,
    /// Declared cardinality.
    pub cardinality: Cardinality,
    /// Normalized property comment.
    pub comment: Option<String>,
}

/// Everything a renderer needs to emit one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassUnit {
    /// The class itself.
    pub class: ClassRef,
    /// `rdfs:label`.
    pub label: String,
    /// Normalized `rdfs:comment`.
    pub comment: Option<String>,
    /// Direct parents in IRI order. Empty means the root type.
    pub parents: Vec<ClassRef>,
    /// Full ancestor chain, most general first.
    pub ancestors: Vec<ClassRef>,
    /// One entry per effective property, in IRI order.
    pub accessors: Vec<Accessor>,
}

impl ClassUnit {
    /// True if the class derives directly from the root type.
    #[must_use]
    pub fn is_root_level(&self) -> bool {
        self.parents.is_empty()
    }
}

/// One file of generated output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputUnit {
    /// Path relative to the output directory.
    pub path: PathBuf,
    /// Full file contents.
    pub contents: String,
    /// Class IRI the file was rendered for, or a description for index files.
    pub origin: String,
}

/// Plans and renders classes of one index with one renderer.
pub struct ClassEmitter<'a> {
    hierarchy: ClassHierarchyResolver<'a>,
    collector: PropertyCollector<'a>,
    renderer: &'a dyn Renderer,
}

impl<'a> ClassEmitter<'a> {
    /// Creates an emitter over `index`.
    #[must_use]
    pub fn new(index: &'a OntologyIndex, renderer: &'a dyn Renderer) -> Self {
        Self {
            hierarchy: ClassHierarchyResolver::new(index),
            collector: PropertyCollector::new(index),
            renderer,
        }
    }

    /// Resolves everything `class` needs without rendering it.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::CyclicHierarchy`] or
    /// [`GenerateError::CollisionUnresolved`].
    pub fn plan(&self, class: &'a OntologyClass) -> Result<ClassUnit, GenerateError> {
        let ancestors = self.hierarchy.ancestor_chain(class)?;
        let parents = self.hierarchy.direct_parents(class);
        let properties = self.collector.properties_for(class);
        let resolved = names::disambiguate(&class.uri, properties.iter(), |accessor| {
            self.renderer.method_name(accessor)
        })?;

        let mut accessors = Vec::with_capacity(properties.len());
        for p in properties.iter() {
            let names = resolved
                .get(&p.uri)
                .cloned()
                .ok_or_else(|| GenerateError::CollisionUnresolved {
                    class: class.uri.clone(),
                    identifier: names::identifier_for(&p.uri),
                    properties: vec![p.uri.clone()],
                })?;
            accessors.push(Accessor {
                property_uri: p.uri.clone(),
                names,
                value_type: types::map_type(&p.range, p.cardinality),
                cardinality: p.cardinality,
                comment: p.comment.as_deref().map(normalize_comment),
            });
        }

        debug!(
            class = %class.uri,
            ancestors = ancestors.len(),
            properties = accessors.len(),
            "planned class"
        );
        Ok(ClassUnit {
            class: ClassRef::of(class),
            label: class.label.clone(),
            comment: class.comment.as_deref().map(normalize_comment),
            parents: parents.into_iter().map(ClassRef::of).collect(),
            ancestors: ancestors.iter().map(ClassRef::of).collect(),
            accessors,
        })
    }

    /// Renders a planned class into its output file.
    #[must_use]
    pub fn render(&self, unit: &ClassUnit) -> OutputUnit {
        OutputUnit {
            path: self.renderer.relative_path(&unit.class),
            contents: self.renderer.render_class(unit),
            origin: unit.class.uri.clone(),
        }
    }

    /// Plans and renders `class`.
    ///
    /// # Errors
    ///
    /// As [`ClassEmitter::plan`].
    pub fn emit(&self, class: &'a OntologyClass) -> Result<OutputUnit, GenerateError> {
        let unit = self.plan(class)?;
        Ok(self.render(&unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::qt::QtRenderer;
    use crate::render::rust::RustRenderer;
    use crate::types::ScalarType;
    use resgen_ontology::{Format, OntologyLoader};

    const TAGS: &str = r#"
@prefix rdf:  <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .
@prefix nrl:  <http://www.semanticdesktop.org/ontologies/2007/08/15/nrl#> .
@prefix nao:  <http://www.semanticdesktop.org/ontologies/2007/08/15/nao#> .
@prefix ex:   <http://example.org/ex#> .

nao:Tag a rdfs:Class ; rdfs:label "Tag" ; rdfs:comment "Represents a generic tag" .
nao:prefLabel a rdf:Property ; rdfs:domain nao:Tag ; rdfs:range xsd:string ;
    nrl:maxCardinality 1 ; rdfs:comment "A preferred label." .
ex:url a rdf:Property ; rdfs:range rdfs:Resource ; nrl:maxCardinality 1 .

ex:Special a rdfs:Class ; rdfs:subClassOf nao:Tag .
ex:prefLabel a rdf:Property ; rdfs:domain ex:Special ; rdfs:range xsd:string .
ex:alias a rdf:Property ; rdfs:domain ex:Special ; rdfs:range xsd:string .
"#;

    fn index() -> OntologyIndex {
        let mut loader = OntologyLoader::new();
        loader.add_str(TAGS, Format::Turtle, "tags").unwrap();
        OntologyIndex::build(&loader.finish())
    }

    fn plan(idx: &OntologyIndex, uri: &str) -> ClassUnit {
        let renderer = RustRenderer::new("simpleresource");
        let emitter = ClassEmitter::new(idx, &renderer);
        emitter.plan(idx.class(uri).unwrap()).unwrap()
    }

    fn accessor_names(unit: &ClassUnit) -> Vec<(String, String, String, TargetType)> {
        unit.accessors
            .iter()
            .map(|a| {
                (
                    a.names.getter.clone(),
                    a.names.setter.clone(),
                    a.names.adder.clone(),
                    a.value_type,
                )
            })
            .collect()
    }

    #[test]
    fn tag_gets_own_and_universal_properties() {
        let idx = index();
        let unit = plan(&idx, "http://www.semanticdesktop.org/ontologies/2007/08/15/nao#Tag");
        assert!(unit.is_root_level());
        assert!(unit.ancestors.is_empty());
        assert_eq!(unit.class.namespace, "nao");
        assert_eq!(
            accessor_names(&unit),
            vec![
                (
                    "getUrl".into(),
                    "setUrl".into(),
                    "addUrl".into(),
                    TargetType::Scalar(ScalarType::Resource)
                ),
                (
                    "getPrefLabel".into(),
                    "setPrefLabel".into(),
                    "addPrefLabel".into(),
                    TargetType::Scalar(ScalarType::String)
                ),
            ]
        );
    }

    #[test]
    fn tag_renders_self_tagging_constructor() {
        let idx = index();
        let renderer = RustRenderer::new("simpleresource");
        let emitter = ClassEmitter::new(&idx, &renderer);
        let tag = idx
            .class("http://www.semanticdesktop.org/ontologies/2007/08/15/nao#Tag")
            .unwrap();
        let out = emitter.emit(tag).unwrap();
        assert_eq!(out.path, PathBuf::from("nao").join("tag.rs"));
        let text = &out.contents;
        assert!(text.contains(
            "pub const TYPE_URI: &'static str = \"http://www.semanticdesktop.org/ontologies/2007/08/15/nao#Tag\";"
        ));
        assert!(text.contains("        Self::init_type(&mut resource, type_uri);\n"));
        assert!(text.contains("        resource.add_type(type_uri);\n"));
        assert!(text.contains("    pub fn get_pref_label(&self) -> Option<String> {"));
        assert!(text.contains("    pub fn get_url(&self) -> Option<rt::Url> {"));
        assert!(text.contains("impl From<Tag> for rt::SimpleResource {"));
        assert!(text.contains("/// Represents a generic tag\n"));
    }

    const CASE_VARIANTS: &str = r#"
@prefix rdf:  <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd:  <http://www.w3.org/2001/XMLSchema#> .
@prefix nrl:  <http://www.semanticdesktop.org/ontologies/2007/08/15/nrl#> .
@prefix ex:   <http://example.org/ex#> .

ex:Doc a rdfs:Class ; rdfs:subClassOf ex:Base .
ex:Base a rdfs:Class .
ex:url a rdf:Property ; rdfs:domain ex:Doc ; rdfs:range xsd:string ; nrl:maxCardinality 1 .
ex:URL a rdf:Property ; rdfs:domain ex:Doc ; rdfs:range xsd:string ; nrl:maxCardinality 1 .
"#;

    #[test]
    fn snake_case_accessor_clash_is_unresolved_for_rust() {
        let mut loader = OntologyLoader::new();
        loader.add_str(CASE_VARIANTS, Format::Turtle, "case").unwrap();
        let idx = OntologyIndex::build(&loader.finish());
        let doc = idx.class("http://example.org/ex#Doc").unwrap();

        let rust = RustRenderer::new("simpleresource");
        let err = ClassEmitter::new(&idx, &rust).plan(doc);
        assert!(matches!(
            err,
            Err(GenerateError::CollisionUnresolved { class, properties, .. })
                if class == "http://example.org/ex#Doc"
                    && properties == ["http://example.org/ex#URL", "http://example.org/ex#url"]
        ));

        let qt = QtRenderer::new("Nepomuk");
        let unit = ClassEmitter::new(&idx, &qt).plan(doc).unwrap();
        let getters: Vec<&str> = unit.accessors.iter().map(|a| a.names.getter.as_str()).collect();
        assert_eq!(getters, vec!["getURL", "getUrl"]);
    }

    #[test]
    fn subclass_gets_no_universal_properties() {
        let idx = index();
        let unit = plan(&idx, "http://example.org/ex#Special");
        let getters: Vec<&str> = unit.accessors.iter().map(|a| a.names.getter.as_str()).collect();
        assert_eq!(getters, vec!["getAliases", "getPrefLabels"]);
        assert_eq!(unit.parents.len(), 1);
        assert_eq!(unit.ancestors[0].name, "Tag");
        assert_eq!(unit.accessors[1].value_type, TargetType::StringList);
    }
}
