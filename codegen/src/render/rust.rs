//! Rust wrapper structs.
//!
//! Every generated class wraps one `SimpleResource` from the runtime crate.
//! Shared ancestors are modelled by composition: a class initializes each
//! ancestor in chain order through `init_type`, and only root-level classes
//! actually add the type, so an instance is tagged once no matter how many
//! inheritance paths reach a shared ancestor. The runtime crate is expected to
//! provide:
//!
//! - `SimpleResource: Debug + Clone` with `new()`, an idempotent
//!   `add_type(&str)`, `value::<T>(&str) -> Option<T>`,
//!   `values::<T, C: FromIterator<T>>(&str) -> C`,
//!   `set_values(&str, impl IntoIterator<Item = T>)` and `add_value(&str, T)`;
//! - value types `Url`, `Date`, `Time`, `DateTime` and `StringList`.

use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};

use crate::emit::SourceFile;
use crate::emitter::{Accessor, ClassRef, ClassUnit, OutputUnit};
use crate::names::{escape_keyword, to_snake_case};
use crate::render::Renderer;
use crate::types::{ScalarType, TargetType};

const GENERATED_NOTE: &str = "Generated by resgen. Do not edit.";

/// Renders [`ClassUnit`]s as Rust modules.
#[derive(Debug, Clone)]
pub struct RustRenderer {
    runtime: String,
}

impl RustRenderer {
    /// `runtime` is the path of the crate providing `SimpleResource`.
    #[must_use]
    pub fn new(runtime: &str) -> Self {
        Self {
            runtime: runtime.to_string(),
        }
    }

    /// Path of `to` as seen from the module of `from`.
    fn class_path(from: &ClassRef, to: &ClassRef) -> String {
        if from.namespace == to.namespace {
            format!("super::{}", type_name(to))
        } else {
            format!("super::super::{}::{}", module_name(&to.namespace), type_name(to))
        }
    }

    fn write_constructors(f: &mut SourceFile, unit: &ClassUnit) {
        let name = type_name(&unit.class);
        let _ = writeln!(f.buf, "    /// IRI of the `{name}` class.");
        let _ = writeln!(f.buf, "    pub const TYPE_URI: &'static str = {:?};", unit.class.uri);
        f.blank();
        let _ = writeln!(f.buf, "    /// Creates an empty resource typed as `{name}`.");
        f.line("    pub fn new() -> Self {");
        f.line("        Self::with_type(Self::TYPE_URI)");
        f.line("    }");
        f.blank();
        let _ = writeln!(f.buf, "    /// Wraps `res`, adding the `{name}` type.");
        f.line("    pub fn from_resource(res: rt::SimpleResource) -> Self {");
        f.line("        Self::from_resource_with_type(res, Self::TYPE_URI)");
        f.line("    }");
        f.blank();
        let _ = writeln!(
            f.buf,
            "    /// Replaces the wrapped resource with `res`, adding the `{name}` type."
        );
        f.line("    pub fn assign(&mut self, res: rt::SimpleResource) -> &mut Self {");
        f.line("        *self = Self::from_resource(res);");
        f.line("        self");
        f.line("    }");
        f.blank();
        f.line("    /// Creates an empty resource initialized for `type_uri` instead of this");
        f.line("    /// class's own type. Used when composing a subclass.");
        f.line("    pub fn with_type(type_uri: &str) -> Self {");
        f.line("        Self::from_resource_with_type(rt::SimpleResource::new(), type_uri)");
        f.line("    }");
        f.blank();
        f.line("    /// Wraps `res`, initializing it for `type_uri` instead of this class's");
        f.line("    /// own type.");
        f.line("    pub fn from_resource_with_type(res: rt::SimpleResource, type_uri: &str) -> Self {");
        f.line("        let mut resource = res;");
        if unit.is_root_level() {
            f.line("        Self::init_type(&mut resource, type_uri);");
        } else {
            for ancestor in &unit.ancestors {
                let _ = writeln!(
                    f.buf,
                    "        {}::init_type(&mut resource, type_uri);",
                    Self::class_path(&unit.class, ancestor)
                );
            }
        }
        f.line("        Self { resource }");
        f.line("    }");
        f.blank();
        f.line("    #[doc(hidden)]");
        if unit.is_root_level() {
            f.line("    pub fn init_type(resource: &mut rt::SimpleResource, type_uri: &str) {");
            f.line("        resource.add_type(type_uri);");
            f.line("    }");
        } else {
            f.line("    pub fn init_type(_resource: &mut rt::SimpleResource, _type_uri: &str) {}");
        }
        f.blank();
        f.line("    #[allow(dead_code)]");
        f.line("    pub(crate) fn wrap(resource: rt::SimpleResource) -> Self {");
        f.line("        Self { resource }");
        f.line("    }");
        f.blank();
        f.line("    /// The wrapped resource.");
        f.line("    pub fn resource(&self) -> &rt::SimpleResource {");
        f.line("        &self.resource");
        f.line("    }");
        f.blank();
        f.line("    /// Unwraps the resource.");
        f.line("    pub fn into_resource(self) -> rt::SimpleResource {");
        f.line("        self.resource");
        f.line("    }");
    }

    fn write_accessor(&self, f: &mut SourceFile, accessor: &Accessor) {
        let uri = &accessor.property_uri;
        let comment = accessor.comment.as_deref().unwrap_or_default();
        let value_type = rust_type(accessor.value_type);
        let element = scalar_name(accessor.value_type.element());

        f.blank();
        f.comment("    /// ", &format!("Get property <{uri}>. {comment}"));
        let getter = self.method_name(&accessor.names.getter);
        if accessor.value_type.is_collection() {
            let _ = writeln!(f.buf, "    pub fn {getter}(&self) -> {value_type} {{");
            let _ = writeln!(f.buf, "        self.resource.values({uri:?})");
        } else {
            let _ = writeln!(f.buf, "    pub fn {getter}(&self) -> Option<{value_type}> {{");
            let _ = writeln!(f.buf, "        self.resource.value({uri:?})");
        }
        f.line("    }");

        f.blank();
        f.comment("    /// ", &format!("Set property <{uri}>. {comment}"));
        let setter = self.method_name(&accessor.names.setter);
        let _ = writeln!(f.buf, "    pub fn {setter}(&mut self, value: {value_type}) {{");
        if accessor.value_type.is_collection() {
            let _ = writeln!(f.buf, "        self.resource.set_values({uri:?}, value);");
        } else {
            let _ = writeln!(f.buf, "        self.resource.set_values({uri:?}, [value]);");
        }
        f.line("    }");

        f.blank();
        f.comment("    /// ", &format!("Add value to property <{uri}>. {comment}"));
        let adder = self.method_name(&accessor.names.adder);
        let _ = writeln!(f.buf, "    pub fn {adder}(&mut self, value: {element}) {{");
        let _ = writeln!(f.buf, "        self.resource.add_value({uri:?}, value);");
        f.line("    }");
    }

    fn write_conversions(f: &mut SourceFile, unit: &ClassUnit) {
        let name = type_name(&unit.class);
        let _ = writeln!(f.buf, "impl Default for {name} {{");
        f.line("    fn default() -> Self {");
        f.line("        Self::new()");
        f.line("    }");
        f.line("}");
        f.blank();
        let _ = writeln!(f.buf, "impl AsRef<rt::SimpleResource> for {name} {{");
        f.line("    fn as_ref(&self) -> &rt::SimpleResource {");
        f.line("        &self.resource");
        f.line("    }");
        f.line("}");

        if unit.is_root_level() {
            f.blank();
            let _ = writeln!(f.buf, "impl From<{name}> for rt::SimpleResource {{");
            let _ = writeln!(f.buf, "    fn from(value: {name}) -> Self {{");
            f.line("        value.resource");
            f.line("    }");
            f.line("}");
        }
        for parent in &unit.parents {
            let path = Self::class_path(&unit.class, parent);
            f.blank();
            let _ = writeln!(f.buf, "impl From<{name}> for {path} {{");
            let _ = writeln!(f.buf, "    fn from(value: {name}) -> Self {{");
            let _ = writeln!(f.buf, "        {path}::wrap(value.resource)");
            f.line("    }");
            f.line("}");
        }
    }
}

/// Struct name of a class.
fn type_name(class: &ClassRef) -> String {
    escape_keyword(class.name.clone())
}

/// Module name of a namespace.
fn module_name(namespace: &str) -> String {
    escape_keyword(namespace.to_string())
}

fn scalar_name(scalar: ScalarType) -> &'static str {
    match scalar {
        ScalarType::String => "String",
        ScalarType::Int16 => "i16",
        ScalarType::UInt16 => "u16",
        ScalarType::Int32 => "i32",
        ScalarType::UInt32 => "u32",
        ScalarType::Int64 => "i64",
        ScalarType::UInt64 => "u64",
        ScalarType::Double => "f64",
        ScalarType::Bool => "bool",
        ScalarType::Date => "rt::Date",
        ScalarType::Time => "rt::Time",
        ScalarType::DateTime => "rt::DateTime",
        ScalarType::Resource => "rt::Url",
    }
}

fn rust_type(target: TargetType) -> String {
    match target {
        TargetType::Scalar(s) => scalar_name(s).to_string(),
        TargetType::List(s) => format!("Vec<{}>", scalar_name(s)),
        TargetType::StringList => "rt::StringList".to_string(),
    }
}

impl Renderer for RustRenderer {
    fn extension(&self) -> &'static str {
        "rs"
    }

    fn file_stem(&self, class: &ClassRef) -> String {
        escape_keyword(class.name.to_lowercase())
    }

    fn relative_path(&self, class: &ClassRef) -> PathBuf {
        Path::new(&module_name(&class.namespace)).join(format!("{}.rs", self.file_stem(class)))
    }

    fn method_name(&self, accessor: &str) -> String {
        to_snake_case(accessor)
    }

    fn render_class(&self, unit: &ClassUnit) -> String {
        let name = type_name(&unit.class);
        let mut f = SourceFile::new();
        let _ = writeln!(f.buf, "//! `{}`: <{}>.", unit.label, unit.class.uri);
        f.line("//!");
        let _ = writeln!(f.buf, "//! {GENERATED_NOTE}");
        f.blank();
        let _ = writeln!(f.buf, "use {} as rt;", self.runtime);
        f.blank();

        match unit.comment.as_deref() {
            Some(comment) if !comment.is_empty() => f.comment("/// ", comment),
            _ => {
                let _ = writeln!(f.buf, "/// {}.", unit.label);
            }
        }
        if !unit.is_root_level() {
            f.line("///");
            let parents: Vec<String> = unit
                .parents
                .iter()
                .map(|p| format!("[`{}`]", Self::class_path(&unit.class, p)))
                .collect();
            let _ = writeln!(f.buf, "/// Converts into {}.", parents.join(", "));
        }
        f.line("#[derive(Debug, Clone)]");
        let _ = writeln!(f.buf, "pub struct {name} {{");
        f.line("    resource: rt::SimpleResource,");
        f.line("}");
        f.blank();

        let _ = writeln!(f.buf, "impl {name} {{");
        Self::write_constructors(&mut f, unit);
        for accessor in &unit.accessors {
            self.write_accessor(&mut f, accessor);
        }
        f.line("}");
        f.blank();

        Self::write_conversions(&mut f, unit);
        f.finish()
    }

    fn render_indexes(&self, units: &[ClassUnit]) -> Vec<OutputUnit> {
        let mut by_namespace: BTreeMap<String, Vec<&ClassRef>> = BTreeMap::new();
        for unit in units {
            by_namespace
                .entry(module_name(&unit.class.namespace))
                .or_default()
                .push(&unit.class);
        }

        let mut out = Vec::with_capacity(by_namespace.len() + 1);
        for (namespace, classes) in &by_namespace {
            let mut modules: Vec<(String, String)> = classes
                .iter()
                .map(|c| (self.file_stem(c), type_name(c)))
                .collect();
            modules.sort_unstable();

            let mut f = SourceFile::new();
            let _ = writeln!(f.buf, "//! `{namespace}` classes.");
            f.line("//!");
            let _ = writeln!(f.buf, "//! {GENERATED_NOTE}");
            f.blank();
            for (module, _) in &modules {
                let _ = writeln!(f.buf, "pub mod {module};");
            }
            f.blank();
            for (module, name) in &modules {
                let _ = writeln!(f.buf, "pub use {module}::{name};");
            }
            out.push(OutputUnit {
                path: Path::new(namespace).join("mod.rs"),
                contents: f.finish(),
                origin: format!("`{namespace}` module index"),
            });
        }

        let mut f = SourceFile::new();
        f.line("//! Resource classes generated from ontologies.");
        f.line("//!");
        let _ = writeln!(f.buf, "//! {GENERATED_NOTE}");
        f.blank();
        for namespace in by_namespace.keys() {
            let _ = writeln!(f.buf, "pub mod {namespace};");
        }
        out.push(OutputUnit {
            path: "mod.rs".into(),
            contents: f.finish(),
            origin: "module index".to_string(),
        });
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::PropertyNames;
    use resgen_ontology::Cardinality;

    fn class(ns: &str, name: &str, root_level: bool) -> ClassRef {
        ClassRef {
            uri: format!("http://example.org/{ns}#{name}"),
            name: name.to_string(),
            namespace: ns.to_string(),
            root_level,
        }
    }

    fn accessor(id: &str, value_type: TargetType, getter: &str, adder: &str) -> Accessor {
        Accessor {
            property_uri: format!("http://example.org/ex#{id}"),
            names: PropertyNames {
                identifier: id.to_string(),
                getter: format!("get{getter}"),
                setter: format!("set{getter}"),
                adder: format!("add{adder}"),
            },
            value_type,
            cardinality: if value_type.is_collection() {
                Cardinality::Unbounded
            } else {
                Cardinality::ONE
            },
            comment: None,
        }
    }

    fn derived_unit() -> ClassUnit {
        ClassUnit {
            class: class("ex", "Phone", false),
            label: "Phone".to_string(),
            comment: Some("A telephone number.".to_string()),
            parents: vec![class("ex", "Number", false), class("other", "Contact", true)],
            ancestors: vec![
                class("other", "Contact", true),
                class("ex", "Base", true),
                class("ex", "Number", false),
            ],
            accessors: vec![
                accessor("hasTag", TargetType::List(ScalarType::Resource), "Tags", "Tag"),
                accessor("altLabel", TargetType::StringList, "AltLabels", "AltLabel"),
                accessor("size", TargetType::Scalar(ScalarType::UInt32), "Size", "Size"),
            ],
        }
    }

    #[test]
    fn derived_class_initializes_every_ancestor_in_order() {
        let text = RustRenderer::new("simpleresource").render_class(&derived_unit());
        let calls: Vec<&str> = text
            .lines()
            .filter(|l| l.contains("::init_type(&mut resource"))
            .map(str::trim)
            .collect();
        assert_eq!(
            calls,
            vec![
                "super::super::other::Contact::init_type(&mut resource, type_uri);",
                "super::Base::init_type(&mut resource, type_uri);",
                "super::Number::init_type(&mut resource, type_uri);",
            ]
        );
        assert!(text.contains(
            "    pub fn init_type(_resource: &mut rt::SimpleResource, _type_uri: &str) {}"
        ));
        assert!(!text.contains("resource.add_type"));
    }

    #[test]
    fn derived_class_converts_into_direct_parents_only() {
        let text = RustRenderer::new("simpleresource").render_class(&derived_unit());
        assert!(text.contains("impl From<Phone> for super::Number {"));
        assert!(text.contains("impl From<Phone> for super::super::other::Contact {"));
        assert!(!text.contains("impl From<Phone> for super::Base"));
        assert!(!text.contains("impl From<Phone> for rt::SimpleResource"));
    }

    #[test]
    fn accessor_shapes_follow_value_type() {
        let text = RustRenderer::new("crate::runtime").render_class(&derived_unit());
        assert!(text.contains("use crate::runtime as rt;"));
        assert!(text.contains("    pub fn get_tags(&self) -> Vec<rt::Url> {"));
        assert!(text.contains("    pub fn set_tags(&mut self, value: Vec<rt::Url>) {"));
        assert!(text.contains("    pub fn add_tag(&mut self, value: rt::Url) {"));
        assert!(text.contains("    pub fn get_alt_labels(&self) -> rt::StringList {"));
        assert!(text.contains("    pub fn add_alt_label(&mut self, value: String) {"));
        assert!(text.contains("    pub fn get_size(&self) -> Option<u32> {"));
        assert!(text.contains(
            "        self.resource.set_values(\"http://example.org/ex#size\", [value]);"
        ));
    }

    #[test]
    fn keyword_names_are_escaped() {
        let renderer = RustRenderer::new("simpleresource");
        let mut unit = derived_unit();
        unit.class = class("type", "type", true);
        unit.parents.clear();
        unit.ancestors.clear();
        assert_eq!(
            renderer.relative_path(&unit.class),
            PathBuf::from("type_").join("type_.rs")
        );
        let text = renderer.render_class(&unit);
        assert!(text.contains("pub struct type_ {"));
        assert!(text.contains("impl From<type_> for rt::SimpleResource {"));
        let indexes = renderer.render_indexes(&[unit]);
        assert_eq!(indexes[0].path, PathBuf::from("type_").join("mod.rs"));
        assert!(indexes[0].contents.contains("pub mod type_;\n\npub use type_::type_;\n"));
        assert!(indexes[1].contents.ends_with("pub mod type_;\n"));
    }

    #[test]
    fn module_indexes_list_every_class() {
        let renderer = RustRenderer::new("simpleresource");
        let mut unit = derived_unit();
        let mut other = derived_unit();
        other.class = class("ex", "Type", true);
        unit.accessors.clear();
        let indexes = renderer.render_indexes(&[unit, other]);
        let paths: Vec<String> = indexes
            .iter()
            .map(|o| o.path.to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(paths, vec!["ex/mod.rs", "mod.rs"]);
        assert!(indexes[0].contents.contains("pub mod phone;\npub mod type_;\n"));
        assert!(indexes[0].contents.contains("pub use type_::Type;"));
        assert!(indexes[1].contents.ends_with("pub mod ex;\n"));
    }
}
