//! C++/Qt headers deriving from `SimpleResource`.
//!
//! Shared ancestors use virtual inheritance; the most derived class names
//! every ancestor in its constructor initializer list, and only root-level
//! classes call `addType`.

use std::fmt::Write as FmtWrite;

use crate::emit::{wrap_words, SourceFile, COMMENT_WIDTH};
use crate::emitter::{Accessor, ClassRef, ClassUnit};
use crate::render::Renderer;
use crate::types::{ScalarType, TargetType};

/// Renders [`ClassUnit`]s as Qt header files.
#[derive(Debug, Clone)]
pub struct QtRenderer {
    root_namespace: String,
}

impl QtRenderer {
    /// `root_namespace` encloses every per-ontology namespace, e.g. `Nepomuk`.
    #[must_use]
    pub fn new(root_namespace: &str) -> Self {
        Self {
            root_namespace: root_namespace.to_string(),
        }
    }

    fn qualified(class: &ClassRef) -> String {
        format!("{}::{}", class.namespace.to_uppercase(), class.name)
    }

    fn write_getter(f: &mut SourceFile, accessor: &Accessor, url: &str) {
        let ty = qt_type(accessor.value_type);
        let element = scalar_name(accessor.value_type.element());
        let _ = writeln!(f.buf, "    {ty} {}() const {{", accessor.names.getter);
        let _ = writeln!(f.buf, "        {ty} value;");
        if accessor.value_type.is_collection() {
            let _ = writeln!(f.buf, "        foreach(const QVariant& v, property({url}))");
            let _ = writeln!(f.buf, "            value << v.value<{element}>();");
        } else {
            let _ = writeln!(f.buf, "        if(contains({url}))");
            let _ = writeln!(
                f.buf,
                "            value = property({url}).first().value<{element}>();"
            );
        }
        f.line("        return value;");
        f.line("    }");
    }

    fn write_setter(f: &mut SourceFile, accessor: &Accessor, url: &str) {
        let ty = qt_type(accessor.value_type);
        let element = scalar_name(accessor.value_type.element());
        let _ = writeln!(f.buf, "    void {}(const {ty}& value) {{", accessor.names.setter);
        f.line("        QVariantList values;");
        if accessor.value_type.is_collection() {
            let _ = writeln!(f.buf, "        foreach(const {element}& v, value)");
            f.line("            values << v;");
        } else {
            f.line("        values << value;");
        }
        let _ = writeln!(f.buf, "        setProperty({url}, values);");
        f.line("    }");
    }

    fn write_adder(f: &mut SourceFile, accessor: &Accessor, url: &str) {
        let element = scalar_name(accessor.value_type.element());
        let _ = writeln!(f.buf, "    void {}(const {element}& value) {{", accessor.names.adder);
        let _ = writeln!(f.buf, "        addProperty({url}, value);");
        f.line("    }");
    }
}

/// `QUrl` construction expression for an IRI.
fn url_expr(uri: &str) -> String {
    format!(
        "QUrl::fromEncoded(\"{}\", QUrl::StrictMode)",
        uri.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

/// `/** ... */` block, wrapped like the Rust doc comments.
fn block_comment(f: &mut SourceFile, indent: &str, text: &str) {
    let _ = writeln!(f.buf, "{indent}/**");
    let lines = wrap_words(&text.replace("*/", "* /"), COMMENT_WIDTH);
    if lines.is_empty() {
        let _ = writeln!(f.buf, "{indent} *");
    }
    for line in lines {
        let _ = writeln!(f.buf, "{indent} * {line}");
    }
    let _ = writeln!(f.buf, "{indent} */");
}

fn scalar_name(scalar: ScalarType) -> &'static str {
    match scalar {
        ScalarType::String => "QString",
        ScalarType::Int16 => "qint16",
        ScalarType::UInt16 => "quint16",
        ScalarType::Int32 => "qint32",
        ScalarType::UInt32 => "quint32",
        ScalarType::Int64 => "qint64",
        ScalarType::UInt64 => "quint64",
        ScalarType::Double => "double",
        ScalarType::Bool => "bool",
        ScalarType::Date => "QDate",
        ScalarType::Time => "QTime",
        ScalarType::DateTime => "QDateTime",
        ScalarType::Resource => "QUrl",
    }
}

fn qt_type(target: TargetType) -> String {
    match target {
        TargetType::Scalar(s) => scalar_name(s).to_string(),
        TargetType::List(s) => format!("QList<{}>", scalar_name(s)),
        TargetType::StringList => "QStringList".to_string(),
    }
}

impl Renderer for QtRenderer {
    fn extension(&self) -> &'static str {
        "h"
    }

    fn render_class(&self, unit: &ClassUnit) -> String {
        let name = &unit.class.name;
        let own_type = url_expr(&unit.class.uri);
        let root = unit.is_root_level();
        let mut f = SourceFile::new();

        let guard = format!(
            "_{}_{}_H_",
            unit.class.namespace.to_uppercase(),
            name.to_uppercase()
        );
        let _ = writeln!(f.buf, "#ifndef {guard}");
        let _ = writeln!(f.buf, "#define {guard}");
        f.blank();
        for header in ["QVariant", "QStringList", "QUrl", "QDate", "QTime", "QDateTime"] {
            let _ = writeln!(f.buf, "#include <QtCore/{header}>");
        }
        f.blank();
        let _ = writeln!(
            f.buf,
            "#include <{}/simpleresource.h>",
            self.root_namespace.to_lowercase()
        );
        f.blank();
        for parent in &unit.parents {
            let _ = writeln!(
                f.buf,
                "#include \"{}/{}.h\"",
                parent.namespace,
                self.file_stem(parent)
            );
        }
        if !unit.parents.is_empty() {
            f.blank();
        }

        let _ = writeln!(f.buf, "namespace {} {{", self.root_namespace);
        let _ = writeln!(f.buf, "namespace {} {{", unit.class.namespace.to_uppercase());
        block_comment(&mut f, "", unit.comment.as_deref().unwrap_or(&unit.label));
        let bases: Vec<String> = if root {
            vec![format!("public virtual {}::SimpleResource", self.root_namespace)]
        } else {
            unit.parents
                .iter()
                .map(|p| format!("public virtual {}", Self::qualified(p)))
                .collect()
        };
        let _ = writeln!(f.buf, "class {name} : {}", bases.join(", "));
        f.line("{");
        f.line("public:");

        let chain = |arg: &str| -> String {
            unit.ancestors
                .iter()
                .map(|a| format!("{}({arg})", Self::qualified(a)))
                .collect::<Vec<_>>()
                .join(", ")
        };

        // default constructor
        if root {
            let _ = writeln!(f.buf, "    {name}() {{");
            let _ = writeln!(f.buf, "        addType({own_type});");
        } else {
            let _ = writeln!(f.buf, "    {name}()");
            let _ = writeln!(f.buf, "      : {} {{", chain(&own_type));
        }
        f.line("    }");
        f.blank();

        // copy constructor
        let _ = writeln!(f.buf, "    {name}(const SimpleResource& res)");
        if root {
            f.line("      : SimpleResource(res) {");
            let _ = writeln!(f.buf, "        addType({own_type});");
        } else {
            let _ = writeln!(
                f.buf,
                "      : SimpleResource(res), {} {{",
                chain(&format!("res, {own_type}"))
            );
        }
        f.line("    }");
        f.blank();

        let _ = writeln!(f.buf, "    {name}& operator=(const SimpleResource& res) {{");
        f.line("        SimpleResource::operator=(res);");
        let _ = writeln!(f.buf, "        addType({own_type});");
        f.line("        return *this;");
        f.line("    }");

        for accessor in &unit.accessors {
            let url = url_expr(&accessor.property_uri);
            let uri = &accessor.property_uri;
            let comment = accessor.comment.as_deref().unwrap_or_default();
            f.blank();
            block_comment(&mut f, "    ", &format!("Get property {uri}. {comment}"));
            Self::write_getter(&mut f, accessor, &url);
            f.blank();
            block_comment(&mut f, "    ", &format!("Set property {uri}. {comment}"));
            Self::write_setter(&mut f, accessor, &url);
            f.blank();
            block_comment(&mut f, "    ", &format!("Add value to property {uri}. {comment}"));
            Self::write_adder(&mut f, accessor, &url);
        }
        f.blank();

        // type-only constructors for subclasses
        f.line("protected:");
        if root {
            let _ = writeln!(f.buf, "    {name}(const QUrl& type) {{");
            f.line("        addType(type);");
        } else {
            let _ = writeln!(f.buf, "    {name}(const QUrl& type)");
            let _ = writeln!(f.buf, "      : {} {{", chain("type"));
        }
        f.line("    }");
        let _ = writeln!(f.buf, "    {name}(const SimpleResource& res, const QUrl& type)");
        if root {
            f.line("      : SimpleResource(res) {");
            f.line("        addType(type);");
        } else {
            let _ = writeln!(f.buf, "      : SimpleResource(res), {} {{", chain("res, type"));
        }
        f.line("    }");
        f.line("};");
        f.line("}");
        f.line("}");
        f.blank();
        f.line("#endif");
        f.finish()
    }
}
