//! Output syntaxes.
//!
//! A [`Renderer`] turns a planned [`ClassUnit`] into file contents and may add
//! index files (module lists) once every class is planned.

pub mod qt;
pub mod rust;

use std::path::PathBuf;

use crate::config::{GeneratorConfig, Target};
use crate::emitter::{ClassRef, ClassUnit, OutputUnit};

/// Target-syntax backend.
pub trait Renderer {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// File name (without extension) for a class.
    fn file_stem(&self, class: &ClassRef) -> String {
        class.name.to_lowercase()
    }

    /// `<namespace>/<stem>.<ext>`.
    fn relative_path(&self, class: &ClassRef) -> PathBuf {
        PathBuf::from(&class.namespace).join(format!(
            "{}.{}",
            self.file_stem(class),
            self.extension()
        ))
    }

    /// Name under which an accessor such as `getPrefLabel` is declared.
    fn method_name(&self, accessor: &str) -> String {
        accessor.to_string()
    }

    /// Renders one class file.
    fn render_class(&self, unit: &ClassUnit) -> String;

    /// Extra files derived from the whole set of classes.
    fn render_indexes(&self, _units: &[ClassUnit]) -> Vec<OutputUnit> {
        Vec::new()
    }
}

/// Builds the renderer selected by `config.target`.
#[must_use]
pub fn for_config(config: &GeneratorConfig) -> Box<dyn Renderer> {
    match config.target {
        Target::Rust => Box::new(rust::RustRenderer::new(&config.rust_runtime)),
        Target::Qt => Box::new(qt::QtRenderer::new(&config.qt_namespace)),
    }
}
