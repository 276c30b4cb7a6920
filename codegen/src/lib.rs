//! resgen code generator.
//!
//! Turns an indexed ontology into one wrapper source file per class. Each
//! wrapper exposes typed getters, setters and adders for the properties whose
//! domain is that class, and declares inheritance from the class's direct
//! parents so that shared ancestors are initialized exactly once.
//!
//! Generation is two-phase: every class is planned and rendered in memory
//! first, and files are written only once the whole set is known to be valid.
//!
//! ```no_run
//! use resgen_codegen::{generate, GeneratorConfig};
//! use resgen_ontology::OntologyLoader;
//!
//! let store = OntologyLoader::load(&["nao.trig"])?;
//! let report = generate(&store, &GeneratorConfig::default())?;
//! println!("{} classes", report.class_count);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod emit;
pub mod emitter;
pub mod error;
pub mod hierarchy;
pub mod names;
pub mod properties;
pub mod render;
pub mod types;

use std::collections::BTreeMap;
use std::path::PathBuf;

use resgen_ontology::{OntologyIndex, TripleStore};
use tracing::{debug, info};

pub use config::{GeneratorConfig, Target};
pub use emitter::{Accessor, ClassEmitter, ClassRef, ClassUnit, OutputUnit};
pub use error::{ConfigError, GenerateError};
pub use hierarchy::{AncestorChain, ClassHierarchyResolver};
pub use properties::{EffectivePropertySet, PropertyCollector};
pub use types::{ScalarType, TargetType};

use emit::WriteOutcome;

/// Report of what was generated.
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Number of classes emitted.
    pub class_count: usize,
    /// Number of properties that received accessors, summed over classes.
    pub accessor_count: usize,
    /// Files written or already up to date, relative to the output directory.
    pub files: Vec<PathBuf>,
    /// How many of `files` already had the generated content.
    pub unchanged: usize,
}

/// Plans and renders every class of `index`, plus the renderer's index files.
///
/// Nothing is written.
///
/// # Errors
///
/// Returns the first [`GenerateError`] raised while planning, or
/// [`GenerateError::DuplicateOutput`] if two units share an output path.
pub fn render_all(
    index: &OntologyIndex,
    config: &GeneratorConfig,
) -> Result<(Vec<ClassUnit>, Vec<OutputUnit>), GenerateError> {
    let renderer = render::for_config(config);
    let emitter = ClassEmitter::new(index, renderer.as_ref());

    let mut units = Vec::with_capacity(index.class_count());
    for class in index.classes() {
        units.push(emitter.plan(class)?);
    }

    let mut outputs: Vec<OutputUnit> = units.iter().map(|u| emitter.render(u)).collect();
    outputs.extend(renderer.render_indexes(&units));

    let mut claimed: BTreeMap<&PathBuf, &str> = BTreeMap::new();
    for out in &outputs {
        if let Some(first) = claimed.insert(&out.path, &out.origin) {
            return Err(GenerateError::DuplicateOutput {
                path: out.path.clone(),
                classes: vec![first.to_string(), out.origin.clone()],
            });
        }
    }
    Ok((units, outputs))
}

/// Generates wrapper sources for every class in `store` under
/// `config.output_dir`.
///
/// # Errors
///
/// Returns an error if the hierarchy is cyclic, a property name collision
/// cannot be resolved, two classes map to the same file, or a file cannot be
/// written. Planning errors leave the output directory untouched.
pub fn generate(
    store: &TripleStore,
    config: &GeneratorConfig,
) -> Result<GenerationReport, GenerateError> {
    let index = OntologyIndex::build(store);
    debug!(
        classes = index.class_count(),
        properties = index.property_count(),
        target = %config.target,
        "generating"
    );
    let (units, outputs) = render_all(&index, config)?;

    let mut report = GenerationReport {
        class_count: units.len(),
        accessor_count: units.iter().map(|u| u.accessors.len()).sum(),
        ..GenerationReport::default()
    };
    for out in outputs {
        let path = config.output_dir.join(&out.path);
        match emit::write_file(&path, &out.contents)? {
            WriteOutcome::Written => info!(path = %path.display(), "wrote"),
            WriteOutcome::Unchanged => report.unchanged += 1,
        }
        report.files.push(out.path);
    }
    Ok(report)
}
