//! Generator error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a generation run. Nothing is written when any of these
/// is raised during planning.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A class reaches itself through `rdfs:subClassOf`.
    #[error("cyclic rdfs:subClassOf hierarchy at {class}: {}", path.join(" -> "))]
    CyclicHierarchy {
        /// Class whose ancestor walk found the cycle.
        class: String,
        /// The offending path, ending with the repeated class.
        path: Vec<String>,
    },

    /// Two properties of one class still share an accessor name after
    /// namespace prefixing.
    #[error(
        "class {class}: accessor `{identifier}` is ambiguous even with namespace prefixes ({})",
        properties.join(", ")
    )]
    CollisionUnresolved {
        /// Class being generated.
        class: String,
        /// The clashing identifier or accessor name.
        identifier: String,
        /// Property IRIs that produce it.
        properties: Vec<String>,
    },

    /// Two classes render to the same output file.
    #[error("classes {} all map to output file {}", classes.join(", "), path.display())]
    DuplicateOutput {
        /// Output path relative to the output directory.
        path: PathBuf,
        /// Classes claiming the file, in planning order.
        classes: Vec<String>,
    },

    /// A class IRI was requested that the index does not know.
    #[error("unknown class {0}")]
    UnknownClass(String),

    /// Writing an output file failed.
    #[error("cannot write {}: {source}", path.display())]
    Output {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Failures reading a generator configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML or has unknown keys.
    #[error("invalid config {origin}: {source}")]
    Parse {
        /// File path or other description of the input.
        origin: String,
        /// TOML decoding error.
        #[source]
        source: toml::de::Error,
    },

    /// An unknown output target name.
    #[error("unknown target `{0}` (expected `rust` or `qt`)")]
    UnknownTarget(String),
}
