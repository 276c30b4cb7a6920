//! Ontology input side of the resgen code generator.
//!
//! Loads RDF ontology documents into an immutable [`TripleStore`] and indexes
//! the classes and properties they declare.
//!
//! # Entry Point
//!
//! ```no_run
//! use resgen_ontology::{OntologyIndex, OntologyLoader};
//!
//! let store = OntologyLoader::load(&["nao.trig", "nie.trig"])?;
//! let index = OntologyIndex::build(&store);
//! for class in index.classes() {
//!     println!("{} ({})", class.label, class.namespace);
//! }
//! # Ok::<(), resgen_ontology::LoadError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod index;
pub mod loader;
pub mod model;
pub mod store;
pub mod vocab;

pub use index::{Cardinality, OntologyClass, OntologyIndex, Property};
pub use loader::{Format, LoadError, OntologyLoader};
pub use model::{Literal, Statement, Term};
pub use store::{Bindings, Pattern, Slot, TripleStore};
