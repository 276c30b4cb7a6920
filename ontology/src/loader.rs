//! Ontology ingestion: parses serialized documents into a [`TripleStore`].
//!
//! Parsing is delegated to `sophia_turtle`. Every statement from every source
//! is merged into one store; the only normalization is giving domain-less
//! properties the implicit root type as domain.

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};

use sophia_api::prelude::*;
use sophia_api::term::TermKind;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{self, Statement};
use crate::store::TripleStore;
use crate::vocab::{PROPERTY_TYPES, RDFS_DOMAIN, RDFS_RESOURCE, RDF_TYPE};

/// Errors raised while reading ontology sources. All of them abort the run.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source file could not be read.
    #[error("cannot read ontology {}: {source}", path.display())]
    Read {
        /// Path of the unreadable source.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The file extension does not name a supported serialization.
    #[error("unsupported ontology format for {} (expected .ttl, .nt, .trig or .nq)", path.display())]
    UnsupportedFormat {
        /// Path of the rejected source.
        path: PathBuf,
    },
    /// The document is not valid in its serialization.
    #[error("failed to parse {format} source {source_name}: {message}")]
    Syntax {
        /// Path or caller-supplied name of the document.
        source_name: String,
        /// Serialization that was being parsed.
        format: Format,
        /// Parser diagnostic.
        message: String,
    },
}

/// Serializations the loader accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Turtle 1.1 (`.ttl`).
    Turtle,
    /// N-Triples (`.nt`).
    NTriples,
    /// TriG (`.trig`); graph names are kept.
    TriG,
    /// N-Quads (`.nq`); graph names are kept.
    NQuads,
}

impl Format {
    /// Picks a format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ttl" | "turtle" => Some(Format::Turtle),
            "nt" | "ntriples" => Some(Format::NTriples),
            "trig" => Some(Format::TriG),
            "nq" | "nquads" => Some(Format::NQuads),
            _ => None,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Format::Turtle => "Turtle",
            Format::NTriples => "N-Triples",
            Format::TriG => "TriG",
            Format::NQuads => "N-Quads",
        })
    }
}

/// Accumulates statements from one or more sources.
#[derive(Debug, Default)]
pub struct OntologyLoader {
    statements: Vec<Statement>,
    sources: usize,
}

impl OntologyLoader {
    /// Creates an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every source into one normalized store.
    ///
    /// # Errors
    ///
    /// Returns the first [`LoadError`]; nothing is returned for partial input.
    pub fn load<P: AsRef<Path>>(sources: &[P]) -> Result<TripleStore, LoadError> {
        let mut loader = Self::new();
        for source in sources {
            loader.add_file(source.as_ref())?;
        }
        Ok(loader.finish())
    }

    /// Parses one file, choosing the serialization from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the file is unreadable, has an unknown
    /// extension, or fails to parse.
    pub fn add_file(&mut self, path: &Path) -> Result<usize, LoadError> {
        let format = Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.add_str(&text, format, &path.display().to_string())
    }

    /// Parses an in-memory document. `name` is only used in diagnostics.
    ///
    /// Returns the number of statements read.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Syntax`] if the document does not parse.
    pub fn add_str(&mut self, text: &str, format: Format, name: &str) -> Result<usize, LoadError> {
        let parsed = parse_document(text.as_bytes(), format).map_err(|message| {
            LoadError::Syntax {
                source_name: name.to_string(),
                format,
                message,
            }
        })?;
        let count = parsed.len();
        debug!(source = name, %format, statements = count, "parsed ontology source");
        self.statements.extend(parsed);
        self.sources += 1;
        Ok(count)
    }

    /// Number of sources added so far.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources
    }

    /// Normalizes the merged statements and freezes them into a store.
    #[must_use]
    pub fn finish(self) -> TripleStore {
        TripleStore::from_statements(with_root_domains(self.statements))
    }
}

/// Gives every declared property without an `rdfs:domain` the domain
/// `rdfs:Resource`, making it visible on every root-level class.
fn with_root_domains(mut statements: Vec<Statement>) -> Vec<Statement> {
    let mut declared: BTreeSet<String> = BTreeSet::new();
    let mut with_domain: BTreeSet<String> = BTreeSet::new();

    for st in &statements {
        let (Some(subject), Some(predicate)) = (st.subject.as_iri(), st.predicate.as_iri()) else {
            continue;
        };
        if predicate == RDF_TYPE
            && st
                .object
                .as_iri()
                .is_some_and(|ty| PROPERTY_TYPES.contains(&ty))
        {
            declared.insert(subject.to_string());
        } else if predicate == RDFS_DOMAIN {
            with_domain.insert(subject.to_string());
        }
    }

    for property in declared.difference(&with_domain) {
        debug!(property = %property, "assigning rdfs:Resource domain");
        statements.push(Statement::new(
            model::Term::iri(property.as_str()),
            model::Term::iri(RDFS_DOMAIN),
            model::Term::iri(RDFS_RESOURCE),
        ));
    }
    statements
}

/// Converts a sophia term into the owned model. Variables and quoted triples
/// have no meaning in an ontology document and are dropped.
fn convert_term<T: Term>(term: T) -> Option<model::Term> {
    match term.kind() {
        TermKind::Iri => term
            .iri()
            .map(|iri| model::Term::Iri(iri.as_str().to_string())),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| model::Term::Blank(id.as_str().to_string())),
        TermKind::Literal => {
            let lexical = String::from(&*term.lexical_form()?);
            let datatype = term.datatype().map(|dt| dt.as_str().to_string());
            Some(model::Term::Literal(model::Literal { lexical, datatype }))
        }
        _ => None,
    }
}

fn convert_statement<T: Term>(s: T, p: T, o: T, g: Option<T>) -> Option<Statement> {
    let statement = Statement::new(convert_term(s)?, convert_term(p)?, convert_term(o)?);
    match g {
        Some(graph) => Some(statement.in_graph(convert_term(graph)?)),
        None => Some(statement),
    }
}

fn parse_document(bytes: &[u8], format: Format) -> Result<Vec<Statement>, String> {
    let reader = BufReader::new(Cursor::new(bytes));
    let mut out: Vec<Statement> = Vec::new();
    let mut skipped = 0usize;

    match format {
        Format::Turtle => {
            let mut parser = sophia_turtle::parser::turtle::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> Result<(), Infallible> {
                    match convert_statement(t.s(), t.p(), t.o(), None) {
                        Some(st) => out.push(st),
                        None => skipped += 1,
                    }
                    Ok(())
                })
                .map_err(|e| e.to_string())?;
        }
        Format::NTriples => {
            let mut parser = sophia_turtle::parser::nt::parse_bufread(reader);
            parser
                .try_for_each_triple(|t| -> Result<(), Infallible> {
                    match convert_statement(t.s(), t.p(), t.o(), None) {
                        Some(st) => out.push(st),
                        None => skipped += 1,
                    }
                    Ok(())
                })
                .map_err(|e| e.to_string())?;
        }
        Format::TriG => {
            let mut parser = sophia_turtle::parser::trig::parse_bufread(reader);
            parser
                .try_for_each_quad(|q| -> Result<(), Infallible> {
                    match convert_statement(q.s(), q.p(), q.o(), q.g()) {
                        Some(st) => out.push(st),
                        None => skipped += 1,
                    }
                    Ok(())
                })
                .map_err(|e| e.to_string())?;
        }
        Format::NQuads => {
            let mut parser = sophia_turtle::parser::nq::parse_bufread(reader);
            parser
                .try_for_each_quad(|q| -> Result<(), Infallible> {
                    match convert_statement(q.s(), q.p(), q.o(), q.g()) {
                        Some(st) => out.push(st),
                        None => skipped += 1,
                    }
                    Ok(())
                })
                .map_err(|e| e.to_string())?;
        }
    }

    if skipped > 0 {
        warn!(skipped, "ignored statements with unsupported terms");
    }
    Ok(out)
}
