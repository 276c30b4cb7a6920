//! Immutable, queryable statement collection.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{Statement, Term};

/// One position of a [`Pattern`]: either a fixed term or a named variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Matches exactly this term.
    Bound(Term),
    /// Matches anything and binds it under this name.
    Var(&'static str),
}

impl Slot {
    /// Shorthand for a bound IRI slot.
    pub fn iri(iri: &str) -> Self {
        Slot::Bound(Term::iri(iri))
    }

    fn bound(&self) -> Option<&Term> {
        match self {
            Slot::Bound(term) => Some(term),
            Slot::Var(_) => None,
        }
    }
}

/// A triple pattern. Graph names are ignored when matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Subject slot.
    pub subject: Slot,
    /// Predicate slot.
    pub predicate: Slot,
    /// Object slot.
    pub object: Slot,
}

impl Pattern {
    /// Builds a pattern from three slots.
    pub fn new(subject: Slot, predicate: Slot, object: Slot) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}

/// Variable bindings produced by one pattern match.
pub type Bindings<'a> = BTreeMap<&'static str, &'a Term>;

/// The merged statements of every loaded ontology source.
///
/// Built once, read-only afterwards. Statements are deduplicated and kept in
/// a stable order, so iteration is deterministic across runs.
#[derive(Debug, Default)]
pub struct TripleStore {
    statements: Vec<Statement>,
    by_subject: BTreeMap<Term, Vec<usize>>,
    by_predicate: BTreeMap<Term, Vec<usize>>,
}

impl TripleStore {
    /// Builds a store from raw statements. Duplicates collapse.
    pub fn from_statements(statements: impl IntoIterator<Item = Statement>) -> Self {
        let unique: BTreeSet<Statement> = statements.into_iter().collect();
        let statements: Vec<Statement> = unique.into_iter().collect();

        let mut by_subject: BTreeMap<Term, Vec<usize>> = BTreeMap::new();
        let mut by_predicate: BTreeMap<Term, Vec<usize>> = BTreeMap::new();
        for (i, st) in statements.iter().enumerate() {
            by_subject.entry(st.subject.clone()).or_default().push(i);
            by_predicate.entry(st.predicate.clone()).or_default().push(i);
        }

        Self {
            statements,
            by_subject,
            by_predicate,
        }
    }

    /// Number of distinct statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Returns true if the store holds no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Iterates over all statements in stable order.
    pub fn iter(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }

    /// Iterates over statements matching the given fixed positions.
    ///
    /// `None` positions match anything. The subject or predicate index is used
    /// when one of them is fixed.
    pub fn matching<'a: 'i, 'p: 'i, 'i>(
        &'a self,
        subject: Option<&'p Term>,
        predicate: Option<&'p Term>,
        object: Option<&'p Term>,
    ) -> Box<dyn Iterator<Item = &'a Statement> + 'i> {
        let candidates: Box<dyn Iterator<Item = &'a Statement> + 'a> =
            match (subject, predicate) {
                (Some(s), _) => Box::new(self.indexed(&self.by_subject, s)),
                (None, Some(p)) => Box::new(self.indexed(&self.by_predicate, p)),
                (None, None) => Box::new(self.statements.iter()),
            };
        Box::new(candidates.filter(move |st| {
            subject.map_or(true, |s| &st.subject == s)
                && predicate.map_or(true, |p| &st.predicate == p)
                && object.map_or(true, |o| &st.object == o)
        }))
    }

    fn indexed<'a>(
        &'a self,
        index: &'a BTreeMap<Term, Vec<usize>>,
        key: &Term,
    ) -> impl Iterator<Item = &'a Statement> + 'a {
        index
            .get(key)
            .into_iter()
            .flatten()
            .map(move |&i| &self.statements[i])
    }

    /// Evaluates a triple pattern, returning one binding set per match.
    ///
    /// A variable that appears in more than one slot must bind the same term
    /// in each; results are deduplicated (statements that differ only by graph
    /// yield one binding).
    pub fn query(&self, pattern: &Pattern) -> Vec<Bindings<'_>> {
        let mut seen: BTreeSet<Vec<(&'static str, &Term)>> = BTreeSet::new();
        let mut out = Vec::new();

        let matches = self.matching(
            pattern.subject.bound(),
            pattern.predicate.bound(),
            pattern.object.bound(),
        );
        'statements: for st in matches {
            let mut bindings: Bindings<'_> = BTreeMap::new();
            for (slot, term) in [
                (&pattern.subject, &st.subject),
                (&pattern.predicate, &st.predicate),
                (&pattern.object, &st.object),
            ] {
                if let Slot::Var(name) = slot {
                    if let Some(previous) = bindings.insert(*name, term) {
                        if previous != term {
                            continue 'statements;
                        }
                    }
                }
            }
            let key: Vec<(&'static str, &Term)> = bindings.iter().map(|(k, v)| (*k, *v)).collect();
            if seen.insert(key) {
                out.push(bindings);
            }
        }
        out
    }

    /// Objects of all `(subject, predicate, ?o)` statements, deduplicated and sorted.
    pub fn objects(&self, subject: &str, predicate: &str) -> Vec<&Term> {
        let s = Term::iri(subject);
        let p = Term::iri(predicate);
        let found: BTreeSet<&Term> = self
            .indexed(&self.by_subject, &s)
            .filter(|st| st.predicate == p)
            .map(|st| &st.object)
            .collect();
        found.into_iter().collect()
    }

    /// IRI subjects of all `(?s, predicate, object)` statements, deduplicated and sorted.
    pub fn subjects(&self, predicate: &str, object: &Term) -> Vec<&str> {
        let p = Term::iri(predicate);
        let found: BTreeSet<&str> = self
            .indexed(&self.by_predicate, &p)
            .filter(|st| &st.object == object)
            .filter_map(|st| st.subject.as_iri())
            .collect();
        found.into_iter().collect()
    }

    /// Returns true if `(subject, predicate, object)` holds in any graph.
    #[must_use]
    pub fn contains(&self, subject: &str, predicate: &str, object: &Term) -> bool {
        let s = Term::iri(subject);
        self.indexed(&self.by_subject, &s)
            .any(|st| st.predicate.as_iri() == Some(predicate) && &st.object == object)
    }
}
