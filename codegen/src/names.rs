//! Identifier and accessor naming.
//!
//! Property identifiers come from the IRI local name. When two effective
//! properties of one class would produce the same identifier or the same
//! accessor, each of them is prefixed with its namespace abbreviation.

use std::collections::BTreeMap;

use resgen_ontology::model::local_name;
use resgen_ontology::{Cardinality, Property};

use crate::error::GenerateError;

/// Rust keywords that cannot be used as plain identifiers.
const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "yield",
];

/// Resolved names for one property on one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNames {
    /// Bare identifier, possibly namespace-prefixed.
    pub identifier: String,
    /// Getter name, e.g. `getTags`.
    pub getter: String,
    /// Setter name, e.g. `setTags`.
    pub setter: String,
    /// Adder name, e.g. `addTag`.
    pub adder: String,
}

impl PropertyNames {
    fn for_identifier(identifier: String, cardinality: Cardinality) -> Self {
        let plural = upper_first(&fancy_name(&identifier, cardinality));
        let single = upper_first(&fancy_name(&identifier, Cardinality::ONE));
        Self {
            getter: format!("get{plural}"),
            setter: format!("set{plural}"),
            adder: format!("add{single}"),
            identifier,
        }
    }
}

/// Derives a legal identifier from an IRI's local name.
///
/// Characters outside `[A-Za-z0-9_]` become `_`; a leading digit gets a `_`
/// prefix.
#[must_use]
pub fn identifier_for(uri: &str) -> String {
    sanitize(local_name(uri))
}

fn sanitize(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Namespace abbreviation as an identifier fragment.
#[must_use]
pub fn namespace_ident(namespace: &str) -> String {
    sanitize(&namespace.to_lowercase())
}

/// Display form of a property name.
///
/// A leading `has` followed by an upper-case letter is dropped. Collections
/// are pluralised by appending `s`, or `es` after a trailing `s`.
#[must_use]
pub fn fancy_name(identifier: &str, cardinality: Cardinality) -> String {
    let base = match identifier.strip_prefix("has") {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => lower_first(rest),
        _ => identifier.to_string(),
    };
    if cardinality.is_single() {
        base
    } else if base.ends_with('s') {
        format!("{base}es")
    } else {
        format!("{base}s")
    }
}

/// Upper-cases the first character.
#[must_use]
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Converts a camelCase or PascalCase name into a snake_case Rust identifier.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;
    for ch in s.chars() {
        if ch.is_uppercase() {
            // No underscore inside acronyms ("getURL" -> "get_url").
            if prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit()) {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
        prev = Some(ch);
    }
    escape_keyword(result)
}

/// Appends `_` to Rust keywords.
#[must_use]
pub fn escape_keyword(mut ident: String) -> String {
    if RUST_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Assigns collision-free names to the effective properties of a class.
///
/// Accessors are compared after `method_name` maps them to the names the
/// target syntax actually declares, so `getUrl` and `getURL` clash when both
/// become `get_url`.
///
/// # Errors
///
/// Returns [`GenerateError::CollisionUnresolved`] if two properties still
/// clash after both were prefixed with their namespace abbreviation.
pub fn disambiguate<'a>(
    class_uri: &str,
    properties: impl IntoIterator<Item = &'a Property>,
    method_name: impl Fn(&str) -> String,
) -> Result<BTreeMap<String, PropertyNames>, GenerateError> {
    let properties: Vec<&Property> = properties.into_iter().collect();

    let mut prefixed: Vec<bool> = vec![false; properties.len()];
    let raw: Vec<String> = properties.iter().map(|p| identifier_for(&p.uri)).collect();

    let mut by_identifier: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, id) in raw.iter().enumerate() {
        by_identifier.entry(id.as_str()).or_default().push(i);
    }
    for group in by_identifier.values().filter(|g| g.len() > 1) {
        for &i in group {
            prefixed[i] = true;
        }
    }

    let names_for = |prefixed: &[bool]| -> Vec<PropertyNames> {
        properties
            .iter()
            .zip(&raw)
            .zip(prefixed)
            .map(|((p, id), &pre)| {
                let identifier = if pre {
                    format!("{}{}", namespace_ident(&p.namespace), upper_first(id))
                } else {
                    id.clone()
                };
                PropertyNames::for_identifier(identifier, p.cardinality)
            })
            .collect()
    };

    let mut names = names_for(&prefixed);
    let clashes = accessor_clashes(&names, &method_name);
    if !clashes.is_empty() {
        for group in &clashes {
            for &i in &group.1 {
                prefixed[i] = true;
            }
        }
        names = names_for(&prefixed);
    }

    let mut identifiers: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, n) in names.iter().enumerate() {
        identifiers.entry(n.identifier.as_str()).or_default().push(i);
    }
    let still_clashing = identifiers
        .into_iter()
        .map(|(id, group)| (id.to_string(), group))
        .chain(accessor_clashes(&names, &method_name))
        .find(|(_, group)| group.len() > 1);
    if let Some((identifier, group)) = still_clashing {
        return Err(GenerateError::CollisionUnresolved {
            class: class_uri.to_string(),
            identifier,
            properties: group.iter().map(|&i| properties[i].uri.clone()).collect(),
        });
    }

    Ok(properties
        .iter()
        .zip(names)
        .map(|(p, n)| (p.uri.clone(), n))
        .collect())
}

/// Declared method names produced by more than one property, with the
/// indices of the properties producing them.
fn accessor_clashes(
    names: &[PropertyNames],
    method_name: impl Fn(&str) -> String,
) -> Vec<(String, Vec<usize>)> {
    let mut seen: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (i, n) in names.iter().enumerate() {
        for accessor in [&n.getter, &n.setter, &n.adder] {
            seen.entry(method_name(accessor)).or_default().push(i);
        }
    }
    seen.into_iter().filter(|(_, group)| group.len() > 1).collect()
}
