//! Range → target type mapping.

use resgen_ontology::vocab::{
    RDFS_LITERAL, XSD_BOOLEAN, XSD_DATE, XSD_DATETIME, XSD_DECIMAL, XSD_DOUBLE, XSD_FLOAT,
    XSD_INT, XSD_INTEGER, XSD_LONG, XSD_NEGATIVE_INTEGER, XSD_NON_NEGATIVE_INTEGER,
    XSD_NON_POSITIVE_INTEGER, XSD_POSITIVE_INTEGER, XSD_SHORT, XSD_STRING, XSD_TIME,
    XSD_UNSIGNED_INT, XSD_UNSIGNED_LONG, XSD_UNSIGNED_SHORT,
};
use resgen_ontology::Cardinality;

/// Language-neutral value type of one property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScalarType {
    /// Text.
    String,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    UInt64,
    /// Double precision float.
    Double,
    /// Boolean.
    Bool,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time.
    DateTime,
    /// Reference to another resource, held as a URL.
    Resource,
}

impl ScalarType {
    /// Maps a range IRI. Anything that is not a known XSD datatype or
    /// `rdfs:Literal` is a resource reference.
    #[must_use]
    pub fn for_range(range: &str) -> Self {
        match range {
            XSD_INTEGER | XSD_NEGATIVE_INTEGER | XSD_NON_POSITIVE_INTEGER | XSD_LONG => {
                ScalarType::Int64
            }
            XSD_NON_NEGATIVE_INTEGER | XSD_POSITIVE_INTEGER | XSD_UNSIGNED_LONG => {
                ScalarType::UInt64
            }
            XSD_INT => ScalarType::Int32,
            XSD_UNSIGNED_INT => ScalarType::UInt32,
            XSD_SHORT => ScalarType::Int16,
            XSD_UNSIGNED_SHORT => ScalarType::UInt16,
            XSD_FLOAT | XSD_DOUBLE | XSD_DECIMAL => ScalarType::Double,
            XSD_BOOLEAN => ScalarType::Bool,
            XSD_DATE => ScalarType::Date,
            XSD_TIME => ScalarType::Time,
            XSD_DATETIME => ScalarType::DateTime,
            XSD_STRING | RDFS_LITERAL => ScalarType::String,
            _ => ScalarType::Resource,
        }
    }
}

/// Type of a property accessor: a single value or a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetType {
    /// Cardinality 1.
    Scalar(ScalarType),
    /// Many values of a non-string type.
    List(ScalarType),
    /// Many strings.
    StringList,
}

impl TargetType {
    /// Maps a range IRI and cardinality to the accessor type.
    #[must_use]
    pub fn for_property(range: &str, cardinality: Cardinality) -> Self {
        let scalar = ScalarType::for_range(range);
        match (cardinality.is_single(), scalar) {
            (true, s) => TargetType::Scalar(s),
            (false, ScalarType::String) => TargetType::StringList,
            (false, s) => TargetType::List(s),
        }
    }

    /// Type of one element; the type an adder takes.
    #[must_use]
    pub fn element(self) -> ScalarType {
        match self {
            TargetType::Scalar(s) | TargetType::List(s) => s,
            TargetType::StringList => ScalarType::String,
        }
    }

    /// True for list types.
    #[must_use]
    pub fn is_collection(self) -> bool {
        !matches!(self, TargetType::Scalar(_))
    }
}

/// Maps a property range and cardinality to its accessor type.
#[must_use]
pub fn map_type(range: &str, cardinality: Cardinality) -> TargetType {
    TargetType::for_property(range, cardinality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resgen_ontology::vocab::RDFS_RESOURCE;

    #[test]
    fn xsd_table() {
        assert_eq!(ScalarType::for_range(XSD_NON_NEGATIVE_INTEGER), ScalarType::UInt64);
        assert_eq!(ScalarType::for_range(XSD_NEGATIVE_INTEGER), ScalarType::Int64);
        assert_eq!(ScalarType::for_range(XSD_UNSIGNED_SHORT), ScalarType::UInt16);
        assert_eq!(ScalarType::for_range(XSD_DECIMAL), ScalarType::Double);
        assert_eq!(ScalarType::for_range(RDFS_LITERAL), ScalarType::String);
        assert_eq!(
            ScalarType::for_range("http://www.w3.org/2001/XMLSchema#gYear"),
            ScalarType::Resource
        );
        assert_eq!(ScalarType::for_range(RDFS_RESOURCE), ScalarType::Resource);
    }

    #[test]
    fn cardinality_picks_container() {
        assert_eq!(
            TargetType::for_property(XSD_STRING, Cardinality::ONE),
            TargetType::Scalar(ScalarType::String)
        );
        assert_eq!(
            TargetType::for_property(XSD_STRING, Cardinality::Unbounded),
            TargetType::StringList
        );
        assert_eq!(
            TargetType::for_property(RDFS_LITERAL, Cardinality::from_lexical("4")),
            TargetType::StringList
        );
        let tags = TargetType::for_property("http://x/nao#Tag", Cardinality::Unbounded);
        assert_eq!(tags, TargetType::List(ScalarType::Resource));
        assert_eq!(tags.element(), ScalarType::Resource);
        assert!(tags.is_collection());
    }
}
