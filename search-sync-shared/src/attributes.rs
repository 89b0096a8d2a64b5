//! Relational attribute descriptions.
//!
//! A relational model describes its columns as an [`AttributeSchema`]: a map
//! from field name to a semantic [`AttributeType`]. The set of tags is closed;
//! models declare their types explicitly instead of having them inferred from
//! live values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Semantic type tag of a relational attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// Short, bounded text (`VARCHAR`-like).
    String,
    /// Unbounded text.
    Text,
    /// Exact-match text.
    Keyword,
    Integer,
    Long,
    Short,
    Float,
    Double,
    Boolean,
    Date,
    Binary,
    /// Structured, opaque document (JSON columns).
    Json,
    /// Computed attribute that is never persisted. The optional inner type is
    /// the type the computed value would have.
    Virtual(Option<Box<AttributeType>>),
    /// Array of the inner type.
    Array(Box<AttributeType>),
}

impl AttributeType {
    /// Resolve composite kinds down to the tag that determines storage.
    ///
    /// Arrays resolve to their element type. Virtual attributes stay virtual
    /// whatever their declared return type.
    pub fn resolve(&self) -> &AttributeType {
        match self {
            AttributeType::Array(inner) => inner.resolve(),
            other => other,
        }
    }

    /// Whether the attribute is a structured/opaque value.
    pub fn is_opaque(&self) -> bool {
        matches!(self.resolve(), AttributeType::Json)
    }

    /// Whether the attribute is computed and never persisted.
    pub fn is_computed(&self) -> bool {
        matches!(self.resolve(), AttributeType::Virtual(_))
    }

    /// Lowercase tag name of the resolved type.
    pub fn tag(&self) -> &'static str {
        match self.resolve() {
            AttributeType::String => "string",
            AttributeType::Text => "text",
            AttributeType::Keyword => "keyword",
            AttributeType::Integer => "integer",
            AttributeType::Long => "long",
            AttributeType::Short => "short",
            AttributeType::Float => "float",
            AttributeType::Double => "double",
            AttributeType::Boolean => "boolean",
            AttributeType::Date => "date",
            AttributeType::Binary => "binary",
            AttributeType::Json => "json",
            AttributeType::Virtual(_) => "virtual",
            // resolve() never returns an array
            AttributeType::Array(_) => "array",
        }
    }
}

/// Field name to type tag map describing one relational model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSchema {
    fields: BTreeMap<String, AttributeType>,
}

impl AttributeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute, replacing any previous declaration of the same name.
    pub fn with(mut self, name: impl Into<String>, attribute_type: AttributeType) -> Self {
        self.fields.insert(name.into(), attribute_type);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttributeType> {
        self.fields.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttributeType)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, AttributeType)> for AttributeSchema {
    fn from_iter<I: IntoIterator<Item = (String, AttributeType)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
